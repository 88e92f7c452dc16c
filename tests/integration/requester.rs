use busbar_sis_api::rest::ErrorKind;
use busbar_sis_api::{CallOptions, RequestMethod, Requester};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use crate::common::{mock_sis, requester, TOKEN};

#[tokio::test]
async fn test_student_list_end_to_end() {
    let server = mock_sis().await;

    Mock::given(method("GET"))
        .and(path("/ws/v1/school/4/student"))
        .and(query_param("expansions", "demographics"))
        .and(header("Authorization", format!("Bearer {TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "students": {
                "@expansions": "demographics, addresses, alerts",
                "@extensions": "s_stu_crdc_x,studentcorefields",
                "student": [
                    {"id": 101, "name": {"first_name": "Ada", "last_name": "Lovelace"}},
                    {"id": 102, "name": {"first_name": "Alan", "last_name": "Turing"}}
                ]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut sis = requester(&server);
    let students = sis
        .fetch(
            RequestMethod::Get,
            "/ws/v1/school/4/student",
            &CallOptions::new().query("expansions", "demographics"),
            "Student",
        )
        .await
        .unwrap();

    assert_eq!(students.len(), 2);
    assert_eq!(students.expansions(), ["demographics", "addresses", "alerts"]);
    assert_eq!(students.extensions(), ["s_stu_crdc_x", "studentcorefields"]);
    assert_eq!(students.get("1.name.last_name"), Some(&json!("Turing")));

    let ids: Vec<_> = students.iter().map(|s| s["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, vec![101, 102]);
}

#[tokio::test]
async fn test_single_record_end_to_end() {
    let server = mock_sis().await;

    Mock::given(method("GET"))
        .and(path("/ws/v1/district"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "district": {"name": "Springfield USD", "district_number": 12}
        })))
        .mount(&server)
        .await;

    let mut sis = requester(&server);
    let district = sis.get("/ws/v1/district", "district").await.unwrap();

    assert!(district.is_record());
    assert_eq!(district.field("name"), Some(&json!("Springfield USD")));
    assert!(district.expansions().is_empty());
}

#[tokio::test]
async fn test_expired_token_is_recovered_transparently() {
    let server = mock_sis().await;

    // First resource call is rejected, the retry with a fresh token passes.
    Mock::given(method("GET"))
        .and(path("/ws/v1/district/school/count"))
        .respond_with(ResponseTemplate::new(401))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/ws/v1/district/school/count"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"resource": {"count": 7}})))
        .with_priority(2)
        .mount(&server)
        .await;

    let mut sis = requester(&server);
    let count = sis
        .get("/ws/v1/district/school/count", "count")
        .await
        .unwrap();

    assert_eq!(count.get("count"), Some(&json!(7)));
    assert_eq!(sis.attempts(), 0);

    let token_requests = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.url.path() == "/oauth/access_token")
        .count();
    assert_eq!(token_requests, 2);
}

#[tokio::test]
async fn test_wrong_secret_surfaces_auth_error() {
    let server = mock_sis().await;

    let mut sis = Requester::new(server.uri(), "district-plugin", "wrong").unwrap();
    let err = sis.get("/ws/v1/district", "district").await.unwrap_err();

    // The mock token endpoint only matches the right secret; anything else
    // falls through to wiremock's 404.
    assert!(matches!(
        err.kind,
        ErrorKind::AuthExchange {
            status: Some(404),
            ..
        }
    ));
    assert!(err.is_auth_error());
}

#[tokio::test]
async fn test_server_error_body_is_preserved() {
    let server = mock_sis().await;

    Mock::given(method("POST"))
        .and(path("/ws/v1/student"))
        .respond_with(ResponseTemplate::new(500).set_body_string("{\"message\":\"Internal Error\"}"))
        .expect(1)
        .mount(&server)
        .await;

    let mut sis = requester(&server);
    let err = sis
        .call(
            RequestMethod::Post,
            "/ws/v1/student",
            &CallOptions::new().json_value(json!({"students": {"student": []}})),
        )
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert_eq!(err.raw_body(), Some("{\"message\":\"Internal Error\"}"));
}
