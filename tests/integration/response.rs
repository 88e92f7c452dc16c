use busbar_sis_api::{CallOptions, RequestMethod, Response};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::common::{mock_sis, requester};

#[tokio::test]
async fn test_table_query_squash_flow() {
    let server = mock_sis().await;

    Mock::given(method("POST"))
        .and(path("/ws/schema/table/u_attendance_notes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "U_Attendance_Notes",
            "record": [
                {"id": 1, "tables": {"u_attendance_notes": {"note": "late bus"}}},
                {"id": 2, "tables": {"u_attendance_notes": {"note": "doctor"}}}
            ]
        })))
        .mount(&server)
        .await;

    let mut sis = requester(&server);
    let mut notes = sis
        .fetch(
            RequestMethod::Post,
            "/ws/schema/table/u_attendance_notes",
            &CallOptions::new(),
            "record",
        )
        .await
        .unwrap();

    assert_eq!(notes.table_name(), Some("u_attendance_notes"));

    // Reads look through the wrapper before and after squashing.
    assert_eq!(notes.get(0), Some(&json!({"note": "late bus"})));

    notes.squash_table_response();
    assert_eq!(
        notes.data(),
        &json!([{"note": "late bus"}, {"note": "doctor"}])
    );
    assert_eq!(notes.get(1), Some(&json!({"note": "doctor"})));
}

#[tokio::test]
async fn test_normalized_response_survives_cache_round_trip() {
    let server = mock_sis().await;

    Mock::given(method("GET"))
        .and(path("/ws/v1/school/4/section"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sections": {
                "@expansions": "term",
                "section": {"id": 77, "course_number": "ENG101"}
            }
        })))
        .mount(&server)
        .await;

    let mut sis = requester(&server);
    let section = sis.get("/ws/v1/school/4/section", "section").await.unwrap();

    let packed = rmp_serde::to_vec_named(&section).unwrap();
    let restored: Response = rmp_serde::from_slice(&packed).unwrap();

    assert_eq!(restored, section);
    assert_eq!(restored.field("course_number"), Some(&json!("ENG101")));
    assert_eq!(restored.expansions(), ["term"]);
}

#[tokio::test]
async fn test_empty_collection_is_empty_list() {
    let server = mock_sis().await;

    Mock::given(method("GET"))
        .and(path("/ws/v1/school/4/student"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"students": ""})))
        .mount(&server)
        .await;

    let mut sis = requester(&server);
    let students = sis.get("/ws/v1/school/4/student", "student").await.unwrap();

    assert!(students.is_empty());
    assert!(students.is_list());
    assert_eq!(students.iter().count(), 0);
}
