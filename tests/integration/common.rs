use base64::{engine::general_purpose, Engine as _};
use busbar_sis_api::Requester;
use serde_json::json;
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const CLIENT_ID: &str = "district-plugin";
pub const CLIENT_SECRET: &str = "plugin-secret";
pub const TOKEN: &str = "5e5a1f3c-token";

/// Route test logs through the test harness. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Start a mock SIS whose token endpoint accepts only the test plugin's
/// credentials.
pub async fn mock_sis() -> MockServer {
    init_tracing();

    let server = MockServer::start().await;
    let basic = general_purpose::STANDARD.encode(format!("{CLIENT_ID}:{CLIENT_SECRET}"));

    Mock::given(method("POST"))
        .and(path("/oauth/access_token"))
        .and(header("Authorization", format!("Basic {basic}").as_str()))
        .and(body_string("grant_type=client_credentials"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": TOKEN,
            "token_type": "Bearer",
            "expires_in": "2504956"
        })))
        .mount(&server)
        .await;

    server
}

pub fn requester(server: &MockServer) -> Requester {
    Requester::new(server.uri(), CLIENT_ID, CLIENT_SECRET).expect("requester should build")
}
