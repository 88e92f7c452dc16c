//! Core HTTP client.

use tracing::{debug, info, instrument};

use crate::config::ClientConfig;
use crate::error::{Error, ErrorKind, Result};
use crate::request::{RequestBody, RequestBuilder, RequestMethod};
use crate::response::Response;

/// HTTP client for SIS APIs.
///
/// Each call to [`SisHttpClient::execute`] is exactly one physical HTTP
/// attempt. Cloning is cheap and shares the connection pool.
#[derive(Debug, Clone)]
pub struct SisHttpClient {
    inner: reqwest::Client,
    config: ClientConfig,
}

impl SisHttpClient {
    /// Create a new HTTP client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let builder = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .user_agent(&config.user_agent)
            .gzip(config.accept_compressed)
            .deflate(config.accept_compressed);

        let inner = builder
            .build()
            .map_err(|e| Error::with_source(ErrorKind::Config(e.to_string()), e))?;

        Ok(Self { inner, config })
    }

    /// Create a new HTTP client with default configuration.
    pub fn default_client() -> Result<Self> {
        Self::new(ClientConfig::default())
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Create a request builder for an arbitrary method.
    pub fn request(&self, method: RequestMethod, url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(method, url)
    }

    /// Create a GET request builder.
    pub fn get(&self, url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(RequestMethod::Get, url)
    }

    /// Create a POST request builder.
    pub fn post(&self, url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(RequestMethod::Post, url)
    }

    /// Execute a single request. Any status code is returned as a response.
    #[instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    pub async fn execute(&self, request: &RequestBuilder) -> Result<Response> {
        let url = request.full_url()?;
        let mut req = self.inner.request(request.method.to_reqwest(), &url);

        for (name, value) in &request.headers {
            req = req.header(name.as_str(), value.as_str());
        }

        if let Some(ref body) = request.body {
            req = match body {
                RequestBody::Json(value) => req.json(value),
                RequestBody::Text(text) => req.body(text.clone()),
            };
        }

        if self.config.enable_tracing {
            debug!(method = %request.method, url = %request.url, "Sending request");
        }

        let response = req.send().await?;

        if self.config.enable_tracing {
            let status = response.status().as_u16();
            let content_length = response.content_length();

            if response.status().is_success() {
                debug!(status, content_length, "Response received");
            } else {
                info!(status, content_length, "Non-success response");
            }
        }

        Ok(Response::new(response))
    }

    /// Execute a request, taking it by value.
    pub async fn send(&self, request: RequestBuilder) -> Result<Response> {
        self.execute(&request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client() -> SisHttpClient {
        SisHttpClient::new(ClientConfig::builder().with_compression(false).build()).unwrap()
    }

    #[tokio::test]
    async fn test_client_creation() {
        let client = SisHttpClient::default_client().unwrap();
        assert!(client.config().accept_compressed);
    }

    #[tokio::test]
    async fn test_successful_request() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/ws/v1/district"))
            .and(header("Authorization", "Bearer test-token"))
            .and(query_param("expansions", "addresses"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "district": {"name": "Springfield"}
            })))
            .mount(&mock_server)
            .await;

        let client = client();
        let response = client
            .send(
                client
                    .get(format!("{}/ws/v1/district", mock_server.uri()))
                    .bearer_auth("test-token")
                    .query("expansions", "addresses"),
            )
            .await
            .unwrap();

        assert!(response.is_success());
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["district"]["name"], "Springfield");
    }

    #[tokio::test]
    async fn test_error_status_is_not_an_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string("no such resource"))
            .mount(&mock_server)
            .await;

        let client = client();
        let response = client
            .send(client.get(format!("{}/missing", mock_server.uri())))
            .await
            .unwrap();

        assert_eq!(response.status(), 404);
        assert!(response.is_error());
        assert_eq!(response.text().await.unwrap(), "no such resource");
    }

    #[tokio::test]
    async fn test_text_body_is_sent_verbatim() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/form"))
            .and(header(
                "Content-Type",
                "application/x-www-form-urlencoded;charset=UTF-8",
            ))
            .and(body_string("grant_type=client_credentials"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client();
        let response = client
            .send(
                client
                    .post(format!("{}/form", mock_server.uri()))
                    .form_encoded("grant_type=client_credentials"),
            )
            .await
            .unwrap();

        assert!(response.is_success());
    }

    #[tokio::test]
    async fn test_connection_refused_maps_to_transport_error() {
        let client = client();
        let err = client
            .send(client.get("http://127.0.0.1:1/unreachable"))
            .await
            .unwrap_err();

        assert!(err.is_transport(), "unexpected error kind: {err}");
    }
}
