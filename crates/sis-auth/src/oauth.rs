//! OAuth 2.0 client credentials grant.
//!
//! The SIS exposes a single token endpoint at [`TOKEN_PATH`]. A plugin's
//! client id and secret are exchanged for a bearer token which is then sent
//! on every resource call.

use busbar_sis_client::{join_url, SisHttpClient};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, instrument};

use crate::credentials::ClientCredentials;
use crate::error::{Error, ErrorKind, Result};

/// Path of the token endpoint, relative to the server base URL.
pub const TOKEN_PATH: &str = "/oauth/access_token";

/// Performs the client credentials exchange.
#[derive(Clone)]
pub struct ClientCredentialsFlow {
    credentials: ClientCredentials,
}

impl std::fmt::Debug for ClientCredentialsFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentialsFlow")
            .field("credentials", &self.credentials)
            .finish()
    }
}

impl ClientCredentialsFlow {
    /// Create a flow for the given credentials.
    pub fn new(credentials: ClientCredentials) -> Self {
        Self { credentials }
    }

    /// The credentials this flow authenticates with.
    pub fn credentials(&self) -> &ClientCredentials {
        &self.credentials
    }

    /// Exchange the client credentials for an access token.
    ///
    /// Fails with [`ErrorKind::MissingCredentials`] before any network call
    /// if the id or secret is empty. Nothing here is retried.
    #[instrument(skip(self, http), fields(client_id = %self.credentials.client_id()))]
    pub async fn authenticate(&self, http: &SisHttpClient, base_url: &str) -> Result<AccessToken> {
        let authorization = self.credentials.basic_authorization()?;
        let body = serde_urlencoded::to_string([("grant_type", "client_credentials")])?;

        let request = http
            .post(join_url(base_url, TOKEN_PATH))
            .form_encoded(body)
            .header("Accept", "application/json")
            .header("Authorization", authorization);

        let response = http.execute(&request).await?;
        let status = response.status();

        if !response.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::new(ErrorKind::TokenExchange { status, body }));
        }

        let token: TokenResponse = response.json().await?;
        debug!(expires_in = ?token.expires_in, "Access token obtained");

        Ok(AccessToken::from_response(token))
    }
}

/// Token response from the token endpoint.
///
/// `access_token` is redacted in Debug output.
#[derive(Clone, Deserialize, Serialize)]
pub struct TokenResponse {
    /// Access token.
    pub access_token: String,
    /// Token type (usually "Bearer").
    #[serde(default)]
    pub token_type: Option<String>,
    /// Lifetime in seconds. Some servers send this as a string.
    #[serde(default, deserialize_with = "lenient_seconds")]
    pub expires_in: Option<u64>,
}

impl std::fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenResponse")
            .field("access_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

fn lenient_seconds<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_u64(),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// The bearer token held by a session.
///
/// Replaced as a whole on re-authentication, never mutated in place.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    value: String,
    obtained: DateTime<Utc>,
    expires_in: Option<u64>,
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"[REDACTED]")
            .field("obtained", &self.obtained)
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

impl AccessToken {
    /// Create a token obtained now.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            obtained: Utc::now(),
            expires_in: None,
        }
    }

    /// Build a token from a token endpoint response.
    pub fn from_response(response: TokenResponse) -> Self {
        Self {
            value: response.access_token,
            obtained: Utc::now(),
            expires_in: response.expires_in,
        }
    }

    /// The raw bearer token.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// When the token was obtained.
    pub fn obtained(&self) -> DateTime<Utc> {
        self.obtained
    }

    /// When the server said the token would expire, if it said.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let secs = i64::try_from(self.expires_in?).ok()?;
        self.obtained.checked_add_signed(Duration::try_seconds(secs)?)
    }
}
