//! Authenticated SIS requester.

use std::fmt;
use std::sync::Arc;

use busbar_sis_auth::{AccessToken, ClientCredentials, ClientCredentialsFlow};
use busbar_sis_client::{join_url, ClientConfig, RequestMethod, SisHttpClient};
use serde_json::{Map, Value};
use tracing::{debug, instrument, warn};

use crate::error::{Error, ErrorKind, Result};
use crate::observer::{CallObserver, CallRecord, TracingObserver};
use crate::options::CallOptions;
use crate::response::Response;

/// Physical attempts allowed for one logical call while the server keeps
/// answering 401.
pub const MAX_ATTEMPTS: u32 = 3;

/// Environment variable holding the SIS base URL.
pub const BASE_URL_ENV: &str = "SIS_BASE_URL";

/// Authenticated requester for one SIS instance.
///
/// Holds the session token and the retry counter, so every call takes
/// `&mut self`. Share one requester between tasks behind a
/// `tokio::sync::Mutex`.
///
/// # Example
///
/// ```rust,ignore
/// use busbar_sis_rest::{CallOptions, RequestMethod, Requester};
///
/// let mut sis = Requester::new("https://sis.example.edu", "id", "secret")?;
/// let students = sis
///     .fetch(
///         RequestMethod::Get,
///         "/ws/v1/district/student",
///         &CallOptions::new().query("pagesize", "100"),
///         "student",
///     )
///     .await?;
///
/// for student in &students {
///     println!("{}", student["name"]);
/// }
/// ```
pub struct Requester {
    http: SisHttpClient,
    base_url: String,
    flow: ClientCredentialsFlow,
    token: Option<AccessToken>,
    attempts: u32,
    observer: Arc<dyn CallObserver>,
}

impl fmt::Debug for Requester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Requester")
            .field("base_url", &self.base_url)
            .field("flow", &self.flow)
            .field("token", &self.token)
            .field("attempts", &self.attempts)
            .finish_non_exhaustive()
    }
}

impl Requester {
    /// Create a requester with default HTTP settings.
    ///
    /// No network traffic happens until the first call.
    pub fn new(
        base_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Result<Self> {
        Self::with_config(
            base_url,
            ClientCredentials::new(client_id, client_secret),
            ClientConfig::default(),
        )
    }

    /// Create a requester with custom HTTP settings.
    pub fn with_config(
        base_url: impl Into<String>,
        credentials: ClientCredentials,
        config: ClientConfig,
    ) -> Result<Self> {
        Ok(Self {
            http: SisHttpClient::new(config)?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            flow: ClientCredentialsFlow::new(credentials),
            token: None,
            attempts: 0,
            observer: Arc::new(TracingObserver),
        })
    }

    /// Create a requester from `SIS_BASE_URL`, `SIS_CLIENT_ID` and
    /// `SIS_CLIENT_SECRET`.
    ///
    /// The `POWERSCHOOL_*` names are accepted as fallbacks.
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var(BASE_URL_ENV)
            .or_else(|_| std::env::var("POWERSCHOOL_BASE_URL"))
            .map_err(|_| {
                Error::new(ErrorKind::Config(format!(
                    "environment variable not set: {BASE_URL_ENV}"
                )))
            })?;
        let credentials = ClientCredentials::from_env()?;
        Self::with_config(base_url, credentials, ClientConfig::default())
    }

    /// Replace the call observer.
    pub fn with_observer(mut self, observer: impl CallObserver + 'static) -> Self {
        self.observer = Arc::new(observer);
        self
    }

    /// The base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The cached session token, if any.
    pub fn token(&self) -> Option<&AccessToken> {
        self.token.as_ref()
    }

    /// Physical attempts made by the current or most recent call.
    ///
    /// Reset when a call starts and when it succeeds; a failed call leaves
    /// its count in place.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Make sure a session token is cached and return it.
    ///
    /// With `force` set a new token is requested even if one is cached.
    /// On failure the previous token is left in place.
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn authenticate(&mut self, force: bool) -> Result<AccessToken> {
        if let Some(ref token) = self.token {
            if !force {
                return Ok(token.clone());
            }
        }

        let token = self.flow.authenticate(&self.http, &self.base_url).await?;
        debug!(forced = force, "Session token replaced");
        self.token = Some(token.clone());
        Ok(token)
    }

    /// Perform one logical call and return the decoded body and status.
    ///
    /// A 401 triggers re-authentication and a retry while fewer than
    /// [`MAX_ATTEMPTS`] attempts have been made in this call. Every other
    /// failure is returned immediately. An empty or `null` body decodes
    /// to `{}`.
    ///
    /// `Accept: application/json`, `Content-Type: application/json` and the
    /// bearer token always replace any same-named header in `options`.
    ///
    /// Every outcome is reported to the call observer.
    #[instrument(skip(self, options))]
    pub async fn call(
        &mut self,
        method: RequestMethod,
        path: &str,
        options: &CallOptions,
    ) -> Result<(Value, u16)> {
        let url = join_url(&self.base_url, path);
        self.attempts = 0;

        loop {
            let token = self
                .authenticate(false)
                .await
                .map_err(|err| self.report_error(method, path, None, err))?;
            self.attempts += 1;

            let request = options
                .to_request(method, &url)
                .header("Accept", "application/json")
                .header("Content-Type", "application/json")
                .bearer_auth(token.value());

            let response = self
                .http
                .execute(&request)
                .await
                .map_err(|err| self.report_error(method, path, None, err.into()))?;
            let status = response.status();

            let text = response
                .text()
                .await
                .map_err(|err| self.report_error(method, path, Some(status), err.into()))?;

            let record = CallRecord {
                method,
                path,
                status: Some(status),
                attempts: self.attempts,
            };

            if status >= 400 {
                if status == 401 && self.attempts < MAX_ATTEMPTS {
                    warn!(attempt = self.attempts, "Token rejected, re-authenticating");
                    self.authenticate(true)
                        .await
                        .map_err(|err| self.report_error(method, path, Some(status), err))?;
                    continue;
                }

                self.observer.on_failure(&record, &text);
                return Err(Error::new(ErrorKind::ResourceCall { status, body: text }));
            }

            self.attempts = 0;
            return match decode_body(&text) {
                Ok(body) => {
                    self.observer.on_success(&record, &body);
                    Ok((body, status))
                }
                Err(err) => {
                    self.observer.on_failure(&record, &text);
                    Err(err)
                }
            };
        }
    }

    fn report_error(
        &self,
        method: RequestMethod,
        path: &str,
        status: Option<u16>,
        err: Error,
    ) -> Error {
        let record = CallRecord {
            method,
            path,
            status,
            attempts: self.attempts,
        };
        self.observer.on_error(&record, &err);
        err
    }

    /// Perform a call and normalize the body around the entity `key`.
    pub async fn fetch(
        &mut self,
        method: RequestMethod,
        path: &str,
        options: &CallOptions,
        key: &str,
    ) -> Result<Response> {
        let (body, _) = self.call(method, path, options).await?;
        Ok(Response::new(body, key))
    }

    /// `GET` a path and normalize the body around `key`.
    pub async fn get(&mut self, path: &str, key: &str) -> Result<Response> {
        self.fetch(RequestMethod::Get, path, &CallOptions::default(), key)
            .await
    }
}

fn decode_body(text: &str) -> Result<Value> {
    if text.trim().is_empty() {
        return Ok(Value::Object(Map::new()));
    }
    match serde_json::from_str(text)? {
        Value::Null => Ok(Value::Object(Map::new())),
        value => Ok(value),
    }
}
