//! Error types for sis-rest.
//!
//! A call either fully succeeds or fails with one of these kinds. Token
//! expiry on a resource call (HTTP 401) is recovered inside the requester
//! and only surfaces as [`ErrorKind::ResourceCall`] once retries are spent.

/// Result type alias for sis-rest operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for sis-rest operations.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional source error.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Create a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    /// Create a new error with the given kind and source.
    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    /// Returns true if the client id or secret was missing.
    pub fn is_missing_credentials(&self) -> bool {
        matches!(self.kind, ErrorKind::MissingCredentials)
    }

    /// Returns true for failures of the token exchange or a 401 that
    /// survived re-authentication.
    pub fn is_auth_error(&self) -> bool {
        match &self.kind {
            ErrorKind::MissingCredentials | ErrorKind::AuthExchange { .. } => true,
            ErrorKind::ResourceCall { status, .. } => *status == 401,
            _ => false,
        }
    }

    /// HTTP status of the failed call, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match &self.kind {
            ErrorKind::ResourceCall { status, .. } => Some(*status),
            ErrorKind::AuthExchange { status, .. } => *status,
            _ => None,
        }
    }

    /// Raw response body of the failed call, if the server answered.
    pub fn raw_body(&self) -> Option<&str> {
        match &self.kind {
            ErrorKind::ResourceCall { body, .. } => Some(body),
            ErrorKind::AuthExchange { body, .. } => body.as_deref(),
            _ => None,
        }
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// Client id or secret is empty. No request was sent.
    #[error("Client id or secret is missing")]
    MissingCredentials,

    /// The token endpoint failed. Never retried.
    #[error("Token exchange failed: {message}")]
    AuthExchange {
        status: Option<u16>,
        body: Option<String>,
        message: String,
    },

    /// A resource call answered 4xx/5xx (or 401 after retries ran out).
    #[error("HTTP {status} from SIS")]
    ResourceCall { status: u16, body: String },

    /// The response body was not valid JSON.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Network-level failure: connect, timeout, reset.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Serialization of normalized data failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Environment or configuration problem.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<busbar_sis_client::Error> for Error {
    fn from(err: busbar_sis_client::Error) -> Self {
        let kind = if err.is_json() {
            ErrorKind::MalformedResponse(err.kind.to_string())
        } else if let busbar_sis_client::ErrorKind::Config(ref message)
        | busbar_sis_client::ErrorKind::InvalidUrl(ref message) = err.kind
        {
            ErrorKind::Config(message.clone())
        } else {
            ErrorKind::Transport(err.kind.to_string())
        };
        Error::with_source(kind, err)
    }
}

impl From<busbar_sis_auth::Error> for Error {
    fn from(err: busbar_sis_auth::Error) -> Self {
        use busbar_sis_auth::ErrorKind as Auth;

        let kind = match &err.kind {
            Auth::MissingCredentials => ErrorKind::MissingCredentials,
            Auth::EnvVar(name) => ErrorKind::Config(format!("environment variable not set: {name}")),
            Auth::TokenExchange { status, body } => ErrorKind::AuthExchange {
                status: Some(*status),
                body: Some(body.clone()),
                message: err.kind.to_string(),
            },
            other => ErrorKind::AuthExchange {
                status: None,
                body: None,
                message: other.to_string(),
            },
        };
        Error::with_source(kind, err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        let kind = if err.is_data() || err.is_syntax() || err.is_eof() {
            ErrorKind::MalformedResponse(err.to_string())
        } else {
            ErrorKind::Serialization(err.to_string())
        };
        Error::with_source(kind, err)
    }
}
