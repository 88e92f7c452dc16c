//! Error types for sis-auth.
//!
//! Error messages are designed to avoid exposing sensitive credential data.

/// Result type alias for sis-auth operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for sis-auth operations.
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
}

/// The kind of error that occurred.
///
/// Error messages avoid including credential values.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// Client id or secret is empty or absent.
    #[error("Client id or secret is missing")]
    MissingCredentials,

    /// The token endpoint answered with a non-success status.
    #[error("Token exchange failed with status {status}")]
    TokenExchange { status: u16, body: String },

    /// Transport failure while talking to the token endpoint.
    #[error("HTTP error: {0}")]
    Http(String),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Environment variable not set.
    #[error("Environment variable not set: {0}")]
    EnvVar(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::with_source(ErrorKind::Json(err.to_string()), err)
    }
}

impl From<serde_urlencoded::ser::Error> for Error {
    fn from(err: serde_urlencoded::ser::Error) -> Self {
        Error::with_source(ErrorKind::Serialization(err.to_string()), err)
    }
}

impl From<busbar_sis_client::Error> for Error {
    fn from(err: busbar_sis_client::Error) -> Self {
        let kind = if err.is_json() {
            ErrorKind::Json(err.kind.to_string())
        } else {
            // Transport messages can echo request URLs; keep tokens out of them.
            let message = err.to_string();
            let sanitized = if message.contains("Bearer") || message.contains("token=") {
                "Client error (details redacted for security)".to_string()
            } else {
                message
            };
            ErrorKind::Http(sanitized)
        };
        Error::with_source(kind, err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_display() {
        assert_eq!(
            ErrorKind::MissingCredentials.to_string(),
            "Client id or secret is missing"
        );

        let err = ErrorKind::TokenExchange {
            status: 401,
            body: "{\"error\":\"invalid_client\"}".to_string(),
        };
        assert_eq!(err.to_string(), "Token exchange failed with status 401");
    }

    #[test]
    fn test_missing_credentials_predicate() {
        assert!(Error::new(ErrorKind::MissingCredentials).is_missing_credentials());
        assert!(!Error::new(ErrorKind::Http("reset".into())).is_missing_credentials());
    }

    #[test]
    fn test_client_json_error_maps_to_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let client_err: busbar_sis_client::Error = json_err.into();
        let err: Error = client_err.into();
        assert!(matches!(err.kind, ErrorKind::Json(_)));
    }
}
