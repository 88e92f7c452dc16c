//! Transport errors.
//!
//! An HTTP status is never an error at this layer: `execute` hands every
//! response back and lets the SIS requester decide. What remains are
//! failures to get a response at all, plus local encoding problems.

/// Result type alias for sis-client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// A transport or request-building failure.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    pub kind: ErrorKind,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    /// True when the SIS never answered: timeout, refused or reset
    /// connection, or a body that could not be read.
    pub fn is_transport(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::Timeout | ErrorKind::Connection(_) | ErrorKind::Other(_)
        )
    }

    /// True when a body could not be encoded or decoded as JSON.
    pub fn is_json(&self) -> bool {
        matches!(self.kind, ErrorKind::Json(_))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// The SIS did not answer within the configured timeout.
    #[error("Request timeout")]
    Timeout,

    /// The SIS host could not be reached.
    #[error("Connection error: {0}")]
    Connection(String),

    /// A body was not valid JSON.
    #[error("JSON error: {0}")]
    Json(String),

    /// Base URL and path did not form a valid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Bad client settings, or an unknown method name.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Anything else reqwest reports, such as a body cut off mid-read.
    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            ErrorKind::Timeout
        } else if err.is_connect() {
            ErrorKind::Connection(err.to_string())
        } else if err.is_decode() {
            ErrorKind::Json(err.to_string())
        } else {
            ErrorKind::Other(err.to_string())
        };

        Error::with_source(kind, err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::with_source(ErrorKind::Json(err.to_string()), err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::with_source(ErrorKind::InvalidUrl(err.to_string()), err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(ErrorKind::Timeout.to_string(), "Request timeout");
        assert_eq!(
            ErrorKind::Connection("refused".into()).to_string(),
            "Connection error: refused"
        );
        assert_eq!(
            ErrorKind::InvalidUrl("relative URL without a base".into()).to_string(),
            "Invalid URL: relative URL without a base"
        );
        assert_eq!(ErrorKind::Other("body cut off".into()).to_string(), "body cut off");
    }

    #[test]
    fn test_transport_classification() {
        assert!(Error::new(ErrorKind::Timeout).is_transport());
        assert!(Error::new(ErrorKind::Connection("reset".into())).is_transport());
        assert!(!Error::new(ErrorKind::Json("eof".into())).is_transport());
        assert!(!Error::new(ErrorKind::InvalidUrl("no host".into())).is_transport());
        assert!(Error::new(ErrorKind::Json("eof".into())).is_json());
    }

    #[test]
    fn test_source_is_kept() {
        let err = Error::with_source(
            ErrorKind::Other("read failed".into()),
            std::io::Error::other("socket closed"),
        );
        assert!(err.source.is_some());
        assert_eq!(err.to_string(), "read failed");
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        let err: Error = json_err.into();
        assert!(err.is_json());
        assert!(err.source.is_some());
    }

    #[test]
    fn test_from_url_parse_error() {
        let url_err = url::Url::parse("sis.example.edu/ws/v1").unwrap_err();
        let err: Error = url_err.into();
        assert!(matches!(err.kind, ErrorKind::InvalidUrl(_)));
    }
}
