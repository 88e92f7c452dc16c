//! OAuth client credentials.

use base64::{engine::general_purpose, Engine as _};

use crate::error::{Error, ErrorKind, Result};
use crate::{CLIENT_ID_ENV, CLIENT_SECRET_ENV};

/// OAuth client id and secret obtained from the SIS plugin installation.
///
/// Values are not validated on construction; empty values surface as
/// [`ErrorKind::MissingCredentials`] when authentication is attempted.
/// The secret is redacted in Debug output.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientCredentials {
    client_id: String,
    client_secret: String,
}

impl std::fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

impl ClientCredentials {
    /// Create credentials from a client id and secret.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Load credentials from environment variables.
    ///
    /// Reads `SIS_CLIENT_ID` / `SIS_CLIENT_SECRET`, falling back to
    /// `POWERSCHOOL_CLIENT_ID` / `POWERSCHOOL_CLIENT_SECRET`.
    pub fn from_env() -> Result<Self> {
        let client_id = std::env::var(CLIENT_ID_ENV)
            .or_else(|_| std::env::var("POWERSCHOOL_CLIENT_ID"))
            .map_err(|_| Error::new(ErrorKind::EnvVar(CLIENT_ID_ENV.to_string())))?;

        let client_secret = std::env::var(CLIENT_SECRET_ENV)
            .or_else(|_| std::env::var("POWERSCHOOL_CLIENT_SECRET"))
            .map_err(|_| Error::new(ErrorKind::EnvVar(CLIENT_SECRET_ENV.to_string())))?;

        Ok(Self::new(client_id, client_secret))
    }

    /// Get the client id.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Returns true if both id and secret are non-empty.
    pub fn is_complete(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty()
    }

    /// Value for the `Authorization` header of the token exchange:
    /// `Basic base64(id:secret)`.
    pub fn basic_authorization(&self) -> Result<String> {
        if !self.is_complete() {
            return Err(Error::new(ErrorKind::MissingCredentials));
        }
        let raw = format!("{}:{}", self.client_id, self.client_secret);
        Ok(format!("Basic {}", general_purpose::STANDARD.encode(raw)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_authorization() {
        let creds = ClientCredentials::new("plugin-id", "plugin-secret");
        assert_eq!(
            creds.basic_authorization().unwrap(),
            format!(
                "Basic {}",
                general_purpose::STANDARD.encode("plugin-id:plugin-secret")
            )
        );
    }

    #[test]
    fn test_empty_values_fail_at_use_not_construction() {
        let creds = ClientCredentials::new("", "secret");
        assert!(!creds.is_complete());
        let err = creds.basic_authorization().unwrap_err();
        assert!(err.is_missing_credentials());

        let creds = ClientCredentials::new("id", "");
        assert!(creds.basic_authorization().unwrap_err().is_missing_credentials());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let creds = ClientCredentials::new("plugin-id", "super_secret_value");
        let debug_output = format!("{:?}", creds);
        assert!(debug_output.contains("plugin-id"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_value"));
    }
}
