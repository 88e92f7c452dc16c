//! # sis-client
//!
//! Core HTTP client infrastructure for Student Information System APIs.
//!
//! This crate provides the transport layer that the authentication and
//! REST crates build on:
//! - Connection pooling and timeouts
//! - Compressed responses (gzip, deflate)
//! - Request building with case-insensitive header overrides
//! - Request/response tracing
//!
//! It deliberately makes no retry decisions. Status handling belongs to the
//! caller (see `busbar-sis-rest`), which needs to see every 4xx/5xx as-is.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Application Layer                        │
//! │  (sis-rest: Requester, Response normalizer)                 │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    sis-auth                                 │
//! │  - Client credentials + token exchange                      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    SisHttpClient                            │
//! │  - Raw HTTP, compression, tracing                           │
//! │  - Request building with forced headers                     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use busbar_sis_client::{ClientConfig, SisHttpClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), busbar_sis_client::Error> {
//!     let client = SisHttpClient::new(ClientConfig::default())?;
//!
//!     let response = client
//!         .send(
//!             client
//!                 .get("https://sis.example.edu/ws/v1/district")
//!                 .bearer_auth("token")
//!                 .header("Accept", "application/json"),
//!         )
//!         .await?;
//!
//!     println!("{}", response.status());
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod error;
mod request;
mod response;

pub use client::SisHttpClient;
pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{Error, ErrorKind, Result};
pub use request::{RequestBody, RequestBuilder, RequestMethod};
pub use response::Response;

/// User-Agent string for the client
pub const USER_AGENT: &str = concat!("busbar-sis-api/", env!("CARGO_PKG_VERSION"));

/// Join a base URL and a path, tolerating stray slashes on either side.
///
/// Absolute `http(s)://` paths are returned unchanged.
pub fn join_url(base_url: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    let base = base_url.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url() {
        assert_eq!(
            join_url("https://sis.example.edu", "/ws/v1/district"),
            "https://sis.example.edu/ws/v1/district"
        );
        assert_eq!(
            join_url("https://sis.example.edu/", "ws/v1/district"),
            "https://sis.example.edu/ws/v1/district"
        );
        assert_eq!(
            join_url("https://sis.example.edu", "https://other.example.edu/x"),
            "https://other.example.edu/x"
        );
    }
}
