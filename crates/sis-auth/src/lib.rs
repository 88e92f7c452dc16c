//! # sis-auth
//!
//! Authentication for Student Information System APIs using the OAuth 2.0
//! client credentials grant.
//!
//! ## Security
//!
//! - Client secrets and access tokens are redacted in Debug output
//! - Tracing spans skip credential parameters
//! - Missing credentials are detected before any network call is made
//!
//! ## Example
//!
//! ```rust,ignore
//! use busbar_sis_auth::{ClientCredentials, ClientCredentialsFlow};
//! use busbar_sis_client::SisHttpClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), busbar_sis_auth::Error> {
//!     let creds = ClientCredentials::from_env()?;
//!     let flow = ClientCredentialsFlow::new(creds);
//!     let http = SisHttpClient::default_client()?;
//!
//!     let token = flow.authenticate(&http, "https://sis.example.edu").await?;
//!     println!("token obtained at {}", token.obtained());
//!     Ok(())
//! }
//! ```

mod credentials;
mod error;
mod oauth;

pub use credentials::ClientCredentials;
pub use error::{Error, ErrorKind, Result};
pub use oauth::{AccessToken, ClientCredentialsFlow, TokenResponse, TOKEN_PATH};

/// Environment variable holding the OAuth client id.
pub const CLIENT_ID_ENV: &str = "SIS_CLIENT_ID";

/// Environment variable holding the OAuth client secret.
pub const CLIENT_SECRET_ENV: &str = "SIS_CLIENT_SECRET";
