//! # busbar-sis-api
//!
//! A Student Information System (PowerSchool-style) REST client for Rust.
//!
//! ## Security
//!
//! - Client secrets and tokens are redacted in Debug output
//! - Tracing skips credential parameters
//! - Error messages sanitize bearer tokens
//!
//! ## Crates
//!
//! - **busbar-sis-client** - HTTP transport with compression, timeouts and tracing
//! - **busbar-sis-auth** - OAuth 2.0 client credentials exchange
//! - **busbar-sis-rest** - Authenticated calls with 401 retry, response normalization
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use busbar_sis_api::{CallOptions, RequestMethod, Requester};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut sis = Requester::new("https://sis.example.edu", "client-id", "client-secret")?;
//!
//!     let students = sis
//!         .fetch(
//!             RequestMethod::Get,
//!             "/ws/v1/school/4/student",
//!             &CallOptions::new().query("expansions", "demographics"),
//!             "student",
//!         )
//!         .await?;
//!
//!     for student in &students {
//!         println!("{}", student["name"]["last_name"]);
//!     }
//!
//!     Ok(())
//! }
//! ```

#[cfg(feature = "auth")]
pub use busbar_sis_auth as auth;
#[cfg(feature = "client")]
pub use busbar_sis_client as client;
#[cfg(feature = "rest")]
pub use busbar_sis_rest as rest;

#[cfg(feature = "auth")]
pub use busbar_sis_auth::{AccessToken, ClientCredentials};
#[cfg(feature = "client")]
pub use busbar_sis_client::{ClientConfig, RequestMethod, SisHttpClient};
#[cfg(feature = "rest")]
pub use busbar_sis_rest::{CallOptions, Requester, Response};
