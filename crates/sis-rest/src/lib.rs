//! # busbar-sis-rest
//!
//! Authenticated access to a student information system's REST API.
//!
//! [`Requester`] obtains a session token through the OAuth2 client
//! credentials flow, attaches it to every call, and re-authenticates when
//! the server answers 401. [`Response`] peels the SIS envelope off a
//! decoded body so callers see the records they asked for.
//!
//! ## Example
//!
//! ```rust,ignore
//! use busbar_sis_rest::Requester;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut sis = Requester::from_env()?;
//!
//!     let students = sis.get("/ws/v1/school/4/student", "student").await?;
//!     println!("{} students", students.len());
//!
//!     if let Some(expansions) = students.expansions().first() {
//!         println!("first expansion: {expansions}");
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Table queries
//!
//! PowerQuery and table endpoints wrap every row as
//! `{"tables": {"<table>": {...}}}`. Row reads through [`Response::get`]
//! and [`Response::iter`] already return the inner row;
//! [`Response::squash_table_response`] rewrites the stored payload too.

mod error;
mod infer;
mod observer;
mod options;
mod requester;
mod response;

pub use error::{Error, ErrorKind, Result};
pub use infer::{infer, split_comma_list, Inferred, EXPANSIONS_KEY, EXTENSIONS_KEY};
pub use observer::{CallObserver, CallRecord, TracingObserver};
pub use options::CallOptions;
pub use requester::{Requester, BASE_URL_ENV, MAX_ATTEMPTS};
pub use response::{Iter, Offset, Response, MAX_LIST_GAP};

pub use busbar_sis_auth::{AccessToken, ClientCredentials};
pub use busbar_sis_client::{ClientConfig, RequestMethod};
