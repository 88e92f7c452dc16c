//! Hook for observing call outcomes.
//!
//! The requester reports every finished call here instead of writing to a
//! logger itself. [`TracingObserver`] is installed by default.

use busbar_sis_client::RequestMethod;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::Error;

/// What was called, and how it ended.
#[derive(Debug, Clone, Copy)]
pub struct CallRecord<'a> {
    pub method: RequestMethod,
    pub path: &'a str,
    /// `None` when the SIS never answered the resource call.
    pub status: Option<u16>,
    /// Physical attempts made for this logical call.
    pub attempts: u32,
}

/// Receives the outcome of every logical call.
pub trait CallObserver: Send + Sync {
    /// The call succeeded; `body` is the decoded response.
    fn on_success(&self, call: &CallRecord<'_>, body: &Value);

    /// The call failed with an HTTP error or an undecodable body.
    fn on_failure(&self, call: &CallRecord<'_>, raw_body: &str);

    /// The call failed before a resource response could be read: missing
    /// credentials, a failed token exchange, or a transport error.
    fn on_error(&self, call: &CallRecord<'_>, error: &Error);
}

/// Forwards outcomes to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl CallObserver for TracingObserver {
    fn on_success(&self, call: &CallRecord<'_>, body: &Value) {
        debug!(
            method = %call.method,
            path = call.path,
            status = call.status,
            attempts = call.attempts,
            body = %body,
            "SIS call succeeded"
        );
    }

    fn on_failure(&self, call: &CallRecord<'_>, raw_body: &str) {
        info!(
            method = %call.method,
            path = call.path,
            status = call.status,
            attempts = call.attempts,
            body = raw_body,
            "SIS call failed"
        );
    }

    fn on_error(&self, call: &CallRecord<'_>, error: &Error) {
        warn!(
            method = %call.method,
            path = call.path,
            status = call.status,
            attempts = call.attempts,
            error = %error,
            "SIS call did not complete"
        );
    }
}
