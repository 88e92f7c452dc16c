//! Per-call request options.

use busbar_sis_client::{RequestBody, RequestBuilder, RequestMethod};
use serde::Serialize;
use serde_json::Value;

use crate::error::Result;

/// Headers, query parameters and body for one call.
///
/// `Accept`, `Content-Type` and `Authorization` set here are overridden by
/// the requester.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    headers: Vec<(String, String)>,
    query: Vec<(String, String)>,
    body: Option<RequestBody>,
}

impl CallOptions {
    /// Empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Add a query parameter.
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Set a JSON body.
    pub fn json<T: Serialize>(self, body: &T) -> Result<Self> {
        Ok(self.json_value(serde_json::to_value(body)?))
    }

    /// Set a raw JSON body.
    pub fn json_value(mut self, body: Value) -> Self {
        self.body = Some(RequestBody::Json(body));
        self
    }

    /// Set a body that is sent byte for byte, e.g. JSON the caller has
    /// already encoded.
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(RequestBody::Text(body.into()));
        self
    }

    pub(crate) fn to_request(&self, method: RequestMethod, url: &str) -> RequestBuilder {
        let mut request = RequestBuilder::new(method, url);
        for (name, value) in &self.headers {
            request = request.header(name, value);
        }
        for (name, value) in &self.query {
            request = request.query(name, value);
        }
        match &self.body {
            Some(RequestBody::Json(value)) => request = request.json_value(value.clone()),
            Some(RequestBody::Text(text)) => request = request.text(text.clone()),
            None => {}
        }
        request
    }
}
