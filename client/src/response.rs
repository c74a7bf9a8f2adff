use crate::error::X_BCE_REQUEST_ID;
use bce_core::{Error, Result};
use bytes::Bytes;
use http::StatusCode;
use serde::de::DeserializeOwned;

/// A successful service response: status, headers and the collected body.
#[derive(Debug)]
pub struct ServiceResponse {
    parts: http::response::Parts,
    body: Bytes,
}

impl ServiceResponse {
    pub(crate) fn new(parts: http::response::Parts, body: Bytes) -> Self {
        Self { parts, body }
    }

    /// HTTP status.
    pub fn status(&self) -> StatusCode {
        self.parts.status
    }

    /// All response headers.
    pub fn headers(&self) -> &http::HeaderMap {
        &self.parts.headers
    }

    /// A single header as a string, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.parts.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// The service-assigned request id.
    pub fn request_id(&self) -> Option<&str> {
        self.header(X_BCE_REQUEST_ID)
    }

    /// The entity tag, with surrounding quotes stripped.
    pub fn etag(&self) -> Option<&str> {
        self.header("etag").map(|v| v.trim_matches('"'))
    }

    /// Borrow the body.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Take the body.
    pub fn into_body(self) -> Bytes {
        self.body
    }

    /// Deserialize the JSON body.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body)
            .map_err(|e| Error::unexpected("failed to parse response body").with_source(e))
    }
}
