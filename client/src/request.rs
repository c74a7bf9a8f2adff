use crate::ClientConfig;
use bce_auth_v1::BCE_QUERY_ENCODE_SET;
use bce_core::hash::base64_md5;
use bce_core::{Error, Result};
use bytes::Bytes;
use http::header::{HeaderName, CONTENT_LENGTH, CONTENT_TYPE, HOST, USER_AGENT};
use http::{HeaderMap, HeaderValue, Method, Uri};
use percent_encoding::utf8_percent_encode;
use serde::Serialize;

/// A service request before signing: method, path, query, headers and body.
///
/// Service crates build these and hand them to
/// [`BceClient::send`](crate::BceClient::send); `build` marshals them into an
/// `http::Request<Bytes>` against a concrete endpoint.
#[derive(Debug, Clone)]
pub struct ServiceRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    headers: HeaderMap,
    body: Bytes,
    stamp_content_md5: bool,
}

impl ServiceRequest {
    /// Create a request for the given method and absolute path.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        let path = path.into();
        debug_assert!(path.starts_with('/'), "path must be absolute");

        Self {
            method,
            path,
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
            stamp_content_md5: false,
        }
    }

    /// Shorthand for a GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Shorthand for a PUT request.
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// Shorthand for a POST request.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Shorthand for a DELETE request.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Shorthand for a HEAD request.
    pub fn head(path: impl Into<String>) -> Self {
        Self::new(Method::HEAD, path)
    }

    /// The HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The absolute path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Append a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Append a query parameter when the value is present.
    pub fn query_opt(self, key: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(v) => self.query(key, v),
            None => self,
        }
    }

    /// Append a bare query parameter, e.g. `?uploads`.
    pub fn query_flag(self, key: impl Into<String>) -> Self {
        self.query(key, "")
    }

    /// Set a header.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Set a raw byte body.
    pub fn body(mut self, body: Bytes) -> Self {
        self.body = body;
        self
    }

    /// Serialize `value` as the JSON body and set the content type.
    pub fn json<T: Serialize>(mut self, value: &T) -> Result<Self> {
        let body = serde_json::to_vec(value)
            .map_err(|e| Error::request_invalid("failed to serialize request body").with_source(e))?;
        self.body = Bytes::from(body);
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(self)
    }

    /// Stamp a `Content-MD5` header over the body when building.
    pub fn with_content_md5(mut self) -> Self {
        self.stamp_content_md5 = true;
        self
    }

    /// Marshal into an `http::Request<Bytes>` against the configured endpoint.
    ///
    /// Stamps `Host`, `User-Agent`, `Content-Length` (for bodied requests)
    /// and optionally `Content-MD5`. `x-bce-date` and `Authorization` are the
    /// signer's business.
    pub fn build(&self, config: &ClientConfig) -> Result<http::Request<Bytes>> {
        let query = self
            .query
            .iter()
            .map(|(k, v)| {
                let k = utf8_percent_encode(k, &BCE_QUERY_ENCODE_SET);
                if v.is_empty() {
                    k.to_string()
                } else {
                    format!("{k}={}", utf8_percent_encode(v, &BCE_QUERY_ENCODE_SET))
                }
            })
            .collect::<Vec<_>>()
            .join("&");

        let path_and_query = if query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{query}", self.path)
        };

        let uri = Uri::builder()
            .scheme(config.scheme().clone())
            .authority(config.authority().clone())
            .path_and_query(path_and_query)
            .build()?;

        let mut builder = http::Request::builder().method(self.method.clone()).uri(uri);

        if let Some(headers) = builder.headers_mut() {
            headers.extend(self.headers.clone());

            headers.insert(HOST, HeaderValue::from_str(config.authority().as_str())?);
            headers.insert(USER_AGENT, HeaderValue::from_str(config.user_agent())?);

            if !self.body.is_empty() || self.method == Method::PUT || self.method == Method::POST {
                headers.insert(CONTENT_LENGTH, HeaderValue::from(self.body.len()));
            }
            if self.stamp_content_md5 {
                headers.insert(
                    HeaderName::from_static("content-md5"),
                    HeaderValue::from_str(&base64_md5(&self.body))?,
                );
            }
        }

        Ok(builder.body(self.body.clone())?)
    }
}
