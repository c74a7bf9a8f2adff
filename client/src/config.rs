use crate::retry::{BackoffRetryPolicy, RetryPolicy};
use bce_core::{Error, Result};
use http::uri::{Authority, Scheme};
use once_cell::sync::Lazy;
use std::fmt::Debug;
use std::sync::Arc;

static DEFAULT_USER_AGENT: Lazy<String> =
    Lazy::new(|| format!("bce-sdk-rust/{}", env!("CARGO_PKG_VERSION")));

/// Configuration for a service client: where to send requests and how to
/// retry them.
#[derive(Clone)]
pub struct ClientConfig {
    scheme: Scheme,
    authority: Authority,
    user_agent: String,
    retry: Arc<dyn RetryPolicy>,
}

impl Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("scheme", &self.scheme)
            .field("authority", &self.authority)
            .field("user_agent", &self.user_agent)
            .field("retry", &self.retry)
            .finish()
    }
}

impl ClientConfig {
    /// Create a config for the given endpoint.
    ///
    /// The endpoint is `host[:port]` with an optional scheme; the scheme
    /// defaults to https:
    ///
    /// ```
    /// use bce_client::ClientConfig;
    ///
    /// let cfg = ClientConfig::new("bj.bcebos.com").unwrap();
    /// assert_eq!(cfg.endpoint(), "https://bj.bcebos.com");
    ///
    /// let cfg = ClientConfig::new("http://127.0.0.1:8080").unwrap();
    /// assert_eq!(cfg.endpoint(), "http://127.0.0.1:8080");
    /// ```
    pub fn new(endpoint: &str) -> Result<Self> {
        let (scheme, rest) = match endpoint.split_once("://") {
            Some(("http", rest)) => (Scheme::HTTP, rest),
            Some(("https", rest)) => (Scheme::HTTPS, rest),
            Some((other, _)) => {
                return Err(Error::config_invalid(format!(
                    "unsupported endpoint scheme: {other}"
                )))
            }
            None => (Scheme::HTTPS, endpoint),
        };

        let rest = rest.trim_end_matches('/');
        if rest.is_empty() {
            return Err(Error::config_invalid("endpoint host is empty"));
        }
        let authority: Authority = rest
            .parse()
            .map_err(|e| Error::config_invalid(format!("invalid endpoint {endpoint}: {e}")))?;

        Ok(Self {
            scheme,
            authority,
            user_agent: DEFAULT_USER_AGENT.clone(),
            retry: Arc::new(BackoffRetryPolicy::default()),
        })
    }

    /// Override the `User-Agent` value stamped on every request.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Replace the retry policy.
    pub fn with_retry_policy(mut self, retry: impl RetryPolicy) -> Self {
        self.retry = Arc::new(retry);
        self
    }

    /// The endpoint as `scheme://authority`.
    pub fn endpoint(&self) -> String {
        format!("{}://{}", self.scheme, self.authority)
    }

    pub(crate) fn scheme(&self) -> &Scheme {
        &self.scheme
    }

    pub(crate) fn authority(&self) -> &Authority {
        &self.authority
    }

    pub(crate) fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub(crate) fn retry(&self) -> &dyn RetryPolicy {
        self.retry.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_parsing() {
        let cfg = ClientConfig::new("bj.bcebos.com").unwrap();
        assert_eq!(cfg.endpoint(), "https://bj.bcebos.com");

        let cfg = ClientConfig::new("http://bcc.bj.example.com/").unwrap();
        assert_eq!(cfg.endpoint(), "http://bcc.bj.example.com");

        let cfg = ClientConfig::new("https://127.0.0.1:8443").unwrap();
        assert_eq!(cfg.endpoint(), "https://127.0.0.1:8443");

        assert!(ClientConfig::new("").is_err());
        assert!(ClientConfig::new("ftp://host").is_err());
        assert!(ClientConfig::new("https://ho st").is_err());
    }
}
