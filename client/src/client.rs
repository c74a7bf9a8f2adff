use crate::error::ServiceError;
use crate::retry::should_retry_status;
use crate::{ClientConfig, ServiceRequest, ServiceResponse};
use bce_auth_v1::Credential;
use bce_core::{Context, Result, Signer};
use http::Uri;
use log::{debug, warn};
use std::time::Duration;

/// The generic dispatch every service client goes through.
///
/// `send` marshals a [`ServiceRequest`] against the configured endpoint,
/// signs it, pushes it through the context's HTTP transport with the
/// configured retry policy, and classifies the outcome.
#[derive(Debug, Clone)]
pub struct BceClient {
    ctx: Context,
    config: ClientConfig,
    signer: Signer<Credential>,
}

impl BceClient {
    /// Create a new client.
    pub fn new(ctx: Context, config: ClientConfig, signer: Signer<Credential>) -> Self {
        Self {
            ctx,
            config,
            signer,
        }
    }

    /// The client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send a request and return the successful response.
    ///
    /// Transport failures and transient HTTP failures (408/429/5xx except
    /// 501) are retried per the configured policy; each attempt is signed
    /// fresh so the timestamp stays current. Non-2xx responses that are not
    /// retried come back as [`ServiceError`]-backed errors.
    pub async fn send(&self, req: ServiceRequest) -> Result<ServiceResponse> {
        let mut retries = 0u32;

        loop {
            let (mut parts, body) = req.build(&self.config)?.into_parts();
            self.signer.sign(&mut parts, None).await?;
            let signed = http::Request::from_parts(parts, body);

            let method = req.method().clone();
            let path = req.path().to_string();

            match self.ctx.http_send(signed).await {
                Ok(resp) if resp.status().is_success() => {
                    let (parts, body) = resp.into_parts();
                    debug!("{method} {path} -> {}", parts.status);
                    return Ok(ServiceResponse::new(parts, body));
                }
                Ok(resp) => {
                    let status = resp.status();
                    if should_retry_status(status) {
                        if let Some(delay) = self.config.retry().backoff(retries) {
                            warn!(
                                "{method} {path} -> {status}, retry {} in {delay:?}",
                                retries + 1
                            );
                            tokio::time::sleep(delay).await;
                            retries += 1;
                            continue;
                        }
                    }

                    let (parts, body) = resp.into_parts();
                    let err = ServiceError::from_response(&parts, &body);
                    debug!("{method} {path} -> {err}");
                    return Err(err.into());
                }
                Err(e) => {
                    if let Some(delay) = self.config.retry().backoff(retries) {
                        warn!("{method} {path} failed: {e}, retry {} in {delay:?}", retries + 1);
                        tokio::time::sleep(delay).await;
                        retries += 1;
                        continue;
                    }
                    return Err(e);
                }
            }
        }
    }

    /// Produce a pre-signed URL for the request, valid for `expires_in`.
    ///
    /// Nothing is sent; the authentication travels in the query string.
    pub async fn presign(&self, req: ServiceRequest, expires_in: Duration) -> Result<Uri> {
        let (mut parts, _) = req.build(&self.config)?.into_parts();
        self.signer.sign(&mut parts, Some(expires_in)).await?;
        Ok(parts.uri)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::as_service_error;
    use crate::retry::BackoffRetryPolicy;
    use async_trait::async_trait;
    use bce_auth_v1::{RequestSigner, StaticCredentialProvider};
    use bce_core::HttpSend;
    use bytes::Bytes;
    use http::StatusCode;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// HttpSend that replays canned responses and records requests.
    #[derive(Debug, Clone, Default)]
    struct MockHttpSend {
        responses: Arc<Mutex<Vec<http::Response<Bytes>>>>,
        requests: Arc<Mutex<Vec<http::Request<Bytes>>>>,
        calls: Arc<AtomicUsize>,
    }

    impl MockHttpSend {
        fn with_responses(responses: Vec<http::Response<Bytes>>) -> Self {
            // Popped back-to-front.
            let mut responses = responses;
            responses.reverse();
            Self {
                responses: Arc::new(Mutex::new(responses)),
                ..Default::default()
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl HttpSend for MockHttpSend {
        async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requests.lock().unwrap().push(req);
            self.responses
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| bce_core::Error::unexpected("connection refused"))
        }
    }

    fn response(status: StatusCode, body: &'static [u8]) -> http::Response<Bytes> {
        http::Response::builder()
            .status(status)
            .body(Bytes::from_static(body))
            .unwrap()
    }

    fn test_client(mock: MockHttpSend) -> BceClient {
        let ctx = Context::new().with_http_send(mock);
        let config = ClientConfig::new("bj.bcebos.com")
            .unwrap()
            .with_retry_policy(BackoffRetryPolicy {
                max_retries: 2,
                base_delay: Duration::from_millis(1),
                max_delay: Duration::from_millis(2),
            });
        let signer = Signer::new(
            ctx.clone(),
            StaticCredentialProvider::new("ak", "sk"),
            RequestSigner::new(),
        );
        BceClient::new(ctx, config, signer)
    }

    #[tokio::test]
    async fn test_send_success() {
        let mock = MockHttpSend::with_responses(vec![response(StatusCode::OK, b"{}")]);
        let client = test_client(mock.clone());

        let resp = client.send(ServiceRequest::get("/bucket")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(mock.calls(), 1);

        // The dispatched request was signed.
        let sent = mock.requests.lock().unwrap();
        assert!(sent[0].headers().contains_key(http::header::AUTHORIZATION));
        assert!(sent[0].headers().contains_key("x-bce-date"));
        assert_eq!(sent[0].uri().to_string(), "https://bj.bcebos.com/bucket");
    }

    #[tokio::test]
    async fn test_send_retries_transient_errors() {
        let _ = env_logger::builder().is_test(true).try_init();

        let mock = MockHttpSend::with_responses(vec![
            response(StatusCode::SERVICE_UNAVAILABLE, b""),
            response(StatusCode::INTERNAL_SERVER_ERROR, b""),
            response(StatusCode::OK, b"{}"),
        ]);
        let client = test_client(mock.clone());

        let resp = client.send(ServiceRequest::get("/bucket")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(mock.calls(), 3);
    }

    #[tokio::test]
    async fn test_send_gives_up_after_max_retries() {
        let mock = MockHttpSend::with_responses(vec![
            response(StatusCode::SERVICE_UNAVAILABLE, b""),
            response(StatusCode::SERVICE_UNAVAILABLE, b""),
            response(StatusCode::SERVICE_UNAVAILABLE, b""),
            response(StatusCode::SERVICE_UNAVAILABLE, b""),
        ]);
        let client = test_client(mock.clone());

        let err = client
            .send(ServiceRequest::get("/bucket"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), bce_core::ErrorKind::Service);
        // Initial attempt plus two retries.
        assert_eq!(mock.calls(), 3);
    }

    #[tokio::test]
    async fn test_send_does_not_retry_client_errors() {
        let mock = MockHttpSend::with_responses(vec![response(
            StatusCode::FORBIDDEN,
            br#"{"code":"AccessDenied","message":"nope","requestId":"r-1"}"#,
        )]);
        let client = test_client(mock.clone());

        let err = client
            .send(ServiceRequest::get("/bucket"))
            .await
            .unwrap_err();
        assert_eq!(mock.calls(), 1);

        let service_err = as_service_error(&err).unwrap();
        assert_eq!(service_err.code, "AccessDenied");
        assert_eq!(service_err.request_id, "r-1");
    }

    #[tokio::test]
    async fn test_send_retries_transport_errors() {
        // Empty response list: every call is a transport error.
        let mock = MockHttpSend::with_responses(vec![]);
        let client = test_client(mock.clone());

        let err = client
            .send(ServiceRequest::get("/bucket"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), bce_core::ErrorKind::Unexpected);
        assert_eq!(mock.calls(), 3);
    }

    #[tokio::test]
    async fn test_presign() {
        let mock = MockHttpSend::default();
        let client = test_client(mock.clone());

        let uri = client
            .presign(
                ServiceRequest::get("/bucket/key"),
                Duration::from_secs(600),
            )
            .await
            .unwrap();

        assert!(uri.query().unwrap().contains("authorization=bce-auth-v1%2F"));
        // Nothing was sent.
        assert_eq!(mock.calls(), 0);
    }
}
