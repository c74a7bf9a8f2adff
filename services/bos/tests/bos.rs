use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bce_auth_v1::{RequestSigner, StaticCredentialProvider};
use bce_bos::{BosClient, ListObjectsRequest};
use bce_client::{BceClient, ClientConfig, NoRetryPolicy};
use bce_core::{Context, HttpSend, Result, Signer};
use bytes::Bytes;
use http::StatusCode;
use pretty_assertions::assert_eq;

/// HttpSend that replays canned responses and records requests.
#[derive(Debug, Clone, Default)]
struct MockHttpSend {
    responses: Arc<Mutex<Vec<http::Response<Bytes>>>>,
    requests: Arc<Mutex<Vec<http::Request<Bytes>>>>,
}

impl MockHttpSend {
    fn with_responses(mut responses: Vec<http::Response<Bytes>>) -> Self {
        // Popped back-to-front.
        responses.reverse();
        Self {
            responses: Arc::new(Mutex::new(responses)),
            ..Default::default()
        }
    }

    fn sent(&self) -> Vec<http::Request<Bytes>> {
        std::mem::take(&mut self.requests.lock().unwrap())
    }
}

#[async_trait]
impl HttpSend for MockHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        self.requests.lock().unwrap().push(req);
        self.responses
            .lock()
            .unwrap()
            .pop()
            .ok_or_else(|| bce_core::Error::unexpected("connection refused"))
    }
}

fn response(status: StatusCode, body: &'static str) -> http::Response<Bytes> {
    http::Response::builder()
        .status(status)
        .body(Bytes::from_static(body.as_bytes()))
        .unwrap()
}

fn bos_client(mock: MockHttpSend) -> BosClient {
    let ctx = Context::new().with_http_send(mock);
    let config = ClientConfig::new("bj.bcebos.com")
        .unwrap()
        .with_retry_policy(NoRetryPolicy);
    let signer = Signer::new(
        ctx.clone(),
        StaticCredentialProvider::new("ak", "sk"),
        RequestSigner::new(),
    );
    BosClient::new(BceClient::new(ctx, config, signer))
}

#[tokio::test]
async fn test_list_buckets() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mock = MockHttpSend::with_responses(vec![response(
        StatusCode::OK,
        r#"{
            "owner": {"id": "account-1"},
            "buckets": [
                {"name": "logs", "location": "bj", "creationDate": "2024-01-02T03:04:05Z"},
                {"name": "backup", "location": "gz", "creationDate": "2024-02-03T04:05:06Z"}
            ]
        }"#,
    )]);
    let bos = bos_client(mock.clone());

    let resp = bos.list_buckets().await.unwrap();
    assert_eq!(resp.buckets.len(), 2);
    assert_eq!(resp.buckets[0].name, "logs");

    let sent = mock.sent();
    assert_eq!(sent[0].method(), http::Method::GET);
    assert_eq!(sent[0].uri().path(), "/");
    assert!(sent[0].headers().contains_key(http::header::AUTHORIZATION));
}

#[tokio::test]
async fn test_list_objects_query() {
    let mock = MockHttpSend::with_responses(vec![response(
        StatusCode::OK,
        r#"{
            "name": "logs",
            "maxKeys": 2,
            "isTruncated": true,
            "nextMarker": "2024/02.log",
            "contents": [{"key": "2024/01.log", "size": 10}, {"key": "2024/02.log", "size": 20}]
        }"#,
    )]);
    let bos = bos_client(mock.clone());

    let resp = bos
        .list_objects(
            "logs",
            ListObjectsRequest::new()
                .with_prefix("2024/")
                .with_max_keys(2),
        )
        .await
        .unwrap();
    assert!(resp.is_truncated);
    assert_eq!(resp.next_marker.as_deref(), Some("2024/02.log"));
    assert_eq!(resp.contents.len(), 2);

    let sent = mock.sent();
    assert_eq!(sent[0].uri().path(), "/logs");
    assert_eq!(sent[0].uri().query(), Some("prefix=2024%2F&maxKeys=2"));
}

#[tokio::test]
async fn test_put_object_stamps_md5_and_returns_etag() {
    let mock = MockHttpSend::with_responses(vec![http::Response::builder()
        .status(StatusCode::OK)
        .header("etag", "\"0123abcd\"")
        .body(Bytes::new())
        .unwrap()]);
    let bos = bos_client(mock.clone());

    let etag = bos
        .put_object(
            "logs",
            "2024/01.log",
            Bytes::from_static(b"hello"),
            Some("text/plain"),
        )
        .await
        .unwrap();
    assert_eq!(etag, "0123abcd");

    let sent = mock.sent();
    assert_eq!(sent[0].method(), http::Method::PUT);
    assert_eq!(sent[0].uri().path(), "/logs/2024/01.log");
    assert_eq!(sent[0].headers()["content-type"], "text/plain");
    assert_eq!(
        sent[0].headers()["content-md5"],
        bce_core::hash::base64_md5(b"hello")
    );
}

#[tokio::test]
async fn test_get_object_returns_body_and_meta() {
    let mock = MockHttpSend::with_responses(vec![http::Response::builder()
        .status(StatusCode::OK)
        .header("content-length", "5")
        .header("content-type", "text/plain")
        .header("etag", "\"0123abcd\"")
        .header("last-modified", "Wed, 31 Jan 2024 00:00:00 GMT")
        .body(Bytes::from_static(b"hello"))
        .unwrap()]);
    let bos = bos_client(mock.clone());

    let object = bos.get_object("logs", "2024/01.log").await.unwrap();
    assert_eq!(object.body.as_ref(), b"hello");
    assert_eq!(object.meta.content_length, 5);
    assert_eq!(object.meta.etag.as_deref(), Some("0123abcd"));
    assert_eq!(
        object.meta.last_modified.as_deref(),
        Some("Wed, 31 Jan 2024 00:00:00 GMT")
    );
}

#[tokio::test]
async fn test_does_bucket_exist() {
    // Existing bucket.
    let mock = MockHttpSend::with_responses(vec![response(StatusCode::OK, "")]);
    assert!(bos_client(mock).does_bucket_exist("logs").await.unwrap());

    // Missing bucket.
    let mock = MockHttpSend::with_responses(vec![response(StatusCode::NOT_FOUND, "")]);
    assert!(!bos_client(mock).does_bucket_exist("logs").await.unwrap());

    // Bucket owned by someone else still exists.
    let mock = MockHttpSend::with_responses(vec![response(StatusCode::FORBIDDEN, "")]);
    assert!(bos_client(mock).does_bucket_exist("logs").await.unwrap());
}

#[tokio::test]
async fn test_copy_object_sets_source_header() {
    let mock = MockHttpSend::with_responses(vec![response(
        StatusCode::OK,
        r#"{"eTag": "feed0123", "lastModified": "2024-01-31T00:00:00Z"}"#,
    )]);
    let bos = bos_client(mock.clone());

    let etag = bos
        .copy_object("src-bucket", "a/b.txt", "dst-bucket", "c/d.txt")
        .await
        .unwrap();
    assert_eq!(etag, "feed0123");

    let sent = mock.sent();
    assert_eq!(sent[0].uri().path(), "/dst-bucket/c/d.txt");
    assert_eq!(
        sent[0].headers()["x-bce-copy-source"],
        "/src-bucket/a/b.txt"
    );
}

#[tokio::test]
async fn test_delete_object_propagates_service_error() {
    let mock = MockHttpSend::with_responses(vec![response(
        StatusCode::NOT_FOUND,
        r#"{"code":"NoSuchKey","message":"key not found","requestId":"r-9"}"#,
    )]);
    let bos = bos_client(mock);

    let err = bos.delete_object("logs", "missing.log").await.unwrap_err();
    let service_err = bce_client::as_service_error(&err).unwrap();
    assert!(service_err.is_not_found());
    assert_eq!(service_err.request_id, "r-9");
}

#[tokio::test]
async fn test_generate_presigned_url() {
    let bos = bos_client(MockHttpSend::default());

    let uri = bos
        .generate_presigned_url("logs", "2024/01.log", Duration::from_secs(1800))
        .await
        .unwrap();

    assert_eq!(uri.path(), "/logs/2024/01.log");
    let query = uri.query().unwrap();
    assert!(query.contains("authorization=bce-auth-v1%2Fak%2F"));
}
