use bytes::Bytes;
use http::StatusCode;
use serde::Deserialize;
use std::fmt;

/// Header carrying the service-assigned request id.
pub const X_BCE_REQUEST_ID: &str = "x-bce-request-id";

/// The JSON error body every service returns on failure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    request_id: String,
}

/// An API-level failure parsed from a non-2xx response.
#[derive(Debug, Clone)]
pub struct ServiceError {
    /// HTTP status of the failed response.
    pub status: StatusCode,
    /// Service error code, e.g. `NoSuchKey`, `AccessDenied`.
    pub code: String,
    /// Human readable message from the service.
    pub message: String,
    /// Request id, for support tickets.
    pub request_id: String,
}

impl ServiceError {
    /// Build a ServiceError from a failed response.
    ///
    /// Bodies that are not the expected JSON shape (HTML error pages from
    /// intermediaries, empty HEAD responses) degrade to the status line.
    pub fn from_response(parts: &http::response::Parts, body: &Bytes) -> Self {
        let request_id = parts
            .headers
            .get(X_BCE_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        match serde_json::from_slice::<ErrorBody>(body) {
            Ok(parsed) if !parsed.code.is_empty() => Self {
                status: parts.status,
                code: parsed.code,
                message: parsed.message,
                request_id: if parsed.request_id.is_empty() {
                    request_id
                } else {
                    parsed.request_id
                },
            },
            _ => Self {
                status: parts.status,
                code: parts
                    .status
                    .canonical_reason()
                    .unwrap_or("UnknownError")
                    .to_string(),
                message: String::from_utf8_lossy(body).into_owned(),
                request_id,
            },
        }
    }

    /// True for 4xx failures.
    pub fn is_client_error(&self) -> bool {
        self.status.is_client_error()
    }

    /// True for 5xx failures.
    pub fn is_server_error(&self) -> bool {
        self.status.is_server_error()
    }

    /// True when the addressed bucket/object/resource does not exist.
    pub fn is_not_found(&self) -> bool {
        self.status == StatusCode::NOT_FOUND
            || matches!(self.code.as_str(), "NoSuchKey" | "NoSuchBucket")
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: {} (request_id: {})",
            self.status.as_u16(),
            self.code,
            self.message,
            self.request_id
        )
    }
}

impl std::error::Error for ServiceError {}

impl From<ServiceError> for bce_core::Error {
    fn from(err: ServiceError) -> Self {
        bce_core::Error::service(err.to_string()).with_source(err)
    }
}

/// Recover the typed [`ServiceError`] from an SDK error, if that is what it
/// carries.
pub fn as_service_error(err: &bce_core::Error) -> Option<&ServiceError> {
    err.source_ref()?.downcast_ref::<ServiceError>()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts_with_status(status: StatusCode) -> http::response::Parts {
        http::Response::builder()
            .status(status)
            .header(X_BCE_REQUEST_ID, "req-123")
            .body(())
            .unwrap()
            .into_parts()
            .0
    }

    #[test]
    fn test_parse_json_error_body() {
        let body = Bytes::from_static(
            br#"{"code":"NoSuchKey","message":"The specified key does not exist.","requestId":"abc-1"}"#,
        );
        let err = ServiceError::from_response(&parts_with_status(StatusCode::NOT_FOUND), &body);

        assert_eq!(err.code, "NoSuchKey");
        assert_eq!(err.message, "The specified key does not exist.");
        // Body requestId wins over the header.
        assert_eq!(err.request_id, "abc-1");
        assert!(err.is_not_found());
        assert!(err.is_client_error());
    }

    #[test]
    fn test_parse_non_json_error_body() {
        let body = Bytes::from_static(b"<html>bad gateway</html>");
        let err = ServiceError::from_response(&parts_with_status(StatusCode::BAD_GATEWAY), &body);

        assert_eq!(err.code, "Bad Gateway");
        assert_eq!(err.message, "<html>bad gateway</html>");
        assert_eq!(err.request_id, "req-123");
        assert!(err.is_server_error());
    }

    #[test]
    fn test_roundtrip_through_core_error() {
        let err = ServiceError {
            status: StatusCode::FORBIDDEN,
            code: "AccessDenied".to_string(),
            message: "denied".to_string(),
            request_id: "r".to_string(),
        };

        let core: bce_core::Error = err.into();
        assert_eq!(core.kind(), bce_core::ErrorKind::Service);

        let back = as_service_error(&core).expect("typed error must survive");
        assert_eq!(back.code, "AccessDenied");
    }
}
