use std::time::Duration;

use bce_auth_v1::BCE_PATH_ENCODE_SET;
use bce_client::{as_service_error, BceClient, ServiceRequest};
use bce_core::{Error, Result};
use bytes::Bytes;
use http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use http::Uri;
use percent_encoding::utf8_percent_encode;

use crate::model::*;

const X_BCE_COPY_SOURCE: &str = "x-bce-copy-source";

/// Client for the object storage service.
///
/// Wraps a [`BceClient`] pointed at an object storage endpoint, e.g.
/// `bj.bcebos.com`. Buckets and objects are addressed path style as
/// `/{bucket}/{key}`.
#[derive(Debug)]
pub struct BosClient {
    client: BceClient,
}

impl BosClient {
    /// Create a client over a configured dispatcher.
    pub fn new(client: BceClient) -> Self {
        Self { client }
    }

    /// List all buckets owned by the requesting account.
    pub async fn list_buckets(&self) -> Result<ListBucketsResponse> {
        let resp = self.client.send(ServiceRequest::get("/")).await?;
        resp.json()
    }

    /// Create a bucket.
    pub async fn create_bucket(&self, bucket: &str) -> Result<()> {
        self.client
            .send(ServiceRequest::put(bucket_path(bucket)))
            .await?;
        Ok(())
    }

    /// Delete an empty bucket.
    pub async fn delete_bucket(&self, bucket: &str) -> Result<()> {
        self.client
            .send(ServiceRequest::delete(bucket_path(bucket)))
            .await?;
        Ok(())
    }

    /// Check whether a bucket exists.
    ///
    /// A forbidden response still proves existence, it just belongs to
    /// someone else.
    pub async fn does_bucket_exist(&self, bucket: &str) -> Result<bool> {
        match self
            .client
            .send(ServiceRequest::head(bucket_path(bucket)))
            .await
        {
            Ok(_) => Ok(true),
            Err(err) => match as_service_error(&err) {
                Some(se) if se.is_not_found() => Ok(false),
                Some(se) if se.status == http::StatusCode::FORBIDDEN => Ok(true),
                _ => Err(err),
            },
        }
    }

    /// List one page of objects in a bucket.
    pub async fn list_objects(
        &self,
        bucket: &str,
        request: ListObjectsRequest,
    ) -> Result<ListObjectsResponse> {
        let req = ServiceRequest::get(bucket_path(bucket))
            .query_opt("prefix", request.prefix)
            .query_opt("marker", request.marker)
            .query_opt("delimiter", request.delimiter)
            .query_opt("maxKeys", request.max_keys.map(|n| n.to_string()));

        let resp = self.client.send(req).await?;
        resp.json()
    }

    /// Upload an object from bytes. Returns the entity tag of the stored
    /// content.
    pub async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: Option<&str>,
    ) -> Result<String> {
        let mut req = ServiceRequest::put(object_path(bucket, key)?)
            .body(body)
            .with_content_md5();
        if let Some(ct) = content_type {
            req = req.header(CONTENT_TYPE, header_value(ct)?);
        }

        let resp = self.client.send(req).await?;
        Ok(resp.etag().unwrap_or_default().to_string())
    }

    /// Upload an object from a UTF-8 string, stored as `text/plain`.
    pub async fn put_object_from_string(
        &self,
        bucket: &str,
        key: &str,
        data: impl Into<String>,
    ) -> Result<String> {
        self.put_object(
            bucket,
            key,
            Bytes::from(data.into()),
            Some("text/plain; charset=utf-8"),
        )
        .await
    }

    /// Download an object: its content plus metadata.
    pub async fn get_object(&self, bucket: &str, key: &str) -> Result<Object> {
        let resp = self
            .client
            .send(ServiceRequest::get(object_path(bucket, key)?))
            .await?;

        let meta = object_meta(&resp);
        Ok(Object {
            body: resp.into_body(),
            meta,
        })
    }

    /// Fetch object metadata without the content.
    pub async fn get_object_meta(&self, bucket: &str, key: &str) -> Result<ObjectMeta> {
        let resp = self
            .client
            .send(ServiceRequest::head(object_path(bucket, key)?))
            .await?;
        Ok(object_meta(&resp))
    }

    /// Server side copy of an object. Returns the entity tag of the copy.
    pub async fn copy_object(
        &self,
        src_bucket: &str,
        src_key: &str,
        dst_bucket: &str,
        dst_key: &str,
    ) -> Result<String> {
        let source = object_path(src_bucket, src_key)?;
        let req = ServiceRequest::put(object_path(dst_bucket, dst_key)?).header(
            HeaderName::from_static(X_BCE_COPY_SOURCE),
            header_value(&source)?,
        );

        let resp = self.client.send(req).await?;
        // The copy result carries the new tag in the body, not the header.
        #[derive(serde::Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct CopyObjectResponse {
            e_tag: String,
        }
        let body: CopyObjectResponse = resp.json()?;
        Ok(body.e_tag.trim_matches('"').to_string())
    }

    /// Delete an object.
    pub async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        self.client
            .send(ServiceRequest::delete(object_path(bucket, key)?))
            .await?;
        Ok(())
    }

    /// Produce a presigned GET URL for an object, valid for `expires_in`.
    pub async fn generate_presigned_url(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<Uri> {
        self.client
            .presign(ServiceRequest::get(object_path(bucket, key)?), expires_in)
            .await
    }
}

fn bucket_path(bucket: &str) -> String {
    format!("/{bucket}")
}

fn object_path(bucket: &str, key: &str) -> Result<String> {
    if key.is_empty() {
        return Err(Error::request_invalid("object key must not be empty"));
    }
    // Keep `/` so keys can address folders, encode everything else.
    let key = utf8_percent_encode(key, &BCE_PATH_ENCODE_SET);
    Ok(format!("/{bucket}/{key}"))
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| Error::request_invalid("invalid header value").with_source(e))
}

fn object_meta(resp: &bce_client::ServiceResponse) -> ObjectMeta {
    ObjectMeta {
        content_length: resp
            .header("content-length")
            .and_then(|v| v.parse().ok())
            .unwrap_or_default(),
        content_type: resp.header("content-type").map(str::to_string),
        etag: resp.etag().map(str::to_string),
        last_modified: resp.header("last-modified").map(str::to_string),
        storage_class: resp.header("x-bce-storage-class").map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_object_path_encoding() {
        assert_eq!(
            object_path("bucket", "folder/readme.txt").unwrap(),
            "/bucket/folder/readme.txt"
        );
        assert_eq!(
            object_path("bucket", "目录/文件.txt").unwrap(),
            "/bucket/%E7%9B%AE%E5%BD%95/%E6%96%87%E4%BB%B6.txt"
        );
        assert_eq!(
            object_path("bucket", "a b+c").unwrap(),
            "/bucket/a%20b%2Bc"
        );
        assert!(object_path("bucket", "").is_err());
    }
}
