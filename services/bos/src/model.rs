//! Response models for the object storage API.
//!
//! Field names mirror the JSON the service returns.

use serde::Deserialize;

/// Bucket or object owner.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Owner {
    /// Account id of the owner.
    pub id: String,
    /// Display name, when the service provides one.
    #[serde(default)]
    pub display_name: Option<String>,
}

/// One bucket in a `list_buckets` listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketSummary {
    /// Bucket name.
    pub name: String,
    /// Region the bucket lives in.
    pub location: String,
    /// Creation timestamp, ISO 8601.
    pub creation_date: String,
}

/// Response of `list_buckets`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListBucketsResponse {
    /// The requesting account.
    pub owner: Owner,
    /// All buckets owned by the account.
    #[serde(default)]
    pub buckets: Vec<BucketSummary>,
}

/// One object in a `list_objects` listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectSummary {
    /// Object key.
    pub key: String,
    /// Last modification timestamp, ISO 8601.
    #[serde(default)]
    pub last_modified: Option<String>,
    /// Entity tag of the object content.
    #[serde(default)]
    pub e_tag: Option<String>,
    /// Object size in bytes.
    #[serde(default)]
    pub size: u64,
    /// Storage class, e.g. `STANDARD`.
    #[serde(default)]
    pub storage_class: Option<String>,
    /// Object owner.
    #[serde(default)]
    pub owner: Option<Owner>,
}

/// A folded prefix in a delimited listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonPrefix {
    /// The folded prefix.
    pub prefix: String,
}

/// Response of `list_objects`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListObjectsResponse {
    /// Bucket name.
    pub name: String,
    /// Echo of the requested prefix.
    #[serde(default)]
    pub prefix: Option<String>,
    /// Echo of the requested delimiter.
    #[serde(default)]
    pub delimiter: Option<String>,
    /// Echo of the requested marker.
    #[serde(default)]
    pub marker: Option<String>,
    /// Marker to pass for the next page when truncated.
    #[serde(default)]
    pub next_marker: Option<String>,
    /// Page size the service applied.
    #[serde(default)]
    pub max_keys: u32,
    /// Whether more results exist.
    #[serde(default)]
    pub is_truncated: bool,
    /// Objects in this page.
    #[serde(default)]
    pub contents: Vec<ObjectSummary>,
    /// Folded prefixes, when a delimiter was given.
    #[serde(default)]
    pub common_prefixes: Vec<CommonPrefix>,
}

/// Parameters of `list_objects`.
#[derive(Debug, Clone, Default)]
pub struct ListObjectsRequest {
    /// Only list keys starting with this prefix.
    pub prefix: Option<String>,
    /// Start listing after this key.
    pub marker: Option<String>,
    /// Fold keys on this delimiter.
    pub delimiter: Option<String>,
    /// Page size, service default is 1000.
    pub max_keys: Option<u32>,
}

impl ListObjectsRequest {
    /// Create an empty request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Only list keys starting with this prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Start listing after this key.
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = Some(marker.into());
        self
    }

    /// Fold keys on this delimiter.
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = Some(delimiter.into());
        self
    }

    /// Page size.
    pub fn with_max_keys(mut self, max_keys: u32) -> Self {
        self.max_keys = Some(max_keys);
        self
    }
}

/// Metadata of a stored object, read off response headers.
#[derive(Debug, Clone, Default)]
pub struct ObjectMeta {
    /// Size in bytes.
    pub content_length: u64,
    /// MIME type.
    pub content_type: Option<String>,
    /// Entity tag, quotes stripped.
    pub etag: Option<String>,
    /// Last modification time, HTTP date format.
    pub last_modified: Option<String>,
    /// Storage class.
    pub storage_class: Option<String>,
}

/// A downloaded object: its content plus metadata.
#[derive(Debug)]
pub struct Object {
    /// The object content.
    pub body: bytes::Bytes,
    /// Metadata read from the response headers.
    pub meta: ObjectMeta,
}
