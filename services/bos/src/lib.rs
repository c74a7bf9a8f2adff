//! Object storage service bindings.
//!
//! [`BosClient`] addresses buckets and objects path style over a signed
//! [`bce_client::BceClient`]:
//!
//! ```no_run
//! use bce_bos::{BosClient, ListObjectsRequest};
//! use bce_client::{BceClient, ClientConfig};
//!
//! async fn example(client: BceClient) -> bce_core::Result<()> {
//!     let bos = BosClient::new(client);
//!
//!     let listing = bos
//!         .list_objects("logs", ListObjectsRequest::new().with_prefix("2024/"))
//!         .await?;
//!     for object in listing.contents {
//!         println!("{} ({} bytes)", object.key, object.size);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

mod client;
mod model;

pub use client::BosClient;
pub use model::{
    BucketSummary, CommonPrefix, ListBucketsResponse, ListObjectsRequest, ListObjectsResponse,
    Object, ObjectMeta, ObjectSummary, Owner,
};
