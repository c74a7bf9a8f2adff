//! Compute service bindings.
//!
//! [`BccClient`] drives the `/v2` instance API over a signed
//! [`bce_client::BceClient`]:
//!
//! ```no_run
//! use bce_bcc::{BccClient, CreateInstanceRequest};
//! use bce_client::BceClient;
//!
//! async fn example(client: BceClient) -> bce_core::Result<()> {
//!     let bcc = BccClient::new(client);
//!
//!     let created = bcc
//!         .create_instance(
//!             &CreateInstanceRequest::new(2, 8, "m-abcd1234").with_name("web-1"),
//!             None,
//!         )
//!         .await?;
//!     println!("created {:?}", created.instance_ids);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

mod client;
mod model;

pub use client::BccClient;
pub use model::{
    CreateInstanceRequest, CreateInstanceResponse, InstanceModel, InstanceStatus,
    ListInstancesRequest, ListInstancesResponse,
};
