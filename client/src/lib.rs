//! Generic signed dispatch for BCE service clients.
//!
//! Every service crate in this SDK funnels its operations through
//! [`BceClient::send`]: build a [`ServiceRequest`], let the client marshal it
//! into a signed `http::Request`, dispatch it with retries, and get back
//! either a [`ServiceResponse`] or a typed [`ServiceError`].

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

mod client;
pub use client::BceClient;

mod config;
pub use config::ClientConfig;

mod error;
pub use error::{as_service_error, ServiceError, X_BCE_REQUEST_ID};

mod request;
pub use request::ServiceRequest;

mod response;
pub use response::ServiceResponse;

pub mod retry;
pub use retry::{BackoffRetryPolicy, NoRetryPolicy, RetryPolicy};
