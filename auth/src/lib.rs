//! `bce-auth-v1` request signing.
//!
//! Implements the canonical-request HMAC-SHA256 scheme every BCE service
//! shares, plus the credential providers that feed it.
//!
//! ```no_run
//! use bce_auth_v1::{DefaultCredentialProvider, RequestSigner};
//! use bce_core::{Context, OsEnv, Signer};
//! use bce_file_read_tokio::TokioFileRead;
//!
//! # async fn example() -> bce_core::Result<()> {
//! let ctx = Context::new().with_file_read(TokioFileRead).with_env(OsEnv);
//! let signer = Signer::new(ctx, DefaultCredentialProvider::new(), RequestSigner::new());
//!
//! let mut parts = http::Request::builder()
//!     .method("GET")
//!     .uri("https://bj.bcebos.com/my-bucket/my-object")
//!     .body(())
//!     .unwrap()
//!     .into_parts()
//!     .0;
//! signer.sign(&mut parts, None).await?;
//! # Ok(())
//! # }
//! ```

mod constants;
pub use constants::{BCE_PATH_ENCODE_SET, BCE_QUERY_ENCODE_SET, X_BCE_DATE, X_BCE_SECURITY_TOKEN};

mod credential;
pub use credential::Credential;

mod sign_request;
pub use sign_request::RequestSigner;

mod provide_credential;
pub use provide_credential::{
    DefaultCredentialProvider, EnvCredentialProvider, ProfileCredentialProvider,
    StaticCredentialProvider,
};
