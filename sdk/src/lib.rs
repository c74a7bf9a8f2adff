#![doc = include_str!("../README.md")]

pub use bce_core::*;

/// The shared `bce-auth-v1` signing scheme and credential providers.
pub mod auth {
    pub use bce_auth_v1::*;
}

/// The generic signed dispatch every service client goes through.
pub mod client {
    pub use bce_client::*;
}

/// Compute service bindings.
#[cfg(feature = "bcc")]
pub mod bcc {
    pub use bce_bcc::*;
}

/// Object storage service bindings.
#[cfg(feature = "bos")]
pub mod bos {
    pub use bce_bos::*;
}

/// Build a [`Context`] wired with tokio file IO, a reqwest transport and
/// the process environment.
#[cfg(feature = "default-context")]
pub fn default_context() -> Context {
    Context::new()
        .with_file_read(bce_file_read_tokio::TokioFileRead)
        .with_http_send(bce_http_send_reqwest::ReqwestHttpSend::default())
        .with_env(OsEnv)
}

/// Build a signer over [`default_context`] that resolves credentials from
/// the environment and the shared credentials file.
#[cfg(feature = "default-context")]
pub fn default_signer() -> Signer<auth::Credential> {
    Signer::new(
        default_context(),
        auth::DefaultCredentialProvider::new(),
        auth::RequestSigner::new(),
    )
}

/// Build a ready-to-use client for `endpoint` over [`default_context`].
///
/// ```no_run
/// # async fn example() -> bce_core::Result<()> {
/// let client = bce_sdk::default_client("bj.bcebos.com")?;
/// let bos = bce_sdk::bos::BosClient::new(client);
/// let buckets = bos.list_buckets().await?;
/// # Ok(())
/// # }
/// ```
#[cfg(feature = "default-context")]
pub fn default_client(endpoint: &str) -> Result<client::BceClient> {
    let ctx = default_context();
    let config = client::ClientConfig::new(endpoint)?;
    let signer = Signer::new(
        ctx.clone(),
        auth::DefaultCredentialProvider::new(),
        auth::RequestSigner::new(),
    );
    Ok(client::BceClient::new(ctx, config, signer))
}
