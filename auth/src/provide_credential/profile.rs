use crate::constants::*;
use crate::Credential;
use async_trait::async_trait;
use bce_core::{Context, Error, ProvideCredential, Result};
use ini::Ini;
use log::debug;

/// ProfileCredentialProvider loads credentials from a shared credentials file.
///
/// The file defaults to `~/.bce/credentials` and can be overridden via the
/// `BCE_CREDENTIALS_FILE` environment variable or `with_credentials_file`.
/// The profile section defaults to `default` and follows `BCE_PROFILE` /
/// `with_profile`.
///
/// Expected file shape:
///
/// ```ini
/// [default]
/// bce_access_key_id = ...
/// bce_secret_access_key = ...
/// bce_session_token = ...   ; optional
/// ```
#[derive(Debug, Default, Clone)]
pub struct ProfileCredentialProvider {
    profile: Option<String>,
    credentials_file: Option<String>,
}

impl ProfileCredentialProvider {
    /// Create a new ProfileCredentialProvider with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the profile name to use.
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Set the path to the credentials file.
    pub fn with_credentials_file(mut self, path: impl Into<String>) -> Self {
        self.credentials_file = Some(path.into());
        self
    }
}

#[async_trait]
impl ProvideCredential for ProfileCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let profile = self
            .profile
            .clone()
            .or_else(|| ctx.env_var(BCE_PROFILE))
            .unwrap_or_else(|| "default".to_string());

        let path = self
            .credentials_file
            .clone()
            .or_else(|| ctx.env_var(BCE_CREDENTIALS_FILE))
            .unwrap_or_else(|| "~/.bce/credentials".to_string());

        let Some(expanded_path) = ctx.expand_home_dir(&path) else {
            debug!("failed to expand homedir for path: {path}");
            return Ok(None);
        };

        let content = match ctx.file_read_as_string(&expanded_path).await {
            Ok(content) => content,
            Err(err) => {
                debug!("failed to read credentials file {expanded_path}: {err:?}");
                return Ok(None);
            }
        };

        let conf = Ini::load_from_str(&content).map_err(|e| {
            Error::config_invalid("failed to parse credentials file")
                .with_source(anyhow::Error::new(e))
        })?;

        let props = match conf.section(Some(profile.as_str())) {
            Some(props) => props,
            None => {
                debug!("profile {profile} not found in credentials file");
                return Ok(None);
            }
        };

        let access_key_id = props.get("bce_access_key_id");
        let secret_access_key = props.get("bce_secret_access_key");

        match (access_key_id, secret_access_key) {
            (Some(ak), Some(sk)) => Ok(Some(Credential {
                access_key_id: ak.to_string(),
                secret_access_key: sk.to_string(),
                session_token: props.get("bce_session_token").map(|s| s.to_string()),
                expires_in: None,
            })),
            _ => {
                debug!("profile {profile} misses bce_access_key_id or bce_secret_access_key");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bce_core::StaticEnv;
    use bce_file_read_tokio::TokioFileRead;
    use std::collections::HashMap;
    use std::env;

    fn testdata(name: &str) -> String {
        format!(
            "{}/testdata/{name}",
            env::current_dir()
                .expect("current_dir must exist")
                .to_string_lossy()
        )
    }

    fn test_context(envs: HashMap<String, String>) -> Context {
        Context::new()
            .with_file_read(TokioFileRead)
            .with_env(StaticEnv {
                home_dir: None,
                envs,
            })
    }

    #[tokio::test]
    async fn test_profile_loader_default_section() {
        let _ = env_logger::builder().is_test(true).try_init();

        let ctx = test_context(HashMap::from([(
            BCE_CREDENTIALS_FILE.to_string(),
            testdata("credentials"),
        )]));

        let provider = ProfileCredentialProvider::new();
        let cred = provider.provide_credential(&ctx).await.unwrap().unwrap();
        assert_eq!(cred.access_key_id, "default_access_key_id");
        assert_eq!(cred.secret_access_key, "default_secret_access_key");
        assert!(cred.session_token.is_none());
    }

    #[tokio::test]
    async fn test_profile_loader_named_section() {
        let ctx = test_context(HashMap::from([
            (BCE_CREDENTIALS_FILE.to_string(), testdata("credentials")),
            (BCE_PROFILE.to_string(), "sts".to_string()),
        ]));

        let provider = ProfileCredentialProvider::new();
        let cred = provider.provide_credential(&ctx).await.unwrap().unwrap();
        assert_eq!(cred.access_key_id, "sts_access_key_id");
        assert_eq!(cred.session_token, Some("sts_session_token".to_string()));
    }

    #[tokio::test]
    async fn test_profile_loader_missing_file() {
        let ctx = test_context(HashMap::from([(
            BCE_CREDENTIALS_FILE.to_string(),
            testdata("not_exist"),
        )]));

        let provider = ProfileCredentialProvider::new();
        let cred = provider.provide_credential(&ctx).await.unwrap();
        assert!(cred.is_none());
    }

    #[tokio::test]
    async fn test_profile_loader_missing_section() {
        let ctx = test_context(HashMap::from([(
            BCE_CREDENTIALS_FILE.to_string(),
            testdata("credentials"),
        )]));

        let provider = ProfileCredentialProvider::new().with_profile("nope");
        let cred = provider.provide_credential(&ctx).await.unwrap();
        assert!(cred.is_none());
    }
}
