//! Authenticated session handles
//!
//! A session is anything that can hand out a bearer token for the Cloud DNS
//! scope. Credential resolution and token refresh belong to `gcp_auth`; this
//! module only chooses how the handle is built.

use async_trait::async_trait;
use clouddns_core::{Error, Result};
use gcp_auth::TokenProvider;
use std::path::Path;
use std::sync::Arc;

/// OAuth scope granting read/write access to Cloud DNS
pub const CLOUD_DNS_SCOPE: &str = "https://www.googleapis.com/auth/ndev.clouddns.readwrite";

/// Source of bearer tokens for API requests
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Return a currently valid access token
    async fn access_token(&self) -> Result<String>;
}

/// Session backed by a `gcp_auth` token provider
pub struct GoogleTokenSource {
    provider: Arc<dyn TokenProvider>,
}

impl GoogleTokenSource {
    pub fn new(provider: Arc<dyn TokenProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl TokenSource for GoogleTokenSource {
    async fn access_token(&self) -> Result<String> {
        let token = self
            .provider
            .token(&[CLOUD_DNS_SCOPE])
            .await
            .map_err(|e| Error::auth(format!("Failed to obtain access token: {e}")))?;
        Ok(token.as_str().to_string())
    }
}

/// A fixed, pre-fetched bearer token
///
/// Useful with `gcloud auth print-access-token` or against emulators. The
/// token is not refreshed.
#[derive(Clone)]
pub struct StaticToken {
    token: String,
}

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

// Custom Debug implementation that hides the token
impl std::fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticToken")
            .field("token", &"<REDACTED>")
            .finish()
    }
}

#[async_trait]
impl TokenSource for StaticToken {
    async fn access_token(&self) -> Result<String> {
        if self.token.is_empty() {
            return Err(Error::auth("static access token is empty"));
        }
        Ok(self.token.clone())
    }
}

/// Build a session from a service-account key file, or from ambient
/// credentials when no file is given
///
/// Ambient resolution follows `gcp_auth::provider`: the
/// `GOOGLE_APPLICATION_CREDENTIALS` file, the gcloud user configuration, then
/// the GCE metadata server.
pub async fn establish(key_file: Option<&Path>) -> Result<Arc<dyn TokenSource>> {
    let provider: Arc<dyn TokenProvider> = match key_file {
        Some(path) => {
            tracing::debug!(
                "Establishing Cloud DNS session from key file {}",
                path.display()
            );
            let account = gcp_auth::CustomServiceAccount::from_file(path).map_err(|e| {
                Error::auth(format!(
                    "Failed to load credentials from {}: {e}",
                    path.display()
                ))
            })?;
            Arc::new(account)
        }
        None => {
            tracing::debug!("Establishing Cloud DNS session from ambient credentials");
            gcp_auth::provider()
                .await
                .map_err(|e| Error::auth(format!("No usable ambient credentials: {e}")))?
        }
    };

    Ok(Arc::new(GoogleTokenSource::new(provider)))
}
