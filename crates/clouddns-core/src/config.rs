//! Configuration types for record providers
//!
//! Provider configuration is construction-time only: a provider is built from
//! a [`ProviderConfig`] once and never reconfigured.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Google Cloud DNS v1 REST endpoint
pub const DEFAULT_CLOUD_DNS_API_BASE: &str = "https://dns.googleapis.com/dns/v1";

/// Google Cloud DNS provider configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudDnsConfig {
    /// Google Cloud project that owns the managed zones
    pub project: String,

    /// Service-account key file; ambient credentials are used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_key_file: Option<PathBuf>,

    /// Override for the REST endpoint (emulators, tests)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

impl CloudDnsConfig {
    /// Create a configuration using ambient credentials
    pub fn new(project: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            json_key_file: None,
            api_base: None,
        }
    }

    /// Use a service-account key file
    pub fn with_json_key_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.json_key_file = Some(path.into());
        self
    }

    /// Use a different REST endpoint
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    /// The key file to load, treating an empty path as unset
    pub fn key_file(&self) -> Option<&Path> {
        self.json_key_file
            .as_deref()
            .filter(|path| !path.as_os_str().is_empty())
    }

    /// The REST endpoint, without a trailing slash
    pub fn api_base(&self) -> &str {
        self.api_base
            .as_deref()
            .unwrap_or(DEFAULT_CLOUD_DNS_API_BASE)
            .trim_end_matches('/')
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.project.trim().is_empty() {
            return Err(Error::config("Cloud DNS project cannot be empty"));
        }

        if let Some(api_base) = &self.api_base
            && !api_base.starts_with("https://")
            && !api_base.starts_with("http://")
        {
            return Err(Error::config(format!(
                "Cloud DNS api_base must use HTTP or HTTPS scheme. Got: {api_base}"
            )));
        }

        Ok(())
    }
}

/// DNS provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// Google Cloud DNS provider
    #[serde(rename = "clouddns")]
    CloudDns(CloudDnsConfig),

    /// Custom provider
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl ProviderConfig {
    /// Load and validate a configuration from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config: ProviderConfig = serde_json::from_str(&contents)?;
        config.validate()?;

        tracing::debug!(
            "Loaded {} provider configuration from {}",
            config.type_name(),
            path.display()
        );
        Ok(config)
    }

    /// Validate the provider configuration
    pub fn validate(&self) -> Result<()> {
        match self {
            ProviderConfig::CloudDns(config) => config.validate(),
            ProviderConfig::Custom { factory, config } => {
                if factory.is_empty() {
                    return Err(Error::config("Custom provider factory cannot be empty"));
                }
                if config.is_null() {
                    return Err(Error::config("Custom provider config cannot be null"));
                }
                Ok(())
            }
        }
    }

    /// Get the provider type name
    pub fn type_name(&self) -> &str {
        match self {
            ProviderConfig::CloudDns(_) => "clouddns",
            ProviderConfig::Custom { factory, .. } => factory,
        }
    }
}

impl From<CloudDnsConfig> for ProviderConfig {
    fn from(config: CloudDnsConfig) -> Self {
        ProviderConfig::CloudDns(config)
    }
}
