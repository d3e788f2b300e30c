//! Cloud DNS REST transport
//!
//! [`DnsApi`] is the seam between the record operations and HTTP. The
//! provider only ever talks to it; [`CloudDnsClient`] implements it against
//! the v1 REST API.
//!
//! # API Calls
//!
//! ```http
//! GET  /projects/:project/managedZones?dnsName=example.com.&maxResults=1
//! GET  /projects/:project/managedZones/:zone/rrsets?name=...&type=...&pageToken=...
//! POST /projects/:project/managedZones/:zone/changes
//! Authorization: Bearer <token>
//! ```

use crate::api::{
    self, Change, ManagedZone, ManagedZonesListResponse, ResourceRecordSet,
    ResourceRecordSetsListResponse,
};
use crate::session::{self, TokenSource};
use async_trait::async_trait;
use clouddns_core::{CloudDnsConfig, Error, Result};
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Filter for listing record sets
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordSetQuery {
    /// Absolute name to match
    pub name: Option<String>,
    /// Type to match; only honoured together with `name`
    pub record_type: Option<String>,
}

impl RecordSetQuery {
    /// Match exactly one (name, type) pair
    pub fn exact(name: impl Into<String>, record_type: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            record_type: Some(record_type.into()),
        }
    }
}

/// Remote operations the provider needs from Cloud DNS
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DnsApi: Send + Sync {
    /// Establish the authenticated session if it does not exist yet
    async fn ensure_session(&self) -> Result<()>;

    /// Look up the managed zone whose DNS name equals `dns_name`
    async fn find_managed_zone(&self, dns_name: &str) -> Result<Option<ManagedZone>>;

    /// List record sets in `zone`, following pagination
    async fn list_record_sets(
        &self,
        zone: &ManagedZone,
        query: &RecordSetQuery,
    ) -> Result<Vec<ResourceRecordSet>>;

    /// Submit an atomic change-set and return the service's view of it
    async fn create_change(&self, zone: &ManagedZone, change: &Change) -> Result<Change>;
}

/// HTTP client for the Cloud DNS v1 API
pub struct CloudDnsClient {
    project: String,
    key_file: Option<PathBuf>,
    api_base: String,
    http: reqwest::Client,
    /// Created on first use, then shared by every request
    session: OnceCell<Arc<dyn TokenSource>>,
}

impl std::fmt::Debug for CloudDnsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudDnsClient")
            .field("project", &self.project)
            .field("key_file", &self.key_file)
            .field("api_base", &self.api_base)
            .field("session_established", &self.session.initialized())
            .finish()
    }
}

impl CloudDnsClient {
    /// Create a client from configuration
    ///
    /// No credentials are resolved here; that happens on the first request
    /// or on [`DnsApi::ensure_session`].
    pub fn new(config: &CloudDnsConfig) -> Result<Self> {
        config.validate()?;

        let http = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            project: config.project.clone(),
            key_file: config.key_file().map(|path| path.to_path_buf()),
            api_base: config.api_base().to_string(),
            http,
            session: OnceCell::new(),
        })
    }

    /// Use an existing session instead of resolving credentials
    pub fn with_token_source(mut self, source: Arc<dyn TokenSource>) -> Self {
        self.session = OnceCell::new_with(Some(source));
        self
    }

    /// The project this client operates on
    pub fn project(&self) -> &str {
        &self.project
    }

    /// Get the session, establishing it once
    ///
    /// Concurrent first callers wait for a single initializer. A failed
    /// attempt leaves the cell empty so the next call tries again.
    async fn session(&self) -> Result<&Arc<dyn TokenSource>> {
        self.session
            .get_or_try_init(|| session::establish(self.key_file.as_deref()))
            .await
    }

    fn project_url(&self, tail: &str) -> String {
        format!("{}/projects/{}/{}", self.api_base, self.project, tail)
    }

    fn zone_url(&self, zone: &ManagedZone, tail: &str) -> String {
        self.project_url(&format!("managedZones/{}/{}", zone.name, tail))
    }

    /// Authenticate, send, and decode a request
    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T> {
        let token = self.session().await?.access_token().await?;

        let response = request
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| Error::http(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            tracing::debug!("Cloud DNS returned {}: {}", status, error_text);
            return Err(api::classify_error(status.as_u16(), &error_text));
        }

        response
            .json()
            .await
            .map_err(|e| Error::http(format!("Failed to parse response: {e}")))
    }
}

#[async_trait]
impl DnsApi for CloudDnsClient {
    async fn ensure_session(&self) -> Result<()> {
        self.session().await.map(|_| ())
    }

    async fn find_managed_zone(&self, dns_name: &str) -> Result<Option<ManagedZone>> {
        tracing::debug!("Looking up managed zone for {}", dns_name);

        let request = self
            .http
            .get(self.project_url("managedZones"))
            .query(&[("dnsName", dns_name), ("maxResults", "1")]);
        let response: ManagedZonesListResponse = self.send(request).await?;

        let zone = response.managed_zones.into_iter().next();
        if let Some(zone) = &zone {
            tracing::debug!("Found managed zone: {} ({})", zone.name, zone.dns_name);
        }
        Ok(zone)
    }

    async fn list_record_sets(
        &self,
        zone: &ManagedZone,
        query: &RecordSetQuery,
    ) -> Result<Vec<ResourceRecordSet>> {
        let url = self.zone_url(zone, "rrsets");
        let mut rrsets = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut params: Vec<(&str, &str)> = Vec::new();
            if let Some(name) = &query.name {
                params.push(("name", name.as_str()));
                if let Some(record_type) = &query.record_type {
                    params.push(("type", record_type.as_str()));
                }
            }
            if let Some(token) = &page_token {
                params.push(("pageToken", token.as_str()));
            }

            let page: ResourceRecordSetsListResponse =
                self.send(self.http.get(&url).query(&params)).await?;
            rrsets.extend(page.rrsets);

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        tracing::debug!("Listed {} record set(s) in {}", rrsets.len(), zone.name);
        Ok(rrsets)
    }

    async fn create_change(&self, zone: &ManagedZone, change: &Change) -> Result<Change> {
        tracing::info!(
            "Submitting change to {}: {} addition(s), {} deletion(s)",
            zone.name,
            change.additions.len(),
            change.deletions.len()
        );

        let request = self.http.post(self.zone_url(zone, "changes")).json(change);
        let submitted: Change = self.send(request).await?;

        tracing::debug!(
            "Change {} is {}",
            submitted.id.as_deref().unwrap_or("<unknown>"),
            submitted.status.as_deref().unwrap_or("<unknown>")
        );
        Ok(submitted)
    }
}
