// # Google Cloud DNS Provider
//
// This crate implements the clouddns record-management interface on top of
// the Google Cloud DNS v1 REST API.
//
// ## Behaviour
//
// - Zones are resolved by DNS name with one `managedZones.list` call per operation
// - Every write is one atomic change-set (`changes.create`)
// - `append_records` recovers from exactly one conflict by deleting the
//   conflicting records and creating them again
// - `set_records` replaces whole record sets in a single change
// - No caching of zones or records; the service is the source of truth
// - The only cached state is the authenticated session
//
// ## Authentication
//
// With `json_key_file` set, the session is built from that service-account
// key; otherwise ambient credentials are used (see [`session::establish`]).
// Tokens never appear in logs or `Debug` output.
//
// ## API Reference
//
// - Cloud DNS API v1: https://cloud.google.com/dns/docs/reference/rest/v1
// - List zones: GET `/projects/:project/managedZones?dnsName=...`
// - List record sets: GET `/projects/:project/managedZones/:zone/rrsets`
// - Create change: POST `/projects/:project/managedZones/:zone/changes`

pub mod api;
pub mod client;
pub mod session;

pub use api::{Change, ManagedZone, ResourceRecordSet};
pub use client::{CloudDnsClient, DnsApi, RecordSetQuery};
pub use session::{StaticToken, TokenSource};

use async_trait::async_trait;
use clouddns_core::config::ProviderConfig;
use clouddns_core::traits::{
    RecordAppender, RecordDeleter, RecordGetter, RecordProvider, RecordProviderFactory,
    RecordSetter,
};
use clouddns_core::{CloudDnsConfig, Error, Record, Result, absolute_name, fqdn};
use std::sync::Arc;

/// Google Cloud DNS record provider
///
/// Holds the REST transport, which in turn owns the lazily established
/// session. All four record operations resolve the zone first and then
/// submit at most one change-set, except for the conflict recovery in
/// [`RecordAppender::append_records`].
///
/// # Cancellation
///
/// Dropping an operation's future aborts its in-flight request. Wrap calls in
/// `tokio::time::timeout` to impose a deadline; beyond the HTTP client's 30s
/// request timeout the provider adds none.
pub struct CloudDnsProvider {
    api: Arc<dyn DnsApi>,
}

impl std::fmt::Debug for CloudDnsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudDnsProvider").finish_non_exhaustive()
    }
}

impl CloudDnsProvider {
    /// Create a provider talking to the Cloud DNS REST API
    ///
    /// Credentials are not resolved until the first operation or an explicit
    /// [`CloudDnsProvider::new_session`].
    pub fn new(config: &CloudDnsConfig) -> Result<Self> {
        Ok(Self::with_api(Arc::new(CloudDnsClient::new(config)?)))
    }

    /// Create a provider on top of any [`DnsApi`] implementation
    pub fn with_api(api: Arc<dyn DnsApi>) -> Self {
        Self { api }
    }

    /// Establish the authenticated session now instead of on first use
    ///
    /// Authentication failures are returned as `Error::Authentication`. A
    /// failed attempt is retried by the next call.
    pub async fn new_session(&self) -> Result<()> {
        self.api.ensure_session().await
    }

    /// Resolve a zone name to its managed zone
    async fn get_zone(&self, zone: &str) -> Result<ManagedZone> {
        let dns_name = fqdn(zone);
        self.api
            .find_managed_zone(&dns_name)
            .await?
            .ok_or_else(|| Error::zone_not_found(dns_name))
    }

    /// Add one single-value record set per record
    async fn create_records(&self, zone: &ManagedZone, records: &[Record]) -> Result<Vec<Record>> {
        let change = Change::additions(
            records
                .iter()
                .map(|record| ResourceRecordSet::from_record(record, &zone.dns_name))
                .collect(),
        );
        self.api.create_change(zone, &change).await?;
        Ok(records.to_vec())
    }

    /// Delete the same record-set shape [`Self::create_records`] adds
    async fn remove_records(&self, zone: &ManagedZone, records: &[Record]) -> Result<Vec<Record>> {
        let change = Change::deletions(
            records
                .iter()
                .map(|record| ResourceRecordSet::from_record(record, &zone.dns_name))
                .collect(),
        );
        self.api.create_change(zone, &change).await?;
        Ok(records.to_vec())
    }
}

/// Merge records into one record set per (absolute name, type), in first-seen order
///
/// The TTL of the first record in a group wins; duplicate values are dropped.
fn group_record_sets(records: &[Record], zone_dns_name: &str) -> Vec<ResourceRecordSet> {
    let mut sets: Vec<ResourceRecordSet> = Vec::new();
    for record in records {
        let name = absolute_name(&record.name, zone_dns_name);
        match sets
            .iter_mut()
            .find(|set| set.name == name && set.record_type == record.record_type)
        {
            Some(set) => {
                if !set.rrdatas.contains(&record.value) {
                    set.rrdatas.push(record.value.clone());
                }
            }
            None => sets.push(ResourceRecordSet::from_record(record, zone_dns_name)),
        }
    }
    sets
}

#[async_trait]
impl RecordGetter for CloudDnsProvider {
    async fn get_records(&self, zone: &str) -> Result<Vec<Record>> {
        let zone = self.get_zone(zone).await?;
        let rrsets = self
            .api
            .list_record_sets(&zone, &RecordSetQuery::default())
            .await?;

        Ok(rrsets
            .iter()
            .flat_map(|set| set.to_records(&zone.dns_name))
            .collect())
    }
}

#[async_trait]
impl RecordAppender for CloudDnsProvider {
    /// Create the records; on a conflict, delete them and create them once more
    ///
    /// The retry happens at most once. A second conflict, a failed delete, or
    /// any non-conflict error fails the whole operation.
    async fn append_records(&self, zone: &str, records: &[Record]) -> Result<Vec<Record>> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let zone = self.get_zone(zone).await?;

        match self.create_records(&zone, records).await {
            Err(e) if e.is_conflict() => {
                tracing::warn!(
                    "Records already exist in {} ({}); deleting and recreating",
                    zone.dns_name,
                    e
                );
                self.remove_records(&zone, records).await?;
                self.create_records(&zone, records).await
            }
            result => result,
        }
    }
}

#[async_trait]
impl RecordSetter for CloudDnsProvider {
    /// Replace the record sets named by `records` in one change
    ///
    /// Existing sets for each (name, type) are deleted and the new sets added
    /// in the same change-set. Sets that already hold exactly the requested
    /// values and TTL are left alone; if nothing differs, no change is sent.
    async fn set_records(&self, zone: &str, records: &[Record]) -> Result<Vec<Record>> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let zone = self.get_zone(zone).await?;
        let mut change = Change::default();

        for target in group_record_sets(records, &zone.dns_name) {
            let existing = self
                .api
                .list_record_sets(
                    &zone,
                    &RecordSetQuery::exact(&target.name, &target.record_type),
                )
                .await?;

            if let [current] = existing.as_slice()
                && current.same_contents(&target)
            {
                tracing::debug!("{} {} is up to date", target.name, target.record_type);
                continue;
            }

            change.deletions.extend(existing);
            change.additions.push(target);
        }

        if change.is_empty() {
            tracing::info!("All record sets in {} are up to date", zone.dns_name);
            return Ok(records.to_vec());
        }

        self.api.create_change(&zone, &change).await?;
        Ok(records.to_vec())
    }
}

#[async_trait]
impl RecordDeleter for CloudDnsProvider {
    async fn delete_records(&self, zone: &str, records: &[Record]) -> Result<Vec<Record>> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let zone = self.get_zone(zone).await?;
        self.remove_records(&zone, records).await
    }
}

impl RecordProvider for CloudDnsProvider {
    fn provider_name(&self) -> &'static str {
        "clouddns"
    }
}

/// Factory for creating Cloud DNS providers
pub struct CloudDnsFactory;

impl RecordProviderFactory for CloudDnsFactory {
    fn create(&self, config: &ProviderConfig) -> Result<Box<dyn RecordProvider>> {
        match config {
            ProviderConfig::CloudDns(config) => Ok(Box::new(CloudDnsProvider::new(config)?)),
            _ => Err(Error::config("Invalid config for Cloud DNS provider")),
        }
    }
}

/// Register the Cloud DNS provider with a registry
///
/// # Example
///
/// ```rust
/// use clouddns_core::ProviderRegistry;
///
/// let registry = ProviderRegistry::new();
/// clouddns_provider_google::register(&registry);
/// assert!(registry.has_provider("clouddns"));
/// ```
pub fn register(registry: &clouddns_core::ProviderRegistry) {
    registry.register_provider("clouddns", Box::new(CloudDnsFactory));
}
