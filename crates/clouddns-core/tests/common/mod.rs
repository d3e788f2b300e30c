//! Test doubles and common utilities for interface contract tests
//!
//! [`MemoryProvider`] keeps zones in a map and follows the same rules a real
//! backend enforces: duplicate creates conflict, deleting a missing record
//! fails.

#![allow(dead_code)]

use clouddns_core::config::ProviderConfig;
use clouddns_core::error::{Error, Result};
use clouddns_core::traits::{
    RecordAppender, RecordDeleter, RecordGetter, RecordProvider, RecordProviderFactory,
    RecordSetter,
};
use clouddns_core::{Record, fqdn};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// An in-memory record provider that tracks calls
#[derive(Default)]
pub struct MemoryProvider {
    zones: Arc<Mutex<HashMap<String, Vec<Record>>>>,
    append_call_count: Arc<AtomicUsize>,
    delete_call_count: Arc<AtomicUsize>,
}

impl MemoryProvider {
    /// Create a provider that knows the given zones, all empty
    pub fn with_zones(zones: &[&str]) -> Self {
        let provider = Self::default();
        {
            let mut map = provider.zones.lock().unwrap();
            for zone in zones {
                map.insert(fqdn(zone), Vec::new());
            }
        }
        provider
    }

    /// Get the number of times append_records() was called
    pub fn append_call_count(&self) -> usize {
        self.append_call_count.load(Ordering::SeqCst)
    }

    /// Get the number of times delete_records() was called
    pub fn delete_call_count(&self) -> usize {
        self.delete_call_count.load(Ordering::SeqCst)
    }

    /// Create a new MemoryProvider that shares state with an existing one
    pub fn sharing_state_with(other: &Self) -> Self {
        Self {
            zones: Arc::clone(&other.zones),
            append_call_count: Arc::clone(&other.append_call_count),
            delete_call_count: Arc::clone(&other.delete_call_count),
        }
    }

    fn with_zone<T>(&self, zone: &str, f: impl FnOnce(&mut Vec<Record>) -> Result<T>) -> Result<T> {
        let mut zones = self.zones.lock().unwrap();
        let records = zones
            .get_mut(&fqdn(zone))
            .ok_or_else(|| Error::zone_not_found(zone))?;
        f(records)
    }
}

#[async_trait::async_trait]
impl RecordGetter for MemoryProvider {
    async fn get_records(&self, zone: &str) -> Result<Vec<Record>> {
        self.with_zone(zone, |records| Ok(records.clone()))
    }
}

#[async_trait::async_trait]
impl RecordAppender for MemoryProvider {
    async fn append_records(&self, zone: &str, records: &[Record]) -> Result<Vec<Record>> {
        self.append_call_count.fetch_add(1, Ordering::SeqCst);
        self.with_zone(zone, |existing| {
            if let Some(dup) = records.iter().find(|r| existing.contains(r)) {
                return Err(Error::conflict(format!("{} already exists", dup)));
            }
            existing.extend_from_slice(records);
            Ok(records.to_vec())
        })
    }
}

#[async_trait::async_trait]
impl RecordSetter for MemoryProvider {
    async fn set_records(&self, zone: &str, records: &[Record]) -> Result<Vec<Record>> {
        self.with_zone(zone, |existing| {
            existing.retain(|old| {
                !records
                    .iter()
                    .any(|new| new.name == old.name && new.record_type == old.record_type)
            });
            existing.extend_from_slice(records);
            Ok(records.to_vec())
        })
    }
}

#[async_trait::async_trait]
impl RecordDeleter for MemoryProvider {
    async fn delete_records(&self, zone: &str, records: &[Record]) -> Result<Vec<Record>> {
        self.delete_call_count.fetch_add(1, Ordering::SeqCst);
        self.with_zone(zone, |existing| {
            if let Some(missing) = records.iter().find(|r| !existing.contains(r)) {
                return Err(Error::api(404, format!("{} does not exist", missing)));
            }
            existing.retain(|old| !records.contains(old));
            Ok(records.to_vec())
        })
    }
}

impl RecordProvider for MemoryProvider {
    fn provider_name(&self) -> &'static str {
        "memory"
    }
}

/// Factory producing providers that share one set of zones
pub struct MemoryProviderFactory {
    pub shared: MemoryProvider,
}

impl RecordProviderFactory for MemoryProviderFactory {
    fn create(&self, config: &ProviderConfig) -> Result<Box<dyn RecordProvider>> {
        match config {
            ProviderConfig::Custom { factory, .. } if factory == "memory" => {
                Ok(Box::new(MemoryProvider::sharing_state_with(&self.shared)))
            }
            _ => Err(Error::config("Invalid config for memory provider")),
        }
    }
}

/// Helper to build an A record with a 300s TTL
pub fn a_record(name: &str, ip: &str) -> Record {
    Record::new(name, "A", ip, Duration::from_secs(300))
}
