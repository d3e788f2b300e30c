//! Minimal embedding example for clouddns-core
//!
//! Shows a custom backend plugged in through the provider registry and driven
//! only through the four record traits. Callers written this way work
//! unchanged against the Google provider.

use async_trait::async_trait;
use clouddns_core::traits::{
    RecordAppender, RecordDeleter, RecordGetter, RecordProvider, RecordProviderFactory,
    RecordSetter,
};
use clouddns_core::{Error, ProviderConfig, ProviderRegistry, Record, Result, fqdn};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Zones = Arc<Mutex<HashMap<String, Vec<Record>>>>;

/// In-process zone store with the same conflict rules as a hosted backend
struct EmbeddedProvider {
    zones: Zones,
}

impl EmbeddedProvider {
    fn zone<'a>(
        zones: &'a mut HashMap<String, Vec<Record>>,
        zone: &str,
    ) -> Result<&'a mut Vec<Record>> {
        let name = fqdn(zone);
        zones
            .get_mut(&name)
            .ok_or_else(|| Error::zone_not_found(name))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<Record>>> {
        self.zones
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl RecordGetter for EmbeddedProvider {
    async fn get_records(&self, zone: &str) -> Result<Vec<Record>> {
        let mut zones = self.lock();
        Ok(Self::zone(&mut zones, zone)?.clone())
    }
}

#[async_trait]
impl RecordAppender for EmbeddedProvider {
    async fn append_records(&self, zone: &str, records: &[Record]) -> Result<Vec<Record>> {
        let mut zones = self.lock();
        let existing = Self::zone(&mut zones, zone)?;
        if let Some(duplicate) = records.iter().find(|r| existing.contains(r)) {
            return Err(Error::conflict(format!("{duplicate} already exists")));
        }
        existing.extend_from_slice(records);
        Ok(records.to_vec())
    }
}

#[async_trait]
impl RecordSetter for EmbeddedProvider {
    async fn set_records(&self, zone: &str, records: &[Record]) -> Result<Vec<Record>> {
        let mut zones = self.lock();
        let existing = Self::zone(&mut zones, zone)?;
        existing.retain(|old| {
            !records
                .iter()
                .any(|new| new.name == old.name && new.record_type == old.record_type)
        });
        existing.extend_from_slice(records);
        Ok(records.to_vec())
    }
}

#[async_trait]
impl RecordDeleter for EmbeddedProvider {
    async fn delete_records(&self, zone: &str, records: &[Record]) -> Result<Vec<Record>> {
        let mut zones = self.lock();
        let existing = Self::zone(&mut zones, zone)?;
        if let Some(missing) = records.iter().find(|r| !existing.contains(r)) {
            return Err(Error::api(404, format!("{missing} does not exist")));
        }
        existing.retain(|r| !records.contains(r));
        Ok(records.to_vec())
    }
}

impl RecordProvider for EmbeddedProvider {
    fn provider_name(&self) -> &'static str {
        "embedded"
    }
}

/// Builds providers over zones listed in the custom config
struct EmbeddedFactory;

impl RecordProviderFactory for EmbeddedFactory {
    fn create(&self, config: &ProviderConfig) -> Result<Box<dyn RecordProvider>> {
        let ProviderConfig::Custom { config, .. } = config else {
            return Err(Error::config("Invalid config for embedded provider"));
        };

        let zones = config["zones"]
            .as_array()
            .ok_or_else(|| Error::config("embedded provider needs a \"zones\" array"))?
            .iter()
            .filter_map(|zone| zone.as_str())
            .map(|zone| (fqdn(zone), Vec::new()))
            .collect();

        Ok(Box::new(EmbeddedProvider {
            zones: Arc::new(Mutex::new(zones)),
        }))
    }
}

fn print_zone(title: &str, records: &[Record]) {
    println!("{title}");
    for record in records {
        println!("   {record}");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    println!("=== Embedded clouddns-core Example ===\n");

    println!("1. Registering providers...");
    let registry = ProviderRegistry::new();
    registry.register_provider("embedded", Box::new(EmbeddedFactory));
    clouddns_provider_google::register(&registry);
    println!("   Available: {}", registry.list_providers().join(", "));

    let config = ProviderConfig::Custom {
        factory: "embedded".to_string(),
        config: serde_json::json!({ "zones": ["example.com"] }),
    };
    let provider = registry.create_provider(&config)?;
    println!("   Created '{}' provider\n", provider.provider_name());

    let ttl = Duration::from_secs(300);
    let www = Record::new("www", "A", "192.0.2.10", ttl);
    let spf = Record::new("@", "TXT", "\"v=spf1 -all\"", ttl);

    println!("2. Appending records...");
    provider
        .append_records("example.com", &[www.clone(), spf.clone()])
        .await?;
    print_zone("   Zone now holds:", &provider.get_records("example.com.").await?);

    println!("\n3. Appending a duplicate...");
    match provider.append_records("example.com", &[www.clone()]).await {
        Err(e) if e.is_conflict() => println!("   Conflict reported: {e}"),
        other => println!("   Unexpected result: {other:?}"),
    }

    println!("\n4. Replacing www with set_records...");
    let moved = Record::new("www", "A", "192.0.2.20", ttl);
    provider.set_records("example.com", &[moved]).await?;
    print_zone("   Zone now holds:", &provider.get_records("example.com").await?);

    println!("\n5. Deleting the TXT record...");
    provider.delete_records("example.com", &[spf]).await?;
    print_zone("   Zone now holds:", &provider.get_records("example.com").await?);

    println!("\n6. Using an unknown zone...");
    if let Err(e) = provider.get_records("example.org").await {
        println!("   {e}");
    }

    println!("\n=== Embedding Successful ===");
    Ok(())
}
