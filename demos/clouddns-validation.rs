// # Cloud DNS Provider Real Environment Validation Tool
//
// Exercises the Google provider against a real Cloud DNS zone.
//
// ## Usage
//
// ```bash
// # Dry-run mode (default - read only)
// CLOUDDNS_PROJECT=my-project \
// CLOUDDNS_JSON_KEY_FILE=/path/to/key.json \
// CLOUDDNS_ZONE=test.example.com \
// cargo run -p clouddns-demos --bin clouddns_validation
//
// # Live mode (creates and deletes a TXT record!)
// CLOUDDNS_MODE=live \
// CLOUDDNS_PROJECT=my-project \
// CLOUDDNS_ZONE=test.example.com \
// CLOUDDNS_RECORD_NAME=clouddns-validation \
// cargo run -p clouddns-demos --bin clouddns_validation
// ```
//
// ## Environment Variables
//
// Required:
// - `CLOUDDNS_PROJECT`: Google Cloud project id
// - `CLOUDDNS_ZONE`: Zone to test (e.g., "example.com")
//
// Optional:
// - `CLOUDDNS_JSON_KEY_FILE`: Service-account key (default: ambient credentials)
// - `CLOUDDNS_RECORD_NAME`: Relative record name (default: clouddns-validation)
// - `CLOUDDNS_MODE`: "dry-run" or "live" (default: dry-run)

use clouddns_core::traits::{RecordAppender, RecordDeleter, RecordGetter, RecordSetter};
use clouddns_core::{CloudDnsConfig, Record};
use clouddns_provider_google::CloudDnsProvider;
use std::env;
use std::process::ExitCode;
use std::time::Duration;

fn required(name: &str) -> Option<String> {
    match env::var(name) {
        Ok(value) if !value.is_empty() => Some(value),
        _ => {
            tracing::error!("{} environment variable is required", name);
            None
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    tracing::info!("=== Cloud DNS Provider Real Environment Validation ===");

    let (Some(project), Some(zone)) = (required("CLOUDDNS_PROJECT"), required("CLOUDDNS_ZONE"))
    else {
        return ExitCode::FAILURE;
    };
    let key_file = env::var("CLOUDDNS_JSON_KEY_FILE").ok();
    let record_name =
        env::var("CLOUDDNS_RECORD_NAME").unwrap_or_else(|_| "clouddns-validation".to_string());
    let mode = env::var("CLOUDDNS_MODE").unwrap_or_else(|_| "dry-run".to_string());
    let dry_run = mode.to_lowercase() != "live";

    if dry_run {
        tracing::warn!("Running in DRY-RUN mode - no changes will be made");
    } else {
        tracing::warn!("Running in LIVE mode - will make actual DNS changes!");
    }

    tracing::info!("Configuration:");
    tracing::info!("  Project: {}", project);
    tracing::info!("  Zone: {}", zone);
    tracing::info!("  Record: {}", record_name);
    tracing::info!(
        "  Credentials: {}",
        key_file.as_deref().unwrap_or("(ambient)")
    );

    let mut config = CloudDnsConfig::new(project);
    if let Some(path) = key_file {
        config = config.with_json_key_file(path);
    }

    tracing::info!("--- Step 1: Creating provider and session ---");
    let provider = match CloudDnsProvider::new(&config) {
        Ok(provider) => provider,
        Err(e) => {
            tracing::error!("Failed to create provider: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = provider.new_session().await {
        tracing::error!("Failed to establish session: {}", e);
        return ExitCode::FAILURE;
    }
    tracing::info!("Session established");

    tracing::info!("--- Step 2: Listing records ---");
    match provider.get_records(&zone).await {
        Ok(records) => {
            tracing::info!("Zone holds {} record(s)", records.len());
            for record in &records {
                tracing::info!("  {}", record);
            }
        }
        Err(e) => {
            tracing::error!("Failed to list records: {}", e);
            return ExitCode::FAILURE;
        }
    }

    if dry_run {
        tracing::info!("Dry run complete; set CLOUDDNS_MODE=live to test writes");
        return ExitCode::SUCCESS;
    }

    let ttl = Duration::from_secs(60);
    let first = Record::new(record_name.as_str(), "TXT", "\"clouddns validation 1\"", ttl);
    let second = Record::new(record_name.as_str(), "TXT", "\"clouddns validation 2\"", ttl);

    match run_live(&provider, &zone, &first, &second).await {
        Ok(()) => {
            tracing::info!("=== Validation Successful ===");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Validation failed: {}", e);
            tracing::warn!(
                "Check {} in {} for leftover validation records",
                record_name,
                zone
            );
            ExitCode::FAILURE
        }
    }
}

async fn run_live(
    provider: &CloudDnsProvider,
    zone: &str,
    first: &Record,
    second: &Record,
) -> clouddns_core::Result<()> {
    tracing::info!("--- Step 3: Appending {} ---", first);
    provider.append_records(zone, &[first.clone()]).await?;

    tracing::info!("--- Step 4: Appending again (conflict recovery) ---");
    provider.append_records(zone, &[first.clone()]).await?;

    tracing::info!("--- Step 5: Replacing with {} ---", second);
    provider.set_records(zone, &[second.clone()]).await?;

    let records = provider.get_records(zone).await?;
    if !records.contains(second) || records.contains(first) {
        return Err(clouddns_core::Error::invalid_input(
            "zone contents do not reflect set_records",
        ));
    }
    tracing::info!("Zone reflects the replacement");

    tracing::info!("--- Step 6: Deleting {} ---", second);
    provider.delete_records(zone, &[second.clone()]).await?;
    Ok(())
}
