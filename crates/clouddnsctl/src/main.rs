// # clouddnsctl - Cloud DNS record client
//
// A thin command-line layer over clouddns-core and the Google provider.
// It parses arguments, resolves configuration, runs exactly one record
// operation and prints the resulting records. No DNS logic lives here.
//
// ## Configuration
//
// Either a JSON provider config file (`--config`) or flags/environment:
//
// - `CLOUDDNS_PROJECT` / `--project`: Google Cloud project id
// - `CLOUDDNS_JSON_KEY_FILE` / `--json-key-file`: service-account key; ambient
//   credentials are used when unset
// - `CLOUDDNS_API_BASE` / `--api-base`: API endpoint override
// - `CLOUDDNS_LOG_LEVEL` / `--log-level`: trace, debug, info, warn, error
//
// ## Example
//
// ```bash
// export CLOUDDNS_PROJECT=my-project
// export CLOUDDNS_JSON_KEY_FILE=/etc/clouddns/key.json
//
// clouddnsctl list example.com
// clouddnsctl append example.com "www 300 A 192.0.2.10"
// clouddnsctl set example.com "@ 3600 TXT \"v=spf1 -all\""
// clouddnsctl --json delete example.com "www 300 A 192.0.2.10"
// ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use clouddns_core::traits::{RecordAppender, RecordDeleter, RecordGetter, RecordSetter};
use clouddns_core::{CloudDnsConfig, ProviderConfig, ProviderRegistry, Record, RecordProvider};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes
///
/// - 0: Success
/// - 1: Configuration or argument error, nothing was sent
/// - 2: Runtime error (authentication, API, transport)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CtlExitCode {
    Success = 0,
    ConfigError = 1,
    RuntimeError = 2,
}

impl From<CtlExitCode> for ExitCode {
    fn from(code: CtlExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

#[derive(Debug, Parser)]
#[command(name = "clouddnsctl")]
#[command(version, about = "Manage records in Google Cloud DNS zones")]
struct Cli {
    /// Google Cloud project id
    #[arg(long, env = "CLOUDDNS_PROJECT")]
    project: Option<String>,

    /// Service-account JSON key file
    #[arg(long, env = "CLOUDDNS_JSON_KEY_FILE")]
    json_key_file: Option<PathBuf>,

    /// Cloud DNS API base URL
    #[arg(long, env = "CLOUDDNS_API_BASE")]
    api_base: Option<String>,

    /// Provider config file; takes precedence over the flags above
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, env = "CLOUDDNS_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Print records as JSON instead of zone-file lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List every record in a zone
    List {
        /// Zone name, e.g. example.com
        zone: String,
    },

    /// Add records; existing conflicting records are replaced once
    Append {
        zone: String,
        /// Records as "NAME TTL TYPE VALUE"
        #[arg(required = true)]
        records: Vec<String>,
    },

    /// Replace the record sets named by the given records
    Set {
        zone: String,
        /// Records as "NAME TTL TYPE VALUE"
        #[arg(required = true)]
        records: Vec<String>,
    },

    /// Delete records
    Delete {
        zone: String,
        /// Records as "NAME TTL TYPE VALUE"
        #[arg(required = true)]
        records: Vec<String>,
    },
}

impl Command {
    fn zone(&self) -> &str {
        match self {
            Command::List { zone }
            | Command::Append { zone, .. }
            | Command::Set { zone, .. }
            | Command::Delete { zone, .. } => zone,
        }
    }

    /// Parse the record arguments
    fn records(&self) -> Result<Vec<Record>> {
        let raw: &[String] = match self {
            Command::List { .. } => &[],
            Command::Append { records, .. }
            | Command::Set { records, .. }
            | Command::Delete { records, .. } => records,
        };

        raw.iter()
            .map(|s| {
                s.parse::<Record>()
                    .with_context(|| format!("Invalid record '{s}'"))
            })
            .collect()
    }
}

impl Cli {
    /// Validate everything that can be checked without the network
    fn validate(&self) -> Result<()> {
        parse_log_level(&self.log_level)?;
        validate_zone_name(self.command.zone())?;
        Ok(())
    }

    /// Resolve the provider configuration from `--config` or flags/env
    fn provider_config(&self) -> Result<ProviderConfig> {
        if let Some(path) = &self.config {
            return ProviderConfig::from_json_file(path)
                .with_context(|| format!("Failed to load config file {}", path.display()));
        }

        let project = self
            .project
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .context(
                "A project is required. \
                Set it via: export CLOUDDNS_PROJECT=your-project (or --project, or --config)",
            )?;

        let mut config = CloudDnsConfig::new(project);
        if let Some(key_file) = &self.json_key_file {
            config = config.with_json_key_file(key_file);
        }
        if let Some(api_base) = &self.api_base {
            config = config.with_api_base(api_base);
        }

        let config = ProviderConfig::from(config);
        config.validate()?;
        Ok(config)
    }
}

fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => anyhow::bail!(
            "Log level '{}' is not valid. \
            Valid levels: trace, debug, info, warn, error",
            level
        ),
    }
}

/// Validate a zone name per RFC 1035 label rules
///
/// A single trailing dot is accepted.
fn validate_zone_name(zone: &str) -> Result<()> {
    let domain = zone.strip_suffix('.').unwrap_or(zone);

    if domain.is_empty() {
        anyhow::bail!("Zone name cannot be empty");
    }

    if domain.len() > 253 {
        anyhow::bail!(
            "Zone name too long: {} chars (max 253). Got: {}",
            domain.len(),
            zone
        );
    }

    for label in domain.split('.') {
        if label.is_empty() {
            anyhow::bail!("Zone name has empty label: '{}'", zone);
        }

        if label.len() > 63 {
            anyhow::bail!(
                "Zone label too long: {} chars (max 63). Label: '{}'",
                label.len(),
                label
            );
        }

        if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            anyhow::bail!(
                "Zone label contains invalid characters. Label: '{}'. \
                Valid: alphanumeric and hyphen only.",
                label
            );
        }

        if label.starts_with('-') || label.ends_with('-') {
            anyhow::bail!(
                "Zone label cannot start or end with hyphen. Label: '{}'",
                label
            );
        }
    }

    Ok(())
}

/// Format records for stdout
fn render(records: &[Record], json: bool) -> Result<String> {
    if json {
        return serde_json::to_string_pretty(records).context("Failed to serialize records");
    }

    Ok(records
        .iter()
        .map(|record| record.to_string())
        .collect::<Vec<_>>()
        .join("\n"))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = cli.validate() {
        eprintln!("Argument error: {:#}", e);
        return CtlExitCode::ConfigError.into();
    }

    let records = match cli.command.records() {
        Ok(records) => records,
        Err(e) => {
            eprintln!("Argument error: {:#}", e);
            return CtlExitCode::ConfigError.into();
        }
    };

    let config = match cli.provider_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return CtlExitCode::ConfigError.into();
        }
    };

    let log_level = parse_log_level(&cli.log_level).unwrap_or(Level::INFO);
    // Logs go to stderr so stdout stays parseable
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return CtlExitCode::ConfigError.into();
    }

    let registry = ProviderRegistry::new();
    clouddns_provider_google::register(&registry);

    let provider = match registry.create_provider(&config) {
        Ok(provider) => provider,
        Err(e) => {
            error!("Failed to create {} provider: {}", config.type_name(), e);
            return CtlExitCode::ConfigError.into();
        }
    };

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return CtlExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(run(provider.as_ref(), &cli.command, &records));

    match result.and_then(|records| render(&records, cli.json)) {
        Ok(output) => {
            if !output.is_empty() {
                println!("{output}");
            }
            CtlExitCode::Success.into()
        }
        Err(e) => {
            error!("{:#}", e);
            CtlExitCode::RuntimeError.into()
        }
    }
}

/// Run one record operation
async fn run(
    provider: &dyn RecordProvider,
    command: &Command,
    records: &[Record],
) -> Result<Vec<Record>> {
    let zone = command.zone();
    info!("Using {} provider for zone {}", provider.provider_name(), zone);

    let result = match command {
        Command::List { .. } => provider.get_records(zone).await,
        Command::Append { .. } => provider.append_records(zone, records).await,
        Command::Set { .. } => provider.set_records(zone, records).await,
        Command::Delete { .. } => provider.delete_records(zone, records).await,
    };

    let records = result.with_context(|| format!("Operation on zone {zone} failed"))?;
    info!("{} record(s) affected in {}", records.len(), zone);
    Ok(records)
}
