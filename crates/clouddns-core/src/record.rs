//! Provider-agnostic DNS record and zone name helpers
//!
//! Record names are relative to their zone (`www`, `@` for the apex). Providers
//! convert them to absolute names with [`absolute_name`] before talking to
//! their API and back with [`relative_name`] when reading.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// TTL used when a parsed record does not specify one
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// A single DNS record
///
/// One record holds one value. Providers that group values by name and type
/// (resource-record-sets) flatten them into several records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    /// Name relative to the zone (`www`, `@` for the apex)
    pub name: String,

    /// Record type (A, AAAA, CNAME, TXT, ...)
    #[serde(rename = "type")]
    pub record_type: String,

    /// Record data in presentation format
    pub value: String,

    /// Time-to-live
    #[serde(with = "ttl_seconds")]
    pub ttl: Duration,
}

impl Record {
    /// Create a new record
    pub fn new(
        name: impl Into<String>,
        record_type: impl Into<String>,
        value: impl Into<String>,
        ttl: Duration,
    ) -> Self {
        Self {
            name: name.into(),
            record_type: record_type.into(),
            value: value.into(),
            ttl,
        }
    }
}

/// Zone-file order: `NAME TTL TYPE VALUE`
impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.name,
            self.ttl.as_secs(),
            self.record_type,
            self.value
        )
    }
}

/// Parses `NAME TTL TYPE VALUE` or `NAME TYPE VALUE`
///
/// The value is everything after the type, so TXT data may contain spaces.
impl FromStr for Record {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, rest) = next_token(s)
            .ok_or_else(|| Error::invalid_input("record is empty"))?;
        let (second, rest) = next_token(rest)
            .ok_or_else(|| Error::invalid_input(format!("record '{s}' has no type")))?;

        let (ttl, record_type, rest) = match second.parse::<u64>() {
            Ok(secs) => {
                let (record_type, rest) = next_token(rest).ok_or_else(|| {
                    Error::invalid_input(format!("record '{s}' has no type"))
                })?;
                (Duration::from_secs(secs), record_type, rest)
            }
            Err(_) => (DEFAULT_TTL, second, rest),
        };

        let value = rest.trim_end();
        if value.is_empty() {
            return Err(Error::invalid_input(format!("record '{s}' has no value")));
        }

        Ok(Record::new(
            name,
            record_type.to_ascii_uppercase(),
            value,
            ttl,
        ))
    }
}

fn next_token(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if s.is_empty() {
        return None;
    }
    match s.split_once(char::is_whitespace) {
        Some((token, rest)) => Some((token, rest.trim_start())),
        None => Some((s, "")),
    }
}

/// Ensure a zone name carries exactly one trailing dot
pub fn fqdn(zone: &str) -> String {
    format!("{}.", zone.trim_end_matches('.'))
}

/// Make a record name absolute against its zone
///
/// `""` and `"@"` name the apex. A name with a trailing dot is already
/// absolute and is returned unchanged.
pub fn absolute_name(name: &str, zone: &str) -> String {
    let zone = fqdn(zone);
    if name.is_empty() || name == "@" {
        return zone;
    }
    if name.ends_with('.') {
        return name.to_string();
    }
    format!("{name}.{zone}")
}

/// Make an absolute name relative to its zone
///
/// Trailing dots on either side are ignored and the zone matches without
/// regard to ASCII case. The apex becomes `"@"`; a name outside the zone is
/// returned without its trailing dot. The relative part keeps its casing.
pub fn relative_name(fqdn: &str, zone: &str) -> String {
    let name = fqdn.trim_end_matches('.');
    let zone = zone.trim_end_matches('.');

    if name.eq_ignore_ascii_case(zone) {
        return "@".to_string();
    }
    if let Some(split) = name.len().checked_sub(zone.len())
        && let (Some(prefix), Some(suffix)) = (name.get(..split), name.get(split..))
        && suffix.eq_ignore_ascii_case(zone)
        && let Some(label) = prefix.strip_suffix('.')
    {
        return label.to_string();
    }
    name.to_string()
}

mod ttl_seconds {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(ttl: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(ttl.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
