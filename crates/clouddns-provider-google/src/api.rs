//! Cloud DNS v1 wire types
//!
//! Only the fields this provider reads or writes are modelled; unknown fields
//! in responses (`kind`, `creationTime`, ...) are ignored.

use clouddns_core::{Error, Record, absolute_name, relative_name};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A managed zone descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedZone {
    /// Provider-internal zone name, used in request paths
    pub name: String,

    /// Canonical DNS name of the zone root (`example.com.`)
    pub dns_name: String,

    /// Numeric zone id
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
}

/// All records sharing a name and type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRecordSet {
    /// Absolute name with trailing dot
    pub name: String,

    #[serde(rename = "type")]
    pub record_type: String,

    /// TTL in seconds
    #[serde(default)]
    pub ttl: u64,

    #[serde(default)]
    pub rrdatas: Vec<String>,
}

impl ResourceRecordSet {
    /// Single-value record set for `record`, named absolutely against the zone root
    pub fn from_record(record: &Record, zone_dns_name: &str) -> Self {
        Self {
            name: absolute_name(&record.name, zone_dns_name),
            record_type: record.record_type.clone(),
            ttl: record.ttl.as_secs(),
            rrdatas: vec![record.value.clone()],
        }
    }

    /// One record per value, named relative to the zone root
    pub fn to_records(&self, zone_dns_name: &str) -> Vec<Record> {
        let name = relative_name(&self.name, zone_dns_name);
        self.rrdatas
            .iter()
            .map(|value| {
                Record::new(
                    name.clone(),
                    self.record_type.clone(),
                    value.clone(),
                    Duration::from_secs(self.ttl),
                )
            })
            .collect()
    }

    /// Same name, type and TTL, and the same values in any order
    pub fn same_contents(&self, other: &Self) -> bool {
        let mut ours = self.rrdatas.clone();
        let mut theirs = other.rrdatas.clone();
        ours.sort();
        theirs.sort();
        self.name == other.name
            && self.record_type == other.record_type
            && self.ttl == other.ttl
            && ours == theirs
    }
}

/// An atomic change-set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Change {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additions: Vec<ResourceRecordSet>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deletions: Vec<ResourceRecordSet>,

    /// Assigned by the service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// `pending` or `done`, assigned by the service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl Change {
    /// A change that only adds
    pub fn additions(additions: Vec<ResourceRecordSet>) -> Self {
        Self {
            additions,
            ..Self::default()
        }
    }

    /// A change that only deletes
    pub fn deletions(deletions: Vec<ResourceRecordSet>) -> Self {
        Self {
            deletions,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.additions.is_empty() && self.deletions.is_empty()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedZonesListResponse {
    #[serde(default)]
    pub managed_zones: Vec<ManagedZone>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRecordSetsListResponse {
    #[serde(default)]
    pub rrsets: Vec<ResourceRecordSet>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    errors: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    reason: String,
}

/// Map a non-success response to an error kind
///
/// HTTP 409 and the `alreadyExists` reason are conflicts; 401 is an
/// authentication failure; everything else is an API error carrying the
/// status and the service message.
pub fn classify_error(status: u16, body: &str) -> Error {
    let parsed = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .map(|envelope| envelope.error);

    let message = parsed
        .as_ref()
        .map(|error| error.message.trim())
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| body.trim());
    let message = if message.is_empty() {
        format!("HTTP {status}")
    } else {
        message.to_string()
    };

    let already_exists = parsed.as_ref().is_some_and(|error| {
        error.status.as_deref() == Some("ALREADY_EXISTS")
            || error.errors.iter().any(|detail| detail.reason == "alreadyExists")
    });

    match status {
        409 => Error::conflict(message),
        _ if already_exists => Error::conflict(message),
        401 => Error::auth(message),
        _ => Error::api(status, message),
    }
}
