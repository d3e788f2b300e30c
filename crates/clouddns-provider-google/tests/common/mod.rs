//! Shared fixtures for the Cloud DNS HTTP tests

use clouddns_core::{CloudDnsConfig, Record};
use clouddns_provider_google::{CloudDnsClient, CloudDnsProvider, StaticToken};
use httpmock::prelude::*;
use std::sync::Arc;
use std::time::Duration;

pub const PROJECT: &str = "test-project";
pub const TOKEN: &str = "test-token";
pub const ZONES_PATH: &str = "/projects/test-project/managedZones";
pub const RRSETS_PATH: &str = "/projects/test-project/managedZones/example-com/rrsets";
pub const CHANGES_PATH: &str = "/projects/test-project/managedZones/example-com/changes";

/// Provider pointed at `api_base` with a fixed bearer token
pub fn provider_for(api_base: &str) -> CloudDnsProvider {
    let config = CloudDnsConfig::new(PROJECT).with_api_base(api_base);
    let client = CloudDnsClient::new(&config)
        .unwrap()
        .with_token_source(Arc::new(StaticToken::new(TOKEN)));
    CloudDnsProvider::with_api(Arc::new(client))
}

/// Serve the example.com. zone lookup
pub async fn mock_example_zone(server: &MockServer) -> httpmock::Mock<'_> {
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path(ZONES_PATH)
                .query_param("dnsName", "example.com.");
            then.status(200).json_body(serde_json::json!({
                "kind": "dns#managedZonesListResponse",
                "managedZones": [{
                    "kind": "dns#managedZone",
                    "name": "example-com",
                    "dnsName": "example.com.",
                    "id": "1234567890"
                }]
            }));
        })
        .await
}

pub fn www_record() -> Record {
    Record::new("www", "A", "192.0.2.10", Duration::from_secs(300))
}
