//! Provider behaviour against a mocked Cloud DNS REST endpoint

mod common;

use clouddns_core::traits::{RecordAppender, RecordDeleter, RecordGetter, RecordSetter};
use clouddns_core::{Error, Record};
use common::*;
use httpmock::prelude::*;
use serde_json::json;
use std::time::Duration;

#[tokio::test]
async fn zone_lookup_sends_dns_name_and_bearer_token() {
    let server = MockServer::start_async().await;
    let zones = server
        .mock_async(|when, then| {
            when.method(GET)
                .path(ZONES_PATH)
                .query_param("dnsName", "example.com.")
                .query_param("maxResults", "1")
                .header("authorization", "Bearer test-token");
            then.status(200).json_body(json!({
                "managedZones": [{"name": "example-com", "dnsName": "example.com."}]
            }));
        })
        .await;
    let rrsets = server
        .mock_async(|when, then| {
            when.method(GET).path(RRSETS_PATH);
            then.status(200).json_body(json!({"rrsets": []}));
        })
        .await;

    let records = provider_for(&server.base_url())
        .get_records("example.com")
        .await
        .unwrap();

    assert!(records.is_empty());
    zones.assert_async().await;
    rrsets.assert_async().await;
}

#[tokio::test]
async fn unknown_zone_is_zone_not_found() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(ZONES_PATH);
            then.status(200).json_body(json!({}));
        })
        .await;
    let changes = server
        .mock_async(|when, then| {
            when.method(POST);
            then.status(200).json_body(json!({}));
        })
        .await;

    let err = provider_for(&server.base_url())
        .append_records("missing.example.", &[www_record()])
        .await
        .unwrap_err();

    assert!(matches!(err, Error::ZoneNotFound(ref zone) if zone == "missing.example."));
    assert_eq!(changes.hits_async().await, 0);
}

#[tokio::test]
async fn get_records_flattens_record_sets() {
    let server = MockServer::start_async().await;
    mock_example_zone(&server).await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(RRSETS_PATH);
            then.status(200).json_body(json!({
                "kind": "dns#resourceRecordSetsListResponse",
                "rrsets": [
                    {"name": "example.com.", "type": "MX", "ttl": 3600, "rrdatas": ["10 mx1.example.com.", "20 mx2.example.com."]},
                    {"name": "www.example.com.", "type": "A", "ttl": 300, "rrdatas": ["192.0.2.10"]}
                ]
            }));
        })
        .await;

    let records = provider_for(&server.base_url())
        .get_records("example.com.")
        .await
        .unwrap();

    assert_eq!(
        records,
        vec![
            Record::new("@", "MX", "10 mx1.example.com.", Duration::from_secs(3600)),
            Record::new("@", "MX", "20 mx2.example.com.", Duration::from_secs(3600)),
            www_record(),
        ]
    );
}

fn without_page_token(req: &HttpMockRequest) -> bool {
    req.query_params
        .as_ref()
        .is_none_or(|params| params.iter().all(|(key, _)| key != "pageToken"))
}

#[tokio::test]
async fn get_records_follows_next_page_token() {
    let server = MockServer::start_async().await;
    mock_example_zone(&server).await;
    let first_page = server
        .mock_async(|when, then| {
            when.method(GET).path(RRSETS_PATH).matches(without_page_token);
            then.status(200).json_body(json!({
                "rrsets": [{"name": "a.example.com.", "type": "A", "ttl": 300, "rrdatas": ["192.0.2.1"]}],
                "nextPageToken": "p2"
            }));
        })
        .await;
    let second_page = server
        .mock_async(|when, then| {
            when.method(GET)
                .path(RRSETS_PATH)
                .query_param("pageToken", "p2");
            then.status(200).json_body(json!({
                "rrsets": [{"name": "b.example.com.", "type": "A", "ttl": 300, "rrdatas": ["192.0.2.2"]}]
            }));
        })
        .await;

    let records = provider_for(&server.base_url())
        .get_records("example.com.")
        .await
        .unwrap();

    let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b"]);
    first_page.assert_hits_async(1).await;
    second_page.assert_hits_async(1).await;
}

#[tokio::test]
async fn append_posts_additions() {
    let server = MockServer::start_async().await;
    mock_example_zone(&server).await;
    let changes = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(CHANGES_PATH)
                .header("authorization", "Bearer test-token")
                .json_body(json!({
                    "additions": [
                        {"name": "www.example.com.", "type": "A", "ttl": 300, "rrdatas": ["192.0.2.10"]}
                    ]
                }));
            then.status(200)
                .json_body(json!({"kind": "dns#change", "id": "7", "status": "pending"}));
        })
        .await;

    let created = provider_for(&server.base_url())
        .append_records("example.com.", &[www_record()])
        .await
        .unwrap();

    assert_eq!(created, vec![www_record()]);
    changes.assert_async().await;
}

#[tokio::test]
async fn append_conflict_is_retried_exactly_once() {
    let server = MockServer::start_async().await;
    mock_example_zone(&server).await;
    let additions = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(CHANGES_PATH)
                .body_contains("\"additions\"");
            then.status(409).json_body(json!({
                "error": {
                    "code": 409,
                    "message": "The resource 'entity.change.additions[0]' named 'www.example.com. (A)' already exists",
                    "errors": [{"domain": "global", "reason": "alreadyExists"}]
                }
            }));
        })
        .await;
    let deletions = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(CHANGES_PATH)
                .body_contains("\"deletions\"");
            then.status(200).json_body(json!({"id": "8", "status": "done"}));
        })
        .await;

    let err = provider_for(&server.base_url())
        .append_records("example.com.", &[www_record()])
        .await
        .unwrap_err();

    assert!(err.is_conflict());
    assert_eq!(additions.hits_async().await, 2);
    assert_eq!(deletions.hits_async().await, 1);
}

#[tokio::test]
async fn delete_of_missing_record_is_api_error() {
    let server = MockServer::start_async().await;
    mock_example_zone(&server).await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(CHANGES_PATH);
            then.status(404).json_body(json!({
                "error": {
                    "code": 404,
                    "message": "The 'entity.change.deletions[0]' resource named 'www.example.com. (A)' does not exist.",
                    "errors": [{"reason": "notFound"}]
                }
            }));
        })
        .await;

    let err = provider_for(&server.base_url())
        .delete_records("example.com.", &[www_record()])
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Api { status: 404, ref message } if message.contains("does not exist")));
}

#[tokio::test]
async fn set_replaces_existing_record_set_in_one_change() {
    let server = MockServer::start_async().await;
    mock_example_zone(&server).await;
    let lookup = server
        .mock_async(|when, then| {
            when.method(GET)
                .path(RRSETS_PATH)
                .query_param("name", "www.example.com.")
                .query_param("type", "A");
            then.status(200).json_body(json!({
                "rrsets": [{"name": "www.example.com.", "type": "A", "ttl": 60, "rrdatas": ["192.0.2.99"]}]
            }));
        })
        .await;
    let changes = server
        .mock_async(|when, then| {
            when.method(POST).path(CHANGES_PATH).json_body(json!({
                "additions": [{"name": "www.example.com.", "type": "A", "ttl": 300, "rrdatas": ["192.0.2.10"]}],
                "deletions": [{"name": "www.example.com.", "type": "A", "ttl": 60, "rrdatas": ["192.0.2.99"]}]
            }));
            then.status(200).json_body(json!({"id": "9", "status": "pending"}));
        })
        .await;

    let updated = provider_for(&server.base_url())
        .set_records("example.com.", &[www_record()])
        .await
        .unwrap();

    assert_eq!(updated, vec![www_record()]);
    lookup.assert_async().await;
    changes.assert_async().await;
}

#[tokio::test]
async fn unauthorized_is_authentication_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(ZONES_PATH);
            then.status(401).json_body(json!({
                "error": {
                    "code": 401,
                    "message": "Request had invalid authentication credentials.",
                    "status": "UNAUTHENTICATED"
                }
            }));
        })
        .await;

    let err = provider_for(&server.base_url())
        .get_records("example.com.")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Authentication(_)));
}

#[tokio::test]
async fn unreachable_endpoint_is_transport_error() {
    let err = provider_for("http://127.0.0.1:1")
        .get_records("example.com.")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Http(_)));
    assert!(err.is_transport());
}
