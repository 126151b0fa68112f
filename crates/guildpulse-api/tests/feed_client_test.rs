#![allow(clippy::unwrap_used)]
// Integration tests for `FeedClient` using wiremock.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use guildpulse_api::{Error, FeedClient, FeedConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, FeedClient) {
    let server = MockServer::start().await;
    let config = FeedConfig::new(
        &format!("{}/data/member_count.json", server.uri()),
        &format!("{}/data/messages.json", server.uri()),
        Duration::from_secs(5),
    )
    .unwrap();
    (server, FeedClient::new(config).unwrap())
}

fn member_body() -> serde_json::Value {
    json!([
        { "timestamp": "2024-01-01T01:00:00Z", "total_members": 12, "online_members": 3 },
        { "timestamp": "2024-01-01T00:00:00Z", "total_members": 10, "online_members": 2 }
    ])
}

fn message_body() -> serde_json::Value {
    json!([
        { "timestamp": "2024-01-01T00:05:00Z", "messages_last_10min": 42 }
    ])
}

async fn mount_members(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/data/member_count.json"))
        .respond_with(template)
        .mount(server)
        .await;
}

async fn mount_messages(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/data/messages.json"))
        .respond_with(template)
        .mount(server)
        .await;
}

// ── Fetch tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_members_preserves_feed_order() {
    let (server, client) = setup().await;
    mount_members(&server, ResponseTemplate::new(200).set_body_json(member_body())).await;

    let members = client.fetch_members().await.unwrap();

    // The client does not sort — that is the consumer's job.
    assert_eq!(members.len(), 2);
    assert_eq!(members[0].total_members, 12);
    assert_eq!(members[1].total_members, 10);
}

#[tokio::test]
async fn test_fetch_all_returns_both_feeds() {
    let (server, client) = setup().await;
    mount_members(&server, ResponseTemplate::new(200).set_body_json(member_body())).await;
    mount_messages(&server, ResponseTemplate::new(200).set_body_json(message_body())).await;

    let (members, messages) = client.fetch_all().await.unwrap();

    assert_eq!(members.len(), 2);
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].messages_last_10min, 42);
}

#[tokio::test]
async fn test_fetch_all_fails_if_member_feed_errors() {
    let (server, client) = setup().await;
    mount_members(&server, ResponseTemplate::new(404)).await;
    mount_messages(&server, ResponseTemplate::new(200).set_body_json(message_body())).await;

    let result = client.fetch_all().await;

    assert!(
        matches!(result, Err(Error::Status { status: 404, .. })),
        "expected Status error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_fetch_all_fails_if_message_feed_errors() {
    let (server, client) = setup().await;
    mount_members(&server, ResponseTemplate::new(200).set_body_json(member_body())).await;
    mount_messages(&server, ResponseTemplate::new(503)).await;

    let result = client.fetch_all().await;

    match result {
        Err(err @ Error::Status { status: 503, .. }) => {
            assert!(err.is_transient(), "5xx should be transient");
        }
        other => panic!("expected Status error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_is_deserialization_error() {
    let (server, client) = setup().await;
    mount_members(
        &server,
        ResponseTemplate::new(200).set_body_string("<html>rate limited</html>"),
    )
    .await;

    let result = client.fetch_members().await;

    assert!(
        matches!(result, Err(Error::Deserialization { .. })),
        "expected Deserialization error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_malformed_body_with_multibyte_chars_near_preview_cutoff() {
    let (server, client) = setup().await;
    // A multi-byte char straddling byte 200 must not break preview truncation.
    let mut body = "a".repeat(199);
    body.push_str("é and more broken content");
    mount_members(&server, ResponseTemplate::new(200).set_body_string(body)).await;

    let result = client.fetch_members().await;

    assert!(
        matches!(result, Err(Error::Deserialization { .. })),
        "expected Deserialization error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_offsetless_collector_timestamps_parse() {
    let (server, client) = setup().await;
    mount_members(
        &server,
        ResponseTemplate::new(200).set_body_json(json!([
            { "timestamp": "2024-01-01T00:00:00.123456", "total_members": 10, "online_members": 2 }
        ])),
    )
    .await;

    let members = client.fetch_members().await.unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(
        members[0].timestamp.to_rfc3339(),
        "2024-01-01T00:00:00.123456+00:00"
    );
}

#[tokio::test]
async fn test_empty_feed_is_valid() {
    let (server, client) = setup().await;
    mount_members(&server, ResponseTemplate::new(200).set_body_json(json!([]))).await;

    let members = client.fetch_members().await.unwrap();
    assert!(members.is_empty());
}
