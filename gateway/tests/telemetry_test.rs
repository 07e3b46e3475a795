//! Integration tests: telemetry_test.

use std::time::{Duration, Instant};

use chrono::DateTime;
use content_hub_gateway::{
    model::{Collection, ContentStats, SessionAction, SessionActionKind},
    ContentGateway, GatewayConfig,
};
use serde_json::{json, Map, Value};
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

fn gateway_for(server: &MockServer) -> ContentGateway {
    ContentGateway::new(GatewayConfig::new(&server.uri()).expect("config")).expect("gateway")
}

fn unreachable_gateway() -> ContentGateway {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    ContentGateway::new(GatewayConfig::new(&format!("http://{addr}")).expect("config"))
        .expect("gateway")
}

async fn mount_session_sink(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/user-sessions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "id": 1 } })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn session_action_posts_wrapped_record() {
    let server = MockServer::start().await;
    mount_session_sink(&server).await;

    let mut metadata = Map::new();
    metadata.insert("referrer".to_string(), Value::from("newsletter"));
    let action =
        SessionAction::new(SessionActionKind::View, Collection::Articles, 7).with_metadata(metadata);

    gateway_for(&server)
        .record_session_action("session-abc", action)
        .await
        .expect("recorded");

    let requests = server.received_requests().await.expect("recorded requests");
    assert_eq!(requests.len(), 1);
    let body: Value = requests[0].body_json().expect("json body");
    let data = &body["data"];
    assert_eq!(data["sessionId"], "session-abc");
    assert_eq!(data["action"], "view");
    assert_eq!(data["contentType"], "articles");
    assert_eq!(data["contentId"], 7);
    assert_eq!(data["metadata"]["referrer"], "newsletter");
    let timestamp = data["timestamp"].as_str().expect("timestamp string");
    assert!(DateTime::parse_from_rfc3339(timestamp).is_ok());
}

#[tokio::test]
async fn session_action_without_metadata_omits_the_field() {
    let server = MockServer::start().await;
    mount_session_sink(&server).await;

    gateway_for(&server)
        .record_session_action(
            "s-1",
            SessionAction::new(SessionActionKind::Share, Collection::Videos, 3),
        )
        .await
        .expect("recorded");

    let requests = server.received_requests().await.expect("recorded requests");
    let body: Value = requests[0].body_json().expect("json body");
    assert_eq!(body["data"]["action"], "share");
    assert!(body["data"].get("metadata").is_none());
}

#[tokio::test]
async fn rejected_session_action_surfaces_the_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/user-sessions"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let err = gateway_for(&server)
        .record_session_action("s-1", SessionAction::new(SessionActionKind::Like, Collection::News, 1))
        .await
        .expect_err("403 must fail");

    assert_eq!(err.status().map(|status| status.as_u16()), Some(403));
}

#[tokio::test]
async fn spawned_session_action_reaches_the_cms() {
    let server = MockServer::start().await;
    mount_session_sink(&server).await;

    gateway_for(&server)
        .spawn_session_action("s-2", SessionAction::new(SessionActionKind::Like, Collection::Stories, 11))
        .await
        .expect("task finished");

    let requests = server.received_requests().await.expect("recorded requests");
    assert_eq!(requests.len(), 1);
    let body: Value = requests[0].body_json().expect("json body");
    assert_eq!(body["data"]["contentId"], 11);
}

#[tokio::test]
async fn spawned_session_action_swallows_transport_failures() {
    let handle = unreachable_gateway()
        .spawn_session_action("s-3", SessionAction::new(SessionActionKind::View, Collection::News, 1));

    handle.await.expect("task must not panic");
}

#[tokio::test]
async fn spawned_session_action_gives_up_after_the_telemetry_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/user-sessions"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(10)))
        .mount(&server)
        .await;

    let config = GatewayConfig::new(&server.uri())
        .expect("config")
        .with_telemetry_timeout(Duration::from_millis(100));
    let gateway = ContentGateway::new(config).expect("gateway");

    let started = Instant::now();
    gateway
        .spawn_session_action("s-4", SessionAction::new(SessionActionKind::View, Collection::News, 1))
        .await
        .expect("task finished");

    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn stats_pass_through_when_available() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/content-stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalViews": 10,
            "totalContent": 4,
            "activeUsers": 2,
            "averageRating": 3.5
        })))
        .mount(&server)
        .await;

    let stats = gateway_for(&server).get_stats().await;

    assert_eq!(stats, ContentStats {
        total_views: 10,
        total_content: 4,
        active_users: 2,
        average_rating: 3.5,
    });
}

#[tokio::test]
async fn stats_fall_back_when_the_endpoint_is_missing() {
    let server = MockServer::start().await;

    let stats = gateway_for(&server).get_stats().await;

    assert_eq!(stats, ContentStats::FALLBACK);
    assert_eq!(
        (stats.total_views, stats.total_content, stats.active_users, stats.average_rating),
        (2458, 347, 89, 4.7)
    );
}

#[tokio::test]
async fn stats_fall_back_on_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/content-stats"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    assert_eq!(gateway_for(&server).get_stats().await, ContentStats::FALLBACK);
}

#[tokio::test]
async fn stats_fall_back_when_the_cms_is_unreachable() {
    assert_eq!(unreachable_gateway().get_stats().await, ContentStats::FALLBACK);
}
