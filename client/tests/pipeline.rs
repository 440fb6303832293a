//! Integration tests for the request pipeline against a stub backend.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use serde_json::{Value, json};
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use workdesk_client::{
    ApiClient, ClientConfig, Method, MonitoringReporter, RequestError, RequestErrorKind,
    RequestOptions,
};
use workdesk_core::{NotificationKind, StatusCode};
use workdesk_testing::{
    RecordingInvalidator, RecordingNotifier, StaticIdentity, failure_body, success_body,
};

struct Harness {
    server: MockServer,
    client: ApiClient,
    notifier: RecordingNotifier,
    invalidator: RecordingInvalidator,
}

async fn harness() -> Harness {
    harness_with(|config| config).await
}

async fn harness_with(configure: impl FnOnce(ClientConfig) -> ClientConfig) -> Harness {
    workdesk_testing::init_tracing();

    let server = MockServer::start().await;
    let notifier = RecordingNotifier::new();
    let invalidator = RecordingInvalidator::new();

    let config = configure(ClientConfig::new(format!("{}/api", server.uri())));
    let client = ApiClient::new(config)
        .unwrap()
        .with_notifier(notifier.clone())
        .with_invalidator(invalidator.clone());

    Harness {
        server,
        client,
        notifier,
        invalidator,
    }
}

async fn respond(server: &MockServer, route: &str, template: ResponseTemplate) {
    Mock::given(path(route))
        .respond_with(template)
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_success_is_silent() {
    let h = harness().await;
    respond(
        &h.server,
        "/api/pages",
        ResponseTemplate::new(200).set_body_json(success_body(json!([{ "id": "p1" }]))),
    )
    .await;

    let envelope = h.client.get::<Vec<Value>>("/pages").await.unwrap();

    assert_eq!(envelope.code, StatusCode::Success);
    assert_eq!(envelope.data.unwrap()[0]["id"], "p1");
    assert_eq!(h.notifier.count(), 0);
    assert_eq!(h.invalidator.calls(), 0);
}

#[tokio::test]
async fn test_business_error_resolves_and_notifies_once() {
    let h = harness().await;
    respond(
        &h.server,
        "/api/data/db-1",
        ResponseTemplate::new(200).set_body_json(failure_body(50001, "Workspace API unavailable")),
    )
    .await;

    let envelope = h.client.get::<Value>("/data/db-1").await.unwrap();

    assert_eq!(envelope.code, StatusCode::IntegrationError);
    assert_eq!(
        h.notifier.received(),
        vec![("Workspace API unavailable".to_string(), NotificationKind::Error)]
    );
    assert_eq!(h.invalidator.calls(), 0);
}

#[tokio::test]
async fn test_business_error_without_message_uses_fallback() {
    let h = harness().await;
    respond(
        &h.server,
        "/api/logs",
        ResponseTemplate::new(200).set_body_json(json!({ "code": 40300 })),
    )
    .await;

    let envelope = h.client.get::<Value>("/logs").await.unwrap();

    assert_eq!(envelope.code, StatusCode::Forbidden);
    assert_eq!(
        h.notifier.messages(),
        vec![StatusCode::Forbidden.default_message().to_string()]
    );
}

#[tokio::test]
async fn test_unauthorized_envelope_invalidates_session_once() {
    let h = harness().await;
    respond(
        &h.server,
        "/api/workspace",
        ResponseTemplate::new(200).set_body_json(failure_body(40100, "session expired")),
    )
    .await;

    let envelope = h.client.get::<Value>("/workspace").await.unwrap();

    assert_eq!(envelope.code, StatusCode::Unauthorized);
    assert_eq!(envelope.message, "session expired");
    assert_eq!(h.notifier.messages(), vec!["session expired".to_string()]);
    assert_eq!(h.invalidator.calls(), 1);
}

#[tokio::test]
async fn test_null_message_envelope_resolves_with_fallback() {
    let h = harness().await;
    respond(
        &h.server,
        "/api/workspace",
        ResponseTemplate::new(200).set_body_json(json!({
            "code": 40100,
            "message": null,
            "data": null
        })),
    )
    .await;

    let envelope = h.client.get::<Value>("/workspace").await.unwrap();

    assert_eq!(envelope.code, StatusCode::Unauthorized);
    assert!(envelope.data.is_none());
    assert_eq!(
        h.notifier.received(),
        vec![(
            StatusCode::Unauthorized.default_message().to_string(),
            NotificationKind::Error
        )]
    );
    assert_eq!(h.invalidator.calls(), 1);
}

#[tokio::test]
async fn test_http_401_with_null_message_invalidates_once() {
    let h = harness().await;
    respond(
        &h.server,
        "/api/profile",
        ResponseTemplate::new(401).set_body_json(json!({ "code": 40100, "message": null })),
    )
    .await;

    let error = h.client.get::<Value>("/profile").await.unwrap_err();

    assert_eq!(error.kind, RequestErrorKind::Http(401));
    assert_eq!(error.message, "Request failed with status 401");
    assert_eq!(h.notifier.count(), 1);
    assert_eq!(h.invalidator.calls(), 1);
}

#[tokio::test]
async fn test_http_error_with_unauthorized_code_and_null_message_invalidates() {
    let h = harness().await;
    respond(
        &h.server,
        "/api/sync",
        ResponseTemplate::new(500).set_body_json(json!({ "code": 40100, "message": null })),
    )
    .await;

    let error = h.client.get::<Value>("/sync").await.unwrap_err();

    assert_eq!(error.kind, RequestErrorKind::Http(500));
    assert_eq!(h.notifier.count(), 1);
    assert_eq!(h.invalidator.calls(), 1);
}

#[tokio::test]
async fn test_http_error_rejects_with_server_message() {
    let h = harness().await;
    respond(
        &h.server,
        "/api/sync",
        ResponseTemplate::new(500).set_body_json(failure_body(50003, "Sync failed")),
    )
    .await;

    let error = h
        .client
        .post::<Value, _>("/sync", &json!({ "databaseId": "db-1" }))
        .await
        .unwrap_err();

    assert_eq!(error.kind, RequestErrorKind::Http(500));
    assert_eq!(error.message, "Sync failed");
    assert_eq!(h.notifier.count(), 1);
    assert_eq!(h.invalidator.calls(), 0);
}

#[tokio::test]
async fn test_http_error_without_envelope_uses_status_text() {
    let h = harness().await;
    respond(
        &h.server,
        "/api/missing",
        ResponseTemplate::new(404).set_body_string("Not Found"),
    )
    .await;

    let error = h.client.get::<Value>("/missing").await.unwrap_err();

    assert_eq!(error.kind, RequestErrorKind::Http(404));
    assert_eq!(error.message, "Request failed with status 404");
    assert_eq!(error.raw.as_deref(), Some("Not Found"));
    assert_eq!(h.notifier.count(), 1);
}

#[tokio::test]
async fn test_http_401_invalidates_session() {
    let h = harness().await;
    respond(&h.server, "/api/profile", ResponseTemplate::new(401)).await;

    let error = h.client.get::<Value>("/profile").await.unwrap_err();

    assert_eq!(error.kind, RequestErrorKind::Http(401));
    assert_eq!(h.notifier.count(), 1);
    assert_eq!(h.invalidator.calls(), 1);
}

#[tokio::test]
async fn test_timeout_rejects_and_notifies_once() {
    let h = harness_with(|config| config.with_timeout(Duration::from_millis(100))).await;
    respond(
        &h.server,
        "/api/slow",
        ResponseTemplate::new(200)
            .set_body_json(success_body(Value::Null))
            .set_delay(Duration::from_millis(1000)),
    )
    .await;

    let error = h.client.get::<Value>("/slow").await.unwrap_err();

    assert_eq!(error.kind, RequestErrorKind::Timeout);
    assert_eq!(error.message, RequestError::TIMEOUT_MESSAGE);
    assert_eq!(
        h.notifier.received(),
        vec![(RequestError::TIMEOUT_MESSAGE.to_string(), NotificationKind::Error)]
    );
}

#[tokio::test]
async fn test_network_failure_rejects_and_notifies_once() {
    // Reserve a port, then free it so nothing is listening there
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let notifier = RecordingNotifier::new();
    let client = ApiClient::new(ClientConfig::new(format!("http://{addr}/api")))
        .unwrap()
        .with_notifier(notifier.clone());

    let error = client.get::<Value>("/pages").await.unwrap_err();

    assert_eq!(error.kind, RequestErrorKind::Network);
    assert!(!error.is_timeout());
    assert_eq!(notifier.messages(), vec![RequestError::NETWORK_MESSAGE.to_string()]);
}

#[tokio::test]
async fn test_malformed_success_body_is_decode_error() {
    let h = harness().await;
    respond(
        &h.server,
        "/api/pages",
        ResponseTemplate::new(200).set_body_string("<html></html>"),
    )
    .await;

    let error = h.client.get::<Value>("/pages").await.unwrap_err();

    assert_eq!(error.kind, RequestErrorKind::Decode);
    assert_eq!(h.notifier.count(), 1);
}

#[tokio::test]
async fn test_strict_send_rejects_business_error_without_double_notification() {
    let h = harness().await;
    respond(
        &h.server,
        "/api/pages",
        ResponseTemplate::new(200).set_body_json(failure_body(42200, "title is required")),
    )
    .await;

    let error = h
        .client
        .send_strict::<Value, _>(
            Method::POST,
            "/pages",
            Some(&json!({ "title": "" })),
            RequestOptions::default(),
        )
        .await
        .unwrap_err();

    assert_eq!(error.business_code(), Some(StatusCode::ValidationFailed));
    assert_eq!(error.kind.to_string(), "BUSINESS_42200");
    assert_eq!(h.notifier.count(), 1);
}

#[tokio::test]
async fn test_identity_header_attached_on_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/me"))
        .and(header("x-user-id", "user-42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body(Value::Null)))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(ClientConfig::new(format!("{}/api", server.uri())))
        .unwrap()
        .with_identity(StaticIdentity::user("user-42"));

    let envelope = client
        .send::<Value, ()>(Method::GET, "/me", None, RequestOptions::default().with_identity())
        .await
        .unwrap();

    assert!(envelope.is_success());
}

#[tokio::test]
async fn test_pipeline_without_queue_degrades_to_logging() {
    let server = MockServer::start().await;
    respond(
        &server,
        "/api/logs",
        ResponseTemplate::new(200).set_body_json(failure_body(50000, "boom")),
    )
    .await;

    // Default notifier only logs
    let client = ApiClient::new(ClientConfig::new(format!("{}/api", server.uri()))).unwrap();
    let envelope = client.get::<Value>("/logs").await.unwrap();

    assert_eq!(envelope.code, StatusCode::InternalError);
}

#[tokio::test]
async fn test_monitoring_report_carries_identity_and_stays_silent() {
    let h = harness().await;
    Mock::given(method("POST"))
        .and(path("/api/monitoring"))
        .and(header("x-user-id", "user-7"))
        .and(body_partial_json(json!({ "type": "error", "event": "js_error" })))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&h.server)
        .await;

    let client = h.client.clone().with_identity(StaticIdentity::user("user-7"));
    let reporter = MonitoringReporter::new(&client, "http://localhost/logs");

    let delivered = reporter.report_error("js_error", "boom", None).await;

    assert!(!delivered);
    assert_eq!(h.notifier.count(), 0);
    assert_eq!(h.invalidator.calls(), 0);
}
