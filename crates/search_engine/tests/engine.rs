use std::sync::mpsc::RecvTimeoutError;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use search_engine::{
    CompletionService, EngineEvent, EngineHandle, Endpoint, FailureKind, FetchError,
    SearchService, ServiceSettings, Suggestion,
};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn engine_for(server: &MockServer) -> EngineHandle {
    EngineHandle::new(ServiceSettings {
        prediction: Endpoint::new(server.uri()),
        search: Endpoint::new(server.uri()),
        ..ServiceSettings::default()
    })
    .expect("engine")
}

async fn next_event(engine: &EngineHandle, within: Duration) -> Option<EngineEvent> {
    let deadline = Instant::now() + within;
    while Instant::now() < deadline {
        if let Some(event) = engine.try_recv() {
            return Some(event);
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    None
}

async fn mount_prediction(server: &MockServer, text: &str, word: &str, delay_ms: u64) {
    Mock::given(method("POST"))
        .and(path("/completion/complete"))
        .and(body_json(json!({ "text": text })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(delay_ms))
                .set_body_json(json!({ "predictions": [{ "text": word }] })),
        )
        .mount(server)
        .await;
}

#[tokio::test(flavor = "multi_thread")]
async fn responses_arrive_tagged_in_arrival_order() {
    let server = MockServer::start().await;
    mount_prediction(&server, "a", "apple", 300).await;
    mount_prediction(&server, "ab", "abba", 0).await;

    let engine = engine_for(&server);
    engine.predict(1, "a");
    engine.predict(2, "ab");

    let first = next_event(&engine, Duration::from_secs(5)).await.expect("first");
    let second = next_event(&engine, Duration::from_secs(5)).await.expect("second");

    match (first, second) {
        (
            EngineEvent::PredictionsFetched { request_id: 2, result: Ok(fast) },
            EngineEvent::PredictionsFetched { request_id: 1, result: Ok(slow) },
        ) => {
            assert_eq!(fast[0].text, "abba");
            assert_eq!(slow[0].text, "apple");
        }
        other => panic!("unexpected events {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn search_failure_is_reported_as_event() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/search"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let engine = engine_for(&server);
    engine.search(7, "acme");

    match next_event(&engine, Duration::from_secs(5)).await {
        Some(EngineEvent::SearchFetched { request_id: 7, result: Err(err) }) => {
            assert_eq!(err.kind, FailureKind::HttpStatus(500));
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn cancelled_requests_emit_nothing() {
    let server = MockServer::start().await;
    mount_prediction(&server, "slow", "slowpoke", 300).await;
    mount_prediction(&server, "fresh", "freshly", 0).await;

    let engine = engine_for(&server);
    engine.predict(1, "slow");
    engine.cancel_in_flight();

    assert!(next_event(&engine, Duration::from_millis(600)).await.is_none());

    // The engine keeps serving requests issued after a cancel.
    engine.predict(2, "fresh");
    match next_event(&engine, Duration::from_secs(5)).await {
        Some(EngineEvent::PredictionsFetched { request_id: 2, result: Ok(words) }) => {
            assert_eq!(words[0].text, "freshly");
        }
        other => panic!("unexpected event {other:?}"),
    }
}

struct EchoServices;

#[async_trait::async_trait]
impl CompletionService for EchoServices {
    async fn complete(&self, text: &str) -> Result<Vec<Suggestion>, FetchError> {
        Ok(vec![Suggestion {
            text: format!("{text}!"),
        }])
    }
}

#[async_trait::async_trait]
impl SearchService for EchoServices {
    async fn search(&self, _query: &str) -> Result<Vec<serde_json::Value>, FetchError> {
        Ok(Vec::new())
    }
}

#[test]
fn dropping_handle_releases_services_and_disconnects_events() {
    let services = Arc::new(EchoServices);
    let engine = EngineHandle::with_services(services.clone(), services.clone()).expect("engine");
    let events = engine.events();

    engine.predict(1, "a");
    match events.recv_timeout(Duration::from_secs(5)) {
        Ok(EngineEvent::PredictionsFetched { request_id: 1, result: Ok(words) }) => {
            assert_eq!(words[0].text, "a!");
        }
        other => panic!("unexpected event {other:?}"),
    }

    drop(engine);

    let deadline = Instant::now() + Duration::from_secs(5);
    while Arc::strong_count(&services) > 1 {
        assert!(Instant::now() < deadline, "engine thread still holds the services");
        thread::sleep(Duration::from_millis(10));
    }
    assert_eq!(
        events.recv_timeout(Duration::from_secs(5)),
        Err(RecvTimeoutError::Disconnected)
    );
}
