use std::time::Duration;

use pretty_assertions::assert_eq;
use search_engine::{
    CompletionService, Endpoint, FailureKind, ReqwestServices, SearchService, ServiceSettings,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn services_for(server: &MockServer) -> ReqwestServices {
    let settings = ServiceSettings {
        prediction: Endpoint::new(server.uri()),
        search: Endpoint::new(server.uri()),
        ..ServiceSettings::default()
    };
    ReqwestServices::new(settings).expect("client")
}

#[tokio::test]
async fn completion_posts_text_and_returns_ranked_predictions() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/completion/complete"))
        .and(body_json(json!({ "text": "new yor" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "predictions": [{ "text": "york" }, { "text": "yorkshire" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let services = services_for(&server);
    let predictions = services.complete("new yor").await.expect("predictions");

    let words: Vec<_> = predictions.iter().map(|p| p.text.as_str()).collect();
    assert_eq!(words, vec!["york", "yorkshire"]);
}

#[tokio::test]
async fn completion_sends_empty_text_unchanged() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/completion/complete"))
        .and(body_json(json!({ "text": "" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "predictions": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let services = services_for(&server);
    let predictions = services.complete("").await.expect("predictions");
    assert!(predictions.is_empty());
}

#[tokio::test]
async fn completion_sends_configured_headers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/completion/complete"))
        .and(header("x-api-key", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "predictions": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let settings = ServiceSettings {
        prediction: Endpoint {
            base_url: server.uri(),
            headers: vec![("x-api-key".to_string(), "secret".to_string())],
        },
        search: Endpoint::new(server.uri()),
        ..ServiceSettings::default()
    };
    let services = ReqwestServices::new(settings).expect("client");
    services.complete("a").await.expect("predictions");
}

#[tokio::test]
async fn search_passes_query_as_real_parameter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/search"))
        .and(query_param("q", "acme corp & sons"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "companiesList": [{ "name": "Acme Corp" }, { "name": "Acme & Sons" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let services = services_for(&server);
    let results = services.search("acme corp & sons").await.expect("results");

    assert_eq!(
        results,
        vec![json!({ "name": "Acme Corp" }), json!({ "name": "Acme & Sons" })]
    );
}

#[tokio::test]
async fn search_fails_on_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/search"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let services = services_for(&server);
    let err = services.search("acme").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(503));
}

#[tokio::test]
async fn malformed_completion_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/completion/complete"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{not json", "application/json"))
        .mount(&server)
        .await;

    let services = services_for(&server);
    let err = services.complete("a").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Decode);
}

#[tokio::test]
async fn unexpected_content_type_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/search"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html></html>", "text/html"))
        .mount(&server)
        .await;

    let services = services_for(&server);
    let err = services.search("acme").await.unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::UnsupportedContentType {
            content_type: "text/html".to_string()
        }
    );
}

#[tokio::test]
async fn slow_service_times_out_when_configured() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/completion/complete"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(json!({ "predictions": [] })),
        )
        .mount(&server)
        .await;

    let settings = ServiceSettings {
        prediction: Endpoint::new(server.uri()),
        search: Endpoint::new(server.uri()),
        request_timeout: Some(Duration::from_millis(50)),
        ..ServiceSettings::default()
    };
    let services = ReqwestServices::new(settings).expect("client");
    let err = services.complete("a").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn oversized_response_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"{"companiesList":[1,2,3]}"#, "application/json"),
        )
        .mount(&server)
        .await;

    let settings = ServiceSettings {
        prediction: Endpoint::new(server.uri()),
        search: Endpoint::new(server.uri()),
        max_bytes: 10,
        ..ServiceSettings::default()
    };
    let services = ReqwestServices::new(settings).expect("client");
    let err = services.search("acme").await.unwrap_err();
    assert!(matches!(
        err.kind,
        FailureKind::TooLarge { max_bytes: 10, .. }
    ));
}
