//! Visual Crossing provider against a mock upstream.

use serde_json::json;
use weather_core::{UnitGroup, VisualCrossingProvider, WeatherError, WeatherProvider};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

fn provider_for(server: &MockServer) -> VisualCrossingProvider {
    VisualCrossingProvider::new("TEST-KEY".to_string(), format!("{}/timeline", server.uri()))
}

#[tokio::test]
async fn returns_upstream_document_unmodified() {
    let server = MockServer::start().await;
    let document = json!({
        "resolvedAddress": "Kyiv, Ukraine",
        "days": [{ "datetime": "2024-01-15", "temp": -3.2, "humidity": 81.5 }]
    });

    Mock::given(method("GET"))
        .and(path("/timeline/Kyiv/2024-01-15"))
        .and(query_param("unitGroup", "metric"))
        .and(query_param("key", "TEST-KEY"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&document))
        .expect(1)
        .mount(&server)
        .await;

    let forecast = provider_for(&server)
        .fetch("Kyiv", "2024-01-15", UnitGroup::Metric)
        .await
        .expect("fetch should succeed");

    assert_eq!(forecast, document);
}

#[tokio::test]
async fn unit_group_is_forwarded() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/timeline/Boston/2024-07-04"))
        .and(query_param("unitGroup", "us"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "days": [] })))
        .expect(1)
        .mount(&server)
        .await;

    provider_for(&server)
        .fetch("Boston", "2024-07-04", UnitGroup::Us)
        .await
        .expect("fetch should succeed");
}

#[tokio::test]
async fn error_status_and_body_pass_through() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad request"))
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .fetch("Nowhere", "not-a-date", UnitGroup::Metric)
        .await
        .unwrap_err();

    let usage = err.as_usage().expect("upstream errors are caller-visible");
    assert_eq!(usage.status_code, 400);
    assert_eq!(usage.message, "bad request");
}

#[tokio::test]
async fn non_200_success_status_is_passed_through() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(202).set_body_string("bad request"))
        .mount(&server)
        .await;

    let err = provider_for(&server).fetch("Kyiv", "today", UnitGroup::Metric).await.unwrap_err();

    let usage = err.as_usage().expect("upstream errors are caller-visible");
    assert_eq!(usage.status_code, 202);
    assert_eq!(usage.message, "bad request");
}

#[tokio::test]
async fn upstream_auth_failure_keeps_its_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(401).set_body_string("No account found with API key 'TEST-KEY'"),
        )
        .mount(&server)
        .await;

    let err = provider_for(&server).fetch("Kyiv", "today", UnitGroup::Metric).await.unwrap_err();

    let usage = err.as_usage().expect("upstream errors are caller-visible");
    assert_eq!(usage.status_code, 401);
    assert!(usage.message.starts_with("No account found"));
}

#[tokio::test]
async fn malformed_json_is_internal() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let err = provider_for(&server).fetch("Kyiv", "today", UnitGroup::Metric).await.unwrap_err();

    assert!(matches!(err, WeatherError::Internal(_)));
}
