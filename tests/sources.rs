//! GeoSource behaviour against a local HTTP server

mod common;

use axum::Router;
use rstest::rstest;
use serde_json::json;
use std::time::Duration;

use common::*;
use iss_distance::config::TrackerConfig;
use iss_distance::{ApiClient, GeoSource, IssDistanceError, ObjectTracker, SourceLabel, UserLocator};

fn tracker_at(base: &str, object_id: u32, timeout_seconds: u32) -> ObjectTracker {
    let mut config = config_for(base);
    config.http.timeout_seconds = timeout_seconds;
    let tracker = TrackerConfig {
        object_id,
        ..config.tracker.clone()
    };
    ObjectTracker::new(ApiClient::new(&config.http).unwrap(), &tracker)
}

#[tokio::test]
async fn test_user_locator_reports_country_and_ip() {
    let base = spawn(healthy_router()).await;
    let config = config_for(&base);
    let locator = UserLocator::new(ApiClient::new(&config.http).unwrap(), &config.ipgeolocation);

    let raw = locator.fetch().await.unwrap();
    assert_eq!(locator.label(), SourceLabel::User);
    assert_eq!(raw.latitude, json!("51.5074"));
    assert_eq!(raw.longitude, json!("-0.1278"));
    assert_eq!(raw.place_name.as_deref(), Some("United Kingdom"));
    assert_eq!(raw.identifier.as_deref(), Some("81.2.69.142"));
}

#[tokio::test]
async fn test_user_locator_passes_explicit_ip() {
    let base = spawn(healthy_router()).await;
    let mut config = config_for(&base);
    config.ipgeolocation.ip = Some("8.8.8.8".to_string());
    let locator = UserLocator::new(ApiClient::new(&config.http).unwrap(), &config.ipgeolocation);

    let raw = locator.fetch().await.unwrap();
    assert_eq!(raw.identifier.as_deref(), Some("8.8.8.8"));
}

#[tokio::test]
async fn test_user_locator_rejected_key() {
    let base = spawn(healthy_router()).await;
    let mut config = config_for(&base);
    config.ipgeolocation.api_key = Some("wrong".to_string());
    let locator = UserLocator::new(ApiClient::new(&config.http).unwrap(), &config.ipgeolocation);

    let err = locator.fetch().await.unwrap_err();
    assert!(matches!(err, IssDistanceError::Unauthorized { .. }));
}

#[tokio::test]
async fn test_tracker_reports_position_and_time() {
    let base = spawn(healthy_router()).await;
    let raw = tracker_at(&base, 25544, 5).fetch().await.unwrap();

    assert_eq!(raw.latitude, json!(48.8566));
    assert_eq!(raw.longitude, json!(2.3522));
    assert_eq!(raw.identifier.as_deref(), Some("25544"));
    assert_eq!(
        raw.observed_at.map(|t| t.timestamp()),
        Some(1_714_564_800)
    );
}

#[tokio::test]
async fn test_tracker_unknown_object_is_not_found() {
    let base = spawn(healthy_router()).await;
    let err = tracker_at(&base, 99999, 5).fetch().await.unwrap_err();
    assert!(matches!(err, IssDistanceError::NotFound { .. }));
}

#[rstest]
#[case(401, "Unauthorized")]
#[case(404, "NotFound")]
#[case(500, "Transport")]
#[case(502, "Transport")]
#[case(429, "Transport")]
#[case(403, "Transport")]
#[tokio::test]
async fn test_status_classification(#[case] status: u16, #[case] expected: &str) {
    let router = Router::new().route("/satellites/{id}", status_route(status, "nope"));
    let base = spawn(router).await;

    let err = tracker_at(&base, 25544, 5).fetch().await.unwrap_err();
    let kind = match &err {
        IssDistanceError::Unauthorized { .. } => "Unauthorized",
        IssDistanceError::NotFound { .. } => "NotFound",
        IssDistanceError::Transport { status: Some(code), .. } => {
            assert_eq!(*code, status);
            "Transport"
        }
        other => panic!("unexpected error: {other:?}"),
    };
    assert_eq!(kind, expected);
}

#[rstest]
#[case(status_route(200, "<html>not json</html>"))]
#[case(status_route(200, ""))]
#[case(json_route(json!({"latitude": 10.0})))]
#[case(json_route(json!({"longitude": 10.0})))]
#[case(json_route(json!([10.0, 20.0])))]
#[tokio::test]
async fn test_unusable_bodies_are_malformed(#[case] route: axum::routing::MethodRouter) {
    let router = Router::new().route("/satellites/{id}", route);
    let base = spawn(router).await;

    let err = tracker_at(&base, 25544, 5).fetch().await.unwrap_err();
    assert!(
        matches!(err, IssDistanceError::MalformedResponse { .. }),
        "got {err:?}"
    );
}

#[tokio::test]
async fn test_timeout_is_transport_error_without_status() {
    let router = Router::new().route("/satellites/{id}", slow_route(Duration::from_secs(3)));
    let base = spawn(router).await;

    let err = tracker_at(&base, 25544, 1).fetch().await.unwrap_err();
    assert!(matches!(err, IssDistanceError::Transport { status: None, .. }), "got {err:?}");
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let base = closed_port().await;
    let err = tracker_at(&base, 25544, 2).fetch().await.unwrap_err();
    assert!(matches!(err, IssDistanceError::Transport { status: None, .. }), "got {err:?}");
}

#[tokio::test]
async fn test_unreachable_service_does_not_echo_api_key() {
    let base = closed_port().await;
    let mut config = config_for(&base);
    config.ipgeolocation.api_key = Some("super-secret-key".to_string());
    let locator = UserLocator::new(ApiClient::new(&config.http).unwrap(), &config.ipgeolocation);

    let err = locator.fetch().await.unwrap_err();
    assert!(matches!(err, IssDistanceError::Transport { status: None, .. }), "got {err:?}");
    assert!(!err.to_string().contains("super-secret-key"), "{err}");
    assert!(!err.user_message().contains("super-secret-key"), "{}", err.user_message());
    assert!(!format!("{err:?}").contains("super-secret-key"));
}
