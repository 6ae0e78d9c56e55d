//! Local stand-ins for the remote location services

#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::{Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{MethodRouter, get},
};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use iss_distance::config::AppConfig;
use iss_distance::{PresentationSink, Report};

pub const GOOD_KEY: &str = "test-key";

/// Serve `router` on an ephemeral port and return its base URL
pub async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// A base URL nothing is listening on
pub async fn closed_port() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

pub fn json_route(body: Value) -> MethodRouter {
    get(move || {
        let body = body.clone();
        async move { Json(body) }
    })
}

pub fn status_route(status: u16, body: &'static str) -> MethodRouter {
    let status = StatusCode::from_u16(status).unwrap();
    get(move || async move { (status, body) })
}

pub fn slow_route(delay: Duration) -> MethodRouter {
    get(move || async move {
        tokio::time::sleep(delay).await;
        Json(json!({"latitude": 0.0, "longitude": 0.0}))
    })
}

pub fn london() -> Value {
    json!({
        "ip": "81.2.69.142",
        "country_name": "United Kingdom",
        "latitude": "51.5074",
        "longitude": "-0.1278"
    })
}

pub fn iss_over_paris() -> Value {
    json!({
        "name": "iss",
        "id": 25544,
        "latitude": 48.8566,
        "longitude": 2.3522,
        "altitude": 420.5,
        "velocity": 27600.1,
        "timestamp": 1_714_564_800
    })
}

/// IP geolocation endpoint that checks the key
async fn ipgeo(Query(params): Query<HashMap<String, String>>) -> Response {
    if params.get("apiKey").map(String::as_str) != Some(GOOD_KEY) {
        return (StatusCode::UNAUTHORIZED, "bad key").into_response();
    }
    let mut body = london();
    if let Some(ip) = params.get("ip") {
        body["ip"] = json!(ip);
    }
    Json(body).into_response()
}

/// Tracker endpoint that only knows the ISS
async fn satellite(Path(id): Path<u32>) -> Response {
    if id == 25544 {
        Json(iss_over_paris()).into_response()
    } else {
        (StatusCode::NOT_FOUND, "unknown satellite").into_response()
    }
}

/// Reverse geocoder that only knows France
async fn reverse(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let lat: f64 = params.get("lat").and_then(|v| v.parse().ok()).unwrap_or(0.0);
    if (41.0..=51.0).contains(&lat) {
        Json(json!({"display_name": "France", "address": {"country": "France", "country_code": "fr"}}))
    } else {
        Json(json!({"error": "Unable to geocode"}))
    }
}

/// All three services behaving normally
pub fn healthy_router() -> Router {
    Router::new()
        .route("/ipgeo", get(ipgeo))
        .route("/satellites/{id}", get(satellite))
        .route("/reverse", get(reverse))
}

/// Configuration pointing every service at `base`
pub fn config_for(base: &str) -> AppConfig {
    let mut config = AppConfig::default();
    config.ipgeolocation.base_url = format!("{base}/ipgeo");
    config.ipgeolocation.api_key = Some(GOOD_KEY.to_string());
    config.tracker.base_url = format!("{base}/satellites");
    config.geocoding.base_url = format!("{base}/reverse");
    config.http.timeout_seconds = 5;
    config
}

/// Sink that only counts how often it was called
pub struct CountingSink(pub Arc<AtomicUsize>);

impl CountingSink {
    pub fn new() -> (Self, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        (Self(count.clone()), count)
    }
}

impl PresentationSink for CountingSink {
    fn present(&self, _report: &Report) -> iss_distance::Result<()> {
        self.0.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
