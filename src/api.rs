//! HTTP client shared by every remote location service
//!
//! Performs a single GET per call and classifies the outcome: 401 becomes
//! `Unauthorized`, 404 `NotFound`, any other non-success status a
//! `Transport` error carrying the code, and an unreadable body a
//! `MalformedResponse`. Retrying is left to the caller.

use reqwest::{Client, Url};
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

use crate::config::HttpConfig;
use crate::{IssDistanceError, Result};

/// Query parameters whose values never reach the logs
const SECRET_PARAMS: &[&str] = &["apiKey", "apikey", "key"];

/// JSON-over-HTTP client with a fixed per-request timeout
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    timeout: Duration,
}

impl ApiClient {
    /// Create a new client from the HTTP settings
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_seconds.into());

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| {
                IssDistanceError::config(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self { client, timeout })
    }

    /// GET `url` and parse the body as JSON
    #[instrument(skip(self, url), fields(url = %redacted(&url)))]
    pub async fn get_json(&self, url: Url, service: &str) -> Result<Value> {
        let start_time = Instant::now();
        debug!("Requesting {}", service);
        let shown_url = redacted(&url);

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                IssDistanceError::transport(
                    None,
                    format!(
                        "{service} did not answer within {}s",
                        self.timeout.as_secs()
                    ),
                )
            } else {
                IssDistanceError::transport(
                    None,
                    format!("{service} request to {shown_url} failed: {}", e.without_url()),
                )
            }
        })?;

        let status = response.status();
        debug!(
            "HTTP response received: {} in {:.3}s",
            status,
            start_time.elapsed().as_secs_f64()
        );

        if !status.is_success() {
            warn!("{} answered with HTTP {}", service, status.as_u16());
            return Err(IssDistanceError::from_status(status.as_u16(), service));
        }

        let body = response.bytes().await.map_err(|e| {
            IssDistanceError::transport(
                Some(status.as_u16()),
                format!("Failed to read {service} response body: {}", e.without_url()),
            )
        })?;

        serde_json::from_slice(&body).map_err(|e| {
            IssDistanceError::malformed(format!("{service} returned invalid JSON: {e}"))
        })
    }
}

/// Render `url` with secret query values masked
pub(crate) fn redacted(url: &Url) -> String {
    let mut masked = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(name, value)| {
            let value = if SECRET_PARAMS.contains(&name.as_ref()) {
                "***".to_string()
            } else {
                value.into_owned()
            };
            (name.into_owned(), value)
        })
        .collect();

    if pairs.is_empty() {
        return masked.to_string();
    }

    masked.query_pairs_mut().clear().extend_pairs(pairs);
    masked.to_string()
}
