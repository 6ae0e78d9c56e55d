//! Satellite position source (wheretheiss.at)

use async_trait::async_trait;
use chrono::DateTime;
use reqwest::Url;
use tracing::{debug, info};

use super::{GeoSource, RawLocation, text_field};
use crate::api::ApiClient;
use crate::config::TrackerConfig;
use crate::models::SourceLabel;
use crate::{IssDistanceError, Result};

const SERVICE: &str = "the satellite tracker";

/// Tracks one object by NORAD catalog number (25544 is the ISS)
pub struct ObjectTracker {
    client: ApiClient,
    base_url: String,
    object_id: u32,
}

impl ObjectTracker {
    #[must_use]
    pub fn new(client: ApiClient, config: &TrackerConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            object_id: config.object_id,
        }
    }

    /// `GET <base>/<object-id>`
    fn query_url(&self) -> Result<Url> {
        let raw = format!("{}/{}", self.base_url.trim_end_matches('/'), self.object_id);
        Url::parse(&raw).map_err(|e| {
            IssDistanceError::config(format!("Invalid tracker URL '{raw}': {e}"))
        })
    }
}

#[async_trait]
impl GeoSource for ObjectTracker {
    fn label(&self) -> SourceLabel {
        SourceLabel::TrackedObject
    }

    fn name(&self) -> &str {
        SERVICE
    }

    async fn fetch(&self) -> Result<RawLocation> {
        let url = self.query_url()?;
        let body = self.client.get_json(url, SERVICE).await?;

        let mut raw = RawLocation::from_body(&body, SERVICE)?;
        raw.identifier =
            text_field(&body, "id").or_else(|| Some(self.object_id.to_string()));
        raw.observed_at = body
            .get("timestamp")
            .and_then(serde_json::Value::as_i64)
            .and_then(|secs| DateTime::from_timestamp(secs, 0));

        info!("Object {} position received", self.object_id);
        debug!("Raw object location: {:?}", raw);
        Ok(raw)
    }
}
