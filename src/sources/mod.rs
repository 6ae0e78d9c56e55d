//! Remote endpoints that report a location as JSON
//!
//! - `ip_geolocation`: the caller's approximate position from their IP address
//! - `satellite`: the current sub-satellite point of a tracked object

pub mod ip_geolocation;
pub mod satellite;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::models::SourceLabel;
use crate::{IssDistanceError, Result};

pub use ip_geolocation::UserLocator;
pub use satellite::ObjectTracker;

/// Location fields exactly as a source reported them.
///
/// `latitude` and `longitude` are kept as raw JSON so that numbers and
/// numeric strings go through the same validation later on.
#[derive(Debug, Clone, PartialEq)]
pub struct RawLocation {
    pub latitude: Value,
    pub longitude: Value,
    /// Place name reported by the source itself
    pub place_name: Option<String>,
    pub identifier: Option<String>,
    pub observed_at: Option<DateTime<Utc>>,
}

impl RawLocation {
    /// Pull the required fields out of a JSON object body
    pub fn from_body(body: &Value, service: &str) -> Result<Self> {
        let object = body.as_object().ok_or_else(|| {
            IssDistanceError::malformed(format!("{service} response is not a JSON object"))
        })?;

        let field = |name: &str| {
            object.get(name).cloned().ok_or_else(|| {
                IssDistanceError::malformed(format!("{service} response has no {name}"))
            })
        };

        Ok(Self {
            latitude: field("latitude")?,
            longitude: field("longitude")?,
            place_name: None,
            identifier: None,
            observed_at: None,
        })
    }

    /// Coordinates typed in by the user
    #[must_use]
    pub fn manual(latitude: &str, longitude: &str) -> Self {
        Self {
            latitude: Value::String(latitude.to_string()),
            longitude: Value::String(longitude.to_string()),
            place_name: None,
            identifier: None,
            observed_at: None,
        }
    }
}

/// A remote endpoint that returns JSON describing a location
#[async_trait]
pub trait GeoSource: Send + Sync {
    /// Which side of the measurement this source provides
    fn label(&self) -> SourceLabel;

    /// Human-readable service name used in messages
    fn name(&self) -> &str;

    /// Query the endpoint once; no retries
    async fn fetch(&self) -> Result<RawLocation>;
}

/// Non-empty string field of a JSON object
pub(crate) fn text_field(body: &Value, name: &str) -> Option<String> {
    match body.get(name)? {
        Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}
