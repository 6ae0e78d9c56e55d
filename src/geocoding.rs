//! Reverse geocoding for display names
//!
//! Lookups answer `Ok(None)` when the service has no address for a point
//! (open ocean, for example). Callers treat every outcome here as optional.

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::api::ApiClient;
use crate::config::GeocodingConfig;
use crate::models::Coordinate;
use crate::{IssDistanceError, Result};

const SERVICE: &str = "the reverse geocoder";

/// Address fields relevant for display
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Address {
    pub country: Option<String>,
    pub country_code: Option<String>,
    pub state: Option<String>,
}

/// Turns coordinates into an address, when one exists
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    async fn reverse(&self, coordinate: &Coordinate) -> Result<Option<Address>>;
}

/// Nominatim (OpenStreetMap) reverse geocoder
pub struct NominatimGeocoder {
    client: ApiClient,
    base_url: String,
}

impl NominatimGeocoder {
    #[must_use]
    pub fn new(client: ApiClient, config: &GeocodingConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
        }
    }

    fn query_url(&self, coordinate: &Coordinate) -> Result<Url> {
        let lat = coordinate.latitude().to_string();
        let lon = coordinate.longitude().to_string();
        Url::parse_with_params(
            &self.base_url,
            &[
                ("format", "jsonv2"),
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("zoom", "3"),
                ("accept-language", "en"),
            ],
        )
        .map_err(|e| {
            IssDistanceError::config(format!("Invalid geocoding URL '{}': {e}", self.base_url))
        })
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimGeocoder {
    async fn reverse(&self, coordinate: &Coordinate) -> Result<Option<Address>> {
        let url = self.query_url(coordinate)?;
        let body = self.client.get_json(url, SERVICE).await?;
        parse_reverse_response(&body)
    }
}

/// Interpret a Nominatim reverse response body
pub fn parse_reverse_response(body: &Value) -> Result<Option<Address>> {
    let object = body.as_object().ok_or_else(|| {
        IssDistanceError::malformed("reverse geocoder response is not a JSON object")
    })?;

    if let Some(reason) = object.get("error") {
        debug!("Reverse geocoder found nothing: {}", reason);
        return Ok(None);
    }

    match object.get("address") {
        None | Some(Value::Null) => Ok(None),
        Some(address) => serde_json::from_value::<Address>(address.clone())
            .map(Some)
            .map_err(|e| {
                IssDistanceError::malformed(format!("unreadable reverse geocoder address: {e}"))
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HttpConfig;
    use serde_json::json;

    #[test]
    fn test_parse_address() {
        let body = json!({
            "display_name": "France",
            "address": {"country": "France", "country_code": "fr"}
        });
        let address = parse_reverse_response(&body).unwrap().unwrap();
        assert_eq!(address.country.as_deref(), Some("France"));
        assert_eq!(address.country_code.as_deref(), Some("fr"));
        assert_eq!(address.state, None);
    }

    #[test]
    fn test_parse_no_result() {
        let body = json!({"error": "Unable to geocode"});
        assert_eq!(parse_reverse_response(&body).unwrap(), None);
        assert_eq!(parse_reverse_response(&json!({})).unwrap(), None);
    }

    #[test]
    fn test_parse_unreadable_result() {
        assert!(parse_reverse_response(&json!([1, 2, 3])).is_err());
        assert!(parse_reverse_response(&json!({"address": "nowhere"})).is_err());
    }

    #[test]
    fn test_query_url() {
        let geocoder = NominatimGeocoder::new(
            ApiClient::new(&HttpConfig::default()).unwrap(),
            &GeocodingConfig::default(),
        );
        let url = geocoder
            .query_url(&Coordinate::new(48.8566, 2.3522).unwrap())
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://nominatim.openstreetmap.org/reverse?format=jsonv2&lat=48.8566&lon=2.3522&zoom=3&accept-language=en"
        );
    }
}
