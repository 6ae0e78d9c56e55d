//! IP geolocation source (ipgeolocation.io)

use async_trait::async_trait;
use reqwest::Url;
use tracing::{debug, info};

use super::{GeoSource, RawLocation, text_field};
use crate::api::ApiClient;
use crate::config::IpGeolocationConfig;
use crate::models::SourceLabel;
use crate::{IssDistanceError, Result};

const SERVICE: &str = "the IP geolocation service";

/// Locates the caller, or an explicit IP address, through ipgeolocation.io
pub struct UserLocator {
    client: ApiClient,
    base_url: String,
    api_key: Option<String>,
    ip: Option<String>,
}

impl UserLocator {
    #[must_use]
    pub fn new(client: ApiClient, config: &IpGeolocationConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            ip: config.ip.clone(),
        }
    }

    /// `GET <base>?apiKey=<key>[&ip=<addr>]`
    fn query_url(&self, api_key: &str) -> Result<Url> {
        let mut params = vec![("apiKey", api_key)];
        if let Some(ip) = self.ip.as_deref() {
            params.push(("ip", ip));
        }
        Url::parse_with_params(&self.base_url, &params).map_err(|e| {
            IssDistanceError::config(format!(
                "Invalid IP geolocation URL '{}': {e}",
                self.base_url
            ))
        })
    }
}

#[async_trait]
impl GeoSource for UserLocator {
    fn label(&self) -> SourceLabel {
        SourceLabel::User
    }

    fn name(&self) -> &str {
        SERVICE
    }

    async fn fetch(&self) -> Result<RawLocation> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                IssDistanceError::unauthorized(
                    "Access denied. No API key configured for the IP geolocation service.",
                )
            })?;

        let url = self.query_url(api_key)?;
        let body = self.client.get_json(url, SERVICE).await?;

        let mut raw = RawLocation::from_body(&body, SERVICE)?;
        raw.place_name = text_field(&body, "country_name");
        raw.identifier = text_field(&body, "ip");

        info!(
            "User located in {}",
            raw.place_name.as_deref().unwrap_or("an unknown country")
        );
        debug!("Raw user location: {:?}", raw);
        Ok(raw)
    }
}
