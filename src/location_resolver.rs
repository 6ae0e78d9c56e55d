//! Location Resolution Module
//!
//! Turns what a [`GeoSource`] reports, or what the user typed, into a
//! validated [`LocationRecord`]. Failures of the primary source are returned
//! as-is; reverse geocoding is best-effort and can only leave the display
//! name empty.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::{InputConfig, InputModeSetting};
use crate::geocoding::ReverseGeocoder;
use crate::models::{Coordinate, LocationRecord, SourceLabel};
use crate::sources::{GeoSource, RawLocation};
use crate::{IssDistanceError, Result};

/// Where a resolver takes its coordinates from, fixed at construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    /// Ask the remote source
    Automatic,
    /// Use coordinates entered by the user, as text
    Manual { latitude: String, longitude: String },
}

impl InputMode {
    /// Build the mode from configuration; manual mode needs both values
    pub fn from_config(input: &InputConfig) -> Result<Self> {
        match input.mode {
            InputModeSetting::Automatic => Ok(Self::Automatic),
            InputModeSetting::Manual => match (&input.latitude, &input.longitude) {
                (Some(latitude), Some(longitude)) => Ok(Self::Manual {
                    latitude: latitude.clone(),
                    longitude: longitude.clone(),
                }),
                _ => Err(IssDistanceError::config(
                    "Manual mode needs both a latitude and a longitude",
                )),
            },
        }
    }
}

/// Service for resolving one side of the measurement
pub struct LocationResolver {
    mode: InputMode,
    geocoder: Option<Arc<dyn ReverseGeocoder>>,
}

impl LocationResolver {
    #[must_use]
    pub fn new(mode: InputMode, geocoder: Option<Arc<dyn ReverseGeocoder>>) -> Self {
        Self { mode, geocoder }
    }

    #[must_use]
    pub fn mode(&self) -> &InputMode {
        &self.mode
    }

    /// Resolve a source into a validated record
    pub async fn resolve(&self, source: &dyn GeoSource) -> Result<LocationRecord> {
        let raw = match &self.mode {
            InputMode::Automatic => {
                debug!("Fetching location from {}", source.name());
                source.fetch().await?
            }
            InputMode::Manual {
                latitude,
                longitude,
            } => {
                debug!("Using manually entered coordinates ({}, {})", latitude, longitude);
                RawLocation::manual(latitude, longitude)
            }
        };

        let record = self.build_record(raw, source.label()).await?;

        info!(
            "Resolved {} location: {}",
            record.source_label,
            record.name_or_coordinates()
        );

        Ok(record)
    }

    async fn build_record(&self, raw: RawLocation, label: SourceLabel) -> Result<LocationRecord> {
        let coordinate = Coordinate::from_json(&raw.latitude, &raw.longitude)?;

        let display_name = match raw.place_name {
            Some(name) => Some(name),
            None => self.lookup_country(&coordinate).await,
        };

        Ok(LocationRecord {
            coordinate,
            display_name,
            source_label: label,
            identifier: raw.identifier,
            observed_at: raw.observed_at,
        })
    }

    /// Best-effort country lookup; never fails the resolution
    async fn lookup_country(&self, coordinate: &Coordinate) -> Option<String> {
        let geocoder = self.geocoder.as_ref()?;

        match geocoder.reverse(coordinate).await {
            Ok(Some(address)) => {
                let country = address.country.filter(|c| !c.trim().is_empty());
                if country.is_none() {
                    debug!("Reverse geocoding returned an address without a country");
                }
                country
            }
            Ok(None) => {
                debug!(
                    "No reverse geocoding result for ({})",
                    coordinate.format_coordinates()
                );
                None
            }
            Err(e) => {
                let soft = IssDistanceError::enrichment(e.to_string());
                warn!("{}", soft);
                None
            }
        }
    }
}
