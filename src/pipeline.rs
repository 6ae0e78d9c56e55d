//! The measurement pipeline
//!
//! Resolves the user and the tracked object concurrently, computes the
//! geodesic distance between them and hands the report to every sink. If
//! either resolution fails the run stops there: no distance is computed and
//! no sink is called.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::api::ApiClient;
use crate::config::AppConfig;
use crate::distance::{DistanceCalculator, DistanceResult};
use crate::geocoding::{NominatimGeocoder, ReverseGeocoder};
use crate::location_resolver::{InputMode, LocationResolver};
use crate::models::LocationRecord;
use crate::presentation::PresentationSink;
use crate::sources::{GeoSource, ObjectTracker, UserLocator};
use crate::Result;

/// Everything a sink needs to render one run
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub user: LocationRecord,
    pub target: LocationRecord,
    pub distance: DistanceResult,
    pub computed_at: DateTime<Utc>,
}

/// One resolver per side, plus the distance calculator
pub struct Pipeline {
    user_source: Box<dyn GeoSource>,
    user_resolver: LocationResolver,
    target_source: Box<dyn GeoSource>,
    target_resolver: LocationResolver,
    calculator: DistanceCalculator,
}

impl Pipeline {
    #[must_use]
    pub fn new(
        user_source: Box<dyn GeoSource>,
        user_resolver: LocationResolver,
        target_source: Box<dyn GeoSource>,
        target_resolver: LocationResolver,
    ) -> Self {
        Self {
            user_source,
            user_resolver,
            target_source,
            target_resolver,
            calculator: DistanceCalculator::new(),
        }
    }

    /// Wire the real services from configuration.
    ///
    /// `user_mode` only applies to the user's side; the tracked object is
    /// always fetched.
    pub fn from_config(config: &AppConfig, user_mode: InputMode) -> Result<Self> {
        let client = ApiClient::new(&config.http)?;

        let geocoder: Option<Arc<dyn ReverseGeocoder>> = if config.geocoding.enabled {
            Some(Arc::new(NominatimGeocoder::new(
                client.clone(),
                &config.geocoding,
            )))
        } else {
            None
        };

        Ok(Self::new(
            Box::new(UserLocator::new(client.clone(), &config.ipgeolocation)),
            LocationResolver::new(user_mode, geocoder.clone()),
            Box::new(ObjectTracker::new(client, &config.tracker)),
            LocationResolver::new(InputMode::Automatic, geocoder),
        ))
    }

    /// Resolve both sides and measure the distance between them
    #[instrument(skip(self))]
    pub async fn measure(&self) -> Result<Report> {
        let (user, target) = tokio::try_join!(
            self.user_resolver.resolve(self.user_source.as_ref()),
            self.target_resolver.resolve(self.target_source.as_ref()),
        )?;

        let distance = self.calculator.measure(&user.coordinate, &target.coordinate);
        info!("Distance between user and tracked object: {}", distance);

        Ok(Report {
            user,
            target,
            distance,
            computed_at: Utc::now(),
        })
    }

    /// Measure, then present the report through every sink in order
    pub async fn run(&self, sinks: &[Box<dyn PresentationSink>]) -> Result<Report> {
        let report = self.measure().await?;
        for sink in sinks {
            sink.present(&report)?;
        }
        Ok(report)
    }
}
