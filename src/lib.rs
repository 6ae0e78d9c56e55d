//! `iss-distance` - how far away is the International Space Station?
//!
//! This library resolves the caller's position and a satellite's position
//! from remote services, validates both, and measures the WGS84 geodesic
//! distance between them.

pub mod api;
pub mod config;
pub mod distance;
pub mod error;
pub mod geocoding;
pub mod location_resolver;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod presentation;
pub mod sources;

// Re-export core types for public API
pub use api::ApiClient;
pub use config::AppConfig;
pub use distance::{DistanceCalculator, DistanceResult};
pub use error::{ErrorCode, IssDistanceError};
pub use geocoding::{Address, NominatimGeocoder, ReverseGeocoder};
pub use location_resolver::{InputMode, LocationResolver};
pub use models::{Coordinate, LocationRecord, SourceLabel};
pub use pipeline::{Pipeline, Report};
pub use presentation::PresentationSink;
pub use sources::{GeoSource, ObjectTracker, RawLocation, UserLocator};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, IssDistanceError>;
