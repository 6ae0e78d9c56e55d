//! Data models for the ISS distance pipeline
//!
//! - Coordinate: validated latitude/longitude pair
//! - Location: resolved records handed to presentation

pub mod coordinate;
pub mod location;

pub use coordinate::Coordinate;
pub use location::{LocationRecord, SourceLabel};
