//! Validated geographic coordinates

use serde::Serialize;
use serde_json::Value;

use crate::{IssDistanceError, Result};

const LATITUDE_RANGE: std::ops::RangeInclusive<f64> = -90.0..=90.0;
const LONGITUDE_RANGE: std::ops::RangeInclusive<f64> = -180.0..=180.0;

/// A latitude/longitude pair in decimal degrees (WGS84).
///
/// A `Coordinate` can only be obtained through one of the validating
/// constructors, so holding one means both values are finite and in range.
/// Out-of-range input is rejected, never clamped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Build a coordinate from numeric degrees
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        check_range("latitude", latitude, &LATITUDE_RANGE)?;
        check_range("longitude", longitude, &LONGITUDE_RANGE)?;
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Build a coordinate from text such as `"51.5074"`, as typed by a user
    /// or reported by services that encode numbers as strings
    pub fn parse(latitude: &str, longitude: &str) -> Result<Self> {
        Self::new(
            parse_degrees("latitude", latitude)?,
            parse_degrees("longitude", longitude)?,
        )
    }

    /// Build a coordinate from JSON values that are either numbers or numeric strings
    pub fn from_json(latitude: &Value, longitude: &Value) -> Result<Self> {
        Self::new(
            json_degrees("latitude", latitude)?,
            json_degrees("longitude", longitude)?,
        )
    }

    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Format as `"lat, lon"` with four decimals
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

fn check_range(field: &str, value: f64, range: &std::ops::RangeInclusive<f64>) -> Result<()> {
    if !value.is_finite() {
        return Err(IssDistanceError::malformed(format!(
            "{field} must be a finite number, got: {value}"
        )));
    }
    if !range.contains(&value) {
        return Err(IssDistanceError::malformed(format!(
            "{field} must be between {} and {}, got: {value}",
            range.start(),
            range.end()
        )));
    }
    Ok(())
}

fn parse_degrees(field: &str, text: &str) -> Result<f64> {
    text.trim().parse::<f64>().map_err(|_| {
        IssDistanceError::malformed(format!("{field} is not a number: {text:?}"))
    })
}

fn json_degrees(field: &str, value: &Value) -> Result<f64> {
    match value {
        Value::Number(number) => number.as_f64().ok_or_else(|| {
            IssDistanceError::malformed(format!("{field} is not representable: {number}"))
        }),
        Value::String(text) => parse_degrees(field, text),
        Value::Null => Err(IssDistanceError::malformed(format!("{field} is missing"))),
        other => Err(IssDistanceError::malformed(format!(
            "{field} is not numeric: {other}"
        ))),
    }
}
