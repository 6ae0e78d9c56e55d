//! Resolved location records

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use super::Coordinate;

/// Which side of the measurement a record describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceLabel {
    User,
    TrackedObject,
}

impl SourceLabel {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceLabel::User => "user",
            SourceLabel::TrackedObject => "tracked-object",
        }
    }
}

impl fmt::Display for SourceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated location produced by one resolution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationRecord {
    pub coordinate: Coordinate,
    /// Country or place name, absent when it could not be determined
    pub display_name: Option<String>,
    pub source_label: SourceLabel,
    /// Raw identifier from the source (IP address, NORAD catalog id)
    pub identifier: Option<String>,
    pub observed_at: Option<DateTime<Utc>>,
}

impl LocationRecord {
    #[must_use]
    pub fn new(coordinate: Coordinate, source_label: SourceLabel) -> Self {
        Self {
            coordinate,
            display_name: None,
            source_label,
            identifier: None,
            observed_at: None,
        }
    }

    /// Name to show a human, falling back to the coordinates
    #[must_use]
    pub fn name_or_coordinates(&self) -> String {
        self.display_name
            .clone()
            .unwrap_or_else(|| self.coordinate.format_coordinates())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_labels() {
        assert_eq!(SourceLabel::User.to_string(), "user");
        assert_eq!(SourceLabel::TrackedObject.to_string(), "tracked-object");
        assert_eq!(
            serde_json::to_string(&SourceLabel::TrackedObject).unwrap(),
            "\"tracked-object\""
        );
    }

    #[test]
    fn test_name_fallback() {
        let coordinate = Coordinate::new(46.8182, 8.2275).unwrap();
        let mut record = LocationRecord::new(coordinate, SourceLabel::User);
        assert_eq!(record.name_or_coordinates(), "46.8182, 8.2275");

        record.display_name = Some("Switzerland".to_string());
        assert_eq!(record.name_or_coordinates(), "Switzerland");
    }
}
