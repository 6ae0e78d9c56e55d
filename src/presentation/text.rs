//! Plain-text report on stdout

use std::fmt::Write as _;

use super::{PresentationSink, target_name};
use crate::models::LocationRecord;
use crate::pipeline::Report;
use crate::Result;

/// Prints the two locations and the distance between them
pub struct TextSink;

impl TextSink {
    #[must_use]
    pub fn render(report: &Report) -> String {
        let target_name = target_name(&report.target);
        let mut out = String::new();

        let _ = writeln!(out, "YOUR LOCATION");
        write_location(&mut out, &report.user);
        let _ = writeln!(out);

        let _ = writeln!(out, "{} LOCATION", target_name.to_uppercase());
        write_location(&mut out, &report.target);
        let _ = writeln!(out);

        let _ = writeln!(
            out,
            "You are {:.2} km far from {}!",
            report.distance.rounded(),
            target_name
        );
        out
    }
}

impl PresentationSink for TextSink {
    fn present(&self, report: &Report) -> Result<()> {
        print!("{}", Self::render(report));
        Ok(())
    }
}

fn write_location(out: &mut String, record: &LocationRecord) {
    if let Some(country) = &record.display_name {
        let _ = writeln!(out, "Country: {country}");
    }
    let _ = writeln!(out, "Longitude: {}", record.coordinate.longitude());
    let _ = writeln!(out, "Latitude: {}", record.coordinate.latitude());
    if record.display_name.is_none() {
        let _ = writeln!(out, "Impossible to detect the country");
    }
}
