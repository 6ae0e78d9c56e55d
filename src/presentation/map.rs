//! Interactive HTML map with both positions and the line between them

use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

use super::{PresentationSink, target_name};
use crate::models::LocationRecord;
use crate::pipeline::Report;
use crate::Result;

const LEAFLET_VERSION: &str = "1.9.4";

/// Writes a self-contained Leaflet page to `path`, optionally opening it afterwards
pub struct HtmlMapSink {
    path: PathBuf,
    open_after_write: bool,
}

impl HtmlMapSink {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            open_after_write: false,
        }
    }

    /// Open the written page in the default browser
    #[must_use]
    pub fn opening(mut self, open_after_write: bool) -> Self {
        self.open_after_write = open_after_write;
        self
    }

    #[must_use]
    pub fn opens_after_write(&self) -> bool {
        self.open_after_write
    }

    #[must_use]
    pub fn render(report: &Report) -> String {
        let user = marker(&report.user, "user", "green");
        let name = target_name(&report.target);
        let target = marker(&report.target, &name.to_lowercase(), "blue");
        let line = format!(
            "L.polyline([[{}, {}], [{}, {}]], {{color: 'red'}}).addTo(map);",
            report.user.coordinate.latitude(),
            report.user.coordinate.longitude(),
            report.target.coordinate.latitude(),
            report.target.coordinate.longitude(),
        );

        format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Distance to {name}: {distance:.2} km</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@{v}/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@{v}/dist/leaflet.js"></script>
<style>html, body, #map {{ height: 100%; margin: 0; }}</style>
</head>
<body>
<div id="map"></div>
<script>
var map = L.map('map');
L.tileLayer('https://{{s}}.tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png', {{
  attribution: '&copy; OpenStreetMap contributors'
}}).addTo(map);
{user}
{target}
{line}
map.fitBounds([[{ulat}, {ulon}], [{tlat}, {tlon}]], {{padding: [40, 40]}});
</script>
</body>
</html>
"#,
            distance = report.distance.rounded(),
            v = LEAFLET_VERSION,
            ulat = report.user.coordinate.latitude(),
            ulon = report.user.coordinate.longitude(),
            tlat = report.target.coordinate.latitude(),
            tlon = report.target.coordinate.longitude(),
        )
    }
}

impl PresentationSink for HtmlMapSink {
    fn present(&self, report: &Report) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, Self::render(report))?;
        info!("Map written to {}", self.path.display());
        println!("Map saved to {}", self.path.display());

        if self.open_after_write {
            if let Err(e) = open::that(&self.path) {
                warn!("Could not open {} in a browser: {}", self.path.display(), e);
            }
        }
        Ok(())
    }
}

fn marker(record: &LocationRecord, popup: &str, color: &str) -> String {
    format!(
        "L.circleMarker([{}, {}], {{color: '{color}', fillColor: '{color}', fillOpacity: 0.8, radius: 9}}).bindPopup('{popup}').addTo(map);",
        record.coordinate.latitude(),
        record.coordinate.longitude(),
    )
}
