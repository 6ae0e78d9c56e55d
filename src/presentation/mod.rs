//! Renderers for a finished measurement
//!
//! Sinks only consume a [`Report`]; they never influence the measurement.

pub mod json;
pub mod map;
pub mod text;

use std::path::PathBuf;

use crate::config::{OutputConfig, OutputFormat};
use crate::models::LocationRecord;
use crate::pipeline::Report;
use crate::Result;

pub use json::JsonSink;
pub use map::HtmlMapSink;
pub use text::TextSink;

/// Something that renders a report
pub trait PresentationSink: Send + Sync {
    fn present(&self, report: &Report) -> Result<()>;
}

const ISS_NORAD_ID: &str = "25544";

/// How sinks refer to the tracked object: "ISS", or "Object <id>" for anything else
pub(crate) fn target_name(record: &LocationRecord) -> String {
    match record.identifier.as_deref() {
        None | Some(ISS_NORAD_ID) => "ISS".to_string(),
        Some(id) => format!("Object {id}"),
    }
}

/// Build the configured sinks: one stdout renderer, plus the map when enabled
#[must_use]
pub fn sinks_from_config(output: &OutputConfig) -> Vec<Box<dyn PresentationSink>> {
    let mut sinks: Vec<Box<dyn PresentationSink>> = Vec::new();

    match output.format {
        OutputFormat::Text => sinks.push(Box::new(TextSink)),
        OutputFormat::Json => sinks.push(Box::new(JsonSink)),
    }

    if let Some(path) = &output.map_path {
        sinks.push(Box::new(
            HtmlMapSink::new(PathBuf::from(path)).opening(output.open_map),
        ));
    }

    sinks
}
