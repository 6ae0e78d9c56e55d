//! Machine-readable report on stdout

use serde::Serialize;

use super::PresentationSink;
use crate::pipeline::Report;
use crate::{IssDistanceError, Result};

pub struct JsonSink;

impl JsonSink {
    pub fn render(report: &Report) -> Result<String> {
        pretty_json(report)
    }
}

fn pretty_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| IssDistanceError::output(format!("JSON serialization failed: {e}")))
}

impl PresentationSink for JsonSink {
    fn present(&self, report: &Report) -> Result<()> {
        println!("{}", Self::render(report)?);
        Ok(())
    }
}
