//! Tracing subscriber setup: console and/or rolling file output

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, prelude::*};

use crate::config::LoggingConfig;
use crate::{IssDistanceError, Result};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Install the global subscriber.
///
/// Console logs go to stderr so stdout only carries the report. `RUST_LOG`
/// overrides the configured level. Keep the returned guard alive until exit
/// or buffered file output is lost.
pub fn initialize_logging(config: &LoggingConfig, verbose: bool) -> Result<Option<WorkerGuard>> {
    let level = if verbose { "debug" } else { config.level.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let json = config.format == "json";

    let mut layers: Vec<BoxedLayer> = Vec::new();
    let mut guard = None;

    if matches!(config.output.as_str(), "console" | "both") {
        let layer = fmt::layer().with_writer(std::io::stderr);
        layers.push(if json { layer.json().boxed() } else { layer.boxed() });
    }

    if matches!(config.output.as_str(), "file" | "both") {
        let path = Path::new(&config.file_path);
        let directory = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let file_name = path
            .file_name()
            .ok_or_else(|| IssDistanceError::config("Log file path has no file name"))?;

        std::fs::create_dir_all(directory)?;
        let file_appender = tracing_appender::rolling::daily(directory, file_name);
        let (non_blocking, worker_guard) = tracing_appender::non_blocking(file_appender);
        guard = Some(worker_guard);

        let layer = fmt::layer().with_writer(non_blocking).with_ansi(false);
        layers.push(if json { layer.json().boxed() } else { layer.boxed() });
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(|e| IssDistanceError::config(format!("Failed to initialize logging: {e}")))?;

    tracing::debug!("Logging initialized");
    Ok(guard)
}
