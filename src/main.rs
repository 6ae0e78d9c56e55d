//! iss-distance CLI
//!
//! Every failure bubbles up to `main`, which prints it and picks the exit status.

use clap::{Parser, ValueEnum};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use iss_distance::config::{AppConfig, InputConfig, InputModeSetting, OutputFormat};
use iss_distance::{InputMode, IssDistanceError, Pipeline, logging, presentation};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    /// Locate yourself through IP geolocation
    Automatic,
    /// Type in your own coordinates
    Manual,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    /// Human-readable text
    Text,
    /// JSON report
    Json,
}

#[derive(Parser)]
#[command(name = "iss-distance", version)]
#[command(about = "Measure how far you are from the International Space Station", long_about = None)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// How to obtain your position
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// Your latitude in decimal degrees (implies manual mode)
    #[arg(long, allow_hyphen_values = true)]
    lat: Option<String>,

    /// Your longitude in decimal degrees (implies manual mode)
    #[arg(long, allow_hyphen_values = true)]
    lon: Option<String>,

    /// Geolocate this IP address instead of your own
    #[arg(long)]
    ip: Option<String>,

    /// NORAD catalog number of the object to track
    #[arg(long)]
    object_id: Option<u32>,

    /// Where to write the HTML map
    #[arg(long, conflicts_with = "no_map")]
    map: Option<PathBuf>,

    /// Do not write the HTML map
    #[arg(long)]
    no_map: bool,

    /// Open the HTML map in your browser once written
    #[arg(long, conflicts_with = "no_map")]
    open: bool,

    /// Report format on stdout
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// HTTP timeout in seconds
    #[arg(long)]
    timeout: Option<u32>,
}

impl Cli {
    /// Command-line flags win over every configuration layer
    fn apply_to(&self, config: &mut AppConfig) {
        if let Some(mode) = self.mode {
            config.input.mode = match mode {
                ModeArg::Automatic => InputModeSetting::Automatic,
                ModeArg::Manual => InputModeSetting::Manual,
            };
        } else if self.lat.is_some() || self.lon.is_some() {
            config.input.mode = InputModeSetting::Manual;
        }
        if let Some(lat) = &self.lat {
            config.input.latitude = Some(lat.clone());
        }
        if let Some(lon) = &self.lon {
            config.input.longitude = Some(lon.clone());
        }
        if let Some(ip) = &self.ip {
            config.ipgeolocation.ip = Some(ip.clone());
        }
        if let Some(object_id) = self.object_id {
            config.tracker.object_id = object_id;
        }
        if let Some(map) = &self.map {
            config.output.map_path = Some(map.display().to_string());
        }
        if self.no_map {
            config.output.map_path = None;
        }
        if self.open {
            config.output.open_map = true;
        }
        if let Some(format) = self.format {
            config.output.format = match format {
                FormatArg::Text => OutputFormat::Text,
                FormatArg::Json => OutputFormat::Json,
            };
        }
        if let Some(timeout) = self.timeout {
            config.http.timeout_seconds = timeout;
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        report_error(&err);
        process::exit(err.exit_code());
    }
}

async fn run(cli: Cli) -> Result<(), IssDistanceError> {
    let mut config = AppConfig::load_from_path(cli.config.clone()).map_err(config_error)?;
    cli.apply_to(&mut config);
    config.apply_defaults();
    config.validate().map_err(config_error)?;

    let _log_guard = logging::initialize_logging(&config.logging, cli.verbose)?;
    tracing::debug!("Effective configuration: {:?}", redact(&config));

    if config.input.mode == InputModeSetting::Manual {
        prompt_missing_coordinates(&mut config.input)?;
    }

    let user_mode = InputMode::from_config(&config.input)?;
    let pipeline = Pipeline::from_config(&config, user_mode)?;
    let sinks = presentation::sinks_from_config(&config.output);

    pipeline.run(&sinks).await?;
    Ok(())
}

fn config_error(err: anyhow::Error) -> IssDistanceError {
    IssDistanceError::config(format!("{err:#}"))
}

fn report_error(err: &IssDistanceError) {
    eprintln!("Error: {}", err.user_message());
    if matches!(
        err,
        IssDistanceError::Config { .. } | IssDistanceError::Io { .. }
    ) {
        eprintln!("  {err}");
    }
    if matches!(err, IssDistanceError::Unauthorized { .. }) {
        eprintln!();
        eprintln!("Set your ipgeolocation.io key in one of:");
        eprintln!("  - [ipgeolocation] api_key in the config file");
        eprintln!("  - [ipgeolocation] api_key_geoloc in ./hidden.ini");
        eprintln!("  - the ISS_DISTANCE__IPGEOLOCATION__API_KEY environment variable");
    }
}

fn redact(config: &AppConfig) -> AppConfig {
    let mut shown = config.clone();
    if shown.ipgeolocation.api_key.is_some() {
        shown.ipgeolocation.api_key = Some("***".to_string());
    }
    shown.ipgeolocation.api_key_geoloc = None;
    shown
}

fn prompt_missing_coordinates(input: &mut InputConfig) -> io::Result<()> {
    if input.latitude.is_none() {
        input.latitude = Some(prompt("Latitude")?);
    }
    if input.longitude.is_none() {
        input.longitude = Some(prompt("Longitude")?);
    }
    Ok(())
}

fn prompt(label: &str) -> io::Result<String> {
    print!("{label}: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_coordinates_imply_manual_mode() {
        let cli = Cli::parse_from(["iss-distance", "--lat", "-33.9", "--lon", "18.4"]);
        let mut config = AppConfig::default();
        cli.apply_to(&mut config);
        assert_eq!(config.input.mode, InputModeSetting::Manual);
        assert_eq!(config.input.latitude.as_deref(), Some("-33.9"));
        assert_eq!(config.input.longitude.as_deref(), Some("18.4"));
    }

    #[test]
    fn test_flag_overrides() {
        let cli = Cli::parse_from([
            "iss-distance",
            "--no-map",
            "--format",
            "json",
            "--object-id",
            "20580",
            "--timeout",
            "3",
        ]);
        let mut config = AppConfig::default();
        cli.apply_to(&mut config);
        assert_eq!(config.output.map_path, None);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.tracker.object_id, 20580);
        assert_eq!(config.http.timeout_seconds, 3);
        assert_eq!(config.input.mode, InputModeSetting::Automatic);
    }

    #[test]
    fn test_open_flag() {
        let cli = Cli::parse_from(["iss-distance", "--open"]);
        let mut config = AppConfig::default();
        cli.apply_to(&mut config);
        assert!(config.output.open_map);
        assert!(Cli::try_parse_from(["iss-distance", "--open", "--no-map"]).is_err());
    }

    #[test]
    fn test_object_id_zero_fails_validation() {
        let cli = Cli::parse_from(["iss-distance", "--object-id", "0"]);
        let mut config = AppConfig::default();
        cli.apply_to(&mut config);
        config.apply_defaults();
        assert_eq!(config.tracker.object_id, 0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_redact_hides_api_key() {
        let mut config = AppConfig::default();
        config.ipgeolocation.api_key = Some("secret".to_string());
        let shown = format!("{:?}", redact(&config));
        assert!(!shown.contains("secret"));
    }
}
