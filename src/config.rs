//! Configuration management for the ISS distance tool
//!
//! Settings are layered: built-in defaults, then a TOML file, then the
//! legacy `hidden.ini` key file, then `ISS_DISTANCE__*` environment variables.

use crate::IssDistanceError;
use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Legacy key file read from the working directory
pub const LEGACY_KEY_FILE: &str = "hidden.ini";

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub ipgeolocation: IpGeolocationConfig,
    #[serde(default)]
    pub tracker: TrackerConfig,
    #[serde(default)]
    pub geocoding: GeocodingConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// IP geolocation service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpGeolocationConfig {
    /// API key; a missing key is reported when the service is first called
    pub api_key: Option<String>,
    /// Key name used by `hidden.ini`
    #[serde(default, skip_serializing)]
    pub api_key_geoloc: Option<String>,
    #[serde(default = "default_ipgeolocation_base_url")]
    pub base_url: String,
    /// Locate this address instead of the caller's own
    pub ip: Option<String>,
}

/// Satellite tracker settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    #[serde(default = "default_tracker_base_url")]
    pub base_url: String,
    /// NORAD catalog number of the tracked object
    #[serde(default = "default_object_id")]
    pub object_id: u32,
}

/// Reverse geocoding settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_geocoding_base_url")]
    pub base_url: String,
}

/// Shared HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// How the user's position is obtained
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputModeSetting {
    #[default]
    Automatic,
    Manual,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputConfig {
    #[serde(default)]
    pub mode: InputModeSetting,
    /// Manual-mode latitude, as text
    pub latitude: Option<String>,
    /// Manual-mode longitude, as text
    pub longitude: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    /// Where to write the HTML map; `None` disables the map
    #[serde(default = "default_map_path")]
    pub map_path: Option<String>,
    /// Open the map in the default browser once written
    #[serde(default)]
    pub open_map: bool,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Log output destination (console, file, both)
    #[serde(default = "default_log_output")]
    pub output: String,
    /// Log file path
    #[serde(default = "default_log_file_path")]
    pub file_path: String,
}

// Default value functions
fn default_ipgeolocation_base_url() -> String {
    "https://api.ipgeolocation.io/ipgeo".to_string()
}

fn default_tracker_base_url() -> String {
    "https://api.wheretheiss.at/v1/satellites".to_string()
}

fn default_object_id() -> u32 {
    25544
}

fn default_true() -> bool {
    true
}

fn default_geocoding_base_url() -> String {
    "https://nominatim.openstreetmap.org/reverse".to_string()
}

fn default_timeout() -> u32 {
    10
}

fn default_user_agent() -> String {
    format!("iss-distance/{}", crate::VERSION)
}

fn default_map_path() -> Option<String> {
    Some("map.html".to_string())
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_log_output() -> String {
    "console".to_string()
}

fn default_log_file_path() -> String {
    "logs/iss-distance.log".to_string()
}

impl Default for IpGeolocationConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_key_geoloc: None,
            base_url: default_ipgeolocation_base_url(),
            ip: None,
        }
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            base_url: default_tracker_base_url(),
            object_id: default_object_id(),
        }
    }
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_geocoding_base_url(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            map_path: default_map_path(),
            open_map: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            output: default_log_output(),
            file_path: default_log_file_path(),
        }
    }
}

impl AppConfig {
    /// Load configuration from `config_path`, or the default location when `None`
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        Self::load_with_key_file(config_path, Path::new(LEGACY_KEY_FILE))
    }

    /// Load configuration with an explicit location for the legacy key file
    pub fn load_with_key_file(config_path: Option<PathBuf>, key_file: &Path) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(FileFormat::Toml),
            );
        }

        if key_file.exists() {
            builder = builder.add_source(
                File::from(key_file.to_path_buf())
                    .required(false)
                    .format(FileFormat::Ini),
            );
        }

        builder = builder.add_source(
            Environment::with_prefix("ISS_DISTANCE")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: AppConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("iss-distance").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.ipgeolocation.api_key.is_none() {
            self.ipgeolocation.api_key = self.ipgeolocation.api_key_geoloc.take();
        }
        if self.ipgeolocation.base_url.is_empty() {
            self.ipgeolocation.base_url = default_ipgeolocation_base_url();
        }
        if self.tracker.base_url.is_empty() {
            self.tracker.base_url = default_tracker_base_url();
        }
        if self.geocoding.base_url.is_empty() {
            self.geocoding.base_url = default_geocoding_base_url();
        }
        if self.http.timeout_seconds == 0 {
            self.http.timeout_seconds = default_timeout();
        }
        if self.http.user_agent.is_empty() {
            self.http.user_agent = default_user_agent();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.logging.output.is_empty() {
            self.logging.output = default_log_output();
        }
    }

    /// Validate all configuration settings.
    ///
    /// The API key is not checked here: a missing or rejected
    /// key is reported as `Unauthorized` when the service is first called.
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.tracker.object_id == 0 {
            return Err(
                IssDistanceError::config("Tracker object_id must be a NORAD catalog number above 0")
                    .into(),
            );
        }
        if self.http.timeout_seconds > 300 {
            return Err(
                IssDistanceError::config("HTTP timeout cannot exceed 300 seconds").into(),
            );
        }
        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(IssDistanceError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(IssDistanceError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        let valid_log_outputs = ["console", "file", "both"];
        if !valid_log_outputs.contains(&self.logging.output.as_str()) {
            return Err(IssDistanceError::config(format!(
                "Invalid log output '{}'. Must be one of: {}",
                self.logging.output,
                valid_log_outputs.join(", ")
            ))
            .into());
        }

        for (name, url) in [
            ("IP geolocation", &self.ipgeolocation.base_url),
            ("Tracker", &self.tracker.base_url),
            ("Geocoding", &self.geocoding.base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(IssDistanceError::config(format!(
                    "{name} base URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }
}
