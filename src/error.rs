//! Error types and handling for the ISS distance pipeline

use thiserror::Error;

/// Stable codes for every failure the pipeline can report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    ApiUnauthorized,
    ApiNotFound,
    ApiTransport,
    ApiMalformedResponse,
    EnrichmentUnavailable,
    Config,
    Output,
    Io,
}

/// Main error type for the ISS distance pipeline
#[derive(Error, Debug)]
pub enum IssDistanceError {
    /// The remote service rejected our credentials (HTTP 401)
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// The remote resource does not exist (HTTP 404)
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Any other failed exchange; `status` is absent when no response arrived
    #[error("Transport error{}: {message}", status_suffix(.status))]
    Transport { status: Option<u16>, message: String },

    /// The response could not be turned into a valid location
    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },

    /// Best-effort enrichment failed; never fatal
    #[error("Enrichment unavailable: {message}")]
    EnrichmentUnavailable { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// A report could not be rendered
    #[error("Output error: {message}")]
    Output { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|code| format!(" (HTTP {code})")).unwrap_or_default()
}

impl IssDistanceError {
    pub fn unauthorized<S: Into<String>>(message: S) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn transport<S: Into<String>>(status: Option<u16>, message: S) -> Self {
        Self::Transport {
            status,
            message: message.into(),
        }
    }

    pub fn malformed<S: Into<String>>(message: S) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    pub fn enrichment<S: Into<String>>(message: S) -> Self {
        Self::EnrichmentUnavailable {
            message: message.into(),
        }
    }

    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn output<S: Into<String>>(message: S) -> Self {
        Self::Output {
            message: message.into(),
        }
    }

    /// Map an HTTP status onto the failure taxonomy
    #[must_use]
    pub fn from_status(status: u16, context: &str) -> Self {
        match status {
            401 => Self::unauthorized(format!("Access denied by {context}. Check your API key.")),
            404 => Self::not_found(format!("{context} has no data for this request.")),
            code => Self::transport(Some(code), format!("{context} answered with status {code}")),
        }
    }

    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Unauthorized { .. } => ErrorCode::ApiUnauthorized,
            Self::NotFound { .. } => ErrorCode::ApiNotFound,
            Self::Transport { .. } => ErrorCode::ApiTransport,
            Self::MalformedResponse { .. } => ErrorCode::ApiMalformedResponse,
            Self::EnrichmentUnavailable { .. } => ErrorCode::EnrichmentUnavailable,
            Self::Config { .. } => ErrorCode::Config,
            Self::Output { .. } => ErrorCode::Output,
            Self::Io { .. } => ErrorCode::Io,
        }
    }

    /// Process exit status for the binary
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self.code() {
            ErrorCode::Config => 2,
            ErrorCode::ApiUnauthorized => 3,
            ErrorCode::ApiNotFound => 4,
            ErrorCode::ApiTransport => 5,
            ErrorCode::ApiMalformedResponse => 6,
            ErrorCode::EnrichmentUnavailable | ErrorCode::Output | ErrorCode::Io => 1,
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Unauthorized { message } | Self::NotFound { message } => message.clone(),
            Self::Transport { status: Some(code), .. } => {
                format!("Something went wrong... ({code})")
            }
            Self::Transport { status: None, message } => {
                format!("Unable to reach the location service: {message}")
            }
            Self::MalformedResponse { message } => {
                format!("Couldn't read the server response: {message}")
            }
            Self::EnrichmentUnavailable { .. } => "Impossible to detect the country".to_string(),
            Self::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            Self::Output { message } => format!("Couldn't render the report: {message}"),
            Self::Io { .. } => "File operation failed. Please check file permissions.".to_string(),
        }
    }
}
