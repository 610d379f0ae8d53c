// Error types for racepace

use snafu::Snafu;
use std::io;

/// The only failure text a user ever sees for a fetch. The actual cause goes to the log.
pub const DISPLAY_FAILURE_MESSAGE: &str =
    "Unable to fetch prediction, please check your inputs and try again";

#[derive(Debug, Snafu)]
pub enum RacePaceError {
    // User input validation errors, raised before anything is dispatched
    #[snafu(display("Invalid user input: {field} - {reason}"))]
    InvalidUserInput { field: String, reason: String },

    // Errors talking to the prediction service
    #[snafu(display("Could not reach prediction service at {url}"))]
    Network { url: String, source: reqwest::Error },
    #[snafu(display("Prediction service returned HTTP {status} for {url}"))]
    HttpStatus { url: String, status: u16 },
    #[snafu(display("Malformed JSON returned by {url}"))]
    MalformedJson {
        url: String,
        source: serde_json::Error,
    },
    #[snafu(display("Unexpected response shape: {reason}"))]
    UnexpectedResponse { reason: String },

    // Client setup errors
    #[snafu(display("Invalid prediction service URL: {base_url}"))]
    InvalidBaseUrl {
        base_url: String,
        source: url::ParseError,
    },
    #[snafu(display("Could not build HTTP client"))]
    HttpClient { source: reqwest::Error },
    #[snafu(display("Could not start request runtime"))]
    Runtime { source: io::Error },

    // Config management errors
    #[snafu(display("Could not find application data directory to save config file"))]
    NoConfigDir,
    #[snafu(display("Error reading or writing config file"))]
    ConfigIOError { source: io::Error },
    #[snafu(display("Error serializing config file"))]
    ConfigSerializeError { source: serde_json::Error },

    // UI errors
    #[snafu(display("Could not start dashboard window: {reason}"))]
    UiStartError { reason: String },
}

impl RacePaceError {
    /// Coarse category used in diagnostic logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidUserInput { .. } => "validation",
            Self::Network { .. } => "network",
            Self::HttpStatus { .. } => "http",
            Self::MalformedJson { .. } | Self::UnexpectedResponse { .. } => "decode",
            Self::InvalidBaseUrl { .. } | Self::HttpClient { .. } | Self::Runtime { .. } => {
                "setup"
            }
            Self::NoConfigDir | Self::ConfigIOError { .. } | Self::ConfigSerializeError { .. } => {
                "config"
            }
            Self::UiStartError { .. } => "ui",
        }
    }

    pub fn display_message(&self) -> &'static str {
        DISPLAY_FAILURE_MESSAGE
    }
}
