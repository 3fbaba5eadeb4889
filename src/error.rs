//! Error types for the trip planner.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our custom error.
pub type Result<T> = std::result::Result<T, TripPlannerError>;

/// Errors that can occur in the trip planner.
#[derive(Error, Debug)]
pub enum TripPlannerError {
    /// Error reading or writing files.
    #[error("I/O error for path '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Missing or unusable credential for the hosted backend.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Trip request failed validation.
    #[error("Invalid trip request: {0}")]
    InvalidRequest(String),

    /// HTTP request error (connection refused, DNS, broken stream).
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The backend did not answer within the configured timeout.
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// LLM API error.
    #[error("LLM API error: {0}")]
    LlmApi(String),

    /// LLM response parsing error.
    #[error("Failed to parse LLM response: {0}")]
    LlmParse(String),

    /// The backend finished without producing any text.
    #[error("Empty response: {0}")]
    EmptyResponse(String),
}

impl TripPlannerError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<reqwest::Error> for TripPlannerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TripPlannerError::Timeout(err.to_string())
        } else {
            TripPlannerError::Http(err.to_string())
        }
    }
}

impl From<serde_json::Error> for TripPlannerError {
    fn from(err: serde_json::Error) -> Self {
        TripPlannerError::LlmParse(err.to_string())
    }
}
