//! Error types for burnham
//!
//! Mission precondition violations have their own [`MissionError`] kind so the
//! runner can tell a failed mission apart from a broken setup.

use std::io;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Precondition violations raised while flying a mission
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MissionError {
    #[error("Spore drive is not active. Select a branch with '--spore-drive' to jump to {coordinates}")]
    SporeDriveInactive { coordinates: String },

    #[error("Warp drive is not active. Cannot warp to {coordinates}")]
    WarpDriveInactive { coordinates: String },
}

/// Main error type for burnham
#[derive(Error, Debug)]
pub enum Error {
    // === Mission Errors ===
    #[error(transparent)]
    Mission(#[from] MissionError),

    // === Telemetry Errors ===
    #[error("Failed to initialize telemetry: {0}")]
    TelemetryInit(String),

    #[error("Failed to shut down telemetry: {0}")]
    TelemetryShutdown(String),

    // === Scenario Errors ===
    #[error("Failed to decode scenarios: {0}")]
    ScenarioDecode(String),

    #[error("Duplicate scenario name \"{0}\"")]
    DuplicateScenario(String),

    // === Warehouse Errors ===
    #[error("BigQuery request failed: {0}")]
    Warehouse(String),

    #[error("BigQuery job {job_id} failed: {message}")]
    QueryFailed { job_id: String, message: String },

    #[error("Failed to obtain an access token: {0}")]
    Auth(String),

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Test Errors ===
    #[error("Test assertion failed: {0}")]
    TestAssertion(String),
}

impl Error {
    /// Create a query failed error
    pub fn query_failed(job_id: &str, message: &str) -> Self {
        Self::QueryFailed {
            job_id: job_id.to_string(),
            message: message.to_string(),
        }
    }
}
