//! Configuration file handling
//!
//! The configuration is a TOML file. Every field has a default, so an empty
//! file (or no file at all) is a valid configuration.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use super::paths::config_path;
use super::{Error, Result};

/// Main configuration structure
#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    /// Telemetry client settings
    #[serde(default)]
    pub telemetry: TelemetryConfig,

    /// Ping upload settings
    #[serde(default)]
    pub upload: UploadConfig,

    /// BigQuery client settings
    #[serde(default)]
    pub bigquery: BigQueryConfig,
}

/// Telemetry client settings
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct TelemetryConfig {
    /// Application ID used in submission paths
    #[serde(default = "default_application_id")]
    pub application_id: String,

    /// Seconds to wait after the missions so queued pings can be sent
    #[serde(default = "default_flush_wait")]
    pub flush_wait_secs: u64,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            application_id: default_application_id(),
            flush_wait_secs: default_flush_wait(),
        }
    }
}

impl TelemetryConfig {
    pub fn flush_wait(&self) -> Duration {
        Duration::from_secs(self.flush_wait_secs)
    }
}

fn default_application_id() -> String {
    "burnham".to_string()
}

fn default_flush_wait() -> u64 {
    5
}

/// Ping upload settings
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct UploadConfig {
    /// Timeout for a single upload request
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl UploadConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn default_request_timeout() -> u64 {
    10
}

/// BigQuery client settings
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct BigQueryConfig {
    /// Base URL of the BigQuery REST API
    #[serde(default = "default_api_endpoint")]
    pub api_endpoint: String,

    /// Server-side wait per `jobs.query`/`getQueryResults` call
    #[serde(default = "default_query_timeout")]
    pub query_timeout_ms: u64,

    /// Give up on a job that is still running after this many seconds
    #[serde(default = "default_job_deadline")]
    pub job_deadline_secs: u64,
}

impl Default for BigQueryConfig {
    fn default() -> Self {
        Self {
            api_endpoint: default_api_endpoint(),
            query_timeout_ms: default_query_timeout(),
            job_deadline_secs: default_job_deadline(),
        }
    }
}

fn default_api_endpoint() -> String {
    "https://bigquery.googleapis.com".to_string()
}
fn default_query_timeout() -> u64 {
    10_000
}
fn default_job_deadline() -> u64 {
    300
}

impl Config {
    /// Load configuration
    ///
    /// An explicit path must exist. Without one, the platform config file is
    /// used when present, otherwise the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        if let Some(path) = config_path() {
            if path.exists() {
                return Self::from_file(&path);
            }
        }
        Ok(Self::default())
    }

    /// Load configuration from a specific TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(content).map_err(|e| Error::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.telemetry.application_id.trim().is_empty() {
            return Err(Error::Config(
                "telemetry.application_id must not be empty".to_string(),
            ));
        }
        if self.upload.request_timeout_secs == 0 {
            return Err(Error::Config(
                "upload.request_timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
