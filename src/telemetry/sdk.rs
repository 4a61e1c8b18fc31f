//! [`Telemetry`] over the global Glean instance

use std::path::PathBuf;
use std::time::Duration;

use glean::{ClientInfoMetrics, ConfigurationBuilder};

use crate::common::Result;
use crate::metrics::{mission, technology, test};
use crate::pings::{self, Ping};

use super::upload::HttpUploader;
use super::Telemetry;

/// Settings used to initialize Glean
#[derive(Debug, Clone)]
pub struct GleanSettings {
    pub application_id: String,
    /// Base URL pings are submitted to
    pub server_endpoint: String,
    pub upload_enabled: bool,
    pub data_dir: PathBuf,
    pub request_timeout: Duration,
}

/// Handle proving Glean was initialized by this process
#[derive(Debug)]
pub struct GleanTelemetry {
    _initialized: (),
}

impl GleanTelemetry {
    /// Register the custom pings and initialize Glean
    ///
    /// Must run inside a tokio runtime, at most once per process.
    pub fn initialize(settings: GleanSettings) -> Result<Self> {
        let uploader = HttpUploader::new(settings.request_timeout)?;
        pings::register_pings();

        tracing::debug!(
            endpoint = %settings.server_endpoint,
            upload_enabled = settings.upload_enabled,
            "Initializing Glean"
        );
        let configuration = ConfigurationBuilder::new(
            settings.upload_enabled,
            settings.data_dir,
            settings.application_id.as_str(),
        )
        .with_server_endpoint(&settings.server_endpoint)
        .with_uploader(uploader)
        .with_use_core_mps(false)
        .build();

        let version = env!("CARGO_PKG_VERSION");
        let client_info = ClientInfoMetrics {
            app_build: version.to_string(),
            app_display_version: version.to_string(),
            ..ClientInfoMetrics::unknown()
        };
        glean::initialize(configuration, client_info);

        Ok(Self { _initialized: () })
    }

    /// Stop Glean, waiting for queued work and uploads to finish
    ///
    /// Blocks the calling thread.
    pub fn shutdown(self) {
        glean::shutdown();
    }
}

impl Telemetry for GleanTelemetry {
    fn record_run(&mut self, test_run: &str, test_name: &str) {
        test::RUN.set(test_run.to_string());
        test::NAME.set(test_name.to_string());
    }

    fn record_mission_started(&mut self, identifier: &str) {
        mission::IDENTIFIER.set(identifier.to_string());
        mission::STATUS.record(mission::StatusExtra::started(identifier));
    }

    fn record_space_travel(&mut self, technology: &str) {
        technology::SPACE_TRAVEL.get(technology).add(1);
    }

    fn set_experiment_active(&mut self, experiment_id: &str, branch: &str) {
        glean::set_experiment_active(experiment_id.to_string(), branch.to_string(), None);
    }

    fn submit_ping(&mut self, ping: Ping) {
        tracing::debug!(ping = ping.name(), "Submitting ping");
        ping.ping_type().submit(None);
    }

    fn set_upload_enabled(&mut self, enabled: bool) {
        glean::set_upload_enabled(enabled);
    }
}
