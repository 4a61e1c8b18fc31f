//! Telemetry client
//!
//! Burnham instruments itself with the Glean SDK. Missions only see the
//! [`Telemetry`] trait, implemented by [`GleanTelemetry`] over the global
//! Glean instance.

mod sdk;
pub mod upload;

#[cfg(test)]
pub(crate) mod fake;

pub use sdk::{GleanSettings, GleanTelemetry};
pub use upload::HttpUploader;

use crate::pings::Ping;

/// The instrumentation surface exercised by missions
pub trait Telemetry {
    /// Set `test.run` and `test.name`
    fn record_run(&mut self, test_run: &str, test_name: &str);

    /// Set `mission.identifier` and record a `started` mission status event
    fn record_mission_started(&mut self, identifier: &str);

    /// Count one trip in `technology.space_travel` under the given label
    fn record_space_travel(&mut self, technology: &str);

    fn set_experiment_active(&mut self, experiment_id: &str, branch: &str);

    fn submit_ping(&mut self, ping: Ping);

    fn set_upload_enabled(&mut self, enabled: bool);
}
