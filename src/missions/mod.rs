//! Space-travel missions
//!
//! A mission is a named, ordered list of [`Step`]s. Each step performs one
//! instrumentation action against the telemetry client, usually by flying the
//! ship.

pub mod registry;
pub mod runner;

use crate::common::MissionError;
use crate::pings::Ping;
use crate::space_travel::Discovery;
use crate::telemetry::Telemetry;

pub use registry::{all_missions, get_mission};
pub use runner::{run_missions, MissionRunner, RunContext};

/// A single mission action
#[derive(Debug, Clone, Copy)]
pub enum Step {
    /// Warp to the given coordinates
    Warp(&'static str),
    /// Jump through the mycelial network to the given coordinates
    Jump(&'static str),
    /// Record space travel with an undeclared technology label
    MetricError(&'static str),
    /// Submit a ping
    SubmitPing(Ping),
    /// Enable or disable telemetry upload
    SetUploadEnabled(bool),
}

impl Step {
    /// Apply this step to the ship and the telemetry client
    pub fn apply(&self, space_ship: &mut Discovery, telemetry: &mut dyn Telemetry) -> Result<(), MissionError> {
        match *self {
            Step::Warp(coordinates) => space_ship.warp_drive.warp(telemetry, coordinates),
            Step::Jump(coordinates) => space_ship.spore_drive.jump(telemetry, coordinates),
            Step::MetricError(label) => {
                tracing::debug!(label, "Recording travel with an undeclared technology");
                telemetry.record_space_travel(label);
                Ok(())
            }
            Step::SubmitPing(ping) => {
                telemetry.submit_ping(ping);
                Ok(())
            }
            Step::SetUploadEnabled(enabled) => {
                telemetry.set_upload_enabled(enabled);
                Ok(())
            }
        }
    }
}

/// A named sequence of steps
#[derive(Debug)]
pub struct Mission {
    pub identifier: &'static str,
    pub steps: &'static [Step],
}

impl Mission {
    /// Whether this mission turns telemetry upload back on
    ///
    /// Enabling upload starts from an empty store, so run metadata has to be
    /// recorded again afterwards.
    pub fn re_enables_upload(&self) -> bool {
        self.steps
            .iter()
            .any(|step| matches!(step, Step::SetUploadEnabled(true)))
    }
}

/// Fly a mission
///
/// Steps after a failing step are not applied.
pub fn complete_mission(
    space_ship: &mut Discovery,
    telemetry: &mut dyn Telemetry,
    mission: &Mission,
) -> Result<(), MissionError> {
    tracing::info!("Starting {}", mission.identifier);

    telemetry.record_mission_started(mission.identifier);

    for (i, step) in mission.steps.iter().enumerate() {
        tracing::debug!(step = i + 1, ?step, "Applying step");
        step.apply(space_ship, telemetry)?;
    }

    tracing::info!("Completed {}", mission.identifier);
    Ok(())
}
