//! Mission runner
//!
//! Prepares the ship and the run metadata, then flies missions strictly in
//! the order they were requested.

use crate::common::MissionError;
use crate::pings::Ping;
use crate::space_travel::{Discovery, SporeDrive, SporeDriveBranch, WarpDrive, SPORE_DRIVE_EXPERIMENT};
use crate::telemetry::Telemetry;

use super::{complete_mission, Mission};

/// Metadata identifying a test run in the recorded telemetry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    pub test_run: String,
    pub test_name: String,
    pub spore_drive: Option<SporeDriveBranch>,
}

impl RunContext {
    /// Record `test.run` and `test.name`
    pub fn record(&self, telemetry: &mut dyn Telemetry) {
        telemetry.record_run(&self.test_run, &self.test_name);
    }
}

/// Owns the ship for the duration of a run
pub struct MissionRunner<'a> {
    telemetry: &'a mut dyn Telemetry,
    context: RunContext,
    space_ship: Discovery,
}

impl<'a> MissionRunner<'a> {
    /// Record run metadata, assemble the ship and report it ready
    pub fn prepare(telemetry: &'a mut dyn Telemetry, context: RunContext) -> Self {
        context.record(telemetry);

        if let Some(branch) = context.spore_drive {
            telemetry.set_experiment_active(SPORE_DRIVE_EXPERIMENT, branch.as_str());
        }

        let space_ship = Discovery::new(
            WarpDrive::default(),
            SporeDrive::from_branch(context.spore_drive),
        );
        telemetry.submit_ping(Ping::SpaceShipReady);

        Self {
            telemetry,
            context,
            space_ship,
        }
    }

    pub fn space_ship(&self) -> &Discovery {
        &self.space_ship
    }

    /// Fly all missions in order
    pub fn run(&mut self, missions: &[&Mission]) -> Result<(), MissionError> {
        run_missions(&mut self.space_ship, self.telemetry, missions, &self.context)
    }
}

/// Fly missions in order, stopping at the first failure
///
/// Disabling upload wipes `test.run` and `test.name`, so they are recorded
/// again after any mission that turns upload back on.
pub fn run_missions(
    space_ship: &mut Discovery,
    telemetry: &mut dyn Telemetry,
    missions: &[&Mission],
    context: &RunContext,
) -> Result<(), MissionError> {
    for mission in missions {
        complete_mission(space_ship, telemetry, mission)?;

        if mission.re_enables_upload() {
            tracing::debug!("Restoring run metadata after re-enabling upload");
            context.record(telemetry);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::missions::get_mission;
    use crate::missions::registry::{DISABLE_UPLOAD, ENABLE_UPLOAD};
    use crate::telemetry::fake::FakeTelemetry;

    fn context(spore_drive: Option<SporeDriveBranch>) -> RunContext {
        RunContext {
            test_run: "8f1c9c1a-run".to_string(),
            test_name: "test_disable_upload".to_string(),
            spore_drive,
        }
    }

    fn missions(ids: &[&str]) -> Vec<&'static Mission> {
        ids.iter().map(|id| get_mission(id).unwrap()).collect()
    }

    #[test]
    fn test_prepare_submits_space_ship_ready() {
        let mut telemetry = FakeTelemetry::default();

        let runner = MissionRunner::prepare(&mut telemetry, context(Some(SporeDriveBranch::TardigradeDna)));
        assert!(runner.space_ship().spore_drive.is_active());

        let sent = telemetry.last_sent(Ping::SpaceShipReady).unwrap();
        assert_eq!(sent.strings["test.run"], "8f1c9c1a-run");
        assert_eq!(sent.strings["test.name"], "test_disable_upload");
        assert_eq!(sent.experiments[SPORE_DRIVE_EXPERIMENT], "tardigrade-dna");
    }

    #[test]
    fn test_no_experiment_without_spore_drive() {
        let mut telemetry = FakeTelemetry::default();

        let runner = MissionRunner::prepare(&mut telemetry, context(None));
        assert!(!runner.space_ship().spore_drive.is_active());

        let sent = telemetry.last_sent(Ping::SpaceShipReady).unwrap();
        assert!(sent.experiments.is_empty());
    }

    #[test]
    fn test_disabled_upload_sends_nothing() {
        let mut telemetry = FakeTelemetry::new(false);

        {
            let mut runner = MissionRunner::prepare(&mut telemetry, context(None));
            runner
                .run(&missions(&["MISSION A: ONE WARP", "MISSION B: TWO WARPS"]))
                .unwrap();
        }

        assert!(telemetry.sent.is_empty());
    }

    #[test]
    fn test_re_enabling_upload_restores_run_metadata() {
        let mut telemetry = FakeTelemetry::default();
        let ctx = context(None);

        {
            let mut runner = MissionRunner::prepare(&mut telemetry, ctx.clone());
            runner
                .run(&missions(&["MISSION A: ONE WARP", DISABLE_UPLOAD, ENABLE_UPLOAD]))
                .unwrap();
        }

        assert_eq!(telemetry.test_run(), Some(ctx.test_run.as_str()));
        assert_eq!(telemetry.test_name(), Some(ctx.test_name.as_str()));
    }

    #[test]
    fn test_disable_without_enable_leaves_metadata_cleared() {
        let mut telemetry = FakeTelemetry::default();

        {
            let mut runner = MissionRunner::prepare(&mut telemetry, context(None));
            runner.run(&missions(&[DISABLE_UPLOAD])).unwrap();
        }

        assert_eq!(telemetry.test_run(), None);
        assert_eq!(telemetry.deletion_requests, 1);
    }

    #[test]
    fn test_pings_after_re_enabling_carry_run_metadata() {
        let mut telemetry = FakeTelemetry::default();

        {
            let mut runner = MissionRunner::prepare(&mut telemetry, context(None));
            runner
                .run(&missions(&[DISABLE_UPLOAD, ENABLE_UPLOAD, "MISSION B: TWO WARPS"]))
                .unwrap();
        }

        assert_eq!(telemetry.sent_names(), vec!["space-ship-ready", "discovery"]);
        let sent = telemetry.last_sent(Ping::Discovery).unwrap();
        assert_eq!(sent.strings["test.run"], "8f1c9c1a-run");
        assert_eq!(sent.strings["mission.identifier"], "MISSION B: TWO WARPS");
    }

    #[test]
    fn test_failure_stops_remaining_missions() {
        let mut telemetry = FakeTelemetry::default();

        let result = {
            let mut runner = MissionRunner::prepare(&mut telemetry, context(None));
            runner.run(&missions(&["MISSION C: ONE JUMP", "MISSION A: ONE WARP"]))
        };

        assert!(matches!(result, Err(MissionError::SporeDriveInactive { .. })));
        assert!(telemetry.last_sent(Ping::Discovery).is_none());
    }
}
