//! The starship Discovery and its drives
//!
//! Each drive records its use in the `technology.space_travel` labeled
//! counter and refuses to operate while inactive.

use std::fmt;

use crate::common::MissionError;
use crate::metrics::technology::{SPORE_DRIVE, WARP_DRIVE};
use crate::telemetry::Telemetry;

/// Experiment annotating which spore drive interface is in use
pub const SPORE_DRIVE_EXPERIMENT: &str = "spore_drive";

/// Interface for the spore-drive technology
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SporeDriveBranch {
    /// Navigate the mycelial network with the tardigrade
    Tardigrade,
    /// Navigate with the tardigrade DNA injected into a crew member
    TardigradeDna,
}

impl SporeDriveBranch {
    pub fn as_str(self) -> &'static str {
        match self {
            SporeDriveBranch::Tardigrade => "tardigrade",
            SporeDriveBranch::TardigradeDna => "tardigrade-dna",
        }
    }
}

impl fmt::Display for SporeDriveBranch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Conventional faster-than-light drive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarpDrive {
    active: bool,
}

impl Default for WarpDrive {
    fn default() -> Self {
        Self { active: true }
    }
}

impl WarpDrive {
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn warp(&self, telemetry: &mut dyn Telemetry, coordinates: &str) -> Result<(), MissionError> {
        if !self.active {
            return Err(MissionError::WarpDriveInactive {
                coordinates: coordinates.to_string(),
            });
        }
        tracing::info!("Warp to {}", coordinates);
        telemetry.record_space_travel(WARP_DRIVE);
        Ok(())
    }
}

/// Experimental drive jumping through the mycelial network
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SporeDrive {
    branch: Option<SporeDriveBranch>,
    active: bool,
}

impl SporeDrive {
    /// A drive that is active exactly when a branch is selected
    pub fn from_branch(branch: Option<SporeDriveBranch>) -> Self {
        Self {
            branch,
            active: branch.is_some(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn jump(&self, telemetry: &mut dyn Telemetry, coordinates: &str) -> Result<(), MissionError> {
        if !self.active {
            return Err(MissionError::SporeDriveInactive {
                coordinates: coordinates.to_string(),
            });
        }
        match self.branch {
            Some(branch) => tracing::info!("Jump to {} ({})", coordinates, branch),
            None => tracing::info!("Jump to {}", coordinates),
        }
        telemetry.record_space_travel(SPORE_DRIVE);
        Ok(())
    }
}

/// The starship
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Discovery {
    pub warp_drive: WarpDrive,
    pub spore_drive: SporeDrive,
}

impl Discovery {
    pub fn new(warp_drive: WarpDrive, spore_drive: SporeDrive) -> Self {
        Self {
            warp_drive,
            spore_drive,
        }
    }
}
