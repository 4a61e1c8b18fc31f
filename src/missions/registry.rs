//! Mission registry
//!
//! Contains every mission the crew can be sent on.

use super::{Mission, Step};
use crate::pings::Ping;

/// Identifier of the mission that disables telemetry upload
pub const DISABLE_UPLOAD: &str = "MISSION H: DISABLE GLEAN UPLOAD";

/// Identifier of the mission that enables telemetry upload
pub const ENABLE_UPLOAD: &str = "MISSION I: ENABLE GLEAN UPLOAD";

/// All available missions
static MISSIONS: &[Mission] = &[
    Mission {
        identifier: "MISSION A: ONE WARP",
        steps: &[
            Step::Warp("abcdefgh"),
            Step::SubmitPing(Ping::Discovery),
        ],
    },
    Mission {
        identifier: "MISSION B: TWO WARPS",
        steps: &[
            Step::Warp("abcdefgh"),
            Step::Warp("hgfedcba"),
            Step::SubmitPing(Ping::Discovery),
        ],
    },
    Mission {
        identifier: "MISSION C: ONE JUMP",
        steps: &[
            Step::Jump("Mycelial network"),
            Step::SubmitPing(Ping::Discovery),
        ],
    },
    Mission {
        identifier: "MISSION D: TWO JUMPS",
        steps: &[
            Step::Jump("Mycelial network"),
            Step::Jump("Kaminar"),
            Step::SubmitPing(Ping::Discovery),
        ],
    },
    Mission {
        identifier: "MISSION E: ONE JUMP, ONE METRIC ERROR",
        steps: &[
            Step::Jump("Mycelial network"),
            Step::MetricError("lasers"),
            Step::SubmitPing(Ping::Discovery),
        ],
    },
    Mission {
        identifier: "MISSION F: TWO WARPS, ONE JUMP",
        steps: &[
            Step::Warp("abcdefgh"),
            Step::Warp("hgfedcba"),
            Step::Jump("Mycelial network"),
            Step::SubmitPing(Ping::Discovery),
        ],
    },
    Mission {
        identifier: "MISSION G: FIVE WARPS, FOUR JUMPS",
        steps: &[
            Step::Warp("abcdefgh"),
            Step::Jump("Mycelial network"),
            Step::Warp("hgfedcba"),
            Step::Jump("Kaminar"),
            Step::Warp("abcdefgh"),
            Step::Jump("Starbase 46"),
            Step::Warp("hgfedcba"),
            Step::Jump("Mycelial network"),
            Step::Warp("abcdefgh"),
            Step::SubmitPing(Ping::Discovery),
        ],
    },
    Mission {
        identifier: DISABLE_UPLOAD,
        steps: &[Step::SetUploadEnabled(false)],
    },
    Mission {
        identifier: ENABLE_UPLOAD,
        steps: &[Step::SetUploadEnabled(true)],
    },
    Mission {
        identifier: "MISSION J: SUBMIT STARBASE46 PING",
        steps: &[Step::SubmitPing(Ping::Starbase46)],
    },
];

/// Get all registered missions
pub fn all_missions() -> &'static [Mission] {
    MISSIONS
}

/// Get a mission by identifier
pub fn get_mission(identifier: &str) -> Option<&'static Mission> {
    MISSIONS.iter().find(|m| m.identifier == identifier)
}
