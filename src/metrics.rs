//! Metrics recorded by burnham

use glean::{CommonMetricData, Lifetime};

use crate::pings::Ping;

fn meta(category: &str, name: &str, pings: &[Ping], lifetime: Lifetime) -> CommonMetricData {
    CommonMetricData {
        category: category.to_string(),
        name: name.to_string(),
        send_in_pings: pings.iter().map(|ping| ping.name().to_string()).collect(),
        lifetime,
        disabled: false,
        ..Default::default()
    }
}

pub mod test {
    use std::sync::LazyLock;

    use glean::private::StringMetric;
    use glean::Lifetime;

    use super::meta;
    use crate::pings::Ping;

    /// ID of the current test run, used to find this run's pings
    pub static RUN: LazyLock<StringMetric> = LazyLock::new(|| {
        StringMetric::new(meta("test", "run", &Ping::ALL, Lifetime::Application))
    });

    /// Name of the current test
    pub static NAME: LazyLock<StringMetric> = LazyLock::new(|| {
        StringMetric::new(meta("test", "name", &Ping::ALL, Lifetime::Application))
    });
}

pub mod mission {
    use std::collections::HashMap;
    use std::sync::LazyLock;

    use glean::private::{EventMetric, StringMetric};
    use glean::traits::ExtraKeys;
    use glean::Lifetime;

    use super::meta;
    use crate::pings::Ping;

    /// Identifier of the mission reported by a discovery ping
    pub static IDENTIFIER: LazyLock<StringMetric> = LazyLock::new(|| {
        StringMetric::new(meta("mission", "identifier", &[Ping::Discovery], Lifetime::Ping))
    });

    /// Recorded when a mission starts
    pub static STATUS: LazyLock<EventMetric<StatusExtra>> = LazyLock::new(|| {
        EventMetric::new(meta("mission", "status", &[Ping::Discovery], Lifetime::Ping))
    });

    /// Extra keys of the `mission.status` event
    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    pub struct StatusExtra {
        pub mission: Option<String>,
        pub status: Option<String>,
    }

    impl StatusExtra {
        pub fn started(mission: &str) -> Self {
            Self {
                mission: Some(mission.to_string()),
                status: Some("started".to_string()),
            }
        }
    }

    impl ExtraKeys for StatusExtra {
        const ALLOWED_KEYS: &'static [&'static str] = &["mission", "status"];

        fn into_ffi_extra(self) -> HashMap<String, String> {
            let mut extra = HashMap::new();
            if let Some(mission) = self.mission {
                extra.insert("mission".to_string(), mission);
            }
            if let Some(status) = self.status {
                extra.insert("status".to_string(), status);
            }
            extra
        }
    }
}

pub mod technology {
    use std::borrow::Cow;
    use std::sync::LazyLock;

    use glean::private::{CounterMetric, LabeledMetric};
    use glean::{LabeledMetricData, Lifetime};

    use super::meta;
    use crate::pings::Ping;

    pub const SPORE_DRIVE: &str = "spore_drive";
    pub const WARP_DRIVE: &str = "warp_drive";

    /// Number of warps and jumps during a mission
    ///
    /// Undeclared labels are counted under `__other__` and reported as an
    /// `invalid_label` error.
    pub static SPACE_TRAVEL: LazyLock<LabeledMetric<CounterMetric>> = LazyLock::new(|| {
        LabeledMetric::new(
            LabeledMetricData::Common {
                cmd: meta("technology", "space_travel", &[Ping::Discovery], Lifetime::Ping),
            },
            Some(vec![Cow::from(SPORE_DRIVE), Cow::from(WARP_DRIVE)]),
        )
    });
}
