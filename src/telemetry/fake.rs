//! In-memory [`Telemetry`] for unit tests
//!
//! Follows the Glean behavior missions rely on: disabling upload wipes
//! recorded data and drops everything recorded or submitted until upload is
//! enabled again, empty pings are skipped unless declared `send_if_empty`,
//! and submitting `discovery` clears its ping-lifetime data.

use std::collections::BTreeMap;

use crate::metrics::technology::{SPORE_DRIVE, WARP_DRIVE};
use crate::pings::Ping;

use super::Telemetry;

pub const OTHER_LABEL: &str = "__other__";

/// Data carried by one submitted ping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SentPing {
    pub name: &'static str,
    pub strings: BTreeMap<&'static str, String>,
    pub space_travel: BTreeMap<String, i32>,
    /// `(mission, status)` extras of the recorded status events
    pub events: Vec<(String, String)>,
    pub experiments: BTreeMap<String, String>,
}

#[derive(Debug)]
pub struct FakeTelemetry {
    upload_enabled: bool,
    test_run: Option<String>,
    test_name: Option<String>,
    mission_identifier: Option<String>,
    space_travel: BTreeMap<String, i32>,
    events: Vec<(String, String)>,
    experiments: BTreeMap<String, String>,
    pub invalid_labels: u32,
    pub deletion_requests: u32,
    pub sent: Vec<SentPing>,
}

impl Default for FakeTelemetry {
    fn default() -> Self {
        Self::new(true)
    }
}

impl FakeTelemetry {
    pub fn new(upload_enabled: bool) -> Self {
        Self {
            upload_enabled,
            test_run: None,
            test_name: None,
            mission_identifier: None,
            space_travel: BTreeMap::new(),
            events: Vec::new(),
            experiments: BTreeMap::new(),
            invalid_labels: 0,
            deletion_requests: 0,
            sent: Vec::new(),
        }
    }

    pub fn test_run(&self) -> Option<&str> {
        self.test_run.as_deref()
    }

    pub fn test_name(&self) -> Option<&str> {
        self.test_name.as_deref()
    }

    /// Current count for a label of `technology.space_travel`
    pub fn space_travel(&self, label: &str) -> Option<i32> {
        self.space_travel.get(label).copied()
    }

    pub fn sent_names(&self) -> Vec<&'static str> {
        self.sent.iter().map(|ping| ping.name).collect()
    }

    pub fn last_sent(&self, ping: Ping) -> Option<&SentPing> {
        self.sent.iter().rev().find(|sent| sent.name == ping.name())
    }

    fn contents(&self, ping: Ping) -> SentPing {
        let mut sent = SentPing {
            name: ping.name(),
            experiments: self.experiments.clone(),
            ..SentPing::default()
        };
        if let Some(run) = &self.test_run {
            sent.strings.insert("test.run", run.clone());
        }
        if let Some(name) = &self.test_name {
            sent.strings.insert("test.name", name.clone());
        }
        if ping == Ping::Discovery {
            if let Some(identifier) = &self.mission_identifier {
                sent.strings.insert("mission.identifier", identifier.clone());
            }
            sent.space_travel = self.space_travel.clone();
            sent.events = self.events.clone();
        }
        sent
    }
}

impl Telemetry for FakeTelemetry {
    fn record_run(&mut self, test_run: &str, test_name: &str) {
        if self.upload_enabled {
            self.test_run = Some(test_run.to_string());
            self.test_name = Some(test_name.to_string());
        }
    }

    fn record_mission_started(&mut self, identifier: &str) {
        if self.upload_enabled {
            self.mission_identifier = Some(identifier.to_string());
            self.events
                .push((identifier.to_string(), "started".to_string()));
        }
    }

    fn record_space_travel(&mut self, technology: &str) {
        if !self.upload_enabled {
            return;
        }
        let label = if technology == SPORE_DRIVE || technology == WARP_DRIVE {
            technology
        } else {
            self.invalid_labels += 1;
            OTHER_LABEL
        };
        *self.space_travel.entry(label.to_string()).or_insert(0) += 1;
    }

    fn set_experiment_active(&mut self, experiment_id: &str, branch: &str) {
        self.experiments
            .insert(experiment_id.to_string(), branch.to_string());
    }

    fn submit_ping(&mut self, ping: Ping) {
        if !self.upload_enabled {
            return;
        }
        let contents = self.contents(ping);
        let empty = contents.strings.is_empty()
            && contents.space_travel.is_empty()
            && contents.events.is_empty();
        if !empty || ping.send_if_empty() {
            self.sent.push(contents);
        }
        if ping == Ping::Discovery {
            self.mission_identifier = None;
            self.space_travel.clear();
            self.events.clear();
        }
    }

    fn set_upload_enabled(&mut self, enabled: bool) {
        if self.upload_enabled && !enabled {
            self.deletion_requests += 1;
            self.test_run = None;
            self.test_name = None;
            self.mission_identifier = None;
            self.space_travel.clear();
            self.events.clear();
        }
        self.upload_enabled = enabled;
    }
}
