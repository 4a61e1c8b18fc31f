//! CLI argument definitions
//!
//! Defines the clap parsers for `burnham` and `burnham-bigquery`.

use clap::builder::{BoolishValueParser, PossibleValue, TypedValueParser};
use clap::error::ErrorKind;
use clap::{Arg, Args, Command, Parser};
use std::ffi::OsStr;
use std::path::PathBuf;

use crate::missions::{all_missions, get_mission, Mission};
use crate::space_travel::SporeDriveBranch;

/// Travel through space and complete missions with the Discovery crew.
///
/// If telemetry is enabled, measure, collect, and submit non-personal
/// information to the specified data platform.
#[derive(Parser, Debug)]
#[command(name = "burnham", version)]
pub struct BurnhamArgs {
    /// Print debug information to the console
    #[arg(short, long, env = "BURNHAM_VERBOSE")]
    pub verbose: bool,

    /// ID of the current test run
    #[arg(short = 'r', long, env = "BURNHAM_TEST_RUN")]
    pub test_run: String,

    /// Name of the current test
    #[arg(short = 'n', long, env = "BURNHAM_TEST_NAME")]
    pub test_name: String,

    /// Data Platform URL
    #[arg(short, long, env = "BURNHAM_PLATFORM_URL")]
    pub platform: String,

    /// Interface for the spore-drive technology
    #[arg(short, long, value_enum, env = "BURNHAM_SPORE_DRIVE")]
    pub spore_drive: Option<SporeDriveBranch>,

    /// Enable telemetry submission
    #[arg(short = 't', long, overrides_with = "disable_telemetry")]
    pub enable_telemetry: bool,

    /// Disable telemetry submission
    #[arg(short = 'T', long, overrides_with = "enable_telemetry")]
    pub disable_telemetry: bool,

    /// Telemetry default when neither -t nor -T is given
    #[arg(
        long,
        env = "BURNHAM_TELEMETRY",
        hide = true,
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub telemetry: Option<bool>,

    /// Path to a TOML configuration file
    #[arg(short, long, env = "BURNHAM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Missions to complete, in order
    #[arg(required = true, value_parser = MissionParser)]
    pub missions: Vec<&'static Mission>,
}

impl BurnhamArgs {
    /// The last of -t/-T wins, then `BURNHAM_TELEMETRY`, then enabled
    pub fn telemetry_enabled(&self) -> bool {
        if self.enable_telemetry {
            true
        } else if self.disable_telemetry {
            false
        } else {
            self.telemetry.unwrap_or(true)
        }
    }
}

/// Looks up missions by identifier while parsing arguments
#[derive(Clone, Copy, Debug)]
pub struct MissionParser;

impl TypedValueParser for MissionParser {
    type Value = &'static Mission;

    fn parse_ref(
        &self,
        cmd: &Command,
        arg: Option<&Arg>,
        value: &OsStr,
    ) -> Result<Self::Value, clap::Error> {
        let identifier = value.to_str().ok_or_else(|| {
            clap::Error::raw(ErrorKind::InvalidUtf8, "Mission identifier is not valid UTF-8\n")
                .with_cmd(cmd)
        })?;

        get_mission(identifier).ok_or_else(|| {
            let name = arg
                .map(|a| a.get_id().to_string().to_uppercase())
                .unwrap_or_else(|| "MISSIONS".to_string());
            clap::Error::raw(
                ErrorKind::ValueValidation,
                format!(
                    "Invalid value for '{}': Unknown mission identifier \"{}\"\n",
                    name, identifier
                ),
            )
            .with_cmd(cmd)
        })
    }

    fn possible_values(&self) -> Option<Box<dyn Iterator<Item = PossibleValue> + '_>> {
        Some(Box::new(
            all_missions()
                .iter()
                .map(|m| PossibleValue::new(m.identifier)),
        ))
    }
}

/// Run the BigQuery scenarios of a burnham test run.
#[derive(Parser, Debug)]
#[command(name = "burnham-bigquery", version)]
pub struct BigQueryArgs {
    #[command(flatten)]
    pub run: RunArgs,

    /// BigQuery project ID
    #[arg(long, value_name = "PROJECT_ID")]
    pub project_id: String,

    /// Table to store test results in, as project.dataset.table or dataset.table
    #[arg(long, value_name = "TABLE")]
    pub results_table: Option<String>,

    /// OAuth access token; asks gcloud when absent
    #[arg(long, env = "GOOGLE_OAUTH_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// Override the BigQuery API endpoint
    #[arg(long, value_name = "URL")]
    pub api_endpoint: Option<String>,

    /// Print debug information to the console
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to a TOML configuration file
    #[arg(short, long, env = "BURNHAM_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Test run information passed in by the scheduler
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// ID of the current test run
    #[arg(long, value_name = "RUN_ID")]
    pub run_id: String,

    /// Execution timestamp of the current test run in ISO format
    #[arg(long, value_name = "TIMESTAMP")]
    pub execution_timestamp: String,

    /// base64 encoded test scenarios
    #[arg(long, value_name = "SCENARIOS")]
    pub scenarios: String,
}
