//! CLI command handling
//!
//! Wires parsed arguments to the telemetry client, the mission runner and
//! the BigQuery validator.

use crate::bigquery::client::{fetch_access_token, BigQueryClient, TableRef, Warehouse};
use crate::bigquery::scenario::{generate_cases, Run};
use crate::bigquery::validator::{print_summary, result_rows, run_cases};
use crate::commands::{BigQueryArgs, BurnhamArgs};
use crate::common::config::Config;
use crate::common::{Error, Result};
use crate::missions::{MissionRunner, RunContext};
use crate::telemetry::{GleanSettings, GleanTelemetry};

/// Fly the requested missions and give Glean time to send pings
///
/// The flush wait and shutdown also happen when a mission fails, so pings
/// submitted before the failure still reach the platform.
pub async fn run(args: BurnhamArgs) -> Result<()> {
    let config = Config::load(args.config.as_deref())?;

    // Removed on drop, so every run starts as a fresh client
    let data_dir = tempfile::Builder::new()
        .prefix("burnham-")
        .tempdir()
        .map_err(|e| Error::TelemetryInit(format!("Cannot create data dir: {}", e)))?;
    tracing::debug!("Telemetry data dir: {}", data_dir.path().display());

    let mut glean = GleanTelemetry::initialize(GleanSettings {
        application_id: config.telemetry.application_id.clone(),
        server_endpoint: args.platform.clone(),
        upload_enabled: args.telemetry_enabled(),
        data_dir: data_dir.path().to_path_buf(),
        request_timeout: config.upload.request_timeout(),
    })?;

    let context = RunContext {
        test_run: args.test_run.clone(),
        test_name: args.test_name.clone(),
        spore_drive: args.spore_drive,
    };

    let result = MissionRunner::prepare(&mut glean, context).run(&args.missions);
    match &result {
        Ok(()) => tracing::info!("All missions completed."),
        Err(e) => tracing::error!("Mission failed: {}", e),
    }

    let wait = config.telemetry.flush_wait();
    tracing::info!("Waiting {}s for telemetry to be sent.", wait.as_secs());
    tokio::time::sleep(wait).await;

    tokio::task::spawn_blocking(move || glean.shutdown())
        .await
        .map_err(|e| Error::TelemetryShutdown(e.to_string()))?;

    Ok(result?)
}

/// Validate the scenarios of a test run, returns whether all cases passed
pub async fn run_bigquery(args: BigQueryArgs) -> Result<bool> {
    let mut config = Config::load(args.config.as_deref())?;
    if let Some(endpoint) = &args.api_endpoint {
        config.bigquery.api_endpoint = endpoint.clone();
    }

    let run = Run::from_options(
        &args.run.run_id,
        &args.run.execution_timestamp,
        &args.run.scenarios,
    )?;
    let results_table = args
        .results_table
        .as_deref()
        .map(|table| TableRef::parse(table, &args.project_id))
        .transpose()?;

    let access_token = match args.access_token {
        Some(token) => token,
        None => fetch_access_token().await?,
    };
    let client = BigQueryClient::new(&args.project_id, access_token, config.bigquery)?;

    let cases = generate_cases(&run);
    tracing::info!(
        "Running {} scenarios for test run {}",
        cases.len(),
        run.identifier
    );

    let outcomes = run_cases(&client, &cases).await;
    let mut passed = print_summary(&outcomes);

    if let Some(table) = results_table {
        let rows = result_rows(&run, &outcomes)
            .iter()
            .map(serde_json::to_value)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        if let Err(e) = client.insert_rows(&table, &rows).await {
            tracing::error!("Failed to store test results: {}", e);
            passed = false;
        }
    }

    Ok(passed)
}
