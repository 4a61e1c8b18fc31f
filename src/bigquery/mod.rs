//! BigQuery scenario validation
//!
//! Decodes the scenarios of a test run, runs their queries against the
//! warehouse and reports which ones returned the expected rows.

pub mod client;
pub mod scenario;
pub mod validator;

pub use client::{fetch_access_token, BigQueryClient, TableRef, Warehouse};
pub use scenario::{generate_cases, Run, Scenario, TestCase};
pub use validator::{print_summary, result_rows, run_cases, CaseOutcome};
