//! burnham - End-to-end test application for the telemetry pipeline
//!
//! Runs missions that record telemetry and submit pings, and validates that
//! the resulting data shows up in BigQuery.

pub mod bigquery;
pub mod cli;
pub mod commands;
pub mod common;
pub mod metrics;
pub mod missions;
pub mod pings;
pub mod space_travel;
pub mod telemetry;

pub use common::{Error, MissionError, Result};
