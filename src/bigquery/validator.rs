//! Scenario validation
//!
//! Runs every test case against the warehouse, compares the returned rows
//! with the expected rows and reports the outcome of each case on its own.

use colored::Colorize;
use serde::Serialize;
use serde_json::Value;
use std::time::{Duration, Instant};

use crate::common::{Error, Result};

use super::client::Warehouse;
use super::scenario::{Run, TestCase};

/// Outcome of a single test case
#[derive(Debug, Clone, PartialEq)]
pub struct CaseOutcome {
    pub id: String,
    pub passed: bool,
    pub message: Option<String>,
    pub duration: Duration,
}

/// Row stored in the results table
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ResultRow {
    pub test_run: String,
    pub execution_timestamp: String,
    pub test_name: String,
    pub outcome: &'static str,
    pub duration_ms: u64,
    pub message: Option<String>,
}

/// Compare two JSON values, treating numbers by value so `1 == 1.0`
pub fn values_match(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Number(a), Value::Number(b)) => {
            if let (Some(a), Some(b)) = (a.as_i64(), b.as_i64()) {
                return a == b;
            }
            if let (Some(a), Some(b)) = (a.as_u64(), b.as_u64()) {
                return a == b;
            }
            match (a.as_f64(), b.as_f64()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            }
        }
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| values_match(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, x)| b.get(key).is_some_and(|y| values_match(x, y)))
        }
        _ => actual == expected,
    }
}

/// Check that rows equal the expected rows, in order
pub fn assert_rows(actual: &[Vec<Value>], expected: &[Vec<Value>]) -> Result<()> {
    if actual.len() != expected.len() {
        return Err(Error::TestAssertion(format!(
            "expected {} rows, got {}: {}",
            expected.len(),
            actual.len(),
            serde_json::to_string(actual)?
        )));
    }

    for (index, (got, want)) in actual.iter().zip(expected).enumerate() {
        let matches = got.len() == want.len()
            && got.iter().zip(want).all(|(a, b)| values_match(a, b));
        if !matches {
            return Err(Error::TestAssertion(format!(
                "row {}: expected {}, got {}",
                index,
                serde_json::to_string(want)?,
                serde_json::to_string(got)?
            )));
        }
    }
    Ok(())
}

/// Run all cases; a failing case does not stop the others
pub async fn run_cases(warehouse: &dyn Warehouse, cases: &[TestCase]) -> Vec<CaseOutcome> {
    let mut outcomes = Vec::with_capacity(cases.len());

    for case in cases {
        let started = Instant::now();
        tracing::debug!(case = %case.id, "Running query");

        let result = match warehouse.query(&case.query, &case.parameters).await {
            Ok(rows) => assert_rows(&rows, &case.want),
            Err(e) => Err(e),
        };

        let duration = started.elapsed();
        let outcome = match result {
            Ok(()) => {
                println!("  {} {}", "✓".green(), case.id);
                CaseOutcome {
                    id: case.id.clone(),
                    passed: true,
                    message: None,
                    duration,
                }
            }
            Err(e) => {
                println!("  {} {}: {}", "✗".red(), case.id, e);
                CaseOutcome {
                    id: case.id.clone(),
                    passed: false,
                    message: Some(e.to_string()),
                    duration,
                }
            }
        };
        outcomes.push(outcome);
    }

    outcomes
}

/// Print the summary line, returns whether every case passed
pub fn print_summary(outcomes: &[CaseOutcome]) -> bool {
    let failed = outcomes.iter().filter(|o| !o.passed).count();
    let passed = outcomes.len() - failed;

    if failed == 0 {
        println!(
            "\n{} {}\n",
            "✓".green().bold(),
            format!("{} passed", passed).green().bold()
        );
        true
    } else {
        println!(
            "\n{} {}, {}\n",
            "✗".red().bold(),
            format!("{} passed", passed).green(),
            format!("{} failed", failed).red().bold()
        );
        false
    }
}

/// Build rows for the results table
pub fn result_rows(run: &Run, outcomes: &[CaseOutcome]) -> Vec<ResultRow> {
    outcomes
        .iter()
        .map(|outcome| ResultRow {
            test_run: run.identifier.clone(),
            execution_timestamp: run.execution_timestamp.clone(),
            test_name: outcome.id.clone(),
            outcome: if outcome.passed { "passed" } else { "failed" },
            duration_ms: outcome.duration.as_millis() as u64,
            message: outcome.message.clone(),
        })
        .collect()
}
