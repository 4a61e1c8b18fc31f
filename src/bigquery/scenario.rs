//! Test scenarios and test case generation
//!
//! The scheduler passes scenarios as a base64 encoded JSON array:
//!
//! ```json
//! [{"name": "test_labeled_counter", "query": "SELECT ...", "want": [[1, "a"]]}]
//! ```

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;

use crate::common::{Error, Result};

/// Query parameter carrying the test run ID
pub const TEST_RUN_PARAMETER: &str = "burnham_test_run";

/// Query parameter carrying the execution timestamp
pub const EXECUTION_TIMESTAMP_PARAMETER: &str = "burnham_execution_timestamp";

/// A named query and the rows it should return
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    pub name: String,
    pub query: String,
    pub want: Vec<Vec<Value>>,
}

/// Information about the current test run
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub identifier: String,
    pub execution_timestamp: String,
    pub scenarios: Vec<Scenario>,
}

impl Run {
    /// Build a run from CLI options, decoding the scenario payload
    ///
    /// The timestamp is passed to the queries verbatim, BigQuery parses it.
    pub fn from_options(identifier: &str, execution_timestamp: &str, scenarios: &str) -> Result<Self> {
        Ok(Self {
            identifier: identifier.to_string(),
            execution_timestamp: execution_timestamp.to_string(),
            scenarios: decode_scenarios(scenarios)?,
        })
    }
}

/// Decode base64 → UTF-8 → JSON scenarios
pub fn decode_scenarios(encoded: &str) -> Result<Vec<Scenario>> {
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| Error::ScenarioDecode(format!("invalid base64: {}", e)))?;
    let text = String::from_utf8(bytes)
        .map_err(|e| Error::ScenarioDecode(format!("invalid UTF-8: {}", e)))?;
    let scenarios: Vec<Scenario> = serde_json::from_str(&text)
        .map_err(|e| Error::ScenarioDecode(format!("invalid scenario list: {}", e)))?;

    let mut names = HashSet::new();
    for scenario in &scenarios {
        if !names.insert(scenario.name.as_str()) {
            return Err(Error::DuplicateScenario(scenario.name.clone()));
        }
    }
    Ok(scenarios)
}

/// A named STRING query parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParameter {
    pub name: String,
    pub value: String,
}

impl QueryParameter {
    pub fn string(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

/// One generated test, named after its scenario
#[derive(Debug, Clone, PartialEq)]
pub struct TestCase {
    pub id: String,
    pub query: String,
    pub parameters: Vec<QueryParameter>,
    pub want: Vec<Vec<Value>>,
}

/// Generate one test case per scenario
pub fn generate_cases(run: &Run) -> Vec<TestCase> {
    run.scenarios
        .iter()
        .map(|scenario| TestCase {
            id: scenario.name.clone(),
            query: scenario.query.clone(),
            parameters: vec![
                QueryParameter::string(TEST_RUN_PARAMETER, &run.identifier),
                QueryParameter::string(EXECUTION_TIMESTAMP_PARAMETER, &run.execution_timestamp),
            ],
            want: scenario.want.clone(),
        })
        .collect()
}
