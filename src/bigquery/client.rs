//! Warehouse client
//!
//! The validator talks to the warehouse through the [`Warehouse`] trait. The
//! BigQuery implementation uses the REST API directly: `jobs.query` with
//! named parameters, `jobs.getQueryResults` for polling and paging, and
//! `tabledata.insertAll` for storing results.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map, Number, Value};
use std::time::{Duration, Instant};

use crate::common::config::BigQueryConfig;
use crate::common::{Error, Result};

use super::scenario::QueryParameter;

/// Parameterized query execution and row insertion
#[async_trait]
pub trait Warehouse: Send + Sync {
    /// Run a query and return its rows as ordered value lists
    async fn query(&self, query: &str, parameters: &[QueryParameter]) -> Result<Vec<Vec<Value>>>;

    /// Append JSON rows to a table
    async fn insert_rows(&self, table: &TableRef, rows: &[Value]) -> Result<()>;
}

/// A fully qualified table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    pub project_id: String,
    pub dataset_id: String,
    pub table_id: String,
}

impl TableRef {
    /// Parse `project.dataset.table`, or `dataset.table` in the default project
    pub fn parse(name: &str, default_project: &str) -> Result<Self> {
        let parts: Vec<&str> = name.split('.').collect();
        if parts.iter().any(|p| p.trim().is_empty()) {
            return Err(Error::Config(format!("Invalid table '{}'", name)));
        }
        match parts.as_slice() {
            [project, dataset, table] => Ok(Self {
                project_id: project.to_string(),
                dataset_id: dataset.to_string(),
                table_id: table.to_string(),
            }),
            [dataset, table] => Ok(Self {
                project_id: default_project.to_string(),
                dataset_id: dataset.to_string(),
                table_id: table.to_string(),
            }),
            _ => Err(Error::Config(format!(
                "Invalid table '{}': expected project.dataset.table or dataset.table",
                name
            ))),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryResponse {
    #[serde(default)]
    job_complete: bool,
    job_reference: Option<JobReference>,
    schema: Option<TableSchema>,
    #[serde(default)]
    rows: Vec<RowData>,
    page_token: Option<String>,
    #[serde(default)]
    errors: Vec<ErrorProto>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
struct JobReference {
    job_id: String,
    location: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct TableSchema {
    #[serde(default)]
    pub fields: Vec<FieldSchema>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FieldSchema {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub mode: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldSchema>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RowData {
    #[serde(default)]
    pub f: Vec<Cell>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Cell {
    #[serde(default)]
    pub v: Value,
}

#[derive(Debug, Deserialize)]
struct ErrorProto {
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InsertAllResponse {
    #[serde(default)]
    insert_errors: Vec<Value>,
}

/// BigQuery REST client
pub struct BigQueryClient {
    http: reqwest::Client,
    project_id: String,
    access_token: String,
    config: BigQueryConfig,
}

impl BigQueryClient {
    pub fn new(project_id: &str, access_token: String, config: BigQueryConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("burnham-bigquery/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Warehouse(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http,
            project_id: project_id.to_string(),
            access_token,
            config,
        })
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/bigquery/v2/projects/{}{}",
            self.config.api_endpoint.trim_end_matches('/'),
            self.project_id,
            path
        )
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Value> {
        let response = request
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| Error::Warehouse(e.to_string()))?;

        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|e| Error::Warehouse(format!("Invalid response ({}): {}", status, e)))?;

        if !status.is_success() {
            let message = body["error"]["message"]
                .as_str()
                .unwrap_or("no error message")
                .to_string();
            return Err(Error::Warehouse(format!("{}: {}", status, message)));
        }
        Ok(body)
    }

    async fn get_query_results(&self, job: &JobReference, page_token: Option<&str>) -> Result<QueryResponse> {
        let mut params = vec![("timeoutMs", self.config.query_timeout_ms.to_string())];
        if let Some(location) = &job.location {
            params.push(("location", location.clone()));
        }
        if let Some(token) = page_token {
            params.push(("pageToken", token.to_string()));
        }
        let url = self.url(&format!("/queries/{}", job.job_id));
        let body = self.send(self.http.get(url).query(&params)).await?;
        Ok(serde_json::from_value(body)?)
    }
}

#[async_trait]
impl Warehouse for BigQueryClient {
    async fn query(&self, query: &str, parameters: &[QueryParameter]) -> Result<Vec<Vec<Value>>> {
        let request = query_request_body(query, parameters, self.config.query_timeout_ms);
        tracing::debug!("jobs.query: {}", query);

        let body = self.send(self.http.post(self.url("/queries")).json(&request)).await?;
        let mut response: QueryResponse = serde_json::from_value(body)?;

        let job = response
            .job_reference
            .clone()
            .ok_or_else(|| Error::Warehouse("Response is missing a job reference".to_string()))?;

        let deadline = Instant::now() + Duration::from_secs(self.config.job_deadline_secs);
        while !response.job_complete {
            if Instant::now() >= deadline {
                return Err(Error::query_failed(&job.job_id, "job did not complete in time"));
            }
            tracing::debug!(job_id = %job.job_id, "Waiting for query job");
            response = self.get_query_results(&job, None).await?;
        }

        if let Some(error) = response.errors.first() {
            return Err(Error::query_failed(&job.job_id, &error.message));
        }

        let schema = response.schema.clone().unwrap_or_default();
        let mut rows = convert_rows(&schema.fields, &response.rows)?;
        let mut page_token = response.page_token.clone();
        while let Some(token) = page_token {
            let page = self.get_query_results(&job, Some(&token)).await?;
            rows.extend(convert_rows(&schema.fields, &page.rows)?);
            page_token = page.page_token;
        }
        Ok(rows)
    }

    async fn insert_rows(&self, table: &TableRef, rows: &[Value]) -> Result<()> {
        let url = format!(
            "{}/bigquery/v2/projects/{}/datasets/{}/tables/{}/insertAll",
            self.config.api_endpoint.trim_end_matches('/'),
            table.project_id,
            table.dataset_id,
            table.table_id
        );
        let request = json!({
            "rows": rows.iter().map(|row| json!({ "json": row })).collect::<Vec<_>>(),
        });

        let body = self.send(self.http.post(url).json(&request)).await?;
        let response: InsertAllResponse = serde_json::from_value(body)?;
        if !response.insert_errors.is_empty() {
            return Err(Error::Warehouse(format!(
                "{} rows rejected: {}",
                response.insert_errors.len(),
                Value::Array(response.insert_errors)
            )));
        }
        Ok(())
    }
}

/// Request body for `jobs.query` with named STRING parameters
pub fn query_request_body(query: &str, parameters: &[QueryParameter], timeout_ms: u64) -> Value {
    json!({
        "query": query,
        "useLegacySql": false,
        "parameterMode": "NAMED",
        "timeoutMs": timeout_ms,
        "queryParameters": parameters
            .iter()
            .map(|p| json!({
                "name": p.name,
                "parameterType": { "type": "STRING" },
                "parameterValue": { "value": p.value },
            }))
            .collect::<Vec<_>>(),
    })
}

/// Convert API rows into ordered value lists using the result schema
pub fn convert_rows(fields: &[FieldSchema], rows: &[RowData]) -> Result<Vec<Vec<Value>>> {
    rows.iter().map(|row| convert_row(fields, row)).collect()
}

fn convert_row(fields: &[FieldSchema], row: &RowData) -> Result<Vec<Value>> {
    if fields.len() != row.f.len() {
        return Err(Error::Warehouse(format!(
            "Row has {} cells but the schema has {} fields",
            row.f.len(),
            fields.len()
        )));
    }
    fields
        .iter()
        .zip(&row.f)
        .map(|(field, cell)| convert_cell(field, &cell.v))
        .collect()
}

fn convert_cell(field: &FieldSchema, value: &Value) -> Result<Value> {
    if field.mode.as_deref() == Some("REPEATED") {
        let items = match value {
            Value::Array(items) => items,
            Value::Null => return Ok(Value::Array(Vec::new())),
            other => {
                return Err(Error::Warehouse(format!(
                    "Expected a list for repeated field '{}', got {}",
                    field.name, other
                )))
            }
        };
        return items
            .iter()
            .map(|item| convert_scalar(field, &item["v"]))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array);
    }
    convert_scalar(field, value)
}

fn convert_scalar(field: &FieldSchema, value: &Value) -> Result<Value> {
    if value.is_null() {
        return Ok(Value::Null);
    }

    if matches!(field.field_type.as_str(), "RECORD" | "STRUCT") {
        let cells = value["f"].as_array().ok_or_else(|| {
            Error::Warehouse(format!("Expected a record for field '{}'", field.name))
        })?;
        let mut object = Map::new();
        for (sub_field, cell) in field.fields.iter().zip(cells) {
            object.insert(sub_field.name.clone(), convert_cell(sub_field, &cell["v"])?);
        }
        return Ok(Value::Object(object));
    }

    let text = match value.as_str() {
        Some(text) => text,
        None => return Ok(value.clone()),
    };

    let invalid = || {
        Error::Warehouse(format!(
            "Invalid {} value '{}' for field '{}'",
            field.field_type, text, field.name
        ))
    };

    match field.field_type.as_str() {
        "INTEGER" | "INT64" => text
            .parse::<i64>()
            .map(|n| Value::Number(n.into()))
            .map_err(|_| invalid()),
        "FLOAT" | "FLOAT64" => {
            let n = text.parse::<f64>().map_err(|_| invalid())?;
            // NaN and infinities have no JSON number form
            Ok(Number::from_f64(n)
                .map(Value::Number)
                .unwrap_or_else(|| Value::String(text.to_string())))
        }
        "NUMERIC" | "BIGNUMERIC" => convert_decimal(text).ok_or_else(invalid),
        "BOOLEAN" | "BOOL" => match text {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(invalid()),
        },
        "TIMESTAMP" => {
            let seconds = text.parse::<f64>().map_err(|_| invalid())?;
            let micros = (seconds * 1_000_000.0).round() as i64;
            chrono::DateTime::from_timestamp_micros(micros)
                .map(|ts| Value::String(ts.to_rfc3339()))
                .ok_or_else(invalid)
        }
        _ => Ok(Value::String(text.to_string())),
    }
}

/// Convert an exact decimal without losing digits
///
/// Values a JSON number holds exactly become numbers, anything else stays the
/// decimal text BigQuery returned.
fn convert_decimal(text: &str) -> Option<Value> {
    if let Ok(n) = text.parse::<i64>() {
        return Some(Value::Number(n.into()));
    }
    let n = text.parse::<f64>().ok()?;
    let exact = Number::from_f64(n)
        .filter(|_| normalize_decimal(text).as_deref() == Some(n.to_string().as_str()));
    Some(match exact {
        Some(number) => Value::Number(number),
        None => Value::String(text.to_string()),
    })
}

/// Canonical form of a plain decimal: no `+`, no redundant zeros
fn normalize_decimal(text: &str) -> Option<String> {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));
    if (int_part.is_empty() && frac_part.is_empty())
        || !int_part.bytes().chain(frac_part.bytes()).all(|b| b.is_ascii_digit())
    {
        return None;
    }

    let int_part = match int_part.trim_start_matches('0') {
        "" => "0",
        trimmed => trimmed,
    };
    let frac_part = frac_part.trim_end_matches('0');
    let mut normalized = String::new();
    if negative && (int_part != "0" || !frac_part.is_empty()) {
        normalized.push('-');
    }
    normalized.push_str(int_part);
    if !frac_part.is_empty() {
        normalized.push('.');
        normalized.push_str(frac_part);
    }
    Some(normalized)
}

/// Ask gcloud for an access token using application default credentials
pub async fn fetch_access_token() -> Result<String> {
    let output = tokio::process::Command::new("gcloud")
        .args(["auth", "application-default", "print-access-token"])
        .output()
        .await
        .map_err(|e| Error::Auth(format!("failed to run gcloud: {}", e)))?;

    if !output.status.success() {
        return Err(Error::Auth(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ));
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if token.is_empty() {
        return Err(Error::Auth("gcloud returned an empty token".to_string()));
    }
    Ok(token)
}
