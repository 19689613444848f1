//! Bulk upload client for the remote roster API
//!
//! Posts a previously produced JSON array as `{"data": [...]}` to
//! `<api_base>/api/bulk-import/from-json` and summarises the response.

use reqwest::{Client, ClientBuilder};
use serde::Deserialize;
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

use super::config::UploadConfig;

/// Path of the bulk import endpoint below the API base
pub const BULK_IMPORT_PATH: &str = "/api/bulk-import/from-json";

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not a JSON array of records: {reason}")]
    InvalidInput { path: PathBuf, reason: String },

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Upload request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("Upload rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Reads the records to upload; the file must hold a JSON array
pub async fn load_records(path: &Path) -> Result<Vec<Value>, UploadError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| UploadError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    match serde_json::from_str::<Value>(&text) {
        Ok(Value::Array(records)) => Ok(records),
        Ok(other) => Err(UploadError::InvalidInput {
            path: path.to_path_buf(),
            reason: format!("top-level value is {}", json_kind(&other)),
        }),
        Err(e) => Err(UploadError::InvalidInput {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// One item the API could not import
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedItem {
    pub name: Option<String>,
    pub error: Option<String>,
}

/// Summary of a successful (2xx) upload response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadReport {
    pub message: Option<String>,
    pub total: Option<u64>,
    pub succeeded: usize,
    pub failed: usize,
    pub failed_items: Vec<FailedItem>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponseBody {
    message: Option<String>,
    results: Option<ResponseResults>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponseResults {
    total: Option<u64>,
    #[serde(default)]
    success: Value,
    #[serde(default)]
    failed: Value,
}

/// `success`/`failed` arrive either as item arrays or as plain counts
fn count_of(value: &Value) -> usize {
    match value {
        Value::Array(items) => items.len(),
        Value::Number(n) => n.as_u64().and_then(|n| usize::try_from(n).ok()).unwrap_or(0),
        _ => 0,
    }
}

impl UploadReport {
    /// Interprets a response body; unknown shapes give an empty report
    #[must_use]
    pub fn from_body(body: &str) -> Self {
        let parsed: ResponseBody = serde_json::from_str(body).unwrap_or_default();
        let Some(results) = parsed.results else {
            return Self {
                message: parsed.message,
                ..Self::default()
            };
        };

        let failed_items = results
            .failed
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .map(|item| FailedItem {
                        name: item.get("name").and_then(Value::as_str).map(str::to_string),
                        error: item.get("error").and_then(Value::as_str).map(str::to_string),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            message: parsed.message,
            total: results.total,
            succeeded: count_of(&results.success),
            failed: count_of(&results.failed),
            failed_items,
        }
    }
}

/// Client for the bulk import endpoint
pub struct BulkUploadClient {
    client: Client,
    endpoint: String,
}

impl BulkUploadClient {
    pub fn with_config(config: &UploadConfig, user_agent: &str) -> Result<Self, UploadError> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(user_agent)
            .build()
            .map_err(UploadError::ClientBuild)?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}{}",
                config.api_base_url.trim_end_matches('/'),
                BULK_IMPORT_PATH
            ),
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Posts every record in one request
    pub async fn upload(&self, records: &[Value]) -> Result<UploadReport, UploadError> {
        info!("📤 Sending {} records to {}", records.len(), self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "data": records }))
            .send()
            .await
            .map_err(UploadError::Request)?;

        let status = response.status();
        let body = response.text().await.map_err(UploadError::Request)?;
        debug!("Upload response status {}", status);

        if !status.is_success() {
            return Err(UploadError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        Ok(UploadReport::from_body(&body))
    }
}
