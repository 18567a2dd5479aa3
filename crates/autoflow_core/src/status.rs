//! Read-only data polled from the automation backend.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    #[default]
    Idle,
    Running,
    /// Reported briefly when a run crashed, before the backend settles on idle.
    Error,
    #[serde(other)]
    Unknown,
}

/// One entry of the backend's append-only error log.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaskError {
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub msg: String,
    /// Backend-defined timestamp; shown as-is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaskStatus {
    #[serde(default)]
    pub processed: u64,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub status: RunStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_files: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub errors: Vec<TaskError>,
}

impl TaskStatus {
    pub fn is_running(&self) -> bool {
        self.status == RunStatus::Running
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryEntry {
    pub id: String,
    pub name: String,
    pub status: String,
    pub duration: String,
    pub time: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    pub total_conversions: u64,
    pub total_tasks: u64,
    pub success_rate: String,
    pub time_saved: String,
}

/// Result of an Excel-to-text conversion run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExcelConvertSummary {
    pub output_files: Vec<String>,
    pub output_folder: Option<String>,
    pub message: String,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
