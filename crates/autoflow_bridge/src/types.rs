use std::fmt;

use autoflow_core::{BackendCall, ExcelConvertSummary, HistoryEntry, QueueEntry, Stats};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::persist::PersistError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallStatus {
    Success,
    Error,
    /// The user closed a dialog without choosing anything.
    Canceled,
    #[default]
    #[serde(other)]
    Unknown,
}

impl fmt::Display for CallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallStatus::Success => write!(f, "success"),
            CallStatus::Error => write!(f, "error"),
            CallStatus::Canceled => write!(f, "canceled"),
            CallStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// Generic `{status, message}` reply, e.g. from `startTask`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CallReply {
    #[serde(default)]
    pub status: CallStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CallReply {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: CallStatus::Success,
            message: Some(message.into()),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: CallStatus::Error,
            message: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedFile {
    pub path: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "urlCount")]
    pub url_count: Option<u64>,
}

impl From<SelectedFile> for QueueEntry {
    fn from(file: SelectedFile) -> Self {
        let name = if file.name.is_empty() {
            file.path.clone()
        } else {
            file.name
        };
        QueueEntry::file(file.path, name, file.url_count)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectedFiles {
    #[serde(default)]
    pub status: CallStatus,
    #[serde(default)]
    pub files: Vec<SelectedFile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectedDirectory {
    #[serde(default)]
    pub status: CallStatus,
    #[serde(default)]
    pub path: Option<String>,
    /// Base name for display. Some dialogs report it as `name`.
    #[serde(default, alias = "name")]
    pub dirname: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExcelConvertReply {
    #[serde(default)]
    pub status: CallStatus,
    #[serde(default)]
    pub output_files: Vec<String>,
    #[serde(default)]
    pub output_folder: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl From<ExcelConvertReply> for ExcelConvertSummary {
    fn from(reply: ExcelConvertReply) -> Self {
        ExcelConvertSummary {
            output_files: reply.output_files,
            output_folder: reply.output_folder,
            message: reply.message.unwrap_or_default(),
        }
    }
}

/// Reply of `exportHistory`: where the CSV went, or why nothing was written.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HistoryExportReply {
    #[serde(default)]
    pub status: CallStatus,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Raw persisted settings, not yet migrated.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StoredSettings {
    #[serde(default)]
    pub config: Option<Value>,
    #[serde(default)]
    pub display: Option<Value>,
    #[serde(default, rename = "queueCollapsed", skip_serializing_if = "Option::is_none")]
    pub queue_collapsed: Option<bool>,
}

/// Reply of `getAppState`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AppStateSnapshot {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub settings: StoredSettings,
    #[serde(default, rename = "queueCollapsed")]
    pub queue_collapsed: Option<bool>,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    #[serde(default)]
    pub stats: Stats,
}

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("backend unreachable: {0}")]
    Transport(String),
    #[error("{call} rejected: {message}")]
    Rejected { call: BackendCall, message: String },
    #[error("{call} canceled")]
    Canceled { call: BackendCall },
    #[error("malformed reply: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("settings store: {0}")]
    Persist(#[from] PersistError),
}

impl BridgeError {
    pub fn rejected(call: BackendCall, message: impl Into<String>) -> Self {
        BridgeError::Rejected {
            call,
            message: message.into(),
        }
    }

    pub fn is_canceled(&self) -> bool {
        matches!(self, BridgeError::Canceled { .. })
    }
}

/// Map a `{status}` reply onto success, cancellation or rejection.
pub(crate) fn check_status(
    call: BackendCall,
    status: CallStatus,
    message: Option<&str>,
) -> Result<(), BridgeError> {
    match status {
        CallStatus::Success => Ok(()),
        CallStatus::Canceled => Err(BridgeError::Canceled { call }),
        CallStatus::Error | CallStatus::Unknown => Err(BridgeError::rejected(
            call,
            message.map_or_else(|| format!("status {status}"), ToOwned::to_owned),
        )),
    }
}
