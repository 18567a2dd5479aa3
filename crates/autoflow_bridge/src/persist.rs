use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use autoflow_core::SettingsPayload;
use autoflow_logging::{flow_info, flow_warn};
use serde_json::{Map, Value};
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::types::StoredSettings;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("settings directory missing or not writable: {0}")]
    Dir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("settings encoding: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Ensure `dir` exists and is a directory; create it if missing.
pub fn ensure_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::Dir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::Dir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::Dir(e.to_string()))?;
    }
    Ok(())
}

/// Atomically write content to `{dir}/{filename}` by writing a temp file then renaming.
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn write(&self, filename: &str, content: &str) -> Result<PathBuf, PersistError> {
        ensure_dir(&self.dir)?;

        let target = self.dir.join(filename);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }
}

/// Key-value blob store for the settings payload.
pub trait SettingsStore: Send + Sync {
    /// Raw stored settings; empty when nothing was saved yet.
    fn load(&self) -> Result<StoredSettings, PersistError>;
    fn save(&self, settings: &SettingsPayload) -> Result<(), PersistError>;
    fn save_queue_collapsed(&self, collapsed: bool) -> Result<(), PersistError>;
}

/// Settings kept as one pretty-printed JSON object. Each save rewrites only
/// its own top-level keys, so other keys survive.
#[derive(Debug, Clone)]
pub struct JsonFileSettingsStore {
    path: PathBuf,
}

impl JsonFileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn split_path(&self) -> (PathBuf, String) {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let filename = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "autoflow_settings.json".to_string());
        (dir, filename)
    }

    /// The stored top-level object; missing or unreadable content yields an empty one.
    fn read_document(&self) -> Result<Map<String, Value>, PersistError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                flow_info!("No settings at {:?}; starting from defaults", self.path);
                return Ok(Map::new());
            }
            Err(err) => return Err(err.into()),
        };

        match serde_json::from_str(&content) {
            Ok(Value::Object(document)) => Ok(document),
            Ok(_) => {
                flow_warn!("Settings in {:?} are not an object; ignoring them", self.path);
                Ok(Map::new())
            }
            Err(err) => {
                // A corrupt blob is treated like a missing one; migration supplies defaults.
                flow_warn!("Failed to parse settings from {:?}: {}", self.path, err);
                Ok(Map::new())
            }
        }
    }

    fn write_document(&self, document: Map<String, Value>) -> Result<(), PersistError> {
        let content = serde_json::to_string_pretty(&Value::Object(document))?;
        let (dir, filename) = self.split_path();
        AtomicFileWriter::new(dir).write(&filename, &content)?;
        Ok(())
    }
}

impl SettingsStore for JsonFileSettingsStore {
    fn load(&self) -> Result<StoredSettings, PersistError> {
        let mut document = self.read_document()?;
        let queue_collapsed = match document.remove("queueCollapsed") {
            Some(Value::Bool(collapsed)) => Some(collapsed),
            Some(other) => {
                flow_warn!("Ignoring non-boolean queueCollapsed: {}", other);
                None
            }
            None => None,
        };
        Ok(StoredSettings {
            config: document.remove("config"),
            display: document.remove("display"),
            queue_collapsed,
        })
    }

    fn save(&self, settings: &SettingsPayload) -> Result<(), PersistError> {
        let mut document = self.read_document()?;
        if let Value::Object(payload) = serde_json::to_value(settings)? {
            document.extend(payload);
        }
        self.write_document(document)
    }

    fn save_queue_collapsed(&self, collapsed: bool) -> Result<(), PersistError> {
        let mut document = self.read_document()?;
        document.insert("queueCollapsed".to_string(), Value::Bool(collapsed));
        self.write_document(document)
    }
}
