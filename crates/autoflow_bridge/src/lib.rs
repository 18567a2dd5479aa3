//! AutoFlow bridge: the async seam between the pure core and the automation
//! backend, plus local settings persistence.
mod backend;
mod handle;
mod persist;
mod poller;
mod runner;
mod types;

pub use backend::{AutomationBackend, OfflineBackend};
pub use handle::{BridgeHandle, BridgeOptions, DEFAULT_TICK_INTERVAL};
pub use persist::{ensure_dir, AtomicFileWriter, JsonFileSettingsStore, PersistError, SettingsStore};
pub use poller::{now_ms, StatusPoller, DEFAULT_POLL_INTERVAL};
pub use runner::EffectRunner;
pub use types::{
    AppStateSnapshot, BridgeError, CallReply, CallStatus, ExcelConvertReply, HistoryExportReply,
    SelectedDirectory, SelectedFile, SelectedFiles, StoredSettings,
};
