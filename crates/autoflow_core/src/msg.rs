use std::fmt;

use serde_json::Value;

use crate::{
    AutomationConfig, DisplaySettings, ExcelConvertSummary, HistoryEntry, QueueEntry, Stats,
    TaskStatus,
};

/// Backend calls whose failure is reported back into the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendCall {
    StartTask,
    StopTask,
    SaveSettings,
    SelectFiles,
    SelectDirectory,
    ClearDoneLog,
    ExcelConvert,
    PollStatus,
    PollAppState,
    ClearHistory,
    ExportHistory,
    SetQueueCollapsed,
}

impl fmt::Display for BackendCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BackendCall::StartTask => "start task",
            BackendCall::StopTask => "stop task",
            BackendCall::SaveSettings => "save settings",
            BackendCall::SelectFiles => "select files",
            BackendCall::SelectDirectory => "select directory",
            BackendCall::ClearDoneLog => "clear done log",
            BackendCall::ExcelConvert => "excel convert",
            BackendCall::PollStatus => "poll status",
            BackendCall::PollAppState => "poll app state",
            BackendCall::ClearHistory => "clear history",
            BackendCall::ExportHistory => "export history",
            BackendCall::SetQueueCollapsed => "set queue collapsed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Persisted settings arrived (raw, possibly from an older schema).
    SettingsLoaded {
        config: Option<Value>,
        display: Option<Value>,
        /// Whether the queue panel was left collapsed; kept by the backend, not in the config.
        queue_collapsed: Option<bool>,
    },
    CategoryAdded(String),
    CategoryRemoved(usize),
    CategoryMoved { from: usize, to: usize },
    KeywordAdded { category: String, value: String },
    KeywordRemoved { category: String, index: usize },
    PauseToggled { category: String, enabled: bool },
    /// The configuration dialog was saved with a whole new config.
    ConfigReplaced(Box<AutomationConfig>),
    OutputDirSelected { path: String, display: String },
    OutputDirCleared,
    DisplayChanged(DisplaySettings),
    /// Files picked in the file dialog, with their URL counts.
    FilesSelected(Vec<QueueEntry>),
    /// A folder picked in the folder dialog; the backend scans it for URL lists.
    DirectorySelected { path: String, name: String },
    /// Remove a queued entry. Removing the entry being processed needs `confirmed`.
    QueueItemRemoved { index: usize, confirmed: bool },
    QueueItemMoved { from: usize, to: usize },
    QueueCleared,
    QueueCollapseToggled(bool),
    StartClicked,
    StopClicked,
    /// Backend accepted the start request.
    StartAccepted { message: Option<String> },
    BackendFailed { call: BackendCall, message: String },
    StatusPolled { status: TaskStatus, now_ms: u64 },
    AppStatePolled {
        version: Option<String>,
        history: Vec<HistoryEntry>,
        stats: Stats,
    },
    ToastDismissed(u64),
    /// Wipe the backend's run history and statistics (already confirmed by the user).
    HistoryClearClicked,
    HistoryCleared { message: Option<String> },
    HistoryExportClicked,
    HistoryExported { path: String },
    ExcelConvertClicked {
        start_date: Option<String>,
        end_date: Option<String>,
    },
    ExcelConvertFinished(ExcelConvertSummary),
    /// Forget which URLs of the queued entry at this index were already done.
    ClearDoneLogClicked(usize),
    /// Timer tick carrying the wall clock in epoch milliseconds.
    Tick { now_ms: u64 },
    /// The window or session is closing; flush pending saves.
    CloseRequested,
    /// Fallback for placeholder wiring.
    NoOp,
}
