use crate::{AutomationConfig, SettingsPayload};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Hand the whole config, queue included, to the backend.
    StartTask { config: Box<AutomationConfig> },
    StopTask,
    SaveSettings(Box<SettingsPayload>),
    RunExcelConvert {
        start_date: Option<String>,
        end_date: Option<String>,
    },
    ClearDoneLog { path: String },
    ClearHistory,
    ExportHistory,
    SaveQueueCollapsed(bool),
}
