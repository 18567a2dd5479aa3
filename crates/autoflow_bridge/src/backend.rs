use async_trait::async_trait;
use autoflow_core::{AutomationConfig, BackendCall, SettingsPayload, TaskStatus};
use autoflow_logging::flow_debug;

use crate::persist::SettingsStore;
use crate::types::{
    AppStateSnapshot, BridgeError, CallReply, CallStatus, ExcelConvertReply, HistoryExportReply,
    SelectedDirectory, SelectedFiles,
};

/// The out-of-process automation service. Calls may resolve late or fail;
/// none of them touch local state directly.
#[async_trait]
pub trait AutomationBackend: Send + Sync {
    async fn start_task(&self, config: &AutomationConfig) -> Result<CallReply, BridgeError>;
    async fn stop_task(&self) -> Result<(), BridgeError>;
    async fn get_task_status(&self) -> Result<TaskStatus, BridgeError>;
    async fn get_app_state(&self) -> Result<AppStateSnapshot, BridgeError>;
    async fn save_settings(&self, settings: &SettingsPayload) -> Result<(), BridgeError>;
    async fn select_files(&self) -> Result<SelectedFiles, BridgeError>;
    async fn select_directory(&self) -> Result<SelectedDirectory, BridgeError>;
    async fn clear_done_log(&self, path: &str) -> Result<(), BridgeError>;
    async fn run_excel_convert(
        &self,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<ExcelConvertReply, BridgeError>;
    /// Drop the run history and reset the statistics.
    async fn clear_history(&self) -> Result<CallReply, BridgeError>;
    /// Write the run history to a file the user picks.
    async fn export_history(&self) -> Result<HistoryExportReply, BridgeError>;
    async fn set_queue_collapsed(&self, collapsed: bool) -> Result<(), BridgeError>;
}

/// Backend used when no automation service is attached: settings go to a
/// local store, the task is always idle with no history, and every action is rejected.
pub struct OfflineBackend<S> {
    store: S,
    version: String,
}

impl<S: SettingsStore> OfflineBackend<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            version: format!("v{}", env!("CARGO_PKG_VERSION")),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn unavailable(call: BackendCall) -> BridgeError {
        flow_debug!("Offline backend rejecting {}", call);
        BridgeError::rejected(call, "no automation backend attached")
    }
}

#[async_trait]
impl<S: SettingsStore> AutomationBackend for OfflineBackend<S> {
    async fn start_task(&self, _config: &AutomationConfig) -> Result<CallReply, BridgeError> {
        Err(Self::unavailable(BackendCall::StartTask))
    }

    async fn stop_task(&self) -> Result<(), BridgeError> {
        Err(Self::unavailable(BackendCall::StopTask))
    }

    async fn get_task_status(&self) -> Result<TaskStatus, BridgeError> {
        Ok(TaskStatus::default())
    }

    async fn get_app_state(&self) -> Result<AppStateSnapshot, BridgeError> {
        let mut settings = self.store.load()?;
        Ok(AppStateSnapshot {
            version: Some(self.version.clone()),
            queue_collapsed: settings.queue_collapsed.take(),
            settings,
            ..AppStateSnapshot::default()
        })
    }

    async fn save_settings(&self, settings: &SettingsPayload) -> Result<(), BridgeError> {
        Ok(self.store.save(settings)?)
    }

    async fn select_files(&self) -> Result<SelectedFiles, BridgeError> {
        Err(Self::unavailable(BackendCall::SelectFiles))
    }

    async fn select_directory(&self) -> Result<SelectedDirectory, BridgeError> {
        Err(Self::unavailable(BackendCall::SelectDirectory))
    }

    async fn clear_done_log(&self, _path: &str) -> Result<(), BridgeError> {
        Err(Self::unavailable(BackendCall::ClearDoneLog))
    }

    async fn run_excel_convert(
        &self,
        _start_date: Option<&str>,
        _end_date: Option<&str>,
    ) -> Result<ExcelConvertReply, BridgeError> {
        Err(Self::unavailable(BackendCall::ExcelConvert))
    }

    async fn clear_history(&self) -> Result<CallReply, BridgeError> {
        Ok(CallReply::success("歷史紀錄與統計數據已清除"))
    }

    async fn export_history(&self) -> Result<HistoryExportReply, BridgeError> {
        Ok(HistoryExportReply {
            status: CallStatus::Error,
            path: None,
            message: Some("沒有可導出的紀錄".to_string()),
        })
    }

    async fn set_queue_collapsed(&self, collapsed: bool) -> Result<(), BridgeError> {
        Ok(self.store.save_queue_collapsed(collapsed)?)
    }
}
