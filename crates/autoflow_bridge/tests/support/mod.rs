#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, Once};
use std::time::Duration;

use async_trait::async_trait;
use autoflow_bridge::{
    AppStateSnapshot, AutomationBackend, BridgeError, CallReply, ExcelConvertReply,
    HistoryExportReply, SelectedDirectory, SelectedFiles,
};
use autoflow_core::{AutomationConfig, SettingsPayload, TaskStatus};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(autoflow_logging::initialize_for_tests);
}

/// Scripted backend recording every call it receives.
#[derive(Default)]
pub struct FakeBackend {
    pub calls: Mutex<Vec<String>>,
    pub start_reply: Option<CallReply>,
    pub status: TaskStatus,
    pub snapshot: AppStateSnapshot,
    pub files: SelectedFiles,
    pub directory: SelectedDirectory,
    pub excel: ExcelConvertReply,
    pub export: HistoryExportReply,
    pub unreachable: bool,
    pub saved: Mutex<Vec<SettingsPayload>>,
    /// The first `save_settings` call is held back this long.
    pub first_save_delay: Option<Duration>,
    pub first_save_done: AtomicBool,
}

impl FakeBackend {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn saved_font_sizes(&self) -> Vec<u8> {
        self.saved
            .lock()
            .unwrap()
            .iter()
            .map(|payload| payload.display.font_size)
            .collect()
    }

    fn record(&self, call: &str) -> Result<(), BridgeError> {
        self.calls.lock().unwrap().push(call.to_string());
        if self.unreachable {
            Err(BridgeError::Transport("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl AutomationBackend for FakeBackend {
    async fn start_task(&self, config: &AutomationConfig) -> Result<CallReply, BridgeError> {
        self.record(&format!("start_task:{}", config.input_files.len()))?;
        Ok(self
            .start_reply
            .clone()
            .unwrap_or_else(|| CallReply::success("任務已開始")))
    }

    async fn stop_task(&self) -> Result<(), BridgeError> {
        self.record("stop_task")
    }

    async fn get_task_status(&self) -> Result<TaskStatus, BridgeError> {
        self.record("get_task_status")?;
        Ok(self.status.clone())
    }

    async fn get_app_state(&self) -> Result<AppStateSnapshot, BridgeError> {
        self.record("get_app_state")?;
        Ok(self.snapshot.clone())
    }

    async fn save_settings(&self, settings: &SettingsPayload) -> Result<(), BridgeError> {
        self.record("save_settings")?;
        if let Some(delay) = self.first_save_delay {
            if !self.first_save_done.swap(true, Ordering::SeqCst) {
                tokio::time::sleep(delay).await;
            }
        }
        self.saved.lock().unwrap().push(settings.clone());
        Ok(())
    }

    async fn select_files(&self) -> Result<SelectedFiles, BridgeError> {
        self.record("select_files")?;
        Ok(self.files.clone())
    }

    async fn select_directory(&self) -> Result<SelectedDirectory, BridgeError> {
        self.record("select_directory")?;
        Ok(self.directory.clone())
    }

    async fn clear_done_log(&self, path: &str) -> Result<(), BridgeError> {
        self.record(&format!("clear_done_log:{path}"))
    }

    async fn run_excel_convert(
        &self,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<ExcelConvertReply, BridgeError> {
        self.record(&format!(
            "run_excel_convert:{}:{}",
            start_date.unwrap_or("-"),
            end_date.unwrap_or("-")
        ))?;
        Ok(self.excel.clone())
    }

    async fn clear_history(&self) -> Result<CallReply, BridgeError> {
        self.record("clear_history")?;
        Ok(CallReply::success("歷史紀錄與統計數據已清除"))
    }

    async fn export_history(&self) -> Result<HistoryExportReply, BridgeError> {
        self.record("export_history")?;
        Ok(self.export.clone())
    }

    async fn set_queue_collapsed(&self, collapsed: bool) -> Result<(), BridgeError> {
        self.record(&format!("set_queue_collapsed:{collapsed}"))
    }
}
