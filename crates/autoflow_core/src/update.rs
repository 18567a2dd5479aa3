use autoflow_logging::{flow_debug, flow_info, flow_warn};

use crate::state::Notice;
use crate::{AppState, BackendCall, Effect, Msg, QueueEntry};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::SettingsLoaded {
            config,
            display,
            queue_collapsed,
        } => {
            state.load_settings(config.as_ref(), display.as_ref(), queue_collapsed);
            Vec::new()
        }
        Msg::CategoryAdded(name) => {
            if state.config_mut().add_category(&name) {
                state.settings_changed();
            }
            Vec::new()
        }
        Msg::CategoryRemoved(index) => {
            if state.config_mut().remove_category(index).is_some() {
                state.settings_changed();
            }
            Vec::new()
        }
        Msg::CategoryMoved { from, to } => {
            if state.config_mut().reorder_category(from, to) {
                state.settings_changed();
            }
            Vec::new()
        }
        Msg::KeywordAdded { category, value } => {
            if state.config_mut().add_keyword(&category, &value) {
                state.settings_changed();
            }
            Vec::new()
        }
        Msg::KeywordRemoved { category, index } => {
            if state.config_mut().remove_keyword(&category, index).is_some() {
                state.settings_changed();
            }
            Vec::new()
        }
        Msg::PauseToggled { category, enabled } => {
            if state.config_mut().set_category_pause(&category, enabled) {
                state.settings_changed();
            }
            Vec::new()
        }
        Msg::ConfigReplaced(config) => {
            state.replace_config(*config);
            Vec::new()
        }
        Msg::OutputDirSelected { path, display } => {
            let config = state.config_mut();
            config.output_dir = Some(path);
            config.output_dir_display = Some(display);
            state.settings_changed();
            Vec::new()
        }
        Msg::OutputDirCleared => {
            let config = state.config_mut();
            if config.output_dir.take().is_some() | config.output_dir_display.take().is_some() {
                state.settings_changed();
            }
            Vec::new()
        }
        Msg::DisplayChanged(display) => {
            state.set_display(display);
            Vec::new()
        }
        Msg::FilesSelected(entries) => {
            let stats = state.config_mut().input_files.enqueue_many(entries);
            flow_info!("Queued {} of {} selected files", stats.added, stats.offered());
            if stats.added > 0 {
                state.settings_changed();
            }
            state.set_last_enqueue(stats);
            state.set_notice(Notice::info(format!(
                "已將 {} 個項目加入工作佇列 (共 {} 個)",
                stats.added,
                stats.offered()
            )));
            Vec::new()
        }
        Msg::DirectorySelected { path, name } => {
            let entry = QueueEntry::folder(path, &name);
            let stats = state.config_mut().input_files.enqueue_many([entry]);
            if stats.added > 0 {
                state.settings_changed();
                state.set_notice(Notice::info(format!("已加入資料夾: {name}")));
            } else {
                state.set_notice(Notice::info(format!("資料夾已在佇列中: {name}")));
            }
            state.set_last_enqueue(stats);
            Vec::new()
        }
        Msg::QueueItemRemoved { index, confirmed } => {
            if index == 0 && state.is_running() && !confirmed {
                // The backend already holds its own copy of the head entry.
                flow_debug!("Refusing to remove the entry being processed without confirmation");
            } else if state.config_mut().input_files.remove(index).is_some() {
                state.settings_changed();
            }
            Vec::new()
        }
        Msg::QueueItemMoved { from, to } => {
            if state.config_mut().input_files.reorder(from, to) {
                state.settings_changed();
            }
            Vec::new()
        }
        Msg::QueueCleared => {
            if state.config_mut().input_files.clear() > 0 {
                state.settings_changed();
            }
            Vec::new()
        }
        Msg::QueueCollapseToggled(collapsed) => {
            if state.set_queue_collapsed(collapsed) {
                vec![Effect::SaveQueueCollapsed(collapsed)]
            } else {
                Vec::new()
            }
        }
        Msg::StartClicked => match state.begin_start() {
            Some(config) => {
                let mut effects = Vec::with_capacity(2);
                if let Some(payload) = state.flush_settings() {
                    effects.push(Effect::SaveSettings(Box::new(payload)));
                }
                flow_info!("Starting run with {} queued entries", config.input_files.len());
                effects.push(Effect::StartTask {
                    config: Box::new(config),
                });
                effects
            }
            None => {
                flow_debug!("Start ignored: queue empty, run active or start pending");
                Vec::new()
            }
        },
        Msg::StopClicked => {
            if state.is_running() {
                vec![Effect::StopTask]
            } else {
                Vec::new()
            }
        }
        Msg::StartAccepted { message } => {
            state.accept_start();
            if let Some(message) = message {
                state.set_notice(Notice::info(message));
            }
            Vec::new()
        }
        Msg::BackendFailed { call, message } => {
            flow_warn!("Backend call `{}` failed: {}", call, message);
            if call == BackendCall::StartTask {
                state.abort_start();
            }
            state.set_notice(Notice::error(format!("{call} 失敗: {message}")));
            Vec::new()
        }
        Msg::StatusPolled { status, now_ms } => {
            state.apply_status(status, now_ms);
            Vec::new()
        }
        Msg::AppStatePolled {
            version,
            history,
            stats,
        } => {
            state.apply_app_state(version, history, stats);
            Vec::new()
        }
        Msg::ToastDismissed(id) => {
            state.dismiss_toast(id);
            Vec::new()
        }
        Msg::HistoryClearClicked => vec![Effect::ClearHistory],
        Msg::HistoryCleared { message } => {
            state.clear_history();
            state.set_notice(Notice::info(
                message.unwrap_or_else(|| "歷史紀錄與統計數據已清除".to_string()),
            ));
            Vec::new()
        }
        Msg::HistoryExportClicked => vec![Effect::ExportHistory],
        Msg::HistoryExported { path } => {
            flow_info!("History exported to {}", path);
            state.set_notice(Notice::info(format!("日誌已匯出至: {path}")));
            Vec::new()
        }
        Msg::ExcelConvertClicked {
            start_date,
            end_date,
        } => vec![Effect::RunExcelConvert {
            start_date,
            end_date,
        }],
        Msg::ExcelConvertFinished(summary) => {
            flow_info!(
                "Excel conversion produced {} files",
                summary.output_files.len()
            );
            state.set_notice(Notice::info(summary.message));
            Vec::new()
        }
        Msg::ClearDoneLogClicked(index) => match state.config().input_files.get(index) {
            Some(entry) => vec![Effect::ClearDoneLog {
                path: entry.path.clone(),
            }],
            None => Vec::new(),
        },
        Msg::Tick { now_ms } => match state.tick(now_ms) {
            Some(payload) => vec![Effect::SaveSettings(Box::new(payload))],
            None => Vec::new(),
        },
        Msg::CloseRequested => match state.flush_settings() {
            Some(payload) => vec![Effect::SaveSettings(Box::new(payload))],
            None => Vec::new(),
        },
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
