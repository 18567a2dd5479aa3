use std::sync::Arc;

use autoflow_core::{BackendCall, Effect, Msg, QueueEntry};
use autoflow_logging::{flow_debug, flow_info, flow_warn};

use crate::backend::AutomationBackend;
use crate::types::{check_status, BridgeError};

/// Executes core effects against a backend and turns outcomes into messages.
///
/// Each effect yields at most one message and failures are never retried.
#[derive(Clone)]
pub struct EffectRunner {
    backend: Arc<dyn AutomationBackend>,
}

impl EffectRunner {
    pub fn new(backend: Arc<dyn AutomationBackend>) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &Arc<dyn AutomationBackend> {
        &self.backend
    }

    pub async fn execute(&self, effect: Effect) -> Option<Msg> {
        match effect {
            Effect::StartTask { config } => {
                let call = BackendCall::StartTask;
                let outcome = match self.backend.start_task(&config).await {
                    Ok(reply) => check_status(call, reply.status, reply.message.as_deref())
                        .map(|()| reply.message),
                    Err(err) => Err(err),
                };
                Some(match outcome {
                    Ok(message) => {
                        flow_info!("Backend accepted run of {} entries", config.input_files.len());
                        Msg::StartAccepted { message }
                    }
                    Err(err) => failed(call, &err),
                })
            }
            Effect::StopTask => self
                .backend
                .stop_task()
                .await
                .err()
                .map(|err| failed(BackendCall::StopTask, &err)),
            Effect::SaveSettings(payload) => self
                .backend
                .save_settings(&payload)
                .await
                .err()
                .map(|err| failed(BackendCall::SaveSettings, &err)),
            Effect::RunExcelConvert {
                start_date,
                end_date,
            } => {
                let call = BackendCall::ExcelConvert;
                let outcome = match self
                    .backend
                    .run_excel_convert(start_date.as_deref(), end_date.as_deref())
                    .await
                {
                    Ok(reply) => {
                        check_status(call, reply.status, reply.message.as_deref()).map(|()| reply)
                    }
                    Err(err) => Err(err),
                };
                Some(match outcome {
                    Ok(reply) => Msg::ExcelConvertFinished(reply.into()),
                    Err(err) => failed(call, &err),
                })
            }
            Effect::ClearDoneLog { path } => self
                .backend
                .clear_done_log(&path)
                .await
                .err()
                .map(|err| failed(BackendCall::ClearDoneLog, &err)),
            Effect::ClearHistory => {
                let call = BackendCall::ClearHistory;
                let outcome = match self.backend.clear_history().await {
                    Ok(reply) => check_status(call, reply.status, reply.message.as_deref())
                        .map(|()| reply.message),
                    Err(err) => Err(err),
                };
                Some(match outcome {
                    Ok(message) => Msg::HistoryCleared { message },
                    Err(err) => failed(call, &err),
                })
            }
            Effect::ExportHistory => {
                let call = BackendCall::ExportHistory;
                let outcome = match self.backend.export_history().await {
                    Ok(reply) => check_status(call, reply.status, reply.message.as_deref())
                        .and_then(|()| {
                            reply
                                .path
                                .ok_or_else(|| BridgeError::rejected(call, "no path in reply"))
                        }),
                    Err(err) => Err(err),
                };
                match outcome {
                    Ok(path) => Some(Msg::HistoryExported { path }),
                    Err(err) if err.is_canceled() => {
                        flow_debug!("{} canceled by user", call);
                        None
                    }
                    Err(err) => Some(failed(call, &err)),
                }
            }
            Effect::SaveQueueCollapsed(collapsed) => self
                .backend
                .set_queue_collapsed(collapsed)
                .await
                .err()
                .map(|err| failed(BackendCall::SetQueueCollapsed, &err)),
        }
    }

    /// Run a batch of effects in order, collecting the resulting messages.
    pub async fn execute_all(&self, effects: Vec<Effect>) -> Vec<Msg> {
        let mut msgs = Vec::new();
        for effect in effects {
            if let Some(msg) = self.execute(effect).await {
                msgs.push(msg);
            }
        }
        msgs
    }

    /// Fetch persisted settings; an unreachable store yields defaults.
    pub async fn load_settings(&self) -> Msg {
        match self.backend.get_app_state().await {
            Ok(snapshot) => Msg::SettingsLoaded {
                config: snapshot.settings.config,
                display: snapshot.settings.display,
                queue_collapsed: snapshot.queue_collapsed,
            },
            Err(err) => {
                flow_warn!("Loading settings failed, using defaults: {}", err);
                Msg::SettingsLoaded {
                    config: None,
                    display: None,
                    queue_collapsed: None,
                }
            }
        }
    }

    /// Open the file dialog. Cancelling produces `NoOp`.
    pub async fn pick_files(&self) -> Msg {
        let call = BackendCall::SelectFiles;
        let outcome = match self.backend.select_files().await {
            Ok(reply) => check_status(call, reply.status, None).map(|()| reply.files),
            Err(err) => Err(err),
        };
        match outcome {
            Ok(files) => Msg::FilesSelected(files.into_iter().map(QueueEntry::from).collect()),
            Err(err) => failed_or_canceled(call, &err),
        }
    }

    /// Open the folder dialog. Cancelling produces `NoOp`.
    pub async fn pick_directory(&self) -> Msg {
        let call = BackendCall::SelectDirectory;
        let outcome = match self.backend.select_directory().await {
            Ok(reply) => check_status(call, reply.status, None).and_then(|()| {
                reply
                    .path
                    .ok_or_else(|| BridgeError::rejected(call, "no directory in reply"))
                    .map(|path| {
                        let name = reply.dirname.unwrap_or_else(|| base_name(&path));
                        (path, name)
                    })
            }),
            Err(err) => Err(err),
        };
        match outcome {
            Ok((path, name)) => Msg::DirectorySelected { path, name },
            Err(err) => failed_or_canceled(call, &err),
        }
    }
}

fn failed(call: BackendCall, err: &BridgeError) -> Msg {
    flow_warn!("{} failed: {}", call, err);
    let message = match err {
        BridgeError::Rejected { message, .. } => message.clone(),
        other => other.to_string(),
    };
    Msg::BackendFailed { call, message }
}

fn failed_or_canceled(call: BackendCall, err: &BridgeError) -> Msg {
    if err.is_canceled() {
        flow_debug!("{} canceled by user", call);
        Msg::NoOp
    } else {
        failed(call, err)
    }
}

fn base_name(path: &str) -> String {
    path.trim_end_matches(['/', '\\'])
        .rsplit(['/', '\\'])
        .next()
        .filter(|name| !name.is_empty())
        .unwrap_or(path)
        .to_string()
}
