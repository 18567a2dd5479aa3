use std::collections::VecDeque;
use std::sync::Arc;

use anyhow::{bail, Result};
use autoflow_bridge::{AutomationBackend, EffectRunner};
use autoflow_core::{update, AppState, Effect, Msg};
use autoflow_logging::{flow_info, flow_warn};

/// Drives the core state machine against a backend for one CLI invocation.
pub struct Session {
    state: AppState,
    runner: EffectRunner,
    failures: Vec<String>,
}

impl Session {
    pub async fn open(backend: Arc<dyn AutomationBackend>) -> Self {
        let runner = EffectRunner::new(backend);
        let loaded = runner.load_settings().await;
        let mut session = Self {
            state: AppState::new(),
            runner,
            failures: Vec::new(),
        };
        session.dispatch(loaded).await;
        session
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Apply a message, execute its effects, and feed results back until quiet.
    pub async fn dispatch(&mut self, msg: Msg) {
        let mut inbox = VecDeque::from([msg]);
        while let Some(msg) = inbox.pop_front() {
            if let Msg::BackendFailed { call, message } = &msg {
                self.failures.push(format!("{call}: {message}"));
            }
            let (next, effects) = update(std::mem::take(&mut self.state), msg);
            self.state = next;
            for effect in effects {
                if let Some(reply) = self.runner.execute(effect).await {
                    inbox.push_back(reply);
                }
            }
        }
    }

    pub async fn dispatch_all(&mut self, msgs: impl IntoIterator<Item = Msg>) {
        for msg in msgs {
            self.dispatch(msg).await;
        }
    }

    /// Save the current settings even if nothing changed.
    pub async fn save_now(&mut self) {
        let payload = self.state.settings_payload();
        if let Some(reply) = self
            .runner
            .execute(Effect::SaveSettings(Box::new(payload)))
            .await
        {
            self.dispatch(reply).await;
        }
    }

    /// Flush pending saves; fails if any backend call failed during the session.
    pub async fn close(mut self) -> Result<AppState> {
        let pending = self.state.has_pending_save();
        self.dispatch(Msg::CloseRequested).await;
        if pending && self.failures.is_empty() {
            flow_info!("Settings saved");
        }
        if !self.failures.is_empty() {
            for failure in &self.failures {
                flow_warn!("Backend call failed: {}", failure);
            }
            bail!("{}", self.failures.join("; "));
        }
        Ok(self.state)
    }
}
