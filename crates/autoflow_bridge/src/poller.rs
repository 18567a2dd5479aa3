use std::sync::Arc;
use std::time::Duration;

use autoflow_core::Msg;
use autoflow_logging::{flow_debug, flow_warn};
use chrono::Utc;

use crate::backend::AutomationBackend;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Wall clock in epoch milliseconds, as carried by `StatusPolled` and `Tick`.
pub fn now_ms() -> u64 {
    u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0)
}

/// Periodically asks the backend for task status and app state.
pub struct StatusPoller {
    backend: Arc<dyn AutomationBackend>,
    interval: Duration,
}

impl StatusPoller {
    pub fn new(backend: Arc<dyn AutomationBackend>) -> Self {
        Self::with_interval(backend, DEFAULT_POLL_INTERVAL)
    }

    pub fn with_interval(backend: Arc<dyn AutomationBackend>, interval: Duration) -> Self {
        Self { backend, interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// One polling round. Failed polls are logged and skipped.
    pub async fn poll_once(&self) -> Vec<Msg> {
        let mut msgs = Vec::with_capacity(2);
        match self.backend.get_task_status().await {
            Ok(status) => msgs.push(Msg::StatusPolled {
                status,
                now_ms: now_ms(),
            }),
            Err(err) => flow_warn!("Status poll failed: {}", err),
        }
        match self.backend.get_app_state().await {
            Ok(snapshot) => msgs.push(Msg::AppStatePolled {
                version: snapshot.version,
                history: snapshot.history,
                stats: snapshot.stats,
            }),
            Err(err) => flow_warn!("App state poll failed: {}", err),
        }
        msgs
    }

    /// Poll until `sink` rejects a message, i.e. the receiver is gone.
    pub async fn run<F>(self, mut sink: F)
    where
        F: FnMut(Msg) -> bool + Send,
    {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            for msg in self.poll_once().await {
                if !sink(msg) {
                    flow_debug!("Poll receiver dropped; stopping poller");
                    return;
                }
            }
        }
    }
}
