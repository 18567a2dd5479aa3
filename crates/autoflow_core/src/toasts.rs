//! Turning the backend's growing error log into short-lived notifications.

use autoflow_logging::flow_warn;

use crate::status::{RunStatus, TaskError, TaskStatus};

/// How long a toast stays up unless dismissed.
pub const TOAST_LIFETIME_MS: u64 = 6_000;

/// Tracks how much of the backend error log has been surfaced already.
///
/// The log is assumed append-only during a run. It is only considered reset
/// when the backend reports idle with an empty log; a log that shrinks while
/// running is not re-read (the entries after the shrink stay unseen until the
/// log grows past the previous length again).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorNotificationDeduper {
    last_error_count: usize,
}

impl ErrorNotificationDeduper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_error_count(&self) -> usize {
        self.last_error_count
    }

    /// Feed one poll result; returns the errors not seen before, oldest first.
    pub fn observe<'a>(&mut self, status: &'a TaskStatus) -> &'a [TaskError] {
        let count = status.errors.len();
        let fresh: &'a [TaskError] = if count > self.last_error_count {
            let fresh = &status.errors[self.last_error_count..];
            self.last_error_count = count;
            fresh
        } else {
            if count < self.last_error_count && !(status.status == RunStatus::Idle && count == 0) {
                flow_warn!(
                    "Backend error log shrank from {} to {} without a reset",
                    self.last_error_count,
                    count
                );
            }
            &[]
        };

        if status.status == RunStatus::Idle && count == 0 {
            self.last_error_count = 0;
        }
        fresh
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// Creation time in epoch milliseconds; also the toast's identity.
    pub id: u64,
    pub file: String,
    pub msg: String,
}

/// Visible toasts, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ToastTray {
    toasts: Vec<Toast>,
    last_id: u64,
}

impl ToastTray {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a toast created at `now_ms`. Ids stay unique when several toasts share a millisecond.
    pub fn push(&mut self, error: &TaskError, now_ms: u64) -> u64 {
        let id = now_ms.max(self.last_id + 1);
        self.last_id = id;
        self.toasts.push(Toast {
            id,
            file: error.file.clone(),
            msg: error.msg.clone(),
        });
        id
    }

    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|toast| toast.id != id);
        self.toasts.len() != before
    }

    /// Drop toasts older than [`TOAST_LIFETIME_MS`]; returns how many expired.
    pub fn expire(&mut self, now_ms: u64) -> usize {
        let before = self.toasts.len();
        self.toasts
            .retain(|toast| now_ms.saturating_sub(toast.id) < TOAST_LIFETIME_MS);
        before - self.toasts.len()
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}
