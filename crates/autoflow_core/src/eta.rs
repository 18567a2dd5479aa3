use std::fmt;

use crate::config::{AutomationConfig, QueueEntry, SecondsRange};
use crate::status::TaskStatus;

/// Fixed per-URL allowance for navigation and rendering that the wait settings don't cover.
pub const PER_URL_OVERHEAD_SECS: f64 = 4.5;

/// Timing parameters the estimate depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EtaTiming {
    pub wait_per_page: SecondsRange,
    pub screenshot_delay: f64,
}

impl From<&AutomationConfig> for EtaTiming {
    fn from(config: &AutomationConfig) -> Self {
        Self {
            wait_per_page: config.wait_per_page,
            screenshot_delay: config.screenshot_delay,
        }
    }
}

impl EtaTiming {
    pub fn per_url_seconds(&self) -> f64 {
        self.wait_per_page.midpoint() + self.screenshot_delay + PER_URL_OVERHEAD_SECS
    }
}

/// Estimated remaining wall-clock time, floored to whole minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eta {
    pub hours: u64,
    pub minutes: u64,
}

impl Eta {
    fn from_seconds(total_seconds: f64) -> Self {
        let whole = total_seconds.max(0.0).floor() as u64;
        Self {
            hours: whole / 3600,
            minutes: (whole % 3600) / 60,
        }
    }
}

impl fmt::Display for Eta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hours > 0 {
            write!(f, "{}時 {}分", self.hours, self.minutes)
        } else {
            write!(f, "{} 分鐘", self.minutes)
        }
    }
}

/// URLs still to be visited. While running, `processed` counts against the head entry only.
pub fn remaining_urls(queue: &[QueueEntry], status: &TaskStatus) -> u64 {
    // Counts come from persisted files, so sums saturate instead of overflowing.
    let url_count = |entry: &QueueEntry| entry.url_count.unwrap_or(0);
    let total = |entries: &[QueueEntry]| entries.iter().map(url_count).fold(0, u64::saturating_add);
    match queue.split_first() {
        None => 0,
        Some((head, rest)) if status.is_running() => url_count(head)
            .saturating_sub(status.processed)
            .saturating_add(total(rest)),
        Some(_) => total(queue),
    }
}

/// Total estimated seconds, or `None` when nothing is left to do.
pub fn estimated_seconds(queue: &[QueueEntry], status: &TaskStatus, timing: EtaTiming) -> Option<f64> {
    match remaining_urls(queue, status) {
        0 => None,
        remaining => Some(remaining as f64 * timing.per_url_seconds()),
    }
}

pub fn estimate(queue: &[QueueEntry], status: &TaskStatus, timing: EtaTiming) -> Option<Eta> {
    estimated_seconds(queue, status, timing).map(Eta::from_seconds)
}

/// Text shown in the ETA slot; `--` when there is no estimate.
pub fn eta_label(eta: Option<Eta>) -> String {
    eta.map_or_else(|| "--".to_string(), |eta| eta.to_string())
}
