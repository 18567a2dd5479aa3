/// Quiet period after the last settings change before a save is issued.
pub const PERSIST_QUIET_MS: u64 = 500;

/// Trailing-edge coalescing of settings saves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistDebouncer {
    quiet_ms: u64,
    last_change_ms: Option<u64>,
}

impl Default for PersistDebouncer {
    fn default() -> Self {
        Self::new(PERSIST_QUIET_MS)
    }
}

impl PersistDebouncer {
    pub fn new(quiet_ms: u64) -> Self {
        Self {
            quiet_ms,
            last_change_ms: None,
        }
    }

    /// Record a change at `now_ms`, restarting the quiet period.
    pub fn mark(&mut self, now_ms: u64) {
        self.last_change_ms = Some(now_ms);
    }

    pub fn is_pending(&self) -> bool {
        self.last_change_ms.is_some()
    }

    /// True once per burst of changes, after the quiet period has elapsed.
    pub fn due(&mut self, now_ms: u64) -> bool {
        match self.last_change_ms {
            Some(last) if now_ms.saturating_sub(last) >= self.quiet_ms => {
                self.last_change_ms = None;
                true
            }
            _ => false,
        }
    }

    /// Force a pending save out now. Returns whether anything was pending.
    pub fn flush(&mut self) -> bool {
        self.last_change_ms.take().is_some()
    }
}
