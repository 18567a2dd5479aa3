use serde_json::Value;

use crate::debounce::PersistDebouncer;
use crate::eta::{estimate, Eta, EtaTiming};
use crate::migrate::{normalize, normalize_display};
use crate::queue::EnqueueStats;
use crate::toasts::{ErrorNotificationDeduper, ToastTray};
use crate::view_model::{AppViewModel, CategoryRowView, QueueRowView};
use crate::{
    AutomationConfig, BuiltinCategory, DisplaySettings, HistoryEntry, SettingsPayload, Stats,
    TaskStatus,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// One-line message for the user, replaced by the next one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

/// Where a start request stands between the click and the first `running` poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum StartPhase {
    #[default]
    None,
    /// `StartTask` sent, no reply yet.
    Requested,
    /// The backend accepted; waiting for a poll to show the run.
    Accepted,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    config: AutomationConfig,
    display: DisplaySettings,
    task_status: TaskStatus,
    deduper: ErrorNotificationDeduper,
    toasts: ToastTray,
    history: Vec<HistoryEntry>,
    stats: Stats,
    version: Option<String>,
    last_enqueue: Option<EnqueueStats>,
    queue_collapsed: bool,
    notice: Option<Notice>,
    start: StartPhase,
    persist: PersistDebouncer,
    clock_ms: u64,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(&self) -> &AutomationConfig {
        &self.config
    }

    pub fn display(&self) -> &DisplaySettings {
        &self.display
    }

    pub fn task_status(&self) -> &TaskStatus {
        &self.task_status
    }

    pub fn error_count_seen(&self) -> usize {
        self.deduper.last_error_count()
    }

    /// A start was requested and no poll has shown the outcome yet.
    pub fn is_start_pending(&self) -> bool {
        self.start != StartPhase::None
    }

    pub fn has_pending_save(&self) -> bool {
        self.persist.is_pending()
    }

    pub fn settings_payload(&self) -> SettingsPayload {
        SettingsPayload {
            config: self.config.clone(),
            display: self.display.clone(),
        }
    }

    pub fn eta(&self) -> Option<Eta> {
        estimate(
            self.config.input_files.entries(),
            &self.task_status,
            EtaTiming::from(&self.config),
        )
    }

    pub fn view(&self) -> AppViewModel {
        let running = self.task_status.is_running();
        let categories = self
            .config
            .keywords
            .iter()
            .map(|name| CategoryRowView {
                name: name.clone(),
                builtin: BuiltinCategory::from_name(name).is_some(),
                paused: self.config.is_category_paused(name),
                keyword_count: self.config.category_keywords(name).map_or(0, <[String]>::len),
            })
            .collect();
        let queue = self
            .config
            .input_files
            .iter()
            .enumerate()
            .map(|(index, entry)| QueueRowView {
                index,
                path: entry.path.clone(),
                name: entry.name.clone(),
                url_count: entry.url_count,
                is_dir: entry.is_dir(),
                processing: running && index == 0,
            })
            .collect();
        let eta = self.eta();

        AppViewModel {
            categories,
            queue,
            eta,
            eta_text: crate::eta::eta_label(eta),
            run_status: self.task_status.status,
            processed: self.task_status.processed,
            total: self.task_status.total,
            current_file: self.task_status.current_file.clone(),
            can_start: self.can_start(),
            can_stop: running,
            toasts: self.toasts.toasts().to_vec(),
            last_enqueue: self.last_enqueue,
            queue_collapsed: self.queue_collapsed,
            notice: self.notice.clone(),
            output_dir: self
                .config
                .output_dir_display
                .clone()
                .or_else(|| self.config.output_dir.clone()),
            version: self.version.clone(),
            history: self.history.clone(),
            stats: self.stats.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether a render is needed and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn can_start(&self) -> bool {
        !self.config.input_files.is_empty() && !self.task_status.is_running() && !self.is_start_pending()
    }

    pub(crate) fn load_settings(
        &mut self,
        config: Option<&Value>,
        display: Option<&Value>,
        queue_collapsed: Option<bool>,
    ) {
        self.config = normalize(config);
        self.display = normalize_display(display);
        if let Some(collapsed) = queue_collapsed {
            self.queue_collapsed = collapsed;
        }
        self.mark_dirty();
    }

    pub(crate) fn config_mut(&mut self) -> &mut AutomationConfig {
        &mut self.config
    }

    pub(crate) fn is_running(&self) -> bool {
        self.task_status.is_running()
    }

    pub(crate) fn replace_config(&mut self, config: AutomationConfig) {
        let renormalized = normalize(Some(&config.to_value()));
        if renormalized != self.config {
            self.config = renormalized;
            self.settings_changed();
        }
    }

    pub(crate) fn set_display(&mut self, display: DisplaySettings) {
        if display != self.display {
            self.display = display;
            self.settings_changed();
        }
    }

    pub(crate) fn set_last_enqueue(&mut self, stats: EnqueueStats) {
        self.last_enqueue = Some(stats);
        self.mark_dirty();
    }

    pub(crate) fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
        self.mark_dirty();
    }

    pub(crate) fn begin_start(&mut self) -> Option<AutomationConfig> {
        if !self.can_start() {
            return None;
        }
        self.start = StartPhase::Requested;
        self.mark_dirty();
        Some(self.config.clone())
    }

    /// Keep guarding against a second start until a poll shows the run.
    pub(crate) fn accept_start(&mut self) {
        if self.start == StartPhase::Requested {
            self.start = StartPhase::Accepted;
        }
    }

    pub(crate) fn abort_start(&mut self) {
        self.start = StartPhase::None;
        self.mark_dirty();
    }

    /// Take a save now if one is pending.
    pub(crate) fn flush_settings(&mut self) -> Option<SettingsPayload> {
        self.persist.flush().then(|| self.settings_payload())
    }

    pub(crate) fn tick(&mut self, now_ms: u64) -> Option<SettingsPayload> {
        self.advance_clock(now_ms);
        if self.toasts.expire(now_ms) > 0 {
            self.mark_dirty();
        }
        self.persist
            .due(self.clock_ms)
            .then(|| self.settings_payload())
    }

    pub(crate) fn apply_status(&mut self, status: TaskStatus, now_ms: u64) {
        self.advance_clock(now_ms);
        for error in self.deduper.observe(&status) {
            self.toasts.push(error, now_ms);
            self.dirty = true;
        }
        // After acceptance any poll settles the request: either the run shows up or it already ended.
        let settled = match self.start {
            StartPhase::None => false,
            StartPhase::Requested => status.is_running(),
            StartPhase::Accepted => true,
        };
        if settled {
            self.start = StartPhase::None;
            self.mark_dirty();
        }
        if status != self.task_status {
            self.task_status = status;
            self.mark_dirty();
        }
    }

    pub(crate) fn apply_app_state(
        &mut self,
        version: Option<String>,
        history: Vec<HistoryEntry>,
        stats: Stats,
    ) {
        if version.is_some() && version != self.version {
            self.version = version;
            self.mark_dirty();
        }
        if history != self.history || stats != self.stats {
            self.history = history;
            self.stats = stats;
            self.mark_dirty();
        }
    }

    /// Returns whether the flag changed.
    pub(crate) fn set_queue_collapsed(&mut self, collapsed: bool) -> bool {
        if self.queue_collapsed == collapsed {
            return false;
        }
        self.queue_collapsed = collapsed;
        self.mark_dirty();
        true
    }

    pub(crate) fn clear_history(&mut self) {
        self.history.clear();
        self.stats = Stats::default();
        self.mark_dirty();
    }

    pub(crate) fn dismiss_toast(&mut self, id: u64) {
        if self.toasts.dismiss(id) {
            self.mark_dirty();
        }
    }

    /// Schedule a save for the current settings and re-render.
    pub(crate) fn settings_changed(&mut self) {
        self.persist.mark(self.clock_ms);
        self.mark_dirty();
    }

    fn advance_clock(&mut self, now_ms: u64) {
        self.clock_ms = self.clock_ms.max(now_ms);
    }
}
