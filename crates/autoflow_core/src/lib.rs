//! AutoFlow core: configuration migration, category and queue stores, run
//! estimates, error toasts, and the pure state machine tying them together.
mod categories;
mod config;
mod debounce;
mod effect;
mod eta;
mod migrate;
mod msg;
mod queue;
mod state;
mod status;
mod toasts;
mod update;
mod view_model;

pub use config::{
    AutomationConfig, BuiltinCategory, CaptureRange, DisplaySettings, QueueEntry, SecondsRange,
    SettingsPayload, Theme, BSMI, CAPTCHA, LOGIN, NOT_FOUND,
};
pub use debounce::{PersistDebouncer, PERSIST_QUIET_MS};
pub use effect::Effect;
pub use eta::{
    estimate, estimated_seconds, eta_label, remaining_urls, Eta, EtaTiming, PER_URL_OVERHEAD_SECS,
};
pub use migrate::{canonical_category, normalize, normalize_display};
pub use msg::{BackendCall, Msg};
pub use queue::{EnqueueStats, JobQueue};
pub use state::{AppState, Notice, NoticeLevel};
pub use status::{ExcelConvertSummary, HistoryEntry, RunStatus, Stats, TaskError, TaskStatus};
pub use toasts::{ErrorNotificationDeduper, Toast, ToastTray, TOAST_LIFETIME_MS};
pub use update::update;
pub use view_model::{AppViewModel, CategoryRowView, QueueRowView};
