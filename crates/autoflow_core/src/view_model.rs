use crate::eta::Eta;
use crate::queue::EnqueueStats;
use crate::state::Notice;
use crate::toasts::Toast;
use crate::{HistoryEntry, RunStatus, Stats};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub categories: Vec<CategoryRowView>,
    pub queue: Vec<QueueRowView>,
    pub eta: Option<Eta>,
    /// `"--"`, `"{m} 分鐘"` or `"{h}時 {m}分"`.
    pub eta_text: String,
    pub run_status: RunStatus,
    pub processed: u64,
    pub total: u64,
    pub current_file: Option<String>,
    pub can_start: bool,
    pub can_stop: bool,
    pub toasts: Vec<Toast>,
    pub last_enqueue: Option<EnqueueStats>,
    pub queue_collapsed: bool,
    pub notice: Option<Notice>,
    pub output_dir: Option<String>,
    pub version: Option<String>,
    pub history: Vec<HistoryEntry>,
    pub stats: Stats,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRowView {
    pub name: String,
    pub builtin: bool,
    pub paused: bool,
    pub keyword_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueRowView {
    pub index: usize,
    pub path: String,
    pub name: String,
    pub url_count: Option<u64>,
    pub is_dir: bool,
    /// The backend is working on this entry right now.
    pub processing: bool,
}
