use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::queue::JobQueue;

/// Login detector. Always enabled and always first.
pub const LOGIN: &str = "登入";
/// Puzzle / captcha detector.
pub const CAPTCHA: &str = "拼圖與人機驗證";
/// "Product not found" detector.
pub const NOT_FOUND: &str = "查無資料";
/// BSMI certification mark detector.
pub const BSMI: &str = "BSMI";

/// The four detectors that ship with the application and own a dedicated keyword list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinCategory {
    Login,
    Captcha,
    NotFound,
    Bsmi,
}

impl BuiltinCategory {
    /// Default enabled order.
    pub const ALL: [BuiltinCategory; 4] = [
        BuiltinCategory::Login,
        BuiltinCategory::Captcha,
        BuiltinCategory::NotFound,
        BuiltinCategory::Bsmi,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BuiltinCategory::Login => LOGIN,
            BuiltinCategory::Captcha => CAPTCHA,
            BuiltinCategory::NotFound => NOT_FOUND,
            BuiltinCategory::Bsmi => BSMI,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|builtin| builtin.name() == name)
    }

    /// Whether a match pauses the run when no explicit pause flag exists.
    pub fn pauses_by_default(self) -> bool {
        matches!(self, BuiltinCategory::Login | BuiltinCategory::Captcha)
    }
}

/// Inclusive range of seconds, e.g. the random wait between pages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SecondsRange {
    pub min: f64,
    pub max: f64,
}

impl SecondsRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureRange {
    #[default]
    Viewport,
    Fullscreen,
}

impl CaptureRange {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "viewport" => Some(CaptureRange::Viewport),
            "fullscreen" => Some(CaptureRange::Fullscreen),
            _ => None,
        }
    }
}

/// One input source in the job queue: a URL list file or a folder of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueEntry {
    pub path: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_dir: Option<bool>,
}

impl QueueEntry {
    pub fn file(path: impl Into<String>, name: impl Into<String>, url_count: Option<u64>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            url_count,
            is_dir: None,
        }
    }

    /// Folder entry; the backend expands it into the text files it contains.
    pub fn folder(path: impl Into<String>, name: &str) -> Self {
        Self {
            path: path.into(),
            name: format!("[資料夾] {name}"),
            url_count: None,
            is_dir: Some(true),
        }
    }

    pub fn is_dir(&self) -> bool {
        self.is_dir.unwrap_or(false)
    }
}

/// Full execution policy handed to the backend when a run starts.
///
/// Built only through [`crate::normalize`] (or `Default`), so the category
/// and queue invariants hold from the start; the store operations keep them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomationConfig {
    pub wait_per_page: SecondsRange,
    pub screenshot_delay: f64,
    pub crop_enabled: bool,
    pub crop_top: f64,
    pub crop_bottom: f64,
    pub range: CaptureRange,
    pub batch_rest_enabled: bool,
    pub batch_size: u32,
    pub batch_rest_range: SecondsRange,
    pub scroll_capture: bool,
    pub scroll_stitch: bool,
    pub scroll_times: u8,
    /// Enabled categories in display order. `LOGIN` is always first.
    pub keywords: Vec<String>,
    pub captcha_keywords: Vec<String>,
    pub login_keywords: Vec<String>,
    pub not_found_keywords: Vec<String>,
    pub bsmi_keywords: Vec<String>,
    pub custom_categories: BTreeMap<String, Vec<String>>,
    pub category_pause: BTreeMap<String, bool>,
    pub skip_done: bool,
    pub auto_word_export: bool,
    pub text_check_enabled: bool,
    pub input_files: JobQueue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir_display: Option<String>,
    /// Fields this version does not know about, kept for forward compatibility.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for AutomationConfig {
    fn default() -> Self {
        Self {
            wait_per_page: SecondsRange::new(3.0, 10.0),
            screenshot_delay: 3.0,
            crop_enabled: true,
            crop_top: 0.0,
            crop_bottom: 0.0,
            range: CaptureRange::Viewport,
            batch_rest_enabled: true,
            batch_size: 8,
            batch_rest_range: SecondsRange::new(20.0, 30.0),
            scroll_capture: false,
            scroll_stitch: true,
            scroll_times: 4,
            keywords: BuiltinCategory::ALL
                .iter()
                .map(|builtin| builtin.name().to_string())
                .collect(),
            captcha_keywords: strings(DEFAULT_CAPTCHA_KEYWORDS),
            login_keywords: strings(DEFAULT_LOGIN_KEYWORDS),
            not_found_keywords: strings(DEFAULT_NOT_FOUND_KEYWORDS),
            bsmi_keywords: strings(DEFAULT_BSMI_KEYWORDS),
            custom_categories: BTreeMap::new(),
            category_pause: BuiltinCategory::ALL
                .iter()
                .map(|builtin| (builtin.name().to_string(), builtin.pauses_by_default()))
                .collect(),
            skip_done: false,
            auto_word_export: true,
            text_check_enabled: false,
            input_files: JobQueue::default(),
            output_dir: None,
            output_dir_display: None,
            extra: Map::new(),
        }
    }
}

impl AutomationConfig {
    pub fn to_value(&self) -> Value {
        // Every field is a plain map, list, string, number or bool.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

pub(crate) const DEFAULT_CAPTCHA_KEYWORDS: &[&str] = &[
    "驗證碼",
    "人機驗證",
    "我不是機器人",
    "captcha",
    "verify",
    "請驗證您是人類",
    "安全驗證",
    "驗證資訊失敗",
    "拼圖",
    "puzzle",
    "robot",
    "automated",
    "rate limit",
    "verification",
    "滑動圖塊",
    "完成驗證",
    "安全性驗證",
];

pub(crate) const DEFAULT_LOGIN_KEYWORDS: &[&str] = &[
    "登入", "登錄", "sign in", "log in", "login", "會員登入", "帳號", "密碼",
];

pub(crate) const DEFAULT_NOT_FOUND_KEYWORDS: &[&str] =
    &["商品不存在", "已下架", "找不到商品", "商品已刪除", "商品已下架"];

pub(crate) const DEFAULT_BSMI_KEYWORDS: &[&str] = &["bsmi", "b s m i", "商品檢驗標識"];

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| (*item).to_string()).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// Presentation preferences persisted next to the automation config.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplaySettings {
    pub theme: Theme,
    /// Text scale step, 1..=7.
    pub font_size: u8,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            font_size: 2,
            extra: Map::new(),
        }
    }
}

/// The blob handed to the backend's `saveSettings`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingsPayload {
    pub config: AutomationConfig,
    pub display: DisplaySettings,
}
