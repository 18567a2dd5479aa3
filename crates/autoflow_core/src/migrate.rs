//! Schema migration for persisted settings.
//!
//! Every field is read independently: a missing or malformed field falls back
//! to its default without affecting the others, and unknown fields are kept
//! verbatim. The output is a fixed point, so normalizing it again is a no-op.

use std::collections::{BTreeMap, HashSet};

use autoflow_logging::{flow_debug, flow_info, flow_warn};
use serde_json::{Map, Value};

use crate::config::{
    AutomationConfig, BuiltinCategory, CaptureRange, DisplaySettings, QueueEntry, SecondsRange,
    Theme, CAPTCHA, LOGIN, NOT_FOUND,
};
use crate::queue::JobQueue;

/// Category names written by older releases, mapped to their current names.
const LEGACY_CATEGORY_ALIASES: &[(&str, &str)] = &[("驗證碼", CAPTCHA), ("不存在", NOT_FOUND)];

const CONFIG_FIELDS: &[&str] = &[
    "waitPerPage",
    "screenshotDelay",
    "cropEnabled",
    "cropTop",
    "cropBottom",
    "range",
    "batchRestEnabled",
    "batchSize",
    "batchRestRange",
    "scrollCapture",
    "scrollStitch",
    "scrollTimes",
    "keywords",
    "captchaKeywords",
    "loginKeywords",
    "notFoundKeywords",
    "bsmiKeywords",
    "customCategories",
    "categoryPause",
    "skipDone",
    "autoWordExport",
    "textCheckEnabled",
    "inputFiles",
    "outputDir",
    "outputDirDisplay",
];

const DISPLAY_FIELDS: &[&str] = &["theme", "fontSize"];

const MAX_SCROLL_TIMES: u64 = 20;
const MAX_FONT_SIZE: u64 = 7;

/// Resolve a legacy category name to its current name. Current names map to themselves.
pub fn canonical_category(name: &str) -> &str {
    LEGACY_CATEGORY_ALIASES
        .iter()
        .find(|(legacy, _)| *legacy == name)
        .map_or(name, |(_, current)| *current)
}

/// Normalize a raw persisted config object into the current schema. Never fails.
pub fn normalize(raw: Option<&Value>) -> AutomationConfig {
    let raw = match raw {
        Some(Value::Object(map)) => map,
        Some(Value::Null) | None => return AutomationConfig::default(),
        Some(other) => {
            flow_warn!(
                "Persisted config is not an object ({}); using defaults",
                kind_of(other)
            );
            return AutomationConfig::default();
        }
    };

    let defaults = AutomationConfig::default();
    let reader = FieldReader { raw };

    let keywords = normalize_keywords(raw.get("keywords"), &defaults.keywords);
    let mut category_pause = normalize_category_pause(raw.get("categoryPause"));
    for name in &keywords {
        if !category_pause.contains_key(name) {
            let paused = BuiltinCategory::from_name(name).is_some_and(BuiltinCategory::pauses_by_default);
            category_pause.insert(name.clone(), paused);
        }
    }

    AutomationConfig {
        wait_per_page: reader.field("waitPerPage", defaults.wait_per_page, |v| {
            seconds_range(v, 1.0)
        }),
        screenshot_delay: reader.field("screenshotDelay", defaults.screenshot_delay, non_negative),
        crop_enabled: reader.field("cropEnabled", defaults.crop_enabled, Value::as_bool),
        crop_top: reader.field("cropTop", defaults.crop_top, non_negative),
        crop_bottom: reader.field("cropBottom", defaults.crop_bottom, non_negative),
        range: reader.field("range", defaults.range, |v| {
            v.as_str().and_then(CaptureRange::parse)
        }),
        batch_rest_enabled: reader.field(
            "batchRestEnabled",
            defaults.batch_rest_enabled,
            Value::as_bool,
        ),
        batch_size: reader.field("batchSize", defaults.batch_size, |v| {
            v.as_u64()
                .filter(|size| *size >= 1)
                .and_then(|size| u32::try_from(size).ok())
        }),
        batch_rest_range: reader.field("batchRestRange", defaults.batch_rest_range, |v| {
            seconds_range(v, 0.0)
        }),
        scroll_capture: reader.field("scrollCapture", defaults.scroll_capture, Value::as_bool),
        scroll_stitch: reader.field("scrollStitch", defaults.scroll_stitch, Value::as_bool),
        scroll_times: reader.field("scrollTimes", defaults.scroll_times, |v| {
            v.as_u64()
                .filter(|times| (1..=MAX_SCROLL_TIMES).contains(times))
                .and_then(|times| u8::try_from(times).ok())
        }),
        keywords,
        captcha_keywords: reader.field("captchaKeywords", defaults.captcha_keywords, string_list),
        login_keywords: reader.field("loginKeywords", defaults.login_keywords, string_list),
        not_found_keywords: reader.field(
            "notFoundKeywords",
            defaults.not_found_keywords,
            string_list,
        ),
        bsmi_keywords: reader.field("bsmiKeywords", defaults.bsmi_keywords, string_list),
        custom_categories: reader.field(
            "customCategories",
            defaults.custom_categories,
            custom_categories,
        ),
        category_pause,
        skip_done: reader.field("skipDone", defaults.skip_done, Value::as_bool),
        auto_word_export: reader.field("autoWordExport", defaults.auto_word_export, Value::as_bool),
        text_check_enabled: reader.field(
            "textCheckEnabled",
            defaults.text_check_enabled,
            Value::as_bool,
        ),
        input_files: reader.field("inputFiles", defaults.input_files, input_files),
        output_dir: reader.optional_string("outputDir"),
        output_dir_display: reader.optional_string("outputDirDisplay"),
        extra: reader.extra(CONFIG_FIELDS),
    }
}

/// Normalize persisted display preferences. Never fails.
pub fn normalize_display(raw: Option<&Value>) -> DisplaySettings {
    let defaults = DisplaySettings::default();
    let Some(Value::Object(raw)) = raw else {
        return defaults;
    };
    let reader = FieldReader { raw };
    DisplaySettings {
        theme: reader.field("theme", defaults.theme, |v| match v.as_str()? {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }),
        font_size: reader.field("fontSize", defaults.font_size, |v| {
            v.as_u64()
                .filter(|size| (1..=MAX_FONT_SIZE).contains(size))
                .and_then(|size| u8::try_from(size).ok())
        }),
        extra: reader.extra(DISPLAY_FIELDS),
    }
}

struct FieldReader<'a> {
    raw: &'a Map<String, Value>,
}

impl FieldReader<'_> {
    /// Parse `key`, falling back to `default` when absent, null or malformed.
    fn field<T>(&self, key: &str, default: T, parse: impl FnOnce(&Value) -> Option<T>) -> T {
        match self.raw.get(key) {
            None | Some(Value::Null) => default,
            Some(value) => match parse(value) {
                Some(parsed) => parsed,
                None => {
                    flow_warn!("Config field `{}` is invalid ({}); using default", key, value);
                    default
                }
            },
        }
    }

    fn optional_string(&self, key: &str) -> Option<String> {
        match self.raw.get(key) {
            Some(Value::String(text)) => Some(text.clone()),
            None | Some(Value::Null) => None,
            Some(other) => {
                flow_warn!("Config field `{}` is not a string ({})", key, kind_of(other));
                None
            }
        }
    }

    fn extra(&self, known: &[&str]) -> Map<String, Value> {
        self.raw
            .iter()
            .filter(|(key, _)| !known.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

fn normalize_keywords(raw: Option<&Value>, defaults: &[String]) -> Vec<String> {
    let items = match raw {
        Some(Value::Array(items)) => items,
        None | Some(Value::Null) => return defaults.to_vec(),
        Some(other) => {
            flow_warn!("Config field `keywords` is not a list ({}); using default", kind_of(other));
            return defaults.to_vec();
        }
    };

    let mut seen = HashSet::new();
    let mut renamed: Vec<String> = Vec::with_capacity(items.len() + BuiltinCategory::ALL.len());
    for item in items {
        let Some(name) = item.as_str().filter(|name| !name.trim().is_empty()) else {
            flow_debug!("Dropping invalid category entry {}", item);
            continue;
        };
        let current = canonical_category(name);
        if current != name {
            flow_info!("Renaming legacy category `{}` to `{}`", name, current);
        }
        if seen.insert(current.to_string()) {
            renamed.push(current.to_string());
        } else {
            flow_debug!("Dropping duplicate category `{}`", current);
        }
    }

    let mut keywords = Vec::with_capacity(renamed.len() + 1);
    keywords.push(LOGIN.to_string());
    keywords.extend(renamed.into_iter().filter(|name| name != LOGIN));

    for builtin in BuiltinCategory::ALL {
        if !keywords.iter().any(|name| name == builtin.name()) {
            keywords.push(builtin.name().to_string());
        }
    }
    keywords
}

fn normalize_category_pause(raw: Option<&Value>) -> BTreeMap<String, bool> {
    let mut pause = BTreeMap::new();
    let Some(Value::Object(entries)) = raw else {
        return pause;
    };
    for (name, flag) in entries {
        let Some(flag) = flag.as_bool() else {
            flow_debug!("Dropping non-boolean pause flag for `{}`", name);
            continue;
        };
        let current = canonical_category(name);
        if current == name {
            pause.insert(name.clone(), flag);
        } else {
            // The current name's own entry wins over its legacy alias.
            pause.entry(current.to_string()).or_insert(flag);
        }
    }
    pause
}

fn seconds_range(value: &Value, min_upper: f64) -> Option<SecondsRange> {
    let min = value.get("min")?.as_f64()?;
    let max = value.get("max")?.as_f64()?;
    (min >= 0.0 && min <= max && max >= min_upper).then_some(SecondsRange::new(min, max))
}

fn non_negative(value: &Value) -> Option<f64> {
    value.as_f64().filter(|number| *number >= 0.0)
}

fn string_list(value: &Value) -> Option<Vec<String>> {
    let items = value.as_array()?;
    Some(
        items
            .iter()
            .filter_map(Value::as_str)
            .map(ToOwned::to_owned)
            .collect(),
    )
}

fn custom_categories(value: &Value) -> Option<BTreeMap<String, Vec<String>>> {
    let entries = value.as_object()?;
    Some(
        entries
            .iter()
            .filter_map(|(name, list)| string_list(list).map(|list| (name.clone(), list)))
            .collect(),
    )
}

fn input_files(value: &Value) -> Option<JobQueue> {
    let items = value.as_array()?;
    let entries = items.iter().filter_map(|item| {
        let path = item.get("path")?.as_str().filter(|path| !path.is_empty())?;
        let name = item
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or(path)
            .to_string();
        Some(QueueEntry {
            path: path.to_string(),
            name,
            url_count: item.get("urlCount").and_then(Value::as_u64),
            is_dir: item.get("isDir").and_then(Value::as_bool),
        })
    });
    Some(JobQueue::from_entries(entries))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
