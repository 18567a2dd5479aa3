//! Category and keyword editing on [`AutomationConfig`].
//!
//! Removing a category only takes it out of `keywords`; its keyword list and
//! pause flag stay in storage so adding it back restores them.

use autoflow_logging::flow_debug;

use crate::config::{AutomationConfig, BuiltinCategory};
use crate::migrate::canonical_category;

impl AutomationConfig {
    pub fn is_category_enabled(&self, name: &str) -> bool {
        self.keywords.iter().any(|enabled| enabled == name)
    }

    /// Enable a category. Blank names, legacy aliases of enabled categories and
    /// already enabled names are ignored.
    pub fn add_category(&mut self, name: &str) -> bool {
        // Legacy names are reserved: stored raw, the next load would rename them
        // onto the built-in and orphan their keyword list.
        let name = canonical_category(name.trim());
        if name.is_empty() || self.is_category_enabled(name) {
            flow_debug!("Category add ignored: `{}`", name);
            return false;
        }
        self.keywords.push(name.to_string());
        self.category_pause.entry(name.to_string()).or_insert(false);
        if BuiltinCategory::from_name(name).is_none() {
            self.custom_categories.entry(name.to_string()).or_default();
        }
        true
    }

    /// Disable the category at `index`. Built-in categories cannot be removed.
    pub fn remove_category(&mut self, index: usize) -> Option<String> {
        let name = self.keywords.get(index)?;
        if BuiltinCategory::from_name(name).is_some() {
            flow_debug!("Category remove ignored: `{}` is built in", name);
            return None;
        }
        Some(self.keywords.remove(index))
    }

    /// Drag-and-drop move within `keywords`. Index 0 is pinned to the login category.
    pub fn reorder_category(&mut self, from: usize, to: usize) -> bool {
        let len = self.keywords.len();
        if from == to || from >= len || to >= len || from == 0 || to == 0 {
            flow_debug!("Category move ignored: {} -> {} (len {})", from, to, len);
            return false;
        }
        let moved = self.keywords.remove(from);
        self.keywords.insert(to, moved);
        true
    }

    pub fn category_keywords(&self, category: &str) -> Option<&[String]> {
        match BuiltinCategory::from_name(category) {
            Some(builtin) => Some(self.builtin_keywords(builtin)),
            None => self.custom_categories.get(category).map(Vec::as_slice),
        }
    }

    /// Append a trimmed keyword to the category's list, creating a custom list if needed.
    pub fn add_keyword(&mut self, category: &str, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() {
            return false;
        }
        let list = match BuiltinCategory::from_name(category) {
            Some(builtin) => self.builtin_keywords_mut(builtin),
            None => self.custom_categories.entry(category.to_string()).or_default(),
        };
        list.push(value.to_string());
        true
    }

    pub fn remove_keyword(&mut self, category: &str, index: usize) -> Option<String> {
        let list = match BuiltinCategory::from_name(category) {
            Some(builtin) => self.builtin_keywords_mut(builtin),
            None => self.custom_categories.get_mut(category)?,
        };
        if index >= list.len() {
            flow_debug!("Keyword remove ignored: `{}`[{}] out of range", category, index);
            return None;
        }
        Some(list.remove(index))
    }

    /// Set whether a match in `category` pauses the run. Returns whether the flag changed.
    pub fn set_category_pause(&mut self, category: &str, enabled: bool) -> bool {
        self.category_pause.insert(category.to_string(), enabled) != Some(enabled)
    }

    pub fn is_category_paused(&self, category: &str) -> bool {
        self.category_pause.get(category).copied().unwrap_or(false)
    }

    fn builtin_keywords(&self, builtin: BuiltinCategory) -> &[String] {
        match builtin {
            BuiltinCategory::Login => &self.login_keywords,
            BuiltinCategory::Captcha => &self.captcha_keywords,
            BuiltinCategory::NotFound => &self.not_found_keywords,
            BuiltinCategory::Bsmi => &self.bsmi_keywords,
        }
    }

    fn builtin_keywords_mut(&mut self, builtin: BuiltinCategory) -> &mut Vec<String> {
        match builtin {
            BuiltinCategory::Login => &mut self.login_keywords,
            BuiltinCategory::Captcha => &mut self.captcha_keywords,
            BuiltinCategory::NotFound => &mut self.not_found_keywords,
            BuiltinCategory::Bsmi => &mut self.bsmi_keywords,
        }
    }
}
