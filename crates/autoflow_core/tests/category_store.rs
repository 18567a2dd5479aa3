use autoflow_core::{normalize, AutomationConfig, BSMI, CAPTCHA, LOGIN, NOT_FOUND};
use serde_json::json;

fn config_with_custom() -> AutomationConfig {
    let mut config = AutomationConfig::default();
    assert!(config.add_category("自訂"));
    config
}

#[test]
fn add_category_appends_and_initializes_storage() {
    let config = config_with_custom();
    assert_eq!(config.keywords, vec![LOGIN, CAPTCHA, NOT_FOUND, BSMI, "自訂"]);
    assert_eq!(config.category_pause.get("自訂"), Some(&false));
    assert_eq!(config.category_keywords("自訂"), Some(&[][..]));
}

#[test]
fn add_category_ignores_blank_duplicate_and_alias_names() {
    let mut config = config_with_custom();
    let before = config.clone();

    assert!(!config.add_category("   "));
    assert!(!config.add_category("自訂"));
    assert!(!config.add_category("  自訂 "));
    assert!(!config.add_category("驗證碼"));
    assert!(!config.add_category(LOGIN));
    assert_eq!(config, before);
}

#[test]
fn removed_category_keeps_its_data_for_re_adding() {
    let mut config = config_with_custom();
    assert!(config.add_keyword("自訂", "售完"));
    assert!(config.set_category_pause("自訂", true));

    assert_eq!(config.remove_category(4).as_deref(), Some("自訂"));
    assert!(!config.is_category_enabled("自訂"));
    assert_eq!(config.custom_categories.get("自訂"), Some(&vec!["售完".to_string()]));
    assert_eq!(config.category_pause.get("自訂"), Some(&true));

    assert!(config.add_category("自訂"));
    assert_eq!(config.category_keywords("自訂"), Some(&["售完".to_string()][..]));
    assert!(config.is_category_paused("自訂"));
}

#[test]
fn builtin_categories_cannot_be_removed() {
    let mut config = config_with_custom();
    for index in 0..4 {
        assert_eq!(config.remove_category(index), None);
    }
    assert_eq!(config.remove_category(99), None);
    assert_eq!(config.keywords.len(), 5);
}

#[test]
fn reorder_keeps_login_pinned() {
    let mut config = config_with_custom();

    assert!(config.reorder_category(4, 1));
    assert_eq!(config.keywords, vec![LOGIN, "自訂", CAPTCHA, NOT_FOUND, BSMI]);

    assert!(!config.reorder_category(0, 2));
    assert!(!config.reorder_category(3, 0));
    assert!(!config.reorder_category(2, 2));
    assert!(!config.reorder_category(1, 5));
    assert_eq!(config.keywords[0], LOGIN);
}

#[test]
fn keywords_are_trimmed_and_blank_ignored() {
    let mut config = AutomationConfig::default();
    let before = config.login_keywords.len();

    assert!(config.add_keyword(LOGIN, "  請先登入  "));
    assert!(!config.add_keyword(LOGIN, " \t "));
    assert_eq!(config.login_keywords.len(), before + 1);
    assert_eq!(config.login_keywords.last().map(String::as_str), Some("請先登入"));

    assert!(config.add_keyword("新類別", "x"));
    assert_eq!(config.custom_categories.get("新類別"), Some(&vec!["x".to_string()]));
}

#[test]
fn remove_keyword_is_bounds_checked() {
    let mut config = AutomationConfig::default();
    assert_eq!(config.remove_keyword(BSMI, 0).as_deref(), Some("bsmi"));
    assert_eq!(config.remove_keyword(BSMI, 10), None);
    assert_eq!(config.remove_keyword("不存在的類別", 0), None);
    assert!(!config.custom_categories.contains_key("不存在的類別"));
}

#[test]
fn toggle_pause_reports_changes() {
    let mut config = AutomationConfig::default();
    assert!(!config.set_category_pause(LOGIN, true));
    assert!(config.set_category_pause(LOGIN, false));
    assert!(!config.is_category_paused(LOGIN));
    assert!(config.set_category_pause(BSMI, true));
    assert!(config.is_category_paused(BSMI));
}

#[test]
fn store_edits_survive_migration_unchanged() {
    let mut config = config_with_custom();
    config.add_category("另一個");
    config.reorder_category(5, 1);
    config.remove_category(2);
    config.set_category_pause("另一個", true);

    assert_eq!(normalize(Some(&config.to_value())), config);
    assert_eq!(
        normalize(Some(&json!({ "keywords": config.keywords.clone() }))).keywords,
        config.keywords
    );
}

#[test]
fn legacy_name_never_becomes_a_custom_category() {
    let mut config = AutomationConfig::default();
    assert!(config.remove_category(2).is_none());
    assert!(!config.add_category("不存在"));
    assert!(!config.custom_categories.contains_key("不存在"));
    assert_eq!(config.keywords.iter().filter(|k| k.as_str() == NOT_FOUND).count(), 1);
}
