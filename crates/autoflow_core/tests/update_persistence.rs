use autoflow_core::{
    update, AppState, DisplaySettings, Effect, Msg, SettingsPayload, Theme, PERSIST_QUIET_MS,
};
use pretty_assertions::assert_eq;

fn saves(effects: &[Effect]) -> Vec<&SettingsPayload> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::SaveSettings(payload) => Some(payload.as_ref()),
            _ => None,
        })
        .collect()
}

#[test]
fn burst_of_edits_is_saved_once_after_quiet_period() {
    let (state, _) = update(AppState::new(), Msg::Tick { now_ms: 10_000 });

    let mut state = state;
    for (i, keyword) in ["a", "ab", "abc"].into_iter().enumerate() {
        let (next, effects) = update(
            state,
            Msg::KeywordAdded {
                category: "BSMI".to_string(),
                value: keyword.to_string(),
            },
        );
        assert!(effects.is_empty());
        let (next, effects) = update(next, Msg::Tick { now_ms: 10_000 + 100 * (i as u64 + 1) });
        assert!(saves(&effects).is_empty());
        state = next;
    }

    let (state, effects) = update(state, Msg::Tick { now_ms: 10_200 + PERSIST_QUIET_MS - 1 });
    assert!(saves(&effects).is_empty());

    let (state, effects) = update(state, Msg::Tick { now_ms: 10_200 + PERSIST_QUIET_MS });
    let saved = saves(&effects);
    assert_eq!(saved.len(), 1);
    assert!(saved[0].config.bsmi_keywords.ends_with(&["abc".to_string()]));

    let (_state, effects) = update(state, Msg::Tick { now_ms: 20_000 });
    assert!(saves(&effects).is_empty());
}

#[test]
fn rejected_edits_do_not_schedule_a_save() {
    let (state, _) = update(AppState::new(), Msg::CategoryRemoved(0));
    let (state, _) = update(state, Msg::QueueItemMoved { from: 0, to: 1 });
    let (state, _) = update(
        state,
        Msg::KeywordAdded {
            category: "BSMI".to_string(),
            value: "   ".to_string(),
        },
    );
    assert!(!state.has_pending_save());
    let (_state, effects) = update(state, Msg::Tick { now_ms: 60_000 });
    assert!(effects.is_empty());
}

#[test]
fn close_flushes_pending_save_immediately() {
    let (state, _) = update(
        AppState::new(),
        Msg::DisplayChanged(DisplaySettings {
            theme: Theme::Dark,
            ..DisplaySettings::default()
        }),
    );
    let (state, effects) = update(state, Msg::CloseRequested);
    let saved = saves(&effects);
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].display.theme, Theme::Dark);

    let (_state, effects) = update(state, Msg::CloseRequested);
    assert!(effects.is_empty());
}

#[test]
fn replaced_config_is_renormalized() {
    let mut edited = AppState::new().config().clone();
    edited.keywords = vec!["BSMI".to_string(), "驗證碼".to_string()];
    edited.screenshot_delay = 5.0;

    let (state, _) = update(AppState::new(), Msg::ConfigReplaced(Box::new(edited)));
    let config = state.config();
    assert_eq!(config.keywords, vec!["登入", "BSMI", "拼圖與人機驗證", "查無資料"]);
    assert_eq!(config.screenshot_delay, 5.0);
    assert!(state.has_pending_save());
}

#[test]
fn output_directory_round_trip() {
    let (state, _) = update(
        AppState::new(),
        Msg::OutputDirSelected {
            path: "D:/shots/out".to_string(),
            display: "out".to_string(),
        },
    );
    assert_eq!(state.view().output_dir.as_deref(), Some("out"));
    let (state, _) = update(state, Msg::OutputDirCleared);
    assert_eq!(state.view().output_dir, None);
    assert_eq!(state.config().output_dir, None);
}
