use std::sync::Once;

use autoflow_core::{
    update, AppState, BackendCall, Effect, EnqueueStats, Msg, NoticeLevel, QueueEntry, RunStatus,
    TaskError, TaskStatus, CAPTCHA, LOGIN,
};
use serde_json::json;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(autoflow_logging::initialize_for_tests);
}

fn apply(state: AppState, msgs: Vec<Msg>) -> (AppState, Vec<Effect>) {
    msgs.into_iter().fold((state, Vec::new()), |(state, mut all), msg| {
        let (state, effects) = update(state, msg);
        all.extend(effects);
        (state, all)
    })
}

fn files(paths: &[&str]) -> Msg {
    Msg::FilesSelected(
        paths
            .iter()
            .map(|path| QueueEntry::file(*path, *path, Some(10)))
            .collect(),
    )
}

fn polled(status: RunStatus, processed: u64, errors: usize, now_ms: u64) -> Msg {
    Msg::StatusPolled {
        status: TaskStatus {
            processed,
            total: 10,
            status,
            errors: (0..errors)
                .map(|i| TaskError {
                    file: "list.txt".to_string(),
                    msg: format!("failed {i}"),
                    time: None,
                })
                .collect(),
            ..TaskStatus::default()
        },
        now_ms,
    }
}

#[test]
fn loaded_settings_are_migrated() {
    init_logging();
    let (mut state, effects) = update(
        AppState::new(),
        Msg::SettingsLoaded {
            config: Some(json!({
                "keywords": ["驗證碼", "登入", "BSMI"],
                "categoryPause": { "驗證碼": true },
            })),
            display: Some(json!({ "theme": "dark" })),
            queue_collapsed: Some(true),
        },
    );

    assert!(effects.is_empty());
    assert!(state.consume_dirty());
    assert!(!state.has_pending_save());
    let names: Vec<_> = state.view().categories.into_iter().map(|c| c.name).collect();
    assert_eq!(names, vec![LOGIN, CAPTCHA, "BSMI", "查無資料"]);
    assert!(state.view().categories[1].paused);
    assert!(state.view().queue_collapsed);
}

#[test]
fn selecting_files_reports_added_of_offered() {
    init_logging();
    let (state, _) = update(AppState::new(), files(&["a.txt", "b.txt"]));
    let (state, effects) = update(state, files(&["b.txt", "c.txt"]));

    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.queue.len(), 3);
    assert_eq!(view.last_enqueue, Some(EnqueueStats { added: 1, skipped: 1 }));
    assert_eq!(view.eta_text, "7 分鐘");
    assert!(state.has_pending_save());
}

#[test]
fn duplicate_directory_is_not_queued_twice() {
    init_logging();
    let pick = || Msg::DirectorySelected {
        path: "C:/lists".to_string(),
        name: "lists".to_string(),
    };
    let (state, _) = apply(AppState::new(), vec![pick(), pick()]);
    let view = state.view();
    assert_eq!(view.queue.len(), 1);
    assert!(view.queue[0].is_dir);
    assert_eq!(view.last_enqueue, Some(EnqueueStats { added: 0, skipped: 1 }));
}

#[test]
fn start_requires_queue_and_sends_whole_config() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::StartClicked);
    assert!(effects.is_empty());

    let (state, _) = update(state, files(&["a.txt", "b.txt"]));
    let (state, effects) = update(state, Msg::StartClicked);

    assert!(matches!(effects.first(), Some(Effect::SaveSettings(_))));
    let Some(Effect::StartTask { config }) = effects.last() else {
        panic!("expected StartTask, got {effects:?}");
    };
    assert_eq!(config.input_files.len(), 2);
    assert!(state.is_start_pending());
    assert!(!state.has_pending_save());

    // Double click before the backend answers.
    let (_state, effects) = update(state, Msg::StartClicked);
    assert!(effects.is_empty());
}

#[test]
fn failed_start_leaves_queue_and_config_untouched() {
    init_logging();
    let (state, _) = apply(AppState::new(), vec![files(&["a.txt"]), Msg::StartClicked]);
    let config_before = state.config().clone();

    let (state, effects) = update(
        state,
        Msg::BackendFailed {
            call: BackendCall::StartTask,
            message: "任務執行中".to_string(),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state.config(), &config_before);
    assert!(!state.is_start_pending());
    let notice = state.view().notice.expect("notice");
    assert_eq!(notice.level, NoticeLevel::Error);
    assert!(notice.text.contains("任務執行中"));
    assert!(state.view().can_start);
}

#[test]
fn stop_only_while_running_and_keeps_queue() {
    init_logging();
    let (state, effects) = apply(AppState::new(), vec![files(&["a.txt"]), Msg::StopClicked]);
    assert!(!effects.iter().any(|e| matches!(e, Effect::StopTask)));

    let (state, _) = update(state, polled(RunStatus::Running, 2, 0, 1_000));
    let (state, effects) = update(state, Msg::StopClicked);
    assert_eq!(effects, vec![Effect::StopTask]);
    assert_eq!(state.config().input_files.len(), 1);
}

#[test]
fn head_entry_removal_needs_confirmation_while_running() {
    init_logging();
    let (state, _) = apply(
        AppState::new(),
        vec![files(&["a.txt", "b.txt"]), polled(RunStatus::Running, 0, 0, 1_000)],
    );
    assert!(state.view().queue[0].processing);

    let (state, _) = update(
        state,
        Msg::QueueItemRemoved {
            index: 0,
            confirmed: false,
        },
    );
    assert_eq!(state.config().input_files.len(), 2);

    let (state, _) = update(
        state,
        Msg::QueueItemRemoved {
            index: 1,
            confirmed: false,
        },
    );
    assert_eq!(state.config().input_files.len(), 1);

    let (state, _) = update(
        state,
        Msg::QueueItemRemoved {
            index: 0,
            confirmed: true,
        },
    );
    assert!(state.config().input_files.is_empty());
}

#[test]
fn polled_errors_become_toasts_once() {
    init_logging();
    let (state, _) = apply(
        AppState::new(),
        vec![
            polled(RunStatus::Running, 0, 0, 1_000),
            polled(RunStatus::Running, 1, 1, 2_000),
            polled(RunStatus::Running, 2, 3, 4_000),
            polled(RunStatus::Running, 3, 3, 6_000),
        ],
    );
    let toasts = state.view().toasts;
    assert_eq!(toasts.len(), 3);
    assert_eq!(toasts[0].msg, "failed 0");
    assert_eq!(toasts[2].msg, "failed 2");

    let (state, _) = update(state, Msg::ToastDismissed(toasts[1].id));
    assert_eq!(state.view().toasts.len(), 2);

    // First toast created at 2000 ms expires at 8000 ms.
    let (state, _) = update(state, Msg::Tick { now_ms: 8_000 });
    assert_eq!(state.view().toasts.len(), 1);

    let (state, _) = apply(
        state,
        vec![
            polled(RunStatus::Idle, 0, 0, 9_000),
            polled(RunStatus::Running, 0, 1, 11_000),
        ],
    );
    assert_eq!(state.error_count_seen(), 1);
    let toasts = state.view().toasts;
    assert_eq!(toasts.len(), 2);
    assert_eq!(toasts.last().map(|t| t.id), Some(11_000));
}

#[test]
fn running_eta_discounts_processed_urls() {
    init_logging();
    let (state, _) = apply(
        AppState::new(),
        vec![files(&["a.txt"]), polled(RunStatus::Running, 5, 0, 1_000)],
    );
    // 5 remaining * 14 s = 70 s
    assert_eq!(state.view().eta_text, "1 分鐘");

    let (state, _) = update(state, polled(RunStatus::Running, 10, 0, 2_000));
    assert_eq!(state.view().eta_text, "--");
}

#[test]
fn category_messages_keep_invariants() {
    init_logging();
    let (state, _) = apply(
        AppState::new(),
        vec![
            Msg::CategoryAdded("自訂".to_string()),
            Msg::CategoryMoved { from: 4, to: 1 },
            Msg::CategoryMoved { from: 1, to: 0 },
            Msg::CategoryRemoved(0),
            Msg::KeywordAdded {
                category: "自訂".to_string(),
                value: " 缺貨 ".to_string(),
            },
            Msg::PauseToggled {
                category: "自訂".to_string(),
                enabled: true,
            },
        ],
    );
    let view = state.view();
    assert_eq!(view.categories[0].name, LOGIN);
    assert_eq!(view.categories[1].name, "自訂");
    assert_eq!(view.categories[1].keyword_count, 1);
    assert!(view.categories[1].paused);
    assert!(!view.categories[1].builtin);
}

#[test]
fn clear_done_log_targets_queued_path() {
    init_logging();
    let (state, _) = update(AppState::new(), files(&["a.txt", "b.txt"]));
    let (state, effects) = update(state, Msg::ClearDoneLogClicked(1));
    assert_eq!(
        effects,
        vec![Effect::ClearDoneLog {
            path: "b.txt".to_string()
        }]
    );
    let (_state, effects) = update(state, Msg::ClearDoneLogClicked(7));
    assert!(effects.is_empty());
}

#[test]
fn app_state_poll_updates_history_without_touching_config() {
    init_logging();
    let state = AppState::new();
    let before = state.config().clone();
    let (mut state, effects) = update(
        state,
        Msg::AppStatePolled {
            version: Some("v2.2.0".to_string()),
            history: vec![autoflow_core::HistoryEntry {
                id: "#AF-1".to_string(),
                name: "自動截圖任務".to_string(),
                status: "Completed".to_string(),
                ..Default::default()
            }],
            stats: Default::default(),
        },
    );
    assert!(effects.is_empty());
    assert!(state.consume_dirty());
    assert_eq!(state.config(), &before);
    assert!(!state.has_pending_save());
    let view = state.view();
    assert_eq!(view.version.as_deref(), Some("v2.2.0"));
    assert_eq!(view.history.len(), 1);
}

#[test]
fn accepted_start_stays_guarded_until_a_poll() {
    init_logging();
    let (state, _) = apply(AppState::new(), vec![files(&["a.txt"]), Msg::StartClicked]);
    let (state, _) = update(state, Msg::StartAccepted { message: None });
    assert!(state.is_start_pending());

    let (state, effects) = update(state, Msg::StartClicked);
    assert!(effects.is_empty(), "second start before any poll: {effects:?}");

    let (state, _) = update(state, polled(RunStatus::Running, 0, 0, 2_000));
    assert!(!state.is_start_pending());
    assert!(!state.view().can_start);

    // The run finishes; the queue can be started again.
    let (state, _) = update(state, polled(RunStatus::Idle, 10, 0, 4_000));
    assert!(state.view().can_start);
}

#[test]
fn idle_poll_after_acceptance_releases_the_start_guard() {
    init_logging();
    let (state, _) = apply(
        AppState::new(),
        vec![
            files(&["a.txt"]),
            Msg::StartClicked,
            Msg::StartAccepted { message: None },
            polled(RunStatus::Idle, 0, 0, 2_000),
        ],
    );
    assert!(!state.is_start_pending());
    let (_state, effects) = update(state, Msg::StartClicked);
    assert!(matches!(effects.last(), Some(Effect::StartTask { .. })));
}

#[test]
fn oversized_url_counts_in_settings_do_not_break_the_view() {
    init_logging();
    let (state, _) = update(
        AppState::new(),
        Msg::SettingsLoaded {
            config: Some(json!({
                "inputFiles": [
                    { "path": "a", "urlCount": u64::MAX },
                    { "path": "b", "urlCount": u64::MAX },
                    { "path": "c", "urlCount": 1 },
                ]
            })),
            display: None,
            queue_collapsed: None,
        },
    );
    let view = state.view();
    assert_eq!(view.queue.len(), 3);
    assert!(view.eta.is_some());
}

#[test]
fn collapse_toggle_is_saved_right_away_and_only_on_change() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::QueueCollapseToggled(true));
    assert_eq!(effects, vec![Effect::SaveQueueCollapsed(true)]);
    assert!(state.view().queue_collapsed);
    assert!(!state.has_pending_save());

    let (state, effects) = update(state, Msg::QueueCollapseToggled(true));
    assert!(effects.is_empty());

    let (_state, effects) = update(state, Msg::QueueCollapseToggled(false));
    assert_eq!(effects, vec![Effect::SaveQueueCollapsed(false)]);
}

#[test]
fn clearing_history_resets_history_and_stats() {
    init_logging();
    let (state, effects) = update(
        AppState::new(),
        Msg::AppStatePolled {
            version: None,
            history: vec![autoflow_core::HistoryEntry {
                id: "#AF-1".to_string(),
                status: "Error".to_string(),
                ..Default::default()
            }],
            stats: autoflow_core::Stats {
                total_tasks: 4,
                ..Default::default()
            },
        },
    );
    assert!(effects.is_empty());

    let (state, effects) = update(state, Msg::HistoryClearClicked);
    assert_eq!(effects, vec![Effect::ClearHistory]);
    assert_eq!(state.view().history.len(), 1, "cleared only once the backend confirms");

    let (state, _) = update(state, Msg::HistoryCleared { message: None });
    let view = state.view();
    assert!(view.history.is_empty());
    assert_eq!(view.stats, autoflow_core::Stats::default());
    assert_eq!(view.notice.map(|n| n.text).as_deref(), Some("歷史紀錄與統計數據已清除"));
}

#[test]
fn exported_history_reports_the_file() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::HistoryExportClicked);
    assert_eq!(effects, vec![Effect::ExportHistory]);

    let (state, effects) = update(
        state,
        Msg::HistoryExported {
            path: "/tmp/autoflow_history.csv".to_string(),
        },
    );
    assert!(effects.is_empty());
    let notice = state.view().notice.expect("notice");
    assert_eq!(notice.level, NoticeLevel::Info);
    assert!(notice.text.contains("/tmp/autoflow_history.csv"));
}
