use std::fmt::Write;

use autoflow_core::{AppViewModel, DisplaySettings, NoticeLevel, Theme};

/// Plain-text summary of the view model for the `show` command.
pub fn render_overview(view: &AppViewModel, display: &DisplaySettings) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "分類 ({})", view.categories.len());
    for (index, row) in view.categories.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {index:>2}. {}{}{}  關鍵字 {}",
            row.name,
            if row.builtin { " [內建]" } else { "" },
            if row.paused { " [暫停]" } else { "" },
            row.keyword_count
        );
    }

    let collapsed = if view.queue_collapsed { " [收合]" } else { "" };
    let _ = writeln!(out, "工作佇列 ({}){collapsed}", view.queue.len());
    for row in &view.queue {
        let count = match (row.is_dir, row.url_count) {
            (true, _) => "資料夾".to_string(),
            (false, Some(count)) => format!("{count} URL"),
            (false, None) => "? URL".to_string(),
        };
        let _ = writeln!(out, "  {:>2}. {}  ({count})  {}", row.index, row.name, row.path);
    }

    let _ = writeln!(out, "預估剩餘時間: {}", view.eta_text);
    if let Some(dir) = &view.output_dir {
        let _ = writeln!(out, "輸出資料夾: {dir}");
    }
    let theme = match display.theme {
        Theme::Light => "light",
        Theme::Dark => "dark",
    };
    let _ = writeln!(out, "顯示: {theme}, 字級 {}", display.font_size);
    out
}

/// The latest notice, prefixed when it reports an error.
pub fn render_notice(view: &AppViewModel) -> Option<String> {
    view.notice.as_ref().map(|notice| match notice.level {
        NoticeLevel::Info => notice.text.clone(),
        NoticeLevel::Error => format!("錯誤: {}", notice.text),
    })
}
