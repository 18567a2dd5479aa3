use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use autoflow_core::{Msg, QueueEntry};
use autoflow_logging::flow_debug;

/// Count lines that hold a URL: non-empty after trimming and not a `#` comment.
pub fn count_valid_urls(content: &str) -> u64 {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .count() as u64
}

/// Turn command-line paths into the messages a file or folder dialog would
/// produce: all files in one `FilesSelected`, one `DirectorySelected` per folder.
pub fn selection_msgs<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<Msg>> {
    let mut files = Vec::new();
    let mut msgs = Vec::new();

    for path in paths {
        let path = path.as_ref();
        let resolved = fs::canonicalize(path)
            .with_context(|| format!("cannot resolve {}", path.display()))?;
        let name = display_name(&resolved);
        let resolved_str = resolved.to_string_lossy().into_owned();

        if resolved.is_dir() {
            msgs.push(Msg::DirectorySelected {
                path: resolved_str,
                name,
            });
        } else {
            let bytes = fs::read(&resolved)
                .with_context(|| format!("cannot read {}", resolved.display()))?;
            let url_count = count_valid_urls(&String::from_utf8_lossy(&bytes));
            flow_debug!("{} holds {} URLs", resolved.display(), url_count);
            files.push(QueueEntry::file(resolved_str, name, Some(url_count)));
        }
    }

    if !files.is_empty() {
        msgs.insert(0, Msg::FilesSelected(files));
    }
    Ok(msgs)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
