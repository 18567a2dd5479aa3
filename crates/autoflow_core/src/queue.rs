use std::collections::HashSet;

use autoflow_logging::flow_debug;
use serde::Serialize;

use crate::config::QueueEntry;

/// Outcome of a bulk enqueue, for "added N of M" feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EnqueueStats {
    pub added: usize,
    pub skipped: usize,
}

impl EnqueueStats {
    pub fn offered(&self) -> usize {
        self.added + self.skipped
    }
}

/// Ordered job queue keyed by path. Serialized as the plain `inputFiles` list.
///
/// The backend receives the whole queue at start and works through it from
/// index 0; finished entries are never popped here.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct JobQueue {
    entries: Vec<QueueEntry>,
}

impl JobQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a queue, keeping the first entry for each path.
    pub fn from_entries(entries: impl IntoIterator<Item = QueueEntry>) -> Self {
        let mut seen = HashSet::new();
        let entries = entries
            .into_iter()
            .filter(|entry| {
                let fresh = seen.insert(entry.path.clone());
                if !fresh {
                    flow_debug!("Dropping duplicate queue path {}", entry.path);
                }
                fresh
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[QueueEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&QueueEntry> {
        self.entries.get(index)
    }

    pub fn contains_path(&self, path: &str) -> bool {
        self.entries.iter().any(|entry| entry.path == path)
    }

    /// Append `entry` unless its path is already queued. Returns whether it was added.
    pub fn enqueue(&mut self, entry: QueueEntry) -> bool {
        if self.contains_path(&entry.path) {
            flow_debug!("Already queued: {}", entry.path);
            return false;
        }
        self.entries.push(entry);
        true
    }

    pub fn enqueue_many(&mut self, entries: impl IntoIterator<Item = QueueEntry>) -> EnqueueStats {
        let mut stats = EnqueueStats::default();
        for entry in entries {
            if self.enqueue(entry) {
                stats.added += 1;
            } else {
                stats.skipped += 1;
            }
        }
        stats
    }

    pub fn remove(&mut self, index: usize) -> Option<QueueEntry> {
        if index >= self.entries.len() {
            flow_debug!("Queue remove ignored: index {} out of range", index);
            return None;
        }
        Some(self.entries.remove(index))
    }

    /// Move the entry at `from` so that it ends up at `to` (list move, not swap).
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        let len = self.entries.len();
        if from == to || from >= len || to >= len {
            return false;
        }
        let moved = self.entries.remove(from);
        self.entries.insert(to, moved);
        true
    }

    /// Empty the queue, returning how many entries were dropped.
    pub fn clear(&mut self) -> usize {
        let dropped = self.entries.len();
        self.entries.clear();
        dropped
    }

    pub fn iter(&self) -> std::slice::Iter<'_, QueueEntry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a JobQueue {
    type Item = &'a QueueEntry;
    type IntoIter = std::slice::Iter<'a, QueueEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
