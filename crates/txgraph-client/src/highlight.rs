//! Timestamp-based highlight decay.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// How long a highlight stays visible.
pub const HIGHLIGHT_WINDOW: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq)]
struct Highlight {
    started: Instant,
    emphasized: bool,
}

/// Keys marked at some instant fade out over a fixed window.
///
/// Nothing is stored as a flag: whether a key is lit is derived from the
/// elapsed time, and `prune_at` drops the expired entries.
#[derive(Debug, Clone)]
pub struct HighlightTracker {
    window: Duration,
    entries: HashMap<String, Highlight>,
}

impl Default for HighlightTracker {
    fn default() -> Self {
        Self::new(HIGHLIGHT_WINDOW)
    }
}

impl HighlightTracker {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            entries: HashMap::new(),
        }
    }

    /// Start (or restart) the highlight for `key`.
    pub fn mark_at(&mut self, key: impl Into<String>, now: Instant, emphasized: bool) {
        self.entries.insert(key.into(), Highlight { started: now, emphasized });
    }

    /// Fraction of the window elapsed, in `[0, 1)`, while `key` is lit.
    pub fn progress_at(&self, key: &str, now: Instant) -> Option<f64> {
        let highlight = self.entries.get(key)?;
        let elapsed = now.saturating_duration_since(highlight.started);
        if elapsed >= self.window {
            return None;
        }
        Some(elapsed.as_secs_f64() / self.window.as_secs_f64())
    }

    pub fn is_emphasized(&self, key: &str) -> bool {
        self.entries.get(key).is_some_and(|h| h.emphasized)
    }

    /// Drop expired entries, returning how many were removed.
    pub fn prune_at(&mut self, now: Instant) -> usize {
        let window = self.window;
        let before = self.entries.len();
        self.entries
            .retain(|_, h| now.saturating_duration_since(h.started) < window);
        before - self.entries.len()
    }

    /// Whether any entry is still tracked, expired or not.
    pub fn has_entries(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Keys lit at `now`, sorted.
    pub fn active_at(&self, now: Instant) -> Vec<String> {
        let mut keys: Vec<String> = self
            .entries
            .keys()
            .filter(|k| self.progress_at(k, now).is_some())
            .cloned()
            .collect();
        keys.sort();
        keys
    }
}
