use compact_str::CompactString;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Viewport state of the workspace surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceMetrics {
    pub scroll_x: f64,
    pub scroll_y: f64,
    pub scale: f64,
}

impl Default for WorkspaceMetrics {
    fn default() -> Self {
        Self {
            scroll_x: 0.0,
            scroll_y: 0.0,
            scale: 1.0,
        }
    }
}

/// Saved viewport per target.
///
/// Writes produce a new store value; clones taken before a write keep seeing the old entries.
/// Entries are never evicted during a session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkspaceMetricsStore {
    entries: Arc<FxHashMap<CompactString, WorkspaceMetrics>>,
}

impl WorkspaceMetricsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, target_id: &str) -> Option<WorkspaceMetrics> {
        self.entries.get(target_id).copied()
    }

    pub fn contains(&self, target_id: &str) -> bool {
        self.entries.contains_key(target_id)
    }

    #[must_use]
    pub fn set(&self, target_id: &str, metrics: WorkspaceMetrics) -> Self {
        let mut entries = Arc::clone(&self.entries);
        Arc::make_mut(&mut entries).insert(CompactString::from(target_id), metrics);
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/metrics.rs"]
mod tests;
