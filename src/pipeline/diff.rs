//! Diff calculation for new-asset detection.
//!
//! Computes the difference between the last snapshot and the current
//! mapping. Pure set arithmetic over identity keys: no I/O, no ordering.

use std::collections::HashSet;

use crate::models::AssetMapping;

/// Keys added and removed between two mappings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotDiff {
    /// In current but not in previous
    pub added: HashSet<String>,
    /// In previous but not in current
    pub removed: HashSet<String>,
}

impl SnapshotDiff {
    /// Check if there are any changes.
    pub fn has_changes(&self) -> bool {
        !self.added.is_empty() || !self.removed.is_empty()
    }

    /// Calculate the diff between previous and current mappings.
    pub fn calculate(previous: &AssetMapping, current: &AssetMapping) -> Self {
        Self {
            added: difference(current, previous),
            removed: difference(previous, current),
        }
    }
}

/// Keys of `left` that are absent from `right`.
fn difference(left: &AssetMapping, right: &AssetMapping) -> HashSet<String> {
    left.keys()
        .filter(|key| !right.contains_key(key))
        .cloned()
        .collect()
}

/// Identity keys present in `current` but absent from `previous`.
pub fn new_asset_keys(current: &AssetMapping, previous: &AssetMapping) -> HashSet<String> {
    difference(current, previous)
}
