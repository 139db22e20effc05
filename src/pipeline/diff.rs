//! Diff calculation between the stored snapshot and the current page.
//!
//! Items are matched by `id` only. New items keep the order in which they
//! appear on the current page.

use std::collections::HashSet;

use crate::error::Result;
use crate::models::Item;
use crate::storage::SnapshotStore;

/// Outcome of comparing two snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffResult {
    /// Items on the current page whose id was not in the previous snapshot
    pub added: Vec<Item>,
    /// Ids from the previous snapshot that are no longer listed
    pub removed: Vec<String>,
}

impl DiffResult {
    /// Check if there are any changes.
    pub fn has_changes(&self) -> bool {
        !self.added.is_empty() || !self.removed.is_empty()
    }
}

/// Calculate the diff between previous and current snapshots.
pub fn calculate_diff(previous: &[Item], current: &[Item]) -> DiffResult {
    let prev_ids: HashSet<&str> = previous.iter().map(|i| i.id.as_str()).collect();
    let curr_ids: HashSet<&str> = current.iter().map(|i| i.id.as_str()).collect();

    let added = current
        .iter()
        .filter(|item| !prev_ids.contains(item.id.as_str()))
        .cloned()
        .collect();

    let mut seen = HashSet::new();
    let removed = previous
        .iter()
        .map(|i| i.id.as_str())
        .filter(|id| !curr_ids.contains(id) && seen.insert(*id))
        .map(str::to_string)
        .collect();

    DiffResult { added, removed }
}

/// Return the items of `current` not present in the stored snapshot, then
/// store `current` as the new baseline.
///
/// A missing snapshot counts as empty, so a first run reports every item.
/// The save happens whether or not anything new was found.
pub fn compute_new_items(current: &[Item], store: &impl SnapshotStore) -> Result<Vec<Item>> {
    let previous = store.load()?.unwrap_or_default();
    let diff = calculate_diff(&previous, current);

    if diff.has_changes() {
        log::info!(
            "Diff: {} added, {} removed",
            diff.added.len(),
            diff.removed.len()
        );
    }
    if !diff.removed.is_empty() {
        log::debug!("No longer listed: {}", diff.removed.join(", "));
    }

    store.save(current)?;
    Ok(diff.added)
}
