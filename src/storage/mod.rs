//! Snapshot persistence.
//!
//! A snapshot is the full ordered item list from the most recent run. It is
//! overwritten on every run, never merged.
//!
//! ## File Layout
//!
//! ```text
//! current_bikes.json
//! {
//!   "updated_at": "2026-10-18T07:00:00Z",
//!   "count": 2,
//!   "items": [ { "id": "...", "name": "...", ... }, ... ]
//! }
//! ```

pub mod local;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::Item;

// Re-export for convenience
pub use local::LocalStorage;

/// Envelope written to disk around the item list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotData {
    /// ISO 8601 timestamp of the write
    pub updated_at: DateTime<Utc>,
    /// Item count, for humans reading the file
    pub count: usize,
    /// Items in page order
    pub items: Vec<Item>,
}

impl SnapshotData {
    pub fn new(items: Vec<Item>) -> Self {
        Self {
            updated_at: Utc::now(),
            count: items.len(),
            items,
        }
    }
}

/// Trait for snapshot storage backends.
pub trait SnapshotStore {
    /// Load the last saved snapshot, or `None` if there has never been one.
    fn load(&self) -> Result<Option<Vec<Item>>>;

    /// Replace the stored snapshot with `items`.
    fn save(&self, items: &[Item]) -> Result<()>;
}
