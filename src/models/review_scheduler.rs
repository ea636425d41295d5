//! Per-item review statistics and their persistence.
//!
//! The scheduler keeps the whole `item id -> ReviewEntry` map in memory,
//! loaded once from the store, and writes the full map back after every
//! rating. Entries are created lazily on first rating, so an item that was
//! never rated is never reported as due.

use super::schedule::{self, Rating};
use super::{ItemId, ReviewEntry};
use crate::clock::Clock;
use crate::database::{self, KEY_REVIEW, PersistenceStore};
use crate::error::StoreError;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct ReviewScheduler {
    entries: BTreeMap<ItemId, ReviewEntry>,
    store: Arc<dyn PersistenceStore>,
    clock: Arc<dyn Clock>,
    last_save_error: Option<String>,
}

impl ReviewScheduler {
    /// Loads persisted review data. Missing or malformed data starts empty;
    /// out-of-range values are clamped.
    pub fn load(store: Arc<dyn PersistenceStore>, clock: Arc<dyn Clock>) -> Self {
        let raw: BTreeMap<ItemId, ReviewEntry> = database::load_json(store.as_ref(), KEY_REVIEW);
        let entries: BTreeMap<ItemId, ReviewEntry> = raw
            .into_iter()
            .map(|(id, entry)| {
                let clamped = entry.clamped();
                if clamped != entry {
                    warn!("Clamped out-of-range review data for item {}", id);
                }
                (id, clamped)
            })
            .collect();
        info!("Loaded review data for {} items", entries.len());
        Self {
            entries,
            store,
            clock,
            last_save_error: None,
        }
    }

    /// Records a recall rating for `item_id` and persists the updated map.
    ///
    /// A failed write is logged and kept in `last_save_error`; the in-memory
    /// update is kept either way.
    pub fn rate(&mut self, item_id: ItemId, rating: Rating) -> ReviewEntry {
        let now = self.clock.now_millis();
        let current = self.entries.get(&item_id).copied().unwrap_or_default();
        let updated = schedule::next_entry(&current, rating, now);
        self.entries.insert(item_id, updated);

        debug!(
            "Rated item {} as {}: interval {:.2} days, ease {:.2}",
            item_id,
            rating.as_str(),
            updated.interval,
            updated.ease_factor
        );

        self.persist();
        updated
    }

    /// Number of rated items whose next review is at or before `now`.
    pub fn due_count(&self, now: i64) -> usize {
        self.entries.values().filter(|e| e.is_due(now)).count()
    }

    pub fn is_due(&self, item_id: ItemId, now: i64) -> bool {
        self.entries
            .get(&item_id)
            .map(|e| e.is_due(now))
            .unwrap_or(false)
    }

    /// Ids of due items, ascending
    pub fn due_items(&self, now: i64) -> Vec<ItemId> {
        self.entries
            .iter()
            .filter(|(_, e)| e.is_due(now))
            .map(|(&id, _)| id)
            .collect()
    }

    pub fn entry(&self, item_id: ItemId) -> Option<&ReviewEntry> {
        self.entries.get(&item_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forgets all review progress and drops the stored document.
    pub fn reset(&mut self) {
        self.entries.clear();
        info!("Review progress reset");
        match self.store.remove(KEY_REVIEW) {
            Ok(()) => self.last_save_error = None,
            Err(e) => {
                warn!("Failed to remove review data: {}", e);
                self.last_save_error = Some(e.to_string());
            }
        }
    }

    /// Error message of the most recent failed write, cleared by the next
    /// successful one.
    pub fn last_save_error(&self) -> Option<&str> {
        self.last_save_error.as_deref()
    }

    fn persist(&mut self) {
        match self.save() {
            Ok(()) => self.last_save_error = None,
            Err(e) => {
                warn!("Failed to save review data: {}", e);
                self.last_save_error = Some(e.to_string());
            }
        }
    }

    fn save(&self) -> Result<(), StoreError> {
        database::save_json(self.store.as_ref(), KEY_REVIEW, &self.entries)
    }
}
