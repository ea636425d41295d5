//! Key-value persistence for review data, reading progress and counters.
//!
//! Every component stores a single JSON document under a namespaced key,
//! mirroring a browser key-value store. Reads fall back to defaults on any
//! parse failure; writes always overwrite the full document.

pub mod db;
pub mod memory;

pub use db::SqliteStore;
pub use memory::MemoryStore;

use crate::error::StoreResult;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

pub const KEY_REVIEW: &str = "crown_sr";
pub const KEY_BOOKMARKS: &str = "crown_bookmarks";
pub const KEY_READ: &str = "crown_read";
pub const KEY_STREAK: &str = "crown_streak";
pub const KEY_LAST_VISIT: &str = "crown_last_visit";
pub const KEY_ACTIVITY: &str = "crown_activity";
pub const KEY_DHIKR_TOTALS: &str = "crown_dhikr_totals";
pub const KEY_DHIKR_SELECTED: &str = "crown_dhikr_selected";

/// String key-value store shared by all stateful components.
pub trait PersistenceStore: Send + Sync {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;
    fn remove(&self, key: &str) -> StoreResult<()>;
}

/// Reads and parses the JSON document under `key`.
///
/// Missing keys, read errors and malformed JSON all yield `T::default()`.
pub fn load_json<T>(store: &dyn PersistenceStore, key: &str) -> T
where
    T: DeserializeOwned + Default,
{
    match store.get(key) {
        Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!("Discarding malformed data under '{}': {}", key, e);
            T::default()
        }),
        Ok(None) => T::default(),
        Err(e) => {
            warn!("Failed to read '{}': {}", key, e);
            T::default()
        }
    }
}

/// Serializes `value` and overwrites the document under `key`. A value that
/// fails to serialize leaves the stored document untouched.
pub fn save_json<T: Serialize>(store: &dyn PersistenceStore, key: &str, value: &T) -> StoreResult<()> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use std::collections::{BTreeMap, HashMap};

    #[test]
    fn test_load_json_missing_key_defaults() {
        let store = MemoryStore::new();
        let ids: Vec<u32> = load_json(&store, KEY_READ);
        assert!(ids.is_empty());
    }

    #[test]
    fn test_load_json_malformed_defaults() {
        let store = MemoryStore::new();
        store.set(KEY_READ, "{ this is not valid json }").unwrap();
        let ids: Vec<u32> = load_json(&store, KEY_READ);
        assert!(ids.is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let store = MemoryStore::new();
        let mut totals = BTreeMap::new();
        totals.insert("subhanallah".to_string(), 33u64);
        save_json(&store, KEY_DHIKR_TOTALS, &totals).unwrap();

        let loaded: BTreeMap<String, u64> = load_json(&store, KEY_DHIKR_TOTALS);
        assert_eq!(loaded.get("subhanallah"), Some(&33));
    }

    #[test]
    fn test_save_json_unserializable_keeps_previous_document() {
        let store = MemoryStore::new();
        store.set(KEY_REVIEW, r#"{"1":{"interval":1.0,"easeFactor":2.0,"nextReview":0}}"#).unwrap();

        // Tuple keys cannot become JSON object keys
        let mut bad: HashMap<(u32, u32), u32> = HashMap::new();
        bad.insert((1, 2), 3);

        let result = save_json(&store, KEY_REVIEW, &bad);
        assert!(matches!(result, Err(StoreError::Json(_))));
        assert_eq!(
            store.get(KEY_REVIEW).unwrap().as_deref(),
            Some(r#"{"1":{"interval":1.0,"easeFactor":2.0,"nextReview":0}}"#)
        );
    }
}
