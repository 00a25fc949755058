//! Per-user collections: search history, recently viewed and saved titles.
//!
//! Each collection is a plain value type with its ordering and bounding
//! rules; `restore`/`persist` move it to and from a [`PreferenceStore`].

use serde::{Deserialize, Serialize};

use crate::media::MediaSummary;
use crate::storage::{PreferenceStore, StorageError, keys, load_json, save_json};

/// Maximum number of remembered search queries.
pub const SEARCH_HISTORY_LIMIT: usize = 5;

/// Maximum number of recently viewed titles.
pub const RECENTLY_VIEWED_LIMIT: usize = 30;

/// Submitted search queries, most recent first.
///
/// Queries are trimmed and deduplicated case-insensitively; re-submitting a
/// query moves it to the front with the newest casing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchHistory {
    entries: Vec<String>,
}

impl SearchHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a query. Blank queries are ignored.
    pub fn record(&mut self, query: &str) {
        let clean = query.trim();
        if clean.is_empty() {
            return;
        }
        let lowered = clean.to_lowercase();
        self.entries.retain(|entry| entry.to_lowercase() != lowered);
        self.entries.insert(0, clean.to_string());
        self.entries.truncate(SEARCH_HISTORY_LIMIT);
    }

    /// Removes an exact entry, returning whether it was present.
    pub fn remove(&mut self, term: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry != term);
        before != self.entries.len()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Loads the stored history, falling back to empty on corrupt data.
    ///
    /// # Errors
    ///
    /// - `StorageError::Io` - If the store could not be read
    pub fn restore(store: &dyn PreferenceStore) -> Result<Self, StorageError> {
        restore_or_default(store, keys::SEARCH_HISTORY)
    }

    /// # Errors
    ///
    /// - `StorageError::Io` - If the store could not be written
    pub fn persist(&self, store: &dyn PreferenceStore) -> Result<(), StorageError> {
        save_json(store, keys::SEARCH_HISTORY, self)
    }
}

/// Recently opened titles, most recent first, at most 30.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecentlyViewedLog {
    items: Vec<MediaSummary>,
}

impl RecentlyViewedLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves `item` to the front, evicting the oldest beyond the limit.
    pub fn record(&mut self, item: MediaSummary) {
        self.items.retain(|existing| existing.id != item.id);
        self.items.insert(0, item);
        self.items.truncate(RECENTLY_VIEWED_LIMIT);
    }

    pub fn items(&self) -> &[MediaSummary] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// # Errors
    ///
    /// - `StorageError::Io` - If the store could not be read
    pub fn restore(store: &dyn PreferenceStore) -> Result<Self, StorageError> {
        restore_or_default(store, keys::RECENTLY_VIEWED)
    }

    /// # Errors
    ///
    /// - `StorageError::Io` - If the store could not be written
    pub fn persist(&self, store: &dyn PreferenceStore) -> Result<(), StorageError> {
        save_json(store, keys::RECENTLY_VIEWED, self)
    }
}

/// Result of toggling a title's saved state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveToggle {
    Saved,
    Removed,
}

/// Saved titles keyed by id, in the order they were saved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SavedSet {
    items: Vec<MediaSummary>,
}

impl SavedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.iter().any(|item| item.id == id)
    }

    /// Saves the title if absent, removes it otherwise.
    pub fn toggle(&mut self, item: &MediaSummary) -> SaveToggle {
        if self.contains(&item.id) {
            self.items.retain(|existing| existing.id != item.id);
            SaveToggle::Removed
        } else {
            self.items.push(item.clone());
            SaveToggle::Saved
        }
    }

    pub fn items(&self) -> &[MediaSummary] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// # Errors
    ///
    /// - `StorageError::Io` - If the store could not be read
    pub fn restore(store: &dyn PreferenceStore) -> Result<Self, StorageError> {
        restore_or_default(store, keys::SAVED)
    }

    /// # Errors
    ///
    /// - `StorageError::Io` - If the store could not be written
    pub fn persist(&self, store: &dyn PreferenceStore) -> Result<(), StorageError> {
        save_json(store, keys::SAVED, self)
    }
}

fn restore_or_default<T>(store: &dyn PreferenceStore, key: &str) -> Result<T, StorageError>
where
    T: Default + serde::de::DeserializeOwned,
{
    match load_json(store, key) {
        Ok(value) => Ok(value.unwrap_or_default()),
        Err(StorageError::Corrupt { key, reason }) => {
            tracing::error!(%key, %reason, "Discarding unreadable stored collection");
            Ok(T::default())
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::MediaType;
    use crate::storage::MemoryStore;
    use crate::test_fixtures::summary;
    use proptest::prelude::*;

    #[test]
    fn test_history_case_insensitive_dedup_keeps_latest_casing() {
        let mut history = SearchHistory::new();
        history.record("Dune");
        history.record("dune");

        assert_eq!(history.entries(), ["dune".to_string()]);
    }

    #[test]
    fn test_history_evicts_oldest_beyond_five() {
        let mut history = SearchHistory::new();
        for query in ["a1", "b2", "c3", "d4", "e5", "f6"] {
            history.record(query);
        }

        assert_eq!(history.len(), SEARCH_HISTORY_LIMIT);
        assert_eq!(history.entries()[0], "f6");
        assert!(!history.entries().contains(&"a1".to_string()));
    }

    #[test]
    fn test_history_trims_and_ignores_blank() {
        let mut history = SearchHistory::new();
        history.record("   ");
        history.record("  alien  ");

        assert_eq!(history.entries(), ["alien".to_string()]);
        assert!(history.remove("alien"));
        assert!(history.is_empty());
    }

    #[test]
    fn test_recently_viewed_moves_repeat_to_front() {
        let mut log = RecentlyViewedLog::new();
        log.record(summary("1", MediaType::Movie, None));
        log.record(summary("2", MediaType::Tv, None));
        log.record(summary("1", MediaType::Movie, None));

        let ids: Vec<_> = log.items().iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, ["1", "2"]);
    }

    #[test]
    fn test_recently_viewed_bounded_to_thirty() {
        let mut log = RecentlyViewedLog::new();
        for n in 0..31 {
            log.record(summary(&n.to_string(), MediaType::Movie, None));
        }

        assert_eq!(log.len(), RECENTLY_VIEWED_LIMIT);
        assert_eq!(log.items()[0].id, "30");
        assert!(log.items().iter().all(|item| item.id != "0"));
    }

    #[test]
    fn test_saved_set_toggle() {
        let mut saved = SavedSet::new();
        let item = summary("42", MediaType::Movie, None);

        assert_eq!(saved.toggle(&item), SaveToggle::Saved);
        assert!(saved.contains("42"));
        assert_eq!(saved.toggle(&item), SaveToggle::Removed);
        assert!(saved.is_empty());
    }

    #[test]
    fn test_collections_persist_and_restore() {
        let store = MemoryStore::new();

        let mut saved = SavedSet::new();
        saved.toggle(&summary("7", MediaType::Tv, None));
        saved.persist(&store).unwrap();

        let mut history = SearchHistory::new();
        history.record("Heat");
        history.persist(&store).unwrap();

        assert_eq!(SavedSet::restore(&store).unwrap(), saved);
        assert_eq!(SearchHistory::restore(&store).unwrap(), history);
        assert!(RecentlyViewedLog::restore(&store).unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_history_restores_empty() {
        let store = MemoryStore::new();
        store.set(keys::SEARCH_HISTORY, "not-json").unwrap();

        assert!(SearchHistory::restore(&store).unwrap().is_empty());
    }

    proptest! {
        #[test]
        fn prop_history_bounded_and_unique(queries in proptest::collection::vec("[a-cA-C]{1,3}", 0..40)) {
            let mut history = SearchHistory::new();
            for query in &queries {
                history.record(query);
            }

            prop_assert!(history.len() <= SEARCH_HISTORY_LIMIT);
            let mut lowered: Vec<_> = history.entries().iter().map(|e| e.to_lowercase()).collect();
            lowered.sort();
            lowered.dedup();
            prop_assert_eq!(lowered.len(), history.len());
            if let Some(last) = queries.last() {
                prop_assert_eq!(&history.entries()[0], last);
            }
        }

        #[test]
        fn prop_recently_viewed_bounded_and_unique(ids in proptest::collection::vec(0u8..50, 0..80)) {
            let mut log = RecentlyViewedLog::new();
            for id in &ids {
                log.record(summary(&id.to_string(), MediaType::Movie, None));
            }

            prop_assert!(log.len() <= RECENTLY_VIEWED_LIMIT);
            let mut seen: Vec<_> = log.items().iter().map(|item| item.id.clone()).collect();
            seen.sort();
            seen.dedup();
            prop_assert_eq!(seen.len(), log.len());
            if let Some(last) = ids.last() {
                prop_assert_eq!(&log.items()[0].id, &last.to_string());
            }
        }
    }
}
