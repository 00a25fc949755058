//! Search box, suggestions and paginated results.
//!
//! Typing restarts a debounce timer; once input goes quiet the first page for
//! the query is fetched and its first few items become suggestions. Submitting
//! records the query in the persisted history and replaces the result list.
//! Responses that belong to an older keystroke or submission are dropped.

use std::sync::Arc;

use movos_catalog::MediaGateway;
use movos_core::config::BrowseConfig;
use movos_core::{MediaSummary, PreferenceStore, SearchHistory};
use parking_lot::Mutex;

use crate::debounce::Debouncer;
use crate::paging::{LoadOutcome, PaginatedFeed};

/// Where the search box is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchPhase {
    #[default]
    Idle,
    Typing,
    Submitted,
    LoadingMore,
}

#[derive(Debug, Default)]
struct SearchState {
    query: String,
    suggestions: Vec<MediaSummary>,
    suggestions_visible: bool,
    submitted: Option<String>,
    results: PaginatedFeed,
    submission: u64,
    searching: bool,
    history: SearchHistory,
}

#[derive(Debug)]
struct Shared {
    gateway: Arc<dyn MediaGateway>,
    store: Arc<dyn PreferenceStore>,
    debouncer: Debouncer,
    suggestion_limit: usize,
    min_suggestion_chars: usize,
    state: Mutex<SearchState>,
}

/// Search state shared between the search box and the results grid.
#[derive(Debug, Clone)]
pub struct SearchPipeline {
    shared: Arc<Shared>,
}

impl SearchPipeline {
    /// Creates the pipeline with history restored from `store`.
    pub fn new(
        gateway: Arc<dyn MediaGateway>,
        store: Arc<dyn PreferenceStore>,
        config: &BrowseConfig,
    ) -> Self {
        let history = SearchHistory::restore(store.as_ref()).unwrap_or_else(|e| {
            tracing::error!(error = %e, "Could not read search history, starting empty");
            SearchHistory::new()
        });

        Self {
            shared: Arc::new(Shared {
                gateway,
                store,
                debouncer: Debouncer::new(config.search_debounce),
                suggestion_limit: config.suggestion_limit,
                min_suggestion_chars: config.min_suggestion_chars,
                state: Mutex::new(SearchState {
                    history,
                    ..SearchState::default()
                }),
            }),
        }
    }

    /// Updates the query text and restarts the suggestion timer.
    pub fn input(&self, text: &str) {
        let mut state = self.shared.state.lock();
        state.query = text.to_string();
        state.suggestions_visible = !text.trim().is_empty();
        if !state.suggestions_visible {
            state.suggestions.clear();
        }

        // Generations only move under the state lock, so a fetch that checks
        // freshness under the same lock cannot write over a newer keystroke.
        let shared = Arc::clone(&self.shared);
        let query = text.trim().to_string();
        self.shared.debouncer.schedule(move |generation| async move {
            shared.refresh_suggestions(generation, query).await;
        });
    }

    /// Runs the current query as a full search.
    ///
    /// Blank queries do nothing. Returns `Stale` when a newer submission or a
    /// clear happened before the results arrived.
    pub async fn submit(&self) -> LoadOutcome {
        let query = self.shared.state.lock().query.trim().to_string();
        if query.is_empty() {
            return LoadOutcome::NoContext;
        }
        self.run_submission(query).await
    }

    /// Re-runs a history entry.
    pub async fn select_history(&self, term: &str) -> LoadOutcome {
        self.shared.state.lock().query = term.to_string();
        self.submit().await
    }

    /// Removes one entry from the history.
    pub fn remove_history(&self, term: &str) -> bool {
        let mut state = self.shared.state.lock();
        let removed = state.history.remove(term);
        if removed {
            self.shared.persist_history(&state.history);
        }
        removed
    }

    async fn run_submission(&self, query: String) -> LoadOutcome {
        let submission = {
            let mut state = self.shared.state.lock();
            self.shared.debouncer.cancel();
            state.suggestions_visible = false;
            state.history.record(&query);
            self.shared.persist_history(&state.history);
            state.submission += 1;
            state.searching = true;
            state.submitted = Some(query.clone());
            state.results = PaginatedFeed::from_first_page(Vec::new());
            state.submission
        };

        let result = self.shared.gateway.search_media(&query, 1).await;

        let mut state = self.shared.state.lock();
        if state.submission != submission {
            tracing::debug!(%query, "Discarding results for superseded search");
            return LoadOutcome::Stale;
        }
        state.searching = false;
        match result {
            Ok(items) => {
                let count = items.len();
                tracing::info!(%query, results = count, "Search completed");
                state.results = PaginatedFeed::from_first_page(items);
                LoadOutcome::Loaded(count)
            }
            Err(e) => {
                tracing::warn!(%query, error = %e, "Search failed");
                LoadOutcome::Failed
            }
        }
    }

    /// Appends the next page of results for the submitted query.
    pub async fn load_more(&self) -> LoadOutcome {
        let (query, page, submission) = {
            let mut state = self.shared.state.lock();
            let Some(query) = state.submitted.clone() else {
                return LoadOutcome::NoContext;
            };
            if state.results.is_empty() {
                return LoadOutcome::NoContext;
            }
            let Some(page) = state.results.begin_load() else {
                return LoadOutcome::AlreadyLoading;
            };
            (query, page, state.submission)
        };

        let result = self.shared.gateway.search_media(&query, page).await;

        let mut state = self.shared.state.lock();
        if state.submission != submission {
            return LoadOutcome::Stale;
        }
        match result {
            Ok(items) => {
                let added = state.results.finish_load(items);
                tracing::debug!(%query, page, added, "Search page loaded");
                LoadOutcome::Loaded(added)
            }
            Err(e) => {
                state.results.abort_load();
                tracing::warn!(%query, page, error = %e, "Search page failed");
                LoadOutcome::Failed
            }
        }
    }

    /// Resets query, suggestions and results.
    pub fn clear(&self) {
        let mut state = self.shared.state.lock();
        self.shared.debouncer.cancel();
        let history = std::mem::take(&mut state.history);
        let submission = state.submission + 1;
        *state = SearchState {
            history,
            submission,
            ..SearchState::default()
        };
    }

    pub fn query(&self) -> String {
        self.shared.state.lock().query.clone()
    }

    pub fn suggestions(&self) -> Vec<MediaSummary> {
        self.shared.state.lock().suggestions.clone()
    }

    pub fn suggestions_visible(&self) -> bool {
        self.shared.state.lock().suggestions_visible
    }

    pub fn results(&self) -> Vec<MediaSummary> {
        self.shared.state.lock().results.items().to_vec()
    }

    pub fn has_results(&self) -> bool {
        !self.shared.state.lock().results.is_empty()
    }

    /// Highest result page loaded.
    pub fn page(&self) -> u32 {
        self.shared.state.lock().results.page()
    }

    pub fn is_searching(&self) -> bool {
        self.shared.state.lock().searching
    }

    /// Query that produced the current results.
    pub fn submitted_query(&self) -> Option<String> {
        self.shared.state.lock().submitted.clone()
    }

    pub fn history(&self) -> Vec<String> {
        self.shared.state.lock().history.entries().to_vec()
    }

    pub fn phase(&self) -> SearchPhase {
        let state = self.shared.state.lock();
        if state.results.is_loading() {
            SearchPhase::LoadingMore
        } else if state.submitted.is_some() {
            SearchPhase::Submitted
        } else if !state.query.is_empty() {
            SearchPhase::Typing
        } else {
            SearchPhase::Idle
        }
    }
}

impl Shared {
    async fn refresh_suggestions(&self, generation: u64, query: String) {
        let result = if query.chars().count() <= self.min_suggestion_chars {
            Ok(Vec::new())
        } else {
            self.gateway.search_media(&query, 1).await
        };

        let mut state = self.state.lock();
        if !self.debouncer.is_current(generation) {
            tracing::trace!(%query, "Dropping suggestions for an older keystroke");
            return;
        }
        match result {
            Ok(mut items) => {
                items.truncate(self.suggestion_limit);
                state.suggestions = items;
            }
            Err(e) => {
                tracing::warn!(%query, error = %e, "Suggestion fetch failed");
                state.suggestions.clear();
            }
        }
    }

    fn persist_history(&self, history: &SearchHistory) {
        if let Err(e) = history.persist(self.store.as_ref()) {
            tracing::warn!(error = %e, "Could not store search history");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use movos_catalog::{Endpoint, ScriptedGateway};
    use movos_core::storage::{MemoryStore, keys};
    use movos_core::test_fixtures::page_of;

    fn pipeline(gateway: Arc<ScriptedGateway>, store: Arc<MemoryStore>) -> SearchPipeline {
        SearchPipeline::new(gateway, store, &BrowseConfig::default())
    }

    fn ids(items: &[MediaSummary]) -> Vec<String> {
        items.iter().map(|item| item.id.clone()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_suggestions_follow_last_keystroke() {
        let gateway = Arc::new(ScriptedGateway::new());
        let search = pipeline(gateway.clone(), Arc::new(MemoryStore::new()));

        search.input("du");
        tokio::time::sleep(Duration::from_millis(100)).await;
        search.input("dun");
        tokio::time::sleep(Duration::from_millis(100)).await;
        search.input("dune");
        tokio::time::sleep(Duration::from_millis(500)).await;

        assert!(search.suggestions_visible());
        assert_eq!(
            ids(&search.suggestions()),
            ["search-dune-0", "search-dune-1", "search-dune-2", "search-dune-3"]
        );
        assert_eq!(
            gateway.calls(),
            [(Endpoint::Search("dune".to_string()), 1)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_suggestion_does_not_overwrite_newer_one() {
        let gateway = Arc::new(ScriptedGateway::new());
        gateway.delay(Endpoint::Search("alien".to_string()), Duration::from_secs(2));
        let search = pipeline(gateway.clone(), Arc::new(MemoryStore::new()));

        search.input("alien");
        tokio::time::sleep(Duration::from_millis(500)).await;
        search.input("aliens");
        tokio::time::sleep(Duration::from_secs(3)).await;

        assert_eq!(search.suggestions()[0].id, "search-aliens-0");
        assert_eq!(gateway.call_count(&Endpoint::Search("alien".to_string())), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_keystroke_during_fetch_discards_its_suggestions() {
        let gateway = Arc::new(ScriptedGateway::new());
        gateway.hold(Endpoint::Search("dune".to_string()), 1);
        let search = pipeline(gateway.clone(), Arc::new(MemoryStore::new()));

        search.input("dune");
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(gateway.call_count(&Endpoint::Search("dune".to_string())), 1);

        search.input("d");
        gateway.release(Endpoint::Search("dune".to_string()), 1);
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(search.suggestions().is_empty());

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(search.suggestions().is_empty());
        assert_eq!(search.query(), "d");
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_or_blank_input_clears_suggestions() {
        let gateway = Arc::new(ScriptedGateway::new());
        let search = pipeline(gateway.clone(), Arc::new(MemoryStore::new()));

        search.input("x");
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(search.suggestions().is_empty());
        assert!(search.suggestions_visible());

        search.input("   ");
        assert!(!search.suggestions_visible());
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn test_submit_records_history_and_loads_more() {
        let gateway = Arc::new(ScriptedGateway::new());
        let store = Arc::new(MemoryStore::new());
        let search = pipeline(gateway.clone(), store.clone());

        search.input("  Dune ");
        assert_eq!(search.submit().await, LoadOutcome::Loaded(20));
        assert!(!search.suggestions_visible());
        assert_eq!(search.history(), ["Dune"]);
        assert!(store.get(keys::SEARCH_HISTORY).unwrap().is_some());

        assert_eq!(search.load_more().await, LoadOutcome::Loaded(20));
        assert_eq!(search.results().len(), 40);
        assert_eq!(search.page(), 2);
        assert_eq!(search.phase(), SearchPhase::Submitted);

        search.input("dune");
        search.submit().await;
        assert_eq!(search.history(), ["dune"]);
        assert_eq!(search.page(), 1);
    }

    #[tokio::test]
    async fn test_blank_submit_is_noop() {
        let gateway = Arc::new(ScriptedGateway::new());
        let search = pipeline(gateway.clone(), Arc::new(MemoryStore::new()));

        search.input("   ");
        assert_eq!(search.submit().await, LoadOutcome::NoContext);
        assert!(search.history().is_empty());
        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn test_older_submission_is_discarded() {
        let gateway = Arc::new(ScriptedGateway::new());
        gateway.hold(Endpoint::Search("heat".to_string()), 1);
        gateway.set_page(Endpoint::Search("ronin".to_string()), 1, page_of("ronin", 0, 3));
        let search = pipeline(gateway.clone(), Arc::new(MemoryStore::new()));

        search.input("heat");
        let slow = {
            let search = search.clone();
            tokio::spawn(async move { search.submit().await })
        };
        tokio::task::yield_now().await;

        search.input("ronin");
        assert_eq!(search.submit().await, LoadOutcome::Loaded(3));
        gateway.release(Endpoint::Search("heat".to_string()), 1);

        assert_eq!(slow.await.unwrap(), LoadOutcome::Stale);
        assert_eq!(ids(&search.results()), ["ronin-0", "ronin-1", "ronin-2"]);
        assert_eq!(search.history(), ["ronin", "heat"]);
    }

    #[tokio::test]
    async fn test_history_selection_and_removal() {
        let gateway = Arc::new(ScriptedGateway::new());
        let store = Arc::new(MemoryStore::new());
        let search = pipeline(gateway.clone(), store.clone());

        for term in ["alien", "heat", "dune"] {
            search.input(term);
            search.submit().await;
        }
        assert_eq!(search.select_history("alien").await, LoadOutcome::Loaded(20));
        assert_eq!(search.query(), "alien");
        assert_eq!(search.history(), ["alien", "dune", "heat"]);

        assert!(search.remove_history("heat"));
        assert!(!search.remove_history("heat"));
        let restored = pipeline(gateway, store);
        assert_eq!(restored.history(), ["alien", "dune"]);
    }

    #[tokio::test]
    async fn test_clear_resets_everything_but_history() {
        let gateway = Arc::new(ScriptedGateway::new());
        let search = pipeline(gateway, Arc::new(MemoryStore::new()));

        search.input("dune");
        search.submit().await;
        search.clear();

        assert_eq!(search.query(), "");
        assert!(search.results().is_empty());
        assert_eq!(search.phase(), SearchPhase::Idle);
        assert_eq!(search.load_more().await, LoadOutcome::NoContext);
        assert_eq!(search.history(), ["dune"]);
    }

    #[tokio::test]
    async fn test_corrupt_history_starts_empty() {
        let store = Arc::new(MemoryStore::new());
        store.set(keys::SEARCH_HISTORY, "{not json").unwrap();
        let search = pipeline(Arc::new(ScriptedGateway::new()), store);
        assert!(search.history().is_empty());
    }
}
