//! Genre discovery results.

use std::sync::Arc;

use movos_catalog::{DiscoveryGenre, MediaGateway};
use movos_core::{MediaSummary, MediaType};
use parking_lot::Mutex;

use crate::paging::{LoadOutcome, PaginatedFeed};

#[derive(Debug, Default)]
struct GenreState {
    selected: Option<&'static DiscoveryGenre>,
    feed: PaginatedFeed,
    epoch: u64,
}

/// Paginated popular movies of one selected genre.
#[derive(Debug)]
pub struct GenrePipeline {
    gateway: Arc<dyn MediaGateway>,
    state: Mutex<GenreState>,
}

impl GenrePipeline {
    pub fn new(gateway: Arc<dyn MediaGateway>) -> Self {
        Self {
            gateway,
            state: Mutex::new(GenreState::default()),
        }
    }

    /// Selects `genre` and fetches its first page of movies.
    pub async fn select(&self, genre: &'static DiscoveryGenre) -> LoadOutcome {
        let epoch = {
            let mut state = self.state.lock();
            state.epoch += 1;
            state.selected = Some(genre);
            state.feed = PaginatedFeed::first_page_pending();
            state.epoch
        };

        let result = self
            .gateway
            .fetch_media_by_genre(genre.id, MediaType::Movie, 1)
            .await;

        let mut state = self.state.lock();
        if state.epoch != epoch {
            return LoadOutcome::Stale;
        }
        match result {
            Ok(items) => {
                let count = items.len();
                tracing::info!(genre = genre.name, results = count, "Genre selected");
                state.feed = PaginatedFeed::from_first_page(items);
                LoadOutcome::Loaded(count)
            }
            Err(e) => {
                tracing::warn!(genre = genre.name, error = %e, "Genre fetch failed");
                state.feed = PaginatedFeed::from_first_page(Vec::new());
                LoadOutcome::Failed
            }
        }
    }

    /// Appends the next page for the selected genre.
    pub async fn load_more(&self) -> LoadOutcome {
        let (genre, page, epoch) = {
            let mut state = self.state.lock();
            let Some(genre) = state.selected else {
                return LoadOutcome::NoContext;
            };
            if state.feed.is_loading() {
                return LoadOutcome::AlreadyLoading;
            }
            // Nothing to extend after a failed first page.
            if state.feed.is_empty() {
                return LoadOutcome::NoContext;
            }
            let Some(page) = state.feed.begin_load() else {
                return LoadOutcome::AlreadyLoading;
            };
            (genre, page, state.epoch)
        };

        let result = self
            .gateway
            .fetch_media_by_genre(genre.id, MediaType::Movie, page)
            .await;

        let mut state = self.state.lock();
        if state.epoch != epoch {
            tracing::debug!(genre = genre.name, page, "Discarding page for left genre");
            return LoadOutcome::Stale;
        }
        match result {
            Ok(items) => LoadOutcome::Loaded(state.feed.finish_load(items)),
            Err(e) => {
                state.feed.abort_load();
                tracing::warn!(genre = genre.name, page, error = %e, "Genre page failed");
                LoadOutcome::Failed
            }
        }
    }

    /// Leaves the genre view.
    pub fn back(&self) {
        let mut state = self.state.lock();
        state.epoch += 1;
        state.selected = None;
        state.feed = PaginatedFeed::from_first_page(Vec::new());
    }

    pub fn selected(&self) -> Option<&'static DiscoveryGenre> {
        self.state.lock().selected
    }

    pub fn items(&self) -> Vec<MediaSummary> {
        self.state.lock().feed.items().to_vec()
    }

    pub fn page(&self) -> u32 {
        self.state.lock().feed.page()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use movos_catalog::{Endpoint, ScriptedGateway};

    fn horror() -> &'static DiscoveryGenre {
        DiscoveryGenre::by_name("Horror").unwrap()
    }

    #[tokio::test]
    async fn test_select_and_load_more() {
        let gateway = Arc::new(ScriptedGateway::new());
        let genres = GenrePipeline::new(gateway.clone());

        assert_eq!(genres.select(horror()).await, LoadOutcome::Loaded(20));
        assert_eq!(genres.load_more().await, LoadOutcome::Loaded(20));
        assert_eq!(genres.items().len(), 40);
        assert_eq!(genres.page(), 2);
        assert_eq!(
            gateway.calls(),
            [(Endpoint::Genre(27), 1), (Endpoint::Genre(27), 2)]
        );
    }

    #[tokio::test]
    async fn test_back_discards_in_flight_page() {
        let gateway = Arc::new(ScriptedGateway::new());
        let genres = Arc::new(GenrePipeline::new(gateway.clone()));
        genres.select(horror()).await;
        gateway.hold(Endpoint::Genre(27), 2);

        let pending = {
            let genres = Arc::clone(&genres);
            tokio::spawn(async move { genres.load_more().await })
        };
        tokio::task::yield_now().await;
        genres.back();
        gateway.release(Endpoint::Genre(27), 2);

        assert_eq!(pending.await.unwrap(), LoadOutcome::Stale);
        assert!(genres.items().is_empty());
        assert_eq!(genres.page(), 1);
        assert_eq!(genres.load_more().await, LoadOutcome::NoContext);
    }

    #[tokio::test]
    async fn test_load_more_waits_for_first_page() {
        let gateway = Arc::new(ScriptedGateway::new());
        gateway.hold(Endpoint::Genre(27), 1);
        let genres = Arc::new(GenrePipeline::new(gateway.clone()));

        let selecting = {
            let genres = Arc::clone(&genres);
            tokio::spawn(async move { genres.select(horror()).await })
        };
        tokio::task::yield_now().await;
        assert_eq!(genres.load_more().await, LoadOutcome::AlreadyLoading);

        gateway.release(Endpoint::Genre(27), 1);
        assert_eq!(selecting.await.unwrap(), LoadOutcome::Loaded(20));
        assert_eq!(gateway.calls(), [(Endpoint::Genre(27), 1)]);
        assert_eq!(genres.load_more().await, LoadOutcome::Loaded(20));
        assert_eq!(genres.items()[20].id, "genre-27-20");
    }

    #[tokio::test]
    async fn test_failed_selection_is_not_extended() {
        let gateway = Arc::new(ScriptedGateway::new());
        gateway.fail(Endpoint::Genre(27), 1);
        let genres = GenrePipeline::new(gateway.clone());

        assert_eq!(genres.select(horror()).await, LoadOutcome::Failed);
        assert!(genres.items().is_empty());
        assert_eq!(genres.load_more().await, LoadOutcome::NoContext);

        gateway.recover(Endpoint::Genre(27), 1);
        assert_eq!(genres.select(horror()).await, LoadOutcome::Loaded(20));
        assert_eq!(genres.load_more().await, LoadOutcome::Loaded(20));
    }

    #[tokio::test]
    async fn test_newer_selection_wins() {
        let gateway = Arc::new(ScriptedGateway::new());
        gateway.hold(Endpoint::Genre(27), 1);
        let genres = Arc::new(GenrePipeline::new(gateway.clone()));

        let slow = {
            let genres = Arc::clone(&genres);
            tokio::spawn(async move { genres.select(horror()).await })
        };
        tokio::task::yield_now().await;
        let comedy = DiscoveryGenre::by_id(35).unwrap();
        assert_eq!(genres.select(comedy).await, LoadOutcome::Loaded(20));
        gateway.release(Endpoint::Genre(27), 1);

        assert_eq!(slow.await.unwrap(), LoadOutcome::Stale);
        assert_eq!(genres.selected().map(|genre| genre.id), Some(35));
        assert_eq!(genres.items()[0].id, "genre-35-0");
    }
}
