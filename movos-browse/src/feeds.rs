//! Home feeds and the "see all" view.
//!
//! The home screen shows five feeds fetched concurrently. Any one of them can
//! be expanded into a paginated "see all" list, which pulls further pages from
//! the same source the feed came from.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use movos_catalog::{FeedCategory, MediaGateway};
use movos_core::storage::{keys, load_json, save_json};
use movos_core::{MediaSummary, PreferenceStore, RecentlyViewedLog};
use parking_lot::Mutex;

use crate::notifications::{NotificationCenter, ToastKind, new_content_message};
use crate::paging::{LoadOutcome, PaginatedFeed};

/// What a home load produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HomeReport {
    /// Mixed releases newer than the previous visit; zero on a first visit.
    pub new_titles: usize,
    /// Feeds that failed and are shown empty.
    pub failed: Vec<FeedCategory>,
    /// Recently viewed titles restored from the store.
    pub recently_viewed: Vec<MediaSummary>,
}

#[derive(Debug)]
struct SeeAll {
    category: FeedCategory,
    feed: PaginatedFeed,
    epoch: u64,
}

#[derive(Debug, Default)]
struct FeedState {
    home: HashMap<FeedCategory, Vec<MediaSummary>>,
    see_all: Option<SeeAll>,
    epoch: u64,
    loading_home: bool,
}

/// Owns the home feeds and the expanded category.
#[derive(Debug)]
pub struct FeedOrchestrator {
    gateway: Arc<dyn MediaGateway>,
    store: Arc<dyn PreferenceStore>,
    notifications: NotificationCenter,
    notification_delay: Duration,
    state: Mutex<FeedState>,
}

impl FeedOrchestrator {
    pub fn new(
        gateway: Arc<dyn MediaGateway>,
        store: Arc<dyn PreferenceStore>,
        notifications: NotificationCenter,
        notification_delay: Duration,
    ) -> Self {
        Self {
            gateway,
            store,
            notifications,
            notification_delay,
            state: Mutex::new(FeedState::default()),
        }
    }

    /// Fetches all five feeds and announces titles new since the last visit.
    ///
    /// A failing feed is left empty; the others still populate. The stored
    /// last-visit time is replaced with now on every call.
    pub async fn load_home(&self) -> HomeReport {
        self.state.lock().loading_home = true;

        let gateway = self.gateway.as_ref();
        let (trending, mixed, movies, tv, top) = futures::join!(
            gateway.fetch_category(FeedCategory::Trending, 1),
            gateway.fetch_category(FeedCategory::MixedReleases, 1),
            gateway.fetch_category(FeedCategory::LatestMovies, 1),
            gateway.fetch_category(FeedCategory::LatestTv, 1),
            gateway.fetch_category(FeedCategory::TopRated, 1),
        );

        let mut report = HomeReport::default();
        let mut home = HashMap::new();
        for (category, result) in FeedCategory::ALL
            .into_iter()
            .zip([trending, mixed, movies, tv, top])
        {
            let items = result.unwrap_or_else(|e| {
                tracing::warn!(%category, error = %e, "Home feed failed, showing it empty");
                report.failed.push(category);
                Vec::new()
            });
            home.insert(category, items);
        }

        let mixed = home
            .get(&FeedCategory::MixedReleases)
            .map(Vec::as_slice)
            .unwrap_or_default();
        report.new_titles = self.count_new_since_last_visit(mixed);
        self.record_visit(Utc::now());

        report.recently_viewed = match RecentlyViewedLog::restore(self.store.as_ref()) {
            Ok(log) => log.items().to_vec(),
            Err(e) => {
                tracing::warn!(error = %e, "Could not restore recently viewed titles");
                Vec::new()
            }
        };

        if report.new_titles > 0 {
            self.notifications.post_after(
                new_content_message(report.new_titles),
                ToastKind::Info,
                self.notification_delay,
            );
        }

        {
            let mut state = self.state.lock();
            state.home = home;
            state.loading_home = false;
        }
        tracing::info!(
            new_titles = report.new_titles,
            failed = report.failed.len(),
            "Home feeds loaded"
        );
        report
    }

    fn count_new_since_last_visit(&self, mixed: &[MediaSummary]) -> usize {
        let last_visit = match load_json::<DateTime<Utc>>(self.store.as_ref(), keys::LAST_VISIT) {
            Ok(last_visit) => last_visit,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unreadable last visit time");
                None
            }
        };

        last_visit.map_or(0, |last_visit| {
            mixed
                .iter()
                .filter(|item| item.released_after(last_visit))
                .count()
        })
    }

    fn record_visit(&self, now: DateTime<Utc>) {
        if let Err(e) = save_json(self.store.as_ref(), keys::LAST_VISIT, &now) {
            tracing::warn!(error = %e, "Could not store last visit time");
        }
    }

    /// Opens `category` as a paginated list starting from its home items.
    pub fn expand_to_see_all(&self, category: FeedCategory) {
        let mut state = self.state.lock();
        let items = state.home.get(&category).cloned().unwrap_or_default();
        state.epoch += 1;
        let epoch = state.epoch;
        state.see_all = Some(SeeAll {
            category,
            feed: PaginatedFeed::from_first_page(items),
            epoch,
        });
        tracing::debug!(%category, "Expanded see all");
    }

    /// Appends the next page of the expanded category.
    pub async fn load_more(&self) -> LoadOutcome {
        let (category, page, epoch) = {
            let mut state = self.state.lock();
            let Some(see_all) = state.see_all.as_mut() else {
                return LoadOutcome::NoContext;
            };
            let Some(page) = see_all.feed.begin_load() else {
                return LoadOutcome::AlreadyLoading;
            };
            (see_all.category, page, see_all.epoch)
        };

        let result = self.gateway.fetch_category(category, page).await;

        let mut state = self.state.lock();
        let see_all = match state.see_all.as_mut() {
            Some(see_all) if see_all.epoch == epoch => see_all,
            _ => {
                tracing::debug!(%category, page, "Discarding page for closed see all");
                return LoadOutcome::Stale;
            }
        };

        match result {
            Ok(items) => {
                let added = see_all.feed.finish_load(items);
                tracing::debug!(%category, page, added, "See all page loaded");
                LoadOutcome::Loaded(added)
            }
            Err(e) => {
                see_all.feed.abort_load();
                tracing::warn!(%category, page, error = %e, "See all page failed");
                LoadOutcome::Failed
            }
        }
    }

    /// Closes the expanded list.
    pub fn collapse_see_all(&self) {
        let mut state = self.state.lock();
        if state.see_all.take().is_some() {
            state.epoch += 1;
        }
    }

    pub fn home_feed(&self, category: FeedCategory) -> Vec<MediaSummary> {
        self.state
            .lock()
            .home
            .get(&category)
            .cloned()
            .unwrap_or_default()
    }

    /// The expanded category and its accumulated items.
    pub fn see_all(&self) -> Option<(FeedCategory, PaginatedFeed)> {
        self.state
            .lock()
            .see_all
            .as_ref()
            .map(|see_all| (see_all.category, see_all.feed.clone()))
    }

    pub fn is_see_all_open(&self) -> bool {
        self.state.lock().see_all.is_some()
    }

    pub fn is_loading_home(&self) -> bool {
        self.state.lock().loading_home
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use movos_catalog::{Endpoint, ScriptedGateway};
    use movos_core::MediaType;
    use movos_core::storage::MemoryStore;
    use movos_core::test_fixtures::summary;

    fn orchestrator(gateway: Arc<ScriptedGateway>) -> (FeedOrchestrator, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let feeds = FeedOrchestrator::new(
            gateway,
            store.clone(),
            NotificationCenter::new(Duration::from_secs(3)),
            Duration::ZERO,
        );
        (feeds, store)
    }

    #[tokio::test]
    async fn test_failed_feed_is_empty_others_populate() {
        let gateway = Arc::new(ScriptedGateway::new());
        gateway.fail(Endpoint::Trending, 1);
        let (feeds, _) = orchestrator(gateway);

        let report = feeds.load_home().await;
        assert_eq!(report.failed, [FeedCategory::Trending]);
        assert!(feeds.home_feed(FeedCategory::Trending).is_empty());
        assert_eq!(feeds.home_feed(FeedCategory::TopRated).len(), 20);
        assert_eq!(feeds.home_feed(FeedCategory::MixedReleases).len(), 40);
        assert!(!feeds.is_loading_home());
    }

    #[tokio::test]
    async fn test_new_titles_counted_once() {
        let gateway = Arc::new(ScriptedGateway::new());
        let yesterday = (Utc::now() - chrono::Duration::days(1))
            .format("%Y-%m-%d")
            .to_string();
        gateway.set_page(
            Endpoint::NowPlaying,
            1,
            vec![
                summary("a", MediaType::Movie, Some(yesterday.as_str())),
                summary("b", MediaType::Movie, Some(yesterday.as_str())),
                summary("old", MediaType::Movie, Some("2001-01-01")),
            ],
        );
        gateway.set_page(
            Endpoint::LatestTv,
            1,
            vec![summary("c", MediaType::Tv, Some(yesterday.as_str()))],
        );
        let (feeds, store) = orchestrator(gateway);

        let first = feeds.load_home().await;
        assert_eq!(first.new_titles, 0);

        let last_visit = Utc::now() - chrono::Duration::days(3);
        save_json(store.as_ref(), keys::LAST_VISIT, &last_visit).unwrap();
        assert_eq!(feeds.load_home().await.new_titles, 3);
        assert_eq!(feeds.load_home().await.new_titles, 0);
    }

    #[tokio::test]
    async fn test_see_all_pages_through_its_own_source() {
        let gateway = Arc::new(ScriptedGateway::new());
        let (feeds, _) = orchestrator(gateway.clone());
        feeds.load_home().await;

        feeds.expand_to_see_all(FeedCategory::TopRated);
        assert_eq!(feeds.load_more().await, LoadOutcome::Loaded(20));

        let (category, feed) = feeds.see_all().unwrap();
        assert_eq!(category, FeedCategory::TopRated);
        assert_eq!(feed.items().len(), 40);
        assert_eq!(feed.page(), 2);
        assert_eq!(feed.items()[20].id, "top-rated-20");
        assert_eq!(gateway.call_count(&Endpoint::TopRated), 2);
    }

    #[tokio::test]
    async fn test_concurrent_load_more_is_a_noop() {
        let gateway = Arc::new(ScriptedGateway::new());
        let (feeds, _) = orchestrator(gateway.clone());
        feeds.load_home().await;
        feeds.expand_to_see_all(FeedCategory::Trending);
        gateway.hold(Endpoint::Trending, 2);

        let feeds = Arc::new(feeds);
        let first = {
            let feeds = Arc::clone(&feeds);
            tokio::spawn(async move { feeds.load_more().await })
        };
        tokio::task::yield_now().await;

        assert_eq!(feeds.load_more().await, LoadOutcome::AlreadyLoading);
        gateway.release(Endpoint::Trending, 2);
        assert_eq!(first.await.unwrap(), LoadOutcome::Loaded(20));
        assert_eq!(gateway.call_count(&Endpoint::Trending), 2);
    }

    #[tokio::test]
    async fn test_failed_page_leaves_list_unchanged() {
        let gateway = Arc::new(ScriptedGateway::new());
        let (feeds, _) = orchestrator(gateway.clone());
        feeds.load_home().await;
        feeds.expand_to_see_all(FeedCategory::LatestMovies);
        gateway.fail(Endpoint::NowPlaying, 2);

        assert_eq!(feeds.load_more().await, LoadOutcome::Failed);
        let (_, feed) = feeds.see_all().unwrap();
        assert_eq!((feed.items().len(), feed.page()), (20, 1));

        gateway.recover(Endpoint::NowPlaying, 2);
        assert_eq!(feeds.load_more().await, LoadOutcome::Loaded(20));
    }

    #[tokio::test]
    async fn test_collapse_discards_in_flight_page() {
        let gateway = Arc::new(ScriptedGateway::new());
        let (feeds, _) = orchestrator(gateway.clone());
        feeds.load_home().await;
        feeds.expand_to_see_all(FeedCategory::TopRated);
        gateway.hold(Endpoint::TopRated, 2);

        let feeds = Arc::new(feeds);
        let pending = {
            let feeds = Arc::clone(&feeds);
            tokio::spawn(async move { feeds.load_more().await })
        };
        tokio::task::yield_now().await;
        feeds.collapse_see_all();
        gateway.release(Endpoint::TopRated, 2);

        assert_eq!(pending.await.unwrap(), LoadOutcome::Stale);
        assert!(feeds.see_all().is_none());
        assert_eq!(feeds.load_more().await, LoadOutcome::NoContext);
    }
}
