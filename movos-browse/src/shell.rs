//! Navigation shell tying the screens together.

use std::sync::Arc;

use movos_catalog::{DiscoveryGenre, FeedCategory, MediaGateway};
use movos_core::config::BrowseConfig;
use movos_core::{AccountStore, AuthError, PreferenceStore};
use parking_lot::Mutex;

use crate::details::DetailLoader;
use crate::feeds::{FeedOrchestrator, HomeReport};
use crate::genre::GenrePipeline;
use crate::notifications::NotificationCenter;
use crate::paging::LoadOutcome;
use crate::search::SearchPipeline;
use crate::session::SessionContext;
use crate::visibility::{LoadMoreContext, LoadMoreVisibility, ScrollMetrics, ViewState};

/// Bottom navigation tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tab {
    #[default]
    Home,
    Search,
    Saved,
    Profile,
}

/// The running application: every screen plus the active tab.
#[derive(Debug)]
pub struct Browser {
    tab: Mutex<Tab>,
    feeds: FeedOrchestrator,
    search: SearchPipeline,
    genres: GenrePipeline,
    session: Arc<SessionContext>,
    details: DetailLoader,
    notifications: NotificationCenter,
    visibility: LoadMoreVisibility,
}

impl Browser {
    /// Restores the session and wires every screen to `gateway`.
    ///
    /// # Errors
    ///
    /// - `AuthError::Storage` - If the stored session could not be read
    pub async fn launch(
        gateway: Arc<dyn MediaGateway>,
        store: Arc<dyn PreferenceStore>,
        accounts: Arc<dyn AccountStore>,
        config: &BrowseConfig,
    ) -> Result<Self, AuthError> {
        let notifications = NotificationCenter::new(config.notification_ttl);
        let session = Arc::new(
            SessionContext::restore(Arc::clone(&store), accounts, notifications.clone()).await?,
        );

        Ok(Self {
            tab: Mutex::new(Tab::Home),
            feeds: FeedOrchestrator::new(
                Arc::clone(&gateway),
                Arc::clone(&store),
                notifications.clone(),
                config.notification_delay,
            ),
            search: SearchPipeline::new(Arc::clone(&gateway), store, config),
            genres: GenrePipeline::new(Arc::clone(&gateway)),
            details: DetailLoader::new(gateway, Arc::clone(&session)),
            session,
            notifications,
            visibility: LoadMoreVisibility::new(config.load_more_threshold_px),
        })
    }

    pub fn tab(&self) -> Tab {
        *self.tab.lock()
    }

    /// Switches tabs, closing any expanded home feed. Reselecting the
    /// current tab changes nothing.
    pub fn select_tab(&self, tab: Tab) {
        {
            let mut current = self.tab.lock();
            if *current == tab {
                return;
            }
            *current = tab;
        }
        self.feeds.collapse_see_all();
    }

    pub async fn load_home(&self) -> HomeReport {
        self.feeds.load_home().await
    }

    /// Expands a home feed; only meaningful on the home tab.
    pub fn see_all(&self, category: FeedCategory) {
        *self.tab.lock() = Tab::Home;
        self.feeds.expand_to_see_all(category);
    }

    /// Opens a genre from the discovery grid on the search tab.
    pub async fn select_genre(&self, genre: &'static DiscoveryGenre) -> LoadOutcome {
        *self.tab.lock() = Tab::Search;
        self.genres.select(genre).await
    }

    fn view_state(&self) -> ViewState {
        ViewState {
            tab: self.tab(),
            see_all_open: self.feeds.is_see_all_open(),
            genre_selected: self.genres.selected().is_some(),
            has_search_results: self.search.has_results(),
        }
    }

    /// The load-more affordance to show for the current scroll position.
    pub fn visible_load_more(&self, metrics: ScrollMetrics) -> Option<LoadMoreContext> {
        self.visibility.evaluate(self.view_state(), metrics)
    }

    /// Extends whichever list is active, regardless of scroll position.
    pub async fn load_more(&self) -> LoadOutcome {
        match self.view_state().active_context() {
            Some(LoadMoreContext::SeeAll) => self.feeds.load_more().await,
            Some(LoadMoreContext::Genre) => self.genres.load_more().await,
            Some(LoadMoreContext::SearchResults) => self.search.load_more().await,
            None => LoadOutcome::NoContext,
        }
    }

    pub fn feeds(&self) -> &FeedOrchestrator {
        &self.feeds
    }

    pub fn search(&self) -> &SearchPipeline {
        &self.search
    }

    pub fn genres(&self) -> &GenrePipeline {
        &self.genres
    }

    pub fn session(&self) -> &Arc<SessionContext> {
        &self.session
    }

    pub fn details(&self) -> &DetailLoader {
        &self.details
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use movos_catalog::ScriptedGateway;
    use movos_core::storage::MemoryStore;
    use movos_core::LocalAccountStore;

    async fn browser() -> Browser {
        let store = Arc::new(MemoryStore::new());
        let accounts = Arc::new(LocalAccountStore::new(store.clone()));
        Browser::launch(
            Arc::new(ScriptedGateway::new()),
            store,
            accounts,
            &BrowseConfig::default(),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_tab_switch_closes_see_all() {
        let browser = browser().await;
        browser.load_home().await;
        browser.see_all(FeedCategory::Trending);
        let near_end = ScrollMetrics::new(1500.0, 600.0, 2000.0);
        assert_eq!(
            browser.visible_load_more(near_end),
            Some(LoadMoreContext::SeeAll)
        );

        browser.select_tab(Tab::Saved);
        assert!(!browser.feeds().is_see_all_open());
        assert_eq!(browser.visible_load_more(near_end), None);
        assert_eq!(browser.load_more().await, LoadOutcome::NoContext);
    }

    #[tokio::test]
    async fn test_reselecting_home_keeps_see_all() {
        let browser = browser().await;
        browser.load_home().await;
        browser.see_all(FeedCategory::TopRated);

        browser.select_tab(Tab::Home);
        assert!(browser.feeds().is_see_all_open());
        assert_eq!(browser.load_more().await, LoadOutcome::Loaded(20));
    }

    #[tokio::test]
    async fn test_genre_selection_moves_to_search() {
        let browser = browser().await;
        let action = DiscoveryGenre::by_id(28).unwrap();

        assert_eq!(browser.select_genre(action).await, LoadOutcome::Loaded(20));
        assert_eq!(browser.tab(), Tab::Search);
        assert_eq!(browser.load_more().await, LoadOutcome::Loaded(20));
        assert_eq!(browser.genres().items().len(), 40);

        browser.genres().back();
        browser.search().input("heat");
        browser.search().submit().await;
        assert_eq!(
            browser.visible_load_more(ScrollMetrics::new(0.0, 900.0, 1000.0)),
            Some(LoadMoreContext::SearchResults)
        );
    }
}
