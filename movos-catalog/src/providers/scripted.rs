//! Programmable gateway for tests.
//!
//! Every list endpoint serves generated pages of 20 unless a page has been
//! scripted. Individual pages can fail, be held until released, or be delayed,
//! and every call is logged.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use movos_core::test_fixtures::{page_of, summary};
use movos_core::{MediaDetail, MediaSummary, MediaType, TrailerResolution};
use parking_lot::Mutex;
use tokio::sync::Semaphore;

use super::MediaGateway;
use crate::errors::CatalogError;

/// Items per generated page.
pub const SCRIPTED_PAGE_LEN: usize = 20;

/// A gateway operation as seen by the script.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Trending,
    NowPlaying,
    LatestTv,
    TopRated,
    Genre(u32),
    Search(String),
    Details(String),
}

impl Endpoint {
    fn id_prefix(&self) -> String {
        match self {
            Endpoint::Trending => "trending".to_string(),
            Endpoint::NowPlaying => "now-playing".to_string(),
            Endpoint::LatestTv => "latest-tv".to_string(),
            Endpoint::TopRated => "top-rated".to_string(),
            Endpoint::Genre(id) => format!("genre-{id}"),
            Endpoint::Search(query) => format!("search-{query}"),
            Endpoint::Details(id) => format!("details-{id}"),
        }
    }
}

#[derive(Debug, Default)]
struct Script {
    pages: HashMap<(Endpoint, u32), Vec<MediaSummary>>,
    last_pages: HashMap<Endpoint, u32>,
    failures: HashSet<(Endpoint, u32)>,
    gates: HashMap<(Endpoint, u32), Arc<Semaphore>>,
    delays: HashMap<Endpoint, Duration>,
    details: HashMap<String, Option<MediaDetail>>,
    calls: Vec<(Endpoint, u32)>,
}

/// Gateway whose responses are scripted per endpoint and page.
#[derive(Debug, Default)]
pub struct ScriptedGateway {
    script: Mutex<Script>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `items` for one page instead of the generated page.
    pub fn set_page(&self, endpoint: Endpoint, page: u32, items: Vec<MediaSummary>) {
        self.script.lock().pages.insert((endpoint, page), items);
    }

    /// Pages after `last` come back empty.
    pub fn set_last_page(&self, endpoint: Endpoint, last: u32) {
        self.script.lock().last_pages.insert(endpoint, last);
    }

    /// Makes one page fail until [`Self::recover`] is called.
    pub fn fail(&self, endpoint: Endpoint, page: u32) {
        self.script.lock().failures.insert((endpoint, page));
    }

    pub fn recover(&self, endpoint: Endpoint, page: u32) {
        self.script.lock().failures.remove(&(endpoint, page));
    }

    /// Blocks calls for one page until [`Self::release`] is called.
    pub fn hold(&self, endpoint: Endpoint, page: u32) {
        self.script
            .lock()
            .gates
            .insert((endpoint, page), Arc::new(Semaphore::new(0)));
    }

    /// Lets held calls for one page complete.
    pub fn release(&self, endpoint: Endpoint, page: u32) {
        if let Some(gate) = self.script.lock().gates.remove(&(endpoint, page)) {
            gate.close();
        }
    }

    /// Delays every call to `endpoint`.
    pub fn delay(&self, endpoint: Endpoint, delay: Duration) {
        self.script.lock().delays.insert(endpoint, delay);
    }

    /// Overrides the detail record for `id`; `None` means the title is unknown.
    pub fn set_detail(&self, id: &str, detail: Option<MediaDetail>) {
        self.script.lock().details.insert(id.to_string(), detail);
    }

    /// Every call received so far, in arrival order.
    pub fn calls(&self) -> Vec<(Endpoint, u32)> {
        self.script.lock().calls.clone()
    }

    /// Number of calls received for `endpoint`, any page.
    pub fn call_count(&self, endpoint: &Endpoint) -> usize {
        self.script
            .lock()
            .calls
            .iter()
            .filter(|(called, _)| called == endpoint)
            .count()
    }

    /// Logs the call, then waits out any delay or hold for it.
    async fn enter(&self, endpoint: &Endpoint, page: u32) -> Result<(), CatalogError> {
        let (gate, delay) = {
            let mut script = self.script.lock();
            script.calls.push((endpoint.clone(), page));
            (
                script.gates.get(&(endpoint.clone(), page)).cloned(),
                script.delays.get(endpoint).copied(),
            )
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(gate) = gate {
            // A closed gate errors out of acquire, which is the release signal.
            let _ = gate.acquire().await;
        }

        if self
            .script
            .lock()
            .failures
            .contains(&(endpoint.clone(), page))
        {
            return Err(CatalogError::ProviderError {
                reason: format!("scripted failure for {} page {page}", endpoint.id_prefix()),
            });
        }
        Ok(())
    }

    async fn serve(&self, endpoint: Endpoint, page: u32) -> Result<Vec<MediaSummary>, CatalogError> {
        self.enter(&endpoint, page).await?;

        let script = self.script.lock();
        if let Some(items) = script.pages.get(&(endpoint.clone(), page)) {
            return Ok(items.clone());
        }
        if script
            .last_pages
            .get(&endpoint)
            .is_some_and(|last| page > *last)
        {
            return Ok(Vec::new());
        }

        let start = (page.saturating_sub(1) as usize) * SCRIPTED_PAGE_LEN;
        Ok(page_of(&endpoint.id_prefix(), start, SCRIPTED_PAGE_LEN))
    }
}

#[async_trait]
impl MediaGateway for ScriptedGateway {
    async fn fetch_trending(&self, page: u32) -> Result<Vec<MediaSummary>, CatalogError> {
        self.serve(Endpoint::Trending, page).await
    }

    async fn fetch_now_playing(&self, page: u32) -> Result<Vec<MediaSummary>, CatalogError> {
        self.serve(Endpoint::NowPlaying, page).await
    }

    async fn fetch_latest_tv(&self, page: u32) -> Result<Vec<MediaSummary>, CatalogError> {
        self.serve(Endpoint::LatestTv, page).await
    }

    async fn fetch_top_rated(&self, page: u32) -> Result<Vec<MediaSummary>, CatalogError> {
        self.serve(Endpoint::TopRated, page).await
    }

    async fn fetch_media_by_genre(
        &self,
        genre_id: u32,
        _media_type: MediaType,
        page: u32,
    ) -> Result<Vec<MediaSummary>, CatalogError> {
        self.serve(Endpoint::Genre(genre_id), page).await
    }

    async fn search_media(
        &self,
        query: &str,
        page: u32,
    ) -> Result<Vec<MediaSummary>, CatalogError> {
        self.serve(Endpoint::Search(query.to_string()), page).await
    }

    async fn fetch_media_details(
        &self,
        id: &str,
        media_type: MediaType,
    ) -> Result<Option<MediaDetail>, CatalogError> {
        self.enter(&Endpoint::Details(id.to_string()), 1).await?;

        if let Some(detail) = self.script.lock().details.get(id) {
            return Ok(detail.clone());
        }

        let summary = summary(id, media_type, None);
        let query = format!("{} {} Official Trailer", summary.title, summary.year);
        Ok(Some(MediaDetail {
            summary,
            duration: String::new(),
            cast: Vec::new(),
            director: None,
            trailer: TrailerResolution::SearchFallback { query },
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_generated_pages_are_contiguous() {
        let gateway = ScriptedGateway::new();
        let first = gateway.fetch_top_rated(1).await.unwrap();
        let second = gateway.fetch_top_rated(2).await.unwrap();

        assert_eq!(first.len(), SCRIPTED_PAGE_LEN);
        assert_eq!(first[0].id, "top-rated-0");
        assert_eq!(second[0].id, "top-rated-20");
        assert_eq!(
            gateway.calls(),
            [(Endpoint::TopRated, 1), (Endpoint::TopRated, 2)]
        );
    }

    #[tokio::test]
    async fn test_failure_and_last_page() {
        let gateway = ScriptedGateway::new();
        gateway.fail(Endpoint::Trending, 2);
        gateway.set_last_page(Endpoint::LatestTv, 1);

        assert!(gateway.fetch_trending(2).await.is_err());
        gateway.recover(Endpoint::Trending, 2);
        assert!(gateway.fetch_trending(2).await.is_ok());
        assert!(gateway.fetch_latest_tv(2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_hold_blocks_until_release() {
        let gateway = Arc::new(ScriptedGateway::new());
        gateway.hold(Endpoint::Search("dune".to_string()), 1);

        let task = {
            let gateway = Arc::clone(&gateway);
            tokio::spawn(async move { gateway.search_media("dune", 1).await })
        };
        tokio::task::yield_now().await;
        assert!(!task.is_finished());

        gateway.release(Endpoint::Search("dune".to_string()), 1);
        let items = task.await.unwrap().unwrap();
        assert_eq!(items[0].id, "search-dune-0");
    }

    #[tokio::test]
    async fn test_unknown_detail() {
        let gateway = ScriptedGateway::new();
        gateway.set_detail("gone", None);

        assert!(
            gateway
                .fetch_media_details("gone", MediaType::Movie)
                .await
                .unwrap()
                .is_none()
        );
        let detail = gateway
            .fetch_media_details("42", MediaType::Tv)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(detail.summary.media_type, MediaType::Tv);
        assert!(detail.trailer.is_search_fallback());
    }
}
