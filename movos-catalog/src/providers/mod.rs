//! Gateway implementations for the media metadata service.

use async_trait::async_trait;
use movos_core::{MediaDetail, MediaSummary, MediaType};

use crate::errors::CatalogError;
use crate::types::FeedCategory;

pub mod demo;
#[cfg(any(test, feature = "test-utils"))]
pub mod scripted;
pub mod tmdb;

pub use demo::DemoGateway;
#[cfg(any(test, feature = "test-utils"))]
pub use scripted::{Endpoint, ScriptedGateway};
pub use tmdb::TmdbGateway;

/// Access to the media metadata service.
///
/// Every list operation returns one page of normalized summaries. Pages are
/// 1-based. Implementations report failures; callers decide how to degrade.
#[async_trait]
pub trait MediaGateway: Send + Sync + std::fmt::Debug {
    /// Titles trending this week across movies and TV.
    ///
    /// # Errors
    /// - `CatalogError::NetworkError` - Network connectivity issues
    /// - `CatalogError::ParseError` - Unexpected response body
    async fn fetch_trending(&self, page: u32) -> Result<Vec<MediaSummary>, CatalogError>;

    /// Movies currently in theaters.
    ///
    /// # Errors
    /// - `CatalogError::NetworkError` - Network connectivity issues
    /// - `CatalogError::ParseError` - Unexpected response body
    async fn fetch_now_playing(&self, page: u32) -> Result<Vec<MediaSummary>, CatalogError>;

    /// TV shows currently airing.
    ///
    /// # Errors
    /// - `CatalogError::NetworkError` - Network connectivity issues
    /// - `CatalogError::ParseError` - Unexpected response body
    async fn fetch_latest_tv(&self, page: u32) -> Result<Vec<MediaSummary>, CatalogError>;

    /// Highest rated movies.
    ///
    /// # Errors
    /// - `CatalogError::NetworkError` - Network connectivity issues
    /// - `CatalogError::ParseError` - Unexpected response body
    async fn fetch_top_rated(&self, page: u32) -> Result<Vec<MediaSummary>, CatalogError>;

    /// Popular titles of one genre, excluding low vote counts.
    ///
    /// # Errors
    /// - `CatalogError::NetworkError` - Network connectivity issues
    /// - `CatalogError::ParseError` - Unexpected response body
    async fn fetch_media_by_genre(
        &self,
        genre_id: u32,
        media_type: MediaType,
        page: u32,
    ) -> Result<Vec<MediaSummary>, CatalogError>;

    /// Movies and TV matching `query`; people and imageless entries are dropped.
    ///
    /// # Errors
    /// - `CatalogError::NetworkError` - Network connectivity issues
    /// - `CatalogError::ParseError` - Unexpected response body
    async fn search_media(&self, query: &str, page: u32)
    -> Result<Vec<MediaSummary>, CatalogError>;

    /// Full record for one title, `None` when the service has no such title.
    ///
    /// # Errors
    /// - `CatalogError::NetworkError` - Network connectivity issues
    /// - `CatalogError::ParseError` - Unexpected response body
    async fn fetch_media_details(
        &self,
        id: &str,
        media_type: MediaType,
    ) -> Result<Option<MediaDetail>, CatalogError>;

    /// Now-playing movies and airing TV of the same page, newest first.
    ///
    /// One failing half still yields the other half; both failing is an error.
    ///
    /// # Errors
    /// - `CatalogError` - Both underlying fetches failed
    async fn fetch_new_releases(&self, page: u32) -> Result<Vec<MediaSummary>, CatalogError> {
        let (movies, tv) = futures::join!(self.fetch_now_playing(page), self.fetch_latest_tv(page));

        let mut combined = match (movies, tv) {
            (Ok(movies), Ok(tv)) => movies.into_iter().chain(tv).collect::<Vec<_>>(),
            (Ok(half), Err(e)) | (Err(e), Ok(half)) => {
                tracing::warn!(page, error = %e, "Partial new releases page");
                half
            }
            (Err(e), Err(_)) => return Err(e),
        };

        combined.sort_by(|a, b| b.released_at().cmp(&a.released_at()));
        Ok(combined)
    }

    /// Dispatches to the fetcher backing a home feed.
    ///
    /// # Errors
    /// - `CatalogError` - The underlying fetch failed
    async fn fetch_category(
        &self,
        category: FeedCategory,
        page: u32,
    ) -> Result<Vec<MediaSummary>, CatalogError> {
        match category {
            FeedCategory::Trending => self.fetch_trending(page).await,
            FeedCategory::MixedReleases => self.fetch_new_releases(page).await,
            FeedCategory::LatestMovies => self.fetch_now_playing(page).await,
            FeedCategory::LatestTv => self.fetch_latest_tv(page).await,
            FeedCategory::TopRated => self.fetch_top_rated(page).await,
        }
    }
}
