//! Shared media fixtures for unit and integration tests.

use crate::media::{MediaSummary, MediaType};

/// Builds a summary with predictable fields derived from `id`.
pub fn summary(id: &str, media_type: MediaType, release: Option<&str>) -> MediaSummary {
    MediaSummary {
        id: id.to_string(),
        title: format!("Title {id}"),
        original_title: None,
        year: release
            .and_then(|date| date.get(..4))
            .and_then(|year| year.parse().ok())
            .unwrap_or(2024),
        release_date: release.map(str::to_string),
        rating: 7.4,
        app_rating: 3.7,
        media_type,
        genres: vec!["Drama".to_string()],
        synopsis: "Synopsis".to_string(),
        poster_url: format!("https://image.example/{id}/poster.jpg"),
        backdrop_url: format!("https://image.example/{id}/backdrop.jpg"),
    }
}

/// Builds `count` movie summaries with ids `{prefix}-{start}`.. onward.
pub fn page_of(prefix: &str, start: usize, count: usize) -> Vec<MediaSummary> {
    (start..start + count)
        .map(|n| summary(&format!("{prefix}-{n}"), MediaType::Movie, None))
        .collect()
}
