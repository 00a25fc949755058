//! Offline gateway over a small built-in catalog.
//!
//! Release dates are relative to today so the home screen always shows a
//! mix of new releases and older titles.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use movos_core::{CastMember, MediaDetail, MediaSummary, MediaType};

use super::MediaGateway;
use crate::errors::CatalogError;
use crate::genres::genre_names;
use crate::trailer::{VideoEntry, resolve_trailer};
use crate::types::{BACKDROP_PLACEHOLDER, POSTER_PLACEHOLDER, PROFILE_PLACEHOLDER, format_duration};

/// Items per demo page.
pub const DEMO_PAGE_LEN: usize = 20;

struct DemoTitle {
    id: &'static str,
    title: &'static str,
    media_type: MediaType,
    days_ago: i64,
    vote: f32,
    genres: &'static [u32],
    runtime: u32,
    trailer_key: Option<&'static str>,
    director: Option<&'static str>,
    cast: &'static [(&'static str, &'static str)],
}

const CATALOG: &[DemoTitle] = &[
    DemoTitle {
        id: "693134",
        title: "Dune: Part Two",
        media_type: MediaType::Movie,
        days_ago: 12,
        vote: 8.2,
        genres: &[878, 12, 28],
        runtime: 166,
        trailer_key: Some("Way9Dexny3w"),
        director: Some("Denis Villeneuve"),
        cast: &[("Timothée Chalamet", "Paul Atreides"), ("Zendaya", "Chani")],
    },
    DemoTitle {
        id: "872585",
        title: "Oppenheimer",
        media_type: MediaType::Movie,
        days_ago: 30,
        vote: 8.1,
        genres: &[18, 36],
        runtime: 181,
        trailer_key: Some("uYPbbksJxIg"),
        director: Some("Christopher Nolan"),
        cast: &[("Cillian Murphy", "J. Robert Oppenheimer")],
    },
    DemoTitle {
        id: "100088",
        title: "The Last of Us",
        media_type: MediaType::Tv,
        days_ago: 5,
        vote: 8.6,
        genres: &[18, 10759],
        runtime: 55,
        trailer_key: None,
        director: None,
        cast: &[("Pedro Pascal", "Joel Miller"), ("Bella Ramsey", "Ellie Williams")],
    },
    DemoTitle {
        id: "1396",
        title: "Breaking Bad",
        media_type: MediaType::Tv,
        days_ago: 6200,
        vote: 8.9,
        genres: &[18, 80],
        runtime: 47,
        trailer_key: None,
        director: None,
        cast: &[("Bryan Cranston", "Walter White")],
    },
    DemoTitle {
        id: "27205",
        title: "Inception",
        media_type: MediaType::Movie,
        days_ago: 5200,
        vote: 8.4,
        genres: &[28, 878, 12],
        runtime: 148,
        trailer_key: None,
        director: Some("Christopher Nolan"),
        cast: &[("Leonardo DiCaprio", "Cobb")],
    },
    DemoTitle {
        id: "157336",
        title: "Interstellar",
        media_type: MediaType::Movie,
        days_ago: 4000,
        vote: 8.4,
        genres: &[12, 18, 878],
        runtime: 169,
        trailer_key: None,
        director: Some("Christopher Nolan"),
        cast: &[("Matthew McConaughey", "Cooper")],
    },
    DemoTitle {
        id: "238",
        title: "The Godfather",
        media_type: MediaType::Movie,
        days_ago: 19000,
        vote: 8.7,
        genres: &[18, 80],
        runtime: 175,
        trailer_key: None,
        director: Some("Francis Ford Coppola"),
        cast: &[("Marlon Brando", "Don Vito Corleone")],
    },
    DemoTitle {
        id: "346698",
        title: "Barbie",
        media_type: MediaType::Movie,
        days_ago: 40,
        vote: 7.0,
        genres: &[35, 12],
        runtime: 114,
        trailer_key: None,
        director: Some("Greta Gerwig"),
        cast: &[("Margot Robbie", "Barbie")],
    },
    DemoTitle {
        id: "94997",
        title: "House of the Dragon",
        media_type: MediaType::Tv,
        days_ago: 20,
        vote: 8.4,
        genres: &[10765, 18],
        runtime: 60,
        trailer_key: None,
        director: None,
        cast: &[("Matt Smith", "Daemon Targaryen")],
    },
    DemoTitle {
        id: "136315",
        title: "The Bear",
        media_type: MediaType::Tv,
        days_ago: 60,
        vote: 8.2,
        genres: &[35, 18],
        runtime: 30,
        trailer_key: None,
        director: None,
        cast: &[("Jeremy Allen White", "Carmy Berzatto")],
    },
    DemoTitle {
        id: "419430",
        title: "Get Out",
        media_type: MediaType::Movie,
        days_ago: 3100,
        vote: 7.6,
        genres: &[27, 9648, 53],
        runtime: 104,
        trailer_key: None,
        director: Some("Jordan Peele"),
        cast: &[("Daniel Kaluuya", "Chris Washington")],
    },
    DemoTitle {
        id: "493922",
        title: "Hereditary",
        media_type: MediaType::Movie,
        days_ago: 2700,
        vote: 7.3,
        genres: &[27, 9648, 53],
        runtime: 127,
        trailer_key: None,
        director: Some("Ari Aster"),
        cast: &[("Toni Collette", "Annie Graham")],
    },
    DemoTitle {
        id: "313369",
        title: "La La Land",
        media_type: MediaType::Movie,
        days_ago: 3400,
        vote: 7.9,
        genres: &[35, 18, 10749],
        runtime: 128,
        trailer_key: None,
        director: Some("Damien Chazelle"),
        cast: &[("Ryan Gosling", "Sebastian"), ("Emma Stone", "Mia")],
    },
    DemoTitle {
        id: "120",
        title: "The Lord of the Rings: The Fellowship of the Ring",
        media_type: MediaType::Movie,
        days_ago: 9000,
        vote: 8.4,
        genres: &[12, 14, 28],
        runtime: 179,
        trailer_key: None,
        director: Some("Peter Jackson"),
        cast: &[("Elijah Wood", "Frodo Baggins")],
    },
    DemoTitle {
        id: "603",
        title: "The Matrix",
        media_type: MediaType::Movie,
        days_ago: 9800,
        vote: 8.2,
        genres: &[28, 878],
        runtime: 136,
        trailer_key: None,
        director: Some("Lana Wachowski"),
        cast: &[("Keanu Reeves", "Neo")],
    },
    DemoTitle {
        id: "66732",
        title: "Stranger Things",
        media_type: MediaType::Tv,
        days_ago: 3300,
        vote: 8.6,
        genres: &[18, 10765, 9648],
        runtime: 60,
        trailer_key: None,
        director: None,
        cast: &[("Millie Bobby Brown", "Eleven")],
    },
    DemoTitle {
        id: "95396",
        title: "Severance",
        media_type: MediaType::Tv,
        days_ago: 14,
        vote: 8.4,
        genres: &[18, 9648, 10765],
        runtime: 50,
        trailer_key: None,
        director: None,
        cast: &[("Adam Scott", "Mark Scout")],
    },
    DemoTitle {
        id: "569094",
        title: "Spider-Man: Across the Spider-Verse",
        media_type: MediaType::Movie,
        days_ago: 500,
        vote: 8.4,
        genres: &[16, 28, 12],
        runtime: 140,
        trailer_key: None,
        director: Some("Joaquim Dos Santos"),
        cast: &[("Shameik Moore", "Miles Morales")],
    },
    DemoTitle {
        id: "438631",
        title: "Dune",
        media_type: MediaType::Movie,
        days_ago: 1100,
        vote: 7.8,
        genres: &[878, 12],
        runtime: 155,
        trailer_key: None,
        director: Some("Denis Villeneuve"),
        cast: &[("Timothée Chalamet", "Paul Atreides")],
    },
    DemoTitle {
        id: "1399",
        title: "Game of Thrones",
        media_type: MediaType::Tv,
        days_ago: 5600,
        vote: 8.5,
        genres: &[10765, 18, 10759],
        runtime: 0,
        trailer_key: None,
        director: None,
        cast: &[("Emilia Clarke", "Daenerys Targaryen")],
    },
    DemoTitle {
        id: "508442",
        title: "Soul",
        media_type: MediaType::Movie,
        days_ago: 1400,
        vote: 8.0,
        genres: &[16, 10751, 35],
        runtime: 100,
        trailer_key: None,
        director: Some("Pete Docter"),
        cast: &[("Jamie Foxx", "Joe Gardner")],
    },
    DemoTitle {
        id: "76479",
        title: "The Boys",
        media_type: MediaType::Tv,
        days_ago: 35,
        vote: 8.5,
        genres: &[10765, 10759],
        runtime: 60,
        trailer_key: None,
        director: None,
        cast: &[("Karl Urban", "Billy Butcher")],
    },
];

impl DemoTitle {
    fn release_date(&self) -> String {
        (Utc::now().date_naive() - Duration::days(self.days_ago))
            .format("%Y-%m-%d")
            .to_string()
    }

    fn summary(&self) -> MediaSummary {
        let release_date = self.release_date();
        let year = release_date
            .get(..4)
            .and_then(|year| year.parse().ok())
            .unwrap_or_default();

        MediaSummary {
            id: self.id.to_string(),
            title: self.title.to_string(),
            original_title: None,
            year,
            release_date: Some(release_date),
            rating: self.vote,
            app_rating: ((self.vote / 2.0) * 10.0).round() / 10.0,
            media_type: self.media_type,
            genres: genre_names(self.genres),
            synopsis: format!("{} in the offline demo catalog.", self.title),
            poster_url: POSTER_PLACEHOLDER.to_string(),
            backdrop_url: BACKDROP_PLACEHOLDER.to_string(),
        }
    }

    fn detail(&self) -> MediaDetail {
        let summary = self.summary();
        let videos: Vec<VideoEntry> = self
            .trailer_key
            .map(|key| VideoEntry::new(key, "YouTube", "Trailer"))
            .into_iter()
            .collect();
        let (runtime, episode_run_time) = match self.media_type {
            MediaType::Movie => (Some(self.runtime), Vec::new()),
            MediaType::Tv if self.runtime > 0 => (None, vec![self.runtime]),
            MediaType::Tv => (None, Vec::new()),
        };
        let seasons = (self.media_type == MediaType::Tv).then_some(3);

        MediaDetail {
            duration: format_duration(self.media_type, runtime, &episode_run_time, seasons),
            cast: self
                .cast
                .iter()
                .map(|(name, role)| CastMember {
                    name: name.to_string(),
                    role: role.to_string(),
                    image_url: PROFILE_PLACEHOLDER.to_string(),
                })
                .collect(),
            director: self.director.map(str::to_string),
            trailer: resolve_trailer(&videos, &summary.title, summary.year),
            summary,
        }
    }
}

/// Gateway serving the built-in catalog without network access.
#[derive(Debug, Default, Clone)]
pub struct DemoGateway;

impl DemoGateway {
    pub fn new() -> Self {
        Self
    }

    fn paginate(mut items: Vec<MediaSummary>, page: u32) -> Vec<MediaSummary> {
        let start = (page.saturating_sub(1) as usize) * DEMO_PAGE_LEN;
        if start >= items.len() {
            return Vec::new();
        }
        items.drain(start..).take(DEMO_PAGE_LEN).collect()
    }

    fn select(
        filter: impl Fn(&DemoTitle) -> bool,
        order: impl Fn(&MediaSummary, &MediaSummary) -> std::cmp::Ordering,
        page: u32,
    ) -> Vec<MediaSummary> {
        let mut items: Vec<MediaSummary> = CATALOG
            .iter()
            .filter(|title| filter(title))
            .map(DemoTitle::summary)
            .collect();
        items.sort_by(order);
        Self::paginate(items, page)
    }
}

fn newest_first(a: &MediaSummary, b: &MediaSummary) -> std::cmp::Ordering {
    b.released_at().cmp(&a.released_at())
}

fn best_rated(a: &MediaSummary, b: &MediaSummary) -> std::cmp::Ordering {
    b.rating.total_cmp(&a.rating)
}

#[async_trait]
impl MediaGateway for DemoGateway {
    async fn fetch_trending(&self, page: u32) -> Result<Vec<MediaSummary>, CatalogError> {
        Ok(Self::select(|title| title.days_ago < 2000, best_rated, page))
    }

    async fn fetch_now_playing(&self, page: u32) -> Result<Vec<MediaSummary>, CatalogError> {
        Ok(Self::select(
            |title| title.media_type == MediaType::Movie,
            newest_first,
            page,
        ))
    }

    async fn fetch_latest_tv(&self, page: u32) -> Result<Vec<MediaSummary>, CatalogError> {
        Ok(Self::select(
            |title| title.media_type == MediaType::Tv,
            newest_first,
            page,
        ))
    }

    async fn fetch_top_rated(&self, page: u32) -> Result<Vec<MediaSummary>, CatalogError> {
        Ok(Self::select(
            |title| title.media_type == MediaType::Movie,
            best_rated,
            page,
        ))
    }

    async fn fetch_media_by_genre(
        &self,
        genre_id: u32,
        media_type: MediaType,
        page: u32,
    ) -> Result<Vec<MediaSummary>, CatalogError> {
        Ok(Self::select(
            |title| title.media_type == media_type && title.genres.contains(&genre_id),
            best_rated,
            page,
        ))
    }

    async fn search_media(
        &self,
        query: &str,
        page: u32,
    ) -> Result<Vec<MediaSummary>, CatalogError> {
        let needle = query.trim().to_lowercase();
        Ok(Self::select(
            |title| !needle.is_empty() && title.title.to_lowercase().contains(&needle),
            |a, b| b.year.cmp(&a.year),
            page,
        ))
    }

    async fn fetch_media_details(
        &self,
        id: &str,
        media_type: MediaType,
    ) -> Result<Option<MediaDetail>, CatalogError> {
        Ok(CATALOG
            .iter()
            .find(|title| title.id == id && title.media_type == media_type)
            .map(DemoTitle::detail))
    }
}
