//! Feed categories and the metadata service's wire format.

use chrono::Datelike;
use movos_core::media::{CastMember, MediaDetail, MediaSummary, MediaType};
use serde::{Deserialize, Serialize};

use crate::genres::genre_names;
use crate::trailer::{VideoEntry, resolve_trailer};

/// Placeholder shown when a title has no poster.
pub const POSTER_PLACEHOLDER: &str = "https://via.placeholder.com/400x600?text=No+Image";
/// Placeholder shown when a title has neither backdrop nor poster.
pub const BACKDROP_PLACEHOLDER: &str = "https://via.placeholder.com/800x450?text=No+Image";
/// Placeholder shown for cast members without a profile picture.
pub const PROFILE_PLACEHOLDER: &str = "https://via.placeholder.com/100x100?text=User";

/// Maximum cast entries kept on a detail record.
pub const MAX_CAST: usize = 10;

/// The five home feeds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FeedCategory {
    Trending,
    MixedReleases,
    LatestMovies,
    LatestTv,
    TopRated,
}

impl FeedCategory {
    /// Home feeds in display order.
    pub const ALL: [FeedCategory; 5] = [
        FeedCategory::Trending,
        FeedCategory::MixedReleases,
        FeedCategory::LatestMovies,
        FeedCategory::LatestTv,
        FeedCategory::TopRated,
    ];

    pub fn title(self) -> &'static str {
        match self {
            FeedCategory::Trending => "Trending Now",
            FeedCategory::MixedReleases => "Latest Releases",
            FeedCategory::LatestMovies => "Latest Movies",
            FeedCategory::LatestTv => "Latest TV Shows",
            FeedCategory::TopRated => "Top Rated",
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            FeedCategory::Trending => "trending",
            FeedCategory::MixedReleases => "mixed_releases",
            FeedCategory::LatestMovies => "latest_movies",
            FeedCategory::LatestTv => "latest_tv",
            FeedCategory::TopRated => "top_rated",
        }
    }
}

impl std::fmt::Display for FeedCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

impl std::str::FromStr for FeedCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FeedCategory::ALL
            .into_iter()
            .find(|category| category.tag() == s.trim().to_lowercase())
            .ok_or_else(|| format!("Unknown feed category: {s}"))
    }
}

/// Builds absolute image URLs from service-relative paths.
#[derive(Debug, Clone)]
pub struct ImageUrls {
    base: String,
}

impl ImageUrls {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn sized(&self, size: &str, path: &str) -> String {
        format!("{}/{}{}", self.base, size, path)
    }
}

/// One page of list results.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbPage<T> {
    #[serde(default)]
    pub page: u32,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
}

/// A movie, TV show or person entry from any list endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TmdbListItem {
    pub id: u64,
    pub title: Option<String>,
    pub name: Option<String>,
    pub original_title: Option<String>,
    pub original_name: Option<String>,
    pub release_date: Option<String>,
    pub first_air_date: Option<String>,
    pub vote_average: Option<f64>,
    pub genre_ids: Vec<u32>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub media_type: Option<String>,
}

impl TmdbListItem {
    /// Person entries appear in multi-search results.
    pub fn is_person(&self) -> bool {
        self.media_type.as_deref() == Some("person")
    }

    pub fn has_image(&self) -> bool {
        self.poster_path.is_some() || self.backdrop_path.is_some()
    }

    fn resolved_type(&self, hint: Option<MediaType>) -> MediaType {
        match (hint, self.media_type.as_deref()) {
            (Some(media_type), _) => media_type,
            (None, Some("tv")) => MediaType::Tv,
            (None, Some("movie")) => MediaType::Movie,
            (None, _) if self.title.is_some() => MediaType::Movie,
            (None, _) => MediaType::Tv,
        }
    }

    fn release(&self) -> Option<String> {
        self.release_date
            .as_deref()
            .or(self.first_air_date.as_deref())
            .filter(|date| !date.is_empty())
            .map(str::to_string)
    }

    /// Normalizes the entry. `hint` overrides type detection for endpoints
    /// that only return one type.
    pub fn into_summary(self, images: &ImageUrls, hint: Option<MediaType>) -> MediaSummary {
        let media_type = self.resolved_type(hint);
        let release_date = self.release();
        let year = release_date
            .as_deref()
            .and_then(|date| date.get(..4))
            .and_then(|year| year.parse().ok())
            .unwrap_or_else(|| chrono::Utc::now().year());
        let rating = self.vote_average.map(round_one).unwrap_or(0.0);
        let app_rating = self.vote_average.map(|v| round_one(v / 2.0)).unwrap_or(0.0);

        let poster_url = self
            .poster_path
            .as_deref()
            .map(|path| images.sized("w500", path))
            .unwrap_or_else(|| POSTER_PLACEHOLDER.to_string());
        let backdrop_url = match (&self.backdrop_path, &self.poster_path) {
            (Some(backdrop), _) => images.sized("w1280", backdrop),
            (None, Some(poster)) => images.sized("w780", poster),
            (None, None) => BACKDROP_PLACEHOLDER.to_string(),
        };

        MediaSummary {
            id: self.id.to_string(),
            title: self.title.or(self.name).unwrap_or_default(),
            original_title: self.original_title.or(self.original_name),
            year,
            release_date,
            rating,
            app_rating,
            media_type,
            genres: genre_names(&self.genre_ids),
            synopsis: self
                .overview
                .filter(|overview| !overview.trim().is_empty())
                .unwrap_or_else(|| "No description available.".to_string()),
            poster_url,
            backdrop_url,
        }
    }
}

fn round_one(value: f64) -> f32 {
    ((value * 10.0).round() / 10.0) as f32
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbGenre {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TmdbCastEntry {
    pub name: String,
    pub character: Option<String>,
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TmdbCrewEntry {
    pub name: String,
    pub job: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TmdbCredits {
    pub cast: Vec<TmdbCastEntry>,
    pub crew: Vec<TmdbCrewEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TmdbVideos {
    pub results: Vec<VideoEntry>,
}

/// Detail payload with credits and videos appended.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TmdbDetails {
    #[serde(flatten)]
    pub base: TmdbListItem,
    pub runtime: Option<u32>,
    pub episode_run_time: Vec<u32>,
    pub number_of_seasons: Option<u32>,
    pub genres: Vec<TmdbGenre>,
    pub credits: Option<TmdbCredits>,
    pub videos: Option<TmdbVideos>,
}

impl TmdbDetails {
    pub fn into_detail(self, images: &ImageUrls, media_type: MediaType) -> MediaDetail {
        let duration = format_duration(
            media_type,
            self.runtime,
            &self.episode_run_time,
            self.number_of_seasons,
        );
        let credits = self.credits.unwrap_or_default();
        let director = credits
            .crew
            .iter()
            .find(|member| member.job == "Director")
            .map(|member| member.name.clone());
        let cast = credits
            .cast
            .into_iter()
            .take(MAX_CAST)
            .map(|actor| CastMember {
                image_url: actor
                    .profile_path
                    .as_deref()
                    .map(|path| images.sized("w185", path))
                    .unwrap_or_else(|| PROFILE_PLACEHOLDER.to_string()),
                name: actor.name,
                role: actor.character.unwrap_or_default(),
            })
            .collect();
        let videos = self.videos.unwrap_or_default().results;
        let full_genres: Vec<String> = self.genres.into_iter().map(|genre| genre.name).collect();

        let mut summary = self.base.into_summary(images, Some(media_type));
        if !full_genres.is_empty() {
            summary.genres = full_genres;
        }
        let trailer = resolve_trailer(&videos, &summary.title, summary.year);

        MediaDetail {
            summary,
            duration,
            cast,
            director,
            trailer,
        }
    }
}

/// Formats runtime for the detail header.
///
/// Movies show `"{h}h {m}m"`; TV shows the average episode runtime when
/// known, otherwise the season count.
pub fn format_duration(
    media_type: MediaType,
    runtime: Option<u32>,
    episode_run_time: &[u32],
    number_of_seasons: Option<u32>,
) -> String {
    match media_type {
        MediaType::Movie => runtime
            .filter(|minutes| *minutes > 0)
            .map(|minutes| format!("{}h {}m", minutes / 60, minutes % 60))
            .unwrap_or_default(),
        MediaType::Tv => match (episode_run_time.first(), number_of_seasons) {
            (Some(minutes), _) => format!("{minutes}m avg"),
            (None, Some(1)) => "1 Season".to_string(),
            (None, Some(seasons)) => format!("{seasons} Seasons"),
            (None, None) => String::new(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use movos_core::TrailerResolution;

    fn images() -> ImageUrls {
        ImageUrls::new("https://img.test/t/p/")
    }

    #[test]
    fn test_list_item_mapping() {
        let item: TmdbListItem = serde_json::from_value(serde_json::json!({
            "id": 693134,
            "title": "Dune: Part Two",
            "original_title": "Dune: Part Two",
            "release_date": "2024-02-27",
            "vote_average": 8.26,
            "genre_ids": [878, 12, 28, 18],
            "overview": "",
            "poster_path": "/poster.jpg",
            "backdrop_path": null
        }))
        .unwrap();

        let summary = item.into_summary(&images(), None);
        assert_eq!(summary.id, "693134");
        assert_eq!(summary.media_type, MediaType::Movie);
        assert_eq!(summary.year, 2024);
        assert_eq!(summary.rating, 8.3);
        assert_eq!(summary.app_rating, 4.1);
        assert_eq!(summary.genres, ["Sci-Fi", "Adventure", "Action"]);
        assert_eq!(summary.synopsis, "No description available.");
        assert_eq!(summary.poster_url, "https://img.test/t/p/w500/poster.jpg");
        assert_eq!(summary.backdrop_url, "https://img.test/t/p/w780/poster.jpg");
    }

    #[test]
    fn test_tv_item_uses_name_and_first_air_date() {
        let item: TmdbListItem = serde_json::from_value(serde_json::json!({
            "id": 100088,
            "name": "The Last of Us",
            "first_air_date": "2023-01-15",
            "media_type": "tv"
        }))
        .unwrap();

        let summary = item.into_summary(&images(), None);
        assert_eq!(summary.media_type, MediaType::Tv);
        assert_eq!(summary.title, "The Last of Us");
        assert_eq!(summary.release_date.as_deref(), Some("2023-01-15"));
        assert_eq!(summary.rating, 0.0);
        assert_eq!(summary.poster_url, POSTER_PLACEHOLDER);
        assert_eq!(summary.backdrop_url, BACKDROP_PLACEHOLDER);
    }

    #[test]
    fn test_duration_formats() {
        assert_eq!(format_duration(MediaType::Movie, Some(166), &[], None), "2h 46m");
        assert_eq!(format_duration(MediaType::Movie, None, &[], None), "");
        assert_eq!(format_duration(MediaType::Tv, None, &[52, 60], Some(2)), "52m avg");
        assert_eq!(format_duration(MediaType::Tv, None, &[], Some(1)), "1 Season");
        assert_eq!(format_duration(MediaType::Tv, None, &[], Some(4)), "4 Seasons");
    }

    #[test]
    fn test_details_mapping() {
        let cast: Vec<_> = (0..12)
            .map(|n| serde_json::json!({ "name": format!("Actor {n}"), "character": "Role" }))
            .collect();
        let details: TmdbDetails = serde_json::from_value(serde_json::json!({
            "id": 438631,
            "title": "Dune",
            "release_date": "2021-09-15",
            "vote_average": 7.8,
            "runtime": 155,
            "genres": [{ "id": 878, "name": "Science Fiction" }],
            "credits": {
                "cast": cast,
                "crew": [{ "name": "Denis Villeneuve", "job": "Director" }]
            },
            "videos": { "results": [] }
        }))
        .unwrap();

        let detail = details.into_detail(&images(), MediaType::Movie);
        assert_eq!(detail.duration, "2h 35m");
        assert_eq!(detail.cast.len(), MAX_CAST);
        assert_eq!(detail.cast[0].image_url, PROFILE_PLACEHOLDER);
        assert_eq!(detail.director.as_deref(), Some("Denis Villeneuve"));
        assert_eq!(detail.summary.genres, ["Science Fiction"]);
        assert_eq!(
            detail.trailer,
            TrailerResolution::SearchFallback {
                query: "Dune 2021 Official Trailer".to_string()
            }
        );
    }

    #[test]
    fn test_category_tags_roundtrip() {
        for category in FeedCategory::ALL {
            assert_eq!(category.tag().parse::<FeedCategory>(), Ok(category));
        }
        assert!("popular".parse::<FeedCategory>().is_err());
    }
}
