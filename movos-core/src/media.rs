//! Media types shared between the catalog gateway and the browsing layer.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Card image shown when a poster or backdrop fails to load.
pub const CARD_IMAGE_FALLBACK: &str = "https://placehold.co/400x600/1a1a1a/ffffff?text=No+Image";

/// Number of days after release during which a title carries a badge.
pub const NEW_RELEASE_WINDOW_DAYS: i64 = 45;

/// Media type classification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
}

impl MediaType {
    /// Path segment used by the metadata API for this type.
    pub fn as_str(self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Tv => "tv",
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "movie" => Ok(MediaType::Movie),
            "tv" => Ok(MediaType::Tv),
            _ => Err(format!("Invalid media type: {s}")),
        }
    }
}

/// Badge shown on cards for recently released titles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseBadge {
    NewRelease,
    NewEpisode,
}

impl ReleaseBadge {
    pub fn label(self) -> &'static str {
        match self {
            ReleaseBadge::NewRelease => "New Release",
            ReleaseBadge::NewEpisode => "New Episode",
        }
    }
}

/// Card layouts; landscape cards show the backdrop, the rest the poster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardVariant {
    Poster,
    Featured,
    Landscape,
    List,
}

/// Normalized summary of a movie or TV show as returned by any feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaSummary {
    /// Stable identifier, unique within a feed but not across feeds
    pub id: String,
    pub title: String,
    pub original_title: Option<String>,
    pub year: i32,
    /// Full `YYYY-MM-DD` date used for new-content tracking
    pub release_date: Option<String>,
    /// Catalog rating on a 0-10 scale
    pub rating: f32,
    /// Derived 0-5 rating shown to users
    pub app_rating: f32,
    pub media_type: MediaType,
    /// Display genre names, at most three
    pub genres: Vec<String>,
    pub synopsis: String,
    pub poster_url: String,
    pub backdrop_url: String,
}

impl MediaSummary {
    /// Parses the release date, if present and well formed.
    pub fn release_day(&self) -> Option<NaiveDate> {
        self.release_date
            .as_deref()
            .and_then(|date| NaiveDate::parse_from_str(date, "%Y-%m-%d").ok())
    }

    /// Release instant at midnight UTC.
    pub fn released_at(&self) -> Option<DateTime<Utc>> {
        self.release_day()
            .and_then(|day| day.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }

    /// Returns true when the title was released strictly after `instant`.
    pub fn released_after(&self, instant: DateTime<Utc>) -> bool {
        self.released_at().is_some_and(|released| released > instant)
    }

    /// Badge for titles released within the last 45 days.
    pub fn badge(&self, today: NaiveDate) -> Option<ReleaseBadge> {
        let released = self.release_day()?;
        let age = (today - released).num_days();
        if !(0..=NEW_RELEASE_WINDOW_DAYS).contains(&age) {
            return None;
        }
        Some(match self.media_type {
            MediaType::Movie => ReleaseBadge::NewRelease,
            MediaType::Tv => ReleaseBadge::NewEpisode,
        })
    }

    /// Image a card should display, falling back after a load failure.
    pub fn card_image(&self, variant: CardVariant, load_failed: bool) -> &str {
        if load_failed {
            return CARD_IMAGE_FALLBACK;
        }
        match variant {
            CardVariant::Landscape => &self.backdrop_url,
            CardVariant::Poster | CardVariant::Featured | CardVariant::List => &self.poster_url,
        }
    }
}

/// Cast member entry on a detail record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CastMember {
    pub name: String,
    pub role: String,
    pub image_url: String,
}

/// How a detail view obtains its trailer.
///
/// Either a direct platform video reference that can be embedded, or a
/// search query used when the catalog lists no usable video at all.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TrailerResolution {
    Video { key: String },
    SearchFallback { query: String },
}

impl TrailerResolution {
    pub fn is_search_fallback(&self) -> bool {
        matches!(self, TrailerResolution::SearchFallback { .. })
    }
}

/// Enriched record returned for a single title.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaDetail {
    pub summary: MediaSummary,
    /// `"2h 46m"` for movies, `"45m avg"` or `"3 Seasons"` for TV
    pub duration: String,
    pub cast: Vec<CastMember>,
    pub director: Option<String>,
    pub trailer: TrailerResolution,
}

impl MediaDetail {
    pub fn id(&self) -> &str {
        &self.summary.id
    }
}
