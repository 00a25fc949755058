//! Genre names and the discovery tiles shown on the search page.

/// Catalog genre ids for movies and TV with their display names.
const GENRE_NAMES: &[(u32, &str)] = &[
    (28, "Action"),
    (12, "Adventure"),
    (16, "Animation"),
    (35, "Comedy"),
    (80, "Crime"),
    (99, "Documentary"),
    (18, "Drama"),
    (10751, "Family"),
    (14, "Fantasy"),
    (36, "History"),
    (27, "Horror"),
    (10402, "Music"),
    (9648, "Mystery"),
    (10749, "Romance"),
    (878, "Sci-Fi"),
    (10770, "TV Movie"),
    (53, "Thriller"),
    (10752, "War"),
    (37, "Western"),
    (10759, "Action & Adv"),
    (10762, "Kids"),
    (10763, "News"),
    (10764, "Reality"),
    (10765, "Sci-Fi & Fantasy"),
    (10766, "Soap"),
    (10767, "Talk"),
    (10768, "War & Politics"),
];

/// Maximum genre names kept on a summary.
pub const MAX_SUMMARY_GENRES: usize = 3;

/// Display name for a genre id.
pub fn genre_name(id: u32) -> Option<&'static str> {
    GENRE_NAMES
        .iter()
        .find(|(genre_id, _)| *genre_id == id)
        .map(|(_, name)| *name)
}

/// Maps genre ids to names, dropping unknown ids, keeping at most three.
pub fn genre_names(ids: &[u32]) -> Vec<String> {
    ids.iter()
        .filter_map(|id| genre_name(*id))
        .take(MAX_SUMMARY_GENRES)
        .map(str::to_string)
        .collect()
}

/// A genre tile on the discovery grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoveryGenre {
    pub id: u32,
    pub name: &'static str,
    pub keywords: &'static [&'static str],
}

/// Tiles in display order.
pub const DISCOVERY_GENRES: &[DiscoveryGenre] = &[
    DiscoveryGenre {
        id: 28,
        name: "Action",
        keywords: &["action", "fight", "combat"],
    },
    DiscoveryGenre {
        id: 35,
        name: "Comedy",
        keywords: &["comedy", "funny", "laugh"],
    },
    DiscoveryGenre {
        id: 878,
        name: "Sci-Fi",
        keywords: &["sci-fi", "scifi", "science fiction", "space"],
    },
    DiscoveryGenre {
        id: 18,
        name: "Drama",
        keywords: &["drama", "sad", "story"],
    },
    DiscoveryGenre {
        id: 27,
        name: "Horror",
        keywords: &["horror", "scary", "fear"],
    },
    DiscoveryGenre {
        id: 10749,
        name: "Romance",
        keywords: &["romance", "love"],
    },
    DiscoveryGenre {
        id: 53,
        name: "Thriller",
        keywords: &["thriller", "suspense", "mystery"],
    },
    DiscoveryGenre {
        id: 14,
        name: "Fantasy",
        keywords: &["fantasy", "magic"],
    },
];

impl DiscoveryGenre {
    /// Looks up a tile by genre id.
    pub fn by_id(id: u32) -> Option<&'static DiscoveryGenre> {
        DISCOVERY_GENRES.iter().find(|genre| genre.id == id)
    }

    /// Looks up a tile by display name, ignoring case.
    pub fn by_name(name: &str) -> Option<&'static DiscoveryGenre> {
        let name = name.trim();
        DISCOVERY_GENRES
            .iter()
            .find(|genre| genre.name.eq_ignore_ascii_case(name))
    }

    /// Tiles whose name or keywords contain the query.
    ///
    /// A blank query matches every tile.
    pub fn matching(query: &str) -> Vec<&'static DiscoveryGenre> {
        let query = query.trim().to_lowercase();
        DISCOVERY_GENRES
            .iter()
            .filter(|genre| {
                query.is_empty()
                    || genre.name.to_lowercase().contains(&query)
                    || genre.keywords.iter().any(|keyword| keyword.contains(&query))
            })
            .collect()
    }
}
