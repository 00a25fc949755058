//! Trailer selection from a title's video list.

use movos_core::TrailerResolution;
use serde::{Deserialize, Serialize};

/// Only videos hosted on this site can be embedded.
pub const EMBEDDABLE_SITE: &str = "YouTube";

/// Video types accepted after trailers and teasers.
const SECONDARY_TYPES: &[&str] = &["Clip", "Featurette", "Opening Credits", "Behind the Scenes"];

/// A video attached to a title by the metadata service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VideoEntry {
    pub key: String,
    pub site: String,
    #[serde(rename = "type")]
    pub video_type: String,
}

impl VideoEntry {
    pub fn new(key: &str, site: &str, video_type: &str) -> Self {
        Self {
            key: key.to_string(),
            site: site.to_string(),
            video_type: video_type.to_string(),
        }
    }

    fn is_embeddable(&self) -> bool {
        self.site == EMBEDDABLE_SITE
    }
}

/// Picks the best trailer, or a search query when nothing is embeddable.
///
/// Priority: trailer, teaser, any secondary type, any embeddable video. The
/// first matching entry in list order wins within each tier.
pub fn resolve_trailer(videos: &[VideoEntry], title: &str, year: i32) -> TrailerResolution {
    let embeddable = || videos.iter().filter(|video| video.is_embeddable());

    let chosen = embeddable()
        .find(|video| video.video_type == "Trailer")
        .or_else(|| embeddable().find(|video| video.video_type == "Teaser"))
        .or_else(|| {
            embeddable().find(|video| SECONDARY_TYPES.contains(&video.video_type.as_str()))
        })
        .or_else(|| embeddable().next());

    match chosen {
        Some(video) => TrailerResolution::Video {
            key: video.key.clone(),
        },
        None => TrailerResolution::SearchFallback {
            query: format!("{title} {year} Official Trailer"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_videos_falls_back_to_search() {
        let resolution = resolve_trailer(&[], "Dune", 2021);
        match resolution {
            TrailerResolution::SearchFallback { query } => {
                assert!(query.contains("Dune"));
                assert!(query.contains("2021"));
                assert_eq!(query, "Dune 2021 Official Trailer");
            }
            TrailerResolution::Video { .. } => panic!("expected search fallback"),
        }
    }

    #[test]
    fn test_teaser_selected_without_trailer() {
        let videos = [
            VideoEntry::new("clip1", "YouTube", "Clip"),
            VideoEntry::new("teaser1", "YouTube", "Teaser"),
        ];
        assert_eq!(
            resolve_trailer(&videos, "X", 2020),
            TrailerResolution::Video {
                key: "teaser1".to_string()
            }
        );
    }

    #[test]
    fn test_trailer_beats_everything() {
        let videos = [
            VideoEntry::new("teaser1", "YouTube", "Teaser"),
            VideoEntry::new("vimeo-trailer", "Vimeo", "Trailer"),
            VideoEntry::new("trailer1", "YouTube", "Trailer"),
        ];
        assert_eq!(
            resolve_trailer(&videos, "X", 2020),
            TrailerResolution::Video {
                key: "trailer1".to_string()
            }
        );
    }

    #[test]
    fn test_secondary_then_any_embeddable() {
        let secondary = [
            VideoEntry::new("bloopers", "YouTube", "Bloopers"),
            VideoEntry::new("bts", "YouTube", "Behind the Scenes"),
        ];
        assert_eq!(
            resolve_trailer(&secondary, "X", 2020),
            TrailerResolution::Video {
                key: "bts".to_string()
            }
        );

        let anything = [VideoEntry::new("bloopers", "YouTube", "Bloopers")];
        assert_eq!(
            resolve_trailer(&anything, "X", 2020),
            TrailerResolution::Video {
                key: "bloopers".to_string()
            }
        );
    }

    #[test]
    fn test_other_sites_are_ignored() {
        let videos = [VideoEntry::new("v1", "Vimeo", "Trailer")];
        assert!(resolve_trailer(&videos, "Heat", 1995).is_search_fallback());
    }
}
