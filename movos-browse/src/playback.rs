//! Trailer playback.
//!
//! Resolved trailers are turned into embeddable player URLs. Entering
//! playback asks the display platform for fullscreen and a landscape lock;
//! either may be refused, and playback continues regardless.

use movos_core::TrailerResolution;
use url::Url;

const EMBED_BASE: &str = "https://www.youtube.com/embed";
const WATCH_URL: &str = "https://www.youtube.com/watch";
const RESULTS_URL: &str = "https://www.youtube.com/results";

/// Errors reported by a display platform.
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("Fullscreen is not available: {reason}")]
    FullscreenUnavailable { reason: String },

    #[error("Orientation lock is not supported: {reason}")]
    OrientationUnsupported { reason: String },
}

/// Window and orientation control of the host device.
pub trait DisplayPlatform: Send + Sync {
    /// # Errors
    /// - `PlatformError::FullscreenUnavailable` - The request was refused
    fn request_fullscreen(&self) -> Result<(), PlatformError>;

    /// # Errors
    /// - `PlatformError::FullscreenUnavailable` - Not in fullscreen
    fn exit_fullscreen(&self) -> Result<(), PlatformError>;

    /// # Errors
    /// - `PlatformError::OrientationUnsupported` - Lock not supported
    fn lock_landscape(&self) -> Result<(), PlatformError>;

    /// # Errors
    /// - `PlatformError::OrientationUnsupported` - Lock not supported
    fn unlock_orientation(&self) -> Result<(), PlatformError>;
}

/// Player URLs for a resolved trailer.
pub trait TrailerUrls {
    /// Embeddable player URL; `origin` is passed through for the player API.
    fn embed_url(&self, origin: Option<&str>) -> String;

    /// Link that opens the trailer on the video site itself.
    fn external_url(&self) -> String;
}

impl TrailerUrls for TrailerResolution {
    fn embed_url(&self, origin: Option<&str>) -> String {
        let (path, autoplay) = match self {
            TrailerResolution::Video { key } => (format!("{EMBED_BASE}/{key}"), "1"),
            TrailerResolution::SearchFallback { .. } => (EMBED_BASE.to_string(), "0"),
        };

        let Ok(mut url) = Url::parse(&path) else {
            return path;
        };
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("autoplay", autoplay)
                .append_pair("playsinline", "1")
                .append_pair("rel", "0");
            if let Some(origin) = origin {
                query.append_pair("origin", origin);
            }
            if let TrailerResolution::SearchFallback { query: search } = self {
                query
                    .append_pair("listType", "search")
                    .append_pair("list", search);
            }
        }
        url.into()
    }

    fn external_url(&self) -> String {
        let pairs = match self {
            TrailerResolution::Video { key } => (WATCH_URL, [("v", key.as_str())]),
            TrailerResolution::SearchFallback { query } => {
                (RESULTS_URL, [("search_query", query.as_str())])
            }
        };
        match Url::parse_with_params(pairs.0, pairs.1) {
            Ok(url) => url.into(),
            Err(e) => {
                tracing::debug!(error = %e, "Could not build external trailer link");
                pairs.0.to_string()
            }
        }
    }
}

/// An open player and what the platform granted it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackSession {
    pub embed_url: String,
    /// Opens the video, or the search it falls back to, on the video site.
    pub external_url: String,
    pub fullscreen: bool,
    pub landscape: bool,
}

/// Opens and closes the trailer player.
#[derive(Debug)]
pub struct PlaybackController<P: DisplayPlatform> {
    platform: P,
    origin: Option<String>,
    session: Option<PlaybackSession>,
}

impl<P: DisplayPlatform> PlaybackController<P> {
    pub fn new(platform: P, origin: Option<String>) -> Self {
        Self {
            platform,
            origin,
            session: None,
        }
    }

    /// Starts playback, requesting fullscreen and then a landscape lock.
    pub fn enter(&mut self, trailer: &TrailerResolution) -> &PlaybackSession {
        let fullscreen = match self.platform.request_fullscreen() {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(error = %e, "Fullscreen refused");
                false
            }
        };
        let landscape = match self.platform.lock_landscape() {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(error = %e, "Landscape lock refused");
                false
            }
        };

        let session = PlaybackSession {
            embed_url: trailer.embed_url(self.origin.as_deref()),
            external_url: trailer.external_url(),
            fullscreen,
            landscape,
        };
        tracing::info!(url = %session.embed_url, fullscreen, landscape, "Trailer playback started");
        self.session.insert(session)
    }

    /// Stops playback, releasing orientation before leaving fullscreen.
    pub fn exit(&mut self) -> Option<PlaybackSession> {
        let session = self.session.take()?;
        if let Err(e) = self.platform.unlock_orientation() {
            tracing::debug!(error = %e, "Orientation unlock failed");
        }
        if let Err(e) = self.platform.exit_fullscreen() {
            tracing::debug!(error = %e, "Fullscreen exit failed");
        }
        Some(session)
    }

    pub fn session(&self) -> Option<&PlaybackSession> {
        self.session.as_ref()
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }
}

/// Platform without window control, such as a terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadlessPlatform;

impl DisplayPlatform for HeadlessPlatform {
    fn request_fullscreen(&self) -> Result<(), PlatformError> {
        Err(PlatformError::FullscreenUnavailable {
            reason: "headless".to_string(),
        })
    }

    fn exit_fullscreen(&self) -> Result<(), PlatformError> {
        Ok(())
    }

    fn lock_landscape(&self) -> Result<(), PlatformError> {
        Err(PlatformError::OrientationUnsupported {
            reason: "headless".to_string(),
        })
    }

    fn unlock_orientation(&self) -> Result<(), PlatformError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Debug, Default)]
    struct RecordingPlatform {
        refuse_fullscreen: bool,
        calls: Mutex<Vec<&'static str>>,
    }

    impl DisplayPlatform for RecordingPlatform {
        fn request_fullscreen(&self) -> Result<(), PlatformError> {
            self.calls.lock().push("fullscreen");
            if self.refuse_fullscreen {
                return Err(PlatformError::FullscreenUnavailable {
                    reason: "denied".to_string(),
                });
            }
            Ok(())
        }

        fn exit_fullscreen(&self) -> Result<(), PlatformError> {
            self.calls.lock().push("exit_fullscreen");
            Ok(())
        }

        fn lock_landscape(&self) -> Result<(), PlatformError> {
            self.calls.lock().push("lock");
            Ok(())
        }

        fn unlock_orientation(&self) -> Result<(), PlatformError> {
            self.calls.lock().push("unlock");
            Ok(())
        }
    }

    #[test]
    fn test_direct_embed_url() {
        let trailer = TrailerResolution::Video {
            key: "Way9Dexny3w".to_string(),
        };
        assert_eq!(
            trailer.embed_url(None),
            "https://www.youtube.com/embed/Way9Dexny3w?autoplay=1&playsinline=1&rel=0"
        );
        assert_eq!(
            trailer.embed_url(Some("https://movos.app")),
            "https://www.youtube.com/embed/Way9Dexny3w?autoplay=1&playsinline=1&rel=0&origin=https%3A%2F%2Fmovos.app"
        );
        assert_eq!(
            trailer.external_url(),
            "https://www.youtube.com/watch?v=Way9Dexny3w"
        );
    }

    #[test]
    fn test_search_fallback_urls() {
        let trailer = TrailerResolution::SearchFallback {
            query: "Dune 2021 Official Trailer".to_string(),
        };
        assert_eq!(
            trailer.embed_url(None),
            "https://www.youtube.com/embed?autoplay=0&playsinline=1&rel=0&listType=search&list=Dune+2021+Official+Trailer"
        );
        assert_eq!(
            trailer.external_url(),
            "https://www.youtube.com/results?search_query=Dune+2021+Official+Trailer"
        );
    }

    #[test]
    fn test_refused_fullscreen_still_plays_and_exit_order() {
        let platform = RecordingPlatform {
            refuse_fullscreen: true,
            ..RecordingPlatform::default()
        };
        let mut controller = PlaybackController::new(platform, None);

        let session = controller
            .enter(&TrailerResolution::Video {
                key: "k".to_string(),
            })
            .clone();
        assert!(!session.fullscreen);
        assert!(session.landscape);

        assert_eq!(controller.exit(), Some(session));
        assert!(controller.exit().is_none());
        assert_eq!(
            *controller.platform().calls.lock(),
            ["fullscreen", "lock", "unlock", "exit_fullscreen"]
        );
    }

    #[test]
    fn test_headless_platform() {
        let mut controller = PlaybackController::new(HeadlessPlatform, None);
        let session = controller.enter(&TrailerResolution::SearchFallback {
            query: "Heat 1995 Official Trailer".to_string(),
        });
        assert!(!session.fullscreen && !session.landscape);
        assert!(session.embed_url.contains("listType=search"));
        assert_eq!(
            session.external_url,
            "https://www.youtube.com/results?search_query=Heat+1995+Official+Trailer"
        );
    }
}
