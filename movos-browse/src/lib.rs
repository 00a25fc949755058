//! Movos Browse - Screen state for browsing the catalog
//!
//! Holds everything the screens show: home feeds with their "see all"
//! pagination, the search box with debounced suggestions and history, genre
//! discovery, load-more visibility, the user session, detail loading, trailer
//! playback and toast notifications.

pub mod debounce;
pub mod details;
pub mod feeds;
pub mod genre;
pub mod notifications;
pub mod paging;
pub mod playback;
pub mod search;
pub mod session;
pub mod shell;
pub mod visibility;

// Re-export main types
pub use debounce::Debouncer;
pub use details::{DetailLoader, DetailView};
pub use feeds::{FeedOrchestrator, HomeReport};
pub use genre::GenrePipeline;
pub use notifications::{NotificationCenter, Toast, ToastKind};
pub use paging::{LoadOutcome, PaginatedFeed};
pub use playback::{
    DisplayPlatform, HeadlessPlatform, PlatformError, PlaybackController, PlaybackSession,
    TrailerUrls,
};
pub use search::{SearchPhase, SearchPipeline};
pub use session::SessionContext;
pub use shell::{Browser, Tab};
pub use visibility::{LoadMoreContext, LoadMoreVisibility, ScrollMetrics, ViewState};
