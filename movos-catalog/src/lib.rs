//! Movos Catalog - Media metadata access
//!
//! Normalizes the metadata service's list, search, discovery and detail
//! endpoints into Movos media types, and selects a playable trailer for
//! each title.

pub mod errors;
pub mod genres;
pub mod providers;
pub mod trailer;
pub mod types;

// Re-export main types
pub use errors::CatalogError;
pub use genres::{DISCOVERY_GENRES, DiscoveryGenre, genre_name};
pub use providers::{DemoGateway, MediaGateway, TmdbGateway};
#[cfg(any(test, feature = "test-utils"))]
pub use providers::{Endpoint, ScriptedGateway};
pub use trailer::{VideoEntry, resolve_trailer};
pub use types::FeedCategory;

/// Convenience type alias for Results with CatalogError.
pub type Result<T> = std::result::Result<T, CatalogError>;
