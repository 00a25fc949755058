//! Centralized configuration for Movos.
//!
//! All tunable parameters and settings are defined here to avoid
//! hard-coded values scattered throughout the codebase.

use std::path::PathBuf;
use std::time::Duration;

use crate::MovosError;

/// Central configuration for all Movos components.
///
/// Groups related configuration settings into logical sections.
/// Supports environment variable overrides for runtime customization.
#[derive(Debug, Clone, Default)]
pub struct MovosConfig {
    pub catalog: CatalogConfig,
    pub browse: BrowseConfig,
    pub storage: StorageConfig,
}

/// Media metadata API configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// API key for the metadata service (required for live requests)
    pub api_key: Option<String>,
    /// Base URL of the metadata REST API
    pub base_url: String,
    /// Base URL for poster, backdrop and profile images
    pub image_base_url: String,
    /// Response language
    pub language: String,
    /// HTTP request timeout
    pub request_timeout: Duration,
    /// Sort search results by year, newest first
    pub sort_search_by_year: bool,
    /// Minimum vote count for genre discovery results
    pub min_vote_count: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.themoviedb.org/3".to_string(),
            image_base_url: "https://image.tmdb.org/t/p".to_string(),
            language: "en-US".to_string(),
            request_timeout: Duration::from_secs(30),
            sort_search_by_year: true,
            min_vote_count: 10,
        }
    }
}

/// Browsing behavior: debounce, pagination triggers and notifications.
#[derive(Debug, Clone)]
pub struct BrowseConfig {
    /// Quiet period after the last keystroke before suggestions are fetched
    pub search_debounce: Duration,
    /// Number of suggestions kept from the first result page
    pub suggestion_limit: usize,
    /// Suggestions require a trimmed query longer than this
    pub min_suggestion_chars: usize,
    /// Distance from the bottom at which "load more" becomes visible
    pub load_more_threshold_px: f64,
    /// Delay before the new-content notification is shown
    pub notification_delay: Duration,
    /// How long a notification stays visible
    pub notification_ttl: Duration,
}

impl Default for BrowseConfig {
    fn default() -> Self {
        Self {
            search_debounce: Duration::from_millis(400),
            suggestion_limit: 4,
            min_suggestion_chars: 1,
            load_more_threshold_px: 300.0,
            notification_delay: Duration::from_secs(1),
            notification_ttl: Duration::from_secs(3),
        }
    }
}

/// Device-local persistence configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Directory holding the preference file
    pub data_dir: PathBuf,
    /// File name of the preference store
    pub preferences_file: &'static str,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: dirs::data_dir()
                .map(|dir| dir.join("movos"))
                .unwrap_or_else(|| PathBuf::from(".movos")),
            preferences_file: "preferences.json",
        }
    }
}

impl StorageConfig {
    pub fn preferences_path(&self) -> PathBuf {
        self.data_dir.join(self.preferences_file)
    }
}

impl MovosConfig {
    /// Creates configuration with environment variable overrides.
    ///
    /// Allows runtime configuration via environment variables while
    /// maintaining sensible defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(api_key) = std::env::var("MOVOS_TMDB_API_KEY") {
            if !api_key.trim().is_empty() {
                config.catalog.api_key = Some(api_key);
            }
        }

        if let Ok(base_url) = std::env::var("MOVOS_TMDB_BASE_URL") {
            config.catalog.base_url = base_url.trim_end_matches('/').to_string();
        }

        if let Ok(timeout) = std::env::var("MOVOS_REQUEST_TIMEOUT") {
            if let Ok(seconds) = timeout.parse::<u64>() {
                config.catalog.request_timeout = Duration::from_secs(seconds);
            }
        }

        if let Ok(sort) = std::env::var("MOVOS_SORT_SEARCH_BY_YEAR") {
            config.catalog.sort_search_by_year = sort.parse().unwrap_or(true);
        }

        if let Ok(debounce) = std::env::var("MOVOS_SEARCH_DEBOUNCE_MS") {
            if let Ok(millis) = debounce.parse::<u64>() {
                config.browse.search_debounce = Duration::from_millis(millis);
            }
        }

        if let Ok(data_dir) = std::env::var("MOVOS_DATA_DIR") {
            config.storage.data_dir = PathBuf::from(data_dir);
        }

        config
    }

    /// Creates a configuration optimized for testing.
    ///
    /// Timers are shortened so tests driven by a paused clock advance quickly.
    pub fn for_testing() -> Self {
        Self {
            browse: BrowseConfig {
                search_debounce: Duration::from_millis(400),
                notification_delay: Duration::ZERO,
                ..BrowseConfig::default()
            },
            storage: StorageConfig {
                data_dir: std::env::temp_dir().join("movos-test"),
                ..StorageConfig::default()
            },
            ..Default::default()
        }
    }

    /// Checks values that would otherwise fail at first use.
    ///
    /// # Errors
    ///
    /// - `MovosError::Configuration` - If a setting is out of range
    pub fn validate(&self) -> Result<(), MovosError> {
        if self.catalog.base_url.is_empty() {
            return Err(MovosError::Configuration {
                reason: "catalog base URL is empty".to_string(),
            });
        }
        if self.browse.suggestion_limit == 0 {
            return Err(MovosError::Configuration {
                reason: "suggestion limit must be at least 1".to_string(),
            });
        }
        if self.browse.load_more_threshold_px < 0.0 {
            return Err(MovosError::Configuration {
                reason: "load-more threshold cannot be negative".to_string(),
            });
        }
        Ok(())
    }
}
