//! Movos Core - Domain types, local persistence and accounts
//!
//! This crate provides the building blocks shared by every Movos component:
//! media and profile types, the local preference store, the simulated
//! account store, bounded user histories, and configuration management.

pub mod account;
pub mod config;
pub mod library;
pub mod media;
pub mod profile;
pub mod storage;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_fixtures;
pub mod tracing_setup;

// Re-export main types for convenient access
pub use account::{AccountStore, AuthError, LocalAccountStore};
pub use config::MovosConfig;
pub use library::{RecentlyViewedLog, SaveToggle, SavedSet, SearchHistory};
pub use media::{
    CastMember, MediaDetail, MediaSummary, MediaType, ReleaseBadge, TrailerResolution,
};
pub use profile::{Preferences, UserProfile};
pub use storage::{JsonFileStore, MemoryStore, PreferenceStore, StorageError};

/// Core errors that can bubble up from any Movos subsystem.
///
/// High-level error types representing failures in core functionality.
#[derive(Debug, thiserror::Error)]
pub enum MovosError {
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Catalog error: {reason}")]
    Catalog { reason: String },

    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MovosError {
    /// Returns a user-friendly error message suitable for display.
    ///
    /// Authentication failures keep their distinct wording so the auth form
    /// can tell invalid credentials apart from a duplicate registration.
    pub fn user_message(&self) -> String {
        match self {
            MovosError::Auth(e) => match e {
                AuthError::InvalidCredentials => "Invalid email or password".to_string(),
                AuthError::EmailAlreadyRegistered => "Email already registered".to_string(),
                AuthError::NameRequired => "Name is required".to_string(),
                AuthError::Storage(_) => "Authentication failed".to_string(),
            },
            MovosError::Storage(_) => "Could not access local data".to_string(),
            MovosError::Catalog { .. } => "Could not reach the media catalog".to_string(),
            MovosError::Configuration { .. } => "Configuration error occurred".to_string(),
            MovosError::Io(_) => "File system error occurred".to_string(),
        }
    }

    /// Checks if this error is due to user input validation.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            MovosError::Configuration { .. }
                | MovosError::Auth(
                    AuthError::InvalidCredentials
                        | AuthError::EmailAlreadyRegistered
                        | AuthError::NameRequired
                )
        )
    }

    /// Wraps a catalog failure coming from a gateway implementation.
    pub fn from_catalog_error(error: impl std::fmt::Display) -> Self {
        MovosError::Catalog {
            reason: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MovosError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_messages_are_distinct() {
        let invalid = MovosError::from(AuthError::InvalidCredentials);
        let duplicate = MovosError::from(AuthError::EmailAlreadyRegistered);

        assert_ne!(invalid.user_message(), duplicate.user_message());
        assert!(invalid.is_user_error());
        assert!(duplicate.is_user_error());
    }

    #[test]
    fn test_catalog_error_is_not_user_error() {
        let error = MovosError::from_catalog_error("connection reset");
        assert!(!error.is_user_error());
        assert!(error.to_string().contains("connection reset"));
    }
}
