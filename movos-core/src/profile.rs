//! User profile and display preferences.

use serde::{Deserialize, Serialize};

use crate::storage::{PreferenceStore, StorageError, keys, load_json, save_json};

/// Signed-in user as shown on the profile page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    /// Year the account was created, e.g. `"2024"`
    pub joined: String,
}

impl UserProfile {
    pub fn new(name: impl Into<String>, email: impl Into<String>, joined: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            joined: joined.into(),
        }
    }

    /// Initials for the avatar badge, at most two letters.
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .take(2)
            .flat_map(char::to_uppercase)
            .collect()
    }
}

/// Notification and display preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub notifications_enabled: bool,
    pub dark_mode: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            notifications_enabled: true,
            dark_mode: false,
        }
    }
}

impl Preferences {
    /// # Errors
    ///
    /// - `StorageError::Io` - If the store could not be read
    /// - `StorageError::Corrupt` - If the stored preferences are unreadable
    pub fn restore(store: &dyn PreferenceStore) -> Result<Self, StorageError> {
        Ok(load_json(store, keys::PREFERENCES)?.unwrap_or_default())
    }

    /// # Errors
    ///
    /// - `StorageError::Io` - If the store could not be written
    pub fn persist(&self, store: &dyn PreferenceStore) -> Result<(), StorageError> {
        save_json(store, keys::PREFERENCES, self)
    }
}
