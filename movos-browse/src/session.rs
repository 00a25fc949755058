//! Signed-in user, saved titles and viewing history.
//!
//! The session is restored explicitly at launch and torn down on sign out.
//! Everything it owns is persisted through the preference store as it
//! changes.

use std::sync::Arc;

use movos_core::storage::keys;
use movos_core::{
    AccountStore, AuthError, MediaSummary, PreferenceStore, Preferences, RecentlyViewedLog,
    SaveToggle, SavedSet, StorageError, UserProfile,
};
use parking_lot::Mutex;

use crate::notifications::{
    NotificationCenter, PROFILE_UPDATED_MESSAGE, REMOVED_MESSAGE, SAVED_MESSAGE, ToastKind,
    WATCH_HISTORY_CLEARED_MESSAGE,
};

#[derive(Debug, Default)]
struct SessionState {
    user: Option<UserProfile>,
    saved: SavedSet,
    recent: RecentlyViewedLog,
    preferences: Preferences,
}

/// Per-user state shared by every screen.
#[derive(Debug)]
pub struct SessionContext {
    store: Arc<dyn PreferenceStore>,
    accounts: Arc<dyn AccountStore>,
    notifications: NotificationCenter,
    state: Mutex<SessionState>,
}

impl SessionContext {
    /// Restores the session user, saved titles, history and preferences.
    ///
    /// # Errors
    ///
    /// - `AuthError::Storage` - If the session user could not be read
    pub async fn restore(
        store: Arc<dyn PreferenceStore>,
        accounts: Arc<dyn AccountStore>,
        notifications: NotificationCenter,
    ) -> Result<Self, AuthError> {
        let user = accounts.current_user().await?;
        let saved = SavedSet::restore(store.as_ref())?;
        let recent = RecentlyViewedLog::restore(store.as_ref())?;
        let preferences = Preferences::restore(store.as_ref()).unwrap_or_else(|e| {
            tracing::error!(error = %e, "Could not read preferences, using defaults");
            Preferences::default()
        });
        notifications.set_enabled(preferences.notifications_enabled);

        tracing::info!(
            signed_in = user.is_some(),
            saved = saved.len(),
            recent = recent.len(),
            "Session restored"
        );
        Ok(Self {
            store,
            accounts,
            notifications,
            state: Mutex::new(SessionState {
                user,
                saved,
                recent,
                preferences,
            }),
        })
    }

    /// # Errors
    ///
    /// - `AuthError::InvalidCredentials` - Unknown email or wrong password
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<UserProfile, AuthError> {
        let profile = self.accounts.login(email, password).await?;
        self.begin_user_session(profile.clone());
        Ok(profile)
    }

    /// # Errors
    ///
    /// - `AuthError::NameRequired` - Blank name
    /// - `AuthError::EmailAlreadyRegistered` - Email already has an account
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<UserProfile, AuthError> {
        let profile = self.accounts.register(name, email, password).await?;
        self.begin_user_session(profile.clone());
        Ok(profile)
    }

    /// Sets the user and reloads the stored history that sign out dropped.
    fn begin_user_session(&self, profile: UserProfile) {
        let recent = RecentlyViewedLog::restore(self.store.as_ref()).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Could not reload recently viewed titles");
            RecentlyViewedLog::new()
        });
        let mut state = self.state.lock();
        state.user = Some(profile);
        state.recent = recent;
    }

    /// Ends the session and forgets in-memory viewing history.
    ///
    /// # Errors
    ///
    /// - `AuthError::Storage` - If the session could not be cleared
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        self.accounts.logout().await?;
        let mut state = self.state.lock();
        state.user = None;
        state.recent.clear();
        Ok(())
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.state.lock().user.clone()
    }

    pub fn is_signed_in(&self) -> bool {
        self.state.lock().user.is_some()
    }

    /// Records that `item` was opened.
    pub fn view(&self, item: &MediaSummary) {
        let mut state = self.state.lock();
        state.recent.record(item.clone());
        if let Err(e) = state.recent.persist(self.store.as_ref()) {
            tracing::warn!(error = %e, "Could not store recently viewed titles");
        }
    }

    pub fn recently_viewed(&self) -> Vec<MediaSummary> {
        self.state.lock().recent.items().to_vec()
    }

    /// Forgets every viewed title, in memory and in the store.
    ///
    /// # Errors
    ///
    /// - `StorageError::Io` - If the stored log could not be removed
    pub fn clear_recently_viewed(&self) -> Result<(), StorageError> {
        {
            let mut state = self.state.lock();
            self.store.remove(keys::RECENTLY_VIEWED)?;
            state.recent.clear();
        }
        self.notifications
            .post(WATCH_HISTORY_CLEARED_MESSAGE, ToastKind::Info);
        Ok(())
    }

    /// Adds or removes `item` from the saved list and announces the change.
    pub fn toggle_saved(&self, item: &MediaSummary) -> SaveToggle {
        let toggle = {
            let mut state = self.state.lock();
            let toggle = state.saved.toggle(item);
            if let Err(e) = state.saved.persist(self.store.as_ref()) {
                tracing::warn!(error = %e, "Could not store saved titles");
            }
            toggle
        };

        let (message, kind) = match toggle {
            SaveToggle::Saved => (SAVED_MESSAGE, ToastKind::Success),
            SaveToggle::Removed => (REMOVED_MESSAGE, ToastKind::Info),
        };
        self.notifications.post(message, kind);
        toggle
    }

    pub fn is_saved(&self, id: &str) -> bool {
        self.state.lock().saved.contains(id)
    }

    pub fn saved(&self) -> Vec<MediaSummary> {
        self.state.lock().saved.items().to_vec()
    }

    /// Replaces the profile of the signed-in user.
    ///
    /// # Errors
    ///
    /// - `AuthError::Storage` - If the profile could not be stored
    pub async fn update_profile(&self, profile: UserProfile) -> Result<(), AuthError> {
        self.accounts.save_profile(&profile).await?;
        self.state.lock().user = Some(profile);
        self.notifications.post(PROFILE_UPDATED_MESSAGE, ToastKind::Success);
        Ok(())
    }

    pub fn preferences(&self) -> Preferences {
        self.state.lock().preferences
    }

    /// # Errors
    ///
    /// - `StorageError::Io` - If the preferences could not be stored
    pub fn set_preferences(&self, preferences: Preferences) -> Result<(), StorageError> {
        preferences.persist(self.store.as_ref())?;
        self.state.lock().preferences = preferences;
        self.notifications.set_enabled(preferences.notifications_enabled);
        Ok(())
    }
}
