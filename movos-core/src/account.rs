//! Account store.
//!
//! Accounts live in the local preference store as a simulated account
//! table; there is no remote identity service. Passwords are kept as salted
//! SHA-1 digests rather than in clear text.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};

use crate::profile::UserProfile;
use crate::storage::{PreferenceStore, StorageError, keys, load_json, save_json};

/// Errors surfaced by sign-in and registration.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Email already registered")]
    EmailAlreadyRegistered,

    #[error("Name is required")]
    NameRequired,

    #[error("Account storage failed: {0}")]
    Storage(#[from] StorageError),
}

/// Authentication and session persistence.
#[async_trait]
pub trait AccountStore: Send + Sync + std::fmt::Debug {
    /// Returns the signed-in user, if any.
    ///
    /// # Errors
    /// - `AuthError::Storage` - Session could not be read
    async fn current_user(&self) -> Result<Option<UserProfile>, AuthError>;

    /// Signs in an existing account and stores it as the session user.
    ///
    /// # Errors
    /// - `AuthError::InvalidCredentials` - Unknown email or wrong password
    /// - `AuthError::Storage` - Account table could not be read
    async fn login(&self, email: &str, password: &str) -> Result<UserProfile, AuthError>;

    /// Creates an account and signs it in.
    ///
    /// # Errors
    /// - `AuthError::NameRequired` - Blank name
    /// - `AuthError::EmailAlreadyRegistered` - Email already has an account
    /// - `AuthError::Storage` - Account table could not be written
    async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<UserProfile, AuthError>;

    /// Replaces the stored session profile after an edit.
    ///
    /// # Errors
    /// - `AuthError::Storage` - Session could not be written
    async fn save_profile(&self, profile: &UserProfile) -> Result<(), AuthError>;

    /// Clears the session user.
    ///
    /// # Errors
    /// - `AuthError::Storage` - Session could not be removed
    async fn logout(&self) -> Result<(), AuthError>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredAccount {
    name: String,
    email: String,
    salt: String,
    password_digest: String,
    joined: String,
}

impl StoredAccount {
    fn profile(&self) -> UserProfile {
        UserProfile::new(&self.name, &self.email, &self.joined)
    }

    fn verify(&self, password: &str) -> bool {
        digest_password(&self.salt, password) == self.password_digest
    }
}

/// Account store backed by a [`PreferenceStore`].
#[derive(Debug, Clone)]
pub struct LocalAccountStore {
    store: Arc<dyn PreferenceStore>,
}

impl LocalAccountStore {
    pub fn new(store: Arc<dyn PreferenceStore>) -> Self {
        Self { store }
    }

    fn accounts(&self) -> Result<Vec<StoredAccount>, AuthError> {
        Ok(load_json(self.store.as_ref(), keys::ACCOUNTS)?.unwrap_or_default())
    }

    fn start_session(&self, profile: &UserProfile) -> Result<(), AuthError> {
        save_json(self.store.as_ref(), keys::SESSION_USER, profile)?;
        Ok(())
    }
}

#[async_trait]
impl AccountStore for LocalAccountStore {
    async fn current_user(&self) -> Result<Option<UserProfile>, AuthError> {
        Ok(load_json(self.store.as_ref(), keys::SESSION_USER)?)
    }

    async fn login(&self, email: &str, password: &str) -> Result<UserProfile, AuthError> {
        let email = normalize_email(email);
        let account = self
            .accounts()?
            .into_iter()
            .find(|account| account.email == email && account.verify(password))
            .ok_or(AuthError::InvalidCredentials)?;

        let profile = account.profile();
        self.start_session(&profile)?;
        tracing::info!(email = %profile.email, "Signed in");
        Ok(profile)
    }

    async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<UserProfile, AuthError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AuthError::NameRequired);
        }

        let email = normalize_email(email);
        let mut accounts = self.accounts()?;
        if accounts.iter().any(|account| account.email == email) {
            return Err(AuthError::EmailAlreadyRegistered);
        }

        let salt = uuid::Uuid::new_v4().simple().to_string();
        let account = StoredAccount {
            name: name.to_string(),
            email,
            password_digest: digest_password(&salt, password),
            salt,
            joined: chrono::Utc::now().year().to_string(),
        };
        let profile = account.profile();
        accounts.push(account);
        save_json(self.store.as_ref(), keys::ACCOUNTS, &accounts)?;

        self.start_session(&profile)?;
        tracing::info!(email = %profile.email, "Registered new account");
        Ok(profile)
    }

    async fn save_profile(&self, profile: &UserProfile) -> Result<(), AuthError> {
        self.start_session(profile)
    }

    async fn logout(&self) -> Result<(), AuthError> {
        self.store.remove(keys::SESSION_USER)?;
        tracing::info!("Signed out");
        Ok(())
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn digest_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}
