//! Error types for catalog access.

use thiserror::Error;

/// Errors that can occur while talking to the media metadata service.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No API key was configured for a live gateway.
    #[error("Catalog API key is missing")]
    MissingApiKey,

    /// Network communication error occurred during a request.
    #[error("Network error on {path}: {reason}")]
    NetworkError {
        /// Request path that failed
        path: String,
        /// The reason for the network error
        reason: String,
    },

    /// The service rejected the API key.
    #[error("Catalog API key is invalid")]
    Unauthorized,

    /// The service asked us to slow down.
    #[error("Catalog rate limit exceeded")]
    RateLimited,

    /// Requested resource does not exist.
    #[error("Not found: {path}")]
    NotFound {
        /// Request path that returned 404
        path: String,
    },

    /// Any other non-success status.
    #[error("Catalog returned status {status} for {path}")]
    UnexpectedStatus {
        /// Request path
        path: String,
        /// HTTP status code
        status: u16,
    },

    /// Failed to parse the response body.
    #[error("Parse error on {path}: {reason}")]
    ParseError {
        /// Request path whose body failed to parse
        path: String,
        /// The reason for the parse error
        reason: String,
    },

    /// Failed to build the HTTP client.
    #[error("Client setup failed: {reason}")]
    ClientSetup {
        /// The reason the client could not be built
        reason: String,
    },

    /// Scripted failure from a test or demo gateway.
    #[error("Provider error: {reason}")]
    ProviderError {
        /// The reason for the provider error
        reason: String,
    },
}

impl CatalogError {
    /// Returns true for failures a later retry may fix.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            CatalogError::NetworkError { .. }
                | CatalogError::RateLimited
                | CatalogError::UnexpectedStatus { .. }
                | CatalogError::ProviderError { .. }
        )
    }
}
