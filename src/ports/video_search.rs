//! Video Search Port - Interface for the external video search provider.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::curation::SearchCandidate;

/// Port for video search.
///
/// Results come back in provider-chosen relevance order; duration and
/// view-count labels are best-effort and may be empty on some items.
#[async_trait]
pub trait VideoSearch: Send + Sync {
    /// Searches for videos matching the query, returning at most
    /// `max_results` candidates.
    async fn search(
        &self,
        query: &str,
        max_results: u8,
    ) -> Result<Vec<SearchCandidate>, SearchError>;
}

/// Errors from the search provider.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SearchError {
    #[error("Search provider unavailable: {message}")]
    Unavailable { message: String },

    #[error("Search quota exceeded")]
    QuotaExceeded,

    #[error("Authentication with search provider failed")]
    AuthenticationFailed,

    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u32 },

    #[error("Invalid response from search provider: {message}")]
    InvalidResponse { message: String },
}

impl SearchError {
    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates an invalid-response error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }
}
