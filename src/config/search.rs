//! Video-search configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// YouTube Data API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// YouTube Data API key
    pub youtube_api_key: Option<String>,

    /// Candidate batch size per search
    #[serde(default = "default_max_results")]
    pub max_results: u8,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl SearchConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if an API key is configured
    pub fn has_api_key(&self) -> bool {
        self.youtube_api_key
            .as_ref()
            .is_some_and(|k| !k.is_empty())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.has_api_key() {
            return Err(ValidationError::MissingRequired("YOUTUBE_API_KEY"));
        }
        if self.max_results == 0 || self.max_results > 50 {
            return Err(ValidationError::InvalidMaxResults);
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            youtube_api_key: None,
            max_results: default_max_results(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_max_results() -> u8 {
    10
}

fn default_timeout() -> u64 {
    15
}
