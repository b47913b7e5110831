//! Assist collaborator configuration.

use std::time::Duration;

use corkboard_core::defaults;

/// Configuration for the remote assist collaborator.
///
/// Constructed once (typically via [`AssistConfig::from_env`]) and handed
/// to [`crate::RemoteAssist`]; nothing in this crate reads process-global
/// state after construction.
#[derive(Debug, Clone)]
pub struct AssistConfig {
    /// Base URL of the collaborator service.
    pub base_url: String,
    /// Optional bearer token.
    pub api_key: Option<String>,
    /// Bounded per-request timeout.
    pub timeout: Duration,
}

impl Default for AssistConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::ASSIST_URL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(defaults::ASSIST_TIMEOUT_SECS),
        }
    }
}

impl AssistConfig {
    /// Build from environment variables.
    ///
    /// Returns `None` when `CORKBOARD_ASSIST_URL` is unset or empty, which
    /// callers treat as "run deterministic-only".
    pub fn from_env() -> Option<Self> {
        let base_url = match std::env::var("CORKBOARD_ASSIST_URL") {
            Ok(url) if !url.is_empty() => url,
            _ => return None,
        };

        let api_key = std::env::var("CORKBOARD_ASSIST_API_KEY")
            .ok()
            .filter(|k| !k.is_empty());

        let timeout = std::env::var("CORKBOARD_ASSIST_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults::ASSIST_TIMEOUT_SECS);

        Some(Self {
            base_url,
            api_key,
            timeout: Duration::from_secs(timeout),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
