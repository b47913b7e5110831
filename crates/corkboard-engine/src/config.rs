//! Pipeline configuration.

use corkboard_core::defaults;

/// Tunables for the reconciliation pipeline and dashboard synthesis.
///
/// Constructed once and passed into the service; components never read
/// process-global state.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Minimum confidence for accepting an external merge verdict.
    pub confidence_threshold: f64,
    /// Maximum existing-record summaries offered to the resolver.
    pub max_resolve_candidates: usize,
    /// Fetch bound for shortlist store queries.
    pub match_fetch_limit: usize,
    /// Maximum headline alerts on the dashboard.
    pub max_alerts: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: defaults::CONFIDENCE_THRESHOLD,
            max_resolve_candidates: defaults::MAX_RESOLVE_CANDIDATES,
            match_fetch_limit: defaults::MATCH_FETCH_LIMIT,
            max_alerts: defaults::MAX_ALERTS,
        }
    }
}
