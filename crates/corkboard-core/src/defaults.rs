//! Centralized default constants for the corkboard system.
//!
//! **This module is the single source of truth** for all shared default
//! values. All crates reference these constants instead of defining their
//! own magic numbers.

// =============================================================================
// RELEVANCE
// =============================================================================

/// Minimum title length for a candidate to be considered at all.
pub const MIN_TITLE_LEN: usize = 3;

/// Fixed vocabulary of obligation-indicating keywords. A candidate whose
/// title/description matches any of these (after normalization) carries an
/// actionable signal even without an explicit date or time.
pub const OBLIGATION_KEYWORDS: &[&str] = &[
    "due",
    "deadline",
    "pay",
    "payment",
    "bill",
    "invoice",
    "pickup",
    "pick up",
    "drop off",
    "appointment",
    "register",
    "registration",
    "renew",
    "renewal",
    "submit",
    "sign up",
    "signup",
    "rsvp",
    "form",
    "permission slip",
    "expire",
    "expires",
    "return",
    "schedule",
    "reschedule",
    "confirm",
    "bring",
    "meeting",
    "practice",
    "recital",
    "tryout",
    "conference",
    "field trip",
];

// =============================================================================
// MATCHING / RESOLUTION
// =============================================================================

/// Minimum confidence for accepting an external resolver merge decision.
pub const CONFIDENCE_THRESHOLD: f64 = 0.72;

/// Maximum number of existing-record summaries offered to the resolver.
pub const MAX_RESOLVE_CANDIDATES: usize = 5;

/// Fetch bound for candidate-shortlist store queries.
pub const MATCH_FETCH_LIMIT: usize = 25;

// =============================================================================
// DASHBOARD
// =============================================================================

/// Maximum number of headline alerts on a dashboard.
pub const MAX_ALERTS: usize = 5;

/// Summary text rendered when an owner has no active records.
pub const EMPTY_STATE_SUMMARY: &str = "All clear - nothing needs your attention right now.";

// =============================================================================
// ASSIST COLLABORATOR
// =============================================================================

/// Default timeout for assist collaborator requests (seconds).
pub const ASSIST_TIMEOUT_SECS: u64 = 20;

/// Default base URL for the assist collaborator.
pub const ASSIST_URL: &str = "http://localhost:8808";
