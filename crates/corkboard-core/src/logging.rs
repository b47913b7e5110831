//! Structured logging schema and field name constants for corkboard.
//!
//! All crates use these constants for consistent structured logging fields,
//! so log aggregation tools can query by standardized names across every
//! subsystem.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events, ingestion completions |
//! | DEBUG | Decision points (match path, merge choice, bucket) |
//! | TRACE | Per-candidate iteration detail |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "engine", "store", "assist"
pub const SUBSYSTEM: &str = "subsystem";

/// Logical operation name.
/// Examples: "ingest", "resolve", "reconcile", "dashboard"
pub const OPERATION: &str = "op";

/// Owner UUID the operation is scoped to.
pub const OWNER_ID: &str = "owner_id";

/// Record UUID being operated on.
pub const RECORD_ID: &str = "record_id";

/// Source hash being reconciled or attached.
pub const SOURCE_HASH: &str = "source_hash";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of candidates in an ingestion batch.
pub const BATCH_SIZE: &str = "batch_size";

/// Number of records inserted by an ingestion.
pub const INSERTED: &str = "inserted";

/// Number of records merged by an ingestion.
pub const MERGED: &str = "merged";

/// Number of records touched by source reconciliation.
pub const RECONCILED: &str = "reconciled";

/// Resolver confidence for a merge decision.
pub const CONFIDENCE: &str = "confidence";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";

/// Initialize the global tracing subscriber from `RUST_LOG`, defaulting to
/// `info` for corkboard crates. Safe to call once per process; tests use
/// `try_init` semantics and ignore repeat registration.
pub fn init() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,corkboard=debug"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
