//! # corkboard-engine
//!
//! The reconciliation pipeline and dashboard renderer.
//!
//! Per ingestion batch: relevance filter → source reconciliation
//! (withdraw stale evidence for re-processed sources) → optional batch
//! grouping → deterministic matching → confidence-gated external
//! resolution → merge or insert. Per dashboard read: active records →
//! section classification (deterministic, or external-assisted and
//! normalized) → alert and summary synthesis.
//!
//! Matching is deterministic regardless of configuration; the external
//! collaborator only ever adds merges and section hints, and every one of
//! its failures degrades to the deterministic path.

pub mod classify;
pub mod config;
pub mod dashboard;
pub mod grouper;
pub mod ingest;
pub mod matcher;
pub mod merge;
pub mod reconcile;
pub mod service;

pub use classify::DeterministicClassifier;
pub use config::PipelineConfig;
pub use grouper::NoopGrouper;
pub use ingest::{DeclineResolver, IngestPipeline};
pub use service::{BoardService, BoardServiceBuilder};
