//! # corkboard-core
//!
//! Core types, traits, and abstractions for the corkboard reconciliation
//! engine.
//!
//! This crate provides the foundational data structures and trait
//! definitions that the other corkboard crates depend on: the candidate
//! and record models, text/date/time normalization, canonical identity
//! keys, the relevance filter, and the seams for the record store and the
//! optional external assist collaborator.

pub mod defaults;
pub mod error;
pub mod keys;
pub mod logging;
pub mod models;
pub mod normalize;
pub mod relevance;
pub mod temporal;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use keys::{build_keys, source_hash, IdentityKeys};
pub use models::*;
pub use normalize::{normalize_date, normalize_text, normalize_time, normalize_title};
pub use relevance::is_relevant;
pub use temporal::{classify_day, parse_normalized_date, DayOffset};
pub use traits::*;
