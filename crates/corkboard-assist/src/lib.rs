//! # corkboard-assist
//!
//! Client for the external classification/resolution collaborator.
//!
//! The collaborator is optional: every trait it implements has a
//! deterministic fallback in corkboard-engine, and every remote failure
//! degrades per-call rather than surfacing to the ingestion caller.
//!
//! This crate provides:
//! - [`AssistConfig`]: explicit configuration constructed once and passed
//!   in (no process-global state)
//! - [`RemoteAssist`]: reqwest JSON client implementing
//!   [`corkboard_core::ResolverBackend`], [`corkboard_core::GrouperBackend`],
//!   and [`corkboard_core::ClassifierBackend`]
//! - [`mock::MockAssist`]: scripted backend for deterministic tests

pub mod config;
pub mod mock;
pub mod remote;

pub use config::AssistConfig;
pub use mock::MockAssist;
pub use remote::RemoteAssist;
