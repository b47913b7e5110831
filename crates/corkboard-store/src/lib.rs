//! # corkboard-store
//!
//! In-memory implementation of the [`corkboard_core::RecordStore`]
//! contract. Owner-scoped maps behind an async `RwLock` provide the
//! consistent snapshots dashboard reads need; durable storage mechanics
//! are out of scope and any other implementation of the trait can be
//! swapped in.

pub mod memory;

pub use memory::MemoryStore;
