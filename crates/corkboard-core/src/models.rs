//! Core data models for corkboard.
//!
//! These types are shared across all corkboard crates and represent the
//! core domain entities: extracted candidate items, persisted records, and
//! the classified dashboard payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

// =============================================================================
// ENUMS
// =============================================================================

/// Kind of obligation a candidate or record represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Event,
    Deadline,
    Action,
    Info,
}

impl ItemType {
    /// Stable lowercase label used in canonical keys and wire payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Event => "event",
            Self::Deadline => "deadline",
            Self::Action => "action",
            Self::Info => "info",
        }
    }
}

impl std::fmt::Display for ItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Urgency level with a total severity order: `High > Medium > Low`.
///
/// The derive order matters: merges escalate by taking the max, and a
/// later lower-urgency observation must never downgrade a record.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    #[default]
    Medium,
    High,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl std::fmt::Display for Urgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// CANDIDATE ITEMS
// =============================================================================

/// Ephemeral candidate entry produced by the extraction collaborator.
///
/// Field values are raw extraction output; normalization happens inside
/// the pipeline, never at this boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateItem {
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub urgency: Urgency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub people: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,
}

impl CandidateItem {
    /// Minimal candidate with everything optional unset.
    pub fn new(item_type: ItemType, title: impl Into<String>) -> Self {
        Self {
            item_type,
            title: title.into(),
            date: None,
            time: None,
            end_time: None,
            location: None,
            description: None,
            urgency: Urgency::default(),
            category: None,
            people: Vec::new(),
            source_id: None,
            raw_text: None,
        }
    }
}

// =============================================================================
// RECORDS
// =============================================================================

/// Persisted, owner-scoped obligation record.
///
/// `date` and `time` hold the normalized forms (`YYYY-MM-DD` / `HH:MM`,
/// or the compacted-text fallback); `title` and `location` keep the raw
/// extracted text for display, with `normalized_title` alongside.
///
/// Invariants maintained by the pipeline:
/// - at most one active record per owner shares a `canonical_key`;
/// - `occurrence_count == max(1, |source_hashes|)` while active;
/// - empty `source_hashes` implies `retired`, and retirement is
///   irreversible for that record id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: Uuid,
    pub owner_id: Uuid,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub urgency: Urgency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub people: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,
    pub canonical_key: String,
    pub normalized_title: String,
    pub source_hashes: BTreeSet<String>,
    pub occurrence_count: u32,
    pub retired: bool,
    pub created_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
}

impl Record {
    /// Recompute `occurrence_count` from the evidence set (floor 1 while
    /// the record is active).
    pub fn recount_occurrences(&mut self) {
        self.occurrence_count = if self.retired && self.source_hashes.is_empty() {
            0
        } else {
            (self.source_hashes.len() as u32).max(1)
        };
    }

    /// Refresh the last-seen timestamp.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_seen_at = now;
    }
}

// =============================================================================
// DASHBOARD TYPES
// =============================================================================

/// Fixed ordered section vocabulary for the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SectionName {
    #[serde(rename = "Today")]
    Today,
    #[serde(rename = "Tomorrow")]
    Tomorrow,
    #[serde(rename = "Coming Up")]
    ComingUp,
    #[serde(rename = "To-Dos")]
    Todos,
    #[serde(rename = "Other")]
    Other,
}

impl SectionName {
    /// All section names in fixed dashboard order.
    pub const ALL: [SectionName; 5] = [
        Self::Today,
        Self::Tomorrow,
        Self::ComingUp,
        Self::Todos,
        Self::Other,
    ];

    /// Display title exactly as rendered on the dashboard.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::Tomorrow => "Tomorrow",
            Self::ComingUp => "Coming Up",
            Self::Todos => "To-Dos",
            Self::Other => "Other",
        }
    }
}

impl std::fmt::Display for SectionName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

/// One named dashboard section with its records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    #[serde(rename = "title")]
    pub name: SectionName,
    pub items: Vec<Record>,
}

/// Headline alert derived from the final classified sections.
///
/// Alert urgency is restricted to {High, Medium} by construction in the
/// synthesizer; Low never surfaces as an alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub text: String,
    pub urgency: Urgency,
}

/// Rendered dashboard payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub summary: String,
    pub alerts: Vec<Alert>,
    pub sections: Vec<Section>,
    pub item_count: usize,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// API REQUEST/RESPONSE TYPES
// =============================================================================

/// One ingestion batch of extracted candidates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestRequest {
    pub items: Vec<CandidateItem>,
    /// Batch-level source identifier. Per-item `source_id` takes
    /// precedence when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
}

/// Outcome of one ingestion batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestResponse {
    /// Records newly inserted (not merged into an existing identity).
    pub inserted: usize,
    /// Records merged into an existing identity.
    pub merged: usize,
    /// Active records touched by this batch, in processing order.
    pub items: Vec<Record>,
    /// Records that had stale evidence withdrawn before insertion.
    pub sources_reconciled: usize,
}
