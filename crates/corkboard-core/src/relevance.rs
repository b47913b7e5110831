//! Pre-matching relevance filter.
//!
//! Irrelevant candidates are discarded before any matching occurs and are
//! never persisted. Dropping here is silent per-item behavior, not an
//! error.

use crate::defaults::{MIN_TITLE_LEN, OBLIGATION_KEYWORDS};
use crate::models::{CandidateItem, ItemType};
use crate::normalize::normalize_text;

/// Whether normalized text contains any obligation-indicating keyword.
fn matches_keywords(text: &str) -> bool {
    let normalized = normalize_text(text);
    if normalized.is_empty() {
        return false;
    }
    OBLIGATION_KEYWORDS.iter().any(|kw| normalized.contains(kw))
}

/// Whether the candidate carries any temporal signal.
fn has_temporal_signal(item: &CandidateItem) -> bool {
    let present = |field: &Option<String>| field.as_deref().is_some_and(|s| !s.trim().is_empty());
    present(&item.date) || present(&item.time)
}

fn has_location_signal(item: &CandidateItem) -> bool {
    item.location.as_deref().is_some_and(|s| !s.trim().is_empty())
}

/// Decide whether a candidate is worth matching and persisting.
///
/// The bar rises with how passive the item type is: events and deadlines
/// keep on any temporal/location signal, actions need a keyword or a
/// temporal signal, and info items need both.
pub fn is_relevant(item: &CandidateItem) -> bool {
    if item.title.trim().len() < MIN_TITLE_LEN {
        return false;
    }

    let description = item.description.as_deref().unwrap_or("");
    let temporal = has_temporal_signal(item);

    match item.item_type {
        ItemType::Event | ItemType::Deadline => {
            temporal || has_location_signal(item) || matches_keywords(description)
        }
        ItemType::Action => {
            matches_keywords(&format!("{} {}", item.title, description)) || temporal
        }
        ItemType::Info => {
            temporal && matches_keywords(&format!("{} {}", item.title, description))
        }
    }
}
