//! Deterministic identity matching.
//!
//! Lookup order, first success wins: exact canonical key, then loose
//! temporal key among same-type/same-title records. A candidate neither
//! matches is "undecided" when storage holds plausible relatives (shared
//! title, date, or time) worth offering to the external resolver, and
//! plain "new" otherwise.

use tracing::debug;
use uuid::Uuid;

use corkboard_core::{Record, RecordStore, Result};

use crate::ingest::PreparedCandidate;

/// Outcome of the deterministic lookup chain for one candidate.
#[derive(Debug)]
pub enum MatchOutcome {
    /// An existing record deterministically denotes the same obligation.
    Matched(Record),
    /// No deterministic match; shortlist offered to the resolver, ordered
    /// by occurrence count then recency.
    Undecided(Vec<Record>),
    /// Nothing related on file; insert as a fresh record.
    New,
}

/// Loose temporal key of a stored record, recomputed from its current
/// (post-merge) normalized fields rather than the key it was created
/// with, so gap-filled dates participate in matching.
pub fn loose_key_of(record: &Record) -> String {
    format!(
        "{}|{}|{}|{}",
        record.item_type.as_str(),
        record.normalized_title,
        record.date.as_deref().unwrap_or(""),
        record.time.as_deref().unwrap_or("")
    )
}

/// Run the deterministic lookup chain for one prepared candidate.
pub async fn match_candidate(
    store: &dyn RecordStore,
    owner_id: Uuid,
    candidate: &PreparedCandidate,
    fetch_limit: usize,
    shortlist_cap: usize,
) -> Result<MatchOutcome> {
    let keys = &candidate.keys;

    if let Some(record) = store.get_active_by_key(owner_id, &keys.canonical).await? {
        debug!(record_id = %record.id, "exact canonical key match");
        return Ok(MatchOutcome::Matched(record));
    }

    let same_title = store
        .find_by_type_and_title(
            owner_id,
            candidate.item.item_type,
            &keys.normalized_title,
            fetch_limit,
        )
        .await?;
    if let Some(record) = same_title.iter().find(|r| loose_key_of(r) == keys.loose) {
        debug!(record_id = %record.id, "loose temporal key match");
        return Ok(MatchOutcome::Matched(record.clone()));
    }

    let mut shortlist = store
        .find_matching(
            owner_id,
            candidate.item.item_type,
            &keys.normalized_title,
            keys.normalized_date.as_deref(),
            keys.normalized_time.as_deref(),
            fetch_limit,
        )
        .await?;
    shortlist.truncate(shortlist_cap);

    if shortlist.is_empty() {
        Ok(MatchOutcome::New)
    } else {
        debug!(shortlist = shortlist.len(), "undecided, deferring to resolver");
        Ok(MatchOutcome::Undecided(shortlist))
    }
}
