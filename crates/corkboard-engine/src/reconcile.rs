//! Re-extraction authority.
//!
//! A source is authoritative for its own content: before a batch inserts
//! anything, every source hash it carries has its prior assertions
//! withdrawn from the records referencing it. Records left with no
//! evidence are retired; retirement is irreversible for that record id,
//! and a later re-extraction creates a fresh record.

use std::collections::{BTreeSet, HashSet};

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use corkboard_core::{RecordStore, Result};

/// Withdraw every assertion the given sources previously made.
///
/// Returns the number of distinct records touched.
pub async fn withdraw_sources(
    store: &dyn RecordStore,
    owner_id: Uuid,
    source_hashes: &BTreeSet<String>,
    now: DateTime<Utc>,
) -> Result<usize> {
    let mut touched: HashSet<Uuid> = HashSet::new();

    for hash in source_hashes {
        for mut record in store.find_by_source(owner_id, hash).await? {
            record.source_hashes.remove(hash);

            if record.source_hashes.is_empty() {
                record.retired = true;
                record.recount_occurrences();
                debug!(record_id = %record.id, source_hash = %hash, "evidence exhausted, retiring");
            } else {
                record.recount_occurrences();
                record.touch(now);
            }

            touched.insert(record.id);
            store.update(record).await?;
        }
    }

    if !touched.is_empty() {
        info!(owner_id = %owner_id, reconciled = touched.len(), "withdrew stale source evidence");
    }
    Ok(touched.len())
}
