//! Owner-scoped in-memory record repository.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use corkboard_core::{Error, ItemType, Record, RecordStore, Result};

/// In-memory [`RecordStore`] implementation.
///
/// Records live in per-owner maps behind a single async `RwLock`; reads
/// take snapshots, writes are serialized. Canonical-key uniqueness among
/// active records is enforced at insert.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<Uuid, HashMap<Uuid, Record>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Order a result set by occurrence count, then recency.
    fn order_by_evidence(records: &mut [Record]) {
        records.sort_by(|a, b| {
            b.occurrence_count
                .cmp(&a.occurrence_count)
                .then(b.last_seen_at.cmp(&a.last_seen_at))
        });
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert(&self, record: Record) -> Result<Record> {
        let mut guard = self.records.write().await;
        let board = guard.entry(record.owner_id).or_default();

        if !record.retired
            && board
                .values()
                .any(|r| !r.retired && r.canonical_key == record.canonical_key)
        {
            return Err(Error::Store(format!(
                "active record already exists for canonical key '{}'",
                record.canonical_key
            )));
        }

        debug!(record_id = %record.id, key = %record.canonical_key, "inserting record");
        board.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update(&self, record: Record) -> Result<Record> {
        let mut guard = self.records.write().await;
        let board = guard
            .get_mut(&record.owner_id)
            .ok_or(Error::RecordNotFound(record.id))?;

        match board.get_mut(&record.id) {
            Some(slot) => {
                *slot = record.clone();
                Ok(record)
            }
            None => Err(Error::RecordNotFound(record.id)),
        }
    }

    async fn get(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Record>> {
        let guard = self.records.read().await;
        Ok(guard
            .get(&owner_id)
            .and_then(|board| board.get(&id))
            .cloned())
    }

    async fn get_active_by_key(
        &self,
        owner_id: Uuid,
        canonical_key: &str,
    ) -> Result<Option<Record>> {
        let guard = self.records.read().await;
        Ok(guard.get(&owner_id).and_then(|board| {
            board
                .values()
                .find(|r| !r.retired && r.canonical_key == canonical_key)
                .cloned()
        }))
    }

    async fn find_by_type_and_title(
        &self,
        owner_id: Uuid,
        item_type: ItemType,
        normalized_title: &str,
        limit: usize,
    ) -> Result<Vec<Record>> {
        let guard = self.records.read().await;
        let mut hits: Vec<Record> = guard
            .get(&owner_id)
            .map(|board| {
                board
                    .values()
                    .filter(|r| {
                        !r.retired
                            && r.item_type == item_type
                            && r.normalized_title == normalized_title
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        Self::order_by_evidence(&mut hits);
        hits.truncate(limit);
        Ok(hits)
    }

    async fn find_by_source(&self, owner_id: Uuid, source_hash: &str) -> Result<Vec<Record>> {
        let guard = self.records.read().await;
        Ok(guard
            .get(&owner_id)
            .map(|board| {
                board
                    .values()
                    .filter(|r| !r.retired && r.source_hashes.contains(source_hash))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn find_matching(
        &self,
        owner_id: Uuid,
        item_type: ItemType,
        normalized_title: &str,
        date: Option<&str>,
        time: Option<&str>,
        limit: usize,
    ) -> Result<Vec<Record>> {
        let guard = self.records.read().await;
        let mut hits: Vec<Record> = guard
            .get(&owner_id)
            .map(|board| {
                board
                    .values()
                    .filter(|r| !r.retired && r.item_type == item_type)
                    .filter(|r| {
                        r.normalized_title == normalized_title
                            || (date.is_some() && r.date.as_deref() == date)
                            || (time.is_some() && r.time.as_deref() == time)
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        Self::order_by_evidence(&mut hits);
        hits.truncate(limit);
        Ok(hits)
    }

    async fn retire(&self, owner_id: Uuid, id: Uuid) -> Result<()> {
        let mut guard = self.records.write().await;
        let record = guard
            .get_mut(&owner_id)
            .and_then(|board| board.get_mut(&id))
            .ok_or(Error::RecordNotFound(id))?;

        if record.retired {
            return Err(Error::RecordNotFound(id));
        }
        record.retired = true;
        Ok(())
    }

    async fn retire_all(&self, owner_id: Uuid) -> Result<usize> {
        let mut guard = self.records.write().await;
        let mut count = 0;
        if let Some(board) = guard.get_mut(&owner_id) {
            for record in board.values_mut().filter(|r| !r.retired) {
                record.retired = true;
                count += 1;
            }
        }
        Ok(count)
    }

    async fn list_active(&self, owner_id: Uuid) -> Result<Vec<Record>> {
        let guard = self.records.read().await;
        let mut records: Vec<Record> = guard
            .get(&owner_id)
            .map(|board| board.values().filter(|r| !r.retired).cloned().collect())
            .unwrap_or_default();

        // Urgency desc, dated before undated, then date asc, then recency.
        records.sort_by(|a, b| {
            b.urgency
                .cmp(&a.urgency)
                .then_with(|| match (a.date.as_deref(), b.date.as_deref()) {
                    (Some(da), Some(db)) => da.cmp(db),
                    (Some(_), None) => std::cmp::Ordering::Less,
                    (None, Some(_)) => std::cmp::Ordering::Greater,
                    (None, None) => std::cmp::Ordering::Equal,
                })
                .then(b.last_seen_at.cmp(&a.last_seen_at))
        });
        Ok(records)
    }
}
