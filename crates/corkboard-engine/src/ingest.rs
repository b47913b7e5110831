//! The ingestion pipeline.
//!
//! Candidates are processed sequentially in batch order: later candidates'
//! matching decisions may depend on records created or mutated by earlier
//! candidates in the same batch (read-your-own-writes). Resolver verdicts
//! are cached per batch by resolution key, and every external failure
//! degrades to "no merge" rather than failing the request.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use corkboard_core::{
    build_keys, is_relevant, source_hash, CandidateItem, GrouperBackend, IdentityKeys,
    IngestRequest, IngestResponse, ItemType, Record, RecordStore, ResolveCandidate, Resolution,
    ResolverBackend, Result,
};
use corkboard_core::{Error, GroupingPlan};

use crate::config::PipelineConfig;
use crate::grouper::apply_plan;
use crate::matcher::{match_candidate, MatchOutcome};
use crate::merge::{merge_into, new_record};
use crate::reconcile::withdraw_sources;

/// Per-batch resolver cache key: repeated obligations within one batch
/// resolve once.
type ResolutionKey = (ItemType, String, String, String);

/// One relevance-filtered candidate with its identity keys and evidence.
#[derive(Debug, Clone)]
pub struct PreparedCandidate {
    pub item: CandidateItem,
    pub keys: IdentityKeys,
    pub sources: BTreeSet<String>,
}

impl PreparedCandidate {
    /// Prepare a candidate: derive identity keys and hash its source
    /// identifier (per-item id overriding the batch-level id).
    pub fn new(item: CandidateItem, batch_source: Option<&str>) -> Self {
        let keys = Self::keys_for(&item);
        let sources = item
            .source_id
            .as_deref()
            .or(batch_source)
            .map(source_hash)
            .into_iter()
            .collect();
        Self { item, keys, sources }
    }

    /// Recompute identity keys after the item's fields changed
    /// (cluster synthesis gap-fills scheduling fields).
    pub fn rebuild_keys(&mut self) {
        self.keys = Self::keys_for(&self.item);
    }

    fn keys_for(item: &CandidateItem) -> IdentityKeys {
        build_keys(
            item.item_type,
            &item.title,
            item.date.as_deref(),
            item.time.as_deref(),
            item.location.as_deref(),
        )
    }

    fn resolution_key(&self) -> ResolutionKey {
        (
            self.item.item_type,
            self.keys.normalized_title.clone(),
            self.keys.normalized_date.clone().unwrap_or_default(),
            self.keys.normalized_time.clone().unwrap_or_default(),
        )
    }
}

/// Deterministic-only resolver: never merges, never calls out.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclineResolver;

#[async_trait]
impl ResolverBackend for DeclineResolver {
    async fn resolve(
        &self,
        _item: &CandidateItem,
        _candidates: &[ResolveCandidate],
    ) -> Result<Resolution> {
        Ok(Resolution::none())
    }
}

/// The ingestion pipeline: reconcile, group, match, resolve, merge.
pub struct IngestPipeline {
    store: Arc<dyn RecordStore>,
    resolver: Arc<dyn ResolverBackend>,
    grouper: Arc<dyn GrouperBackend>,
    config: PipelineConfig,
}

impl IngestPipeline {
    pub fn new(
        store: Arc<dyn RecordStore>,
        resolver: Arc<dyn ResolverBackend>,
        grouper: Arc<dyn GrouperBackend>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            store,
            resolver,
            grouper,
            config,
        }
    }

    /// Run one ingestion batch for an owner.
    ///
    /// The caller is responsible for owner-scoped serialization; see
    /// [`crate::service::BoardService`].
    pub async fn ingest(&self, owner_id: Uuid, request: IngestRequest) -> Result<IngestResponse> {
        if request.items.is_empty() {
            return Err(Error::InvalidInput("empty ingestion batch".to_string()));
        }

        let started = std::time::Instant::now();
        let now = Utc::now();
        let batch_source = request.source_id.as_deref();

        // Source hashes are collected from the raw batch, before the
        // relevance filter: a source that re-extracted to nothing but
        // noise still supersedes its own prior assertions.
        let batch_sources: BTreeSet<String> = request
            .items
            .iter()
            .filter_map(|i| i.source_id.as_deref())
            .chain(batch_source)
            .map(source_hash)
            .collect();

        let prepared: Vec<PreparedCandidate> = request
            .items
            .into_iter()
            .filter(is_relevant)
            .map(|item| PreparedCandidate::new(item, batch_source))
            .collect();

        let sources_reconciled =
            withdraw_sources(self.store.as_ref(), owner_id, &batch_sources, now).await?;

        let prepared = self.group_batch(prepared).await;

        let mut cache: HashMap<ResolutionKey, Option<Uuid>> = HashMap::new();
        let mut inserted = 0usize;
        let mut merged = 0usize;
        let mut order: Vec<Uuid> = Vec::new();
        let mut final_states: HashMap<Uuid, Record> = HashMap::new();

        for candidate in prepared {
            let record = self
                .place_candidate(owner_id, &candidate, &mut cache, &mut inserted, &mut merged)
                .await?;
            if !final_states.contains_key(&record.id) {
                order.push(record.id);
            }
            final_states.insert(record.id, record);
        }

        let items: Vec<Record> = order
            .into_iter()
            .filter_map(|id| final_states.remove(&id))
            .collect();

        info!(
            owner_id = %owner_id,
            inserted,
            merged,
            reconciled = sources_reconciled,
            duration_ms = started.elapsed().as_millis() as u64,
            "ingestion batch complete"
        );

        Ok(IngestResponse {
            inserted,
            merged,
            items,
            sources_reconciled,
        })
    }

    /// Match one candidate and merge or insert accordingly.
    async fn place_candidate(
        &self,
        owner_id: Uuid,
        candidate: &PreparedCandidate,
        cache: &mut HashMap<ResolutionKey, Option<Uuid>>,
        inserted: &mut usize,
        merged: &mut usize,
    ) -> Result<Record> {
        let now = Utc::now();
        let outcome = match_candidate(
            self.store.as_ref(),
            owner_id,
            candidate,
            self.config.match_fetch_limit,
            self.config.max_resolve_candidates,
        )
        .await?;

        let target = match outcome {
            MatchOutcome::Matched(record) => Some(record),
            MatchOutcome::Undecided(shortlist) => {
                self.resolve_undecided(owner_id, candidate, shortlist, cache)
                    .await?
            }
            MatchOutcome::New => None,
        };

        match target {
            Some(mut record) => {
                merge_into(
                    &mut record,
                    &candidate.item,
                    &candidate.keys,
                    &candidate.sources,
                    now,
                );
                *merged += 1;
                self.store.update(record).await
            }
            None => {
                let record = new_record(owner_id, &candidate.item, &candidate.keys, &candidate.sources, now);
                *inserted += 1;
                self.store.insert(record).await
            }
        }
    }

    /// Confidence-gated external resolution with per-batch caching.
    /// Transport and parse failures degrade to "no merge".
    async fn resolve_undecided(
        &self,
        owner_id: Uuid,
        candidate: &PreparedCandidate,
        shortlist: Vec<Record>,
        cache: &mut HashMap<ResolutionKey, Option<Uuid>>,
    ) -> Result<Option<Record>> {
        let key = candidate.resolution_key();

        let decision = match cache.get(&key) {
            Some(cached) => {
                debug!(op = "resolve", "cache hit for repeated obligation");
                *cached
            }
            None => {
                let summaries: Vec<ResolveCandidate> =
                    shortlist.iter().map(ResolveCandidate::from_record).collect();

                let decision = match self.resolver.resolve(&candidate.item, &summaries).await {
                    Ok(resolution) => {
                        let accepted = resolution
                            .merge_with
                            .filter(|id| {
                                resolution.confidence >= self.config.confidence_threshold
                                    && shortlist.iter().any(|r| r.id == *id)
                            });
                        debug!(
                            confidence = resolution.confidence,
                            accepted = accepted.is_some(),
                            "resolver verdict"
                        );
                        accepted
                    }
                    Err(e) => {
                        warn!(error = %e, "resolver unavailable, treating candidate as new");
                        None
                    }
                };
                cache.insert(key, decision);
                decision
            }
        };

        let Some(id) = decision else {
            return Ok(None);
        };

        // Re-fetch: an earlier candidate in this batch may have mutated
        // the chosen record since the shortlist was built.
        match self.store.get(owner_id, id).await? {
            Some(record) if !record.retired => Ok(Some(record)),
            _ => Ok(None),
        }
    }

    async fn group_batch(&self, prepared: Vec<PreparedCandidate>) -> Vec<PreparedCandidate> {
        if prepared.len() < 2 {
            return prepared;
        }
        let items: Vec<CandidateItem> = prepared.iter().map(|p| p.item.clone()).collect();
        let plan = match self.grouper.group(&items).await {
            Ok(plan) => plan,
            Err(e) => {
                warn!(error = %e, "grouper unavailable, passing batch through");
                GroupingPlan::default()
            }
        };
        apply_plan(prepared, &plan)
    }
}
