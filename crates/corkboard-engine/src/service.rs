//! The board service: the public API surface over the pipeline, store,
//! and classifier.
//!
//! Mutating operations for one owner are serialized through a per-owner
//! async mutex, so concurrent batches for the same owner cannot interleave
//! their match-then-write steps. Different owners proceed in parallel.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tokio::sync::Mutex;
use tracing::{instrument, warn};
use uuid::Uuid;

use corkboard_core::{
    ClassifierBackend, Dashboard, GrouperBackend, IngestRequest, IngestResponse, Record,
    RecordStore, ResolverBackend, Result, SectionProposal,
};

use crate::classify::{build_sections, DeterministicClassifier};
use crate::config::PipelineConfig;
use crate::dashboard::render;
use crate::grouper::NoopGrouper;
use crate::ingest::{DeclineResolver, IngestPipeline};

pub struct BoardService {
    store: Arc<dyn RecordStore>,
    classifier: Arc<dyn ClassifierBackend>,
    pipeline: IngestPipeline,
    config: PipelineConfig,
    owner_locks: std::sync::Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl BoardService {
    pub fn builder(store: Arc<dyn RecordStore>) -> BoardServiceBuilder {
        BoardServiceBuilder::new(store)
    }

    /// Active records for an owner in board order.
    pub async fn list_items(&self, owner_id: Uuid) -> Result<Vec<Record>> {
        self.store.list_active(owner_id).await
    }

    /// Ingest one extraction batch. Batches for the same owner run one
    /// at a time.
    #[instrument(skip(self, request), fields(owner_id = %owner_id))]
    pub async fn ingest(&self, owner_id: Uuid, request: IngestRequest) -> Result<IngestResponse> {
        let lock = self.lock_for(owner_id);
        let _guard = lock.lock().await;
        self.pipeline.ingest(owner_id, request).await
    }

    /// Retire a single record. Irreversible.
    pub async fn dismiss(&self, owner_id: Uuid, id: Uuid) -> Result<()> {
        let lock = self.lock_for(owner_id);
        let _guard = lock.lock().await;
        self.store.retire(owner_id, id).await
    }

    /// Retire every active record for an owner. Returns how many were
    /// retired.
    pub async fn reset(&self, owner_id: Uuid) -> Result<usize> {
        let lock = self.lock_for(owner_id);
        let _guard = lock.lock().await;
        self.store.retire_all(owner_id).await
    }

    /// Render the dashboard relative to the current day.
    pub async fn dashboard(&self, owner_id: Uuid) -> Result<Dashboard> {
        let now = Utc::now();
        self.dashboard_at(owner_id, now.date_naive(), now).await
    }

    /// Render the dashboard with a pinned "today", used by tests and
    /// timezone-aware callers.
    #[instrument(skip(self), fields(owner_id = %owner_id))]
    pub async fn dashboard_at(
        &self,
        owner_id: Uuid,
        today: NaiveDate,
        now: chrono::DateTime<Utc>,
    ) -> Result<Dashboard> {
        let records = self.store.list_active(owner_id).await?;

        let proposal = if records.is_empty() {
            SectionProposal::default()
        } else {
            match self.classifier.assign_sections(&records).await {
                Ok(proposal) => proposal,
                Err(e) => {
                    warn!(error = %e, "classifier unavailable, using deterministic sections");
                    SectionProposal::default()
                }
            }
        };

        let sections = build_sections(&records, &proposal, today);
        Ok(render(sections, self.config.max_alerts, now))
    }

    fn lock_for(&self, owner_id: Uuid) -> Arc<Mutex<()>> {
        let mut locks = self.owner_locks.lock().unwrap_or_else(|e| e.into_inner());
        // A strong count of 1 means the registry holds the only reference
        // and no task is waiting on or holding that owner's lock.
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        locks.entry(owner_id).or_default().clone()
    }
}

/// Builder for [`BoardService`]. Defaults to fully deterministic
/// operation: no external resolver, grouper, or classifier.
pub struct BoardServiceBuilder {
    store: Arc<dyn RecordStore>,
    resolver: Arc<dyn ResolverBackend>,
    grouper: Arc<dyn GrouperBackend>,
    classifier: Arc<dyn ClassifierBackend>,
    config: PipelineConfig,
}

impl BoardServiceBuilder {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            resolver: Arc::new(DeclineResolver),
            grouper: Arc::new(NoopGrouper),
            classifier: Arc::new(DeterministicClassifier),
            config: PipelineConfig::default(),
        }
    }

    pub fn with_resolver(mut self, resolver: Arc<dyn ResolverBackend>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_grouper(mut self, grouper: Arc<dyn GrouperBackend>) -> Self {
        self.grouper = grouper;
        self
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn ClassifierBackend>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> BoardService {
        let pipeline = IngestPipeline::new(
            self.store.clone(),
            self.resolver,
            self.grouper,
            self.config.clone(),
        );
        BoardService {
            store: self.store,
            classifier: self.classifier,
            pipeline,
            config: self.config,
            owner_locks: std::sync::Mutex::new(HashMap::new()),
        }
    }
}
