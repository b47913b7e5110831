//! Trait seams between the pipeline and its collaborators.
//!
//! The record store and the external assist collaborator are specified
//! only at these interfaces. Each backend trait has a remote
//! implementation (corkboard-assist) and a deterministic/no-op
//! implementation (corkboard-engine), selected by configuration rather
//! than by try/catch control flow inside the pipeline.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{CandidateItem, ItemType, Record};

// =============================================================================
// RECORD STORE
// =============================================================================

/// Keyed-record persistence contract.
///
/// Durable storage mechanics are out of scope; any implementation that
/// honors these operations (and owner scoping) can back the pipeline.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert a new record. Fails if an active record with the same owner
    /// and canonical key already exists.
    async fn insert(&self, record: Record) -> Result<Record>;

    /// Replace a stored record by id.
    async fn update(&self, record: Record) -> Result<Record>;

    /// Fetch one record by id, active or retired.
    async fn get(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Record>>;

    /// Fetch the active record with an exact canonical key, if any.
    async fn get_active_by_key(&self, owner_id: Uuid, canonical_key: &str)
        -> Result<Option<Record>>;

    /// Active records sharing type and normalized title, ordered by
    /// occurrence count then recency, bounded by `limit`.
    async fn find_by_type_and_title(
        &self,
        owner_id: Uuid,
        item_type: ItemType,
        normalized_title: &str,
        limit: usize,
    ) -> Result<Vec<Record>>;

    /// Active records whose evidence set references the given source hash.
    async fn find_by_source(&self, owner_id: Uuid, source_hash: &str) -> Result<Vec<Record>>;

    /// Shortlist query: active records of the same type sharing normalized
    /// title, date, or time with a candidate. Ordered by occurrence count
    /// then recency, bounded by `limit`.
    async fn find_matching(
        &self,
        owner_id: Uuid,
        item_type: ItemType,
        normalized_title: &str,
        date: Option<&str>,
        time: Option<&str>,
        limit: usize,
    ) -> Result<Vec<Record>>;

    /// Soft-retire one record by id.
    async fn retire(&self, owner_id: Uuid, id: Uuid) -> Result<()>;

    /// Soft-retire every active record for an owner. Returns the count.
    async fn retire_all(&self, owner_id: Uuid) -> Result<usize>;

    /// All active records for an owner, ordered by urgency (desc), then
    /// date, then recency.
    async fn list_active(&self, owner_id: Uuid) -> Result<Vec<Record>>;
}

// =============================================================================
// RESOLVER BACKEND
// =============================================================================

/// Existing-record summary offered to the resolver for one candidate.
#[derive(Debug, Clone)]
pub struct ResolveCandidate {
    pub id: Uuid,
    pub item_type: ItemType,
    pub title: String,
    pub date: Option<String>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub occurrence_count: u32,
}

impl ResolveCandidate {
    pub fn from_record(record: &Record) -> Self {
        Self {
            id: record.id,
            item_type: record.item_type,
            title: record.title.clone(),
            date: record.date.clone(),
            time: record.time.clone(),
            location: record.location.clone(),
            occurrence_count: record.occurrence_count,
        }
    }
}

/// Resolver verdict for one candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Existing record the candidate denotes, or `None` for a new record.
    pub merge_with: Option<Uuid>,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
}

impl Resolution {
    /// The "no merge" verdict used by the fail-open paths.
    pub fn none() -> Self {
        Self {
            merge_with: None,
            confidence: 0.0,
        }
    }
}

/// Confidence-gated fuzzy matcher for ambiguous candidates.
#[async_trait]
pub trait ResolverBackend: Send + Sync {
    async fn resolve(
        &self,
        item: &CandidateItem,
        candidates: &[ResolveCandidate],
    ) -> Result<Resolution>;
}

// =============================================================================
// GROUPER BACKEND
// =============================================================================

/// Clustering verdict for one ingestion batch.
#[derive(Debug, Clone, Default)]
pub struct GroupingPlan {
    /// Batch indices judged to denote the same obligation.
    pub groups: Vec<Vec<usize>>,
    /// Batch indices judged to be noise and dropped outright.
    pub drop_indices: Vec<usize>,
}

/// Optional pre-merge clustering of duplicates within one batch.
#[async_trait]
pub trait GrouperBackend: Send + Sync {
    async fn group(&self, items: &[CandidateItem]) -> Result<GroupingPlan>;
}

// =============================================================================
// CLASSIFIER BACKEND
// =============================================================================

/// One externally-proposed section, with free-form title text.
#[derive(Debug, Clone)]
pub struct ProposedSection {
    pub title: String,
    pub item_ids: Vec<Uuid>,
}

/// External section-assignment proposal. Free-form titles and item
/// placements are normalized and re-validated before they reach the
/// dashboard; external summary/alert text is never trusted.
#[derive(Debug, Clone, Default)]
pub struct SectionProposal {
    pub sections: Vec<ProposedSection>,
}

/// Section assignment for the dashboard render.
#[async_trait]
pub trait ClassifierBackend: Send + Sync {
    async fn assign_sections(&self, items: &[Record]) -> Result<SectionProposal>;
}
