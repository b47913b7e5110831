//! Remote assist collaborator backend.
//!
//! JSON-over-HTTP client for the three collaborator operations: candidate
//! resolution, intra-batch grouping, and dashboard section assignment.
//! External payloads are validated into typed structures right here at the
//! boundary; untyped JSON never flows further into the pipeline.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use uuid::Uuid;

use corkboard_core::{
    CandidateItem, ClassifierBackend, Error, GrouperBackend, GroupingPlan, ItemType,
    ProposedSection, Record, ResolveCandidate, Resolution, ResolverBackend, Result,
    SectionProposal,
};

use crate::config::AssistConfig;

/// Remote implementation of the assist backends.
pub struct RemoteAssist {
    client: Client,
    config: AssistConfig,
}

impl RemoteAssist {
    /// Create a client from explicit configuration.
    pub fn new(config: AssistConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;

        debug!(base_url = %config.base_url, "initialized assist client");
        Ok(Self { client, config })
    }

    async fn post_json<Req: Serialize, Resp: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &Req,
    ) -> Result<Resp> {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);

        let mut request = self.client.post(&url).json(body);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Assist(format!("{path}: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::Assist(format!(
                "{path}: status {}",
                response.status()
            )));
        }

        response
            .json::<Resp>()
            .await
            .map_err(|e| Error::Assist(format!("{path}: malformed response: {e}")))
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ResolveRequest<'a> {
    new_item: &'a CandidateItem,
    candidates: Vec<ResolveCandidateWire>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ResolveCandidateWire {
    id: Uuid,
    #[serde(rename = "type")]
    item_type: ItemType,
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<String>,
    occurrence_count: u32,
}

impl From<&ResolveCandidate> for ResolveCandidateWire {
    fn from(c: &ResolveCandidate) -> Self {
        Self {
            id: c.id,
            item_type: c.item_type,
            title: c.title.clone(),
            date: c.date.clone(),
            time: c.time.clone(),
            location: c.location.clone(),
            occurrence_count: c.occurrence_count,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResolveResponse {
    merge_with_id: Option<Uuid>,
    confidence: f64,
    #[serde(default)]
    #[allow(dead_code)]
    reason: Option<String>,
}

#[derive(Serialize)]
struct GroupRequest<'a> {
    items: Vec<IndexedItem<'a>>,
}

#[derive(Serialize)]
struct IndexedItem<'a> {
    index: usize,
    #[serde(flatten)]
    item: &'a CandidateItem,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroupResponse {
    #[serde(default)]
    groups: Vec<GroupWire>,
    #[serde(default)]
    drop_indices: Vec<usize>,
}

#[derive(Deserialize)]
struct GroupWire {
    indices: Vec<usize>,
    #[serde(default)]
    #[allow(dead_code)]
    reason: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SectionRequest {
    items: Vec<SectionItemWire>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SectionItemWire {
    id: Uuid,
    #[serde(rename = "type")]
    item_type: ItemType,
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    time: Option<String>,
    urgency: corkboard_core::Urgency,
}

/// External dashboard proposal. Summary and alert text are accepted on
/// the wire but intentionally dropped: alerts and summary are derived
/// only from the final normalized sections.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SectionResponse {
    #[serde(default)]
    #[allow(dead_code)]
    summary: Option<String>,
    #[serde(default)]
    #[allow(dead_code)]
    alerts: Vec<serde_json::Value>,
    #[serde(default)]
    sections: Vec<SectionWire>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SectionWire {
    title: String,
    #[serde(default)]
    item_ids: Vec<Uuid>,
}

// =============================================================================
// BACKEND IMPLEMENTATIONS
// =============================================================================

#[async_trait]
impl ResolverBackend for RemoteAssist {
    #[instrument(skip_all, fields(candidates = candidates.len()))]
    async fn resolve(
        &self,
        item: &CandidateItem,
        candidates: &[ResolveCandidate],
    ) -> Result<Resolution> {
        let request = ResolveRequest {
            new_item: item,
            candidates: candidates.iter().map(Into::into).collect(),
        };

        let response: ResolveResponse = self.post_json("/v1/resolve", &request).await?;
        debug!(
            merge_with = ?response.merge_with_id,
            confidence = response.confidence,
            "resolver verdict"
        );

        Ok(Resolution {
            merge_with: response.merge_with_id,
            confidence: response.confidence.clamp(0.0, 1.0),
        })
    }
}

#[async_trait]
impl GrouperBackend for RemoteAssist {
    #[instrument(skip_all, fields(batch_size = items.len()))]
    async fn group(&self, items: &[CandidateItem]) -> Result<GroupingPlan> {
        let request = GroupRequest {
            items: items
                .iter()
                .enumerate()
                .map(|(index, item)| IndexedItem { index, item })
                .collect(),
        };

        let response: GroupResponse = self.post_json("/v1/group", &request).await?;
        Ok(GroupingPlan {
            groups: response.groups.into_iter().map(|g| g.indices).collect(),
            drop_indices: response.drop_indices,
        })
    }
}

#[async_trait]
impl ClassifierBackend for RemoteAssist {
    #[instrument(skip_all, fields(items = items.len()))]
    async fn assign_sections(&self, items: &[Record]) -> Result<SectionProposal> {
        let request = SectionRequest {
            items: items
                .iter()
                .map(|r| SectionItemWire {
                    id: r.id,
                    item_type: r.item_type,
                    title: r.title.clone(),
                    date: r.date.clone(),
                    time: r.time.clone(),
                    urgency: r.urgency,
                })
                .collect(),
        };

        let response: SectionResponse = self.post_json("/v1/sections", &request).await?;
        Ok(SectionProposal {
            sections: response
                .sections
                .into_iter()
                .map(|s| ProposedSection {
                    title: s.title,
                    item_ids: s.item_ids,
                })
                .collect(),
        })
    }
}
