//! Scripted assist backend for deterministic testing.
//!
//! Responses are queued or fixed up front; no network, no randomness.
//! A shared handle survives being passed into the pipeline, so tests can
//! assert on call counts afterwards.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use corkboard_core::{
    CandidateItem, ClassifierBackend, Error, GrouperBackend, GroupingPlan, Record,
    ResolveCandidate, Resolution, ResolverBackend, Result, SectionProposal,
};

#[derive(Default)]
struct MockState {
    resolutions: VecDeque<Resolution>,
    grouping: Option<GroupingPlan>,
    sections: Option<SectionProposal>,
    fail_all: bool,
    calls: Vec<String>,
}

/// Scripted mock implementation of all three assist backends.
#[derive(Clone, Default)]
pub struct MockAssist {
    state: Arc<Mutex<MockState>>,
}

impl MockAssist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a resolution verdict; verdicts are consumed in order, and an
    /// empty queue answers "no merge".
    pub fn with_resolution(self, resolution: Resolution) -> Self {
        self.state.lock().unwrap().resolutions.push_back(resolution);
        self
    }

    /// Fix the grouping plan returned for every batch.
    pub fn with_grouping(self, plan: GroupingPlan) -> Self {
        self.state.lock().unwrap().grouping = Some(plan);
        self
    }

    /// Fix the section proposal returned for every render.
    pub fn with_sections(self, proposal: SectionProposal) -> Self {
        self.state.lock().unwrap().sections = Some(proposal);
        self
    }

    /// Make every call fail with an assist error, for fallback testing.
    pub fn with_failure(self) -> Self {
        self.state.lock().unwrap().fail_all = true;
        self
    }

    /// Number of calls made to the given operation
    /// ("resolve" | "group" | "sections").
    pub fn call_count(&self, operation: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|c| *c == operation)
            .count()
    }

    fn record_call(&self, operation: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(operation.to_string());
        if state.fail_all {
            return Err(Error::Assist("simulated failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ResolverBackend for MockAssist {
    async fn resolve(
        &self,
        _item: &CandidateItem,
        _candidates: &[ResolveCandidate],
    ) -> Result<Resolution> {
        self.record_call("resolve")?;
        let mut state = self.state.lock().unwrap();
        Ok(state.resolutions.pop_front().unwrap_or_else(Resolution::none))
    }
}

#[async_trait]
impl GrouperBackend for MockAssist {
    async fn group(&self, _items: &[CandidateItem]) -> Result<GroupingPlan> {
        self.record_call("group")?;
        let state = self.state.lock().unwrap();
        Ok(state
            .grouping
            .as_ref()
            .map(|p| GroupingPlan {
                groups: p.groups.clone(),
                drop_indices: p.drop_indices.clone(),
            })
            .unwrap_or_default())
    }
}

#[async_trait]
impl ClassifierBackend for MockAssist {
    async fn assign_sections(&self, _items: &[Record]) -> Result<SectionProposal> {
        self.record_call("sections")?;
        let state = self.state.lock().unwrap();
        Ok(state
            .sections
            .as_ref()
            .map(|p| SectionProposal {
                sections: p.sections.clone(),
            })
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corkboard_core::ItemType;
    use uuid::Uuid;

    #[tokio::test]
    async fn resolutions_are_consumed_in_order() {
        let id = Uuid::new_v4();
        let mock = MockAssist::new()
            .with_resolution(Resolution {
                merge_with: Some(id),
                confidence: 0.9,
            })
            .with_resolution(Resolution::none());

        let item = CandidateItem::new(ItemType::Event, "Recital");
        let first = mock.resolve(&item, &[]).await.unwrap();
        assert_eq!(first.merge_with, Some(id));

        let second = mock.resolve(&item, &[]).await.unwrap();
        assert_eq!(second, Resolution::none());

        // Exhausted queue keeps answering "no merge"
        let third = mock.resolve(&item, &[]).await.unwrap();
        assert_eq!(third, Resolution::none());
        assert_eq!(mock.call_count("resolve"), 3);
    }

    #[tokio::test]
    async fn failure_mode_errors_every_call() {
        let mock = MockAssist::new().with_failure();
        let item = CandidateItem::new(ItemType::Event, "Recital");
        assert!(mock.resolve(&item, &[]).await.is_err());
        assert!(mock.group(&[item]).await.is_err());
        assert!(mock.assign_sections(&[]).await.is_err());
    }

    #[tokio::test]
    async fn unscripted_grouping_is_passthrough() {
        let mock = MockAssist::new();
        let plan = mock
            .group(&[CandidateItem::new(ItemType::Event, "Recital")])
            .await
            .unwrap();
        assert!(plan.groups.is_empty());
        assert!(plan.drop_indices.is_empty());
    }
}
