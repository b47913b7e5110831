//! Intra-batch duplicate grouping.
//!
//! An external grouping step (or a no-op when unavailable) may judge that
//! several candidates in one ingestion batch denote the same obligation.
//! Those clusters collapse into one synthesized candidate before any
//! matching against storage. Pipeline correctness does not depend on this
//! step running: invalid plans and backend failures degrade to
//! pass-through.

use async_trait::async_trait;

use corkboard_core::{CandidateItem, GrouperBackend, GroupingPlan, Result};
use tracing::warn;

use crate::ingest::PreparedCandidate;

/// Pass-through grouping backend used when no collaborator is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopGrouper;

#[async_trait]
impl GrouperBackend for NoopGrouper {
    async fn group(&self, _items: &[CandidateItem]) -> Result<GroupingPlan> {
        Ok(GroupingPlan::default())
    }
}

/// Representative-selection score: richer candidates carry more usable
/// detail. Increases with description length (capped), presence of
/// location/time/end-time/raw-evidence, and prior evidence count.
pub fn richness(candidate: &PreparedCandidate) -> u32 {
    let item = &candidate.item;
    let mut score = item
        .description
        .as_deref()
        .map(|d| d.len().min(200) as u32)
        .unwrap_or(0);

    if item.location.as_deref().is_some_and(|s| !s.trim().is_empty()) {
        score += 40;
    }
    if item.time.as_deref().is_some_and(|s| !s.trim().is_empty()) {
        score += 40;
    }
    if item.end_time.is_some() {
        score += 25;
    }
    if item.raw_text.is_some() {
        score += 30;
    }
    score + 10 * candidate.sources.len() as u32
}

/// Apply a grouping plan to a prepared batch.
///
/// Clusters collapse into their richest member with gap-filling from the
/// rest; `drop_indices` are discarded; ungrouped items pass through in
/// batch order. A plan referencing out-of-range or duplicated indices is
/// ignored wholesale.
pub fn apply_plan(batch: Vec<PreparedCandidate>, plan: &GroupingPlan) -> Vec<PreparedCandidate> {
    if plan.groups.is_empty() && plan.drop_indices.is_empty() {
        return batch;
    }
    if !plan_is_valid(plan, batch.len()) {
        warn!("grouping plan references invalid indices, passing batch through");
        return batch;
    }

    let mut slots: Vec<Option<PreparedCandidate>> = batch.into_iter().map(Some).collect();
    let mut out_indices: Vec<(usize, PreparedCandidate)> = Vec::new();

    for group in &plan.groups {
        let mut members: Vec<(usize, PreparedCandidate)> = group
            .iter()
            .map(|&i| (i, slots[i].take().expect("validated index")))
            .collect();

        // First maximum wins: `max_by_key` keeps the last, which would
        // collapse equal-richness clusters into the later fragment.
        let rep_pos = members
            .iter()
            .enumerate()
            .fold(None, |best: Option<(usize, u32)>, (pos, (_, c))| {
                let score = richness(c);
                match best {
                    Some((_, top)) if top >= score => best,
                    _ => Some((pos, score)),
                }
            })
            .map(|(pos, _)| pos)
            .expect("groups are non-empty");

        let (_, mut synthesized) = members.swap_remove(rep_pos);
        for (_, other) in members {
            absorb(&mut synthesized, other);
        }
        synthesized.rebuild_keys();

        let first_index = *group.iter().min().expect("groups are non-empty");
        out_indices.push((first_index, synthesized));
    }

    for &index in &plan.drop_indices {
        slots[index] = None;
    }

    for (index, slot) in slots.into_iter().enumerate() {
        if let Some(candidate) = slot {
            out_indices.push((index, candidate));
        }
    }

    out_indices.sort_by_key(|(index, _)| *index);
    out_indices.into_iter().map(|(_, c)| c).collect()
}

fn plan_is_valid(plan: &GroupingPlan, len: usize) -> bool {
    let mut seen = vec![false; len];
    let mut claim = |index: usize| -> bool {
        if index >= len || seen[index] {
            return false;
        }
        seen[index] = true;
        true
    };

    plan.groups.iter().all(|g| !g.is_empty() && g.iter().all(|&i| claim(i)))
        && plan.drop_indices.iter().all(|&i| claim(i))
}

/// Fold a non-representative cluster member into the synthesized
/// candidate: gap-fill scheduling fields, keep the longer description,
/// union people and evidence, escalate urgency.
fn absorb(synthesized: &mut PreparedCandidate, other: PreparedCandidate) {
    let item = &mut synthesized.item;
    let from = other.item;

    if item.date.is_none() {
        item.date = from.date;
    }
    if item.time.is_none() {
        item.time = from.time;
    }
    if item.end_time.is_none() {
        item.end_time = from.end_time;
    }
    if item.location.is_none() {
        item.location = from.location;
    }
    if item.category.is_none() {
        item.category = from.category;
    }
    if item.raw_text.is_none() {
        item.raw_text = from.raw_text;
    }

    let longer = match (&item.description, &from.description) {
        (Some(a), Some(b)) => b.len() > a.len(),
        (None, Some(_)) => true,
        _ => false,
    };
    if longer {
        item.description = from.description;
    }

    item.urgency = item.urgency.max(from.urgency);
    for person in from.people {
        if !item.people.contains(&person) {
            item.people.push(person);
        }
    }
    synthesized.sources.extend(other.sources);
}

#[cfg(test)]
mod tests {
    use super::*;
    use corkboard_core::{ItemType, Urgency};

    fn prepared(title: &str, source: &str) -> PreparedCandidate {
        let mut item = CandidateItem::new(ItemType::Event, title);
        item.source_id = Some(source.to_string());
        PreparedCandidate::new(item, None)
    }

    #[test]
    fn empty_plan_is_passthrough() {
        let batch = vec![prepared("Recital", "s1"), prepared("Practice", "s2")];
        let out = apply_plan(batch, &GroupingPlan::default());
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].item.title, "Recital");
    }

    #[test]
    fn cluster_collapses_into_richest_member() {
        let mut sparse = prepared("Soccer", "s1");
        sparse.item.date = Some("2024-05-10".to_string());
        let mut rich = prepared("Soccer practice", "s2");
        rich.item.time = Some("4pm".to_string());
        rich.item.location = Some("Field A".to_string());
        rich.item.description = Some("bring cleats".to_string());
        sparse.rebuild_keys();
        rich.rebuild_keys();

        let plan = GroupingPlan {
            groups: vec![vec![0, 1]],
            drop_indices: vec![],
        };
        let out = apply_plan(vec![sparse, rich], &plan);
        assert_eq!(out.len(), 1);

        let merged = &out[0];
        assert_eq!(merged.item.title, "Soccer practice");
        // gap-filled from the sparse member
        assert_eq!(merged.item.date.as_deref(), Some("2024-05-10"));
        assert_eq!(merged.sources.len(), 2);
        // keys rebuilt from the synthesized fields
        assert!(merged.keys.canonical.contains("2024-05-10"));
        assert!(merged.keys.canonical.contains("16:00"));
    }

    #[test]
    fn cluster_escalates_urgency() {
        let mut a = prepared("Soccer", "s1");
        a.item.urgency = Urgency::High;
        let mut b = prepared("Soccer practice", "s2");
        b.item.urgency = Urgency::Low;
        b.item.description = Some("long description making this the richest".to_string());

        let plan = GroupingPlan {
            groups: vec![vec![0, 1]],
            drop_indices: vec![],
        };
        let out = apply_plan(vec![a, b], &plan);
        assert_eq!(out[0].item.urgency, Urgency::High);
    }

    #[test]
    fn drop_indices_discard_noise() {
        let batch = vec![prepared("Recital", "s1"), prepared("gibberish", "s2")];
        let plan = GroupingPlan {
            groups: vec![],
            drop_indices: vec![1],
        };
        let out = apply_plan(batch, &plan);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].item.title, "Recital");
    }

    #[test]
    fn invalid_plan_passes_through() {
        let batch = vec![prepared("Recital", "s1")];
        let out_of_range = GroupingPlan {
            groups: vec![vec![0, 7]],
            drop_indices: vec![],
        };
        assert_eq!(apply_plan(batch, &out_of_range).len(), 1);

        let batch = vec![prepared("Recital", "s1"), prepared("Practice", "s2")];
        let double_claim = GroupingPlan {
            groups: vec![vec![0, 1]],
            drop_indices: vec![1],
        };
        assert_eq!(apply_plan(batch, &double_claim).len(), 2);
    }

    #[test]
    fn ungrouped_items_keep_batch_order() {
        let batch = vec![
            prepared("One", "s1"),
            prepared("Two", "s2"),
            prepared("Three", "s3"),
            prepared("Four", "s4"),
        ];
        let plan = GroupingPlan {
            groups: vec![vec![1, 3]],
            drop_indices: vec![],
        };
        let out = apply_plan(batch, &plan);
        let titles: Vec<&str> = out.iter().map(|c| c.item.title.as_str()).collect();
        assert_eq!(titles, vec!["One", "Two", "Three"]);
    }

    #[test]
    fn equal_richness_collapses_into_the_first_fragment() {
        let batch = vec![prepared("Morning practice", "s1"), prepared("Practice again", "s2")];
        let plan = GroupingPlan {
            groups: vec![vec![0, 1]],
            drop_indices: vec![],
        };
        let out = apply_plan(batch, &plan);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].item.title, "Morning practice");
    }

    #[tokio::test]
    async fn noop_grouper_returns_empty_plan() {
        let plan = NoopGrouper
            .group(&[CandidateItem::new(ItemType::Event, "Recital")])
            .await
            .unwrap();
        assert!(plan.groups.is_empty());
        assert!(plan.drop_indices.is_empty());
    }
}
