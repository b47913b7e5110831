//! Record construction and merge resolution.
//!
//! A merge combines an existing record with an incoming candidate judged
//! to denote the same obligation: gap-filling for scheduling fields,
//! monotonic urgency escalation, and evidence accumulation.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use corkboard_core::{normalize_time, CandidateItem, IdentityKeys, Record};

/// Build a fresh active record from an unmatched candidate.
pub fn new_record(
    owner_id: Uuid,
    item: &CandidateItem,
    keys: &IdentityKeys,
    source_hashes: &BTreeSet<String>,
    now: DateTime<Utc>,
) -> Record {
    let mut record = Record {
        id: Uuid::new_v4(),
        owner_id,
        item_type: item.item_type,
        title: item.title.clone(),
        date: keys.normalized_date.clone(),
        time: keys.normalized_time.clone(),
        end_time: item.end_time.as_deref().map(normalize_time),
        location: item.location.clone(),
        description: item.description.clone(),
        urgency: item.urgency,
        category: item.category.clone(),
        people: item.people.clone(),
        raw_text: item.raw_text.clone(),
        canonical_key: keys.canonical.clone(),
        normalized_title: keys.normalized_title.clone(),
        source_hashes: source_hashes.clone(),
        occurrence_count: 0,
        retired: false,
        created_at: now,
        last_seen_at: now,
    };
    record.recount_occurrences();
    record
}

/// Merge an incoming candidate into an existing record in place.
///
/// Known heuristic quirk, preserved as observed: "longer description
/// wins" can keep a verbose stale description over a corrected shorter
/// re-extraction.
pub fn merge_into(
    existing: &mut Record,
    item: &CandidateItem,
    keys: &IdentityKeys,
    source_hashes: &BTreeSet<String>,
    now: DateTime<Utc>,
) {
    existing.description = merge_description(existing.description.take(), item.description.clone());
    existing.urgency = existing.urgency.max(item.urgency);

    for person in &item.people {
        if !existing.people.contains(person) {
            existing.people.push(person.clone());
        }
    }

    // Gap-filling: incoming wins only when provided.
    if keys.normalized_date.is_some() {
        existing.date = keys.normalized_date.clone();
    }
    if keys.normalized_time.is_some() {
        existing.time = keys.normalized_time.clone();
    }
    if let Some(end_time) = item.end_time.as_deref() {
        existing.end_time = Some(normalize_time(end_time));
    }
    if item.location.is_some() {
        existing.location = item.location.clone();
    }
    if item.category.is_some() {
        existing.category = item.category.clone();
    }
    if item.raw_text.is_some() {
        existing.raw_text = item.raw_text.clone();
    }

    existing.source_hashes.extend(source_hashes.iter().cloned());
    existing.recount_occurrences();
    existing.touch(now);
}

/// Longer text wins; ties favor the incoming candidate.
fn merge_description(existing: Option<String>, incoming: Option<String>) -> Option<String> {
    match (existing, incoming) {
        (Some(old), Some(new)) => {
            if old.len() > new.len() {
                Some(old)
            } else {
                Some(new)
            }
        }
        (old, None) => old,
        (None, new) => new,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corkboard_core::{build_keys, ItemType, Urgency};

    fn keys_for(item: &CandidateItem) -> IdentityKeys {
        build_keys(
            item.item_type,
            &item.title,
            item.date.as_deref(),
            item.time.as_deref(),
            item.location.as_deref(),
        )
    }

    fn sources(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn base_record() -> (Record, CandidateItem) {
        let mut item = CandidateItem::new(ItemType::Event, "Soccer practice");
        item.date = Some("2024-05-10".to_string());
        item.time = Some("4:00 PM".to_string());
        item.urgency = Urgency::Low;
        item.description = Some("bring cleats".to_string());
        let keys = keys_for(&item);
        let record = new_record(
            Uuid::new_v4(),
            &item,
            &keys,
            &sources(&["sha256:s1"]),
            Utc::now(),
        );
        (record, item)
    }

    #[test]
    fn new_record_normalizes_scheduling_fields() {
        let (record, _) = base_record();
        assert_eq!(record.date.as_deref(), Some("2024-05-10"));
        assert_eq!(record.time.as_deref(), Some("16:00"));
        assert_eq!(record.normalized_title, "soccer practice");
        assert_eq!(record.occurrence_count, 1);
        assert!(!record.retired);
    }

    #[test]
    fn new_record_without_sources_floors_occurrences() {
        let item = CandidateItem::new(ItemType::Action, "Pay the bill");
        let keys = keys_for(&item);
        let record = new_record(Uuid::new_v4(), &item, &keys, &BTreeSet::new(), Utc::now());
        assert_eq!(record.occurrence_count, 1);
    }

    #[test]
    fn merge_unions_evidence_and_counts() {
        let (mut record, item) = base_record();
        let keys = keys_for(&item);
        merge_into(&mut record, &item, &keys, &sources(&["sha256:s2"]), Utc::now());

        assert_eq!(record.occurrence_count, 2);
        assert!(record.source_hashes.contains("sha256:s1"));
        assert!(record.source_hashes.contains("sha256:s2"));
    }

    #[test]
    fn merge_is_idempotent_for_same_source() {
        let (mut record, item) = base_record();
        let keys = keys_for(&item);
        merge_into(&mut record, &item, &keys, &sources(&["sha256:s1"]), Utc::now());
        assert_eq!(record.occurrence_count, 1);
    }

    #[test]
    fn urgency_escalation_is_commutative() {
        let (mut record, mut item) = base_record();
        let keys = keys_for(&item);

        // low record + high candidate
        item.urgency = Urgency::High;
        merge_into(&mut record, &item, &keys, &sources(&["sha256:s2"]), Utc::now());
        assert_eq!(record.urgency, Urgency::High);

        // high record + low candidate never downgrades
        item.urgency = Urgency::Low;
        merge_into(&mut record, &item, &keys, &sources(&["sha256:s3"]), Utc::now());
        assert_eq!(record.urgency, Urgency::High);
    }

    #[test]
    fn longer_description_wins_ties_favor_incoming() {
        let (mut record, mut item) = base_record();
        let keys = keys_for(&item);

        item.description = Some("bring cleats and shin guards".to_string());
        merge_into(&mut record, &item, &keys, &sources(&["sha256:s2"]), Utc::now());
        assert_eq!(
            record.description.as_deref(),
            Some("bring cleats and shin guards")
        );

        // shorter incoming loses
        item.description = Some("cleats".to_string());
        merge_into(&mut record, &item, &keys, &sources(&["sha256:s3"]), Utc::now());
        assert_eq!(
            record.description.as_deref(),
            Some("bring cleats and shin guards")
        );

        // equal length: incoming wins
        item.description = Some("bring cleats and shin GUARDS".to_string());
        merge_into(&mut record, &item, &keys, &sources(&["sha256:s4"]), Utc::now());
        assert_eq!(
            record.description.as_deref(),
            Some("bring cleats and shin GUARDS")
        );
    }

    #[test]
    fn gap_filling_never_clears_existing_fields() {
        let (mut record, _) = base_record();
        record.location = Some("Field A".to_string());

        let bare = CandidateItem::new(ItemType::Event, "Soccer practice");
        let keys = keys_for(&bare);
        merge_into(&mut record, &bare, &keys, &sources(&["sha256:s2"]), Utc::now());

        assert_eq!(record.date.as_deref(), Some("2024-05-10"));
        assert_eq!(record.time.as_deref(), Some("16:00"));
        assert_eq!(record.location.as_deref(), Some("Field A"));
    }

    #[test]
    fn incoming_values_overwrite_when_present() {
        let (mut record, mut item) = base_record();
        item.location = Some("Field B".to_string());
        item.end_time = Some("5:30 pm".to_string());
        let keys = keys_for(&item);
        merge_into(&mut record, &item, &keys, &sources(&["sha256:s2"]), Utc::now());

        assert_eq!(record.location.as_deref(), Some("Field B"));
        assert_eq!(record.end_time.as_deref(), Some("17:30"));
    }

    #[test]
    fn people_union_preserves_order() {
        let (mut record, mut item) = base_record();
        record.people = vec!["Maya".to_string()];
        item.people = vec!["Maya".to_string(), "Leo".to_string()];
        let keys = keys_for(&item);
        merge_into(&mut record, &item, &keys, &sources(&["sha256:s2"]), Utc::now());
        assert_eq!(record.people, vec!["Maya".to_string(), "Leo".to_string()]);
    }
}
