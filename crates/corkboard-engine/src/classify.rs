//! Temporal section classification.
//!
//! The deterministic rules here are authoritative for every dated record.
//! An external classifier proposal may only influence the placement of
//! undated records, and even then only into the undated buckets; every
//! other claim is normalized back to the deterministic assignment. Every
//! surviving record appears in exactly one section.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::debug;
use uuid::Uuid;

use corkboard_core::{
    classify_day, parse_normalized_date, ClassifierBackend, DayOffset, ItemType, Record, Result,
    Section, SectionName, SectionProposal,
};

/// Deterministic bucket for a record, `None` when the record should not
/// surface at all (past events).
pub fn deterministic_section(record: &Record, today: NaiveDate) -> Option<SectionName> {
    let date = record.date.as_deref().and_then(parse_normalized_date);

    let Some(date) = date else {
        return Some(match record.item_type {
            ItemType::Action => SectionName::Todos,
            _ => SectionName::Other,
        });
    };

    match classify_day(date, today) {
        DayOffset::Today => Some(SectionName::Today),
        DayOffset::Tomorrow => Some(SectionName::Tomorrow),
        DayOffset::Future => Some(match record.item_type {
            ItemType::Event | ItemType::Deadline => SectionName::ComingUp,
            ItemType::Action => SectionName::Todos,
            ItemType::Info => SectionName::Other,
        }),
        DayOffset::Past => match record.item_type {
            ItemType::Event => None,
            ItemType::Deadline | ItemType::Action => Some(SectionName::Todos),
            ItemType::Info => Some(SectionName::Other),
        },
    }
}

/// Map a free-form proposed section title onto a known section name.
/// Unrecognized titles are treated as no claim at all.
fn map_title(title: &str) -> Option<SectionName> {
    let t = title.to_lowercase();
    if t.contains("tomorrow") {
        Some(SectionName::Tomorrow)
    } else if t.contains("today") {
        Some(SectionName::Today)
    } else if t.contains("coming") || t.contains("upcoming") || t.contains("this week") || t.contains("soon") {
        Some(SectionName::ComingUp)
    } else if t.contains("todo") || t.contains("to-do") || t.contains("to do") || t.contains("task")
        || t.contains("action") || t.contains("overdue")
    {
        Some(SectionName::Todos)
    } else if t.contains("other") || t.contains("misc") || t.contains("note") {
        Some(SectionName::Other)
    } else {
        None
    }
}

/// Final bucket for one record given an optional external claim.
///
/// Dated records always take the deterministic bucket. Undated records
/// of non-action types may accept a claimed Todos or Other placement.
fn final_section(
    record: &Record,
    claimed: Option<SectionName>,
    today: NaiveDate,
) -> Option<SectionName> {
    let deterministic = deterministic_section(record, today)?;

    let dated = record
        .date
        .as_deref()
        .and_then(parse_normalized_date)
        .is_some();
    if dated {
        return Some(deterministic);
    }

    match claimed {
        Some(section @ (SectionName::Todos | SectionName::Other))
            if record.item_type != ItemType::Action =>
        {
            Some(section)
        }
        _ => Some(deterministic),
    }
}

/// Assemble the final section list from the active records and an
/// external proposal (possibly empty).
///
/// Coverage guarantee: every record with a surfaced bucket appears in
/// exactly one section, whether or not the proposal mentioned it.
/// Sections come out in fixed dashboard order with empty ones omitted.
pub fn build_sections(
    records: &[Record],
    proposal: &SectionProposal,
    today: NaiveDate,
) -> Vec<Section> {
    // First claim wins when a proposal lists a record twice.
    let mut claims: HashMap<Uuid, SectionName> = HashMap::new();
    for proposed in &proposal.sections {
        let Some(section) = map_title(&proposed.title) else {
            debug!(title = %proposed.title, "unrecognized proposed section title");
            continue;
        };
        for id in &proposed.item_ids {
            claims.entry(*id).or_insert(section);
        }
    }

    let mut buckets: HashMap<SectionName, Vec<Record>> = HashMap::new();
    for record in records {
        let claimed = claims.get(&record.id).copied();
        if let Some(section) = final_section(record, claimed, today) {
            buckets.entry(section).or_default().push(record.clone());
        }
    }

    SectionName::ALL
        .iter()
        .filter_map(|name| {
            buckets.remove(name).map(|items| Section {
                name: *name,
                items,
            })
        })
        .collect()
}

/// Fallback classifier: no proposal, every record lands in its
/// deterministic bucket.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeterministicClassifier;

#[async_trait]
impl ClassifierBackend for DeterministicClassifier {
    async fn assign_sections(&self, _items: &[Record]) -> Result<SectionProposal> {
        Ok(SectionProposal::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use corkboard_core::{build_keys, ProposedSection, Urgency};
    use std::collections::BTreeSet;

    fn record(item_type: ItemType, title: &str, date: Option<&str>) -> Record {
        let keys = build_keys(item_type, title, date, None, None);
        Record {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            item_type,
            title: title.to_string(),
            date: keys.normalized_date.clone(),
            time: None,
            end_time: None,
            location: None,
            description: None,
            urgency: Urgency::Medium,
            category: None,
            people: vec![],
            raw_text: None,
            canonical_key: keys.canonical,
            normalized_title: keys.normalized_title,
            source_hashes: BTreeSet::new(),
            occurrence_count: 1,
            retired: false,
            created_at: Utc::now(),
            last_seen_at: Utc::now(),
        }
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn dated_records_bucket_by_day_offset() {
        let today = day("2024-05-10");
        let cases = [
            (ItemType::Event, "2024-05-10", Some(SectionName::Today)),
            (ItemType::Event, "2024-05-11", Some(SectionName::Tomorrow)),
            (ItemType::Event, "2024-05-20", Some(SectionName::ComingUp)),
            (ItemType::Deadline, "2024-05-20", Some(SectionName::ComingUp)),
            (ItemType::Action, "2024-05-20", Some(SectionName::Todos)),
            (ItemType::Info, "2024-05-20", Some(SectionName::Other)),
        ];
        for (item_type, date, expected) in cases {
            let r = record(item_type, "Book fair", Some(date));
            assert_eq!(deterministic_section(&r, today), expected, "{item_type} {date}");
        }
    }

    #[test]
    fn past_events_never_surface() {
        let today = day("2024-05-10");
        let r = record(ItemType::Event, "Book fair", Some("2024-05-01"));
        assert_eq!(deterministic_section(&r, today), None);
    }

    #[test]
    fn overdue_deadline_lands_in_todos() {
        let today = day("2024-05-10");
        let r = record(ItemType::Deadline, "Permission slip due", Some("2024-05-01"));
        assert_eq!(deterministic_section(&r, today), Some(SectionName::Todos));
    }

    #[test]
    fn undated_action_is_a_todo_and_undated_info_is_other() {
        let today = day("2024-05-10");
        let action = record(ItemType::Action, "Sign permission slip", None);
        let info = record(ItemType::Info, "Spirit week colors", None);
        assert_eq!(deterministic_section(&action, today), Some(SectionName::Todos));
        assert_eq!(deterministic_section(&info, today), Some(SectionName::Other));
    }

    #[test]
    fn unparsable_date_falls_back_to_undated_rules() {
        let today = day("2024-05-10");
        let mut r = record(ItemType::Event, "Book fair", None);
        r.date = Some("sometime in may".to_string());
        assert_eq!(deterministic_section(&r, today), Some(SectionName::Other));
    }

    #[test]
    fn proposal_cannot_move_dated_records() {
        let today = day("2024-05-10");
        let r = record(ItemType::Event, "Book fair", Some("2024-05-10"));
        let proposal = SectionProposal {
            sections: vec![ProposedSection {
                title: "Coming Up".to_string(),
                item_ids: vec![r.id],
            }],
        };
        let sections = build_sections(&[r], &proposal, today);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].name, SectionName::Today);
    }

    #[test]
    fn proposal_may_place_undated_info_in_todos() {
        let today = day("2024-05-10");
        let r = record(ItemType::Info, "Library books due back", None);
        let proposal = SectionProposal {
            sections: vec![ProposedSection {
                title: "To-Dos".to_string(),
                item_ids: vec![r.id],
            }],
        };
        let sections = build_sections(&[r], &proposal, today);
        assert_eq!(sections[0].name, SectionName::Todos);
    }

    #[test]
    fn proposal_cannot_promote_undated_records_to_dated_buckets() {
        let today = day("2024-05-10");
        let r = record(ItemType::Info, "Spirit week colors", None);
        let proposal = SectionProposal {
            sections: vec![ProposedSection {
                title: "Today".to_string(),
                item_ids: vec![r.id],
            }],
        };
        let sections = build_sections(&[r], &proposal, today);
        assert_eq!(sections[0].name, SectionName::Other);
    }

    #[test]
    fn unmentioned_records_are_still_covered() {
        let today = day("2024-05-10");
        let mentioned = record(ItemType::Event, "Book fair", Some("2024-05-10"));
        let forgotten = record(ItemType::Action, "Sign permission slip", None);
        let proposal = SectionProposal {
            sections: vec![ProposedSection {
                title: "Today".to_string(),
                item_ids: vec![mentioned.id],
            }],
        };
        let sections = build_sections(&[mentioned, forgotten.clone()], &proposal, today);
        let todos = sections.iter().find(|s| s.name == SectionName::Todos).unwrap();
        assert_eq!(todos.items[0].id, forgotten.id);
    }

    #[test]
    fn first_claim_wins_on_duplicate_mentions() {
        let today = day("2024-05-10");
        let r = record(ItemType::Info, "Library books due back", None);
        let proposal = SectionProposal {
            sections: vec![
                ProposedSection {
                    title: "To-Dos".to_string(),
                    item_ids: vec![r.id],
                },
                ProposedSection {
                    title: "Other".to_string(),
                    item_ids: vec![r.id],
                },
            ],
        };
        let sections = build_sections(&[r], &proposal, today);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].name, SectionName::Todos);
    }

    #[test]
    fn sections_come_out_in_fixed_order_without_empties() {
        let today = day("2024-05-10");
        let records = vec![
            record(ItemType::Action, "Sign permission slip", None),
            record(ItemType::Event, "Book fair", Some("2024-05-10")),
            record(ItemType::Event, "Recital", Some("2024-05-20")),
        ];
        let sections = build_sections(&records, &SectionProposal::default(), today);
        let names: Vec<SectionName> = sections.iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            vec![SectionName::Today, SectionName::ComingUp, SectionName::Todos]
        );
    }
}
