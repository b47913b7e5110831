//! Dashboard rendering: alert synthesis and summary composition over the
//! final classified sections.

use chrono::{DateTime, Utc};

use corkboard_core::defaults::EMPTY_STATE_SUMMARY;
use corkboard_core::{Alert, Dashboard, Record, Section, SectionName, Urgency};

/// Render the full dashboard payload from classified sections.
pub fn render(sections: Vec<Section>, max_alerts: usize, now: DateTime<Utc>) -> Dashboard {
    let summary = compose_summary(&sections);
    let alerts = synthesize_alerts(&sections, max_alerts);
    let item_count = sections.iter().map(|s| s.items.len()).sum();
    Dashboard {
        summary,
        alerts,
        sections,
        item_count,
        updated_at: now,
    }
}

/// Headline alerts, most pressing first.
///
/// Today items are high, high-urgency to-dos are high, tomorrow items are
/// medium. Each record alerts at most once, and the list is capped.
pub fn synthesize_alerts(sections: &[Section], max_alerts: usize) -> Vec<Alert> {
    let mut seen = std::collections::HashSet::new();
    let mut alerts = Vec::new();

    let mut push = |record: &Record, urgency: Urgency| {
        if seen.insert(record.id) {
            alerts.push(Alert {
                text: alert_text(record),
                urgency,
            });
        }
    };

    for section in sections {
        match section.name {
            SectionName::Today => {
                for record in &section.items {
                    push(record, Urgency::High);
                }
            }
            SectionName::Todos => {
                for record in &section.items {
                    if record.urgency == Urgency::High {
                        push(record, Urgency::High);
                    }
                }
            }
            _ => {}
        }
    }
    for section in sections {
        if section.name == SectionName::Tomorrow {
            for record in &section.items {
                push(record, Urgency::Medium);
            }
        }
    }

    alerts.truncate(max_alerts);
    alerts
}

fn alert_text(record: &Record) -> String {
    let when: Vec<&str> = record
        .date
        .as_deref()
        .into_iter()
        .chain(record.time.as_deref())
        .collect();
    if when.is_empty() {
        record.title.clone()
    } else {
        format!("{} ({})", record.title, when.join(" "))
    }
}

/// One-line summary of the board's pressure, e.g.
/// "2 today, 1 tomorrow, 3 coming up, 4 to-dos".
pub fn compose_summary(sections: &[Section]) -> String {
    let count = |name: SectionName| {
        sections
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.items.len())
            .unwrap_or(0)
    };

    let mut parts = Vec::new();
    for (name, label) in [
        (SectionName::Today, "today"),
        (SectionName::Tomorrow, "tomorrow"),
        (SectionName::ComingUp, "coming up"),
        (SectionName::Todos, "to-dos"),
    ] {
        let n = count(name);
        if n > 0 {
            parts.push(format!("{n} {label}"));
        }
    }

    if !parts.is_empty() {
        return parts.join(", ");
    }

    let other = count(SectionName::Other);
    if other > 0 {
        let noun = if other == 1 { "item" } else { "items" };
        return format!("{other} {noun} on the board");
    }

    EMPTY_STATE_SUMMARY.to_string()
}
