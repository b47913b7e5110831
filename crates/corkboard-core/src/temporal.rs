//! Day-relative temporal bucketing.
//!
//! Section classification is defined relative to a supplied `today`
//! rather than the wall clock, so the classifier stays a pure function
//! and tests can pin the calendar.

use chrono::NaiveDate;

/// Position of a record date relative to "today".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayOffset {
    Past,
    Today,
    Tomorrow,
    Future,
}

/// Parse a normalized date field (`YYYY-MM-DD`). Fallback-normalized text
/// that never parsed to a calendar day yields `None`, and the record is
/// treated as undated.
pub fn parse_normalized_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Classify a calendar day relative to `today`.
pub fn classify_day(date: NaiveDate, today: NaiveDate) -> DayOffset {
    match (date - today).num_days() {
        d if d < 0 => DayOffset::Past,
        0 => DayOffset::Today,
        1 => DayOffset::Tomorrow,
        _ => DayOffset::Future,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn classifies_relative_days() {
        let today = date("2024-05-10");
        assert_eq!(classify_day(date("2024-05-09"), today), DayOffset::Past);
        assert_eq!(classify_day(date("2024-05-10"), today), DayOffset::Today);
        assert_eq!(classify_day(date("2024-05-11"), today), DayOffset::Tomorrow);
        assert_eq!(classify_day(date("2024-05-12"), today), DayOffset::Future);
        assert_eq!(classify_day(date("2023-01-01"), today), DayOffset::Past);
    }

    #[test]
    fn crosses_month_boundaries() {
        let today = date("2024-05-31");
        assert_eq!(classify_day(date("2024-06-01"), today), DayOffset::Tomorrow);
    }

    #[test]
    fn parses_only_canonical_dates() {
        assert_eq!(parse_normalized_date("2024-05-10"), Some(date("2024-05-10")));
        assert_eq!(parse_normalized_date("nextfriday"), None);
        assert_eq!(parse_normalized_date("05/10/2024"), None);
    }
}
