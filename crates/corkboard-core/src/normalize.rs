//! Text, date, and time canonicalization.
//!
//! Every function here is idempotent: applying it twice yields the same
//! result as applying it once. This is load-bearing for identity keys,
//! because records store already-normalized fields and merged candidates
//! pass through normalization again.

use chrono::{Datelike, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

/// Quotation and apostrophe variants stripped before tokenizing, so
/// "Coach's note" and "Coach’s note" normalize identically.
const QUOTE_CHARS: &[char] = &['\'', '"', '`', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}', '\u{00B4}'];

/// English articles removed from titles (whole words only).
const ARTICLES: &[&str] = &["the", "a", "an"];

static NON_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("static regex"));

static SLASH_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})/(\d{1,2})(?:/(\d{2}|\d{4}))?$").expect("static regex"));

static CLOCK_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2})(?::(\d{2}))?\s*(am|pm|a\.m\.|p\.m\.)?$").expect("static regex")
});

/// Calendar formats tried after the slash-date pattern, most specific
/// first. `M/D[/YY[YY]]` inputs are handled by `SLASH_DATE` and never
/// reach this list.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
    "%d %B %Y",
];

/// Lowercase, strip quote variants, collapse non-alphanumeric runs to
/// single spaces, trim.
pub fn normalize_text(input: &str) -> String {
    let lowered = input.to_lowercase();
    let stripped: String = lowered.chars().filter(|c| !QUOTE_CHARS.contains(c)).collect();
    NON_ALNUM.replace_all(&stripped, " ").trim().to_string()
}

/// Title normalization: [`normalize_text`] plus removal of English
/// articles, so "The Soccer Practice" and "Soccer practice" share a key.
pub fn normalize_title(input: &str) -> String {
    normalize_text(input)
        .split_whitespace()
        .filter(|word| !ARTICLES.contains(word))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalized text with spaces removed. Used as the fallback when a date
/// or time does not parse; compaction keeps the fallback idempotent.
fn compact(input: &str) -> String {
    normalize_text(input).replace(' ', "")
}

/// Canonicalize a date string to `YYYY-MM-DD`.
///
/// Attempts a direct calendar parse, then `M/D[/YY[YY]]` with the current
/// year as default, then falls back to compacted normalized text.
pub fn normalize_date(input: &str) -> String {
    normalize_date_with_year(input, Utc::now().year())
}

/// [`normalize_date`] with an explicit default year, for deterministic
/// tests and callers that pin "now".
pub fn normalize_date_with_year(input: &str, default_year: i32) -> String {
    let trimmed = input.trim();

    // Slash dates go first: chrono's `%Y` accepts 1-2 digit years, so a
    // two-digit-year input like "5/10/24" must never reach the `%Y/%m/%d`
    // format below.
    if let Some(caps) = SLASH_DATE.captures(trimmed) {
        let month: u32 = caps[1].parse().unwrap_or(0);
        let day: u32 = caps[2].parse().unwrap_or(0);
        let year = match caps.get(3).map(|m| m.as_str()) {
            Some(y) if y.len() == 2 => 2000 + y.parse::<i32>().unwrap_or(0),
            Some(y) => y.parse::<i32>().unwrap_or(default_year),
            None => default_year,
        };
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            return date.format("%Y-%m-%d").to_string();
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            return date.format("%Y-%m-%d").to_string();
        }
    }

    compact(trimmed)
}

/// Canonicalize a time string to 24-hour `HH:MM`.
///
/// Parses `H[:MM][am|pm]`; unparsable input falls back to compacted
/// normalized text.
pub fn normalize_time(input: &str) -> String {
    let trimmed = input.trim().to_lowercase();

    if let Some(caps) = CLOCK_TIME.captures(&trimmed) {
        let raw_hour: u32 = caps[1].parse().unwrap_or(99);
        let minute: u32 = caps
            .get(2)
            .map(|m| m.as_str().parse().unwrap_or(0))
            .unwrap_or(0);
        let meridiem = caps.get(3).map(|m| m.as_str());

        let hour = match meridiem {
            Some(m) if m.starts_with('p') => match raw_hour {
                12 => Some(12),
                1..=11 => Some(raw_hour + 12),
                _ => None,
            },
            Some(_) => match raw_hour {
                12 => Some(0),
                1..=11 => Some(raw_hour),
                _ => None,
            },
            None if raw_hour <= 23 => Some(raw_hour),
            None => None,
        };

        if let Some(hour) = hour {
            if minute <= 59 {
                return format!("{:02}:{:02}", hour, minute);
            }
        }
    }

    compact(&trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_lowercases_and_collapses() {
        assert_eq!(normalize_text("  Soccer   PRACTICE! "), "soccer practice");
        assert_eq!(normalize_text("Back-to-School Night"), "back to school night");
    }

    #[test]
    fn text_strips_quote_variants() {
        assert_eq!(normalize_text("Coach's note"), "coachs note");
        assert_eq!(normalize_text("Coach\u{2019}s note"), "coachs note");
        assert_eq!(normalize_text("\u{201C}Recital\u{201D}"), "recital");
    }

    #[test]
    fn title_removes_articles() {
        assert_eq!(normalize_title("The Soccer Practice"), "soccer practice");
        assert_eq!(normalize_title("A trip to the museum"), "trip to museum");
        assert_eq!(normalize_title("An appointment"), "appointment");
    }

    #[test]
    fn title_keeps_article_prefixed_words() {
        // "theater" starts with "the" but is not an article
        assert_eq!(normalize_title("Theater tickets"), "theater tickets");
    }

    #[test]
    fn date_parses_common_formats() {
        assert_eq!(normalize_date("2024-05-10"), "2024-05-10");
        assert_eq!(normalize_date("05/10/2024"), "2024-05-10");
        assert_eq!(normalize_date("May 10, 2024"), "2024-05-10");
        assert_eq!(normalize_date("10 May 2024"), "2024-05-10");
    }

    #[test]
    fn date_slash_pattern_defaults_current_year() {
        assert_eq!(normalize_date_with_year("5/10", 2024), "2024-05-10");
        assert_eq!(normalize_date_with_year("5/10/24", 2020), "2024-05-10");
        assert_eq!(normalize_date_with_year("12/1", 2025), "2025-12-01");
    }

    #[test]
    fn two_digit_year_matches_four_digit_year() {
        assert_eq!(
            normalize_date_with_year("5/10/24", 2020),
            normalize_date_with_year("05/10/2024", 2020)
        );
        assert_eq!(normalize_date_with_year("1/2/99", 2024), "2099-01-02");
    }

    #[test]
    fn date_invalid_calendar_falls_back_to_compact() {
        assert_eq!(normalize_date_with_year("13/45", 2024), "1345");
        assert_eq!(normalize_date("next Friday"), "nextfriday");
    }

    #[test]
    fn time_parses_12_hour_clock() {
        assert_eq!(normalize_time("4:00 PM"), "16:00");
        assert_eq!(normalize_time("4:00pm"), "16:00");
        assert_eq!(normalize_time("4pm"), "16:00");
        assert_eq!(normalize_time("12pm"), "12:00");
        assert_eq!(normalize_time("12am"), "00:00");
        assert_eq!(normalize_time("9:30 a.m."), "09:30");
    }

    #[test]
    fn time_keeps_24_hour_clock() {
        assert_eq!(normalize_time("16:00"), "16:00");
        assert_eq!(normalize_time("7"), "07:00");
        assert_eq!(normalize_time("23:59"), "23:59");
    }

    #[test]
    fn time_unparsable_falls_back_to_compact() {
        assert_eq!(normalize_time("after school"), "afterschool");
        assert_eq!(normalize_time("25:99"), "2599");
    }

    #[test]
    fn all_normalizers_are_idempotent() {
        let samples = [
            "The Soccer Practice!",
            "Coach\u{2019}s \u{201C}note\u{201D}",
            "  mixed   CASE   here ",
            "2024-05-10",
            "next Friday",
        ];
        for s in samples {
            let once = normalize_text(s);
            assert_eq!(normalize_text(&once), once, "normalize_text({s:?})");
            let once = normalize_title(s);
            assert_eq!(normalize_title(&once), once, "normalize_title({s:?})");
        }

        for s in ["05/10/2024", "5/10", "May 10, 2024", "sometime in june"] {
            let once = normalize_date_with_year(s, 2024);
            assert_eq!(
                normalize_date_with_year(&once, 2024),
                once,
                "normalize_date({s:?})"
            );
        }

        for s in ["4:00 PM", "4pm", "16:00", "after school", "noon-ish"] {
            let once = normalize_time(s);
            assert_eq!(normalize_time(&once), once, "normalize_time({s:?})");
        }
    }
}
