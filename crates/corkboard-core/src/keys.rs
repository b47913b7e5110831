//! Canonical identity keys and source hashing.
//!
//! The exact canonical key is the primary identity of an obligation; the
//! loose temporal key drops the location component and serves as a
//! deliberately coarser fallback when location text is missing or garbled
//! between extractions of the same obligation.

use sha2::{Digest, Sha256};

use crate::models::ItemType;
use crate::normalize::{normalize_date, normalize_text, normalize_time, normalize_title};

/// Normalized identity fields and the derived keys for one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityKeys {
    /// `type|title|date|time|location`
    pub canonical: String,
    /// `type|title|date|time` (location dropped)
    pub loose: String,
    pub normalized_title: String,
    pub normalized_date: Option<String>,
    pub normalized_time: Option<String>,
    pub normalized_location: Option<String>,
}

/// Build identity keys from raw candidate fields. Missing optional fields
/// contribute empty key components.
pub fn build_keys(
    item_type: ItemType,
    title: &str,
    date: Option<&str>,
    time: Option<&str>,
    location: Option<&str>,
) -> IdentityKeys {
    let normalized_title = normalize_title(title);
    let normalized_date = date.map(normalize_date);
    let normalized_time = time.map(normalize_time);
    let normalized_location = location.map(normalize_text);

    let date_part = normalized_date.as_deref().unwrap_or("");
    let time_part = normalized_time.as_deref().unwrap_or("");
    let location_part = normalized_location.as_deref().unwrap_or("");

    let loose = format!(
        "{}|{}|{}|{}",
        item_type.as_str(),
        normalized_title,
        date_part,
        time_part
    );
    let canonical = format!("{}|{}", loose, location_part);

    IdentityKeys {
        canonical,
        loose,
        normalized_title,
        normalized_date,
        normalized_time,
        normalized_location,
    }
}

/// Derive a stable source hash from a raw source identifier.
///
/// Identifiers already carrying the `sha256:` prefix pass through
/// unchanged, so re-submitting an already-hashed identifier stays stable.
pub fn source_hash(raw: &str) -> String {
    if raw.starts_with("sha256:") {
        return raw.to_string();
    }
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    format!("sha256:{}", hex::encode(hasher.finalize()))
}
