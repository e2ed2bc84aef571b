//! Tag normalization and matching.
//!
//! # Invariants
//! - Stored tags are trimmed, lowercase, unique, and keep first-occurrence order.
//! - `normalize_tags(normalize_tags(x)) == normalize_tags(x)`.
//! - Tag matching is exact after normalization (no substring matching).

use std::collections::HashSet;

/// Normalizes one tag value. Blank input yields `None`.
pub fn normalize_tag(tag: &str) -> Option<String> {
    let trimmed = tag.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Normalizes and deduplicates tag values while preserving input order.
pub fn normalize_tags<S: AsRef<str>>(tags: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut normalized = Vec::with_capacity(tags.len());
    for tag in tags {
        if let Some(value) = normalize_tag(tag.as_ref()) {
            if seen.insert(value.clone()) {
                normalized.push(value);
            }
        }
    }
    normalized
}

/// Returns whether `tags` contains `query` under case-insensitive exact match.
pub fn has_tag(tags: &[String], query: &str) -> bool {
    match normalize_tag(query) {
        Some(query) => tags.iter().any(|tag| tag.to_lowercase() == query),
        None => false,
    }
}
