//! Parent suggestions for dependent notes whose parent id did not resolve.
//!
//! # Responsibility
//! - Turn the note's title/content into search tokens and phrases.
//! - Look for likely parents by tag first and by title as a fallback.
//!
//! # Invariants
//! - At most `MAX_TOKENS` distinct tokens are searched.
//! - Title fallback only runs when no token matched any tag.

use lazyplan_core::{EntityKind, Planner, StoreBackend};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Map, Value};
use std::collections::HashSet;

pub const HINT: &str =
    "Parent id not found. Confirm the correct parent id before retrying, or pick from candidates.";

const MAX_TOKENS: usize = 6;
const MIN_TOKEN_CHARS: usize = 3;
const MAX_PHRASE_CHARS: usize = 40;

static TOKEN_SEPARATOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s/\-]+").expect("valid token separator regex"));

/// Lowercased alphanumeric words of at least three characters, skipping
/// purely numeric ones.
fn extract_tokens(text: &str) -> Vec<String> {
    TOKEN_SEPARATOR_RE
        .split(text)
        .map(|part| {
            part.chars()
                .filter(|ch| ch.is_alphanumeric())
                .flat_map(char::to_lowercase)
                .collect::<String>()
        })
        .filter(|token| token.chars().count() >= MIN_TOKEN_CHARS)
        .filter(|token| !token.chars().all(char::is_numeric))
        .collect()
}

/// Distinct tokens from title then content, first `MAX_TOKENS` kept.
pub fn search_tokens(title: &str, content: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    extract_tokens(title)
        .into_iter()
        .chain(extract_tokens(content))
        .filter(|token| seen.insert(token.clone()))
        .take(MAX_TOKENS)
        .collect()
}

/// Title phrases for the fallback search: the title and the content's first
/// sentence, truncated.
pub fn search_phrases(title: &str, content: &str) -> Vec<String> {
    let mut phrases = Vec::new();
    if !title.is_empty() {
        phrases.push(title.to_string());
    }
    let first_sentence = content.split('.').next().unwrap_or_default();
    if !first_sentence.is_empty() && !phrases.iter().any(|phrase| phrase == first_sentence) {
        phrases.push(first_sentence.chars().take(MAX_PHRASE_CHARS).collect());
    }
    phrases
}

/// Builds the `candidates` object: `by_tag` keyed by token, or `by_title`
/// keyed by `<kind>s_by_title` when no tag matched.
pub fn parent_candidates<B: StoreBackend>(
    planner: &Planner<B>,
    title: &str,
    content: &str,
    parent_kind: EntityKind,
) -> Value {
    let mut by_tag = Map::new();
    for token in search_tokens(title, content) {
        let results = planner.search_all_by_tag(&token);
        if !results.is_empty() {
            by_tag.insert(token, json!(results));
        }
    }

    let mut candidates = Map::new();
    if !by_tag.is_empty() {
        candidates.insert("by_tag".to_string(), Value::Object(by_tag));
        return Value::Object(candidates);
    }

    let phrases = search_phrases(title, content);
    let searched_kinds = match parent_kind {
        EntityKind::Note => vec![EntityKind::Todo, EntityKind::Goal, EntityKind::Event],
        kind => vec![kind],
    };

    let mut by_title = Map::new();
    for kind in searched_kinds {
        by_title.insert(
            format!("{kind}s_by_title"),
            title_matches(planner, kind, &phrases),
        );
    }
    candidates.insert("by_title".to_string(), Value::Object(by_title));
    Value::Object(candidates)
}

// Each entity is listed once even when several phrases match it.
fn title_matches<B: StoreBackend>(
    planner: &Planner<B>,
    kind: EntityKind,
    phrases: &[String],
) -> Value {
    let mut seen = HashSet::new();
    let mut matches = Vec::new();
    for phrase in phrases {
        let found = match kind {
            EntityKind::Todo => planner
                .search_todos_by_title(phrase)
                .into_iter()
                .map(|view| (view.todo.id, json!(view)))
                .collect::<Vec<_>>(),
            EntityKind::Goal => planner
                .search_goals_by_title(phrase)
                .into_iter()
                .map(|view| (view.goal.id, json!(view)))
                .collect(),
            EntityKind::Event | EntityKind::Note => planner
                .search_events_by_title(phrase)
                .into_iter()
                .map(|view| (view.event.id, json!(view)))
                .collect(),
        };
        matches.extend(
            found
                .into_iter()
                .filter(|(id, _)| seen.insert(*id))
                .map(|(_, view)| view),
        );
    }
    Value::Array(matches)
}

#[cfg(test)]
mod tests {
    use super::{parent_candidates, search_phrases, search_tokens};
    use lazyplan_core::{EntityKind, MemoryBackend, NewGoal, NewTodo, Planner};

    #[test]
    fn tokens_are_lowercased_deduplicated_and_capped() {
        let tokens = search_tokens(
            "Movers quote/estimate",
            "Call MOVERS re: 2026 truck-size, boxes, tape, dolly",
        );
        assert_eq!(
            tokens,
            vec!["movers", "quote", "estimate", "call", "truck", "size"]
        );
    }

    #[test]
    fn short_and_numeric_tokens_are_skipped() {
        assert_eq!(search_tokens("Go to 1234 on 5th", ""), vec!["5th"]);
    }

    #[test]
    fn phrases_use_title_and_first_sentence() {
        let phrases = search_phrases(
            "Quote",
            "Ask the movers for a written estimate before Friday. Then book.",
        );
        assert_eq!(phrases.len(), 2);
        assert_eq!(phrases[1], "Ask the movers for a written estimate be");
        assert_eq!(search_phrases("Same", "Same"), vec!["Same".to_string()]);
    }

    #[test]
    fn tag_matches_win_over_title_matches() {
        let (mut planner, _) = Planner::open(MemoryBackend::new());
        let mut goal = NewGoal::new("Move apartment");
        goal.tags = vec!["apartment".to_string()];
        planner.add_goal(goal).unwrap();

        let candidates =
            parent_candidates(&planner, "apartment deposit", "", EntityKind::Goal);
        assert_eq!(
            candidates["by_tag"]["apartment"]["goals"][0]["title"],
            "Move apartment"
        );
        assert!(candidates.get("by_title").is_none());
    }

    #[test]
    fn title_fallback_searches_parent_kind() {
        let (mut planner, _) = Planner::open(MemoryBackend::new());
        planner.add_todo(NewTodo::new("Pack boxes")).unwrap();

        let candidates = parent_candidates(&planner, "Pack", "Pack boxes. Soon.", EntityKind::Todo);
        let todos = candidates["by_title"]["todos_by_title"].as_array().unwrap();
        assert_eq!(todos.len(), 1);
        assert!(candidates["by_title"].get("goals_by_title").is_none());

        let any_kind = parent_candidates(&planner, "Pack", "", EntityKind::Note);
        assert!(any_kind["by_title"]["events_by_title"].is_array());
        assert_eq!(
            any_kind["by_title"]["todos_by_title"].as_array().unwrap().len(),
            1
        );
    }
}
