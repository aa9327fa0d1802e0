//! Heuristic detection of character names in prose.
//!
//! A candidate is a run of adjacent capitalized words ("Aragorn",
//! "Dark Forest"). Common capitalized English words are filtered out, as is
//! anything of two characters or fewer. This is a best-effort filter, not an
//! NLP pass: sentence-initial words that are not in the stoplist will show up.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::{BTreeSet, HashSet};

/// Capitalized words that are never treated as names.
pub const STOPLIST: &[&str] = &[
    "The", "And", "But", "That", "This", "From", "With", "Not", "What", "When", "Where", "Why",
    "How", "Which", "Who", "About", "After", "Before", "During", "Without", "Within", "Through",
    "Between", "Into", "Over", "Under", "Above", "Below",
];

/// Candidates this short or shorter are dropped.
const MIN_NAME_LEN: usize = 3;

lazy_static! {
    static ref NAME_RUN: Regex =
        Regex::new(r"\b[A-Z][a-z]+(?:\s+[A-Z][a-z]+)*\b").expect("name pattern is valid");
    static ref STOPWORDS: HashSet<&'static str> = STOPLIST.iter().copied().collect();
}

/// Check if a word is on the stoplist.
pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(word)
}

/// All candidate names in `text`, deduplicated and sorted.
///
/// Whitespace inside a multi-word name is collapsed to a single space.
pub fn candidate_names(text: &str) -> Vec<String> {
    NAME_RUN
        .find_iter(text)
        .map(|m| m.as_str().split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|name| !is_stopword(name) && name.chars().count() >= MIN_NAME_LEN)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Candidate names in `text` that are not already among `existing`.
///
/// Matching against `existing` is exact and case-sensitive.
pub fn new_names<'a>(text: &str, existing: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let existing: HashSet<&str> = existing.into_iter().collect();
    candidate_names(text)
        .into_iter()
        .filter(|name| !existing.contains(name.as_str()))
        .collect()
}
