//! Scoring a predicted outline against a reference outline.
//!
//! Text is compared after trimming, lower-casing and collapsing whitespace.
//! An exact match needs equal text, level and page; a partial match only
//! needs the reference words to be covered above a threshold.

use std::collections::HashSet;

use serde::Serialize;

use crate::analysis::normalize_whitespace;
use crate::model::{OutlineDocument, OutlineEntry};

/// Options for [`compare`].
#[derive(Debug, Clone)]
pub struct CompareOptions {
    /// Minimum share of reference words a prediction must contain to count
    /// as a partial match (exclusive)
    pub threshold: f64,
}

impl CompareOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the partial-match threshold, clamped to `0.0..=1.0`.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = if threshold.is_finite() {
            threshold.clamp(0.0, 1.0)
        } else {
            self.threshold
        };
        self
    }
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self { threshold: 0.5 }
    }
}

/// Result of comparing two outlines.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    /// Titles are equal after normalization
    pub title_match: bool,
    /// Share of reference title words present in the predicted title
    pub title_similarity: f64,
    /// Number of predicted entries
    pub predicted: usize,
    /// Number of reference entries
    pub expected: usize,
    /// Reference entries matched on text, level and page
    pub exact_matches: usize,
    /// Reference entries matched on text overlap only
    pub partial_matches: usize,
    /// exact / predicted
    pub precision: f64,
    /// exact / expected
    pub recall: f64,
    /// Harmonic mean of precision and recall
    pub f1: f64,
}

/// Compare `predicted` against `truth`.
///
/// Every reference entry is matched at most once, and a predicted entry
/// never satisfies two reference entries.
pub fn compare(
    predicted: &OutlineDocument,
    truth: &OutlineDocument,
    options: &CompareOptions,
) -> Evaluation {
    let (title_match, title_similarity) = compare_titles(&predicted.title, &truth.title);

    let predicted_keys: Vec<EntryKey> = predicted.outline.iter().map(EntryKey::new).collect();
    let truth_keys: Vec<EntryKey> = truth.outline.iter().map(EntryKey::new).collect();
    let mut used = vec![false; predicted_keys.len()];

    // Exact pass first so a loose match cannot steal an exact one
    let mut unmatched = Vec::new();
    let mut exact_matches = 0;
    for expected in &truth_keys {
        let hit = predicted_keys
            .iter()
            .enumerate()
            .position(|(i, p)| !used[i] && p.exact_eq(expected));
        match hit {
            Some(i) => {
                used[i] = true;
                exact_matches += 1;
            }
            None => unmatched.push(expected),
        }
    }

    let mut partial_matches = 0;
    for expected in unmatched {
        let hit = predicted_keys.iter().enumerate().position(|(i, p)| {
            !used[i] && word_overlap(&p.words, &expected.words) > options.threshold
        });
        if let Some(i) = hit {
            used[i] = true;
            partial_matches += 1;
        }
    }

    let precision = ratio(exact_matches, predicted_keys.len());
    let recall = ratio(exact_matches, truth_keys.len());
    let f1 = if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    };

    log::debug!(
        "Compared {} predicted vs {} expected: {} exact, {} partial",
        predicted_keys.len(),
        truth_keys.len(),
        exact_matches,
        partial_matches
    );

    Evaluation {
        title_match,
        title_similarity,
        predicted: predicted_keys.len(),
        expected: truth_keys.len(),
        exact_matches,
        partial_matches,
        precision,
        recall,
        f1,
    }
}

struct EntryKey<'a> {
    text: String,
    words: HashSet<String>,
    entry: &'a OutlineEntry,
}

impl<'a> EntryKey<'a> {
    fn new(entry: &'a OutlineEntry) -> Self {
        let text = normalize(&entry.text);
        Self {
            words: words(&text),
            text,
            entry,
        }
    }

    fn exact_eq(&self, other: &EntryKey<'_>) -> bool {
        self.text == other.text
            && self.entry.level == other.entry.level
            && self.entry.page == other.entry.page
    }
}

fn compare_titles(predicted: &str, truth: &str) -> (bool, f64) {
    let predicted = normalize(predicted);
    let truth = normalize(truth);
    if truth.is_empty() {
        // Nothing to find: only an empty prediction is right
        let matched = predicted.is_empty();
        return (matched, if matched { 1.0 } else { 0.0 });
    }
    (
        predicted == truth,
        word_overlap(&words(&predicted), &words(&truth)),
    )
}

fn normalize(text: &str) -> String {
    normalize_whitespace(text).to_lowercase()
}

fn words(text: &str) -> HashSet<String> {
    text.split_whitespace().map(str::to_string).collect()
}

/// Share of `expected` words that also appear in `candidate`.
fn word_overlap(candidate: &HashSet<String>, expected: &HashSet<String>) -> f64 {
    if expected.is_empty() {
        return 0.0;
    }
    let shared = expected.intersection(candidate).count();
    shared as f64 / expected.len() as f64
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}
