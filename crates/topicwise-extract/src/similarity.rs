//! Jaccard similarity over keyword sets.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::keywords::extract_keywords;

/// Similarity between two topic strings.
#[derive(Debug, Clone, Serialize)]
pub struct SimilarityResult {
    pub topic_a: String,
    pub topic_b: String,
    pub score: f64,
}

impl SimilarityResult {
    pub fn compute(topic_a: &str, topic_b: &str) -> Self {
        Self {
            topic_a: topic_a.to_string(),
            topic_b: topic_b.to_string(),
            score: similarity(topic_a, topic_b),
        }
    }
}

/// `|a ∩ b| / |a ∪ b|`, or 0.0 when either set is empty.
pub fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    intersection as f64 / union as f64
}

/// Symmetric topic similarity in `[0, 1]`.
pub fn similarity(topic_a: &str, topic_b: &str) -> f64 {
    jaccard(&extract_keywords(topic_a), &extract_keywords(topic_b))
}

/// Highest similarity between `topic` and any of `others` (0.0 when empty).
pub fn max_similarity<'a>(topic: &str, others: impl IntoIterator<Item = &'a str>) -> f64 {
    let keywords = extract_keywords(topic);
    others
        .into_iter()
        .map(|other| jaccard(&keywords, &extract_keywords(other)))
        .fold(0.0, f64::max)
}

/// `1 - mean(pairwise similarity)`; 1.0 for fewer than two topics.
pub fn pairwise_diversity<S: AsRef<str>>(topics: &[S]) -> f64 {
    if topics.len() < 2 {
        return 1.0;
    }
    let sets: Vec<BTreeSet<String>> = topics.iter().map(|t| extract_keywords(t.as_ref())).collect();

    let mut total = 0.0;
    let mut pairs = 0usize;
    for i in 0..sets.len() {
        for j in (i + 1)..sets.len() {
            total += jaccard(&sets[i], &sets[j]);
            pairs += 1;
        }
    }
    1.0 - total / pairs as f64
}
