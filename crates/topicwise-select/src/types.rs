//! Selection and validation result types.

use std::collections::BTreeMap;

use serde::Serialize;

use topicwise_core::Difficulty;
use topicwise_diversity::{DiversityScore, KeywordCount};

/// A proposed topic with its diversity confidence in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicCandidate {
    pub topic: String,
    pub category: String,
    pub difficulty: Difficulty,
    pub confidence: f64,
}

/// Content patterns over a history window.
#[derive(Debug, Clone, Serialize)]
pub struct PatternAnalysis {
    pub period_days: i64,
    pub total_content: usize,
    pub category_distribution: BTreeMap<String, usize>,
    pub difficulty_distribution: BTreeMap<String, usize>,
    pub most_common_keywords: Vec<KeywordCount>,
    pub diversity_score: DiversityScore,
    pub recommendations: Vec<String>,
    pub underused_categories: Vec<String>,
    pub overused_keywords: Vec<String>,
}

/// What to generate next and why.
#[derive(Debug, Clone, Serialize)]
pub struct ContentStrategy {
    pub recommended_category: String,
    pub topic_suggestions: Vec<TopicCandidate>,
    pub diversity_analysis: PatternAnalysis,
    pub strategy_text: String,
}

/// A history record that resembles the candidate.
#[derive(Debug, Clone, Serialize)]
pub struct SimilarityMatch {
    pub unique_id: String,
    pub title: String,
    pub topic: String,
    pub category: String,
    pub similarity: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryRepetition {
    pub is_repetitive: bool,
    /// Uses within the lookback window.
    pub recent_usage: usize,
    /// Uses within the repetition window.
    pub very_recent_usage: usize,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct KeywordRepetition {
    pub is_repetitive: bool,
    pub repeated_keywords: Vec<String>,
    pub keyword_usage: BTreeMap<String, usize>,
    pub message: String,
}

/// Title, topic, category and keyword checks against recent history.
#[derive(Debug, Clone, Serialize)]
pub struct SimilarityAnalysis {
    pub is_similar: bool,
    pub overall_similarity: f64,
    pub title_matches: Vec<SimilarityMatch>,
    pub topic_matches: Vec<SimilarityMatch>,
    pub category_repetition: CategoryRepetition,
    pub keyword_repetition: KeywordRepetition,
    pub recommendations: Vec<String>,
}

/// How far a single topic stands apart from recent history.
#[derive(Debug, Clone, Serialize)]
pub struct TopicDiversity {
    pub topic: String,
    pub category: Option<String>,
    pub diversity_score: f64,
    pub max_similarity: f64,
    pub avg_similarity: f64,
    pub category_diversity: f64,
    pub is_diverse: bool,
    pub recommendations: Vec<String>,
}

/// A catalog topic offered in place of a rejected one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alternative {
    pub topic: String,
    pub category: String,
    pub similarity_to_original: f64,
    pub diversity_score: f64,
}

/// Pre-publish verdict.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub similarity_analysis: SimilarityAnalysis,
    pub diversity_analysis: TopicDiversity,
    pub alternatives: Vec<Alternative>,
    pub overall_score: f64,
    pub recommendations: Vec<String>,
}
