//! Diversity result types.

use std::collections::BTreeMap;

use serde::Serialize;

/// Category spread and topic dissimilarity over a history window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DiversityScore {
    pub score: f64,
    pub category_diversity: f64,
    pub topic_diversity: f64,
    pub categories_used: usize,
    pub total_categories: usize,
}

impl DiversityScore {
    /// Score for a window with no records.
    pub fn cold_start(total_categories: usize) -> Self {
        Self {
            score: 1.0,
            category_diversity: 1.0,
            topic_diversity: 1.0,
            categories_used: 0,
            total_categories,
        }
    }
}

/// How many history topics mention a keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordCount {
    pub keyword: String,
    pub count: usize,
}

/// Aggregate view of a history window.
#[derive(Debug, Clone, Serialize)]
pub struct DiversityReport {
    pub period_days: i64,
    pub total_content: usize,
    pub category_usage: BTreeMap<String, usize>,
    pub top_keywords: Vec<KeywordCount>,
    pub diversity: DiversityScore,
    pub suggested_next_category: String,
    pub least_used_categories: Vec<String>,
}
