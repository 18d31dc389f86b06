//! Pre-publish checks of a finished piece against recent history.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use topicwise_catalog::TopicCatalog;
use topicwise_core::{ContentRecord, Result};
use topicwise_diversity::DiversityEngine;
use topicwise_extract::{extract_keywords, jaccard, similarity};

use crate::types::*;

/// Rejects content that repeats recent titles, topics, categories or keywords.
#[derive(Clone)]
pub struct DuplicateValidator {
    engine: DiversityEngine,
    catalog: Arc<TopicCatalog>,
}

impl DuplicateValidator {
    pub fn new(engine: DiversityEngine, catalog: Arc<TopicCatalog>) -> Self {
        Self { engine, catalog }
    }

    /// Title, topic, category and keyword checks over the lookback window.
    pub fn check_similarity(
        &self,
        title: &str,
        topic: &str,
        category: Option<&str>,
    ) -> Result<SimilarityAnalysis> {
        Ok(self.similarity_in(&self.engine.lookback()?, title, topic, category))
    }

    fn similarity_in(
        &self,
        records: &[ContentRecord],
        title: &str,
        topic: &str,
        category: Option<&str>,
    ) -> SimilarityAnalysis {
        let config = self.engine.config();
        let title_matches = matches(records, config.title_similarity_threshold, |r| {
            similarity(title, &r.title)
        });
        let topic_matches = matches(records, config.topic_similarity_threshold, |r| {
            similarity(topic, &r.topic)
        });
        let category_repetition = self.category_repetition(records, category);
        let keyword_repetition = self.keyword_repetition(records, topic);

        let overall_similarity = title_matches
            .iter()
            .chain(&topic_matches)
            .map(|m| m.similarity)
            .fold(0.0, f64::max);
        let is_similar = !title_matches.is_empty()
            || !topic_matches.is_empty()
            || category_repetition.is_repetitive
            || keyword_repetition.is_repetitive;

        let mut recommendations = Vec::new();
        if let Some(max) = max_of(&title_matches) {
            recommendations.push(format!(
                "Title is {} similar to recent content - consider a more unique title",
                percent(max)
            ));
        }
        if let Some(max) = max_of(&topic_matches) {
            recommendations.push(format!(
                "Topic is {} similar to recent content - consider a different angle",
                percent(max)
            ));
        }
        if category_repetition.is_repetitive {
            recommendations.push(format!(
                "{} - consider using a different category",
                category_repetition.message
            ));
        }
        if keyword_repetition.is_repetitive {
            recommendations.push(format!(
                "{} - avoid overused terms",
                keyword_repetition.message
            ));
        }
        if recommendations.is_empty() {
            recommendations.push("Content appears unique and diverse".to_string());
        }

        SimilarityAnalysis {
            is_similar,
            overall_similarity,
            title_matches,
            topic_matches,
            category_repetition,
            keyword_repetition,
            recommendations,
        }
    }

    fn category_repetition(&self, records: &[ContentRecord], category: Option<&str>) -> CategoryRepetition {
        let Some(category) = category else {
            return CategoryRepetition {
                is_repetitive: false,
                recent_usage: 0,
                very_recent_usage: 0,
                message: "No category specified".to_string(),
            };
        };
        let config = self.engine.config();
        let now = Utc::now();
        let used: Vec<&ContentRecord> = records.iter().filter(|r| r.category == category).collect();
        let very_recent_usage = used
            .iter()
            .filter(|r| r.is_within(config.category_repetition_days, now))
            .count();
        let recent_usage = used.len();

        CategoryRepetition {
            is_repetitive: very_recent_usage > 0 || recent_usage > config.max_category_uses,
            recent_usage,
            very_recent_usage,
            message: if recent_usage > 0 {
                format!("Category \"{}\" used {} times recently", category, recent_usage)
            } else {
                format!("Category \"{}\" not used recently", category)
            },
        }
    }

    fn keyword_repetition(&self, records: &[ContentRecord], topic: &str) -> KeywordRepetition {
        let keywords = extract_keywords(topic);
        let mut keyword_usage = BTreeMap::new();
        for keyword in &keywords {
            let count = records
                .iter()
                .filter(|r| r.topic_keywords.contains(keyword))
                .count();
            if count > 0 {
                keyword_usage.insert(keyword.clone(), count);
            }
        }
        let limit = self.engine.config().max_keyword_uses;
        let repeated_keywords: Vec<String> = keyword_usage
            .iter()
            .filter(|(_, count)| **count > limit)
            .map(|(k, _)| k.clone())
            .collect();

        let message = if keywords.is_empty() {
            "No keywords to check".to_string()
        } else if repeated_keywords.is_empty() {
            "No keyword repetition detected".to_string()
        } else {
            format!("Overused keywords: {}", repeated_keywords.join(", "))
        };
        KeywordRepetition {
            is_repetitive: !repeated_keywords.is_empty(),
            repeated_keywords,
            keyword_usage,
            message,
        }
    }

    /// Distance of `topic` from recent history, blended with category freshness.
    pub fn diversity_score_for(&self, topic: &str, category: Option<&str>) -> Result<TopicDiversity> {
        Ok(self.diversity_in(&self.engine.lookback()?, topic, category))
    }

    fn diversity_in(&self, records: &[ContentRecord], topic: &str, category: Option<&str>) -> TopicDiversity {
        let keywords = extract_keywords(topic);
        let similarities: Vec<f64> = records
            .iter()
            .map(|r| jaccard(&keywords, &r.topic_keywords))
            .collect();
        let max_similarity = similarities.iter().copied().fold(0.0, f64::max);
        let avg_similarity = if similarities.is_empty() {
            0.0
        } else {
            similarities.iter().sum::<f64>() / similarities.len() as f64
        };
        let category_diversity = match category {
            Some(c) => {
                let usage = records.iter().filter(|r| r.category == c).count();
                1.0 / (1.0 + usage as f64)
            }
            None => 1.0,
        };
        let diversity_score = (1.0 - max_similarity + category_diversity) / 2.0;

        let level = if diversity_score < 0.4 {
            "Content is not diverse enough - consider a completely different topic"
        } else if diversity_score < 0.6 {
            "Content has moderate diversity - consider slight topic variations"
        } else {
            "Content is highly diverse - good choice for content generation"
        };
        let mut recommendations = vec![level.to_string()];
        if max_similarity > 0.5 {
            recommendations.push("Content is too similar to recent topics - try a different angle".to_string());
        } else if max_similarity > 0.3 {
            recommendations.push(
                "Content has some similarity to recent topics - consider minor adjustments".to_string(),
            );
        }

        TopicDiversity {
            topic: topic.to_string(),
            category: category.map(String::from),
            diversity_score,
            max_similarity,
            avg_similarity,
            category_diversity,
            is_diverse: diversity_score > self.engine.config().diversity_threshold,
            recommendations,
        }
    }

    /// Full verdict; alternatives are offered only for rejected content.
    pub fn validate(&self, title: &str, topic: &str, category: Option<&str>) -> Result<ValidationResult> {
        let records = self.engine.lookback()?;
        let similarity_analysis = self.similarity_in(&records, title, topic, category);
        let diversity_analysis = self.diversity_in(&records, topic, category);

        let is_valid = !similarity_analysis.is_similar && diversity_analysis.is_diverse;
        let alternatives = if is_valid {
            Vec::new()
        } else {
            self.suggest_alternatives(topic, category, 3)
        };
        let overall_score =
            ((1.0 - similarity_analysis.overall_similarity) + diversity_analysis.diversity_score) / 2.0;
        let recommendations = similarity_analysis
            .recommendations
            .iter()
            .chain(&diversity_analysis.recommendations)
            .cloned()
            .collect();

        info!(
            "Validated '{}': valid={}, score={:.3}",
            title, is_valid, overall_score
        );
        Ok(ValidationResult {
            is_valid,
            similarity_analysis,
            diversity_analysis,
            alternatives,
            overall_score,
            recommendations,
        })
    }

    /// Catalog topics dissimilar to `original_topic`, most distant first.
    pub fn suggest_alternatives(
        &self,
        original_topic: &str,
        category: Option<&str>,
        count: usize,
    ) -> Vec<Alternative> {
        let threshold = self.engine.config().topic_similarity_threshold;
        let original = extract_keywords(original_topic);
        let mut alternatives: Vec<Alternative> = self
            .catalog
            .entries()
            .into_iter()
            .filter(|e| category.map_or(true, |c| e.category == c))
            .filter_map(|e| {
                let sim = jaccard(&original, &extract_keywords(&e.topic));
                (sim < threshold).then(|| Alternative {
                    topic: e.topic,
                    category: e.category,
                    similarity_to_original: sim,
                    diversity_score: 1.0 - sim,
                })
            })
            .collect();
        alternatives.sort_by(|a, b| b.diversity_score.total_cmp(&a.diversity_score));
        alternatives.truncate(count);
        alternatives
    }
}

fn matches<F>(records: &[ContentRecord], threshold: f64, score: F) -> Vec<SimilarityMatch>
where
    F: Fn(&ContentRecord) -> f64,
{
    records
        .iter()
        .filter_map(|r| {
            let similarity = score(r);
            (similarity >= threshold).then(|| SimilarityMatch {
                unique_id: r.unique_id.clone(),
                title: r.title.clone(),
                topic: r.topic.clone(),
                category: r.category.clone(),
                similarity,
            })
        })
        .collect()
}

fn max_of(matches: &[SimilarityMatch]) -> Option<f64> {
    matches.iter().map(|m| m.similarity).reduce(f64::max)
}

fn percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}
