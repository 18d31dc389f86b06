//! Topic selection driven by category weights and history similarity.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use topicwise_catalog::{TopicCatalog, FALLBACK_TOPIC};
use topicwise_core::{ContentRecord, Difficulty, Result};
use topicwise_diversity::{category_usage, keyword_frequency, similar_in, DiversityEngine};
use topicwise_store::ContentHistoryStore;

use crate::types::*;

/// Keywords seen in more than this many recent topics are called out.
const OVERUSED_KEYWORD_COUNT: usize = 3;
/// Fewer distinct categories than this triggers a diversify recommendation.
const MIN_CATEGORIES_USED: usize = 5;
/// Strategy asks for more diversity below this score.
const STRATEGY_SCORE_FLOOR: f64 = 0.7;

/// Picks topics from the catalog under the diversity engine's guidance.
#[derive(Clone)]
pub struct TopicSelector {
    engine: DiversityEngine,
    catalog: Arc<TopicCatalog>,
}

impl TopicSelector {
    pub fn new(engine: DiversityEngine, catalog: Arc<TopicCatalog>) -> Self {
        Self { engine, catalog }
    }

    pub fn engine(&self) -> &DiversityEngine {
        &self.engine
    }

    pub fn catalog(&self) -> &TopicCatalog {
        &self.catalog
    }

    /// Choose one topic.
    ///
    /// Without a preferred category the engine suggests one. When
    /// `exclude_recent` is set, topics resembling recent history are avoided
    /// unless nothing else is left.
    pub fn select<R: Rng + ?Sized>(
        &self,
        preferred_category: Option<&str>,
        difficulty: Option<Difficulty>,
        exclude_recent: bool,
        rng: &mut R,
    ) -> Result<TopicCandidate> {
        let records = self.engine.lookback()?;
        self.select_from(&records, preferred_category, difficulty, exclude_recent, rng)
    }

    /// [`select`](Self::select) over a history snapshot.
    pub fn select_from<R: Rng + ?Sized>(
        &self,
        records: &[ContentRecord],
        preferred_category: Option<&str>,
        difficulty: Option<Difficulty>,
        exclude_recent: bool,
        rng: &mut R,
    ) -> Result<TopicCandidate> {
        let category = match preferred_category {
            Some(c) => c.to_string(),
            None => self.engine.suggest_from(records, exclude_recent, rng)?,
        };

        let mut available = self.catalog.topics_for(&category, difficulty);
        if available.is_empty() {
            available = self.catalog.topics_for(&category, None);
        }

        let threshold = self.engine.config().topic_similarity_threshold;
        let filtered: Vec<&str> = if exclude_recent {
            available
                .iter()
                .copied()
                .filter(|t| similar_in(t, records, threshold).is_empty())
                .collect()
        } else {
            available.clone()
        };

        let topic = filtered
            .choose(rng)
            .or_else(|| available.choose(rng))
            .copied()
            .unwrap_or(FALLBACK_TOPIC)
            .to_string();

        let candidate = self.candidate(records, topic, category);
        debug!(
            "Selected '{}' ({}, {}) confidence={:.2}",
            candidate.topic, candidate.category, candidate.difficulty, candidate.confidence
        );
        Ok(candidate)
    }

    fn candidate(&self, records: &[ContentRecord], topic: String, category: String) -> TopicCandidate {
        let difficulty = self
            .catalog
            .difficulty_of(&category, &topic)
            .unwrap_or_default();
        let confidence = self.confidence(records, &topic, &category);
        TopicCandidate {
            topic,
            category,
            difficulty,
            confidence,
        }
    }

    /// Base confidence, raised for fresh categories and cut for familiar topics.
    fn confidence(&self, records: &[ContentRecord], topic: &str, category: &str) -> f64 {
        let config = self.engine.config();
        let usage = records.iter().filter(|r| r.category == category).count();
        let mut confidence = config.base_confidence;
        match usage {
            0 => confidence += 0.2,
            1..=2 => confidence += 0.1,
            _ => {}
        }
        if !similar_in(topic, records, config.topic_similarity_threshold).is_empty() {
            confidence -= 0.3;
        }
        confidence.clamp(0.0, 1.0)
    }

    /// Up to `count` distinct suggestions, highest confidence first.
    pub fn suggest<R: Rng + ?Sized>(
        &self,
        count: usize,
        preferred_categories: Option<&[String]>,
        rng: &mut R,
    ) -> Result<Vec<TopicCandidate>> {
        let records = self.engine.lookback()?;
        self.suggest_from(&records, count, preferred_categories, rng)
    }

    fn suggest_from<R: Rng + ?Sized>(
        &self,
        records: &[ContentRecord],
        count: usize,
        preferred_categories: Option<&[String]>,
        rng: &mut R,
    ) -> Result<Vec<TopicCandidate>> {
        let threshold = self.engine.config().topic_similarity_threshold;
        let preferred = preferred_categories.filter(|p| !p.is_empty());
        // No more distinct suggestions exist than catalog topics.
        let count = count.min(self.catalog.len());
        let mut seen: HashSet<(String, String)> = HashSet::new();
        let mut suggestions = Vec::with_capacity(count);

        for _ in 0..count.saturating_mul(2) {
            if suggestions.len() >= count {
                break;
            }
            let category = match preferred.and_then(|p| p.choose(rng)) {
                Some(c) => c.clone(),
                None => self.engine.suggest_from(records, true, rng)?,
            };
            let topics = self.catalog.topics_for(&category, None);
            let Some(topic) = topics.choose(rng) else {
                continue;
            };
            if !seen.insert((topic.to_string(), category.clone())) {
                continue;
            }
            if similar_in(topic, records, threshold).is_empty() {
                suggestions.push(self.candidate(records, topic.to_string(), category));
            }
        }

        suggestions.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        suggestions.truncate(count);
        Ok(suggestions)
    }

    /// Distribution, keyword and diversity analysis over the last `days`.
    pub fn analyze_patterns(&self, days: i64) -> Result<PatternAnalysis> {
        let records = self.engine.history().recent(days)?;
        Ok(self.patterns_from(&records, days))
    }

    fn patterns_from(&self, records: &[ContentRecord], days: i64) -> PatternAnalysis {
        let category_distribution = category_usage(records);
        let mut difficulty_distribution = BTreeMap::new();
        for record in records {
            *difficulty_distribution
                .entry(record.difficulty.as_str().to_string())
                .or_insert(0) += 1;
        }
        let most_common_keywords = keyword_frequency(records, self.engine.config().top_keywords);

        let mut recommendations = Vec::new();
        if category_distribution.len() < MIN_CATEGORIES_USED {
            recommendations.push("Consider diversifying across more health categories".to_string());
        }
        let count_of = |d: Difficulty| difficulty_distribution.get(d.as_str()).copied().unwrap_or(0);
        if count_of(Difficulty::Beginner) > count_of(Difficulty::Intermediate) * 2 {
            recommendations.push("Consider adding more intermediate-level content".to_string());
        }
        if let Some(top) = most_common_keywords.first() {
            if top.count > OVERUSED_KEYWORD_COUNT {
                recommendations.push(format!("Reduce repetition of '{}' keyword", top.keyword));
            }
        }

        let underused_categories = self
            .catalog
            .categories()
            .filter(|c| !category_distribution.contains_key(*c))
            .map(String::from)
            .collect();
        let overused_keywords = most_common_keywords
            .iter()
            .filter(|k| k.count > OVERUSED_KEYWORD_COUNT)
            .map(|k| k.keyword.clone())
            .collect();

        PatternAnalysis {
            period_days: days,
            total_content: records.len(),
            category_distribution,
            difficulty_distribution,
            most_common_keywords,
            diversity_score: self.engine.score_records(records),
            recommendations,
            underused_categories,
            overused_keywords,
        }
    }

    /// Recommended category, three suggestions in it, and a strategy line.
    pub fn next_strategy<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<ContentStrategy> {
        let records = self.engine.lookback()?;
        let analysis = self.patterns_from(&records, self.engine.config().lookback_days);
        let recommended_category = self.engine.suggest_from(&records, true, rng)?;
        let topic_suggestions = self.suggest_from(
            &records,
            3,
            Some(std::slice::from_ref(&recommended_category)),
            rng,
        )?;
        let strategy_text = strategy_text(&analysis);

        Ok(ContentStrategy {
            recommended_category,
            topic_suggestions,
            diversity_analysis: analysis,
            strategy_text,
        })
    }
}

fn strategy_text(analysis: &PatternAnalysis) -> String {
    let mut parts = Vec::new();
    if !analysis.underused_categories.is_empty() {
        let focus: Vec<&str> = analysis
            .underused_categories
            .iter()
            .take(3)
            .map(String::as_str)
            .collect();
        parts.push(format!("Focus on underused categories: {}", focus.join(", ")));
    }
    if analysis.diversity_score.score < STRATEGY_SCORE_FLOOR {
        parts.push("Increase content diversity across categories and topics".to_string());
    }
    if !analysis.overused_keywords.is_empty() {
        let avoid: Vec<&str> = analysis
            .overused_keywords
            .iter()
            .take(3)
            .map(String::as_str)
            .collect();
        parts.push(format!("Avoid overused keywords: {}", avoid.join(", ")));
    }
    if parts.is_empty() {
        parts.push("Continue with current diverse content approach".to_string());
    }
    parts.join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use topicwise_core::NewContent;
    use topicwise_store::MemoryHistory;

    fn fitness_catalog() -> TopicCatalog {
        TopicCatalog::default()
            .with_topics("Fitness", Difficulty::Beginner, ["Plank for 30 seconds", "Morning stretch"])
            .with_topics("Fitness", Difficulty::Advanced, ["Olympic lifting technique"])
            .with_topics("Hydration", Difficulty::Beginner, ["Drink lemon water for energy"])
    }

    fn selector(store: Arc<MemoryHistory>, catalog: TopicCatalog) -> TopicSelector {
        TopicSelector::new(DiversityEngine::with_defaults(store), Arc::new(catalog))
    }

    fn track(store: &MemoryHistory, topic: &str, category: &str, difficulty: Difficulty, days_ago: i64) {
        store
            .record(
                NewContent::new("title", topic, category, difficulty)
                    .generated_at(Utc::now() - Duration::days(days_ago)),
            )
            .unwrap();
    }

    #[test]
    fn test_select_preferred_category_cold_start() {
        let selector = selector(Arc::new(MemoryHistory::new()), fitness_catalog());
        let mut rng = StdRng::seed_from_u64(10);
        let pick = selector
            .select(Some("Fitness"), Some(Difficulty::Beginner), true, &mut rng)
            .unwrap();
        assert!(["Plank for 30 seconds", "Morning stretch"].contains(&pick.topic.as_str()));
        assert_eq!(pick.difficulty, Difficulty::Beginner);
        assert_eq!(pick.confidence, 1.0);
    }

    #[test]
    fn test_select_widens_difficulty() {
        let selector = selector(Arc::new(MemoryHistory::new()), fitness_catalog());
        let mut rng = StdRng::seed_from_u64(3);
        let pick = selector
            .select(Some("Hydration"), Some(Difficulty::Advanced), true, &mut rng)
            .unwrap();
        assert_eq!(pick.topic, "Drink lemon water for energy");
        assert_eq!(pick.difficulty, Difficulty::Beginner);
    }

    #[test]
    fn test_select_falls_back_when_all_similar() {
        let store = Arc::new(MemoryHistory::new());
        track(&store, "Drink lemon water for energy", "Hydration", Difficulty::Beginner, 1);
        let selector = selector(store, fitness_catalog());
        let mut rng = StdRng::seed_from_u64(3);
        let pick = selector.select(Some("Hydration"), None, true, &mut rng).unwrap();
        assert_eq!(pick.topic, "Drink lemon water for energy");
        // 0.8 + 0.1 (one use) - 0.3 (similar history)
        assert!((pick.confidence - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_select_unknown_category_uses_fallback_topic() {
        let selector = selector(Arc::new(MemoryHistory::new()), fitness_catalog());
        let mut rng = StdRng::seed_from_u64(3);
        let pick = selector.select(Some("Astrology"), None, true, &mut rng).unwrap();
        assert_eq!(pick.topic, FALLBACK_TOPIC);
        assert_eq!(pick.category, "Astrology");
        assert_eq!(pick.difficulty, Difficulty::Beginner);
    }

    #[test]
    fn test_select_avoids_similar_topics() {
        let store = Arc::new(MemoryHistory::new());
        track(&store, "Plank for 30 seconds", "Fitness", Difficulty::Beginner, 1);
        let selector = selector(store, fitness_catalog());
        let mut rng = StdRng::seed_from_u64(8);
        for _ in 0..10 {
            let pick = selector.select(Some("Fitness"), None, true, &mut rng).unwrap();
            assert_ne!(pick.topic, "Plank for 30 seconds");
        }
    }

    #[test]
    fn test_suggest_unique_and_sorted() {
        let selector = selector(Arc::new(MemoryHistory::new()), TopicCatalog::builtin());
        let mut rng = StdRng::seed_from_u64(21);
        let suggestions = selector.suggest(5, None, &mut rng).unwrap();
        assert!(!suggestions.is_empty() && suggestions.len() <= 5);
        let unique: HashSet<(&str, &str)> = suggestions
            .iter()
            .map(|s| (s.topic.as_str(), s.category.as_str()))
            .collect();
        assert_eq!(unique.len(), suggestions.len());
        assert!(suggestions.windows(2).all(|w| w[0].confidence >= w[1].confidence));
    }

    #[test]
    fn test_suggest_preferred_categories() {
        let selector = selector(Arc::new(MemoryHistory::new()), fitness_catalog());
        let mut rng = StdRng::seed_from_u64(4);
        let preferred = vec!["Fitness".to_string()];
        let suggestions = selector.suggest(3, Some(&preferred), &mut rng).unwrap();
        assert!(suggestions.iter().all(|s| s.category == "Fitness"));
        assert!(selector.suggest(0, None, &mut rng).unwrap().is_empty());
    }

    #[test]
    fn test_suggest_huge_count_is_bounded_by_catalog() {
        let selector = selector(Arc::new(MemoryHistory::new()), fitness_catalog());
        let mut rng = StdRng::seed_from_u64(4);
        let preferred = vec!["Fitness".to_string()];
        let suggestions = selector
            .suggest(usize::MAX, Some(&preferred), &mut rng)
            .unwrap();
        assert!(!suggestions.is_empty() && suggestions.len() <= 3);
    }

    #[test]
    fn test_analyze_patterns() {
        let store = Arc::new(MemoryHistory::new());
        for i in 0..4 {
            track(&store, &format!("hydration habit {}", i), "Hydration", Difficulty::Beginner, i);
        }
        track(&store, "evening walk", "Fitness", Difficulty::Intermediate, 2);
        let selector = selector(store, TopicCatalog::builtin());
        let analysis = selector.analyze_patterns(30).unwrap();

        assert_eq!(analysis.total_content, 5);
        assert_eq!(analysis.category_distribution["Hydration"], 4);
        assert_eq!(analysis.difficulty_distribution["beginner"], 4);
        assert_eq!(analysis.most_common_keywords[0].keyword, "habit");
        assert_eq!(analysis.overused_keywords, vec!["habit", "hydration"]);
        assert_eq!(
            analysis.recommendations,
            vec![
                "Consider diversifying across more health categories",
                "Consider adding more intermediate-level content",
                "Reduce repetition of 'habit' keyword",
            ]
        );
        assert_eq!(analysis.underused_categories.len(), 8);
        assert!(!analysis.underused_categories.contains(&"Fitness".to_string()));
    }

    #[test]
    fn test_next_strategy_cold_start() {
        let selector = selector(Arc::new(MemoryHistory::new()), TopicCatalog::builtin());
        let mut rng = StdRng::seed_from_u64(6);
        let strategy = selector.next_strategy(&mut rng).unwrap();
        assert!(strategy
            .topic_suggestions
            .iter()
            .all(|s| s.category == strategy.recommended_category));
        assert_eq!(
            strategy.strategy_text,
            "Focus on underused categories: Nutrition, Fitness, Mental Health"
        );
    }

    #[test]
    fn test_strategy_text_rules() {
        let store = Arc::new(MemoryHistory::new());
        for (days_ago, category) in [(1, "Nutrition"), (2, "Nutrition")] {
            track(&store, "lemon water", category, Difficulty::Beginner, days_ago);
        }
        let selector = selector(store, TopicCatalog::builtin());
        let analysis = selector.analyze_patterns(30).unwrap();
        let text = strategy_text(&analysis);
        assert_eq!(
            text,
            "Focus on underused categories: Fitness, Mental Health, Sleep; \
             Increase content diversity across categories and topics"
        );
    }
}
