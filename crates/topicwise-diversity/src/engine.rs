//! Weighted category selection and history-based diversity scoring.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use topicwise_core::{CategorySet, ContentRecord, DiversityConfig, Error, Result};
use topicwise_extract::{extract_keywords, extract_tokens, jaccard, pairwise_diversity, similarity};
use topicwise_store::history::least_used;
use topicwise_store::ContentHistoryStore;

use crate::types::*;

/// Diversity computations over a shared history store.
#[derive(Clone)]
pub struct DiversityEngine {
    history: Arc<dyn ContentHistoryStore>,
    categories: CategorySet,
    config: DiversityConfig,
}

impl DiversityEngine {
    pub fn new(
        history: Arc<dyn ContentHistoryStore>,
        categories: CategorySet,
        config: DiversityConfig,
    ) -> Self {
        Self {
            history,
            categories,
            config,
        }
    }

    /// Engine over the health categories with default thresholds.
    pub fn with_defaults(history: Arc<dyn ContentHistoryStore>) -> Self {
        Self::new(history, CategorySet::health(), DiversityConfig::default())
    }

    pub fn history(&self) -> &Arc<dyn ContentHistoryStore> {
        &self.history
    }

    pub fn categories(&self) -> &CategorySet {
        &self.categories
    }

    pub fn config(&self) -> &DiversityConfig {
        &self.config
    }

    /// The lookback window snapshot used by most operations.
    pub fn lookback(&self) -> Result<Vec<ContentRecord>> {
        self.history.recent(self.config.lookback_days)
    }

    // ---------- weights and selection ----------

    /// `base_weight + max(0, cap - usage)` for every category.
    pub fn category_weights(&self) -> Result<BTreeMap<String, f64>> {
        Ok(self.weights_for(&self.lookback()?))
    }

    /// Category weights computed from a history snapshot.
    pub fn weights_for(&self, records: &[ContentRecord]) -> BTreeMap<String, f64> {
        let usage = category_usage(records);
        let cap = self.config.usage_bonus_cap as usize;
        self.categories
            .iter()
            .map(|def| {
                let used = usage.get(&def.name).copied().unwrap_or(0);
                let bonus = cap.saturating_sub(used);
                (def.name.clone(), (def.base_weight as usize + bonus) as f64)
            })
            .collect()
    }

    /// Weighted draw over categories not in `exclude`.
    ///
    /// An exclusion that removes every category is ignored.
    pub fn select_category<R: Rng + ?Sized>(
        &self,
        exclude: &HashSet<String>,
        rng: &mut R,
    ) -> Result<String> {
        let weights = self.weights_for(&self.lookback()?);
        self.draw_category(&weights, exclude, rng)
    }

    /// Weighted draw from precomputed weights.
    pub fn draw_category<R: Rng + ?Sized>(
        &self,
        weights: &BTreeMap<String, f64>,
        exclude: &HashSet<String>,
        rng: &mut R,
    ) -> Result<String> {
        let all: Vec<(&str, f64)> = self
            .categories
            .names()
            .map(|name| (name, weights.get(name).copied().unwrap_or(0.0)))
            .collect();
        let mut candidates: Vec<(&str, f64)> = all
            .iter()
            .copied()
            .filter(|(name, _)| !exclude.contains(*name))
            .collect();
        if candidates.is_empty() {
            debug!("All categories excluded, drawing from the full set");
            candidates = all;
        }

        let chosen = match WeightedIndex::new(candidates.iter().map(|(_, w)| *w)) {
            Ok(dist) => Some(candidates[dist.sample(rng)].0),
            // All weights zero: uniform over the candidates.
            Err(_) => candidates.choose(rng).map(|(name, _)| *name),
        };
        chosen
            .map(str::to_string)
            .ok_or_else(|| Error::Config("no categories defined".into()))
    }

    /// Draw a category, skipping those used within `recent_category_days`.
    pub fn suggest_next_category<R: Rng + ?Sized>(
        &self,
        exclude_recent: bool,
        rng: &mut R,
    ) -> Result<String> {
        let records = self.lookback()?;
        self.suggest_from(&records, exclude_recent, rng)
    }

    /// [`suggest_next_category`](Self::suggest_next_category) over a snapshot.
    pub fn suggest_from<R: Rng + ?Sized>(
        &self,
        records: &[ContentRecord],
        exclude_recent: bool,
        rng: &mut R,
    ) -> Result<String> {
        let exclude: HashSet<String> = if exclude_recent {
            let now = Utc::now();
            records
                .iter()
                .filter(|r| r.is_within(self.config.recent_category_days, now))
                .map(|r| r.category.clone())
                .collect()
        } else {
            HashSet::new()
        };
        let weights = self.weights_for(records);
        self.draw_category(&weights, &exclude, rng)
    }

    // ---------- similarity ----------

    pub fn similarity(&self, topic_a: &str, topic_b: &str) -> f64 {
        similarity(topic_a, topic_b)
    }

    /// Records in the lookback window whose topic similarity is `>= threshold`.
    pub fn find_similar(&self, topic: &str, threshold: f64) -> Result<Vec<ContentRecord>> {
        Ok(similar_in(topic, &self.lookback()?, threshold)
            .into_iter()
            .cloned()
            .collect())
    }

    pub fn is_too_similar(&self, topic: &str, max_similarity: f64) -> Result<bool> {
        Ok(!similar_in(topic, &self.lookback()?, max_similarity).is_empty())
    }

    // ---------- scores and reports ----------

    pub fn diversity_score(&self, days: i64) -> Result<DiversityScore> {
        Ok(self.score_records(&self.history.recent(days)?))
    }

    /// Diversity of a snapshot. An empty snapshot scores 1.0.
    pub fn score_records(&self, records: &[ContentRecord]) -> DiversityScore {
        let total = self.categories.len();
        if records.is_empty() {
            return DiversityScore::cold_start(total);
        }

        let used: HashSet<&str> = records.iter().map(|r| r.category.as_str()).collect();
        let category_diversity = if total == 0 {
            0.0
        } else {
            (used.len() as f64 / total as f64).min(1.0)
        };
        let topics: Vec<&str> = records.iter().map(|r| r.topic.as_str()).collect();
        let topic_diversity = pairwise_diversity(&topics);

        DiversityScore {
            score: (category_diversity + topic_diversity) / 2.0,
            category_diversity,
            topic_diversity,
            categories_used: used.len(),
            total_categories: total,
        }
    }

    pub fn diversity_report<R: Rng + ?Sized>(&self, days: i64, rng: &mut R) -> Result<DiversityReport> {
        let snapshot = self.history.recent(days.max(self.config.lookback_days))?;
        let now = Utc::now();
        let (window, lookback): (Vec<ContentRecord>, Vec<ContentRecord>) = (
            snapshot.iter().filter(|r| r.is_within(days, now)).cloned().collect(),
            snapshot
                .iter()
                .filter(|r| r.is_within(self.config.lookback_days, now))
                .cloned()
                .collect(),
        );

        let report = DiversityReport {
            period_days: days,
            total_content: window.len(),
            category_usage: category_usage(&window),
            top_keywords: keyword_frequency(&window, self.config.top_keywords),
            diversity: self.score_records(&window),
            suggested_next_category: self.suggest_from(&lookback, true, rng)?,
            least_used_categories: least_used(&window, 5),
        };
        debug!(
            "Diversity report: {} records over {} days, score={:.3}",
            report.total_content, days, report.diversity.score
        );
        Ok(report)
    }
}

/// Records whose topic similarity to `topic` is at least `threshold`.
pub fn similar_in<'a>(
    topic: &str,
    records: &'a [ContentRecord],
    threshold: f64,
) -> Vec<&'a ContentRecord> {
    let keywords = extract_keywords(topic);
    records
        .iter()
        .filter(|r| jaccard(&keywords, &r.topic_keywords) >= threshold)
        .collect()
}

/// Uses per category in a snapshot.
pub fn category_usage(records: &[ContentRecord]) -> BTreeMap<String, usize> {
    let mut usage = BTreeMap::new();
    for record in records {
        *usage.entry(record.category.clone()).or_insert(0) += 1;
    }
    usage
}

/// Most frequent topic keywords, highest count first, ties by keyword.
///
/// Every occurrence counts, so a keyword repeated within one topic counts twice.
pub fn keyword_frequency(records: &[ContentRecord], limit: usize) -> Vec<KeywordCount> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for keyword in records.iter().flat_map(|r| extract_tokens(&r.topic)) {
        *counts.entry(keyword).or_insert(0) += 1;
    }
    let mut sorted: Vec<KeywordCount> = counts
        .into_iter()
        .map(|(keyword, count)| KeywordCount { keyword, count })
        .collect();
    sorted.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.keyword.cmp(&b.keyword)));
    sorted.truncate(limit);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use topicwise_core::{CategoryDef, Difficulty, NewContent};
    use topicwise_store::MemoryHistory;

    fn engine_with(records: &[(&str, &str, i64)]) -> DiversityEngine {
        let store = MemoryHistory::new();
        let now = Utc::now();
        for (topic, category, days_ago) in records {
            store
                .record(
                    NewContent::new("title", *topic, *category, Difficulty::Beginner)
                        .generated_at(now - Duration::days(*days_ago)),
                )
                .unwrap();
        }
        DiversityEngine::with_defaults(Arc::new(store))
    }

    #[test]
    fn test_cold_start() {
        let engine = engine_with(&[]);
        let score = engine.diversity_score(30).unwrap();
        assert_eq!(score.score, 1.0);
        assert_eq!(score.total_categories, 10);
        let weights = engine.category_weights().unwrap();
        assert_eq!(weights["Nutrition"], 18.0);
        assert_eq!(weights["Skincare"], 14.0);
    }

    #[test]
    fn test_weights_decrease_with_usage() {
        // Mental Health and Sleep share base weight 6.
        let engine = engine_with(&[
            ("better sleep", "Sleep", 1),
            ("deep sleep", "Sleep", 2),
            ("mindful breathing", "Mental Health", 1),
        ]);
        let weights = engine.category_weights().unwrap();
        assert_eq!(weights["Sleep"], 14.0);
        assert_eq!(weights["Mental Health"], 15.0);
        assert!(weights["Mental Health"] >= weights["Sleep"]);
    }

    #[test]
    fn test_bonus_floors_at_zero() {
        let records: Vec<(&str, &str, i64)> = (0..12).map(|_| ("walk", "Fitness", 1)).collect();
        let engine = engine_with(&records);
        assert_eq!(engine.category_weights().unwrap()["Fitness"], 7.0);
    }

    #[test]
    fn test_exclusion_fallback() {
        let engine = engine_with(&[]);
        let all: HashSet<String> = engine.categories().names().map(String::from).collect();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..20 {
            let category = engine.select_category(&all, &mut rng).unwrap();
            assert!(engine.categories().contains(&category));
        }
    }

    #[test]
    fn test_select_respects_exclusion() {
        let engine = engine_with(&[]);
        let exclude: HashSet<String> = engine
            .categories()
            .names()
            .filter(|n| *n != "Hydration")
            .map(String::from)
            .collect();
        let mut rng = StdRng::seed_from_u64(5);
        assert_eq!(engine.select_category(&exclude, &mut rng).unwrap(), "Hydration");
    }

    #[test]
    fn test_zero_weights_draw_uniformly() {
        let categories = CategorySet::new(vec![
            CategoryDef::new("A", 0, "first"),
            CategoryDef::new("B", 0, "second"),
        ])
        .unwrap();
        let config = DiversityConfig {
            usage_bonus_cap: 0,
            ..Default::default()
        };
        let engine = DiversityEngine::new(Arc::new(MemoryHistory::new()), categories, config);
        let mut rng = StdRng::seed_from_u64(2);
        let category = engine.select_category(&HashSet::new(), &mut rng).unwrap();
        assert!(category == "A" || category == "B");
    }

    #[test]
    fn test_suggest_skips_recent() {
        let engine = engine_with(&[
            ("lemon water", "Nutrition", 0),
            ("protein breakfast", "Nutrition", 0),
            ("fiber snacks", "Nutrition", 0),
        ]);
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..50 {
            assert_ne!(engine.suggest_next_category(true, &mut rng).unwrap(), "Nutrition");
        }
    }

    #[test]
    fn test_find_similar_threshold() {
        let engine = engine_with(&[("drink lemon water for energy", "Hydration", 1)]);
        assert_eq!(
            engine.find_similar("drink lemon water for more energy", 0.3).unwrap().len(),
            1
        );
        assert!(engine.is_too_similar("drink lemon water for more energy", 0.4).unwrap());
        assert!(!engine.is_too_similar("try a 10 minute evening walk", 0.4).unwrap());
    }

    #[test]
    fn test_diversity_score_values() {
        let engine = engine_with(&[
            ("lemon water", "Hydration", 1),
            ("lemon water", "Hydration", 2),
        ]);
        let score = engine.diversity_score(30).unwrap();
        assert_eq!(score.categories_used, 1);
        assert!((score.category_diversity - 0.1).abs() < 1e-9);
        assert_eq!(score.topic_diversity, 0.0);
        assert!((score.score - 0.05).abs() < 1e-9);
    }

    #[test]
    fn test_report() {
        let engine = engine_with(&[
            ("lemon water morning", "Hydration", 1),
            ("lemon water evening", "Hydration", 2),
            ("evening walk", "Fitness", 3),
            ("old topic", "Sleep", 40),
        ]);
        let mut rng = StdRng::seed_from_u64(1);
        let report = engine.diversity_report(30, &mut rng).unwrap();
        assert_eq!(report.period_days, 30);
        assert_eq!(report.total_content, 3);
        assert_eq!(report.category_usage["Hydration"], 2);
        assert_eq!(report.top_keywords[0].count, 2);
        assert_eq!(report.least_used_categories, vec!["Fitness", "Hydration"]);
        assert!(!["Hydration", "Fitness"].contains(&report.suggested_next_category.as_str()));
    }

    #[test]
    fn test_keyword_frequency_counts_repeats() {
        let record = |topic: &str| {
            ContentRecord::new(
                NewContent::new("title", topic, "Hydration", Difficulty::Beginner),
                extract_keywords(topic),
            )
        };
        let records = vec![record("water water everywhere"), record("lemon water")];
        let top = keyword_frequency(&records, 2);
        assert_eq!(top[0].keyword, "water");
        assert_eq!(top[0].count, 3);
        assert_eq!(top[1].keyword, "everywhere");
        assert_eq!(top[1].count, 1);
    }
}
