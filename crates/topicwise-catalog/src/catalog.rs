//! Category/difficulty-indexed topic bank with lookup, search and sampling.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use topicwise_core::{Difficulty, Error, Result};

/// Returned whenever a draw has nothing to choose from.
pub const FALLBACK_TOPIC: &str = "General health and wellness tips";

const BUILTIN_TOPICS: &str = include_str!("../data/topics.json");

/// Topics of one category, bucketed by difficulty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryTopics {
    pub category: String,
    #[serde(default)]
    pub beginner: Vec<String>,
    #[serde(default)]
    pub intermediate: Vec<String>,
    #[serde(default)]
    pub advanced: Vec<String>,
}

impl CategoryTopics {
    pub fn bucket(&self, difficulty: Difficulty) -> &[String] {
        match difficulty {
            Difficulty::Beginner => &self.beginner,
            Difficulty::Intermediate => &self.intermediate,
            Difficulty::Advanced => &self.advanced,
        }
    }

    fn bucket_mut(&mut self, difficulty: Difficulty) -> &mut Vec<String> {
        match difficulty {
            Difficulty::Beginner => &mut self.beginner,
            Difficulty::Intermediate => &mut self.intermediate,
            Difficulty::Advanced => &mut self.advanced,
        }
    }

    fn total(&self) -> usize {
        self.beginner.len() + self.intermediate.len() + self.advanced.len()
    }
}

/// One topic with its location in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub topic: String,
    pub category: String,
    pub difficulty: Difficulty,
}

/// Topic counts per difficulty bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryStats {
    pub beginner: usize,
    pub intermediate: usize,
    pub advanced: usize,
    pub total: usize,
}

/// Immutable topic bank. Category order is preserved from the source data.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TopicCatalog {
    categories: Vec<CategoryTopics>,
}

impl TopicCatalog {
    /// Build a catalog; category names must be unique.
    pub fn new(categories: Vec<CategoryTopics>) -> Result<Self> {
        let mut seen = HashSet::new();
        for c in &categories {
            if !seen.insert(c.category.as_str()) {
                return Err(Error::Catalog(format!("duplicate category: {}", c.category)));
            }
        }
        Ok(Self { categories })
    }

    /// Parse the JSON topic bank format: a list of `CategoryTopics` objects.
    pub fn from_json(json: &str) -> Result<Self> {
        let categories: Vec<CategoryTopics> =
            serde_json::from_str(json).map_err(|e| Error::Catalog(e.to_string()))?;
        Self::new(categories)
    }

    /// Load a topic bank from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&data)?;
        info!(
            "Loaded topic catalog from {}: {} categories, {} topics",
            path.display(),
            catalog.categories.len(),
            catalog.len()
        );
        Ok(catalog)
    }

    /// The bundled health topic bank.
    pub fn builtin() -> Self {
        match Self::from_json(BUILTIN_TOPICS) {
            Ok(catalog) => catalog,
            Err(e) => {
                warn!("Bundled topic bank is invalid, starting empty: {}", e);
                Self::default()
            }
        }
    }

    /// Load `path` if it exists, otherwise the bundled bank.
    pub fn load_or_builtin(path: &Path) -> Self {
        if !path.exists() {
            return Self::builtin();
        }
        match Self::load(path) {
            Ok(catalog) => catalog,
            Err(e) => {
                warn!("Failed to load {}: {}; using bundled topics", path.display(), e);
                Self::builtin()
            }
        }
    }

    /// Add topics to a category bucket, creating the category if needed.
    pub fn with_topics<I, S>(mut self, category: &str, difficulty: Difficulty, topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let idx = match self.categories.iter().position(|c| c.category == category) {
            Some(idx) => idx,
            None => {
                self.categories.push(CategoryTopics {
                    category: category.to_string(),
                    ..Default::default()
                });
                self.categories.len() - 1
            }
        };
        self.categories[idx]
            .bucket_mut(difficulty)
            .extend(topics.into_iter().map(Into::into));
        self
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.category.as_str())
    }

    fn category(&self, name: &str) -> Option<&CategoryTopics> {
        self.categories.iter().find(|c| c.category == name)
    }

    /// Total number of topics.
    pub fn len(&self) -> usize {
        self.categories.iter().map(CategoryTopics::total).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Topics of `category`, restricted to one bucket when `difficulty` is given.
    ///
    /// Unknown categories yield an empty list.
    pub fn topics_for(&self, category: &str, difficulty: Option<Difficulty>) -> Vec<&str> {
        let Some(cat) = self.category(category) else {
            return Vec::new();
        };
        match difficulty {
            Some(d) => cat.bucket(d).iter().map(String::as_str).collect(),
            None => Difficulty::ALL
                .iter()
                .flat_map(|d| cat.bucket(*d))
                .map(String::as_str)
                .collect(),
        }
    }

    /// Topics of one difficulty across every category.
    pub fn topics_by_difficulty(&self, difficulty: Difficulty) -> Vec<&str> {
        self.categories
            .iter()
            .flat_map(|c| c.bucket(difficulty))
            .map(String::as_str)
            .collect()
    }

    /// Which bucket of `category` holds `topic`, if any.
    pub fn difficulty_of(&self, category: &str, topic: &str) -> Option<Difficulty> {
        let cat = self.category(category)?;
        Difficulty::ALL
            .into_iter()
            .find(|d| cat.bucket(*d).iter().any(|t| t == topic))
    }

    /// Every topic in the catalog with its location.
    pub fn entries(&self) -> Vec<CatalogEntry> {
        self.categories
            .iter()
            .flat_map(|c| {
                Difficulty::ALL.into_iter().flat_map(move |d| {
                    c.bucket(d).iter().map(move |t| CatalogEntry {
                        topic: t.clone(),
                        category: c.category.clone(),
                        difficulty: d,
                    })
                })
            })
            .collect()
    }

    /// Uniform draw; picks a random category first when none is given.
    pub fn random_topic<R: Rng + ?Sized>(
        &self,
        category: Option<&str>,
        difficulty: Option<Difficulty>,
        rng: &mut R,
    ) -> String {
        let category = match category {
            Some(c) => Some(c),
            None => {
                let names: Vec<&str> = self.categories().collect();
                names.choose(rng).copied()
            }
        };
        category
            .map(|c| self.topics_for(c, difficulty))
            .and_then(|topics| topics.choose(rng).map(|t| t.to_string()))
            .unwrap_or_else(|| FALLBACK_TOPIC.to_string())
    }

    /// Case-insensitive substring search over every topic.
    pub fn search(&self, keyword: &str) -> Vec<CatalogEntry> {
        let needle = keyword.to_lowercase();
        self.entries()
            .into_iter()
            .filter(|e| e.topic.to_lowercase().contains(&needle))
            .collect()
    }

    /// Up to `count` topics, each from a distinct `(category, difficulty)` pair.
    ///
    /// Pairs are visited in random order and never revisited, so the draw
    /// stops once `count` is reached or every pair has been tried. When the
    /// exclusion removes every category the full set is used instead.
    pub fn diverse_sample<R: Rng + ?Sized>(
        &self,
        count: usize,
        exclude_categories: &HashSet<String>,
        rng: &mut R,
    ) -> Vec<CatalogEntry> {
        let mut available: Vec<&CategoryTopics> = self
            .categories
            .iter()
            .filter(|c| !exclude_categories.contains(&c.category))
            .collect();
        if available.is_empty() {
            available = self.categories.iter().collect();
        }

        let mut pairs: Vec<(&CategoryTopics, Difficulty)> = available
            .iter()
            .flat_map(|c| Difficulty::ALL.into_iter().map(move |d| (*c, d)))
            .collect();
        pairs.shuffle(rng);

        let mut sample = Vec::with_capacity(count.min(pairs.len()));
        for (cat, difficulty) in pairs {
            if sample.len() >= count {
                break;
            }
            if let Some(topic) = cat.bucket(difficulty).choose(rng) {
                sample.push(CatalogEntry {
                    topic: topic.clone(),
                    category: cat.category.clone(),
                    difficulty,
                });
            }
        }
        sample
    }

    /// Topic counts per category and bucket.
    pub fn category_stats(&self) -> BTreeMap<String, CategoryStats> {
        self.categories
            .iter()
            .map(|c| {
                let stats = CategoryStats {
                    beginner: c.beginner.len(),
                    intermediate: c.intermediate.len(),
                    advanced: c.advanced.len(),
                    total: c.total(),
                };
                (c.category.clone(), stats)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn small() -> TopicCatalog {
        TopicCatalog::default()
            .with_topics("Fitness", Difficulty::Beginner, ["Plank for 30 seconds", "Morning stretch"])
            .with_topics("Fitness", Difficulty::Advanced, ["Olympic lifting technique"])
            .with_topics("Sleep", Difficulty::Intermediate, ["Track your sleep cycles"])
    }

    #[test]
    fn test_builtin_bank() {
        let catalog = TopicCatalog::builtin();
        let stats = catalog.category_stats();
        assert_eq!(stats.len(), 10);
        assert_eq!(catalog.len(), 300);
        let nutrition = stats["Nutrition"];
        assert_eq!(nutrition.beginner, 10);
        assert_eq!(nutrition.total, 30);
        assert_eq!(catalog.categories().next(), Some("Nutrition"));
    }

    #[test]
    fn test_topics_for() {
        let catalog = small();
        assert_eq!(catalog.topics_for("Fitness", Some(Difficulty::Beginner)).len(), 2);
        assert_eq!(catalog.topics_for("Fitness", None).len(), 3);
        assert!(catalog.topics_for("Fitness", Some(Difficulty::Intermediate)).is_empty());
        assert!(catalog.topics_for("Astrology", None).is_empty());
        assert_eq!(catalog.topics_by_difficulty(Difficulty::Intermediate), vec!["Track your sleep cycles"]);
    }

    #[test]
    fn test_difficulty_of() {
        let catalog = small();
        assert_eq!(
            catalog.difficulty_of("Fitness", "Olympic lifting technique"),
            Some(Difficulty::Advanced)
        );
        assert_eq!(catalog.difficulty_of("Sleep", "Morning stretch"), None);
    }

    #[test]
    fn test_random_topic() {
        let catalog = small();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let topic = catalog.random_topic(Some("Fitness"), Some(Difficulty::Beginner), &mut rng);
            assert!(topic == "Plank for 30 seconds" || topic == "Morning stretch");
            let any = catalog.random_topic(None, None, &mut rng);
            assert!(catalog.entries().iter().any(|e| e.topic == any));
        }
    }

    #[test]
    fn test_random_topic_fallback() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(TopicCatalog::default().random_topic(None, None, &mut rng), FALLBACK_TOPIC);
        assert_eq!(small().random_topic(Some("Astrology"), None, &mut rng), FALLBACK_TOPIC);
        assert_eq!(
            small().random_topic(Some("Sleep"), Some(Difficulty::Advanced), &mut rng),
            FALLBACK_TOPIC
        );
    }

    #[test]
    fn test_search_case_insensitive() {
        let results = TopicCatalog::builtin().search("WATER");
        assert!(!results.is_empty());
        assert!(results.iter().all(|r| r.topic.to_lowercase().contains("water")));
        assert!(small().search("zzz").is_empty());
    }

    #[test]
    fn test_diverse_sample_distinct_pairs() {
        let catalog = TopicCatalog::builtin();
        let mut rng = StdRng::seed_from_u64(42);
        let sample = catalog.diverse_sample(8, &HashSet::new(), &mut rng);
        assert_eq!(sample.len(), 8);
        let pairs: HashSet<(String, Difficulty)> = sample
            .iter()
            .map(|e| (e.category.clone(), e.difficulty))
            .collect();
        assert_eq!(pairs.len(), 8);
    }

    #[test]
    fn test_diverse_sample_terminates_when_exhausted() {
        let catalog = small();
        let mut rng = StdRng::seed_from_u64(3);
        // Only three non-empty pairs exist.
        let sample = catalog.diverse_sample(50, &HashSet::new(), &mut rng);
        assert_eq!(sample.len(), 3);
    }

    #[test]
    fn test_diverse_sample_huge_count() {
        let mut rng = StdRng::seed_from_u64(9);
        let sample = TopicCatalog::builtin().diverse_sample(usize::MAX, &HashSet::new(), &mut rng);
        assert_eq!(sample.len(), 30);
        assert_eq!(small().diverse_sample(1usize << 42, &HashSet::new(), &mut rng).len(), 3);
    }

    #[test]
    fn test_diverse_sample_exclusion() {
        let catalog = small();
        let mut rng = StdRng::seed_from_u64(3);
        let exclude: HashSet<String> = ["Fitness".to_string()].into_iter().collect();
        let sample = catalog.diverse_sample(5, &exclude, &mut rng);
        assert!(sample.iter().all(|e| e.category == "Sleep"));

        let all: HashSet<String> = ["Fitness".to_string(), "Sleep".to_string()].into_iter().collect();
        assert_eq!(catalog.diverse_sample(5, &all, &mut rng).len(), 3);
    }

    #[test]
    fn test_load_and_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("topics.json");
        std::fs::write(
            &path,
            r#"[{"category": "Sleep", "beginner": ["Go to bed earlier"]}]"#,
        )
        .unwrap();
        let catalog = TopicCatalog::load(&path).unwrap();
        assert_eq!(catalog.len(), 1);

        let dup = r#"[{"category": "Sleep"}, {"category": "Sleep"}]"#;
        assert!(matches!(TopicCatalog::from_json(dup), Err(Error::Catalog(_))));

        let missing = dir.path().join("missing.json");
        assert_eq!(TopicCatalog::load_or_builtin(&missing).len(), 300);
    }
}
