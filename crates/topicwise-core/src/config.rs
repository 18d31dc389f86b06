//! Configuration and data directory management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Paths to all Topicwise data directories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPaths {
    /// Root data directory (e.g., `data/`).
    pub root: PathBuf,
    /// Content history database directory (`data/history/`).
    pub history: PathBuf,
    /// Exported diversity reports (`data/reports/`).
    pub reports: PathBuf,
    /// Threshold overrides (`data/diversity.json`).
    pub diversity_file: PathBuf,
    /// Optional topic bank override (`data/topics.json`).
    pub catalog_file: PathBuf,
}

impl DataPaths {
    /// Create data paths from a root directory. Creates directories if needed.
    pub fn new(root: impl AsRef<Path>) -> std::io::Result<Self> {
        let root = root.as_ref().to_path_buf();
        let paths = Self {
            history: root.join("history"),
            reports: root.join("reports"),
            diversity_file: root.join("diversity.json"),
            catalog_file: root.join("topics.json"),
            root,
        };
        paths.ensure_dirs()?;
        Ok(paths)
    }

    fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.history)?;
        std::fs::create_dir_all(&self.reports)?;
        Ok(())
    }
}

/// Thresholds and windows used by the diversity, selection and validation code.
///
/// The defaults were tuned by hand against the health topic bank; every field
/// can be overridden from `diversity.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiversityConfig {
    /// Lookback window for history statistics, in days.
    pub lookback_days: i64,
    /// Categories used within this many days are excluded from suggestions.
    pub recent_category_days: i64,
    /// Maximum recency bonus added to a category's base weight.
    pub usage_bonus_cap: u32,
    /// Default threshold for `find_similar`.
    pub similar_threshold: f64,
    /// Topic pairs at or above this similarity count as repeats.
    pub topic_similarity_threshold: f64,
    /// Title pairs at or above this similarity count as repeats.
    pub title_similarity_threshold: f64,
    /// Any use of a category within this many days is a repetition.
    pub category_repetition_days: i64,
    /// More than this many uses in the lookback window is a repetition.
    pub max_category_uses: usize,
    /// A keyword found in more than this many history records is overused.
    pub max_keyword_uses: usize,
    /// Diversity scores above this value are accepted.
    pub diversity_threshold: f64,
    /// Starting confidence for a topic selection.
    pub base_confidence: f64,
    /// Number of keywords listed in reports.
    pub top_keywords: usize,
}

impl Default for DiversityConfig {
    fn default() -> Self {
        Self {
            lookback_days: 30,
            recent_category_days: 7,
            usage_bonus_cap: 10,
            similar_threshold: 0.3,
            topic_similarity_threshold: 0.4,
            title_similarity_threshold: 0.3,
            category_repetition_days: 3,
            max_category_uses: 2,
            max_keyword_uses: 2,
            diversity_threshold: 0.6,
            base_confidence: 0.8,
            top_keywords: 10,
        }
    }
}

impl DiversityConfig {
    /// Load overrides from a JSON file, falling back to defaults.
    pub fn load(path: &Path) -> Self {
        let Ok(data) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        match serde_json::from_str(&data) {
            Ok(config) => {
                info!("Loaded diversity config from {}", path.display());
                config
            }
            Err(e) => {
                warn!("Ignoring malformed {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

/// Top-level Topicwise configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicwiseConfig {
    /// HTTP server port.
    pub port: u16,
    /// Data directory paths.
    pub data_paths: DataPaths,
    /// Diversity thresholds.
    pub diversity: DiversityConfig,
}

impl TopicwiseConfig {
    /// Create configuration from environment and defaults.
    pub fn from_env(data_dir: impl AsRef<Path>) -> std::io::Result<Self> {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3010);

        let data_paths = DataPaths::new(data_dir)?;
        let diversity = DiversityConfig::load(&data_paths.diversity_file);

        Ok(Self {
            port,
            data_paths,
            diversity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_paths_created() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DataPaths::new(dir.path()).unwrap();
        assert!(paths.history.is_dir());
        assert!(paths.reports.is_dir());
        assert!(!paths.diversity_file.exists());
    }

    #[test]
    fn test_partial_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("diversity.json");
        std::fs::write(&path, r#"{"lookback_days": 14}"#).unwrap();
        let config = DiversityConfig::load(&path);
        assert_eq!(config.lookback_days, 14);
        assert_eq!(config.topic_similarity_threshold, 0.4);
    }

    #[test]
    fn test_malformed_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("diversity.json");
        std::fs::write(&path, "not json").unwrap();
        assert_eq!(DiversityConfig::load(&path), DiversityConfig::default());
    }
}
