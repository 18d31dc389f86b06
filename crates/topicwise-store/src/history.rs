//! The history interface every diversity computation reads from.

use std::collections::HashMap;

use serde::Serialize;
use topicwise_core::{ContentRecord, NewContent, Result};

/// Append-only store of accepted content.
///
/// `recent` must return a point-in-time view: callers fetch one window per
/// top-level operation and compute everything else from that snapshot.
pub trait ContentHistoryStore: Send + Sync {
    /// All records generated within the trailing `days` window, in any order.
    fn recent(&self, days: i64) -> Result<Vec<ContentRecord>>;

    /// Track a newly accepted piece of content.
    fn record(&self, content: NewContent) -> Result<ContentRecord>;

    /// Total number of tracked records.
    fn count(&self) -> Result<usize>;

    /// Uses of `category` within the trailing `days` window.
    fn usage_count(&self, category: &str, days: i64) -> Result<usize> {
        Ok(self
            .recent(days)?
            .iter()
            .filter(|r| r.category == category)
            .count())
    }

    /// Categories seen in the window, least used first.
    fn least_used_categories(&self, days: i64, limit: usize) -> Result<Vec<String>> {
        Ok(least_used(&self.recent(days)?, limit))
    }
}

/// Sort the categories present in `records` by ascending usage, ties by name.
pub fn least_used(records: &[ContentRecord], limit: usize) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in records {
        *counts.entry(record.category.as_str()).or_insert(0) += 1;
    }
    let mut sorted: Vec<(&str, usize)> = counts.into_iter().collect();
    sorted.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)));
    sorted
        .into_iter()
        .take(limit)
        .map(|(c, _)| c.to_string())
        .collect()
}

/// Store-level statistics.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryStats {
    pub total_records: usize,
    pub backend: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_size_mb: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use topicwise_core::Difficulty;

    fn record(category: &str) -> ContentRecord {
        ContentRecord::new(
            NewContent::new("t", "topic", category, Difficulty::Beginner),
            BTreeSet::new(),
        )
    }

    #[test]
    fn test_least_used_ordering() {
        let records = vec![
            record("Sleep"),
            record("Sleep"),
            record("Fitness"),
            record("Nutrition"),
            record("Nutrition"),
            record("Nutrition"),
        ];
        assert_eq!(least_used(&records, 5), vec!["Fitness", "Sleep", "Nutrition"]);
        assert_eq!(least_used(&records, 1), vec!["Fitness"]);
        assert!(least_used(&[], 5).is_empty());
    }
}
