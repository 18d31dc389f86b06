//! In-memory history for tests and embedders without a database.

use chrono::Utc;
use parking_lot::RwLock;
use topicwise_core::{ContentRecord, Error, NewContent, Result};
use topicwise_extract::extract_keywords;
use tracing::debug;

use crate::history::ContentHistoryStore;

/// Vector-backed history guarded by a read/write lock.
#[derive(Debug, Default)]
pub struct MemoryHistory {
    records: RwLock<Vec<ContentRecord>>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ContentHistoryStore for MemoryHistory {
    fn recent(&self, days: i64) -> Result<Vec<ContentRecord>> {
        let now = Utc::now();
        Ok(self
            .records
            .read()
            .iter()
            .filter(|r| r.is_within(days, now))
            .cloned()
            .collect())
    }

    fn record(&self, content: NewContent) -> Result<ContentRecord> {
        let keywords = extract_keywords(&content.topic);
        let record = ContentRecord::new(content, keywords);

        let mut records = self.records.write();
        if records.iter().any(|r| r.unique_id == record.unique_id) {
            return Err(Error::DuplicateContent(record.unique_id));
        }
        debug!(
            "Tracked content {} ({}, {})",
            record.unique_id, record.category, record.difficulty
        );
        records.push(record.clone());
        Ok(record)
    }

    fn count(&self) -> Result<usize> {
        Ok(self.records.read().len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use topicwise_core::Difficulty;

    #[test]
    fn test_record_derives_keywords() {
        let store = MemoryHistory::new();
        let record = store
            .record(NewContent::new(
                "Lemon water",
                "Drink lemon water for energy",
                "Hydration",
                Difficulty::Beginner,
            ))
            .unwrap();
        assert!(record.topic_keywords.contains("lemon"));
        assert!(!record.topic_keywords.contains("for"));
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_duplicate_unique_id() {
        let store = MemoryHistory::new();
        let content = NewContent::new("a", "b", "Sleep", Difficulty::Beginner).unique_id("same");
        store.record(content.clone()).unwrap();
        assert!(matches!(
            store.record(content),
            Err(Error::DuplicateContent(id)) if id == "same"
        ));
    }

    #[test]
    fn test_recent_window_and_usage() {
        let store = MemoryHistory::new();
        let now = Utc::now();
        for (days_ago, category) in [(0, "Sleep"), (5, "Sleep"), (40, "Sleep"), (1, "Fitness")] {
            store
                .record(
                    NewContent::new("t", "topic", category, Difficulty::Beginner)
                        .generated_at(now - Duration::days(days_ago)),
                )
                .unwrap();
        }
        assert_eq!(store.recent(30).unwrap().len(), 3);
        assert_eq!(store.usage_count("Sleep", 30).unwrap(), 2);
        assert_eq!(store.usage_count("Sleep", 3).unwrap(), 1);
        assert_eq!(store.least_used_categories(30, 5).unwrap(), vec!["Fitness", "Sleep"]);
        assert_eq!(store.count().unwrap(), 4);
    }
}
