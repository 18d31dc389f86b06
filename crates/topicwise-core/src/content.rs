//! Tracked content records and difficulty levels.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Topic complexity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Self::Beginner, Self::Intermediate, Self::Advanced];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Beginner
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            other => Err(Error::Config(format!("unknown difficulty: {}", other))),
        }
    }
}

/// A piece of generated content, tracked once it is accepted.
///
/// Records are append-only: nothing in this workspace mutates or deletes one
/// after it has been stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRecord {
    pub title: String,
    pub topic: String,
    pub category: String,
    pub difficulty: Difficulty,
    /// Keywords extracted from `topic` at creation time.
    pub topic_keywords: BTreeSet<String>,
    pub generated_at: DateTime<Utc>,
    pub unique_id: String,
}

impl ContentRecord {
    /// Build a record from a request plus the keywords derived from its topic.
    pub fn new(content: NewContent, topic_keywords: BTreeSet<String>) -> Self {
        let unique_id = content.unique_id.unwrap_or_else(short_unique_id);
        Self {
            title: content.title,
            topic: content.topic,
            category: content.category,
            difficulty: content.difficulty,
            topic_keywords,
            generated_at: content.generated_at.unwrap_or_else(Utc::now),
            unique_id,
        }
    }

    /// Whether the record falls inside the trailing `days` window ending at `now`.
    ///
    /// Records stamped after `now` are outside every window.
    pub fn is_within(&self, days: i64, now: DateTime<Utc>) -> bool {
        self.generated_at >= window_start(days, now) && self.generated_at <= now
    }
}

/// Request to track a newly accepted piece of content.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewContent {
    pub title: String,
    pub topic: String,
    pub category: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    /// Explicit id; a short random id is assigned when absent.
    #[serde(default)]
    pub unique_id: Option<String>,
    /// Explicit timestamp for programmatic imports; defaults to now.
    /// Never taken from deserialized input.
    #[serde(skip_deserializing)]
    pub generated_at: Option<DateTime<Utc>>,
}

impl NewContent {
    pub fn new(
        title: impl Into<String>,
        topic: impl Into<String>,
        category: impl Into<String>,
        difficulty: Difficulty,
    ) -> Self {
        Self {
            title: title.into(),
            topic: topic.into(),
            category: category.into(),
            difficulty,
            unique_id: None,
            generated_at: None,
        }
    }

    pub fn generated_at(mut self, at: DateTime<Utc>) -> Self {
        self.generated_at = Some(at);
        self
    }

    pub fn unique_id(mut self, id: impl Into<String>) -> Self {
        self.unique_id = Some(id.into());
        self
    }
}

/// Start of the trailing `days` window ending at `now`.
pub fn window_start(days: i64, now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::days(days.max(0))
}

fn short_unique_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..8].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_parse() {
        assert_eq!("Advanced".parse::<Difficulty>().unwrap(), Difficulty::Advanced);
        assert!("expert".parse::<Difficulty>().is_err());
        assert_eq!(Difficulty::Intermediate.to_string(), "intermediate");
    }

    #[test]
    fn test_difficulty_serde() {
        let json = serde_json::to_string(&Difficulty::Beginner).unwrap();
        assert_eq!(json, "\"beginner\"");
    }

    #[test]
    fn test_record_assigns_id_and_timestamp() {
        let record = ContentRecord::new(
            NewContent::new("Title", "topic", "Sleep", Difficulty::Beginner),
            BTreeSet::new(),
        );
        assert_eq!(record.unique_id.len(), 8);
        assert!(record.is_within(1, Utc::now()));
    }

    #[test]
    fn test_record_window() {
        let now = Utc::now();
        let record = ContentRecord::new(
            NewContent::new("Title", "topic", "Sleep", Difficulty::Beginner)
                .generated_at(now - Duration::days(10))
                .unique_id("abc"),
            BTreeSet::new(),
        );
        assert_eq!(record.unique_id, "abc");
        assert!(record.is_within(30, now));
        assert!(!record.is_within(7, now));
    }

    #[test]
    fn test_future_record_outside_every_window() {
        let now = Utc::now();
        let record = ContentRecord::new(
            NewContent::new("Title", "topic", "Sleep", Difficulty::Beginner)
                .generated_at(now + Duration::days(365 * 50)),
            BTreeSet::new(),
        );
        assert!(!record.is_within(1, now));
        assert!(!record.is_within(30, now));
    }

    #[test]
    fn test_new_content_ignores_client_timestamp() {
        let content: NewContent = serde_json::from_str(
            r#"{"title":"t","topic":"nap","category":"Sleep","generated_at":"2075-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert!(content.generated_at.is_none());
        assert_eq!(content.difficulty, Difficulty::Beginner);
    }
}
