//! Runtime types.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use topicwise_core::{ContentRecord, Difficulty};
use topicwise_diversity::DiversityReport;
use topicwise_select::{ContentStrategy, ValidationResult};

// ---------- calendar ----------

/// One planned piece of content.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarPiece {
    /// 1-based slot within the day.
    pub index: usize,
    pub topic: String,
    pub category: String,
    pub difficulty: Difficulty,
    pub confidence: f64,
    /// `1 - max similarity` to the lookback window.
    pub diversity_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub day_of_week: String,
    pub content_pieces: Vec<CalendarPiece>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RotationAnalysis {
    pub category_distribution: BTreeMap<String, usize>,
    pub category_sequence: Vec<String>,
    pub rotation_efficiency: f64,
    pub category_balance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CalendarDiversity {
    pub topic_diversity: f64,
    pub category_diversity: f64,
    pub overall_diversity: f64,
    pub total_topics: usize,
    pub unique_categories: usize,
}

/// A multi-day plan with its rotation and diversity metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarPlan {
    pub planning_days: usize,
    pub content_per_day: usize,
    pub total_content_pieces: usize,
    pub daily_schedule: Vec<CalendarDay>,
    pub category_rotation: RotationAnalysis,
    pub diversity_metrics: CalendarDiversity,
}

impl CalendarPlan {
    pub fn pieces(&self) -> impl Iterator<Item = &CalendarPiece> {
        self.daily_schedule.iter().flat_map(|d| d.content_pieces.iter())
    }
}

/// Single-piece daily recommendation.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleEntry {
    pub date: NaiveDate,
    pub day_of_week: String,
    pub recommended_topic: String,
    pub recommended_category: String,
    pub recommended_difficulty: Difficulty,
    pub diversity_score: f64,
    pub confidence: f64,
}

/// Look-ahead schedule combined with history analysis.
#[derive(Debug, Clone, Serialize)]
pub struct ContentRecommendations {
    pub current_date: NaiveDate,
    pub look_ahead_days: usize,
    pub content_schedule: Vec<ScheduleEntry>,
    pub diversity_analysis: DiversityReport,
    pub strategy: ContentStrategy,
    pub recommendations: Vec<String>,
}

// ---------- pipeline ----------

/// What the generator is asked to write about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub topic: String,
    pub category: String,
    pub difficulty: Difficulty,
}

/// Binary output of a generator, e.g. a rendered clip.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// A generated content package.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentPackage {
    pub title: String,
    pub body: String,
    pub artifacts: Vec<Artifact>,
}

/// Where an artifact ended up.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredArtifact {
    pub sink: String,
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStatus {
    Published,
    Rejected,
}

/// Result of one pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineRun {
    pub status: PipelineStatus,
    pub request: GenerationRequest,
    pub title: String,
    pub validation: ValidationResult,
    pub stored: Vec<StoredArtifact>,
    /// The tracked history record; `None` when rejected.
    pub record: Option<ContentRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchFailure {
    pub topic: String,
    pub category: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub runs: Vec<PipelineRun>,
    pub failures: Vec<BatchFailure>,
}
