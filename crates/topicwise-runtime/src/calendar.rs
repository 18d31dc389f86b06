//! Multi-day content planning with rotation and diversity metrics.

use std::collections::{BTreeMap, HashSet};

use chrono::{Duration, NaiveDate, Utc};
use rand::Rng;
use tracing::info;

use topicwise_core::{ContentRecord, Difficulty, Result};
use topicwise_extract::{extract_keywords, jaccard, pairwise_diversity};
use topicwise_select::TopicSelector;

use crate::types::*;

/// Below this share of defined categories the plan is called narrow.
const MIN_CATEGORY_SHARE: f64 = 0.5;
/// Average piece diversity below this asks for more varied topics.
const MIN_AVG_DIVERSITY: f64 = 0.6;
/// Beginner share above this asks for harder content.
const MAX_BEGINNER_SHARE: f64 = 0.7;

/// Plans content days ahead by running the selector once per slot.
#[derive(Clone)]
pub struct ContentCalendar {
    selector: TopicSelector,
}

impl ContentCalendar {
    pub fn new(selector: TopicSelector) -> Self {
        Self { selector }
    }

    /// Plan `days` days starting today with `content_per_day` pieces each.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        days: usize,
        content_per_day: usize,
        rng: &mut R,
    ) -> Result<CalendarPlan> {
        let records = self.selector.engine().lookback()?;
        let start = Utc::now().date_naive();

        let mut daily_schedule = Vec::new();
        for offset in 0..days {
            let date = start + Duration::days(offset as i64);
            let mut content_pieces = Vec::new();
            for index in 1..=content_per_day {
                let pick = self.selector.select_from(&records, None, None, true, rng)?;
                let diversity_score = piece_diversity(&records, &pick.topic);
                content_pieces.push(CalendarPiece {
                    index,
                    topic: pick.topic,
                    category: pick.category,
                    difficulty: pick.difficulty,
                    confidence: pick.confidence,
                    diversity_score,
                });
            }
            daily_schedule.push(CalendarDay {
                date,
                day_of_week: weekday_name(date),
                content_pieces,
            });
        }

        let plan = self.with_metrics(days, content_per_day, daily_schedule);
        info!(
            "Planned {} days x {}: rotation={:.2}, diversity={:.2}",
            days,
            content_per_day,
            plan.category_rotation.rotation_efficiency,
            plan.diversity_metrics.overall_diversity
        );
        Ok(plan)
    }

    fn with_metrics(&self, days: usize, content_per_day: usize, daily_schedule: Vec<CalendarDay>) -> CalendarPlan {
        let category_rotation = analyze_rotation(&daily_schedule);
        let diversity_metrics = self.diversity_of(&daily_schedule);
        CalendarPlan {
            planning_days: days,
            content_per_day,
            total_content_pieces: days.saturating_mul(content_per_day),
            daily_schedule,
            category_rotation,
            diversity_metrics,
        }
    }

    /// Category distribution, sequence, rotation efficiency and balance.
    pub fn analyze_rotation(&self, plan: &CalendarPlan) -> RotationAnalysis {
        analyze_rotation(&plan.daily_schedule)
    }

    /// Pairwise topic diversity and category spread of the planned pieces.
    pub fn calendar_diversity(&self, plan: &CalendarPlan) -> CalendarDiversity {
        self.diversity_of(&plan.daily_schedule)
    }

    fn diversity_of(&self, days: &[CalendarDay]) -> CalendarDiversity {
        let pieces: Vec<&CalendarPiece> = days.iter().flat_map(|d| &d.content_pieces).collect();
        let topics: Vec<&str> = pieces.iter().map(|p| p.topic.as_str()).collect();
        let unique: HashSet<&str> = pieces.iter().map(|p| p.category.as_str()).collect();

        let total = self.selector.engine().categories().len();
        let topic_diversity = pairwise_diversity(&topics);
        let category_diversity = if total == 0 {
            0.0
        } else {
            unique.len() as f64 / total as f64
        };
        CalendarDiversity {
            topic_diversity,
            category_diversity,
            overall_diversity: (topic_diversity + category_diversity) / 2.0,
            total_topics: topics.len(),
            unique_categories: unique.len(),
        }
    }

    /// Reorder each day's pieces by descending diversity and recompute metrics.
    ///
    /// Days keep their order; ties keep their original slot order.
    pub fn optimize(&self, plan: CalendarPlan) -> CalendarPlan {
        let CalendarPlan {
            planning_days,
            content_per_day,
            mut daily_schedule,
            ..
        } = plan;
        for day in &mut daily_schedule {
            day.content_pieces
                .sort_by(|a, b| b.diversity_score.total_cmp(&a.diversity_score));
        }
        self.with_metrics(planning_days, content_per_day, daily_schedule)
    }

    /// Threshold advice on category spread, piece diversity and difficulty mix.
    pub fn recommendations(&self, plan: &CalendarPlan) -> Vec<String> {
        let pieces: Vec<&CalendarPiece> = plan.pieces().collect();
        let categories: Vec<&str> = pieces.iter().map(|p| p.category.as_str()).collect();
        let difficulties: Vec<Difficulty> = pieces.iter().map(|p| p.difficulty).collect();
        let scores: Vec<f64> = pieces.iter().map(|p| p.diversity_score).collect();
        self.recommend(&categories, &difficulties, &scores)
    }

    fn recommend(&self, categories: &[&str], difficulties: &[Difficulty], scores: &[f64]) -> Vec<String> {
        let mut recs = Vec::new();
        if scores.is_empty() {
            return recs;
        }

        let unique: HashSet<&str> = categories.iter().copied().collect();
        let total = self.selector.engine().categories().len() as f64;
        if (unique.len() as f64) < total * MIN_CATEGORY_SHARE {
            recs.push("Consider diversifying across more health categories".to_string());
        }

        let avg = scores.iter().sum::<f64>() / scores.len() as f64;
        if avg < MIN_AVG_DIVERSITY {
            recs.push("Content diversity could be improved - consider more varied topics".to_string());
        }

        let beginner = difficulties
            .iter()
            .filter(|d| **d == Difficulty::Beginner)
            .count();
        if beginner as f64 > difficulties.len() as f64 * MAX_BEGINNER_SHARE {
            recs.push("Consider adding more intermediate and advanced content".to_string());
        }
        recs
    }

    /// One recommended piece per day for the next `days` days.
    pub fn schedule<R: Rng + ?Sized>(&self, days: usize, rng: &mut R) -> Result<Vec<ScheduleEntry>> {
        let plan = self.generate(days, 1, rng)?;
        Ok(schedule_entries(&plan))
    }

    /// Schedule, history report, strategy and calendar advice in one view.
    pub fn content_recommendations<R: Rng + ?Sized>(
        &self,
        look_ahead_days: usize,
        rng: &mut R,
    ) -> Result<ContentRecommendations> {
        let plan = self.generate(look_ahead_days, 1, rng)?;
        let engine = self.selector.engine();
        let diversity_analysis = engine.diversity_report(engine.config().lookback_days, rng)?;
        let strategy = self.selector.next_strategy(rng)?;

        Ok(ContentRecommendations {
            current_date: Utc::now().date_naive(),
            look_ahead_days,
            content_schedule: schedule_entries(&plan),
            diversity_analysis,
            strategy,
            recommendations: self.recommendations(&plan),
        })
    }
}

fn schedule_entries(plan: &CalendarPlan) -> Vec<ScheduleEntry> {
    plan.daily_schedule
        .iter()
        .filter_map(|day| {
            day.content_pieces.first().map(|piece| ScheduleEntry {
                date: day.date,
                day_of_week: day.day_of_week.clone(),
                recommended_topic: piece.topic.clone(),
                recommended_category: piece.category.clone(),
                recommended_difficulty: piece.difficulty,
                diversity_score: piece.diversity_score,
                confidence: piece.confidence,
            })
        })
        .collect()
}

fn analyze_rotation(days: &[CalendarDay]) -> RotationAnalysis {
    let category_sequence: Vec<String> = days
        .iter()
        .flat_map(|d| d.content_pieces.iter().map(|p| p.category.clone()))
        .collect();
    let mut category_distribution = BTreeMap::new();
    for category in &category_sequence {
        *category_distribution.entry(category.clone()).or_insert(0) += 1;
    }
    RotationAnalysis {
        rotation_efficiency: rotation_efficiency(&category_sequence),
        category_balance: category_balance(&category_distribution),
        category_distribution,
        category_sequence,
    }
}

/// `1 - repeats / (len - 1)`, where a repeat is a slot with the same
/// category as the slot before it. 1.0 for fewer than two slots.
pub fn rotation_efficiency<S: AsRef<str>>(sequence: &[S]) -> f64 {
    if sequence.len() < 2 {
        return 1.0;
    }
    let repeats = sequence
        .windows(2)
        .filter(|w| w[0].as_ref() == w[1].as_ref())
        .count();
    1.0 - repeats as f64 / (sequence.len() - 1) as f64
}

/// `1 - (max - min) / max` over category counts; 1.0 with no usage.
pub fn category_balance(usage: &BTreeMap<String, usize>) -> f64 {
    let max = usage.values().copied().max().unwrap_or(0);
    let min = usage.values().copied().min().unwrap_or(0);
    if max == 0 {
        return 1.0;
    }
    1.0 - (max - min) as f64 / max as f64
}

fn piece_diversity(records: &[ContentRecord], topic: &str) -> f64 {
    let keywords = extract_keywords(topic);
    let max = records
        .iter()
        .map(|r| jaccard(&keywords, &r.topic_keywords))
        .fold(0.0, f64::max);
    1.0 - max
}

fn weekday_name(date: NaiveDate) -> String {
    date.format("%A").to_string()
}
