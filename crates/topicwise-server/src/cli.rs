//! Plain-text reports for the `report` and `calendar` subcommands, plus JSON export.

use std::fmt::Write;
use std::path::PathBuf;

use chrono::Utc;
use rand::Rng;
use tracing::info;

use topicwise_core::Result;
use topicwise_diversity::{monitor_recommendations, DiversityReport};
use topicwise_runtime::CalendarPlan;

use crate::state::AppState;

/// Diversity report for the last `days` days, with monitor recommendations.
pub fn diversity_report<R: Rng + ?Sized>(state: &AppState, days: i64, rng: &mut R) -> Result<String> {
    let report = state.engine.diversity_report(days, rng)?;
    Ok(render_report(&report))
}

/// Write the report, pattern analysis and next strategy to
/// `reports/diversity_report_<YYYYmmdd_HHMMSS>.json`.
pub fn export_report<R: Rng + ?Sized>(state: &AppState, days: i64, rng: &mut R) -> Result<PathBuf> {
    let report = state.engine.diversity_report(days, rng)?;
    let patterns = state.selector.analyze_patterns(days)?;
    let strategy = state.selector.next_strategy(rng)?;
    let now = Utc::now();

    let export = serde_json::json!({
        "timestamp": now.to_rfc3339(),
        "report": report,
        "recommendations": monitor_recommendations(&report),
        "patterns": patterns,
        "strategy": strategy,
    });
    let path = state
        .config
        .data_paths
        .reports
        .join(format!("diversity_report_{}.json", now.format("%Y%m%d_%H%M%S")));
    std::fs::write(&path, serde_json::to_string_pretty(&export)?)?;
    info!("Exported diversity report to {}", path.display());
    Ok(path)
}

pub fn render_report(report: &DiversityReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Content diversity report ({} days)", report.period_days);
    let _ = writeln!(out, "{}", "=".repeat(40));
    let _ = writeln!(out, "Total content:        {}", report.total_content);
    let _ = writeln!(out, "Diversity score:      {:.3}", report.diversity.score);
    let _ = writeln!(out, "Category diversity:   {:.3}", report.diversity.category_diversity);
    let _ = writeln!(out, "Topic diversity:      {:.3}", report.diversity.topic_diversity);
    let _ = writeln!(
        out,
        "Categories used:      {}/{}",
        report.diversity.categories_used, report.diversity.total_categories
    );
    let _ = writeln!(out, "Suggested next:       {}", report.suggested_next_category);

    if !report.category_usage.is_empty() {
        let _ = writeln!(out, "\nCategory usage:");
        for (category, count) in &report.category_usage {
            let _ = writeln!(out, "  {:<20} {}", category, count);
        }
    }
    if !report.top_keywords.is_empty() {
        let _ = writeln!(out, "\nTop keywords:");
        for kw in &report.top_keywords {
            let _ = writeln!(out, "  {:<20} {}", kw.keyword, kw.count);
        }
    }
    if !report.least_used_categories.is_empty() {
        let _ = writeln!(
            out,
            "\nLeast used: {}",
            report.least_used_categories.join(", ")
        );
    }

    let _ = writeln!(out, "\nRecommendations:");
    for rec in monitor_recommendations(report) {
        let _ = writeln!(out, "  - {}", rec);
    }
    out
}

/// Calendar for the next `days` days.
pub fn calendar<R: Rng + ?Sized>(
    state: &AppState,
    days: usize,
    per_day: usize,
    rng: &mut R,
) -> Result<String> {
    let plan = state.calendar.generate(days, per_day, rng)?;
    let recommendations = state.calendar.recommendations(&plan);
    Ok(render_calendar(&plan, &recommendations))
}

pub fn render_calendar(plan: &CalendarPlan, recommendations: &[String]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Content calendar: {} days, {} per day ({} pieces)",
        plan.planning_days, plan.content_per_day, plan.total_content_pieces
    );
    for day in &plan.daily_schedule {
        let _ = writeln!(out, "\n{} {}", day.date, day.day_of_week);
        for piece in &day.content_pieces {
            let _ = writeln!(
                out,
                "  {}. [{}/{}] {} (confidence {:.2}, diversity {:.2})",
                piece.index,
                piece.category,
                piece.difficulty,
                piece.topic,
                piece.confidence,
                piece.diversity_score
            );
        }
    }

    let metrics = &plan.diversity_metrics;
    let rotation = &plan.category_rotation;
    let _ = writeln!(out, "\nOverall diversity:    {:.3}", metrics.overall_diversity);
    let _ = writeln!(out, "Rotation efficiency:  {:.3}", rotation.rotation_efficiency);
    let _ = writeln!(out, "Category balance:     {:.3}", rotation.category_balance);
    for rec in recommendations {
        let _ = writeln!(out, "  - {}", rec);
    }
    out
}
