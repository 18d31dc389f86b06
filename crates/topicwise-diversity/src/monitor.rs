//! Operator-facing recommendations for a diversity report.

use crate::types::DiversityReport;

/// Plain-language advice on score, category spread, volume and vocabulary.
pub fn monitor_recommendations(report: &DiversityReport) -> Vec<String> {
    let mut recs = Vec::new();

    let score = report.diversity.score;
    recs.push(
        if score < 0.6 {
            "Overall diversity is low - focus on more varied content across categories"
        } else if score < 0.8 {
            "Diversity is moderate - continue improving content variety"
        } else {
            "Excellent diversity - maintain current approach"
        }
        .to_string(),
    );

    if report.total_content > 0 {
        let used = report.category_usage.len();
        recs.push(if used < 5 {
            format!("Only {} categories used - expand to more health categories", used)
        } else if used < 8 {
            format!("Good category usage ({} categories) - consider adding more", used)
        } else {
            format!("Excellent category diversity ({} categories)", used)
        });
    }

    recs.push(
        match report.total_content {
            0 => "No content tracked - start generating diverse content",
            1..=4 => "Low content volume - increase generation frequency",
            5..=19 => "Good content volume - maintain current frequency",
            _ => "High content volume - ensure quality over quantity",
        }
        .to_string(),
    );

    if report.top_keywords.iter().take(3).any(|k| k.count > 3) {
        recs.push("Some keywords are overused - diversify topic vocabulary".to_string());
    }

    recs
}
