//! Category weights, diversity scores and reports.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use serde::Deserialize;

use topicwise_diversity::monitor_recommendations;

use super::history::DaysQuery;
use super::reply;
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/weights", get(get_weights))
        .route("/diversity", get(get_diversity))
        .route("/report", get(get_report))
        .route("/similar", get(get_similar))
}

/// GET /api/weights: current selection weight per category.
async fn get_weights(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    reply(
        state
            .engine
            .category_weights()
            .map(|weights| serde_json::json!({ "weights": weights })),
    )
}

/// GET /api/diversity?days=
async fn get_diversity(
    State(state): State<Arc<AppState>>,
    Query(q): Query<DaysQuery>,
) -> impl IntoResponse {
    let days = q.days.unwrap_or(state.config.diversity.lookback_days);
    reply(state.engine.diversity_score(days))
}

/// GET /api/report?days=: diversity report plus monitor recommendations.
async fn get_report(
    State(state): State<Arc<AppState>>,
    Query(q): Query<DaysQuery>,
) -> impl IntoResponse {
    let days = q.days.unwrap_or(state.config.diversity.lookback_days);
    let mut rng = rand::thread_rng();
    reply(state.engine.diversity_report(days, &mut rng).map(|report| {
        let recommendations = monitor_recommendations(&report);
        serde_json::json!({
            "report": report,
            "recommendations": recommendations,
        })
    }))
}

#[derive(Deserialize)]
struct SimilarQuery {
    topic: String,
    threshold: Option<f64>,
}

/// GET /api/similar?topic=&threshold=: history records resembling a topic.
async fn get_similar(
    State(state): State<Arc<AppState>>,
    Query(q): Query<SimilarQuery>,
) -> impl IntoResponse {
    let threshold = q
        .threshold
        .unwrap_or(state.config.diversity.similar_threshold);
    reply(state.engine.find_similar(&q.topic, threshold).map(|records| {
        serde_json::json!({
            "topic": q.topic,
            "threshold": threshold,
            "matches": records,
        })
    }))
}
