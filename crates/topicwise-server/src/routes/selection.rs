//! Topic selection, suggestion, validation and strategy routes.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::info;

use topicwise_core::Difficulty;

use super::history::DaysQuery;
use super::{bad_request, reply};
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/select", post(select_topic))
        .route("/suggest", post(suggest_topics))
        .route("/validate", post(validate_topic))
        .route("/patterns", get(get_patterns))
        .route("/strategy", get(get_strategy))
}

fn default_true() -> bool {
    true
}

#[derive(Deserialize)]
struct SelectRequest {
    category: Option<String>,
    difficulty: Option<Difficulty>,
    #[serde(default = "default_true")]
    exclude_recent: bool,
}

/// POST /api/select: pick one topic.
async fn select_topic(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SelectRequest>,
) -> impl IntoResponse {
    let mut rng = rand::thread_rng();
    let result = state.selector.select(
        req.category.as_deref(),
        req.difficulty,
        req.exclude_recent,
        &mut rng,
    );
    if let Ok(pick) = &result {
        info!(
            "Selected '{}' ({}, confidence {:.2})",
            pick.topic, pick.category, pick.confidence
        );
    }
    reply(result)
}

#[derive(Deserialize)]
struct SuggestRequest {
    #[serde(default = "default_count")]
    count: usize,
    categories: Option<Vec<String>>,
}

fn default_count() -> usize {
    5
}

const MAX_SUGGESTIONS: usize = 50;

/// POST /api/suggest: several distinct suggestions, best first.
async fn suggest_topics(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SuggestRequest>,
) -> impl IntoResponse {
    if req.count > MAX_SUGGESTIONS {
        return bad_request(format!("count must be at most {}", MAX_SUGGESTIONS));
    }
    let mut rng = rand::thread_rng();
    reply(
        state
            .selector
            .suggest(req.count, req.categories.as_deref(), &mut rng)
            .map(|suggestions| serde_json::json!({ "suggestions": suggestions })),
    )
}

#[derive(Deserialize)]
struct ValidateRequest {
    #[serde(default)]
    title: String,
    topic: String,
    category: Option<String>,
}

/// POST /api/validate: duplicate and diversity check for a proposed piece.
async fn validate_topic(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ValidateRequest>,
) -> impl IntoResponse {
    if req.topic.trim().is_empty() {
        return bad_request("topic is required");
    }
    let title = if req.title.is_empty() { &req.topic } else { &req.title };
    reply(
        state
            .validator
            .validate(title, &req.topic, req.category.as_deref()),
    )
}

/// GET /api/patterns?days=: distribution and keyword analysis.
async fn get_patterns(
    State(state): State<Arc<AppState>>,
    Query(q): Query<DaysQuery>,
) -> impl IntoResponse {
    let days = q.days.unwrap_or(state.config.diversity.lookback_days);
    reply(state.selector.analyze_patterns(days))
}

/// GET /api/strategy: recommended next category with topic suggestions.
async fn get_strategy(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut rng = rand::thread_rng();
    reply(state.selector.next_strategy(&mut rng))
}
