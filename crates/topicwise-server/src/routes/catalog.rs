//! Topic bank browsing.

use std::collections::HashSet;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use topicwise_core::Difficulty;

use super::{bad_request, Reply};
use crate::state::AppState;

const MAX_SAMPLE: usize = 50;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/catalog/search", get(search))
        .route("/catalog/stats", get(stats))
        .route("/catalog/sample", get(sample))
        .route("/catalog/random", get(random))
        .route("/catalog/topics", get(topics_by_difficulty))
}

#[derive(Deserialize)]
struct SearchQuery {
    q: String,
}

/// GET /api/catalog/search?q=
async fn search(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    if query.q.trim().is_empty() {
        return bad_request("q is required");
    }
    let results = state.selector.catalog().search(query.q.trim());
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "query": query.q,
            "count": results.len(),
            "results": results,
        })),
    )
}

/// GET /api/catalog/stats: topic counts per category and difficulty.
async fn stats(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let catalog = state.selector.catalog();
    Json(serde_json::json!({
        "totalTopics": catalog.len(),
        "categories": catalog.category_stats(),
    }))
}

#[derive(Deserialize)]
struct SampleQuery {
    count: Option<usize>,
    /// Comma-separated categories to leave out.
    exclude: Option<String>,
}

/// GET /api/catalog/sample?count=&exclude=: topics from distinct category/difficulty pairs.
async fn sample(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SampleQuery>,
) -> Reply {
    let count = query.count.unwrap_or(5);
    if count > MAX_SAMPLE {
        return bad_request(format!("count must be at most {}", MAX_SAMPLE));
    }
    let exclude: HashSet<String> = query
        .exclude
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();
    let mut rng = rand::thread_rng();
    let sample = state
        .selector
        .catalog()
        .diverse_sample(count, &exclude, &mut rng);
    (
        StatusCode::OK,
        Json(serde_json::json!({ "topics": sample })),
    )
}

#[derive(Deserialize)]
struct RandomQuery {
    category: Option<String>,
    difficulty: Option<Difficulty>,
}

/// GET /api/catalog/random?category=&difficulty=
async fn random(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RandomQuery>,
) -> Json<serde_json::Value> {
    let mut rng = rand::thread_rng();
    let topic = state.selector.catalog().random_topic(
        query.category.as_deref(),
        query.difficulty,
        &mut rng,
    );
    Json(serde_json::json!({ "topic": topic }))
}

#[derive(Deserialize)]
struct DifficultyQuery {
    difficulty: Difficulty,
}

/// GET /api/catalog/topics?difficulty=: every topic of one difficulty.
async fn topics_by_difficulty(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DifficultyQuery>,
) -> Json<serde_json::Value> {
    let topics = state.selector.catalog().topics_by_difficulty(query.difficulty);
    Json(serde_json::json!({
        "difficulty": query.difficulty,
        "count": topics.len(),
        "topics": topics,
    }))
}
