//! Content history routes: list recent records, track new ones.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::info;

use topicwise_core::NewContent;
use topicwise_store::ContentHistoryStore;

use super::{bad_request, error_reply, reply};
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/history", get(list_history).post(track_content))
        .route("/history/{id}", get(get_record))
}

#[derive(Deserialize)]
pub struct DaysQuery {
    pub days: Option<i64>,
}

/// GET /api/history?days=: records in the trailing window, newest first.
async fn list_history(
    State(state): State<Arc<AppState>>,
    Query(q): Query<DaysQuery>,
) -> impl IntoResponse {
    let days = q.days.unwrap_or(state.config.diversity.lookback_days);
    reply(state.history.recent(days).map(|mut records| {
        records.sort_by(|a, b| b.generated_at.cmp(&a.generated_at));
        serde_json::json!({
            "days": days,
            "count": records.len(),
            "records": records,
        })
    }))
}

/// POST /api/history: track a piece of accepted content.
async fn track_content(
    State(state): State<Arc<AppState>>,
    Json(content): Json<NewContent>,
) -> impl IntoResponse {
    if content.topic.trim().is_empty() {
        return bad_request("topic is required");
    }
    if !state.engine.categories().contains(&content.category) {
        return bad_request(format!("unknown category: {}", content.category));
    }

    match state.history.record(content) {
        Ok(record) => {
            info!("Tracked '{}' ({})", record.topic, record.category);
            match serde_json::to_value(&record) {
                Ok(value) => (StatusCode::CREATED, Json(value)),
                Err(e) => error_reply(e.into()),
            }
        }
        Err(e) => error_reply(e),
    }
}

/// GET /api/history/{id}
async fn get_record(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.history.get(&id) {
        Ok(Some(record)) => reply(Ok(record)),
        Ok(None) => error_reply(topicwise_core::Error::NotFound(format!("content {}", id))),
        Err(e) => error_reply(e),
    }
}
