//! Stats and server info routes.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use topicwise_store::HistoryStats;

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/stats", get(get_stats))
}

/// GET /api/stats: history and catalog statistics.
async fn get_stats(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let history = state.history.stats().unwrap_or(HistoryStats {
        total_records: 0,
        backend: "sqlite",
        db_path: None,
        db_size_mb: None,
    });
    let catalog = state.selector.catalog();

    Json(serde_json::json!({
        "history": history,
        "catalog": {
            "topics": catalog.len(),
            "categories": catalog.categories().count(),
        },
        "categories": state.engine.categories().len(),
        "lookbackDays": state.config.diversity.lookback_days,
        "port": state.config.port,
        "serverTime": chrono::Utc::now().to_rfc3339(),
    }))
}
