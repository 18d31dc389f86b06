//! HTTP route handlers for the reporting API.

pub mod calendar;
pub mod catalog;
pub mod diversity;
pub mod history;
pub mod selection;
pub mod stats;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the main Axum router with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api", api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(stats::routes())
        .merge(history::routes())
        .merge(selection::routes())
        .merge(diversity::routes())
        .merge(calendar::routes())
        .merge(catalog::routes())
}

type Reply = (StatusCode, Json<serde_json::Value>);

/// Serialize a successful result, or map the error to a status code.
fn reply<T: Serialize>(result: topicwise_core::Result<T>) -> Reply {
    match result.and_then(|v| Ok(serde_json::to_value(v)?)) {
        Ok(value) => (StatusCode::OK, Json(value)),
        Err(e) => error_reply(e),
    }
}

fn error_reply(e: topicwise_core::Error) -> Reply {
    use topicwise_core::Error;

    let status = match &e {
        Error::NotFound(_) => StatusCode::NOT_FOUND,
        Error::DuplicateContent(_) => StatusCode::CONFLICT,
        Error::Config(_) | Error::Catalog(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(serde_json::json!({ "error": e.to_string() })))
}

fn bad_request(message: impl Into<String>) -> Reply {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "error": message.into() })),
    )
}
