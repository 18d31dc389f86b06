//! Content calendar planning.

use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;

use super::{bad_request, reply};
use crate::state::AppState;

/// Longest plan the API will build in one request.
const MAX_PLANNING_DAYS: usize = 90;
const MAX_CONTENT_PER_DAY: usize = 10;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/calendar", post(plan_calendar))
        .route("/calendar/recommendations", post(content_recommendations))
}

#[derive(Deserialize)]
struct CalendarRequest {
    #[serde(default = "default_days")]
    days: usize,
    #[serde(default = "default_per_day")]
    content_per_day: usize,
    #[serde(default)]
    optimize: bool,
}

fn default_days() -> usize {
    7
}

fn default_per_day() -> usize {
    1
}

/// POST /api/calendar: plan `days` x `content_per_day` pieces.
async fn plan_calendar(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CalendarRequest>,
) -> impl IntoResponse {
    if req.days > MAX_PLANNING_DAYS {
        return bad_request(format!("days must be at most {}", MAX_PLANNING_DAYS));
    }
    if req.content_per_day > MAX_CONTENT_PER_DAY {
        return bad_request(format!(
            "content_per_day must be at most {}",
            MAX_CONTENT_PER_DAY
        ));
    }
    let mut rng = rand::thread_rng();
    reply(
        state
            .calendar
            .generate(req.days, req.content_per_day, &mut rng)
            .map(|plan| {
                let plan = if req.optimize {
                    state.calendar.optimize(plan)
                } else {
                    plan
                };
                let recommendations = state.calendar.recommendations(&plan);
                serde_json::json!({
                    "plan": plan,
                    "recommendations": recommendations,
                })
            }),
    )
}

#[derive(Deserialize)]
struct LookAheadRequest {
    #[serde(default = "default_days")]
    days: usize,
}

/// POST /api/calendar/recommendations: daily schedule with history analysis.
async fn content_recommendations(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LookAheadRequest>,
) -> impl IntoResponse {
    if req.days > MAX_PLANNING_DAYS {
        return bad_request(format!("days must be at most {}", MAX_PLANNING_DAYS));
    }
    let mut rng = rand::thread_rng();
    reply(state.calendar.content_recommendations(req.days, &mut rng))
}
