use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use shared::entity::job_runs;
use tracing::warn;

use crate::error::AppResult;
use crate::services::daily_roi::{authorize_scheduler, run_daily_roi};
use crate::state::AppState;

/// Header a scheduler may use instead of the `secret` query parameter.
pub const CRON_SECRET_HEADER: &str = "x-cron-secret";

const DEFAULT_RUNS_LIMIT: u64 = 50;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/cron/daily-roi", get(daily_roi).post(daily_roi))
        .route("/api/cron/runs", get(list_runs))
}

#[derive(Debug, Deserialize)]
struct CronQuery {
    secret: Option<String>,
}

async fn daily_roi(
    State(state): State<AppState>,
    Query(query): Query<CronQuery>,
    headers: HeaderMap,
) -> Response {
    let presented = query.secret.or_else(|| {
        headers
            .get(CRON_SECRET_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
    });
    if let Err(err) = authorize_scheduler(state.cron_secret.as_deref(), presented.as_deref()) {
        warn!("Unauthorized daily ROI request");
        return err.into_response();
    }

    match run_daily_roi(state.repo.as_ref(), &state.accrual_defaults, Utc::now()).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "Internal Server Error", "error": err.to_string() })),
        )
            .into_response(),
    }
}

#[derive(Debug, Deserialize)]
struct RunsQuery {
    limit: Option<u64>,
}

async fn list_runs(
    State(state): State<AppState>,
    Query(query): Query<RunsQuery>,
) -> AppResult<Json<Vec<job_runs::Model>>> {
    let limit = query.limit.unwrap_or(DEFAULT_RUNS_LIMIT).clamp(1, 500);
    Ok(Json(state.repo.job_runs(limit).await?))
}
