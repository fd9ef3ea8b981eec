use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use shared::entity::deposit_requests;
use tracing::info;

use crate::error::AppResult;
use crate::services::deposits::DepositDecision;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/admin/deposit-requests", get(list_deposit_requests))
        .route("/api/admin/deposit-requests/:request_id/approve", post(approve))
        .route("/api/admin/deposit-requests/:request_id/decline", post(decline))
}

async fn list_deposit_requests(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<deposit_requests::Model>>> {
    Ok(Json(state.repo.list_deposit_requests().await?))
}

async fn approve(
    State(state): State<AppState>,
    Path(request_id): Path<String>,
) -> AppResult<Json<Value>> {
    review(state, request_id, DepositDecision::Approve).await
}

async fn decline(
    State(state): State<AppState>,
    Path(request_id): Path<String>,
) -> AppResult<Json<Value>> {
    review(state, request_id, DepositDecision::Decline).await
}

async fn review(state: AppState, request_id: String, decision: DepositDecision) -> AppResult<Json<Value>> {
    let request = state.repo.review_deposit(&request_id, decision, Utc::now()).await?;
    info!(
        "Deposit request {} for {} marked {}",
        request.id, request.user_id, request.status
    );
    Ok(Json(json!({ "success": true, "data": request })))
}
