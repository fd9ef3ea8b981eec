use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::WithRejection;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use shared::entity::roi_logs;
use shared::PlanStatus;
use std::str::FromStr;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::services::require_id;
use crate::services::wallet::{Direction, WalletAdjustment};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/users", get(list_users))
        .route("/api/users/:user_id", get(get_user))
        .route("/api/users/credit", post(credit_user))
        .route("/api/users/debit", post(debit_user))
        .route("/api/users/suspend", post(suspend_user))
        .route("/api/users/note", post(save_admin_note))
        .route("/api/investments/status", post(set_plan_status))
        .route("/api/investments/restart", post(restart_plan))
        .route("/api/investments/:user_id/roi-logs", get(list_roi_logs))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WalletRequest {
    user_id: Option<String>,
    amount: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserRequest {
    user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NoteRequest {
    user_id: Option<String>,
    admin_note: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusRequest {
    user_id: Option<String>,
    status: Option<String>,
}

async fn list_users(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let users = state.repo.list_users().await?;
    Ok(Json(json!(users)))
}

async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<Value>> {
    let user = state
        .repo
        .find_user(&user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    let investment = state.repo.find_investment(&user_id).await?;
    let transactions = state.repo.wallet_transactions(&user_id).await?;

    Ok(Json(json!({
        "user": user,
        "investment": investment,
        "transactionHistory": transactions,
    })))
}

async fn credit_user(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<WalletRequest>, AppError>,
) -> AppResult<Json<Value>> {
    adjust_wallet(state, Direction::Credit, body).await?;
    Ok(Json(json!({ "success": true, "message": "User credited successfully" })))
}

async fn debit_user(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<WalletRequest>, AppError>,
) -> AppResult<Json<Value>> {
    adjust_wallet(state, Direction::Debit, body).await?;
    Ok(Json(json!({ "success": true, "message": "User debited successfully" })))
}

async fn adjust_wallet(state: AppState, direction: Direction, body: WalletRequest) -> AppResult<()> {
    let (user_id, adjustment) =
        WalletAdjustment::from_request(direction, body.user_id.as_deref(), body.amount.as_ref())?;

    let user = state.repo.adjust_wallet(&user_id, adjustment, Utc::now()).await?;
    info!(
        "{:?} of {} applied to {}, wallet balance now {}",
        direction, adjustment.amount, user_id, user.wallet_balance
    );
    Ok(())
}

async fn suspend_user(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<UserRequest>, AppError>,
) -> AppResult<Json<Value>> {
    let user_id = require_id("userId", body.user_id.as_deref())?;
    let user = state.repo.toggle_user_status(&user_id, Utc::now()).await?;
    info!("User {} is now {}", user_id, user.status);
    Ok(Json(json!({ "success": true, "status": user.status })))
}

async fn save_admin_note(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<NoteRequest>, AppError>,
) -> AppResult<Json<Value>> {
    let user_id = require_id("userId", body.user_id.as_deref())?;
    let user = state.repo.set_admin_note(&user_id, body.admin_note, Utc::now()).await?;
    Ok(Json(json!({ "success": true, "adminNote": user.admin_note })))
}

async fn set_plan_status(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<StatusRequest>, AppError>,
) -> AppResult<Json<Value>> {
    let user_id = require_id("userId", body.user_id.as_deref())?;
    let status = body
        .status
        .as_deref()
        .map(PlanStatus::from_str)
        .transpose()
        .map_err(|e| AppError::validation(e.to_string()))?
        .ok_or_else(|| AppError::validation("status is required"))?;

    let position = state.repo.set_plan_status(&user_id, status, Utc::now()).await?;
    info!("Investment plan for {} set to {}", user_id, position.status);
    Ok(Json(json!({ "success": true, "status": position.status })))
}

async fn restart_plan(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<UserRequest>, AppError>,
) -> AppResult<Json<Value>> {
    let user_id = require_id("userId", body.user_id.as_deref())?;
    state.repo.restart_investment(&user_id, Utc::now()).await?;
    info!("Investment plan restarted for {}", user_id);
    Ok(Json(json!({ "message": "Investment plan restarted successfully" })))
}

async fn list_roi_logs(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<Vec<roi_logs::Model>>> {
    Ok(Json(state.repo.roi_logs(&user_id).await?))
}
