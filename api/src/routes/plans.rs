use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json, Router,
};
use axum_extra::extract::WithRejection;
use chrono::Utc;
use serde_json::{json, Value};
use shared::entity::investment_plans;
use tracing::info;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::plans::{merge_plan, new_plan, PlanInput};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/plans", get(list_plans).post(add_plan))
        .route("/api/plans/:plan_id", put(edit_plan).delete(delete_plan))
}

async fn list_plans(State(state): State<AppState>) -> AppResult<Json<Vec<investment_plans::Model>>> {
    Ok(Json(state.repo.list_plans().await?))
}

async fn add_plan(
    State(state): State<AppState>,
    WithRejection(Json(input), _): WithRejection<Json<PlanInput>, AppError>,
) -> AppResult<Json<Value>> {
    let plan = new_plan(input, Uuid::new_v4().to_string(), Utc::now())?;
    let plan = state.repo.insert_plan(plan).await?;
    Ok(Json(json!({
        "message": "Plan added successfully!",
        "success": true,
        "newPlanId": plan.id,
        "data": plan,
    })))
}

async fn edit_plan(
    State(state): State<AppState>,
    Path(plan_id): Path<String>,
    WithRejection(Json(input), _): WithRejection<Json<PlanInput>, AppError>,
) -> AppResult<Json<Value>> {
    let existing = state
        .repo
        .find_plan(&plan_id)
        .await?
        .ok_or_else(|| AppError::not_found("Plan not found"))?;
    let plan = state.repo.update_plan(merge_plan(existing, input, Utc::now())?).await?;
    info!("Plan {} updated", plan_id);
    Ok(Json(json!({
        "message": "Plan updated successfully!",
        "success": true,
        "updatedPlanId": plan.id,
        "data": plan,
    })))
}

async fn delete_plan(
    State(state): State<AppState>,
    Path(plan_id): Path<String>,
) -> AppResult<Json<Value>> {
    if !state.repo.delete_plan(&plan_id).await? {
        return Err(AppError::not_found("Plan not found"));
    }
    info!("Plan {} deleted", plan_id);
    Ok(Json(json!({ "message": format!("Plan with ID {} deleted successfully!", plan_id) })))
}
