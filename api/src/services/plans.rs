//! Plan catalog validation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use shared::entity::investment_plans;

use crate::error::{AppError, AppResult};
use crate::services::{fits_money_column, parse_decimal};

/// Body of plan create/edit requests. Every field is optional so edits can be partial.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanInput {
    pub name: Option<String>,
    pub roi_rate: Option<Value>,
    pub duration_days: Option<i64>,
    pub min_amount: Option<Value>,
    pub max_amount: Option<Value>,
}

pub fn new_plan(input: PlanInput, id: String, now: DateTime<Utc>) -> AppResult<investment_plans::Model> {
    let name = match input.name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => return Err(AppError::validation("Missing plan data")),
    };
    let roi_rate = parse_decimal("roiRate", input.roi_rate.as_ref())?;
    let duration_days = input
        .duration_days
        .ok_or_else(|| AppError::validation("durationDays is required"))?;

    let plan = investment_plans::Model {
        id,
        name,
        roi_rate,
        duration_days: to_days(duration_days)?,
        min_amount: match input.min_amount.as_ref() {
            Some(raw) => parse_decimal("minAmount", Some(raw))?,
            None => Decimal::ZERO,
        },
        max_amount: optional_decimal("maxAmount", input.max_amount.as_ref())?,
        created_at: Some(now),
        updated_at: Some(now),
    };
    validate(&plan)?;
    Ok(plan)
}

/// Merges supplied fields into an existing plan. Positions already opened
/// keep the rate and duration they snapshotted.
pub fn merge_plan(
    mut plan: investment_plans::Model,
    input: PlanInput,
    now: DateTime<Utc>,
) -> AppResult<investment_plans::Model> {
    if let Some(name) = input.name {
        plan.name = name.trim().to_string();
    }
    if let Some(raw) = input.roi_rate.as_ref() {
        plan.roi_rate = parse_decimal("roiRate", Some(raw))?;
    }
    if let Some(days) = input.duration_days {
        plan.duration_days = to_days(days)?;
    }
    if let Some(raw) = input.min_amount.as_ref() {
        plan.min_amount = parse_decimal("minAmount", Some(raw))?;
    }
    if input.max_amount.is_some() {
        plan.max_amount = optional_decimal("maxAmount", input.max_amount.as_ref())?;
    }
    plan.updated_at = Some(now);
    validate(&plan)?;
    Ok(plan)
}

fn validate(plan: &investment_plans::Model) -> AppResult<()> {
    if plan.name.is_empty() {
        return Err(AppError::validation("Plan name cannot be empty"));
    }
    if plan.roi_rate <= Decimal::ZERO || plan.roi_rate >= Decimal::ONE {
        return Err(AppError::validation("roiRate must be a fraction between 0 and 1"));
    }
    if plan.duration_days <= 0 {
        return Err(AppError::validation("durationDays must be positive"));
    }
    if plan.min_amount < Decimal::ZERO {
        return Err(AppError::validation("minAmount cannot be negative"));
    }
    if !fits_money_column(plan.min_amount) || !plan.max_amount.map_or(true, fits_money_column) {
        return Err(AppError::validation("Plan amounts exceed the supported range"));
    }
    if let Some(max) = plan.max_amount {
        if max < plan.min_amount {
            return Err(AppError::validation("maxAmount must not be below minAmount"));
        }
    }
    Ok(())
}

fn to_days(days: i64) -> AppResult<i32> {
    i32::try_from(days).map_err(|_| AppError::validation("durationDays is out of range"))
}

fn optional_decimal(field: &str, raw: Option<&Value>) -> AppResult<Option<Decimal>> {
    match raw {
        None | Some(Value::Null) => Ok(None),
        Some(value) => parse_decimal(field, Some(value)).map(Some),
    }
}
