//! Daily ROI accrual rules.
//!
//! The planner is pure: it takes the plan catalog and the open positions read
//! at the start of a run and stages every mutation and payout log in an
//! [`AccrualBatch`]. Nothing is written until the caller commits the batch.
//!
//! The planner has no memory of previous runs. Running it twice on the same
//! day pays every eligible position twice; callers rely on the scheduler
//! invoking the job at most once per day.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use shared::entity::{investment_plans, investments};
use shared::{NewRoiLog, PlanStatus};
use std::collections::HashMap;
use tracing::{debug, info};

/// Fallbacks used when neither the position nor its plan carries a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccrualDefaults {
    pub roi_rate: Decimal,
    pub duration_days: i32,
}

impl Default for AccrualDefaults {
    fn default() -> Self {
        AccrualDefaults {
            roi_rate: Decimal::new(4, 2),
            duration_days: 7,
        }
    }
}

/// Plan templates indexed by id.
#[derive(Debug, Clone, Default)]
pub struct PlanCatalog {
    plans: HashMap<String, investment_plans::Model>,
}

impl PlanCatalog {
    pub fn new(plans: Vec<investment_plans::Model>) -> Self {
        PlanCatalog {
            plans: plans.into_iter().map(|p| (p.id.clone(), p)).collect(),
        }
    }

    pub fn get(&self, plan_id: Option<&str>) -> Option<&investment_plans::Model> {
        plan_id.and_then(|id| self.plans.get(id))
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }
}

/// One credited position as reported back to the scheduler.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutSummary {
    pub user_id: String,
    pub roi: Decimal,
    pub new_balance: Decimal,
    pub day: i32,
    pub total_days: i32,
    pub plan_name: Option<String>,
    /// Rate expressed in percent (4 for 0.04).
    pub roi_percentage: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Paused,
    Inactive,
}

/// What a single run does to a single position.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Paid {
        position: investments::Model,
        log: NewRoiLog,
        summary: PayoutSummary,
    },
    /// Duration already reached: principal released, plan closed.
    Finalized { position: investments::Model },
    Skipped(SkipReason),
}

/// Everything one run will write, plus the per-user report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccrualBatch {
    pub updates: Vec<investments::Model>,
    pub logs: Vec<NewRoiLog>,
    pub updated_users: Vec<PayoutSummary>,
    pub skipped_users: Vec<String>,
    pub finalized_users: Vec<String>,
}

impl AccrualBatch {
    pub fn has_mutations(&self) -> bool {
        !self.updates.is_empty() || !self.logs.is_empty()
    }
}

/// Rate for a position: its own snapshot, then the live template, then the default.
pub fn resolve_rate(
    position: &investments::Model,
    plan: Option<&investment_plans::Model>,
    defaults: &AccrualDefaults,
) -> Decimal {
    position
        .roi_rate
        .or_else(|| plan.map(|p| p.roi_rate))
        .unwrap_or(defaults.roi_rate)
}

pub fn resolve_duration(
    position: &investments::Model,
    plan: Option<&investment_plans::Model>,
    defaults: &AccrualDefaults,
) -> i32 {
    position
        .duration_days
        .or_else(|| plan.map(|p| p.duration_days))
        .unwrap_or(defaults.duration_days)
}

/// Principal the payout is computed on; positions opened without an explicit
/// amount earn on their locked balance.
pub fn principal(position: &investments::Model) -> Decimal {
    if position.amount > Decimal::ZERO {
        position.amount
    } else {
        position.locked_bal
    }
}

pub fn accrue_position(
    position: &investments::Model,
    catalog: &PlanCatalog,
    defaults: &AccrualDefaults,
    now: DateTime<Utc>,
) -> Outcome {
    if position.plan_status() == Some(PlanStatus::Paused) {
        return Outcome::Skipped(SkipReason::Paused);
    }

    let plan = catalog.get(position.plan_id.as_deref());
    let duration = resolve_duration(position, plan, defaults);

    if position.days_completed >= duration {
        let mut finalized = position.clone();
        finalized.is_active = false;
        finalized.has_active_plan = false;
        finalized.status = PlanStatus::Completed.as_str().to_string();
        finalized.wallet_bal += finalized.locked_bal;
        finalized.locked_bal = Decimal::ZERO;
        finalized.plan_completed_at = Some(now);
        finalized.updated_at = Some(now);
        return Outcome::Finalized { position: finalized };
    }

    if !position.is_active {
        return Outcome::Skipped(SkipReason::Inactive);
    }

    let rate = resolve_rate(position, plan, defaults);
    let base = principal(position);
    let payout = (rate * base).round_dp(8).normalize();
    let day = position.days_completed + 1;
    let plan_name = position
        .plan_name
        .clone()
        .or_else(|| plan.map(|p| p.name.clone()));

    let mut paid = position.clone();
    paid.wallet_bal += payout;
    paid.total_earned += payout;
    paid.days_completed = day;
    paid.last_roi_paid_at = Some(now);
    paid.updated_at = Some(now);
    if day >= duration {
        // Closed for payouts now; the next run's finalizer releases the principal.
        paid.is_active = false;
        paid.status = PlanStatus::Completed.as_str().to_string();
    } else {
        paid.status = PlanStatus::Active.as_str().to_string();
    }

    let log = NewRoiLog {
        user_id: position.user_id.clone(),
        amount: payout,
        roi_rate: rate,
        plan_name: plan_name.clone(),
        day_number: day,
        total_days: duration,
        investment_amount: base,
        created_at: now,
    };
    let summary = PayoutSummary {
        user_id: position.user_id.clone(),
        roi: payout,
        new_balance: paid.wallet_bal,
        day,
        total_days: duration,
        plan_name,
        roi_percentage: (rate * Decimal::ONE_HUNDRED).normalize(),
    };

    Outcome::Paid { position: paid, log, summary }
}

/// Stages one run over every open position.
pub fn plan_daily_accrual(
    positions: Vec<investments::Model>,
    catalog: &PlanCatalog,
    defaults: &AccrualDefaults,
    now: DateTime<Utc>,
) -> AccrualBatch {
    let mut batch = AccrualBatch::default();

    for position in positions {
        let user_id = position.user_id.clone();
        match accrue_position(&position, catalog, defaults, now) {
            Outcome::Paid { position, log, summary } => {
                info!(
                    "ROI credited for {}: +{} ({}% of {}) - Day {}/{}",
                    user_id, summary.roi, summary.roi_percentage, log.investment_amount,
                    summary.day, summary.total_days
                );
                batch.updates.push(position);
                batch.logs.push(log);
                batch.updated_users.push(summary);
            }
            Outcome::Finalized { position } => {
                info!("Plan completed for {}, released locked balance", user_id);
                batch.updates.push(position);
                batch.finalized_users.push(user_id.clone());
                batch.skipped_users.push(user_id);
            }
            Outcome::Skipped(reason) => {
                debug!("Skipping {} ({:?})", user_id, reason);
                batch.skipped_users.push(user_id);
            }
        }
    }

    batch
}
