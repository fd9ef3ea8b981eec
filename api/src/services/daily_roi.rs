//! Daily ROI job: read plans and open positions, stage payouts, commit once,
//! then record an audit row.

use chrono::{DateTime, Utc};
use serde::Serialize;
use shared::NewJobRun;
use tracing::{error, info, warn};

use crate::error::{AppError, AppResult};
use crate::repositories::Repository;
use crate::services::accrual::{plan_daily_accrual, AccrualDefaults, PayoutSummary, PlanCatalog};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRoiReport {
    pub message: String,
    pub users_updated: usize,
    pub updated_users: Vec<PayoutSummary>,
    pub skipped_users: Vec<String>,
}

/// Compares the scheduler's secret with the configured one. A missing
/// configuration rejects every caller.
pub fn authorize_scheduler(expected: Option<&str>, presented: Option<&str>) -> AppResult<()> {
    match (expected, presented) {
        (Some(expected), Some(presented)) if expected == presented => Ok(()),
        _ => Err(AppError::Unauthorized),
    }
}

pub async fn run_daily_roi(
    repo: &dyn Repository,
    defaults: &AccrualDefaults,
    now: DateTime<Utc>,
) -> AppResult<DailyRoiReport> {
    info!("Daily ROI job started");

    match process(repo, defaults, now).await {
        Ok(report) => Ok(report),
        Err(err) => {
            error!("Error in daily ROI job: {}", err);
            if let Err(audit_err) = repo.record_job_run(NewJobRun::failure(now, err.to_string())).await {
                warn!("Failed to record job failure: {}", audit_err);
            }
            Err(err)
        }
    }
}

async fn process(
    repo: &dyn Repository,
    defaults: &AccrualDefaults,
    now: DateTime<Utc>,
) -> AppResult<DailyRoiReport> {
    let catalog = PlanCatalog::new(repo.list_plans().await?);
    let positions = repo.open_investments().await?;
    info!(
        "Loaded {} plan templates and {} open investments",
        catalog.len(),
        positions.len()
    );

    if positions.is_empty() {
        repo.record_job_run(NewJobRun::success(now, 0, 0)).await?;
        return Ok(DailyRoiReport {
            message: "No active investments found".to_string(),
            users_updated: 0,
            updated_users: Vec::new(),
            skipped_users: Vec::new(),
        });
    }

    let batch = plan_daily_accrual(positions, &catalog, defaults, now);

    if batch.has_mutations() {
        let update_count = batch.updates.len();
        repo.commit_accrual(batch.updates, batch.logs).await?;
        info!(
            "Batch committed: {} positions written, {} credited, {} finalized",
            update_count,
            batch.updated_users.len(),
            batch.finalized_users.len()
        );
    } else {
        warn!("No users updated in this run");
    }

    repo.record_job_run(NewJobRun::success(
        now,
        batch.updated_users.len(),
        batch.skipped_users.len(),
    ))
    .await?;

    Ok(DailyRoiReport {
        message: "Daily ROI processed successfully".to_string(),
        users_updated: batch.updated_users.len(),
        updated_users: batch.updated_users,
        skipped_users: batch.skipped_users,
    })
}
