//! Persistence seam. Services talk to a `Repository`; production uses the
//! SeaORM implementation, tests and `memory://` runs use the in-process one.

pub mod memory_repository;
pub mod sea_orm_repository;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::entity::{
    deposit_requests, investment_plans, investments, job_runs, roi_logs, users, wallet_transactions,
};
use shared::{NewJobRun, NewRoiLog, PlanStatus};

use crate::error::AppResult;
use crate::services::deposits::DepositDecision;
use crate::services::wallet::WalletAdjustment;

pub use memory_repository::MemoryRepository;
pub use sea_orm_repository::SeaOrmRepository;

/// Every read-modify-write method runs atomically: either the whole change
/// (including any history row) is stored, or nothing is.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Repository: Send + Sync {
    async fn list_users(&self) -> AppResult<Vec<users::Model>>;

    async fn find_user(&self, user_id: &str) -> AppResult<Option<users::Model>>;

    /// Credits or debits the user's wallet and appends a history row.
    async fn adjust_wallet(
        &self,
        user_id: &str,
        adjustment: WalletAdjustment,
        now: DateTime<Utc>,
    ) -> AppResult<users::Model>;

    async fn toggle_user_status(&self, user_id: &str, now: DateTime<Utc>) -> AppResult<users::Model>;

    async fn set_admin_note(
        &self,
        user_id: &str,
        note: Option<String>,
        now: DateTime<Utc>,
    ) -> AppResult<users::Model>;

    async fn wallet_transactions(&self, user_id: &str) -> AppResult<Vec<wallet_transactions::Model>>;

    async fn list_plans(&self) -> AppResult<Vec<investment_plans::Model>>;

    async fn find_plan(&self, plan_id: &str) -> AppResult<Option<investment_plans::Model>>;

    async fn insert_plan(&self, plan: investment_plans::Model) -> AppResult<investment_plans::Model>;

    async fn update_plan(&self, plan: investment_plans::Model) -> AppResult<investment_plans::Model>;

    /// Returns false when no plan had this id.
    async fn delete_plan(&self, plan_id: &str) -> AppResult<bool>;

    async fn find_investment(&self, user_id: &str) -> AppResult<Option<investments::Model>>;

    /// Positions with an open plan, the input of the daily ROI job.
    async fn open_investments(&self) -> AppResult<Vec<investments::Model>>;

    /// Writes every staged position and payout log as one atomic batch.
    async fn commit_accrual(
        &self,
        updates: Vec<investments::Model>,
        logs: Vec<NewRoiLog>,
    ) -> AppResult<()>;

    async fn set_plan_status(
        &self,
        user_id: &str,
        status: PlanStatus,
        now: DateTime<Utc>,
    ) -> AppResult<investments::Model>;

    async fn restart_investment(&self, user_id: &str, now: DateTime<Utc>) -> AppResult<investments::Model>;

    /// Payout history, newest first.
    async fn roi_logs(&self, user_id: &str) -> AppResult<Vec<roi_logs::Model>>;

    async fn record_job_run(&self, run: NewJobRun) -> AppResult<()>;

    /// Most recent runs first.
    async fn job_runs(&self, limit: u64) -> AppResult<Vec<job_runs::Model>>;

    async fn list_deposit_requests(&self) -> AppResult<Vec<deposit_requests::Model>>;

    async fn review_deposit(
        &self,
        request_id: &str,
        decision: DepositDecision,
        now: DateTime<Utc>,
    ) -> AppResult<deposit_requests::Model>;
}
