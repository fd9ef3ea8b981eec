use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use shared::entity::{
    deposit_requests, investment_plans, investments, job_runs, roi_logs, users, wallet_transactions,
};
use shared::{NewJobRun, NewRoiLog, NewWalletTransaction, PlanStatus};
use std::sync::Arc;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::repositories::Repository;
use crate::services::deposits::{self, DepositDecision};
use crate::services::wallet::{self, WalletAdjustment};
use crate::services::{investments as investment_rules, users as user_rules};

pub struct SeaOrmRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn lock_user(txn: &DatabaseTransaction, user_id: &str) -> AppResult<users::Model> {
        users::Entity::find_by_id(user_id.to_owned())
            .lock_exclusive()
            .one(txn)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    async fn lock_investment(txn: &DatabaseTransaction, user_id: &str) -> AppResult<investments::Model> {
        investments::Entity::find_by_id(user_id.to_owned())
            .lock_exclusive()
            .one(txn)
            .await?
            .ok_or_else(|| AppError::not_found("Investment record not found"))
    }

    /// Row-locked read-modify-write of a single user.
    async fn modify_user<F>(&self, user_id: &str, change: F) -> AppResult<users::Model>
    where
        F: FnOnce(&mut users::Model) -> AppResult<Option<NewWalletTransaction>> + Send,
    {
        let txn = self.db.begin().await?;
        let mut user = Self::lock_user(&txn, user_id).await?;
        let entry = change(&mut user)?;

        let saved = user_update(user).update(&txn).await?;
        if let Some(entry) = entry {
            wallet_transactions::Entity::insert(wallet_transaction_insert(entry))
                .exec(&txn)
                .await?;
        }
        txn.commit().await?;
        Ok(saved)
    }

    async fn modify_investment<F>(&self, user_id: &str, change: F) -> AppResult<investments::Model>
    where
        F: FnOnce(&mut investments::Model) -> AppResult<()> + Send,
    {
        let txn = self.db.begin().await?;
        let mut position = Self::lock_investment(&txn, user_id).await?;
        change(&mut position)?;
        let saved = investment_update(position).update(&txn).await?;
        txn.commit().await?;
        Ok(saved)
    }
}

#[async_trait]
impl Repository for SeaOrmRepository {
    async fn list_users(&self) -> AppResult<Vec<users::Model>> {
        let users = users::Entity::find()
            .order_by_asc(users::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;
        Ok(users)
    }

    async fn find_user(&self, user_id: &str) -> AppResult<Option<users::Model>> {
        let user = users::Entity::find_by_id(user_id.to_owned())
            .one(self.db.as_ref())
            .await?;
        Ok(user)
    }

    async fn adjust_wallet(
        &self,
        user_id: &str,
        adjustment: WalletAdjustment,
        now: DateTime<Utc>,
    ) -> AppResult<users::Model> {
        self.modify_user(user_id, |user| {
            wallet::apply_adjustment(user, adjustment, now).map(Some)
        })
        .await
    }

    async fn toggle_user_status(&self, user_id: &str, now: DateTime<Utc>) -> AppResult<users::Model> {
        self.modify_user(user_id, |user| {
            user_rules::toggle_status(user, now);
            Ok(None)
        })
        .await
    }

    async fn set_admin_note(
        &self,
        user_id: &str,
        note: Option<String>,
        now: DateTime<Utc>,
    ) -> AppResult<users::Model> {
        self.modify_user(user_id, |user| {
            user_rules::set_admin_note(user, note, now);
            Ok(None)
        })
        .await
    }

    async fn wallet_transactions(&self, user_id: &str) -> AppResult<Vec<wallet_transactions::Model>> {
        let history = wallet_transactions::Entity::find()
            .filter(wallet_transactions::Column::UserId.eq(user_id))
            .order_by_desc(wallet_transactions::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;
        Ok(history)
    }

    async fn list_plans(&self) -> AppResult<Vec<investment_plans::Model>> {
        let plans = investment_plans::Entity::find()
            .order_by_asc(investment_plans::Column::Name)
            .all(self.db.as_ref())
            .await?;
        Ok(plans)
    }

    async fn find_plan(&self, plan_id: &str) -> AppResult<Option<investment_plans::Model>> {
        let plan = investment_plans::Entity::find_by_id(plan_id.to_owned())
            .one(self.db.as_ref())
            .await?;
        Ok(plan)
    }

    async fn insert_plan(&self, plan: investment_plans::Model) -> AppResult<investment_plans::Model> {
        investment_plans::Entity::insert(plan_write(plan.clone(), true))
            .exec(self.db.as_ref())
            .await?;
        info!("New plan added with ID: {}", plan.id);
        Ok(plan)
    }

    async fn update_plan(&self, plan: investment_plans::Model) -> AppResult<investment_plans::Model> {
        let saved = plan_write(plan, false).update(self.db.as_ref()).await?;
        Ok(saved)
    }

    async fn delete_plan(&self, plan_id: &str) -> AppResult<bool> {
        let result = investment_plans::Entity::delete_by_id(plan_id.to_owned())
            .exec(self.db.as_ref())
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn find_investment(&self, user_id: &str) -> AppResult<Option<investments::Model>> {
        let position = investments::Entity::find_by_id(user_id.to_owned())
            .one(self.db.as_ref())
            .await?;
        Ok(position)
    }

    async fn open_investments(&self) -> AppResult<Vec<investments::Model>> {
        let positions = investments::Entity::find()
            .filter(investments::Column::HasActivePlan.eq(true))
            .order_by_asc(investments::Column::UserId)
            .all(self.db.as_ref())
            .await?;
        Ok(positions)
    }

    async fn commit_accrual(
        &self,
        updates: Vec<investments::Model>,
        logs: Vec<NewRoiLog>,
    ) -> AppResult<()> {
        // Dropping the transaction on an early return rolls everything back.
        let txn = self.db.begin().await?;
        for position in updates {
            investment_update(position).update(&txn).await?;
        }
        if !logs.is_empty() {
            roi_logs::Entity::insert_many(logs.into_iter().map(roi_log_insert))
                .exec(&txn)
                .await?;
        }
        txn.commit().await?;
        Ok(())
    }

    async fn set_plan_status(
        &self,
        user_id: &str,
        status: PlanStatus,
        now: DateTime<Utc>,
    ) -> AppResult<investments::Model> {
        self.modify_investment(user_id, |position| investment_rules::set_status(position, status, now))
            .await
    }

    async fn restart_investment(&self, user_id: &str, now: DateTime<Utc>) -> AppResult<investments::Model> {
        self.modify_investment(user_id, |position| {
            investment_rules::restart(position, now);
            Ok(())
        })
        .await
    }

    async fn roi_logs(&self, user_id: &str) -> AppResult<Vec<roi_logs::Model>> {
        let logs = roi_logs::Entity::find()
            .filter(roi_logs::Column::UserId.eq(user_id))
            .order_by_desc(roi_logs::Column::CreatedAt)
            .order_by_desc(roi_logs::Column::Id)
            .all(self.db.as_ref())
            .await?;
        Ok(logs)
    }

    async fn record_job_run(&self, run: NewJobRun) -> AppResult<()> {
        let row = job_runs::ActiveModel {
            executed_at: ActiveValue::Set(run.executed_at),
            message: ActiveValue::Set(run.message),
            users_updated: ActiveValue::Set(run.users_updated),
            skipped_users: ActiveValue::Set(run.skipped_users),
            error: ActiveValue::Set(run.error),
            ..Default::default()
        };
        job_runs::Entity::insert(row).exec(self.db.as_ref()).await?;
        Ok(())
    }

    async fn job_runs(&self, limit: u64) -> AppResult<Vec<job_runs::Model>> {
        let runs = job_runs::Entity::find()
            .order_by_desc(job_runs::Column::ExecutedAt)
            .order_by_desc(job_runs::Column::Id)
            .limit(limit)
            .all(self.db.as_ref())
            .await?;
        Ok(runs)
    }

    async fn list_deposit_requests(&self) -> AppResult<Vec<deposit_requests::Model>> {
        let requests = deposit_requests::Entity::find()
            .order_by_desc(deposit_requests::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;
        Ok(requests)
    }

    async fn review_deposit(
        &self,
        request_id: &str,
        decision: DepositDecision,
        now: DateTime<Utc>,
    ) -> AppResult<deposit_requests::Model> {
        let txn = self.db.begin().await?;
        let mut request = deposit_requests::Entity::find_by_id(request_id.to_owned())
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::not_found("Deposit request not found"))?;
        let mut user = Self::lock_user(&txn, &request.user_id).await?;

        let entry = deposits::review_deposit(&mut request, &mut user, decision, now)?;

        let mut request_update: deposit_requests::ActiveModel = request.clone().into();
        request_update.status = ActiveValue::Set(request.status.clone());
        request_update.reviewed_at = ActiveValue::Set(request.reviewed_at);
        let saved = request_update.update(&txn).await?;

        user_update(user).update(&txn).await?;
        if let Some(entry) = entry {
            wallet_transactions::Entity::insert(wallet_transaction_insert(entry))
                .exec(&txn)
                .await?;
        }
        txn.commit().await?;
        Ok(saved)
    }
}

/// Writes every mutable column; callers hold the row lock or accept last-writer-wins.
fn user_update(user: users::Model) -> users::ActiveModel {
    users::ActiveModel {
        id: ActiveValue::Unchanged(user.id),
        email: ActiveValue::Unchanged(user.email),
        full_name: ActiveValue::Unchanged(user.full_name),
        status: ActiveValue::Set(user.status),
        admin_note: ActiveValue::Set(user.admin_note),
        wallet_balance: ActiveValue::Set(user.wallet_balance),
        invested_balance: ActiveValue::Set(user.invested_balance),
        pending_deposits: ActiveValue::Set(user.pending_deposits),
        pending_withdrawals: ActiveValue::Set(user.pending_withdrawals),
        account_balance: ActiveValue::Set(user.account_balance),
        created_at: ActiveValue::Unchanged(user.created_at),
        updated_at: ActiveValue::Set(user.updated_at),
    }
}

fn investment_update(position: investments::Model) -> investments::ActiveModel {
    investments::ActiveModel {
        user_id: ActiveValue::Unchanged(position.user_id),
        plan_id: ActiveValue::Set(position.plan_id),
        plan_name: ActiveValue::Set(position.plan_name),
        amount: ActiveValue::Set(position.amount),
        roi_rate: ActiveValue::Set(position.roi_rate),
        days_completed: ActiveValue::Set(position.days_completed),
        duration_days: ActiveValue::Set(position.duration_days),
        is_active: ActiveValue::Set(position.is_active),
        status: ActiveValue::Set(position.status),
        has_active_plan: ActiveValue::Set(position.has_active_plan),
        wallet_bal: ActiveValue::Set(position.wallet_bal),
        locked_bal: ActiveValue::Set(position.locked_bal),
        total_earned: ActiveValue::Set(position.total_earned),
        last_roi_paid_at: ActiveValue::Set(position.last_roi_paid_at),
        plan_started_at: ActiveValue::Set(position.plan_started_at),
        plan_completed_at: ActiveValue::Set(position.plan_completed_at),
        updated_at: ActiveValue::Set(position.updated_at),
    }
}

fn plan_write(plan: investment_plans::Model, insert: bool) -> investment_plans::ActiveModel {
    investment_plans::ActiveModel {
        id: if insert {
            ActiveValue::Set(plan.id)
        } else {
            ActiveValue::Unchanged(plan.id)
        },
        name: ActiveValue::Set(plan.name),
        roi_rate: ActiveValue::Set(plan.roi_rate),
        duration_days: ActiveValue::Set(plan.duration_days),
        min_amount: ActiveValue::Set(plan.min_amount),
        max_amount: ActiveValue::Set(plan.max_amount),
        created_at: ActiveValue::Set(plan.created_at),
        updated_at: ActiveValue::Set(plan.updated_at),
    }
}

fn wallet_transaction_insert(entry: NewWalletTransaction) -> wallet_transactions::ActiveModel {
    wallet_transactions::ActiveModel {
        user_id: ActiveValue::Set(entry.user_id),
        kind: ActiveValue::Set(entry.kind.as_str().to_string()),
        amount: ActiveValue::Set(entry.amount),
        description: ActiveValue::Set(entry.description),
        created_at: ActiveValue::Set(entry.created_at),
        ..Default::default()
    }
}

fn roi_log_insert(log: NewRoiLog) -> roi_logs::ActiveModel {
    roi_logs::ActiveModel {
        user_id: ActiveValue::Set(log.user_id),
        amount: ActiveValue::Set(log.amount),
        roi_rate: ActiveValue::Set(log.roi_rate),
        plan_name: ActiveValue::Set(log.plan_name),
        day_number: ActiveValue::Set(log.day_number),
        total_days: ActiveValue::Set(log.total_days),
        investment_amount: ActiveValue::Set(log.investment_amount),
        created_at: ActiveValue::Set(log.created_at),
        ..Default::default()
    }
}
