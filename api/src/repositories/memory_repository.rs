use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::entity::{
    deposit_requests, investment_plans, investments, job_runs, roi_logs, users, wallet_transactions,
};
use shared::{NewJobRun, NewRoiLog, NewWalletTransaction, PlanStatus};
use std::collections::BTreeMap;
use tokio::sync::Mutex;

use crate::error::{AppError, AppResult};
use crate::repositories::Repository;
use crate::services::deposits::{self, DepositDecision};
use crate::services::wallet::{self, WalletAdjustment};
use crate::services::{investments as investment_rules, users as user_rules};

#[derive(Default)]
struct Tables {
    users: BTreeMap<String, users::Model>,
    wallet_transactions: Vec<wallet_transactions::Model>,
    plans: BTreeMap<String, investment_plans::Model>,
    investments: BTreeMap<String, investments::Model>,
    roi_logs: Vec<roi_logs::Model>,
    job_runs: Vec<job_runs::Model>,
    deposit_requests: BTreeMap<String, deposit_requests::Model>,
    next_id: u64,
}

impl Tables {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn push_wallet_transaction(&mut self, entry: NewWalletTransaction) {
        let id = self.next_id();
        self.wallet_transactions.push(wallet_transactions::Model {
            id,
            user_id: entry.user_id,
            kind: entry.kind.as_str().to_string(),
            amount: entry.amount,
            description: entry.description,
            created_at: entry.created_at,
        });
    }
}

/// In-process store. One lock guards every table, so each trait call is
/// atomic and a failed change leaves nothing behind.
#[derive(Default)]
pub struct MemoryRepository {
    tables: Mutex<Tables>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_user(&self, user: users::Model) {
        self.tables.lock().await.users.insert(user.id.clone(), user);
    }

    pub async fn insert_investment(&self, position: investments::Model) {
        self.tables
            .lock()
            .await
            .investments
            .insert(position.user_id.clone(), position);
    }

    pub async fn insert_deposit_request(&self, request: deposit_requests::Model) {
        self.tables
            .lock()
            .await
            .deposit_requests
            .insert(request.id.clone(), request);
    }

    async fn modify_user<F>(&self, user_id: &str, change: F) -> AppResult<users::Model>
    where
        F: FnOnce(&mut users::Model) -> AppResult<Option<NewWalletTransaction>> + Send,
    {
        let mut tables = self.tables.lock().await;
        let mut user = tables
            .users
            .get(user_id)
            .cloned()
            .ok_or_else(|| AppError::not_found("User not found"))?;
        let entry = change(&mut user)?;

        tables.users.insert(user.id.clone(), user.clone());
        if let Some(entry) = entry {
            tables.push_wallet_transaction(entry);
        }
        Ok(user)
    }

    async fn modify_investment<F>(&self, user_id: &str, change: F) -> AppResult<investments::Model>
    where
        F: FnOnce(&mut investments::Model) -> AppResult<()> + Send,
    {
        let mut tables = self.tables.lock().await;
        let mut position = tables
            .investments
            .get(user_id)
            .cloned()
            .ok_or_else(|| AppError::not_found("Investment record not found"))?;
        change(&mut position)?;
        tables.investments.insert(position.user_id.clone(), position.clone());
        Ok(position)
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn list_users(&self) -> AppResult<Vec<users::Model>> {
        Ok(self.tables.lock().await.users.values().cloned().collect())
    }

    async fn find_user(&self, user_id: &str) -> AppResult<Option<users::Model>> {
        Ok(self.tables.lock().await.users.get(user_id).cloned())
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
        let tables = self.tables.lock().await;
        Ok(tables
            .wallet_transactions
            .iter()
            .rev()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_plans(&self) -> AppResult<Vec<investment_plans::Model>> {
        let mut plans: Vec<_> = self.tables.lock().await.plans.values().cloned().collect();
        plans.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(plans)
    }

    async fn find_plan(&self, plan_id: &str) -> AppResult<Option<investment_plans::Model>> {
        Ok(self.tables.lock().await.plans.get(plan_id).cloned())
    }

    async fn insert_plan(&self, plan: investment_plans::Model) -> AppResult<investment_plans::Model> {
        let mut tables = self.tables.lock().await;
        if tables.plans.contains_key(&plan.id) {
            return Err(AppError::validation(format!("Plan {} already exists", plan.id)));
        }
        tables.plans.insert(plan.id.clone(), plan.clone());
        Ok(plan)
    }

    async fn update_plan(&self, plan: investment_plans::Model) -> AppResult<investment_plans::Model> {
        let mut tables = self.tables.lock().await;
        match tables.plans.get_mut(&plan.id) {
            Some(existing) => {
                *existing = plan.clone();
                Ok(plan)
            }
            None => Err(AppError::not_found("Plan not found")),
        }
    }

    async fn delete_plan(&self, plan_id: &str) -> AppResult<bool> {
        Ok(self.tables.lock().await.plans.remove(plan_id).is_some())
    }

    async fn find_investment(&self, user_id: &str) -> AppResult<Option<investments::Model>> {
        Ok(self.tables.lock().await.investments.get(user_id).cloned())
    }

    async fn open_investments(&self) -> AppResult<Vec<investments::Model>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .investments
            .values()
            .filter(|p| p.has_active_plan)
            .cloned()
            .collect())
    }

    async fn commit_accrual(
        &self,
        updates: Vec<investments::Model>,
        logs: Vec<NewRoiLog>,
    ) -> AppResult<()> {
        let mut tables = self.tables.lock().await;
        // Check every target first so a bad batch writes nothing.
        if let Some(missing) = updates.iter().find(|p| !tables.investments.contains_key(&p.user_id)) {
            return Err(AppError::not_found(format!(
                "Investment record not found: {}",
                missing.user_id
            )));
        }

        for position in updates {
            tables.investments.insert(position.user_id.clone(), position);
        }
        for log in logs {
            let id = tables.next_id();
            tables.roi_logs.push(roi_logs::Model {
                id,
                user_id: log.user_id,
                amount: log.amount,
                roi_rate: log.roi_rate,
                plan_name: log.plan_name,
                day_number: log.day_number,
                total_days: log.total_days,
                investment_amount: log.investment_amount,
                created_at: log.created_at,
            });
        }
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
        let tables = self.tables.lock().await;
        Ok(tables
            .roi_logs
            .iter()
            .rev()
            .filter(|l| l.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn record_job_run(&self, run: NewJobRun) -> AppResult<()> {
        let mut tables = self.tables.lock().await;
        let id = tables.next_id();
        tables.job_runs.push(job_runs::Model {
            id,
            executed_at: run.executed_at,
            message: run.message,
            users_updated: run.users_updated,
            skipped_users: run.skipped_users,
            error: run.error,
        });
        Ok(())
    }

    async fn job_runs(&self, limit: u64) -> AppResult<Vec<job_runs::Model>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .job_runs
            .iter()
            .rev()
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn list_deposit_requests(&self) -> AppResult<Vec<deposit_requests::Model>> {
        let mut requests: Vec<_> = self
            .tables
            .lock()
            .await
            .deposit_requests
            .values()
            .cloned()
            .collect();
        requests.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(requests)
    }

    async fn review_deposit(
        &self,
        request_id: &str,
        decision: DepositDecision,
        now: DateTime<Utc>,
    ) -> AppResult<deposit_requests::Model> {
        let mut tables = self.tables.lock().await;
        let mut request = tables
            .deposit_requests
            .get(request_id)
            .cloned()
            .ok_or_else(|| AppError::not_found("Deposit request not found"))?;
        let mut user = tables
            .users
            .get(&request.user_id)
            .cloned()
            .ok_or_else(|| AppError::not_found("User not found"))?;

        let entry = deposits::review_deposit(&mut request, &mut user, decision, now)?;

        tables.deposit_requests.insert(request.id.clone(), request.clone());
        tables.users.insert(user.id.clone(), user);
        if let Some(entry) = entry {
            tables.push_wallet_transaction(entry);
        }
        Ok(request)
    }
}
