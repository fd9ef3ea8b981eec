use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Account state of a user record, stored as text in `users.status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Suspended,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Suspended => "suspended",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            UserStatus::Active => UserStatus::Suspended,
            UserStatus::Suspended => UserStatus::Active,
        }
    }
}

impl FromStr for UserStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(UserStatus::Active),
            "suspended" => Ok(UserStatus::Suspended),
            other => Err(anyhow::anyhow!("unknown user status: {}", other)),
        }
    }
}

/// Lifecycle of an investment position, stored as text in `investments.status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanStatus {
    Active,
    Paused,
    Completed,
}

impl PlanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanStatus::Active => "active",
            PlanStatus::Paused => "paused",
            PlanStatus::Completed => "completed",
        }
    }
}

impl FromStr for PlanStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(PlanStatus::Active),
            "paused" => Ok(PlanStatus::Paused),
            "completed" => Ok(PlanStatus::Completed),
            other => Err(anyhow::anyhow!("unknown plan status: {}", other)),
        }
    }
}

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepositStatus {
    Pending,
    Approved,
    Declined,
}

impl DepositStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DepositStatus::Pending => "pending",
            DepositStatus::Approved => "approved",
            DepositStatus::Declined => "declined",
        }
    }
}

impl FromStr for DepositStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(DepositStatus::Pending),
            "approved" => Ok(DepositStatus::Approved),
            "declined" => Ok(DepositStatus::Declined),
            other => Err(anyhow::anyhow!("unknown deposit status: {}", other)),
        }
    }
}

/// Kind of a wallet history entry, stored as text in `wallet_transactions.kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    Credit,
    Debit,
    Deposit,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Credit => "Credit",
            TransactionKind::Debit => "Debit",
            TransactionKind::Deposit => "Deposit",
        }
    }
}

/// Wallet history row staged by a service before the repository persists it.
#[derive(Debug, Clone, PartialEq)]
pub struct NewWalletTransaction {
    pub user_id: String,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// Payout record staged by the daily ROI job.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRoiLog {
    pub user_id: String,
    pub amount: Decimal,
    /// Rate applied, as a fraction (0.04 for 4%).
    pub roi_rate: Decimal,
    pub plan_name: Option<String>,
    pub day_number: i32,
    pub total_days: i32,
    pub investment_amount: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Audit row describing one run of the daily ROI job.
#[derive(Debug, Clone, PartialEq)]
pub struct NewJobRun {
    pub executed_at: DateTime<Utc>,
    pub message: String,
    pub users_updated: Option<i32>,
    pub skipped_users: Option<i32>,
    pub error: Option<String>,
}

impl NewJobRun {
    pub fn success(executed_at: DateTime<Utc>, users_updated: usize, skipped_users: usize) -> Self {
        NewJobRun {
            executed_at,
            message: "Daily ROI processed".to_string(),
            users_updated: Some(users_updated as i32),
            skipped_users: Some(skipped_users as i32),
            error: None,
        }
    }

    pub fn failure(executed_at: DateTime<Utc>, error: String) -> Self {
        NewJobRun {
            executed_at,
            message: "Error processing daily ROI".to_string(),
            users_updated: None,
            skipped_users: None,
            error: Some(error),
        }
    }
}
