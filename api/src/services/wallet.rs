//! Admin credit/debit rules.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use shared::entity::users;
use shared::{NewWalletTransaction, TransactionKind};

use crate::error::{AppError, AppResult};
use crate::services::{add_to_balance, fits_money_column, parse_decimal, require_id};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Credit,
    Debit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalletAdjustment {
    pub direction: Direction,
    pub amount: Decimal,
}

impl WalletAdjustment {
    /// Validates a raw `{ userId, amount }` request before anything is read.
    pub fn from_request(
        direction: Direction,
        user_id: Option<&str>,
        amount: Option<&Value>,
    ) -> AppResult<(String, Self)> {
        let user_id = require_id("userId", user_id)
            .map_err(|_| AppError::validation("Invalid request parameters"))?;
        let amount = parse_decimal("amount", amount)
            .map_err(|_| AppError::validation("Invalid request parameters"))?;
        if amount <= Decimal::ZERO || !fits_money_column(amount) {
            return Err(AppError::validation("Invalid request parameters"));
        }
        Ok((user_id, WalletAdjustment { direction, amount }))
    }

    pub fn kind(&self) -> TransactionKind {
        match self.direction {
            Direction::Credit => TransactionKind::Credit,
            Direction::Debit => TransactionKind::Debit,
        }
    }
}

/// Applies the adjustment to `user` in place and returns the history row to append.
/// On error `user` is left untouched.
pub fn apply_adjustment(
    user: &mut users::Model,
    adjustment: WalletAdjustment,
    now: DateTime<Utc>,
) -> AppResult<NewWalletTransaction> {
    if adjustment.amount <= Decimal::ZERO {
        return Err(AppError::validation("Invalid request parameters"));
    }

    let (new_balance, description) = match adjustment.direction {
        Direction::Credit => (add_to_balance(user.wallet_balance, adjustment.amount)?, "Admin credit"),
        Direction::Debit => {
            if adjustment.amount > user.wallet_balance {
                return Err(AppError::InsufficientBalance);
            }
            (user.wallet_balance - adjustment.amount, "Admin debit")
        }
    };

    user.wallet_balance = new_balance;
    user.recompute_account_balance();
    user.updated_at = Some(now);

    Ok(NewWalletTransaction {
        user_id: user.id.clone(),
        kind: adjustment.kind(),
        amount: adjustment.amount,
        description: description.to_string(),
        created_at: now,
    })
}
