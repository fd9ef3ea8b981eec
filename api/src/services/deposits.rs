//! Review of user deposit requests.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shared::entity::{deposit_requests, users};
use shared::{DepositStatus, NewWalletTransaction, TransactionKind};

use crate::error::{AppError, AppResult};
use crate::services::add_to_balance;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepositDecision {
    Approve,
    Decline,
}

/// Settles a pending request against its owner. Approval credits the wallet
/// and returns the history row; both decisions release the pending amount.
pub fn review_deposit(
    request: &mut deposit_requests::Model,
    user: &mut users::Model,
    decision: DepositDecision,
    now: DateTime<Utc>,
) -> AppResult<Option<NewWalletTransaction>> {
    match request.deposit_status() {
        Some(DepositStatus::Pending) => {}
        _ => {
            return Err(AppError::validation(format!(
                "Deposit request is already {}",
                request.status
            )))
        }
    }
    if request.user_id != user.id {
        return Err(AppError::Internal(anyhow::anyhow!(
            "deposit request {} does not belong to user {}",
            request.id,
            user.id
        )));
    }

    let credited = match decision {
        DepositDecision::Approve => Some(add_to_balance(user.wallet_balance, request.amount)?),
        DepositDecision::Decline => None,
    };

    user.pending_deposits = (user.pending_deposits - request.amount).max(Decimal::ZERO);
    request.reviewed_at = Some(now);

    let entry = match decision {
        DepositDecision::Approve => {
            request.status = DepositStatus::Approved.as_str().to_string();
            if let Some(balance) = credited {
                user.wallet_balance = balance;
            }
            Some(NewWalletTransaction {
                user_id: user.id.clone(),
                kind: TransactionKind::Deposit,
                amount: request.amount,
                description: format!("Deposit via {}", request.method),
                created_at: now,
            })
        }
        DepositDecision::Decline => {
            request.status = DepositStatus::Declined.as_str().to_string();
            None
        }
    };

    user.recompute_account_balance();
    user.updated_at = Some(now);
    Ok(entry)
}
