//! `SeaORM` Entity, @generated manually

use sea_orm::entity::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::models::UserStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub email: String,
    #[sea_orm(nullable)]
    pub full_name: Option<String>,
    pub status: String, // "active", "suspended"
    #[sea_orm(column_type = "Text", nullable)]
    pub admin_note: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((20, 8)))")]
    pub wallet_balance: Decimal,
    #[sea_orm(column_type = "Decimal(Some((20, 8)))")]
    pub invested_balance: Decimal,
    #[sea_orm(column_type = "Decimal(Some((20, 8)))")]
    pub pending_deposits: Decimal,
    #[sea_orm(column_type = "Decimal(Some((20, 8)))")]
    pub pending_withdrawals: Decimal,
    #[sea_orm(column_type = "Decimal(Some((20, 8)))")]
    pub account_balance: Decimal,
    pub created_at: Option<DateTimeUtc>,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Unknown values are treated as active, matching rows written before the column existed.
    pub fn user_status(&self) -> UserStatus {
        UserStatus::from_str(&self.status).unwrap_or(UserStatus::Active)
    }

    /// Account balance is derived: wallet + invested + pending deposits - pending withdrawals.
    pub fn recompute_account_balance(&mut self) {
        self.account_balance = self.wallet_balance + self.invested_balance + self.pending_deposits
            - self.pending_withdrawals;
    }
}
