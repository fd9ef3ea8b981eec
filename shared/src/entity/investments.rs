//! `SeaORM` Entity, @generated manually

use sea_orm::entity::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::models::PlanStatus;

/// One investment position per user, keyed by the owning user id.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "investments")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,
    #[sea_orm(nullable)]
    pub plan_id: Option<String>,
    #[sea_orm(nullable)]
    pub plan_name: Option<String>,
    /// Principal committed to the plan.
    #[sea_orm(column_type = "Decimal(Some((20, 8)))")]
    pub amount: Decimal,
    /// Rate snapshotted when the position was opened; `None` falls back to the plan.
    #[sea_orm(column_type = "Decimal(Some((10, 6)))", nullable)]
    pub roi_rate: Option<Decimal>,
    pub days_completed: i32,
    #[sea_orm(nullable)]
    pub duration_days: Option<i32>,
    pub is_active: bool,
    pub status: String, // "active", "paused", "completed"
    pub has_active_plan: bool,
    #[sea_orm(column_type = "Decimal(Some((20, 8)))")]
    pub wallet_bal: Decimal,
    #[sea_orm(column_type = "Decimal(Some((20, 8)))")]
    pub locked_bal: Decimal,
    #[sea_orm(column_type = "Decimal(Some((20, 8)))")]
    pub total_earned: Decimal,
    pub last_roi_paid_at: Option<DateTimeUtc>,
    pub plan_started_at: Option<DateTimeUtc>,
    pub plan_completed_at: Option<DateTimeUtc>,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn plan_status(&self) -> Option<PlanStatus> {
        PlanStatus::from_str(&self.status).ok()
    }
}
