//! `SeaORM` Entity, @generated manually

use sea_orm::entity::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Append-only payout history; rows are never updated or deleted.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "roi_logs")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: u64,
    pub user_id: String,
    #[sea_orm(column_type = "Decimal(Some((20, 8)))")]
    pub amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 6)))")]
    pub roi_rate: Decimal,
    #[sea_orm(nullable)]
    pub plan_name: Option<String>,
    pub day_number: i32,
    pub total_days: i32,
    #[sea_orm(column_type = "Decimal(Some((20, 8)))")]
    pub investment_amount: Decimal,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::investments::Entity",
        from = "Column::UserId",
        to = "super::investments::Column::UserId",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Investments,
}

impl Related<super::investments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Investments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
