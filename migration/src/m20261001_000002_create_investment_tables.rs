use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Plan templates
        manager
            .create_table(
                Table::create()
                    .table(InvestmentPlans::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(InvestmentPlans::Id).string_len(64).not_null().primary_key())
                    .col(ColumnDef::new(InvestmentPlans::Name).string().not_null())
                    .col(ColumnDef::new(InvestmentPlans::RoiRate).decimal_len(10, 6).not_null()) // fraction, 0.04 = 4%
                    .col(ColumnDef::new(InvestmentPlans::DurationDays).integer().not_null())
                    .col(ColumnDef::new(InvestmentPlans::MinAmount).decimal_len(20, 8).not_null().default(0))
                    .col(ColumnDef::new(InvestmentPlans::MaxAmount).decimal_len(20, 8).null())
                    .col(ColumnDef::new(InvestmentPlans::CreatedAt).timestamp().default(Expr::cust("CURRENT_TIMESTAMP")))
                    .col(ColumnDef::new(InvestmentPlans::UpdatedAt).timestamp().null())
                    .to_owned(),
            )
            .await?;

        // One position per user
        manager
            .create_table(
                Table::create()
                    .table(Investments::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Investments::UserId).string_len(64).not_null().primary_key())
                    .col(ColumnDef::new(Investments::PlanId).string_len(64).null())
                    .col(ColumnDef::new(Investments::PlanName).string().null())
                    .col(ColumnDef::new(Investments::Amount).decimal_len(20, 8).not_null().default(0))
                    .col(ColumnDef::new(Investments::RoiRate).decimal_len(10, 6).null()) // snapshot at open
                    .col(ColumnDef::new(Investments::DaysCompleted).integer().not_null().default(0))
                    .col(ColumnDef::new(Investments::DurationDays).integer().null())
                    .col(ColumnDef::new(Investments::IsActive).boolean().not_null().default(false))
                    .col(ColumnDef::new(Investments::Status).string_len(16).not_null().default("active")) // "active", "paused", "completed"
                    .col(ColumnDef::new(Investments::HasActivePlan).boolean().not_null().default(false))
                    .col(ColumnDef::new(Investments::WalletBal).decimal_len(20, 8).not_null().default(0))
                    .col(ColumnDef::new(Investments::LockedBal).decimal_len(20, 8).not_null().default(0))
                    .col(ColumnDef::new(Investments::TotalEarned).decimal_len(20, 8).not_null().default(0))
                    .col(ColumnDef::new(Investments::LastRoiPaidAt).timestamp().null())
                    .col(ColumnDef::new(Investments::PlanStartedAt).timestamp().null())
                    .col(ColumnDef::new(Investments::PlanCompletedAt).timestamp().null())
                    .col(ColumnDef::new(Investments::UpdatedAt).timestamp().null())
                    .index(
                        Index::create()
                            .name("idx_investments_has_active_plan")
                            .table(Investments::Table)
                            .col(Investments::HasActivePlan)
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_investments_user")
                            .from(Investments::Table, Investments::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                    )
                    .to_owned(),
            )
            .await?;

        // Append-only payout history
        manager
            .create_table(
                Table::create()
                    .table(RoiLogs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(RoiLogs::Id).big_unsigned().auto_increment().primary_key())
                    .col(ColumnDef::new(RoiLogs::UserId).string_len(64).not_null())
                    .col(ColumnDef::new(RoiLogs::Amount).decimal_len(20, 8).not_null())
                    .col(ColumnDef::new(RoiLogs::RoiRate).decimal_len(10, 6).not_null())
                    .col(ColumnDef::new(RoiLogs::PlanName).string().null())
                    .col(ColumnDef::new(RoiLogs::DayNumber).integer().not_null())
                    .col(ColumnDef::new(RoiLogs::TotalDays).integer().not_null())
                    .col(ColumnDef::new(RoiLogs::InvestmentAmount).decimal_len(20, 8).not_null())
                    .col(ColumnDef::new(RoiLogs::CreatedAt).timestamp().not_null())
                    .index(
                        Index::create()
                            .name("idx_roi_logs_user_created")
                            .table(RoiLogs::Table)
                            .col(RoiLogs::UserId)
                            .col(RoiLogs::CreatedAt)
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_roi_logs_investment")
                            .from(RoiLogs::Table, RoiLogs::UserId)
                            .to(Investments::Table, Investments::UserId)
                            .on_delete(ForeignKeyAction::Cascade)
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RoiLogs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Investments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(InvestmentPlans::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum InvestmentPlans {
    Table,
    Id,
    Name,
    RoiRate,
    DurationDays,
    MinAmount,
    MaxAmount,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Investments {
    Table,
    UserId,
    PlanId,
    PlanName,
    Amount,
    RoiRate,
    DaysCompleted,
    DurationDays,
    IsActive,
    Status,
    HasActivePlan,
    WalletBal,
    LockedBal,
    TotalEarned,
    LastRoiPaidAt,
    PlanStartedAt,
    PlanCompletedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum RoiLogs {
    Table,
    Id,
    UserId,
    Amount,
    RoiRate,
    PlanName,
    DayNumber,
    TotalDays,
    InvestmentAmount,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
