use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).string_len(64).not_null().primary_key())
                    .col(ColumnDef::new(Users::Email).string().not_null())
                    .col(ColumnDef::new(Users::FullName).string().null())
                    .col(ColumnDef::new(Users::Status).string_len(16).not_null().default("active")) // "active", "suspended"
                    .col(ColumnDef::new(Users::AdminNote).text().null())
                    .col(ColumnDef::new(Users::WalletBalance).decimal_len(20, 8).not_null().default(0))
                    .col(ColumnDef::new(Users::InvestedBalance).decimal_len(20, 8).not_null().default(0))
                    .col(ColumnDef::new(Users::PendingDeposits).decimal_len(20, 8).not_null().default(0))
                    .col(ColumnDef::new(Users::PendingWithdrawals).decimal_len(20, 8).not_null().default(0))
                    .col(ColumnDef::new(Users::AccountBalance).decimal_len(20, 8).not_null().default(0))
                    .col(ColumnDef::new(Users::CreatedAt).timestamp().default(Expr::cust("CURRENT_TIMESTAMP")))
                    .col(ColumnDef::new(Users::UpdatedAt).timestamp().null())
                    .to_owned(),
            )
            .await?;

        // Transaction history, one row per admin credit/debit or approved deposit
        manager
            .create_table(
                Table::create()
                    .table(WalletTransactions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(WalletTransactions::Id).big_unsigned().auto_increment().primary_key())
                    .col(ColumnDef::new(WalletTransactions::UserId).string_len(64).not_null())
                    .col(ColumnDef::new(WalletTransactions::Kind).string_len(16).not_null()) // "Credit", "Debit", "Deposit"
                    .col(ColumnDef::new(WalletTransactions::Amount).decimal_len(20, 8).not_null())
                    .col(ColumnDef::new(WalletTransactions::Description).string().not_null())
                    .col(ColumnDef::new(WalletTransactions::CreatedAt).timestamp().not_null())
                    .index(
                        Index::create()
                            .name("idx_wallet_transactions_user")
                            .table(WalletTransactions::Table)
                            .col(WalletTransactions::UserId)
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_wallet_transactions_user")
                            .from(WalletTransactions::Table, WalletTransactions::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DepositRequests::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(DepositRequests::Id).string_len(64).not_null().primary_key())
                    .col(ColumnDef::new(DepositRequests::UserId).string_len(64).not_null())
                    .col(ColumnDef::new(DepositRequests::Amount).decimal_len(20, 8).not_null())
                    .col(ColumnDef::new(DepositRequests::Method).string().not_null())
                    .col(ColumnDef::new(DepositRequests::Status).string_len(16).not_null().default("pending"))
                    .col(ColumnDef::new(DepositRequests::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(DepositRequests::ReviewedAt).timestamp().null())
                    .index(
                        Index::create()
                            .name("idx_deposit_requests_status")
                            .table(DepositRequests::Table)
                            .col(DepositRequests::Status)
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_deposit_requests_user")
                            .from(DepositRequests::Table, DepositRequests::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DepositRequests::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(WalletTransactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Email,
    FullName,
    Status,
    AdminNote,
    WalletBalance,
    InvestedBalance,
    PendingDeposits,
    PendingWithdrawals,
    AccountBalance,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum WalletTransactions {
    Table,
    Id,
    UserId,
    Kind,
    Amount,
    Description,
    CreatedAt,
}

#[derive(DeriveIden)]
enum DepositRequests {
    Table,
    Id,
    UserId,
    Amount,
    Method,
    Status,
    CreatedAt,
    ReviewedAt,
}
