use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Audit trail of scheduler invocations
        manager
            .create_table(
                Table::create()
                    .table(JobRuns::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(JobRuns::Id).big_unsigned().auto_increment().primary_key())
                    .col(ColumnDef::new(JobRuns::ExecutedAt).timestamp().not_null())
                    .col(ColumnDef::new(JobRuns::Message).string().not_null())
                    .col(ColumnDef::new(JobRuns::UsersUpdated).integer().null())
                    .col(ColumnDef::new(JobRuns::SkippedUsers).integer().null())
                    .col(ColumnDef::new(JobRuns::Error).text().null())
                    .index(
                        Index::create()
                            .name("idx_job_runs_executed_at")
                            .table(JobRuns::Table)
                            .col(JobRuns::ExecutedAt)
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(JobRuns::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum JobRuns {
    Table,
    Id,
    ExecutedAt,
    Message,
    UsersUpdated,
    SkippedUsers,
    Error,
}
