pub use sea_orm_migration::prelude::*;

mod m20261001_000001_create_users_and_wallet;
mod m20261001_000002_create_investment_tables;
mod m20261001_000003_create_job_runs;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261001_000001_create_users_and_wallet::Migration),
            Box::new(m20261001_000002_create_investment_tables::Migration),
            Box::new(m20261001_000003_create_job_runs::Migration),
        ]
    }
}
