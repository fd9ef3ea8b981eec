use migration::{Migrator, MigratorTrait};
use shared::{get_db_connection, Config};
use std::sync::Arc;

use crate::repositories::{MemoryRepository, Repository, SeaOrmRepository};
use crate::services::accrual::AccrualDefaults;

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn Repository>,
    pub cron_secret: Option<String>,
    pub accrual_defaults: AccrualDefaults,
}

impl AppState {
    pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
        let repo: Arc<dyn Repository> = if config.uses_memory_store() {
            tracing::warn!("Using in-memory store; data is lost on shutdown");
            Arc::new(MemoryRepository::new())
        } else {
            let db = get_db_connection(&config.database_url).await?;
            if config.run_migrations {
                Migrator::up(&db, None).await?;
                tracing::info!("Database migrations applied");
            }
            tracing::info!("Connected to database successfully");
            Arc::new(SeaOrmRepository::new(Arc::new(db)))
        };

        Ok(Self::with_repository(repo, config))
    }

    pub fn with_repository(repo: Arc<dyn Repository>, config: &Config) -> Self {
        AppState {
            repo,
            cron_secret: config.cron_secret.clone(),
            accrual_defaults: AccrualDefaults {
                roi_rate: config.default_roi_rate,
                duration_days: config.default_duration_days,
            },
        }
    }
}
