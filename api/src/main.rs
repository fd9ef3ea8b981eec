use anyhow::Result;
use shared::Config;
use tracing::info;
use tracing_subscriber::EnvFilter;
use yieldboard_api::{router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if config.json_logs {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    info!("Starting Yieldboard admin API...");
    if config.cron_secret.is_none() {
        tracing::warn!("CRON_SECRET is not set; the daily ROI endpoint will reject every call");
    }

    let state = AppState::new(&config).await?;
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("API server listening on http://{}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
