use anyhow::{Error, Result, anyhow};
use prereg_notify::{api, config::Config, scheduler};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::load()?;

    let scheduler_config = config.clone();
    tokio::spawn(async move {
        if let Err(e) = scheduler::run(scheduler_config).await {
            error!(error = %e, "Reminder scheduler stopped");
        }
    });

    api::run_api_server(config)
        .await
        .map_err(|e| anyhow!("API server failed: {e}"))
}
