use anyhow::Result;
use common::Config;
use scheduler::DailyScheduler;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

async fn run_daily_scan() -> Result<()> {
    let config = Config::from_env()?;
    let summary = monitor::run_scan(&config, &[]).await?;
    info!(
        "Daily scan finished: {} events, {} critical, {} sector alerts",
        summary.counts.total,
        summary.counts.critical,
        summary.correlation.sector_alerts.len()
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenv::dotenv();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Config::from_env()?;
    config.require_sources_path()?;

    let mut scheduler = DailyScheduler::new().await?;
    scheduler
        .add_daily_job(&config.schedule, || async { run_daily_scan().await })
        .await?;
    scheduler.start().await?;

    info!(
        "Scheduler configured to scan daily at {:02}:{:02} UTC",
        config.schedule.hour, config.schedule.minute
    );
    info!("Press Ctrl+C to stop the scheduler");

    tokio::signal::ctrl_c().await?;
    info!("Received interrupt signal, shutting down...");
    scheduler.shutdown().await?;

    Ok(())
}
