use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use common::ScheduleConfig;
use time::OffsetDateTime;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};

/// Six-field cron expression (seconds first) firing once a day at `hour:minute` UTC.
pub fn daily_cron(schedule: &ScheduleConfig) -> Result<String> {
    if schedule.hour > 23 || schedule.minute > 59 {
        anyhow::bail!(
            "invalid daily schedule {:02}:{:02}",
            schedule.hour,
            schedule.minute
        );
    }
    Ok(format!("0 {} {} * * *", schedule.minute, schedule.hour))
}

pub struct DailyScheduler {
    scheduler: JobScheduler,
}

impl DailyScheduler {
    pub async fn new() -> Result<Self> {
        Ok(Self {
            scheduler: JobScheduler::new().await?,
        })
    }

    pub async fn add_daily_job<F, Fut>(&mut self, schedule: &ScheduleConfig, job_fn: F) -> Result<()>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        let cron_expression = daily_cron(schedule)?;
        info!("Scheduling daily scan with cron: {}", cron_expression);

        let job_fn = Arc::new(job_fn);
        let job = Job::new_async(cron_expression.as_str(), move |_uuid, _l| {
            let job_fn = Arc::clone(&job_fn);
            Box::pin(async move {
                info!("Running scheduled scan at {}", OffsetDateTime::now_utc());
                match job_fn().await {
                    Ok(()) => info!("Scheduled scan completed"),
                    Err(e) => error!("Scheduled scan failed: {:#}", e),
                }
            })
        })?;

        self.scheduler.add(job).await?;
        Ok(())
    }

    pub async fn start(&self) -> Result<()> {
        info!("Starting scheduler...");
        self.scheduler.start().await?;
        Ok(())
    }

    pub async fn shutdown(&mut self) -> Result<()> {
        info!("Shutting down scheduler...");
        self.scheduler.shutdown().await?;
        Ok(())
    }
}
