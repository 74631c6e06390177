use anyhow::Result;
use sqlx::PgPool;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::services::PollService;

/// Start the background job that closes polls past their deadline.
/// Runs at the top of every minute.
pub async fn start_poll_scheduler(db: PgPool) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    let job = Job::new_async("0 * * * * *", move |_uuid, _lock| {
        let db = db.clone();
        Box::pin(async move {
            let poll_service = PollService::new(db);
            match poll_service.close_expired_polls().await {
                Ok(0) => {}
                Ok(closed) => tracing::info!("Closed {closed} expired polls"),
                Err(e) => tracing::warn!("Failed to close expired polls: {e}"),
            }
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;

    tracing::info!("Poll deadline scheduler started");

    Ok(scheduler)
}
