use std::sync::Arc;

use anyhow::Result;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};

use variant_tracker::{AdapterRegistry, Database, TrackingJob};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    info!("Starting variant price tracker");

    let database = Database::new().await?;
    let registry = Arc::new(AdapterRegistry::new()?);
    let job = TrackingJob::new(registry, database);

    // Run once immediately so a fresh deployment records data right away
    run_cycle(&job).await;

    let schedule =
        std::env::var("TRACKER_CRON").unwrap_or_else(|_| "0 */10 * * * *".to_string());

    let sched = JobScheduler::new().await?;

    let cycle_job = job.clone();
    sched
        .add(Job::new_async(schedule.as_str(), move |_uuid, _l| {
            let job = cycle_job.clone();
            Box::pin(async move {
                run_cycle(&job).await;
            })
        })?)
        .await?;

    info!("Scheduler started with cadence {}", schedule);
    sched.start().await?;

    // Keep the program running
    loop {
        tokio::time::sleep(tokio::time::Duration::from_secs(30)).await;
    }
}

async fn run_cycle(job: &TrackingJob) {
    match job.run_once().await {
        Ok(Some(report)) => match serde_json::to_string(&report) {
            Ok(line) => info!("Cycle report: {line}"),
            Err(e) => error!("Failed to serialize cycle report: {e}"),
        },
        Ok(None) => {}
        Err(e) => error!("Tracking cycle aborted: {e}"),
    }
}
