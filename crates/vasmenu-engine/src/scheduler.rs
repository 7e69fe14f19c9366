//! Background sync scheduling.
//!
//! Arms one independent repeating job per provider at that provider's
//! configured interval. Jobs are not synchronized with each other, and a
//! forced sync may overlap a scheduled one for the same provider — the
//! last completed run wins.

use std::sync::Arc;
use std::time::Duration;

use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use crate::service::CatalogService;

/// Run the initial sync pass, then build and start the recurring
/// per-provider jobs.
///
/// Returns the running [`JobScheduler`] handle, which must be kept alive
/// for the lifetime of the process — dropping it shuts down all jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// a job cannot be registered, or the scheduler fails to start.
pub async fn start(service: Arc<CatalogService>) -> Result<JobScheduler, JobSchedulerError> {
    let reports = service.sync_all().await;
    let synced = reports.iter().filter(|r| r.synced).count();
    tracing::info!(
        providers = reports.len(),
        synced,
        "initial catalog sync pass complete"
    );
    build_scheduler(service).await
}

/// Build and start the recurring jobs without an initial sync pass.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] on scheduler initialisation, registration,
/// or start failure.
pub async fn build_scheduler(
    service: Arc<CatalogService>,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    let intervals: Vec<(String, u64)> = service
        .providers()
        .iter()
        .map(|conn| (conn.id.clone(), conn.sync_interval_secs))
        .collect();

    for (provider_id, interval_secs) in intervals {
        register_sync_job(&scheduler, Arc::clone(&service), provider_id, interval_secs).await?;
    }

    scheduler.start().await?;
    Ok(scheduler)
}

/// Register one repeating sync job for one provider.
async fn register_sync_job(
    scheduler: &JobScheduler,
    service: Arc<CatalogService>,
    provider_id: String,
    interval_secs: u64,
) -> Result<(), JobSchedulerError> {
    let job = Job::new_repeated_async(Duration::from_secs(interval_secs), move |_uuid, _lock| {
        let service = Arc::clone(&service);
        let provider_id = provider_id.clone();

        Box::pin(async move {
            tracing::debug!(provider = %provider_id, "scheduler: starting catalog sync");
            match service.sync_provider(&provider_id).await {
                Ok(report) if report.synced => {
                    tracing::debug!(
                        provider = %provider_id,
                        count = report.product_count,
                        "scheduler: catalog sync complete"
                    );
                }
                Ok(_) => {
                    // run_sync already logged the failure detail.
                }
                Err(e) => {
                    tracing::error!(provider = %provider_id, error = %e, "scheduler: sync rejected");
                }
            }
        })
    })?;

    scheduler.add(job).await?;
    Ok(())
}
