use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};
use uuid::Uuid;
use chrono::Utc;

use crate::services::recalculation_service::RecalculationService;

/// Runs `recalculate_all` in-process on a cron schedule.
pub struct SchedulerService {
    scheduler: Arc<Mutex<JobScheduler>>,
    recalculation: Arc<RecalculationService>,
    job_id: Mutex<Option<Uuid>>,
}

impl SchedulerService {
    pub async fn new(recalculation: Arc<RecalculationService>) -> Result<Self, JobSchedulerError> {
        let scheduler = JobScheduler::new().await?;

        Ok(Self {
            scheduler: Arc::new(Mutex::new(scheduler)),
            recalculation,
            job_id: Mutex::new(None),
        })
    }

    pub async fn start(&self) -> Result<(), JobSchedulerError> {
        let scheduler = self.scheduler.lock().await;
        scheduler.start().await?;

        tracing::info!("✅ Scheduler service started successfully");
        Ok(())
    }

    pub async fn stop(&self) -> Result<(), JobSchedulerError> {
        let mut scheduler = self.scheduler.lock().await;
        scheduler.shutdown().await?;

        tracing::info!("🛑 Scheduler service stopped");
        Ok(())
    }

    /// Register the recomputation job. Replaces a previously registered one.
    pub async fn schedule_recalculation(&self, cron_expr: &str) -> Result<Uuid, JobSchedulerError> {
        let recalculation = self.recalculation.clone();

        let job = Job::new_async(cron_expr, move |_uuid, _l| {
            let recalculation = recalculation.clone();

            Box::pin(async move {
                tracing::info!("🎮 Running scheduled recomputation");

                match recalculation.recalculate_all(Utc::now()).await {
                    Ok(reports) => {
                        let failed = reports.iter().filter(|r| !r.is_success()).count();
                        tracing::info!("✅ Scheduled recomputation finished: {} rounds, {} failed",
                            reports.len(), failed);
                    }
                    Err(e) => {
                        tracing::error!("❌ Scheduled recomputation failed: {}", e);
                    }
                }
            })
        })?;

        let job_id = job.guid();
        // Lock order is always scheduler, then job_id
        let scheduler = self.scheduler.lock().await;
        let mut current = self.job_id.lock().await;

        if let Some(previous) = *current {
            scheduler.remove(&previous).await?;
            *current = None;
        }
        scheduler.add(job).await?;
        *current = Some(job_id);

        tracing::info!("✅ Scheduled recomputation with cron '{}'", cron_expr);
        Ok(job_id)
    }

    pub async fn unschedule_recalculation(&self) -> Result<(), JobSchedulerError> {
        let scheduler = self.scheduler.lock().await;
        let mut current = self.job_id.lock().await;

        if let Some(job_id) = *current {
            scheduler.remove(&job_id).await?;
            *current = None;
            tracing::info!("✅ Removed scheduled recomputation {}", job_id);
        }
        Ok(())
    }

    pub async fn scheduled_job(&self) -> Option<Uuid> {
        *self.job_id.lock().await
    }
}
