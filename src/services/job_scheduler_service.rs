use std::future::Future;
use std::sync::Arc;

use sqlx::PgPool;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};

use crate::errors::AppError;
use crate::jobs::{order_expiry_job, session_cleanup_job, transaction_settlement_job};

// Context passed to job functions.
#[derive(Clone)]
pub struct JobContext {
    pub pool: Arc<PgPool>,
}

pub struct JobSchedulerService {
    scheduler: JobScheduler,
    context: JobContext,
}

impl JobSchedulerService {
    pub async fn new(pool: Arc<PgPool>) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::External(format!("Failed to create scheduler: {}", e)))?;
        Ok(Self {
            scheduler,
            context: JobContext { pool },
        })
    }

    /// Registers and starts all sweeps. With JOB_SCHEDULER_TEST_MODE=true
    /// everything runs on a minute-scale cadence instead.
    pub async fn start(&mut self) -> Result<(), AppError> {
        info!("🚀 Starting job scheduler...");

        let test_mode = std::env::var("JOB_SCHEDULER_TEST_MODE")
            .unwrap_or_else(|_| "false".to_string())
            .parse::<bool>()
            .unwrap_or(false);
        if test_mode {
            info!("⚠️  JOB SCHEDULER IN TEST MODE - sweeps run every minute!");
        }

        // Cron format: sec min hour day month weekday.
        let expiry_schedule = if test_mode { "0 */1 * * * *" } else { "0 */5 * * * *" };
        self.schedule_job(expiry_schedule, "order_expiry", order_expiry_job::run).await?;

        let settlement_schedule = if test_mode { "0 */1 * * * *" } else { "0 15 * * * *" };
        self.schedule_job(settlement_schedule, "transaction_settlement", transaction_settlement_job::run)
            .await?;

        let cleanup_schedule = if test_mode { "0 */2 * * * *" } else { "0 0 3 * * *" };
        self.schedule_job(cleanup_schedule, "session_cleanup", session_cleanup_job::run).await?;

        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::External(format!("Failed to start scheduler: {}", e)))?;
        info!("✅ Job scheduler started");
        Ok(())
    }

    async fn schedule_job<F, Fut>(&mut self, cron: &str, name: &'static str, job_fn: F) -> Result<(), AppError>
    where
        F: Fn(JobContext) -> Fut + Send + Sync + Clone + 'static,
        Fut: Future<Output = Result<(), AppError>> + Send + 'static,
    {
        let context = self.context.clone();
        let job = Job::new_async(cron, move |_id, _scheduler| {
            let context = context.clone();
            let job_fn = job_fn.clone();
            Box::pin(async move {
                info!("⏰ Running job: {}", name);
                if let Err(e) = job_fn(context).await {
                    error!("Job {} failed: {}", name, e);
                }
            })
        })
        .map_err(|e| AppError::External(format!("Failed to build job {}: {}", name, e)))?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::External(format!("Failed to schedule job {}: {}", name, e)))?;
        info!("📅 Scheduled job {} ({})", name, cron);
        Ok(())
    }
}
