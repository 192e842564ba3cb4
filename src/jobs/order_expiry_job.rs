//! Order Expiry Background Job
//!
//! Finds orders that are still PENDING or PARTIALLY_FILLED past their
//! `expires_at` and transitions them to EXPIRED. Expiry has no cash or
//! position effect; the unfilled remainder simply stops being executable.
//!
//! Each order is transitioned in its own statement with a status guard, so
//! a concurrent fill or cancel wins the race and the sweep skips that row.
//! Re-running the sweep is always safe.

use tracing::info;

use crate::errors::AppError;
use crate::services::job_scheduler_service::JobContext;
use crate::services::order_service;

pub async fn run(context: JobContext) -> Result<(), AppError> {
    let expired = order_service::expire_due(&context.pool).await?;
    if expired > 0 {
        info!("⏳ Expired {} orders", expired);
    }
    Ok(())
}
