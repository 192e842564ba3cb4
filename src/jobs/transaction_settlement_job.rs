//! Transaction Settlement Background Job
//!
//! Marks PENDING transactions whose `settlement_date` has arrived as
//! COMPLETED and stamps `settled_at`. Cash and position effects were
//! applied when the transaction was created, so settlement is bookkeeping
//! only (T+n finalization, no deferred cash movement).
//!
//! Each record settles in its own guarded UPDATE; rows settled by a
//! concurrent run are skipped and the sweep is idempotent.

use tracing::info;

use crate::errors::AppError;
use crate::services::job_scheduler_service::JobContext;
use crate::services::transaction_service;

pub async fn run(context: JobContext) -> Result<(), AppError> {
    let settled = transaction_service::settle_due(&context.pool).await?;
    if settled > 0 {
        info!("🧾 Settled {} transactions", settled);
    }
    Ok(())
}
