//! Session Cleanup Background Job
//!
//! Deletes auth sessions that are past expiry or explicitly revoked. Tokens
//! referencing a deleted session stop authenticating, so this doubles as
//! the revocation backstop.

use tracing::info;

use crate::db::session_queries;
use crate::errors::AppError;
use crate::services::job_scheduler_service::JobContext;

pub async fn run(context: JobContext) -> Result<(), AppError> {
    let removed = session_cleanup(&context).await?;
    if removed > 0 {
        info!("🧹 Removed {} stale sessions", removed);
    }
    Ok(())
}

async fn session_cleanup(context: &JobContext) -> Result<u64, AppError> {
    Ok(session_queries::delete_stale(&context.pool, chrono::Utc::now()).await?)
}
