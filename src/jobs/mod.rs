//! Background Jobs Module
//!
//! Periodic sweeps scheduled and executed by the job scheduler service.
//! They run independently of user requests and carry no cross-job
//! coordination.
//!
//! # Available Jobs
//!
//! - `order_expiry_job` - Expires active orders whose expiry date has passed
//! - `transaction_settlement_job` - Settles transactions whose settlement date has arrived
//! - `session_cleanup_job` - Deletes expired and revoked auth sessions
//!
//! # Job Architecture
//!
//! Jobs in this module are designed to be:
//! - Idempotent: Can be safely re-run without side effects
//! - Fault-tolerant: A failing record is logged and retried on the next run
//! - Observable: Counts and failures are logged for monitoring
//!
//! Each job is registered with the scheduler and executed on a cron
//! schedule; JOB_SCHEDULER_TEST_MODE compresses all schedules to minutes.

pub mod order_expiry_job;
pub mod session_cleanup_job;
pub mod transaction_settlement_job;
