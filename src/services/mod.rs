pub mod achievement_service;
pub mod auth_service;
pub mod education_service;
pub mod job_scheduler_service;
pub mod order_service;
pub mod portfolio_service;
pub mod position_service;
pub mod security_service;
pub mod transaction_service;
pub mod user_service;
pub mod watchlist_service;
