pub mod achievement_queries;
pub mod audit_queries;
pub mod education_queries;
pub mod order_queries;
pub mod portfolio_queries;
pub mod position_queries;
pub mod security_queries;
pub mod session_queries;
pub mod transaction_queries;
pub mod user_queries;
pub mod watchlist_queries;
