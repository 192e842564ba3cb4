mod achievement;
mod audit;
mod education;
pub mod enums;
mod order;
mod portfolio;
mod position;
mod security;
mod transaction;
mod user;
mod watchlist;

pub use achievement::{Achievement, EarnedAchievement, UserAchievement};
pub use achievement::{DIVERSIFIED, FIRST_DEPOSIT, FIRST_TRADE, LESSON_COMPLETE};
pub use audit::{AuditQuery, AuditRecord};
pub use education::{Lesson, LessonProgress};
pub use enums::{
    AccountStatus, OrderSide, OrderStatus, OrderType, ProgressStatus, RiskTolerance, SecurityType,
    TransactionStatus, TransactionType,
};
pub use order::{CancelOrder, CreateOrder, ExecuteOrder, Order};
pub use portfolio::{CashMovement, CreatePortfolio, Portfolio, UpdatePortfolio};
pub use position::Position;
pub use security::{CreateSecurity, Security};
pub use transaction::{Transaction, TransactionFilter};
pub use user::{LoginUser, RegisterUser, Session, UpdateProfile, User, UserProfile};
pub use watchlist::{AddWatchlistItem, CreateWatchlist, Watchlist, WatchlistEntry, WatchlistItem};
