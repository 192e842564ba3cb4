use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// A user-curated list of securities tracked without ownership.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Watchlist {
    pub id: uuid::Uuid,
    pub user_id: uuid::Uuid,
    pub name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateWatchlist {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WatchlistItem {
    pub id: uuid::Uuid,
    pub watchlist_id: uuid::Uuid,
    pub security_id: uuid::Uuid,
    pub added_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize)]
pub struct AddWatchlistItem {
    pub security_id: uuid::Uuid,
}

// Item joined with its security symbol and a live quote for display.
#[derive(Debug, Serialize)]
pub struct WatchlistEntry {
    pub security_id: uuid::Uuid,
    pub symbol: String,
    pub name: String,
    pub price: Option<bigdecimal::BigDecimal>,
    pub as_of: Option<chrono::DateTime<chrono::Utc>>,
}
