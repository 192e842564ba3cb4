use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{security_queries, watchlist_queries};
use crate::errors::AppError;
use crate::external::price_provider::PriceProvider;
use crate::models::{AddWatchlistItem, CreateWatchlist, Watchlist, WatchlistEntry, WatchlistItem};

async fn fetch_owned(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<Watchlist, AppError> {
    let watchlist = watchlist_queries::fetch_one(pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Watchlist".into()))?;
    if watchlist.user_id != user_id {
        return Err(AppError::Forbidden);
    }
    Ok(watchlist)
}

pub async fn create(pool: &PgPool, user_id: Uuid, input: CreateWatchlist) -> Result<Watchlist, AppError> {
    let name = input.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::Validation("Watchlist name cannot be empty".into()));
    }
    if watchlist_queries::name_taken(pool, user_id, &name).await? {
        return Err(AppError::AlreadyExists(format!("Watchlist '{}'", name)));
    }
    let watchlist = Watchlist {
        id: Uuid::new_v4(),
        user_id,
        name,
        created_at: chrono::Utc::now(),
    };
    Ok(watchlist_queries::insert(pool, &watchlist).await?)
}

pub async fn list(pool: &PgPool, user_id: Uuid) -> Result<Vec<Watchlist>, AppError> {
    Ok(watchlist_queries::fetch_all_for_user(pool, user_id).await?)
}

pub async fn delete(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<(), AppError> {
    fetch_owned(pool, id, user_id).await?;
    match watchlist_queries::delete(pool, id).await? {
        0 => Err(AppError::NotFound("Watchlist".into())),
        _ => Ok(()),
    }
}

pub async fn add_item(
    pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
    input: AddWatchlistItem,
) -> Result<WatchlistItem, AppError> {
    fetch_owned(pool, id, user_id).await?;
    let security = security_queries::fetch_one(pool, input.security_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Security".into()))?;
    if watchlist_queries::item_exists(pool, id, security.id).await? {
        return Err(AppError::AlreadyExists(format!("{} on this watchlist", security.symbol)));
    }
    let item = WatchlistItem {
        id: Uuid::new_v4(),
        watchlist_id: id,
        security_id: security.id,
        added_at: chrono::Utc::now(),
    };
    Ok(watchlist_queries::insert_item(pool, &item).await?)
}

pub async fn remove_item(
    pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
    security_id: Uuid,
) -> Result<(), AppError> {
    fetch_owned(pool, id, user_id).await?;
    match watchlist_queries::delete_item(pool, id, security_id).await? {
        0 => Err(AppError::NotFound("Watchlist item".into())),
        _ => Ok(()),
    }
}

/// Items joined with security metadata and a best-effort live quote; a
/// failing oracle degrades to entries without prices rather than a 502.
pub async fn list_entries(
    pool: &PgPool,
    provider: &dyn PriceProvider,
    id: Uuid,
    user_id: Uuid,
) -> Result<Vec<WatchlistEntry>, AppError> {
    fetch_owned(pool, id, user_id).await?;
    let items = watchlist_queries::fetch_items(pool, id).await?;
    let mut entries = Vec::with_capacity(items.len());
    for item in items {
        let security = security_queries::fetch_one(pool, item.security_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Security".into()))?;
        let quote = provider.quote(&security.symbol).await.ok();
        entries.push(WatchlistEntry {
            security_id: security.id,
            symbol: security.symbol,
            name: security.name,
            price: quote.as_ref().map(|q| q.price.clone()),
            as_of: quote.map(|q| q.as_of),
        });
    }
    Ok(entries)
}
