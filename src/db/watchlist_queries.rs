use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Watchlist, WatchlistItem};

pub async fn insert(pool: &PgPool, watchlist: &Watchlist) -> Result<Watchlist, sqlx::Error> {
    sqlx::query_as::<_, Watchlist>(
        "INSERT INTO watchlists (id, user_id, name, created_at)
         VALUES ($1, $2, $3, $4)
         RETURNING id, user_id, name, created_at",
    )
    .bind(watchlist.id)
    .bind(watchlist.user_id)
    .bind(&watchlist.name)
    .bind(watchlist.created_at)
    .fetch_one(pool)
    .await
}

pub async fn fetch_one(pool: &PgPool, id: Uuid) -> Result<Option<Watchlist>, sqlx::Error> {
    sqlx::query_as::<_, Watchlist>("SELECT id, user_id, name, created_at FROM watchlists WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn fetch_all_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Watchlist>, sqlx::Error> {
    sqlx::query_as::<_, Watchlist>(
        "SELECT id, user_id, name, created_at FROM watchlists WHERE user_id = $1 ORDER BY created_at",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn name_taken(pool: &PgPool, user_id: Uuid, name: &str) -> Result<bool, sqlx::Error> {
    let row: (bool,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM watchlists WHERE user_id = $1 AND name = $2)")
            .bind(user_id)
            .bind(name)
            .fetch_one(pool)
            .await?;
    Ok(row.0)
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM watchlists WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn insert_item(pool: &PgPool, item: &WatchlistItem) -> Result<WatchlistItem, sqlx::Error> {
    sqlx::query_as::<_, WatchlistItem>(
        "INSERT INTO watchlist_items (id, watchlist_id, security_id, added_at)
         VALUES ($1, $2, $3, $4)
         ON CONFLICT (watchlist_id, security_id) DO NOTHING
         RETURNING id, watchlist_id, security_id, added_at",
    )
    .bind(item.id)
    .bind(item.watchlist_id)
    .bind(item.security_id)
    .bind(item.added_at)
    .fetch_one(pool)
    .await
}

pub async fn item_exists(
    pool: &PgPool,
    watchlist_id: Uuid,
    security_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let row: (bool,) = sqlx::query_as(
        "SELECT EXISTS(SELECT 1 FROM watchlist_items WHERE watchlist_id = $1 AND security_id = $2)",
    )
    .bind(watchlist_id)
    .bind(security_id)
    .fetch_one(pool)
    .await?;
    Ok(row.0)
}

pub async fn fetch_items(pool: &PgPool, watchlist_id: Uuid) -> Result<Vec<WatchlistItem>, sqlx::Error> {
    sqlx::query_as::<_, WatchlistItem>(
        "SELECT id, watchlist_id, security_id, added_at
         FROM watchlist_items WHERE watchlist_id = $1 ORDER BY added_at",
    )
    .bind(watchlist_id)
    .fetch_all(pool)
    .await
}

pub async fn delete_item(
    pool: &PgPool,
    watchlist_id: Uuid,
    security_id: Uuid,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM watchlist_items WHERE watchlist_id = $1 AND security_id = $2")
        .bind(watchlist_id)
        .bind(security_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
