use axum::extract::{Path, State};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use http::StatusCode;
use tracing::{error, info};
use uuid::Uuid;

use crate::auth::Claims;
use crate::errors::AppError;
use crate::models::{AddWatchlistItem, CreateWatchlist, Watchlist, WatchlistEntry, WatchlistItem};
use crate::services::watchlist_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_watchlist).get(list_watchlists))
        .route("/:id", delete(delete_watchlist))
        .route("/:id/items", post(add_item).get(list_items))
        .route("/:id/items/:security_id", delete(remove_item))
}

pub async fn create_watchlist(
    State(state): State<AppState>,
    claims: Claims,
    Json(data): Json<CreateWatchlist>,
) -> Result<(StatusCode, Json<Watchlist>), AppError> {
    info!("POST /watchlists - Creating watchlist");
    let watchlist = watchlist_service::create(&state.pool, claims.sub, data).await.map_err(|e| {
        error!("Failed to create watchlist: {}", e);
        e
    })?;
    Ok((StatusCode::CREATED, Json(watchlist)))
}

pub async fn list_watchlists(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<Json<Vec<Watchlist>>, AppError> {
    info!("GET /watchlists - Listing watchlists for {}", claims.sub);
    let watchlists = watchlist_service::list(&state.pool, claims.sub).await?;
    Ok(Json(watchlists))
}

pub async fn delete_watchlist(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<Uuid>,
) -> Result<Json<()>, AppError> {
    info!("DELETE /watchlists/{} - Deleting watchlist", id);
    watchlist_service::delete(&state.pool, id, claims.sub).await?;
    Ok(Json(()))
}

pub async fn add_item(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<Uuid>,
    Json(data): Json<AddWatchlistItem>,
) -> Result<(StatusCode, Json<WatchlistItem>), AppError> {
    info!("POST /watchlists/{}/items - Adding item", id);
    let item = watchlist_service::add_item(&state.pool, id, claims.sub, data).await.map_err(|e| {
        error!("Failed to add watchlist item: {}", e);
        e
    })?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn list_items(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<WatchlistEntry>>, AppError> {
    info!("GET /watchlists/{}/items - Listing items", id);
    let entries =
        watchlist_service::list_entries(&state.pool, state.price_provider.as_ref(), id, claims.sub)
            .await?;
    Ok(Json(entries))
}

pub async fn remove_item(
    State(state): State<AppState>,
    claims: Claims,
    Path((id, security_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<()>, AppError> {
    info!("DELETE /watchlists/{}/items/{} - Removing item", id, security_id);
    watchlist_service::remove_item(&state.pool, id, claims.sub, security_id).await?;
    Ok(Json(()))
}
