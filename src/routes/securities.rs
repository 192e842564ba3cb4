use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use http::StatusCode;
use tracing::{error, info};
use uuid::Uuid;

use crate::auth::Claims;
use crate::errors::AppError;
use crate::external::price_provider::Quote;
use crate::models::{CreateSecurity, Security};
use crate::services::security_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_security).get(search_securities))
        .route("/:id", get(get_security))
        .route("/:id/quote", get(get_quote))
}

#[derive(serde::Deserialize)]
pub struct SearchParams {
    pub symbol: Option<String>,
}

#[derive(serde::Serialize)]
pub struct QuoteResponse {
    pub symbol: String,
    pub price: bigdecimal::BigDecimal,
    pub as_of: chrono::DateTime<chrono::Utc>,
}

impl From<Quote> for QuoteResponse {
    fn from(q: Quote) -> Self {
        Self { symbol: q.symbol, price: q.price, as_of: q.as_of }
    }
}

pub async fn create_security(
    State(state): State<AppState>,
    _claims: Claims,
    Json(data): Json<CreateSecurity>,
) -> Result<(StatusCode, Json<Security>), AppError> {
    info!("POST /securities - Creating security {}", data.symbol);
    let security = security_service::create(&state.pool, data).await.map_err(|e| {
        error!("Failed to create security: {}", e);
        e
    })?;
    Ok((StatusCode::CREATED, Json(security)))
}

pub async fn search_securities(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Security>>, AppError> {
    info!("GET /securities - Searching securities");
    let securities = security_service::search(&state.pool, params.symbol.as_deref()).await?;
    Ok(Json(securities))
}

pub async fn get_security(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Security>, AppError> {
    info!("GET /securities/{} - Fetching security", id);
    let security = security_service::fetch_one(&state.pool, id).await?;
    Ok(Json(security))
}

pub async fn get_quote(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<QuoteResponse>, AppError> {
    info!("GET /securities/{}/quote - Fetching quote", id);
    let security = security_service::fetch_one(&state.pool, id).await?;
    let quote = state.price_provider.quote(&security.symbol).await?;
    Ok(Json(quote.into()))
}
