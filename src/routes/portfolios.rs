use axum::extract::{Path, State};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use http::StatusCode;
use tracing::{error, info};
use uuid::Uuid;

use crate::auth::Claims;
use crate::errors::AppError;
use crate::models::{CashMovement, CreatePortfolio, Portfolio, Transaction, UpdatePortfolio};
use crate::services::portfolio_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_portfolio).get(fetch_portfolios))
        .route("/:id", get(get_portfolio))
        .route("/:id", put(update_portfolio))
        .route("/:id", delete(delete_portfolio))
        .route("/:id/deposit", post(deposit))
        .route("/:id/withdraw", post(withdraw))
}

#[derive(serde::Serialize)]
pub struct CashMovementResponse {
    pub portfolio: Portfolio,
    pub transaction: Transaction,
}

pub async fn create_portfolio(
    State(state): State<AppState>,
    claims: Claims,
    Json(data): Json<CreatePortfolio>,
) -> Result<(StatusCode, Json<Portfolio>), AppError> {
    info!("POST /portfolios - Creating new portfolio");
    let portfolio = portfolio_service::create(&state.pool, claims.sub, data)
        .await
        .map_err(|e| {
            error!("Failed to create portfolio: {}", e);
            e
        })?;
    Ok((StatusCode::CREATED, Json(portfolio)))
}

pub async fn fetch_portfolios(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<Json<Vec<Portfolio>>, AppError> {
    info!("GET /portfolios - Fetching portfolios for {}", claims.sub);
    let portfolios = portfolio_service::fetch_all(&state.pool, claims.sub).await?;
    Ok(Json(portfolios))
}

pub async fn get_portfolio(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<Uuid>,
) -> Result<Json<Portfolio>, AppError> {
    info!("GET /portfolios/{} - Fetching portfolio", id);
    let portfolio = portfolio_service::fetch_owned(&state.pool, id, claims.sub).await?;
    Ok(Json(portfolio))
}

pub async fn update_portfolio(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdatePortfolio>,
) -> Result<Json<Portfolio>, AppError> {
    info!("PUT /portfolios/{} - Updating portfolio", id);
    let portfolio = portfolio_service::rename(&state.pool, id, claims.sub, data)
        .await
        .map_err(|e| {
            error!("Failed to update portfolio {}: {}", id, e);
            e
        })?;
    Ok(Json(portfolio))
}

pub async fn delete_portfolio(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<Uuid>,
) -> Result<Json<()>, AppError> {
    info!("DELETE /portfolios/{} - Deleting portfolio", id);
    portfolio_service::delete(&state.pool, id, claims.sub).await.map_err(|e| {
        error!("Failed to delete portfolio {}: {}", id, e);
        e
    })?;
    Ok(Json(()))
}

pub async fn deposit(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<Uuid>,
    Json(data): Json<CashMovement>,
) -> Result<(StatusCode, Json<CashMovementResponse>), AppError> {
    info!("POST /portfolios/{}/deposit - Depositing cash", id);
    let (portfolio, transaction) =
        portfolio_service::deposit(&state.pool, &state.trading, id, claims.sub, data)
            .await
            .map_err(|e| {
                error!("Deposit to portfolio {} failed: {}", id, e);
                e
            })?;
    Ok((StatusCode::CREATED, Json(CashMovementResponse { portfolio, transaction })))
}

pub async fn withdraw(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<Uuid>,
    Json(data): Json<CashMovement>,
) -> Result<(StatusCode, Json<CashMovementResponse>), AppError> {
    info!("POST /portfolios/{}/withdraw - Withdrawing cash", id);
    let (portfolio, transaction) =
        portfolio_service::withdraw(&state.pool, &state.trading, id, claims.sub, data)
            .await
            .map_err(|e| {
                error!("Withdrawal from portfolio {} failed: {}", id, e);
                e
            })?;
    Ok((StatusCode::CREATED, Json(CashMovementResponse { portfolio, transaction })))
}
