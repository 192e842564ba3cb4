use serde_json::json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::db::{audit_queries, portfolio_queries, position_queries, transaction_queries};
use crate::errors::AppError;
use crate::models::{
    CashMovement, CreatePortfolio, Portfolio, Transaction, TransactionType, UpdatePortfolio,
};
use crate::services::achievement_service;
use crate::state::TradingConfig;

pub async fn create(pool: &PgPool, user_id: Uuid, input: CreatePortfolio) -> Result<Portfolio, AppError> {
    let name = input.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::Validation("Portfolio name cannot be empty".into()));
    }
    if portfolio_queries::name_taken(pool, user_id, &name).await? {
        return Err(AppError::AlreadyExists(format!("Portfolio '{}'", name)));
    }
    let portfolio = portfolio_queries::insert(pool, &Portfolio::new(user_id, name)).await?;
    Ok(portfolio)
}

pub async fn fetch_all(pool: &PgPool, user_id: Uuid) -> Result<Vec<Portfolio>, AppError> {
    Ok(portfolio_queries::fetch_all_for_user(pool, user_id).await?)
}

/// Fetches a portfolio and enforces that the caller owns it.
pub async fn fetch_owned(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<Portfolio, AppError> {
    let portfolio = portfolio_queries::fetch_one(pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Portfolio".into()))?;
    if portfolio.user_id != user_id {
        return Err(AppError::Forbidden);
    }
    Ok(portfolio)
}

pub async fn rename(
    pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
    input: UpdatePortfolio,
) -> Result<Portfolio, AppError> {
    let name = input.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::Validation("Portfolio name cannot be empty".into()));
    }
    let current = fetch_owned(pool, id, user_id).await?;
    if current.name != name && portfolio_queries::name_taken(pool, user_id, &name).await? {
        return Err(AppError::AlreadyExists(format!("Portfolio '{}'", name)));
    }
    portfolio_queries::rename(pool, id, &name)
        .await?
        .ok_or_else(|| AppError::NotFound("Portfolio".into()))
}

/// Soft-deletes the portfolio and removes its positions. The ORM-style
/// cascade is explicit here at the service layer.
pub async fn delete(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<(), AppError> {
    fetch_owned(pool, id, user_id).await?;
    let mut tx = pool.begin().await?;
    let removed = position_queries::delete_by_portfolio(&mut *tx, id).await?;
    let affected = portfolio_queries::soft_delete(&mut *tx, id).await?;
    if affected == 0 {
        return Err(AppError::NotFound("Portfolio".into()));
    }
    audit_queries::insert(
        &mut *tx,
        Some(user_id),
        "portfolio.delete",
        "portfolio",
        Some(id),
        json!({ "positions_removed": removed }),
    )
    .await?;
    tx.commit().await?;
    info!("Deleted portfolio {} ({} positions removed)", id, removed);
    Ok(())
}

/// Adds cash and records a DEPOSIT transaction atomically.
pub async fn deposit(
    pool: &PgPool,
    trading: &TradingConfig,
    id: Uuid,
    user_id: Uuid,
    input: CashMovement,
) -> Result<(Portfolio, Transaction), AppError> {
    let mut portfolio = fetch_owned(pool, id, user_id).await?;
    portfolio.add_cash(&input.amount)?;

    let mut tx = pool.begin().await?;
    let updated = portfolio_queries::update_balances(
        &mut *tx,
        id,
        &portfolio.cash_balance,
        &portfolio.total_value,
        portfolio.version,
    )
    .await?
    .ok_or_else(|| AppError::Conflict("Portfolio was modified concurrently".into()))?;
    let record = transaction_queries::insert(
        &mut *tx,
        &Transaction::for_cash_event(id, TransactionType::Deposit, input.amount.clone(), trading.settlement_days),
    )
    .await?;
    audit_queries::insert(
        &mut *tx,
        Some(user_id),
        "portfolio.deposit",
        "portfolio",
        Some(id),
        json!({ "amount": input.amount.to_string(), "transaction_id": record.id }),
    )
    .await?;
    achievement_service::on_first_deposit(&mut tx, user_id).await?;
    tx.commit().await?;
    Ok((updated, record))
}

/// Subtracts cash and records a WITHDRAWAL transaction atomically; fails
/// without effect when cash is short.
pub async fn withdraw(
    pool: &PgPool,
    trading: &TradingConfig,
    id: Uuid,
    user_id: Uuid,
    input: CashMovement,
) -> Result<(Portfolio, Transaction), AppError> {
    let mut portfolio = fetch_owned(pool, id, user_id).await?;
    portfolio.subtract_cash(&input.amount)?;

    let mut tx = pool.begin().await?;
    let updated = portfolio_queries::update_balances(
        &mut *tx,
        id,
        &portfolio.cash_balance,
        &portfolio.total_value,
        portfolio.version,
    )
    .await?
    .ok_or_else(|| AppError::Conflict("Portfolio was modified concurrently".into()))?;
    let record = transaction_queries::insert(
        &mut *tx,
        &Transaction::for_cash_event(id, TransactionType::Withdrawal, input.amount.clone(), trading.settlement_days),
    )
    .await?;
    audit_queries::insert(
        &mut *tx,
        Some(user_id),
        "portfolio.withdraw",
        "portfolio",
        Some(id),
        json!({ "amount": input.amount.to_string(), "transaction_id": record.id }),
    )
    .await?;
    tx.commit().await?;
    Ok((updated, record))
}
