use bigdecimal::{BigDecimal, Zero};
use serde_json::json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::db::{
    audit_queries, order_queries, portfolio_queries, position_queries, security_queries,
    transaction_queries,
};
use crate::errors::AppError;
use crate::external::price_provider::PriceProvider;
use crate::models::{
    CancelOrder, CreateOrder, ExecuteOrder, Order, OrderSide, OrderStatus, Position, Security,
    Transaction, TransactionType,
};
use crate::services::{achievement_service, portfolio_service};
use crate::state::TradingConfig;

/// One executed fill: the updated order and the transaction it produced.
#[derive(Debug, serde::Serialize)]
pub struct FillOutcome {
    pub order: Order,
    pub transaction: Transaction,
}

async fn fetch_security(pool: &PgPool, id: Uuid) -> Result<Security, AppError> {
    let security = security_queries::fetch_one(pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Security".into()))?;
    if !security.active {
        return Err(AppError::Validation(format!("{} is not tradable", security.symbol)));
    }
    Ok(security)
}

async fn fetch_owned_order(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<Order, AppError> {
    let order = order_queries::fetch_one(pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order".into()))?;
    // Ownership flows through the portfolio.
    portfolio_service::fetch_owned(pool, order.portfolio_id, user_id).await?;
    Ok(order)
}

/// Shape checks that need no database: quantity, the prices the order type
/// requires, and the expiry.
fn validate_submission(input: &CreateOrder) -> Result<(), AppError> {
    if input.quantity <= BigDecimal::zero() {
        return Err(AppError::Validation("Order quantity must be positive".into()));
    }
    if input.order_type.requires_limit_price() {
        match &input.limit_price {
            Some(p) if *p > BigDecimal::zero() => {}
            Some(_) => return Err(AppError::Validation("Limit price must be positive".into())),
            None => {
                return Err(AppError::Validation(format!(
                    "{} orders require a limit price",
                    input.order_type
                )))
            }
        }
    }
    if input.order_type.requires_stop_price() {
        match &input.stop_price {
            Some(p) if *p > BigDecimal::zero() => {}
            Some(_) => return Err(AppError::Validation("Stop price must be positive".into())),
            None => {
                return Err(AppError::Validation(format!(
                    "{} orders require a stop price",
                    input.order_type
                )))
            }
        }
    }
    if let Some(expires_at) = input.expires_at {
        if expires_at <= chrono::Utc::now() {
            return Err(AppError::Validation("Expiry must be in the future".into()));
        }
    }
    Ok(())
}

/// Decides the status a fill would move an order to. Orders that reached a
/// terminal state (for example a cancel that committed after the caller
/// last read the row) take no fill at all.
fn plan_fill(order: &Order, fill_quantity: &BigDecimal) -> Result<OrderStatus, AppError> {
    let status = order.status()?;
    if status.is_terminal() {
        return Err(AppError::Conflict(format!(
            "order is already {} and cannot be filled",
            status
        )));
    }
    if *fill_quantity <= BigDecimal::zero() {
        return Err(AppError::Validation("Fill quantity must be positive".into()));
    }
    let remaining = order.remaining_quantity();
    if *fill_quantity > remaining {
        return Err(AppError::Validation(format!(
            "fill quantity {} exceeds remaining {}",
            fill_quantity, remaining
        )));
    }
    let next = if &order.filled_quantity + fill_quantity == order.quantity {
        OrderStatus::Filled
    } else {
        OrderStatus::PartiallyFilled
    };
    if !status.can_transition_to(next) {
        return Err(AppError::InvalidStateTransition(format!("{} -> {}", status, next)));
    }
    Ok(next)
}

/// Validates and persists a new order in PENDING. Nothing is persisted when
/// validation fails.
pub async fn submit(
    pool: &PgPool,
    provider: &dyn PriceProvider,
    trading: &TradingConfig,
    user_id: Uuid,
    input: CreateOrder,
) -> Result<Order, AppError> {
    validate_submission(&input)?;

    let portfolio = portfolio_service::fetch_owned(pool, input.portfolio_id, user_id).await?;
    let security = fetch_security(pool, input.security_id).await?;

    match input.side {
        OrderSide::Buy => {
            // Affordability is checked against the limit price when present,
            // otherwise against the current quote.
            let reference = match &input.limit_price {
                Some(p) => p.clone(),
                None => provider.quote(&security.symbol).await?.price,
            };
            let required = &input.quantity * &reference + &trading.fee;
            if !portfolio.has_sufficient_cash(&required) {
                return Err(AppError::InsufficientFunds(format!(
                    "order requires {} but only {} available",
                    required, portfolio.cash_balance
                )));
            }
        }
        OrderSide::Sell => {
            let position =
                position_queries::fetch_for_security(pool, input.portfolio_id, input.security_id)
                    .await?
                    .ok_or_else(|| {
                        AppError::InsufficientQuantity(format!("no position in {}", security.symbol))
                    })?;
            if position.quantity < input.quantity {
                return Err(AppError::InsufficientQuantity(format!(
                    "selling {} but only {} held",
                    input.quantity, position.quantity
                )));
            }
        }
    }

    let now = chrono::Utc::now();
    let order = Order {
        id: Uuid::new_v4(),
        portfolio_id: input.portfolio_id,
        security_id: input.security_id,
        side: input.side.as_str().to_string(),
        order_type: input.order_type.as_str().to_string(),
        quantity: input.quantity,
        filled_quantity: BigDecimal::zero(),
        limit_price: input.limit_price,
        stop_price: input.stop_price,
        status: OrderStatus::Pending.as_str().to_string(),
        reject_reason: None,
        placed_at: now,
        expires_at: input.expires_at,
        updated_at: now,
    };

    let mut tx = pool.begin().await?;
    let order = order_queries::insert(&mut *tx, &order).await?;
    audit_queries::insert(
        &mut *tx,
        Some(user_id),
        "order.submit",
        "order",
        Some(order.id),
        json!({ "side": order.side, "type": order.order_type, "quantity": order.quantity.to_string(), "symbol": security.symbol }),
    )
    .await?;
    tx.commit().await?;
    info!("Order {} submitted ({} {} {})", order.id, order.side, order.quantity, security.symbol);
    Ok(order)
}

/// Fills all or part of an order at an execution price, producing one
/// transaction and mutating the position and portfolio cash atomically.
pub async fn execute(
    pool: &PgPool,
    provider: &dyn PriceProvider,
    trading: &TradingConfig,
    user_id: Uuid,
    order_id: Uuid,
    input: ExecuteOrder,
) -> Result<FillOutcome, AppError> {
    let order = fetch_owned_order(pool, order_id, user_id).await?;
    let status = order.status()?;
    if status.is_terminal() {
        return Err(AppError::InvalidStateTransition(format!(
            "cannot execute an order in status {}",
            status
        )));
    }
    let security = fetch_security(pool, order.security_id).await?;

    let price = match input.price {
        Some(p) => p,
        None => provider.quote(&security.symbol).await?.price,
    };
    if price <= BigDecimal::zero() {
        return Err(AppError::Validation("Execution price must be positive".into()));
    }
    if !order.limit_satisfied(&price)? {
        return Err(AppError::Validation(format!(
            "price {} does not satisfy limit {}",
            price,
            order.limit_price.as_ref().map(|p| p.to_string()).unwrap_or_default()
        )));
    }

    let side = order.side()?;
    let mut tx = pool.begin().await?;

    // Re-read inside the transaction: a cancel or the expiry sweep may have
    // committed since the first read, and the row in here is authoritative.
    let order = order_queries::fetch_one(&mut *tx, order_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order".into()))?;
    let fill_quantity = match input.quantity {
        Some(q) => q,
        None => order.remaining_quantity(),
    };
    let next_status = plan_fill(&order, &fill_quantity)?;

    let mut portfolio = portfolio_queries::fetch_one(&mut *tx, order.portfolio_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Portfolio".into()))?;
    let existing = position_queries::fetch_for_security(&mut *tx, order.portfolio_id, order.security_id).await?;

    let record = match side {
        OrderSide::Buy => {
            let record = Transaction::for_fill(
                order.id,
                order.portfolio_id,
                order.security_id,
                TransactionType::Buy,
                fill_quantity.clone(),
                price.clone(),
                trading.fee.clone(),
                trading.settlement_days,
            );
            portfolio.subtract_cash(&record.net_amount)?;

            let is_new = existing.is_none();
            let mut position = existing
                .unwrap_or_else(|| Position::new(order.portfolio_id, order.security_id));
            let expected_version = position.version;
            position.apply_buy(&fill_quantity, &price)?;
            if is_new {
                // Two first buys can race into the one-position-per-security
                // constraint; the loser is a lost race, not a server fault.
                position_queries::insert(&mut *tx, &position).await.map_err(|e| {
                    AppError::conflict_on_unique(e, "Position was created concurrently")
                })?;
            } else {
                position_queries::update_holding(
                    &mut *tx,
                    position.id,
                    &position.quantity,
                    &position.avg_cost_per_share,
                    &position.current_value,
                    expected_version,
                )
                .await?
                .ok_or_else(|| AppError::Conflict("Position was modified concurrently".into()))?;
            }
            record
        }
        OrderSide::Sell => {
            let mut position = existing.ok_or_else(|| {
                AppError::InsufficientQuantity(format!("no position in {}", security.symbol))
            })?;
            let expected_version = position.version;
            let realized = position.apply_sell(&fill_quantity, &price)?;

            let record = Transaction::for_fill(
                order.id,
                order.portfolio_id,
                order.security_id,
                TransactionType::Sell,
                fill_quantity.clone(),
                price.clone(),
                trading.fee.clone(),
                trading.settlement_days,
            );
            portfolio.add_cash(&record.net_amount)?;

            // Zero-quantity positions are removed rather than kept around.
            if position.is_empty() {
                position_queries::delete(&mut *tx, position.id).await?;
            } else {
                position_queries::update_holding(
                    &mut *tx,
                    position.id,
                    &position.quantity,
                    &position.avg_cost_per_share,
                    &position.current_value,
                    expected_version,
                )
                .await?
                .ok_or_else(|| AppError::Conflict("Position was modified concurrently".into()))?;
            }
            info!("Realized {} on {} x {}", realized, fill_quantity, security.symbol);
            record
        }
    };

    portfolio_queries::update_balances(
        &mut *tx,
        portfolio.id,
        &portfolio.cash_balance,
        &portfolio.total_value,
        portfolio.version,
    )
    .await?
    .ok_or_else(|| AppError::Conflict("Portfolio was modified concurrently".into()))?;

    let record = transaction_queries::insert(&mut *tx, &record).await?;

    let new_filled = &order.filled_quantity + &fill_quantity;
    let order = order_queries::update_fill(
        &mut *tx,
        order.id,
        &new_filled,
        &[OrderStatus::Pending.as_str(), OrderStatus::PartiallyFilled.as_str()],
        next_status.as_str(),
    )
    .await?
    .ok_or_else(|| AppError::Conflict("Order reached a terminal state concurrently".into()))?;

    audit_queries::insert(
        &mut *tx,
        Some(user_id),
        "order.execute",
        "order",
        Some(order.id),
        json!({
            "price": price.to_string(),
            "quantity": fill_quantity.to_string(),
            "status": order.status,
            "transaction_id": record.id,
        }),
    )
    .await?;

    achievement_service::on_fill(&mut tx, user_id).await?;
    tx.commit().await?;
    info!("Order {} {} at {} ({})", order.id, next_status, price, security.symbol);
    Ok(FillOutcome { order, transaction: record })
}

/// Cancels an active order; the unfilled remainder has no cash or position
/// effect.
pub async fn cancel(
    pool: &PgPool,
    user_id: Uuid,
    order_id: Uuid,
    input: CancelOrder,
) -> Result<Order, AppError> {
    let order = fetch_owned_order(pool, order_id, user_id).await?;
    let status = order.status()?;
    if !status.can_transition_to(OrderStatus::Cancelled) {
        return Err(AppError::InvalidStateTransition(format!(
            "cannot cancel an order in status {}",
            status
        )));
    }
    let reason = input.reason.unwrap_or_else(|| "cancelled by user".to_string());

    let mut tx = pool.begin().await?;
    let order = order_queries::transition(
        &mut *tx,
        order_id,
        &[OrderStatus::Pending.as_str(), OrderStatus::PartiallyFilled.as_str()],
        OrderStatus::Cancelled.as_str(),
        Some(&reason),
    )
    .await?
    .ok_or_else(|| AppError::Conflict("Order reached a terminal state concurrently".into()))?;
    audit_queries::insert(
        &mut *tx,
        Some(user_id),
        "order.cancel",
        "order",
        Some(order.id),
        json!({ "reason": reason }),
    )
    .await?;
    tx.commit().await?;
    Ok(order)
}

pub async fn fetch_one(pool: &PgPool, order_id: Uuid, user_id: Uuid) -> Result<Order, AppError> {
    fetch_owned_order(pool, order_id, user_id).await
}

pub async fn list_for_portfolio(
    pool: &PgPool,
    portfolio_id: Uuid,
    user_id: Uuid,
) -> Result<Vec<Order>, AppError> {
    portfolio_service::fetch_owned(pool, portfolio_id, user_id).await?;
    Ok(order_queries::fetch_by_portfolio(pool, portfolio_id).await?)
}

/// Expiry sweep: moves every active order past its expiry to EXPIRED, one
/// transition per order so one bad row cannot stall the batch.
pub async fn expire_due(pool: &PgPool) -> Result<u64, AppError> {
    let now = chrono::Utc::now();
    let due = order_queries::fetch_expired(pool, now).await?;
    let mut expired = 0;
    for order in due {
        let updated = order_queries::transition(
            pool,
            order.id,
            &[OrderStatus::Pending.as_str(), OrderStatus::PartiallyFilled.as_str()],
            OrderStatus::Expired.as_str(),
            Some("order expired"),
        )
        .await?;
        if updated.is_some() {
            expired += 1;
        }
    }
    Ok(expired)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OrderType;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn order_input(order_type: OrderType) -> CreateOrder {
        CreateOrder {
            portfolio_id: Uuid::new_v4(),
            security_id: Uuid::new_v4(),
            side: crate::models::OrderSide::Buy,
            order_type,
            quantity: dec("5"),
            limit_price: None,
            stop_price: None,
            expires_at: None,
        }
    }

    fn active_order(status: OrderStatus, quantity: &str, filled: &str) -> Order {
        let now = chrono::Utc::now();
        Order {
            id: Uuid::new_v4(),
            portfolio_id: Uuid::new_v4(),
            security_id: Uuid::new_v4(),
            side: "BUY".to_string(),
            order_type: "MARKET".to_string(),
            quantity: dec(quantity),
            filled_quantity: dec(filled),
            limit_price: None,
            stop_price: None,
            status: status.as_str().to_string(),
            reject_reason: None,
            placed_at: now,
            expires_at: None,
            updated_at: now,
        }
    }

    #[test]
    fn test_limit_order_without_limit_price_rejected() {
        let input = order_input(OrderType::Limit);
        assert!(matches!(validate_submission(&input), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_stop_order_without_stop_price_rejected() {
        let input = order_input(OrderType::Stop);
        assert!(matches!(validate_submission(&input), Err(AppError::Validation(_))));

        let mut stop_limit = order_input(OrderType::StopLimit);
        stop_limit.limit_price = Some(dec("100"));
        assert!(matches!(validate_submission(&stop_limit), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_non_positive_prices_rejected() {
        let mut input = order_input(OrderType::Limit);
        input.limit_price = Some(dec("0"));
        assert!(matches!(validate_submission(&input), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_non_positive_quantity_rejected() {
        let mut input = order_input(OrderType::Market);
        input.quantity = dec("0");
        assert!(matches!(validate_submission(&input), Err(AppError::Validation(_))));
        input.quantity = dec("-1");
        assert!(matches!(validate_submission(&input), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_past_expiry_rejected() {
        let mut input = order_input(OrderType::Market);
        input.expires_at = Some(chrono::Utc::now() - chrono::Duration::minutes(1));
        assert!(matches!(validate_submission(&input), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_well_formed_orders_pass() {
        assert!(validate_submission(&order_input(OrderType::Market)).is_ok());
        let mut limit = order_input(OrderType::Limit);
        limit.limit_price = Some(dec("99.50"));
        assert!(validate_submission(&limit).is_ok());
    }

    #[test]
    fn test_fill_against_cancelled_order_conflicts() {
        // A cancel that lands between the caller's read and the fill must
        // win; the fresh row shows CANCELLED and the fill is refused.
        let order = active_order(OrderStatus::Cancelled, "10", "0");
        assert!(matches!(plan_fill(&order, &dec("10")), Err(AppError::Conflict(_))));
        let expired = active_order(OrderStatus::Expired, "10", "4");
        assert!(matches!(plan_fill(&expired, &dec("6")), Err(AppError::Conflict(_))));
    }

    #[test]
    fn test_fill_exceeding_remaining_rejected() {
        let order = active_order(OrderStatus::PartiallyFilled, "10", "7");
        assert!(matches!(plan_fill(&order, &dec("4")), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_fill_completing_quantity_moves_to_filled() {
        let order = active_order(OrderStatus::PartiallyFilled, "10", "7");
        assert_eq!(plan_fill(&order, &dec("3")).unwrap(), OrderStatus::Filled);
        assert_eq!(plan_fill(&order, &dec("2")).unwrap(), OrderStatus::PartiallyFilled);
    }
}
