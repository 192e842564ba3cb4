use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::errors::AppError;
use crate::models::enums::{OrderSide, OrderStatus, OrderType};

// A user's instruction to buy or sell a security. Side, type and status are
// TEXT columns; the typed accessors below parse them on demand.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Order {
    pub id: uuid::Uuid,
    pub portfolio_id: uuid::Uuid,
    pub security_id: uuid::Uuid,
    pub side: String,
    pub order_type: String,
    pub quantity: BigDecimal,
    pub filled_quantity: BigDecimal,
    pub limit_price: Option<BigDecimal>,
    pub stop_price: Option<BigDecimal>,
    pub status: String,
    pub reject_reason: Option<String>,
    pub placed_at: chrono::DateTime<chrono::Utc>,
    pub expires_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateOrder {
    pub portfolio_id: uuid::Uuid,
    pub security_id: uuid::Uuid,
    pub side: OrderSide,
    pub order_type: OrderType,
    pub quantity: BigDecimal,
    pub limit_price: Option<BigDecimal>,
    pub stop_price: Option<BigDecimal>,
    pub expires_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExecuteOrder {
    /// Execution price; defaults to the oracle quote when absent.
    pub price: Option<BigDecimal>,
    /// Fill quantity; defaults to the entire remaining quantity.
    pub quantity: Option<BigDecimal>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CancelOrder {
    pub reason: Option<String>,
}

impl Order {
    pub fn side(&self) -> Result<OrderSide, AppError> {
        self.side.parse().map_err(AppError::Validation)
    }

    pub fn order_type(&self) -> Result<OrderType, AppError> {
        self.order_type.parse().map_err(AppError::Validation)
    }

    pub fn status(&self) -> Result<OrderStatus, AppError> {
        self.status.parse().map_err(AppError::Validation)
    }

    pub fn remaining_quantity(&self) -> BigDecimal {
        &self.quantity - &self.filled_quantity
    }

    /// Whether an execution price satisfies the limit constraint: buys fill
    /// at or below the limit, sells at or above it. Orders without a limit
    /// price always satisfy.
    pub fn limit_satisfied(&self, price: &BigDecimal) -> Result<bool, AppError> {
        let Some(limit) = &self.limit_price else {
            return Ok(true);
        };
        Ok(match self.side()? {
            OrderSide::Buy => price <= limit,
            OrderSide::Sell => price >= limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn limit_order(side: OrderSide, limit: &str) -> Order {
        let now = chrono::Utc::now();
        Order {
            id: uuid::Uuid::new_v4(),
            portfolio_id: uuid::Uuid::new_v4(),
            security_id: uuid::Uuid::new_v4(),
            side: side.as_str().to_string(),
            order_type: OrderType::Limit.as_str().to_string(),
            quantity: dec("10"),
            filled_quantity: dec("4"),
            limit_price: Some(dec(limit)),
            stop_price: None,
            status: OrderStatus::PartiallyFilled.as_str().to_string(),
            reject_reason: None,
            placed_at: now,
            expires_at: None,
            updated_at: now,
        }
    }

    #[test]
    fn test_remaining_quantity() {
        let order = limit_order(OrderSide::Buy, "50");
        assert_eq!(order.remaining_quantity(), dec("6"));
    }

    #[test]
    fn test_buy_limit_constraint() {
        let order = limit_order(OrderSide::Buy, "50");
        assert!(order.limit_satisfied(&dec("49.99")).unwrap());
        assert!(order.limit_satisfied(&dec("50")).unwrap());
        assert!(!order.limit_satisfied(&dec("50.01")).unwrap());
    }

    #[test]
    fn test_sell_limit_constraint() {
        let order = limit_order(OrderSide::Sell, "50");
        assert!(!order.limit_satisfied(&dec("49.99")).unwrap());
        assert!(order.limit_satisfied(&dec("50")).unwrap());
        assert!(order.limit_satisfied(&dec("75")).unwrap());
    }

    #[test]
    fn test_market_order_always_satisfies() {
        let mut order = limit_order(OrderSide::Buy, "50");
        order.order_type = OrderType::Market.as_str().to_string();
        order.limit_price = None;
        assert!(order.limit_satisfied(&dec("999")).unwrap());
    }
}
