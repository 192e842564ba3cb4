use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::errors::AppError;
use crate::models::enums::{TransactionStatus, TransactionType};

// An immutable record of a completed cash/position movement. Fills carry the
// order and security they came from; deposits and withdrawals do not.
// Cash effects apply at creation; the settlement sweep only flips the status.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Transaction {
    pub id: uuid::Uuid,
    pub order_id: Option<uuid::Uuid>,
    pub portfolio_id: uuid::Uuid,
    pub security_id: Option<uuid::Uuid>,
    pub transaction_type: String,
    pub quantity: Option<BigDecimal>,
    pub price_per_share: Option<BigDecimal>,
    pub total_amount: BigDecimal,
    pub fees: BigDecimal,
    pub net_amount: BigDecimal,
    pub status: String,
    pub transaction_date: chrono::DateTime<chrono::Utc>,
    pub settlement_date: chrono::DateTime<chrono::Utc>,
    pub settled_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize)]
pub struct TransactionFilter {
    pub transaction_type: Option<TransactionType>,
    pub status: Option<TransactionStatus>,
    pub from: Option<chrono::DateTime<chrono::Utc>>,
    pub to: Option<chrono::DateTime<chrono::Utc>>,
}

impl Transaction {
    pub fn transaction_type(&self) -> Result<TransactionType, AppError> {
        self.transaction_type.parse().map_err(AppError::Validation)
    }

    pub fn status(&self) -> Result<TransactionStatus, AppError> {
        self.status.parse().map_err(AppError::Validation)
    }

    /// A fill transaction. `net_amount` is the signed-magnitude cash effect:
    /// buys pay `total + fees`, sells receive `total - fees`.
    pub fn for_fill(
        order_id: uuid::Uuid,
        portfolio_id: uuid::Uuid,
        security_id: uuid::Uuid,
        transaction_type: TransactionType,
        quantity: BigDecimal,
        price: BigDecimal,
        fees: BigDecimal,
        settlement_days: i64,
    ) -> Self {
        let total_amount = &quantity * &price;
        let net_amount = match transaction_type {
            TransactionType::Buy => &total_amount + &fees,
            _ => &total_amount - &fees,
        };
        let now = chrono::Utc::now();
        Self {
            id: uuid::Uuid::new_v4(),
            order_id: Some(order_id),
            portfolio_id,
            security_id: Some(security_id),
            transaction_type: transaction_type.as_str().to_string(),
            quantity: Some(quantity),
            price_per_share: Some(price),
            total_amount,
            fees,
            net_amount,
            status: TransactionStatus::Pending.as_str().to_string(),
            transaction_date: now,
            settlement_date: now + chrono::Duration::days(settlement_days),
            settled_at: None,
            created_at: now,
        }
    }

    /// A cash-only event (deposit, withdrawal, dividend) with no order or
    /// security attached.
    pub fn for_cash_event(
        portfolio_id: uuid::Uuid,
        transaction_type: TransactionType,
        amount: BigDecimal,
        settlement_days: i64,
    ) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: uuid::Uuid::new_v4(),
            order_id: None,
            portfolio_id,
            security_id: None,
            transaction_type: transaction_type.as_str().to_string(),
            quantity: None,
            price_per_share: None,
            total_amount: amount.clone(),
            fees: bigdecimal::BigDecimal::from(0),
            net_amount: amount,
            status: TransactionStatus::Pending.as_str().to_string(),
            transaction_date: now,
            settlement_date: now + chrono::Duration::days(settlement_days),
            settled_at: None,
            created_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn test_buy_fill_net_includes_fees() {
        let tx = Transaction::for_fill(
            uuid::Uuid::new_v4(),
            uuid::Uuid::new_v4(),
            uuid::Uuid::new_v4(),
            TransactionType::Buy,
            dec("5"),
            dec("100"),
            dec("1.50"),
            2,
        );
        assert_eq!(tx.total_amount, dec("500"));
        assert_eq!(tx.net_amount, dec("501.50"));
        assert_eq!(tx.status, "PENDING");
    }

    #[test]
    fn test_sell_fill_net_deducts_fees() {
        let tx = Transaction::for_fill(
            uuid::Uuid::new_v4(),
            uuid::Uuid::new_v4(),
            uuid::Uuid::new_v4(),
            TransactionType::Sell,
            dec("2"),
            dec("120"),
            dec("0"),
            2,
        );
        assert_eq!(tx.net_amount, dec("240"));
    }

    #[test]
    fn test_settlement_date_is_in_the_future() {
        let tx = Transaction::for_cash_event(uuid::Uuid::new_v4(), TransactionType::Deposit, dec("50"), 2);
        assert!(tx.settlement_date > tx.transaction_date);
        assert!(tx.settled_at.is_none());
    }
}
