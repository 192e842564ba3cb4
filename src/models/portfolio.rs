use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::errors::AppError;

// A user's container of cash and positions. `total_value` always includes
// `cash_balance`; the difference is the invested amount.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Portfolio {
    pub id: uuid::Uuid,
    pub user_id: uuid::Uuid,
    pub name: String,
    pub cash_balance: BigDecimal,
    pub total_value: BigDecimal,
    pub active: bool,
    pub version: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatePortfolio {
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdatePortfolio {
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CashMovement {
    pub amount: BigDecimal,
    pub description: Option<String>,
}

impl Portfolio {
    pub fn new(user_id: uuid::Uuid, name: String) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: uuid::Uuid::new_v4(),
            user_id,
            name,
            cash_balance: BigDecimal::zero(),
            total_value: BigDecimal::zero(),
            active: true,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn invested_amount(&self) -> BigDecimal {
        &self.total_value - &self.cash_balance
    }

    pub fn has_sufficient_cash(&self, amount: &BigDecimal) -> bool {
        self.cash_balance >= *amount
    }

    /// Deposits, dividends and sale proceeds raise cash and total value
    /// symmetrically.
    pub fn add_cash(&mut self, amount: &BigDecimal) -> Result<(), AppError> {
        if *amount <= BigDecimal::zero() {
            return Err(AppError::Validation("Amount must be positive".into()));
        }
        self.cash_balance += amount;
        self.total_value += amount;
        Ok(())
    }

    /// Withdrawals, buys and fees lower cash and total value symmetrically.
    /// Fails before mutating anything when cash is short.
    pub fn subtract_cash(&mut self, amount: &BigDecimal) -> Result<(), AppError> {
        if *amount <= BigDecimal::zero() {
            return Err(AppError::Validation("Amount must be positive".into()));
        }
        if !self.has_sufficient_cash(amount) {
            return Err(AppError::InsufficientFunds(format!(
                "requires {} but only {} available",
                amount, self.cash_balance
            )));
        }
        self.cash_balance -= amount;
        self.total_value -= amount;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn funded_portfolio(cash: &str) -> Portfolio {
        let mut p = Portfolio::new(uuid::Uuid::new_v4(), "Starter".into());
        p.add_cash(&dec(cash)).unwrap();
        p
    }

    #[test]
    fn test_add_then_subtract_round_trips() {
        let mut p = funded_portfolio("1000");
        let before_cash = p.cash_balance.clone();
        let before_total = p.total_value.clone();
        p.add_cash(&dec("250.50")).unwrap();
        p.subtract_cash(&dec("250.50")).unwrap();
        assert_eq!(p.cash_balance, before_cash);
        assert_eq!(p.total_value, before_total);
    }

    #[test]
    fn test_overdraw_is_a_no_op() {
        let mut p = funded_portfolio("100");
        let err = p.subtract_cash(&dec("100.01")).unwrap_err();
        assert!(matches!(err, AppError::InsufficientFunds(_)));
        assert_eq!(p.cash_balance, dec("100"));
        assert_eq!(p.total_value, dec("100"));
    }

    #[test]
    fn test_non_positive_amounts_rejected() {
        let mut p = funded_portfolio("100");
        assert!(matches!(p.add_cash(&dec("0")), Err(AppError::Validation(_))));
        assert!(matches!(p.subtract_cash(&dec("-5")), Err(AppError::Validation(_))));
        assert_eq!(p.cash_balance, dec("100"));
    }

    #[test]
    fn test_invested_amount() {
        let mut p = funded_portfolio("1000");
        // Simulate a buy: cash leaves, holdings keep total value up.
        p.subtract_cash(&dec("400")).unwrap();
        p.total_value += dec("400");
        assert_eq!(p.invested_amount(), dec("400"));
        assert_eq!(p.cash_balance, dec("600"));
    }
}
