use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::errors::AppError;

// A holding of one security within one portfolio. Quantity never goes
// negative; a position that reaches zero is deleted by the service layer.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Position {
    pub id: uuid::Uuid,
    pub portfolio_id: uuid::Uuid,
    pub security_id: uuid::Uuid,
    pub quantity: BigDecimal,
    pub avg_cost_per_share: BigDecimal,
    pub current_value: BigDecimal,
    pub version: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Position {
    pub fn new(portfolio_id: uuid::Uuid, security_id: uuid::Uuid) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: uuid::Uuid::new_v4(),
            portfolio_id,
            security_id,
            quantity: BigDecimal::zero(),
            avg_cost_per_share: BigDecimal::zero(),
            current_value: BigDecimal::zero(),
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.quantity.is_zero()
    }

    /// Weighted-average cost basis update for a buy fill:
    /// `newAvg = (q1*avg1 + q2*p2) / (q1+q2)`.
    pub fn apply_buy(&mut self, quantity: &BigDecimal, price: &BigDecimal) -> Result<(), AppError> {
        if *quantity <= BigDecimal::zero() {
            return Err(AppError::Validation("Fill quantity must be positive".into()));
        }
        if *price <= BigDecimal::zero() {
            return Err(AppError::Validation("Fill price must be positive".into()));
        }
        let new_qty = &self.quantity + quantity;
        let total_cost = &self.quantity * &self.avg_cost_per_share + quantity * price;
        self.avg_cost_per_share = total_cost / &new_qty;
        self.quantity = new_qty;
        self.current_value = &self.quantity * price;
        Ok(())
    }

    /// Reduces the position for a sell fill and returns the realized
    /// gain/loss `q2*(salePrice - avg1)`. Average cost is unchanged.
    /// Selling more than held fails before any mutation.
    pub fn apply_sell(
        &mut self,
        quantity: &BigDecimal,
        price: &BigDecimal,
    ) -> Result<BigDecimal, AppError> {
        if *quantity <= BigDecimal::zero() {
            return Err(AppError::Validation("Fill quantity must be positive".into()));
        }
        if *price <= BigDecimal::zero() {
            return Err(AppError::Validation("Fill price must be positive".into()));
        }
        if *quantity > self.quantity {
            return Err(AppError::InsufficientQuantity(format!(
                "selling {} but only {} held",
                quantity, self.quantity
            )));
        }
        let realized = quantity * &(price - &self.avg_cost_per_share);
        self.quantity -= quantity;
        self.current_value = &self.quantity * price;
        Ok(realized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn held_position(qty: &str, avg: &str) -> Position {
        let mut p = Position::new(uuid::Uuid::new_v4(), uuid::Uuid::new_v4());
        p.apply_buy(&dec(qty), &dec(avg)).unwrap();
        p
    }

    #[test]
    fn test_first_buy_sets_basis_to_fill_price() {
        let p = held_position("5", "100");
        assert_eq!(p.quantity, dec("5"));
        assert_eq!(p.avg_cost_per_share, dec("100"));
    }

    #[test]
    fn test_buy_fill_weighted_average() {
        let mut p = held_position("10", "100");
        p.apply_buy(&dec("10"), &dec("120")).unwrap();
        assert_eq!(p.quantity, dec("20"));
        assert_eq!(p.avg_cost_per_share, dec("110"));
    }

    #[test]
    fn test_buy_fill_average_stays_within_bounds() {
        // newAvg must lie between avg1 and p2 inclusive.
        let cases = [("10", "50", "3", "80"), ("1", "200", "9", "20"), ("4", "33.33", "4", "33.33")];
        for (q1, avg1, q2, p2) in cases {
            let mut p = held_position(q1, avg1);
            p.apply_buy(&dec(q2), &dec(p2)).unwrap();
            let (lo, hi) = if dec(avg1) <= dec(p2) {
                (dec(avg1), dec(p2))
            } else {
                (dec(p2), dec(avg1))
            };
            assert!(
                p.avg_cost_per_share >= lo && p.avg_cost_per_share <= hi,
                "avg {} out of [{}, {}]",
                p.avg_cost_per_share,
                lo,
                hi
            );
            assert_eq!(p.quantity, dec(q1) + dec(q2));
        }
    }

    #[test]
    fn test_sell_fill_keeps_average_and_realizes_gain() {
        let mut p = held_position("5", "100");
        let realized = p.apply_sell(&dec("2"), &dec("120")).unwrap();
        assert_eq!(p.quantity, dec("3"));
        assert_eq!(p.avg_cost_per_share, dec("100"));
        assert_eq!(realized, dec("40"));
    }

    #[test]
    fn test_sell_at_a_loss() {
        let mut p = held_position("10", "50");
        let realized = p.apply_sell(&dec("4"), &dec("45")).unwrap();
        assert_eq!(realized, dec("-20"));
        assert_eq!(p.quantity, dec("6"));
    }

    #[test]
    fn test_oversell_fails_without_mutation() {
        let mut p = held_position("3", "100");
        let err = p.apply_sell(&dec("4"), &dec("120")).unwrap_err();
        assert!(matches!(err, AppError::InsufficientQuantity(_)));
        assert_eq!(p.quantity, dec("3"));
        assert_eq!(p.avg_cost_per_share, dec("100"));
        // Failing again leaves it untouched again.
        assert!(p.apply_sell(&dec("4"), &dec("120")).is_err());
        assert_eq!(p.quantity, dec("3"));
    }

    #[test]
    fn test_sell_to_zero_marks_empty() {
        let mut p = held_position("2", "10");
        p.apply_sell(&dec("2"), &dec("11")).unwrap();
        assert!(p.is_empty());
    }
}
