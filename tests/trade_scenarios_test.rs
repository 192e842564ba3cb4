/// Trading Scenario Tests
///
/// End-to-end arithmetic for the order/position/portfolio lifecycle using
/// the real domain types:
/// - Cash ledger symmetry (deposit/withdraw)
/// - Weighted-average cost basis across buy fills
/// - Realized gain/loss on sell fills
/// - Order status transition table
///
/// NOTE: These tests validate the domain arithmetic and state machine.
/// Full integration tests against a live database require running the
/// server with migrations applied.

use bigdecimal::BigDecimal;
use std::str::FromStr;

use sproutvest_backend::models::{OrderStatus, Portfolio, Position};

fn dec(s: &str) -> BigDecimal {
    BigDecimal::from_str(s).unwrap()
}

fn funded_portfolio(cash: &str) -> Portfolio {
    let mut p = Portfolio::new(uuid::Uuid::new_v4(), "Starter".into());
    p.add_cash(&dec(cash)).unwrap();
    p
}

fn held_position(qty: &str, avg: &str) -> Position {
    let mut p = Position::new(uuid::Uuid::new_v4(), uuid::Uuid::new_v4());
    p.apply_buy(&dec(qty), &dec(avg)).unwrap();
    p
}

// ---------------------------------------------------------------------------
// Cash ledger
// ---------------------------------------------------------------------------

#[test]
fn test_deposit_withdraw_round_trip() {
    let mut portfolio = funded_portfolio("1000");
    portfolio.add_cash(&dec("333.33")).unwrap();
    portfolio.subtract_cash(&dec("333.33")).unwrap();
    assert_eq!(portfolio.cash_balance, dec("1000"));
    assert_eq!(portfolio.total_value, dec("1000"));
}

#[test]
fn test_overdraw_rejected_and_is_no_op() {
    let mut portfolio = funded_portfolio("100");
    assert!(portfolio.subtract_cash(&dec("100.01")).is_err());
    assert_eq!(portfolio.cash_balance, dec("100"));
    assert_eq!(portfolio.total_value, dec("100"));
}

// ---------------------------------------------------------------------------
// Cost basis
// ---------------------------------------------------------------------------

/// Scenario from the product brief: portfolio starts with 1000 cash; buy
/// 5 shares at $100 via a market order.
#[test]
fn test_scenario_market_buy() {
    let mut portfolio = funded_portfolio("1000");
    let mut position = Position::new(portfolio.id, uuid::Uuid::new_v4());

    position.apply_buy(&dec("5"), &dec("100")).unwrap();
    portfolio.subtract_cash(&dec("500")).unwrap();

    assert_eq!(portfolio.cash_balance, dec("500"));
    assert_eq!(portfolio.total_value, dec("500"), "pre-revaluation total excludes the new holding");
    assert_eq!(position.quantity, dec("5"));
    assert_eq!(position.avg_cost_per_share, dec("100"));
}

/// Follow-on scenario: sell 2 of those 5 shares at $120.
#[test]
fn test_scenario_sell_realizes_gain() {
    let mut portfolio = funded_portfolio("500");
    let mut position = held_position("5", "100");

    let realized = position.apply_sell(&dec("2"), &dec("120")).unwrap();
    portfolio.add_cash(&dec("240")).unwrap();

    assert_eq!(position.quantity, dec("3"));
    assert_eq!(position.avg_cost_per_share, dec("100"), "selling never moves the average");
    assert_eq!(realized, dec("40"));
    assert_eq!(portfolio.cash_balance, dec("740"));
}

#[test]
fn test_weighted_average_lies_between_old_avg_and_fill_price() {
    let fills = [("10", "80"), ("5", "110"), ("20", "95"), ("1", "300")];
    let mut position = held_position("10", "100");
    for (q2, p2) in fills {
        let before = position.avg_cost_per_share.clone();
        position.apply_buy(&dec(q2), &dec(p2)).unwrap();
        let (lo, hi) = if before <= dec(p2) { (before, dec(p2)) } else { (dec(p2), before) };
        assert!(position.avg_cost_per_share >= lo && position.avg_cost_per_share <= hi);
    }
}

#[test]
fn test_oversell_fails_and_preserves_holding() {
    let mut position = held_position("3", "100");
    assert!(position.apply_sell(&dec("4"), &dec("150")).is_err());
    assert_eq!(position.quantity, dec("3"));
    assert_eq!(position.avg_cost_per_share, dec("100"));
}

#[test]
fn test_sell_to_zero_is_empty() {
    let mut position = held_position("2", "10");
    position.apply_sell(&dec("2"), &dec("11")).unwrap();
    assert!(position.is_empty());
}

// ---------------------------------------------------------------------------
// Order status transitions
// ---------------------------------------------------------------------------

const ALL: [OrderStatus; 7] = [
    OrderStatus::Pending,
    OrderStatus::PartiallyFilled,
    OrderStatus::Filled,
    OrderStatus::Cancelled,
    OrderStatus::Rejected,
    OrderStatus::Expired,
    OrderStatus::Failed,
];

#[test]
fn test_terminal_states_have_no_outgoing_transitions() {
    for from in ALL {
        for to in ALL {
            if from.is_terminal() {
                assert!(!from.can_transition_to(to), "{} -> {} must be rejected", from, to);
            }
        }
    }
}

#[test]
fn test_cancel_only_from_active_states() {
    assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Cancelled));
    assert!(OrderStatus::PartiallyFilled.can_transition_to(OrderStatus::Cancelled));
    assert!(!OrderStatus::Filled.can_transition_to(OrderStatus::Cancelled));
    assert!(!OrderStatus::Expired.can_transition_to(OrderStatus::Cancelled));
}

#[test]
fn test_fills_blocked_once_cancelled() {
    // A cancel committed by another writer leaves nothing for a fill to do.
    assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Filled));
    assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::PartiallyFilled));
}

#[test]
fn test_successive_partial_fills() {
    let mut status = OrderStatus::Pending;
    let quantity = dec("10");
    let mut filled = dec("0");
    for fill in ["3", "4", "3"] {
        let next = if &filled + &dec(fill) == quantity {
            OrderStatus::Filled
        } else {
            OrderStatus::PartiallyFilled
        };
        assert!(status.can_transition_to(next));
        filled += dec(fill);
        status = next;
    }
    assert_eq!(status, OrderStatus::Filled);
    assert!(status.is_terminal());
}
