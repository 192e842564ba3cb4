use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// Status/side/type vocabularies are stored as TEXT columns; row structs carry
// the raw string and parse into these enums at the service boundary.

macro_rules! string_enum {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(format!("unknown {}: {}", stringify!($name), other)),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

string_enum!(OrderSide {
    Buy => "BUY",
    Sell => "SELL",
});

string_enum!(OrderType {
    Market => "MARKET",
    Limit => "LIMIT",
    Stop => "STOP",
    StopLimit => "STOP_LIMIT",
});

impl OrderType {
    pub fn requires_limit_price(&self) -> bool {
        matches!(self, OrderType::Limit | OrderType::StopLimit)
    }

    pub fn requires_stop_price(&self) -> bool {
        matches!(self, OrderType::Stop | OrderType::StopLimit)
    }
}

string_enum!(OrderStatus {
    Pending => "PENDING",
    PartiallyFilled => "PARTIALLY_FILLED",
    Filled => "FILLED",
    Cancelled => "CANCELLED",
    Rejected => "REJECTED",
    Expired => "EXPIRED",
    Failed => "FAILED",
});

impl OrderStatus {
    /// PENDING and PARTIALLY_FILLED are the only non-final states.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, OrderStatus::Pending | OrderStatus::PartiallyFilled)
    }

    /// The full transition table. PARTIALLY_FILLED may re-enter itself on
    /// successive partial fills; terminal states have no outgoing edges.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        match (self, next) {
            (Pending, PartiallyFilled)
            | (Pending, Filled)
            | (Pending, Cancelled)
            | (Pending, Rejected)
            | (Pending, Expired)
            | (Pending, Failed) => true,
            (PartiallyFilled, PartiallyFilled)
            | (PartiallyFilled, Filled)
            | (PartiallyFilled, Cancelled)
            | (PartiallyFilled, Expired)
            | (PartiallyFilled, Failed) => true,
            _ => false,
        }
    }
}

string_enum!(TransactionType {
    Buy => "BUY",
    Sell => "SELL",
    Deposit => "DEPOSIT",
    Withdrawal => "WITHDRAWAL",
    Dividend => "DIVIDEND",
    Fee => "FEE",
});

string_enum!(TransactionStatus {
    Pending => "PENDING",
    Completed => "COMPLETED",
    Failed => "FAILED",
    Canceled => "CANCELED",
});

impl TransactionStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TransactionStatus::Pending)
    }
}

string_enum!(AccountStatus {
    Active => "ACTIVE",
    Suspended => "SUSPENDED",
    Deactivated => "DEACTIVATED",
});

impl AccountStatus {
    pub fn can_transition_to(&self, next: AccountStatus) -> bool {
        use AccountStatus::*;
        matches!(
            (self, next),
            (Active, Suspended) | (Suspended, Active) | (Active, Deactivated) | (Suspended, Deactivated)
        )
    }
}

string_enum!(RiskTolerance {
    Conservative => "CONSERVATIVE",
    Moderate => "MODERATE",
    Aggressive => "AGGRESSIVE",
});

string_enum!(SecurityType {
    Stock => "STOCK",
    Etf => "ETF",
    Bond => "BOND",
    Fund => "FUND",
});

string_enum!(ProgressStatus {
    NotStarted => "NOT_STARTED",
    InProgress => "IN_PROGRESS",
    Completed => "COMPLETED",
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_through_strings() {
        assert_eq!("PARTIALLY_FILLED".parse::<OrderStatus>().unwrap(), OrderStatus::PartiallyFilled);
        assert_eq!(OrderStatus::PartiallyFilled.as_str(), "PARTIALLY_FILLED");
        assert_eq!("STOP_LIMIT".parse::<OrderType>().unwrap(), OrderType::StopLimit);
        assert!("stop_limit".parse::<OrderType>().is_err());
    }

    #[test]
    fn test_terminal_order_states() {
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(!OrderStatus::PartiallyFilled.is_terminal());
        for s in [
            OrderStatus::Filled,
            OrderStatus::Cancelled,
            OrderStatus::Rejected,
            OrderStatus::Expired,
            OrderStatus::Failed,
        ] {
            assert!(s.is_terminal(), "{} should be terminal", s);
        }
    }

    #[test]
    fn test_no_transitions_out_of_terminal_states() {
        let all = [
            OrderStatus::Pending,
            OrderStatus::PartiallyFilled,
            OrderStatus::Filled,
            OrderStatus::Cancelled,
            OrderStatus::Rejected,
            OrderStatus::Expired,
            OrderStatus::Failed,
        ];
        for from in all {
            for to in all {
                if from.is_terminal() {
                    assert!(!from.can_transition_to(to), "{} -> {} should be rejected", from, to);
                }
            }
        }
    }

    #[test]
    fn test_partial_fill_reentry() {
        assert!(OrderStatus::PartiallyFilled.can_transition_to(OrderStatus::PartiallyFilled));
        assert!(OrderStatus::PartiallyFilled.can_transition_to(OrderStatus::Filled));
        // A partially filled order was accepted, it can no longer be rejected.
        assert!(!OrderStatus::PartiallyFilled.can_transition_to(OrderStatus::Rejected));
    }

    #[test]
    fn test_limit_price_requirements() {
        assert!(OrderType::Limit.requires_limit_price());
        assert!(OrderType::StopLimit.requires_limit_price());
        assert!(!OrderType::Market.requires_limit_price());
        assert!(OrderType::Stop.requires_stop_price());
        assert!(!OrderType::Limit.requires_stop_price());
    }

    #[test]
    fn test_account_status_transitions() {
        assert!(AccountStatus::Active.can_transition_to(AccountStatus::Suspended));
        assert!(AccountStatus::Suspended.can_transition_to(AccountStatus::Active));
        assert!(!AccountStatus::Deactivated.can_transition_to(AccountStatus::Active));
    }
}
