use std::sync::Arc;

use bigdecimal::BigDecimal;
use sqlx::PgPool;

use crate::auth::AuthConfig;
use crate::external::price_provider::PriceProvider;

/// Trading knobs read once at startup.
#[derive(Clone)]
pub struct TradingConfig {
    /// Flat commission applied per fill.
    pub fee: BigDecimal,
    /// T+n settlement lag in days.
    pub settlement_days: i64,
}

impl TradingConfig {
    pub fn from_env() -> Result<Self, String> {
        let fee = std::env::var("TRADING_FEE")
            .unwrap_or_else(|_| "0".to_string())
            .parse()
            .map_err(|_| "TRADING_FEE must be a decimal".to_string())?;
        let settlement_days = std::env::var("SETTLEMENT_DAYS")
            .unwrap_or_else(|_| "2".to_string())
            .parse()
            .map_err(|_| "SETTLEMENT_DAYS must be an integer".to_string())?;
        Ok(Self { fee, settlement_days })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub price_provider: Arc<dyn PriceProvider>,
    pub auth: AuthConfig,
    pub trading: TradingConfig,
}
