use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Mutex;

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use rand::Rng;

use crate::external::price_provider::{PriceProvider, PriceProviderError, Quote};

/// Simulated quote source: each symbol gets a deterministic base price and
/// walks a small random drift per observation. Good enough for a trading
/// simulation; never rate-limits and never goes down.
pub struct SimulatedProvider {
    prices: Mutex<HashMap<String, f64>>,
    max_drift: f64,
}

impl SimulatedProvider {
    pub fn new() -> Self {
        Self {
            prices: Mutex::new(HashMap::new()),
            max_drift: 0.01,
        }
    }

    // Deterministic base in roughly [10, 500) so the same symbol starts at
    // the same price across process restarts.
    fn base_price(symbol: &str) -> f64 {
        let h = symbol.bytes().fold(7u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
        10.0 + (h % 49_000) as f64 / 100.0
    }
}

impl Default for SimulatedProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PriceProvider for SimulatedProvider {
    async fn quote(&self, symbol: &str) -> Result<Quote, PriceProviderError> {
        if symbol.trim().is_empty() {
            return Err(PriceProviderError::UnknownSymbol(symbol.to_string()));
        }
        let symbol = symbol.to_uppercase();
        let price = {
            let mut prices = self
                .prices
                .lock()
                .map_err(|_| PriceProviderError::Unavailable("price cache poisoned".into()))?;
            let entry = prices.entry(symbol.clone()).or_insert_with(|| Self::base_price(&symbol));
            let drift = rand::rng().random_range(-self.max_drift..=self.max_drift);
            *entry = (*entry * (1.0 + drift)).max(0.01);
            *entry
        };
        let price = BigDecimal::from_str(&format!("{:.4}", price))
            .map_err(|e| PriceProviderError::Unavailable(format!("bad simulated price: {}", e)))?;
        Ok(Quote {
            symbol,
            price,
            as_of: chrono::Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::Zero;

    #[tokio::test]
    async fn test_quotes_are_positive_and_near_base() {
        let provider = SimulatedProvider::new();
        let base = SimulatedProvider::base_price("ACME");
        let quote = provider.quote("acme").await.unwrap();
        assert_eq!(quote.symbol, "ACME");
        assert!(quote.price > BigDecimal::zero());
        let p: f64 = quote.price.to_string().parse().unwrap();
        assert!((p - base).abs() / base <= 0.011, "first drift should stay within 1%");
    }

    #[tokio::test]
    async fn test_blank_symbol_rejected() {
        let provider = SimulatedProvider::new();
        assert!(matches!(
            provider.quote("  ").await,
            Err(PriceProviderError::UnknownSymbol(_))
        ));
    }
}
