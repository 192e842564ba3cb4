use async_trait::async_trait;
use bigdecimal::BigDecimal;
use thiserror::Error;

use crate::errors::AppError;

/// A price observation from the oracle.
#[derive(Debug, Clone)]
pub struct Quote {
    pub symbol: String,
    pub price: BigDecimal,
    pub as_of: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Error)]
pub enum PriceProviderError {
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    #[error("rate limited")]
    RateLimited,

    #[error("unknown symbol: {0}")]
    UnknownSymbol(String),
}

impl From<PriceProviderError> for AppError {
    fn from(value: PriceProviderError) -> Self {
        match value {
            PriceProviderError::RateLimited => AppError::RateLimited,
            PriceProviderError::UnknownSymbol(s) => AppError::Validation(format!("unknown symbol: {}", s)),
            PriceProviderError::Unavailable(msg) => AppError::External(msg),
        }
    }
}

/// Opaque price oracle. Market orders execute against it and valuations
/// read from it; it either answers with `(price, timestamp)` or fails.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    async fn quote(&self, symbol: &str) -> Result<Quote, PriceProviderError>;
}
