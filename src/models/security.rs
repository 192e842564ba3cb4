use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::enums::SecurityType;

// Tradable instrument reference data, looked up by order/position logic.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Security {
    pub id: uuid::Uuid,
    pub symbol: String,
    pub name: String,
    pub security_type: String,
    pub sector: Option<String>,
    pub exchange: Option<String>,
    pub active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateSecurity {
    pub symbol: String,
    pub name: String,
    pub security_type: SecurityType,
    pub sector: Option<String>,
    pub exchange: Option<String>,
}

impl Security {
    pub fn new(data: CreateSecurity) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            symbol: data.symbol.to_uppercase(),
            name: data.name,
            security_type: data.security_type.as_str().to_string(),
            sector: data.sector,
            exchange: data.exchange,
            active: true,
            created_at: chrono::Utc::now(),
        }
    }
}
