use axum::http::{HeaderMap, HeaderValue};
use axum::response::IntoResponse;
use axum::Json;
use http::StatusCode;
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Db(sqlx::Error),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("{0} already exists")]
    AlreadyExists(String),
    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),
    #[error("Insufficient quantity: {0}")]
    InsufficientQuantity(String),
    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Rate limited by external provider")]
    RateLimited,
    #[error("External error: {0}")]
    External(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Forbidden")]
    Forbidden,
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Db(_) => "INTERNAL",
            AppError::Validation(_) => "VALIDATION",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::AlreadyExists(_) => "ALREADY_EXISTS",
            AppError::InsufficientFunds(_) => "INSUFFICIENT_FUNDS",
            AppError::InsufficientQuantity(_) => "INSUFFICIENT_QUANTITY",
            AppError::InvalidStateTransition(_) => "INVALID_STATE_TRANSITION",
            AppError::Conflict(_) => "CONFLICT",
            AppError::RateLimited => "RATE_LIMITED",
            AppError::External(_) => "EXTERNAL_SERVICE",
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::Forbidden => "FORBIDDEN",
        }
    }

    /// Maps a Postgres unique-violation to Conflict so a lost insert race
    /// surfaces like every other lost race; anything else stays Db.
    pub fn conflict_on_unique(e: sqlx::Error, message: &str) -> AppError {
        let unique = matches!(
            &e,
            sqlx::Error::Database(db) if db.code().as_deref() == Some("23505")
        );
        if unique {
            AppError::Conflict(message.to_string())
        } else {
            AppError::Db(e)
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::AlreadyExists(_) | AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InsufficientFunds(_)
            | AppError::InsufficientQuantity(_)
            | AppError::InvalidStateTransition(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::External(_) => StatusCode::BAD_GATEWAY,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        // Db errors are logged with context and surfaced generically.
        let message = match &self {
            AppError::Db(e) => {
                error!("Database error: {:?}", e);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        let body = Json(json!({ "code": self.code(), "message": message }));
        if let AppError::RateLimited = self {
            let mut headers = HeaderMap::new();
            headers.insert("Retry-After", HeaderValue::from_static("60"));
            return (self.status(), headers, body).into_response();
        }
        (self.status(), body).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(value: sqlx::Error) -> Self {
        AppError::Db(value)
    }
}

impl From<String> for AppError {
    fn from(value: String) -> Self {
        AppError::Validation(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lost_races_surface_as_conflict() {
        let err = AppError::Conflict("row was modified concurrently".into());
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.code(), "CONFLICT");
    }

    #[test]
    fn test_database_errors_stay_internal() {
        let err = AppError::conflict_on_unique(sqlx::Error::RowNotFound, "ignored");
        assert!(matches!(err, AppError::Db(_)));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_business_rules_are_unprocessable() {
        assert_eq!(
            AppError::InsufficientFunds("short".into()).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::InvalidStateTransition("FILLED -> CANCELLED".into()).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }
}
