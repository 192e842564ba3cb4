use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::session_queries;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_secs: i64,
}

impl AuthConfig {
    pub fn from_env() -> Result<Self, String> {
        let jwt_secret = std::env::var("JWT_SECRET").map_err(|_| "JWT_SECRET is not set".to_string())?;
        if jwt_secret.len() < 16 {
            return Err("JWT_SECRET must be at least 16 bytes".to_string());
        }
        let token_ttl_secs = std::env::var("JWT_TTL_SECS")
            .unwrap_or_else(|_| "86400".to_string())
            .parse()
            .map_err(|_| "JWT_TTL_SECS must be an integer".to_string())?;
        Ok(Self { jwt_secret, token_ttl_secs })
    }
}

/// The authenticated principal handed to every protected handler.
/// `jti` ties the token to a revocable session row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub jti: Uuid,
    pub iat: i64,
    pub exp: i64,
}

pub struct IssuedToken {
    pub token: String,
    pub token_id: Uuid,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

pub fn issue_token(config: &AuthConfig, user_id: Uuid, username: &str) -> Result<IssuedToken, AppError> {
    let now = chrono::Utc::now();
    let expires_at = now + chrono::Duration::seconds(config.token_ttl_secs);
    let token_id = Uuid::new_v4();
    let claims = Claims {
        sub: user_id,
        username: username.to_string(),
        jti: token_id,
        iat: now.timestamp(),
        exp: expires_at.timestamp(),
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::External(format!("failed to sign token: {}", e)))?;
    Ok(IssuedToken { token, token_id, expires_at })
}

pub fn decode_token(config: &AuthConfig, token: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Unauthorized)
}

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::External(format!("failed to hash password: {}", e)))
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AppError::External(format!("stored hash is malformed: {}", e)))?;
    Ok(Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
}

#[async_trait]
impl FromRequestParts<AppState> for Claims {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::Unauthorized)?;
        let token = header.strip_prefix("Bearer ").ok_or(AppError::Unauthorized)?;
        let claims = decode_token(&state.auth, token)?;

        // The token must still map to a live session.
        let session = session_queries::fetch_by_token_id(&state.pool, claims.jti)
            .await?
            .ok_or(AppError::Unauthorized)?;
        if session.revoked || session.expires_at <= chrono::Utc::now() {
            return Err(AppError::Unauthorized);
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "a-test-secret-at-least-16-bytes".into(),
            token_ttl_secs: 3600,
        }
    }

    #[test]
    fn test_token_round_trip() {
        let config = test_config();
        let user_id = Uuid::new_v4();
        let issued = issue_token(&config, user_id, "sprout").unwrap();
        let claims = decode_token(&config, &issued.token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.username, "sprout");
        assert_eq!(claims.jti, issued.token_id);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issued = issue_token(&test_config(), Uuid::new_v4(), "sprout").unwrap();
        let other = AuthConfig {
            jwt_secret: "another-secret-16-bytes-long!!".into(),
            token_ttl_secs: 3600,
        };
        assert!(matches!(decode_token(&other, &issued.token), Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_password_hash_verifies() {
        let hash = hash_password("hunter22").unwrap();
        assert!(verify_password("hunter22", &hash).unwrap());
        assert!(!verify_password("hunter23", &hash).unwrap());
    }
}
