use serde::Serialize;
use serde_json::json;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::{self, AuthConfig, Claims};
use crate::db::{audit_queries, portfolio_queries, session_queries, user_queries};
use crate::errors::AppError;
use crate::models::{
    AccountStatus, LoginUser, Portfolio, RegisterUser, RiskTolerance, Session, User, UserProfile,
};

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub user: UserProfile,
}

fn validate_registration(input: &RegisterUser) -> Result<(), AppError> {
    let username = input.username.trim();
    if username.len() < 3 || !username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(AppError::Validation(
            "Username must be at least 3 characters of letters, digits or underscores".into(),
        ));
    }
    if !input.email.contains('@') || input.email.trim().len() < 5 {
        return Err(AppError::Validation("Email address is malformed".into()));
    }
    if input.password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

/// Creates the user and their default portfolio in one transaction.
pub async fn register(pool: &PgPool, input: RegisterUser) -> Result<UserProfile, AppError> {
    validate_registration(&input)?;
    let username = input.username.trim().to_string();
    let email = input.email.trim().to_lowercase();

    if user_queries::username_or_email_taken(pool, &username, &email).await? {
        return Err(AppError::AlreadyExists("Username or email".into()));
    }

    let now = chrono::Utc::now();
    let user = User {
        id: Uuid::new_v4(),
        display_name: input.display_name.unwrap_or_else(|| username.clone()),
        username,
        email,
        password_hash: auth::hash_password(&input.password)?,
        status: AccountStatus::Active.as_str().to_string(),
        risk_tolerance: RiskTolerance::Moderate.as_str().to_string(),
        created_at: now,
        updated_at: now,
    };

    let mut tx = pool.begin().await?;
    let user = user_queries::insert(&mut *tx, &user).await?;
    portfolio_queries::insert(&mut *tx, &Portfolio::new(user.id, "My Portfolio".into())).await?;
    audit_queries::insert(
        &mut *tx,
        Some(user.id),
        "auth.register",
        "user",
        Some(user.id),
        json!({ "username": user.username }),
    )
    .await?;
    tx.commit().await?;
    info!("Registered user {} ({})", user.username, user.id);
    Ok(user.profile())
}

pub async fn login(pool: &PgPool, config: &AuthConfig, input: LoginUser) -> Result<AuthResponse, AppError> {
    let user = match user_queries::fetch_by_username(pool, input.username.trim()).await? {
        Some(user) => user,
        None => {
            warn!("Login attempt for unknown username");
            return Err(AppError::Unauthorized);
        }
    };
    if !auth::verify_password(&input.password, &user.password_hash)? {
        warn!("Bad password for user {}", user.id);
        return Err(AppError::Unauthorized);
    }
    if user.status()? != AccountStatus::Active {
        return Err(AppError::Forbidden);
    }

    let issued = auth::issue_token(config, user.id, &user.username)?;
    session_queries::insert(
        pool,
        &Session {
            id: Uuid::new_v4(),
            user_id: user.id,
            token_id: issued.token_id,
            expires_at: issued.expires_at,
            revoked: false,
            created_at: chrono::Utc::now(),
        },
    )
    .await?;
    audit_queries::insert(pool, Some(user.id), "auth.login", "user", Some(user.id), json!({}))
        .await?;
    Ok(AuthResponse {
        token: issued.token,
        expires_at: issued.expires_at,
        user: user.profile(),
    })
}

pub async fn logout(pool: &PgPool, claims: &Claims) -> Result<(), AppError> {
    session_queries::revoke(pool, claims.jti).await?;
    audit_queries::insert(pool, Some(claims.sub), "auth.logout", "user", Some(claims.sub), json!({}))
        .await?;
    Ok(())
}
