use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{audit_queries, user_queries};
use crate::errors::AppError;
use crate::models::{AccountStatus, UpdateProfile, UserProfile};

pub async fn fetch_profile(pool: &PgPool, user_id: Uuid) -> Result<UserProfile, AppError> {
    let user = user_queries::fetch_one(pool, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User".into()))?;
    Ok(user.profile())
}

pub async fn update_profile(
    pool: &PgPool,
    user_id: Uuid,
    input: UpdateProfile,
) -> Result<UserProfile, AppError> {
    let current = user_queries::fetch_one(pool, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User".into()))?;

    let display_name = match input.display_name {
        Some(name) => {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(AppError::Validation("Display name cannot be empty".into()));
            }
            name
        }
        None => current.display_name.clone(),
    };
    let risk_tolerance = input
        .risk_tolerance
        .map(|r| r.as_str().to_string())
        .unwrap_or_else(|| current.risk_tolerance.clone());

    let user = user_queries::update_profile(pool, user_id, &display_name, &risk_tolerance)
        .await?
        .ok_or_else(|| AppError::NotFound("User".into()))?;
    Ok(user.profile())
}

/// Moves an account between ACTIVE/SUSPENDED/DEACTIVATED along the allowed
/// edges; anything else is InvalidStateTransition.
pub async fn change_status(
    pool: &PgPool,
    user_id: Uuid,
    next: AccountStatus,
) -> Result<UserProfile, AppError> {
    let user = user_queries::fetch_one(pool, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User".into()))?;
    let current = user.status()?;
    if !current.can_transition_to(next) {
        return Err(AppError::InvalidStateTransition(format!("{} -> {}", current, next)));
    }
    let updated = user_queries::update_status(pool, user_id, next.as_str())
        .await?
        .ok_or_else(|| AppError::NotFound("User".into()))?;
    audit_queries::insert(
        pool,
        Some(user_id),
        "user.status_change",
        "user",
        Some(user_id),
        json!({ "from": current.as_str(), "to": next.as_str() }),
    )
    .await?;
    Ok(updated.profile())
}
