use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::models::User;

const USER_COLUMNS: &str =
    "id, username, email, password_hash, display_name, status, risk_tolerance, created_at, updated_at";

pub async fn insert(exec: impl PgExecutor<'_>, user: &User) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "INSERT INTO users (id, username, email, password_hash, display_name, status, risk_tolerance, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
         RETURNING id, username, email, password_hash, display_name, status, risk_tolerance, created_at, updated_at",
    )
    .bind(user.id)
    .bind(&user.username)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(&user.display_name)
    .bind(&user.status)
    .bind(&user.risk_tolerance)
    .bind(user.created_at)
    .bind(user.updated_at)
    .fetch_one(exec)
    .await
}

pub async fn fetch_one(pool: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn fetch_by_username(pool: &PgPool, username: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1"))
        .bind(username)
        .fetch_optional(pool)
        .await
}

pub async fn username_or_email_taken(
    pool: &PgPool,
    username: &str,
    email: &str,
) -> Result<bool, sqlx::Error> {
    let row: (bool,) = sqlx::query_as(
        "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1 OR email = $2)",
    )
    .bind(username)
    .bind(email)
    .fetch_one(pool)
    .await?;
    Ok(row.0)
}

pub async fn update_profile(
    pool: &PgPool,
    id: Uuid,
    display_name: &str,
    risk_tolerance: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "UPDATE users
         SET display_name = $2, risk_tolerance = $3, updated_at = now()
         WHERE id = $1
         RETURNING id, username, email, password_hash, display_name, status, risk_tolerance, created_at, updated_at",
    )
    .bind(id)
    .bind(display_name)
    .bind(risk_tolerance)
    .fetch_optional(pool)
    .await
}

pub async fn update_status(
    pool: &PgPool,
    id: Uuid,
    status: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "UPDATE users SET status = $2, updated_at = now()
         WHERE id = $1
         RETURNING id, username, email, password_hash, display_name, status, risk_tolerance, created_at, updated_at",
    )
    .bind(id)
    .bind(status)
    .fetch_optional(pool)
    .await
}
