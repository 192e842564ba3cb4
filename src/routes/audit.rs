use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use tracing::info;

use crate::auth::Claims;
use crate::db::audit_queries;
use crate::errors::AppError;
use crate::models::{AuditQuery, AuditRecord};
use crate::state::AppState;

const DEFAULT_LIMIT: i64 = 100;
const MAX_LIMIT: i64 = 1000;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_audit_records))
}

pub async fn list_audit_records(
    State(state): State<AppState>,
    claims: Claims,
    Query(params): Query<AuditQuery>,
) -> Result<Json<Vec<AuditRecord>>, AppError> {
    info!("GET /audit - Listing audit records for {}", claims.sub);
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let records = audit_queries::fetch_for_user(&state.pool, claims.sub, limit).await?;
    Ok(Json(records))
}
