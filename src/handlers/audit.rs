//! Login audit HTTP handlers (admin only).
//!
//! - GET /api/login-history - Recent login attempts
//! - GET /api/stats - Dashboard counters

use crate::{
    db::DbPool,
    error::AppError,
    models::login_log::LoginHistoryQuery,
    services::audit_service::{self, DEFAULT_HISTORY_LIMIT},
};
use axum::{
    Json,
    extract::{Query, State},
};
use serde_json::{Value, json};

/// Login attempts, newest first.
///
/// # Query Parameters
///
/// - `employee_id` - restrict to one employee
/// - `limit` - number of rows, default 50, at most 500
pub async fn login_history(
    State(pool): State<DbPool>,
    Query(query): Query<LoginHistoryQuery>,
) -> Result<Json<Value>, AppError> {
    let history = audit_service::login_history(
        &pool,
        query.employee_id.as_deref(),
        query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT),
    )
    .await?;

    Ok(Json(json!({ "success": true, "login_history": history })))
}

/// Active employee count, today's successes and failures, most recent login.
pub async fn stats(State(pool): State<DbPool>) -> Result<Json<Value>, AppError> {
    let stats = audit_service::system_stats(&pool).await?;

    Ok(Json(json!({ "success": true, "stats": stats })))
}
