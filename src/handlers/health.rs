//! Health check endpoint for service monitoring.

use crate::{db::DbPool, error::AppError};
use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Health check response.
///
/// Returns service status, database connectivity and how many faces
/// recognition can currently match against.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall service status
    pub status: String,

    /// Database connection status
    pub database: String,

    /// Stored encodings belonging to active employees
    pub enrolled_faces: i64,

    /// Current server timestamp
    pub timestamp: DateTime<Utc>,
}

/// Health check handler.
///
/// # Response (200 OK)
///
/// ```json
/// {
///   "status": "healthy",
///   "database": "connected",
///   "enrolled_faces": 3,
///   "timestamp": "2025-01-06T09:00:00Z"
/// }
/// ```
///
/// # Response (500 Internal Server Error)
///
/// If the database is unreachable, returns the standard error response.
pub async fn health_check(State(pool): State<DbPool>) -> Result<Json<HealthResponse>, AppError> {
    let enrolled_faces: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM face_encodings fe
         JOIN employees e ON e.employee_id = fe.employee_id
         WHERE e.is_active = 1",
    )
    .fetch_one(&pool)
    .await?;

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        database: "connected".to_string(),
        enrolled_faces,
        timestamp: Utc::now(),
    }))
}
