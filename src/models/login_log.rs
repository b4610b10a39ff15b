//! Login audit models.
//!
//! Every recognition attempt, matched or not, appends exactly one
//! `login_logs` row. Rows are never updated or deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Represents a login log record joined with the employee's name.
///
/// # Database Table
///
/// Maps to `login_logs` LEFT JOIN `employees`. `employee_id` is NULL when
/// no candidate was found; `employee_name` is NULL in that case too.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct LoginLog {
    pub id: i64,

    /// Matched or best-candidate employee, if any
    pub employee_id: Option<String>,

    pub employee_name: Option<String>,

    pub login_time: DateTime<Utc>,

    /// Similarity reported by the matcher for this attempt
    pub confidence_score: Option<f64>,

    pub ip_address: Option<String>,

    pub user_agent: Option<String>,

    pub success: bool,

    /// Why the attempt was rejected, NULL on success
    pub failure_reason: Option<String>,
}

/// Who made a request, as far as the server can tell.
#[derive(Debug, Clone, Default)]
pub struct Requester {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// Data needed to insert one `login_logs` row.
#[derive(Debug, Clone)]
pub struct NewLoginLog {
    pub employee_id: Option<String>,
    pub confidence_score: f64,
    pub success: bool,
    pub failure_reason: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl NewLoginLog {
    pub fn success(employee_id: &str, confidence: f64, requester: &Requester) -> Self {
        Self {
            employee_id: Some(employee_id.to_string()),
            confidence_score: confidence,
            success: true,
            failure_reason: None,
            ip_address: requester.ip_address.clone(),
            user_agent: requester.user_agent.clone(),
        }
    }

    pub fn failure(
        employee_id: Option<&str>,
        confidence: f64,
        reason: impl Into<String>,
        requester: &Requester,
    ) -> Self {
        Self {
            employee_id: employee_id.map(str::to_string),
            confidence_score: confidence,
            success: false,
            failure_reason: Some(reason.into()),
            ip_address: requester.ip_address.clone(),
            user_agent: requester.user_agent.clone(),
        }
    }
}

/// Query string for `GET /api/login-history`.
#[derive(Debug, Default, Deserialize)]
pub struct LoginHistoryQuery {
    pub employee_id: Option<String>,
    pub limit: Option<i64>,
}

/// Most recent successful login, shown on the admin dashboard.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct RecentLogin {
    pub employee_id: String,
    pub name: String,
    pub login_time: DateTime<Utc>,
}

/// Response body for `GET /api/stats`.
#[derive(Debug, Serialize)]
pub struct SystemStats {
    pub total_employees: i64,
    pub today_logins: i64,
    pub failed_attempts: i64,
    pub recent_login: Option<RecentLogin>,
}
