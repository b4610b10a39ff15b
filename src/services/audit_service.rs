//! Login audit trail - recording attempts and reporting on them.
//!
//! `login_logs` is append-only. Nothing in this crate updates or deletes
//! its rows.

use crate::{
    db::DbPool,
    error::AppError,
    models::login_log::{LoginLog, NewLoginLog, RecentLogin, SystemStats},
};

/// Upper bound for `GET /api/login-history?limit=`.
pub const MAX_HISTORY_LIMIT: i64 = 500;
pub const DEFAULT_HISTORY_LIMIT: i64 = 50;

/// Append one attempt to the audit trail.
pub async fn record_attempt(pool: &DbPool, attempt: &NewLoginLog) -> Result<i64, AppError> {
    let id = sqlx::query(
        r#"
        INSERT INTO login_logs (
            employee_id,
            confidence_score,
            success,
            ip_address,
            user_agent,
            failure_reason
        )
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&attempt.employee_id)
    .bind(attempt.confidence_score)
    .bind(attempt.success)
    .bind(&attempt.ip_address)
    .bind(&attempt.user_agent)
    .bind(&attempt.failure_reason)
    .execute(pool)
    .await?
    .last_insert_rowid();

    Ok(id)
}

/// Newest-first login history, optionally for one employee.
///
/// `limit` is clamped to `1..=MAX_HISTORY_LIMIT`.
pub async fn login_history(
    pool: &DbPool,
    employee_id: Option<&str>,
    limit: i64,
) -> Result<Vec<LoginLog>, AppError> {
    let limit = limit.clamp(1, MAX_HISTORY_LIMIT);
    let logs = sqlx::query_as::<_, LoginLog>(
        r#"
        SELECT
            ll.id,
            ll.employee_id,
            e.name AS employee_name,
            ll.login_time,
            ll.confidence_score,
            ll.ip_address,
            ll.user_agent,
            ll.success,
            ll.failure_reason
        FROM login_logs ll
        LEFT JOIN employees e ON ll.employee_id = e.employee_id
        WHERE ? IS NULL OR ll.employee_id = ?
        ORDER BY ll.login_time DESC, ll.id DESC
        LIMIT ?
        "#,
    )
    .bind(employee_id)
    .bind(employee_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(logs)
}

/// Dashboard counters. "Today" is the current UTC day.
pub async fn system_stats(pool: &DbPool) -> Result<SystemStats, AppError> {
    let total_employees: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM employees WHERE is_active = 1")
            .fetch_one(pool)
            .await?;

    let today_logins: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM login_logs WHERE date(login_time) = date('now') AND success = 1",
    )
    .fetch_one(pool)
    .await?;

    let failed_attempts: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM login_logs WHERE date(login_time) = date('now') AND success = 0",
    )
    .fetch_one(pool)
    .await?;

    let recent_login = sqlx::query_as::<_, RecentLogin>(
        r#"
        SELECT ll.employee_id, e.name, ll.login_time
        FROM login_logs ll
        JOIN employees e ON ll.employee_id = e.employee_id
        WHERE ll.success = 1
        ORDER BY ll.login_time DESC, ll.id DESC
        LIMIT 1
        "#,
    )
    .fetch_optional(pool)
    .await?;

    Ok(SystemStats {
        total_employees,
        today_logins,
        failed_attempts,
        recent_login,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{db::test_pool, models::login_log::Requester};

    fn requester() -> Requester {
        Requester {
            ip_address: Some("10.1.2.3".into()),
            user_agent: Some("test-agent".into()),
        }
    }

    #[tokio::test]
    async fn recorded_attempt_is_readable() {
        let pool = test_pool().await;
        record_attempt(&pool, &NewLoginLog::success("EMP002", 0.82, &requester()))
            .await
            .unwrap();

        let history = login_history(&pool, Some("EMP002"), 1).await.unwrap();
        assert_eq!(history.len(), 1);
        let row = &history[0];
        assert!(row.success);
        assert_eq!(row.confidence_score, Some(0.82));
        assert_eq!(row.employee_name.as_deref(), Some("Sarah Johnson"));
        assert_eq!(row.ip_address.as_deref(), Some("10.1.2.3"));
        assert_eq!(row.failure_reason, None);
    }

    #[tokio::test]
    async fn unmatched_attempt_has_no_identity() {
        let pool = test_pool().await;
        record_attempt(
            &pool,
            &NewLoginLog::failure(None, 0.0, "No face detected in image", &requester()),
        )
        .await
        .unwrap();

        let newest = &login_history(&pool, None, 1).await.unwrap()[0];
        assert!(!newest.success);
        assert_eq!(newest.employee_id, None);
        assert_eq!(newest.employee_name, None);
        assert_eq!(newest.failure_reason.as_deref(), Some("No face detected in image"));
    }

    #[tokio::test]
    async fn history_is_newest_first_and_limited() {
        let pool = test_pool().await;
        let all = login_history(&pool, None, 50).await.unwrap();
        assert_eq!(all.len(), 3);
        assert!(all.windows(2).all(|w| w[0].login_time >= w[1].login_time));

        assert_eq!(login_history(&pool, None, 2).await.unwrap().len(), 2);
        // Non-positive limits still return something useful
        assert_eq!(login_history(&pool, None, 0).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn stats_count_today_only() {
        let pool = test_pool().await;
        record_attempt(&pool, &NewLoginLog::success("EMP001", 0.9, &requester()))
            .await
            .unwrap();
        record_attempt(&pool, &NewLoginLog::failure(None, 0.4, "no match", &requester()))
            .await
            .unwrap();
        record_attempt(&pool, &NewLoginLog::failure(None, 0.3, "no match", &requester()))
            .await
            .unwrap();

        let stats = system_stats(&pool).await.unwrap();
        assert_eq!(stats.total_employees, 3);
        // Seed rows are dated 2025-01-06 and don't count
        assert_eq!(stats.today_logins, 1);
        assert_eq!(stats.failed_attempts, 2);
        assert_eq!(stats.recent_login.unwrap().employee_id, "EMP001");
    }
}
