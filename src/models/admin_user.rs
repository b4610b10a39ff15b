//! Administrator credentials.
//!
//! Admin users are stored separately from employees and are only used to
//! guard the management endpoints. Passwords are stored as SHA-256 hashes
//! and only ever compared inside the lookup query.

/// The identity columns of an active `admin_users` row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AdminUser {
    pub id: i64,

    pub username: String,
}
