//! Administrator authentication middleware.
//!
//! This middleware guards the management endpoints:
//! 1. Extract HTTP Basic credentials from the Authorization header
//! 2. Hash the password and look up an active admin with that username and hash
//! 3. Inject the admin context into the request
//! 4. Reject everything else with HTTP 401

use crate::{db::DbPool, error::AppError, models::admin_user::AdminUser};
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use base64::{Engine, prelude::BASE64_STANDARD};
use sha2::{Digest, Sha256};

/// Authentication context attached to admin requests.
#[derive(Debug, Clone)]
pub struct AdminContext {
    pub admin_id: i64,
    pub username: String,
}

/// Admin authentication middleware function.
///
/// # Headers
///
/// Expected header format:
/// ```text
/// Authorization: Basic base64(username:password)
/// ```
///
/// # Returns
///
/// - `Ok(Response)` if authenticated successfully (calls next handler)
/// - `Err(AppError::InvalidAdminCredentials)` otherwise (returns 401)
pub async fn admin_auth_middleware(
    State(pool): State<DbPool>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::InvalidAdminCredentials)?;

    let (username, password) =
        parse_basic(auth_header).ok_or(AppError::InvalidAdminCredentials)?;

    let admin = sqlx::query_as::<_, AdminUser>(
        "SELECT id, username
         FROM admin_users
         WHERE username = ? AND password_hash = ? AND is_active = 1",
    )
    .bind(&username)
    .bind(hash_password(&password))
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| {
        tracing::warn!(username = %username, "rejected admin credentials");
        AppError::InvalidAdminCredentials
    })?;

    request.extensions_mut().insert(AdminContext {
        admin_id: admin.id,
        username: admin.username,
    });

    Ok(next.run(request).await)
}

/// SHA-256 hex digest, the format stored in `admin_users.password_hash`.
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Split `Basic <base64(user:pass)>` into its parts.
fn parse_basic(header_value: &str) -> Option<(String, String)> {
    let encoded = header_value.strip_prefix("Basic ")?;
    let decoded = BASE64_STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_admin_hash_matches() {
        assert_eq!(
            hash_password("admin123"),
            "240be518fabd2724ddb6f04eeb1da5967448d7e831c08c8fa822809f74c720a9"
        );
    }

    #[test]
    fn parses_basic_credentials() {
        let header = format!("Basic {}", BASE64_STANDARD.encode("admin:s3:cret"));
        assert_eq!(
            parse_basic(&header),
            Some(("admin".to_string(), "s3:cret".to_string()))
        );
    }

    #[test]
    fn rejects_other_schemes() {
        assert_eq!(parse_basic("Bearer abc"), None);
        assert_eq!(parse_basic("Basic !!!"), None);
    }
}
