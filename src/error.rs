//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Application-wide error type.
///
/// Each variant maps to a specific HTTP status code and error message.
/// Recognition outcomes such as "no match" are not errors: those are logged
/// attempts and answered with `success: false` and a 200 status.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed (e.g., connection error, query error).
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored or computed encoding could not be (de)serialized.
    #[error("Encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    /// Writing a registration photo failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Face processing on the blocking pool panicked or was cancelled.
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// Request body or parameters are invalid.
    ///
    /// Returns HTTP 400 Bad Request.
    /// The String contains details about what was invalid.
    #[error("Invalid request")]
    InvalidRequest(String),

    /// A required field was absent or blank.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// The `image` payload was not a decodable base64 image.
    #[error("Invalid image format")]
    InvalidImage,

    /// The capture was decoded but rejected by the face quality gate.
    #[error("{0}")]
    FaceQuality(String),

    /// The face engine could not produce an encoding from the capture.
    #[error("Could not generate face encoding. Please try with a clearer image.")]
    NoFaceEncoding,

    /// `employee_id` or `email` is already taken.
    #[error("Employee ID or email already exists")]
    DuplicateEmployee,

    /// No employee with the requested `employee_id`.
    #[error("Employee not found")]
    EmployeeNotFound,

    /// Admin credentials are missing, wrong, or belong to an inactive admin.
    #[error("Invalid admin credentials")]
    InvalidAdminCredentials,
}

impl AppError {
    /// Map a failed insert/update to `DuplicateEmployee` when SQLite reports
    /// a unique constraint violation.
    pub fn from_write(err: sqlx::Error) -> Self {
        match err.as_database_error() {
            Some(db) if db.is_unique_violation() => AppError::DuplicateEmployee,
            _ => AppError::Database(err),
        }
    }
}

/// Convert AppError into an HTTP response.
///
/// # Response Format
///
/// All errors return JSON in the shape the capture client understands:
/// ```json
/// {
///   "success": false,
///   "code": "error_type",
///   "message": "Human-readable error message"
/// }
/// ```
///
/// Internal errors are logged and replaced with a generic message.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Map each error variant to (HTTP status, error code, message)
        let (status, code, message) = match self {
            AppError::Database(ref e) => {
                tracing::error!(error = %e, "database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Encoding(ref e) => {
                tracing::error!(error = %e, "encoding error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Io(ref e) => {
                tracing::error!(error = %e, "i/o error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Task(ref e) => {
                tracing::error!(error = %e, "face processing task failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::InvalidRequest(ref msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request", msg.clone())
            }
            AppError::MissingField(_) => {
                (StatusCode::BAD_REQUEST, "missing_field", self.to_string())
            }
            AppError::InvalidImage => (StatusCode::BAD_REQUEST, "invalid_image", self.to_string()),
            AppError::FaceQuality(ref msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "face_quality", msg.clone())
            }
            AppError::NoFaceEncoding => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "no_face_encoding",
                self.to_string(),
            ),
            AppError::DuplicateEmployee => {
                (StatusCode::CONFLICT, "duplicate_employee", self.to_string())
            }
            AppError::EmployeeNotFound => {
                (StatusCode::NOT_FOUND, "employee_not_found", self.to_string())
            }
            AppError::InvalidAdminCredentials => (
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                self.to_string(),
            ),
        };

        let body = Json(json!({
            "success": false,
            "code": code,
            "message": message
        }));

        let mut response = (status, body).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static("Basic realm=\"admin\""),
            );
        }
        response
    }
}
