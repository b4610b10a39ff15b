//! Stored face encodings.
//!
//! Each row is one enrollment of one employee. Rows are written once and
//! never updated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Represents a row of the `face_encodings` table.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct FaceEncoding {
    pub id: i64,

    /// References `employees.employee_id` (enforced by the application)
    pub employee_id: String,

    /// SHA-256 hex of `encoding_data`, compared before any vector math
    pub encoding_hash: String,

    pub created_at: DateTime<Utc>,
}

/// Request body for `POST /api/employees/{employee_id}/encodings`.
#[derive(Debug, Deserialize)]
pub struct AddEncodingRequest {
    pub image: Option<String>,
}

/// An encoding joined with its (active) owner, as loaded for recognition.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GalleryRow {
    pub employee_id: String,
    pub encoding_data: String,
    pub encoding_hash: String,
}
