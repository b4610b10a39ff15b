//! Employee data models and API request/response types.
//!
//! This module defines:
//! - `Employee`: Database entity representing an employee
//! - `RegisterRequest`: Request body sent by the registration page
//! - `UpdateEmployeeRequest`: Partial update sent by administrators
//! - `EmployeeResponse`: Response body returned to clients

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Represents an employee record from the database.
///
/// # Database Table
///
/// Maps to the `employees` table. The business key `employee_id` is what
/// every other table references; `id` is only a surrogate row number.
///
/// Employees are never deleted. Deactivation clears `is_active`, which
/// removes the employee's encodings from recognition while keeping their
/// login history intact.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Employee {
    /// Surrogate row id
    pub id: i64,

    /// Business key, e.g. `EMP001`
    pub employee_id: String,

    pub name: String,

    /// Unique across all employees, active or not
    pub email: String,

    pub department: String,

    /// Where the registration capture was written, if photo storage is enabled
    pub photo_path: Option<String>,

    pub is_active: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Request body for `POST /api/register`.
///
/// # JSON Example
///
/// ```json
/// {
///   "employee_id": "EMP010",
///   "name": "Alex Lee",
///   "email": "alex.lee@company.com",
///   "department": "IT",
///   "image": "data:image/jpeg;base64,/9j/4AAQ..."
/// }
/// ```
///
/// Every field is optional at the serde level so that a missing field
/// produces a `Missing required field` message instead of a generic
/// deserialization rejection.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    pub employee_id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub department: Option<String>,
    pub image: Option<String>,
}

/// Validated registration fields, trimmed and non-empty.
#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub employee_id: String,
    pub name: String,
    pub email: String,
    pub department: String,
}

impl RegisterRequest {
    /// Check required fields and split off the image payload.
    ///
    /// Fields are checked in the order the registration form lists them.
    pub fn validate(self) -> Result<(NewEmployee, String), AppError> {
        let employee_id = required(self.employee_id, "employee_id")?;
        let name = required(self.name, "name")?;
        let email = required(self.email, "email")?;
        let department = required(self.department, "department")?;
        let image = required(self.image, "image")?;

        validate_email(&email)?;

        Ok((
            NewEmployee {
                employee_id,
                name,
                email,
                department,
            },
            image,
        ))
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, AppError> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::MissingField(field)),
    }
}

/// Minimal shape check: exactly one `@` with something on both sides.
pub fn validate_email(email: &str) -> Result<(), AppError> {
    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(AppError::InvalidRequest(format!(
            "Invalid email address: {email}"
        ))),
    }
}

/// Request body for `PUT /api/employees/{employee_id}`.
///
/// Only the fields present are changed. `employee_id` itself is immutable.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateEmployeeRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub department: Option<String>,
    pub is_active: Option<bool>,
}

impl UpdateEmployeeRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.department.is_none()
            && self.is_active.is_none()
    }
}

/// Query string for `GET /api/employees`.
#[derive(Debug, Default, Deserialize)]
pub struct ListEmployeesQuery {
    #[serde(default)]
    pub include_inactive: bool,
}

/// Query string for `GET /api/search`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Response body for employee endpoints.
///
/// # JSON Example
///
/// ```json
/// {
///   "employee_id": "EMP001",
///   "name": "John Smith",
///   "email": "john.smith@company.com",
///   "department": "Engineering",
///   "photo_path": null,
///   "is_active": true,
///   "created_at": "2025-01-01T09:00:00Z",
///   "updated_at": "2025-01-01T09:00:00Z"
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct EmployeeResponse {
    pub employee_id: String,
    pub name: String,
    pub email: String,
    pub department: String,
    pub photo_path: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Convert database Employee to API EmployeeResponse.
///
/// This drops the surrogate `id`, which clients never address.
impl From<Employee> for EmployeeResponse {
    fn from(employee: Employee) -> Self {
        Self {
            employee_id: employee.employee_id,
            name: employee.name,
            email: employee.email,
            department: employee.department,
            photo_path: employee.photo_path,
            is_active: employee.is_active,
            created_at: employee.created_at,
            updated_at: employee.updated_at,
        }
    }
}

/// Response body for `POST /api/register`.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub message: String,
    pub employee_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_request() -> RegisterRequest {
        RegisterRequest {
            employee_id: Some(" EMP010 ".into()),
            name: Some("Alex Lee".into()),
            email: Some("alex.lee@company.com".into()),
            department: Some("IT".into()),
            image: Some("data:image/png;base64,AAAA".into()),
        }
    }

    #[test]
    fn validate_trims_and_splits_image() {
        let (employee, image) = full_request().validate().unwrap();
        assert_eq!(employee.employee_id, "EMP010");
        assert_eq!(employee.department, "IT");
        assert!(image.starts_with("data:image/png"));
    }

    #[test]
    fn blank_field_is_reported_by_name() {
        let request = RegisterRequest {
            name: Some("   ".into()),
            ..full_request()
        };
        match request.validate() {
            Err(AppError::MissingField(field)) => assert_eq!(field, "name"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn missing_image_is_reported() {
        let request = RegisterRequest {
            image: None,
            ..full_request()
        };
        assert!(matches!(
            request.validate(),
            Err(AppError::MissingField("image"))
        ));
    }

    #[test]
    fn email_shape() {
        assert!(validate_email("a@b").is_ok());
        assert!(validate_email("ab").is_err());
        assert!(validate_email("@b").is_err());
        assert!(validate_email("a@b@c").is_err());
    }

    #[test]
    fn empty_update_is_detected() {
        assert!(UpdateEmployeeRequest::default().is_empty());
        let update = UpdateEmployeeRequest {
            is_active: Some(false),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }
}
