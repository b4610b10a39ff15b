//! Employee registration HTTP handler.
//!
//! - POST /api/register - Create an employee with their first face encoding

use crate::{
    error::AppError,
    models::employee::{RegisterRequest, RegisterResponse},
    services::{employee_service, enrollment_service},
    state::AppState,
};
use axum::{Json, extract::State};

/// Register a new employee from the registration page.
///
/// # Request Body
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
/// # Response
///
/// - **200**: `{ "success": true, "message": "...", "employee_id": "EMP010" }`
/// - **400**: missing field, bad email, undecodable image
/// - **409**: `employee_id` or `email` already registered (nothing written)
/// - **422**: capture failed the quality gate or could not be encoded
///
/// Failed registrations are not written to `login_logs`.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, AppError> {
    let (employee, image) = request.validate()?;
    let (capture, embedding) =
        enrollment_service::prepare_capture(state.engine.clone(), image).await?;

    let photo = match &state.config.photo_dir {
        Some(dir) => {
            Some(enrollment_service::store_photo(dir, &employee.employee_id, capture).await?)
        }
        None => None,
    };
    let photo_path = photo.as_ref().map(|p| p.to_string_lossy().into_owned());

    let created = match employee_service::register_employee(
        &state.pool,
        &employee,
        &embedding,
        photo_path.as_deref(),
    )
    .await
    {
        Ok(created) => created,
        Err(err) => {
            if let Some(path) = &photo {
                enrollment_service::discard_photo(path).await;
            }
            tracing::warn!(employee_id = %employee.employee_id, error = %err, "registration rejected");
            return Err(err);
        }
    };

    tracing::info!(employee_id = %created.employee_id, "employee registered");

    Ok(Json(RegisterResponse {
        success: true,
        message: format!("Employee {} registered successfully!", created.name),
        employee_id: created.employee_id,
    }))
}
