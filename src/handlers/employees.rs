//! Employee management HTTP handlers.
//!
//! Admin only:
//! - GET /api/employees - List employees
//! - GET /api/employees/{employee_id} - Get one employee
//! - PUT /api/employees/{employee_id} - Partial update
//! - DELETE /api/employees/{employee_id} - Deactivate
//! - POST /api/employees/{employee_id}/encodings - Enroll another face capture
//! - GET /api/search?q= - Search active employees
//!
//! Public:
//! - GET /api/dashboard/{employee_id} - Profile and recent logins after a face login

use crate::{
    error::AppError,
    middleware::auth::AdminContext,
    models::{
        employee::{EmployeeResponse, ListEmployeesQuery, SearchQuery, UpdateEmployeeRequest},
        face_encoding::{AddEncodingRequest, FaceEncoding},
    },
    services::{audit_service, employee_service, enrollment_service},
    state::AppState,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde_json::{Value, json};

/// Number of login rows shown on the employee dashboard.
const DASHBOARD_HISTORY: i64 = 10;

/// List employees ordered by name. Inactive ones only with `?include_inactive=true`.
pub async fn list_employees(
    State(state): State<AppState>,
    Query(query): Query<ListEmployeesQuery>,
) -> Result<Json<Value>, AppError> {
    let employees: Vec<EmployeeResponse> =
        employee_service::list_employees(&state.pool, query.include_inactive)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

    Ok(Json(json!({ "success": true, "employees": employees })))
}

/// Get one employee, active or not.
///
/// # Response
///
/// - **200**: `{ "success": true, "employee": { ... } }`
/// - **404**: unknown `employee_id`
pub async fn get_employee(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let employee: EmployeeResponse = employee_service::find_employee(&state.pool, &employee_id)
        .await?
        .ok_or(AppError::EmployeeNotFound)?
        .into();

    Ok(Json(json!({ "success": true, "employee": employee })))
}

/// Update `name`, `email`, `department` and/or `is_active`.
///
/// Setting `is_active` back to `true` is how a deactivated employee is restored.
pub async fn update_employee(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminContext>,
    Path(employee_id): Path<String>,
    Json(request): Json<UpdateEmployeeRequest>,
) -> Result<Json<Value>, AppError> {
    let employee: EmployeeResponse =
        employee_service::update_employee(&state.pool, &employee_id, request)
            .await?
            .into();

    tracing::info!(
        admin_id = admin.admin_id,
        admin = %admin.username,
        employee_id = %employee_id,
        "employee updated"
    );

    Ok(Json(json!({
        "success": true,
        "message": "Employee updated successfully",
        "employee": employee
    })))
}

/// Deactivate an employee. Their encodings stop matching; history is kept.
pub async fn deactivate_employee(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminContext>,
    Path(employee_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    employee_service::deactivate_employee(&state.pool, &employee_id).await?;

    tracing::info!(
        admin_id = admin.admin_id,
        admin = %admin.username,
        employee_id = %employee_id,
        "employee deactivated"
    );

    Ok(Json(json!({
        "success": true,
        "message": "Employee deactivated successfully"
    })))
}

/// Enroll an additional face capture for an existing employee.
pub async fn add_encoding(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminContext>,
    Path(employee_id): Path<String>,
    Json(request): Json<AddEncodingRequest>,
) -> Result<Json<Value>, AppError> {
    let image = request
        .image
        .filter(|s| !s.trim().is_empty())
        .ok_or(AppError::MissingField("image"))?;
    let (_, embedding) = enrollment_service::prepare_capture(state.engine.clone(), image).await?;

    let encoding: FaceEncoding =
        employee_service::add_encoding(&state.pool, &employee_id, &embedding).await?;

    tracing::info!(
        admin_id = admin.admin_id,
        admin = %admin.username,
        employee_id = %employee_id,
        "face encoding added"
    );

    Ok(Json(json!({
        "success": true,
        "message": "Face encoding added",
        "encoding": encoding
    })))
}

/// Search active employees by name, email or employee id substring.
pub async fn search_employees(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Value>, AppError> {
    if query.q.trim().is_empty() {
        return Err(AppError::InvalidRequest("Search query required".to_string()));
    }

    let results: Vec<EmployeeResponse> = employee_service::search_employees(&state.pool, &query.q)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(json!({ "success": true, "results": results })))
}

/// Data for the page a successful face login redirects to.
///
/// Only active employees have a dashboard.
pub async fn dashboard(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let employee: EmployeeResponse =
        employee_service::find_active_employee(&state.pool, &employee_id)
            .await?
            .ok_or(AppError::EmployeeNotFound)?
            .into();
    let login_history =
        audit_service::login_history(&state.pool, Some(&employee_id), DASHBOARD_HISTORY).await?;

    Ok(Json(json!({
        "success": true,
        "employee": employee,
        "login_history": login_history
    })))
}
