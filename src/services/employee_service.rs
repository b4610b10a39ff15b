//! Employee service - registration, enrollment and management.
//!
//! This service handles:
//! - Atomic registration (employee row + first face encoding)
//! - Additional encodings for an existing employee
//! - Lookup, listing, search, partial update and deactivation
//! - Loading the recognition gallery
//!
//! `employee_id` is the key every other table references. Uniqueness of
//! `employee_id` and `email` is checked inside the write transaction and
//! backed by the table's UNIQUE constraints.

use sqlx::{QueryBuilder, Sqlite};

use crate::{
    db::DbPool,
    error::AppError,
    face::{Embedding, GalleryEntry, encoding_hash},
    models::{
        employee::{Employee, NewEmployee, UpdateEmployeeRequest, validate_email},
        face_encoding::{FaceEncoding, GalleryRow},
    },
};

const NOW: &str = "strftime('%Y-%m-%dT%H:%M:%fZ', 'now')";

/// Register a new employee together with their first face encoding.
///
/// # Process
///
/// 1. Serialize and hash the embedding
/// 2. Start database transaction
/// 3. Insert the employee; a UNIQUE violation on `employee_id` or `email`
///    ends the registration
/// 4. Insert the encoding
/// 5. Commit (or rollback on error)
///
/// The insert is the first statement so the transaction takes SQLite's
/// write lock straight away instead of upgrading from a read lock.
///
/// # Errors
///
/// - `DuplicateEmployee`: `employee_id` or `email` already exists; nothing is written
/// - `Database`: Database error occurred
pub async fn register_employee(
    pool: &DbPool,
    employee: &NewEmployee,
    embedding: &Embedding,
    photo_path: Option<&str>,
) -> Result<Employee, AppError> {
    let encoding_data = embedding.to_json()?;
    let hash = encoding_hash(&encoding_data);

    let mut tx = pool.begin().await?;

    // Dropping `tx` on the error path rolls back
    let created = sqlx::query_as::<_, Employee>(
        r#"
        INSERT INTO employees (employee_id, name, email, department, photo_path)
        VALUES (?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(&employee.employee_id)
    .bind(&employee.name)
    .bind(&employee.email)
    .bind(&employee.department)
    .bind(photo_path)
    .fetch_one(&mut *tx)
    .await
    .map_err(AppError::from_write)?;

    sqlx::query(
        "INSERT INTO face_encodings (employee_id, encoding_data, encoding_hash) VALUES (?, ?, ?)",
    )
    .bind(&created.employee_id)
    .bind(&encoding_data)
    .bind(&hash)
    .execute(&mut *tx)
    .await?;

    // Commit both rows atomically
    tx.commit().await?;

    Ok(created)
}

/// Append another encoding (new angle, re-enrollment) to an existing employee.
///
/// A single conditional insert, so there is no read-then-write window.
pub async fn add_encoding(
    pool: &DbPool,
    employee_id: &str,
    embedding: &Embedding,
) -> Result<FaceEncoding, AppError> {
    let encoding_data = embedding.to_json()?;
    let hash = encoding_hash(&encoding_data);

    sqlx::query_as::<_, FaceEncoding>(
        r#"
        INSERT INTO face_encodings (employee_id, encoding_data, encoding_hash)
        SELECT ?, ?, ?
        WHERE EXISTS (SELECT 1 FROM employees WHERE employee_id = ?)
        RETURNING id, employee_id, encoding_hash, created_at
        "#,
    )
    .bind(employee_id)
    .bind(&encoding_data)
    .bind(&hash)
    .bind(employee_id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::EmployeeNotFound)
}

/// Every encoding that belongs to an active employee.
///
/// Rows whose `encoding_data` can't be parsed are skipped with a warning so
/// one corrupt row can't lock everybody out.
pub async fn load_gallery(pool: &DbPool) -> Result<Vec<GalleryEntry>, AppError> {
    let rows = sqlx::query_as::<_, GalleryRow>(
        r#"
        SELECT fe.employee_id, fe.encoding_data, fe.encoding_hash
        FROM face_encodings fe
        JOIN employees e ON e.employee_id = fe.employee_id
        WHERE e.is_active = 1
        "#,
    )
    .fetch_all(pool)
    .await?;

    let gallery = rows
        .into_iter()
        .filter_map(|row| match Embedding::from_json(&row.encoding_data) {
            Ok(embedding) => Some(GalleryEntry {
                employee_id: row.employee_id,
                embedding,
                encoding_hash: row.encoding_hash,
            }),
            Err(e) => {
                tracing::warn!(employee_id = %row.employee_id, error = %e, "skipping unreadable face encoding");
                None
            }
        })
        .collect();

    Ok(gallery)
}

/// Employee by business key, regardless of status.
pub async fn find_employee(pool: &DbPool, employee_id: &str) -> Result<Option<Employee>, AppError> {
    let employee = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE employee_id = ?")
        .bind(employee_id)
        .fetch_optional(pool)
        .await?;
    Ok(employee)
}

/// Employee by business key, only if active.
pub async fn find_active_employee(
    pool: &DbPool,
    employee_id: &str,
) -> Result<Option<Employee>, AppError> {
    let employee = sqlx::query_as::<_, Employee>(
        "SELECT * FROM employees WHERE employee_id = ? AND is_active = 1",
    )
    .bind(employee_id)
    .fetch_optional(pool)
    .await?;
    Ok(employee)
}

/// All employees ordered by name.
pub async fn list_employees(pool: &DbPool, include_inactive: bool) -> Result<Vec<Employee>, AppError> {
    let sql = if include_inactive {
        "SELECT * FROM employees ORDER BY name"
    } else {
        "SELECT * FROM employees WHERE is_active = 1 ORDER BY name"
    };
    let employees = sqlx::query_as::<_, Employee>(sql).fetch_all(pool).await?;
    Ok(employees)
}

/// Active employees whose name, email or employee_id contains `query`.
///
/// `%` and `_` in `query` match themselves.
pub async fn search_employees(pool: &DbPool, query: &str) -> Result<Vec<Employee>, AppError> {
    let pattern = format!("%{}%", escape_like(query.trim()));
    let employees = sqlx::query_as::<_, Employee>(
        r#"
        SELECT * FROM employees
        WHERE (name LIKE ? ESCAPE '\' OR email LIKE ? ESCAPE '\' OR employee_id LIKE ? ESCAPE '\')
          AND is_active = 1
        ORDER BY name
        "#,
    )
    .bind(&pattern)
    .bind(&pattern)
    .bind(&pattern)
    .fetch_all(pool)
    .await?;
    Ok(employees)
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Apply a partial update and bump `updated_at`.
///
/// # Errors
///
/// - `InvalidRequest`: no field given, a blank string, or a malformed email
/// - `DuplicateEmployee`: the new email belongs to someone else
/// - `EmployeeNotFound`: no such `employee_id`
pub async fn update_employee(
    pool: &DbPool,
    employee_id: &str,
    update: UpdateEmployeeRequest,
) -> Result<Employee, AppError> {
    if update.is_empty() {
        return Err(AppError::InvalidRequest(
            "No updatable fields provided".to_string(),
        ));
    }

    let mut builder: QueryBuilder<Sqlite> =
        QueryBuilder::new(format!("UPDATE employees SET updated_at = {NOW}"));

    for (column, value) in [
        ("name", update.name),
        ("email", update.email),
        ("department", update.department),
    ] {
        if let Some(value) = value {
            let value = value.trim().to_string();
            if value.is_empty() {
                return Err(AppError::InvalidRequest(format!("{column} must not be blank")));
            }
            if column == "email" {
                validate_email(&value)?;
            }
            builder.push(format!(", {column} = ")).push_bind(value);
        }
    }
    if let Some(is_active) = update.is_active {
        builder.push(", is_active = ").push_bind(is_active);
    }

    builder
        .push(" WHERE employee_id = ")
        .push_bind(employee_id.to_string())
        .push(" RETURNING *");

    builder
        .build_query_as::<Employee>()
        .fetch_optional(pool)
        .await
        .map_err(AppError::from_write)?
        .ok_or(AppError::EmployeeNotFound)
}

/// Soft delete: clear `is_active`, keep the row and its history.
pub async fn deactivate_employee(pool: &DbPool, employee_id: &str) -> Result<(), AppError> {
    let result = sqlx::query(&format!(
        "UPDATE employees SET is_active = 0, updated_at = {NOW} WHERE employee_id = ?"
    ))
    .bind(employee_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::EmployeeNotFound);
    }

    Ok(())
}
