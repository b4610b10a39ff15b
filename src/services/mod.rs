//! Business logic services.
//!
//! Services contain core business logic separated from HTTP handlers.
//! They handle database transactions, validation, and the recognition flow.

pub mod audit_service;
pub mod employee_service;
pub mod enrollment_service;
pub mod recognition_service;
