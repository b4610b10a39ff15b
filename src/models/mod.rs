//! Data models representing database entities.
//!
//! This module contains all data structures that map to database tables,
//! plus the request and response bodies of the JSON API.

/// Administrator credential model
pub mod admin_user;
/// Employee model
pub mod employee;
pub mod face_encoding;
/// Login audit model
pub mod login_log;
pub mod recognition;
