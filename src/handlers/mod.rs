//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, URL params, etc.)
//! 2. Delegates to a service for the actual work
//! 3. Returns HTTP response (JSON, status code)

/// Login history and statistics endpoints
pub mod audit;
/// Employee management and dashboard endpoints
pub mod employees;
/// Health check endpoint
pub mod health;
/// Capture client pages
pub mod pages;
/// Face login endpoint
pub mod recognition;
/// Employee registration endpoint
pub mod registration;
