//! HTTP middleware components and request extractors.

/// Admin HTTP Basic authentication middleware
pub mod auth;
/// Client address / user agent extractor for the audit trail
pub mod requester;
