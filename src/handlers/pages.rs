//! Capture client pages and assets, embedded at compile time.

use axum::{
    http::header,
    response::{Html, IntoResponse},
};

pub async fn index() -> Html<&'static str> {
    Html(include_str!("../../static/index.html"))
}

pub async fn login() -> Html<&'static str> {
    Html(include_str!("../../static/login.html"))
}

pub async fn register() -> Html<&'static str> {
    Html(include_str!("../../static/register.html"))
}

/// Reads `?employee_id=` client-side and calls `/api/dashboard/{employee_id}`.
pub async fn dashboard() -> Html<&'static str> {
    Html(include_str!("../../static/dashboard.html"))
}

pub async fn capture_js() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        include_str!("../../static/capture.js"),
    )
}

pub async fn style_css() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        include_str!("../../static/style.css"),
    )
}
