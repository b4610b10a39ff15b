//! HTTP router assembly.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{handlers, middleware, state::AppState};

/// Build the full application router.
///
/// - Pages, static assets and `/health` are public.
/// - `/api/recognize`, `/api/register` and `/api/dashboard/{employee_id}`
///   are public; every other `/api` route requires admin credentials.
/// - CORS applies to `/api` only.
pub fn build_router(state: AppState) -> Router {
    // Admin routes (management and audit)
    let admin_routes = Router::new()
        .route("/api/employees", get(handlers::employees::list_employees))
        .route(
            "/api/employees/{employee_id}",
            get(handlers::employees::get_employee)
                .put(handlers::employees::update_employee)
                .delete(handlers::employees::deactivate_employee),
        )
        .route(
            "/api/employees/{employee_id}/encodings",
            post(handlers::employees::add_encoding),
        )
        .route("/api/login-history", get(handlers::audit::login_history))
        .route("/api/stats", get(handlers::audit::stats))
        .route("/api/search", get(handlers::employees::search_employees))
        // Only matched routes are authenticated, unknown paths still 404
        .route_layer(axum_middleware::from_fn_with_state(
            state.pool.clone(),
            middleware::auth::admin_auth_middleware,
        ));

    let api_routes = Router::new()
        .route("/api/recognize", post(handlers::recognition::recognize))
        .route("/api/register", post(handlers::registration::register))
        .route(
            "/api/dashboard/{employee_id}",
            get(handlers::employees::dashboard),
        )
        .merge(admin_routes)
        .layer(cors_layer(&state.config.cors_origins));

    Router::new()
        .route("/", get(handlers::pages::index))
        .route("/login", get(handlers::pages::login))
        .route("/register", get(handlers::pages::register))
        .route("/dashboard", get(handlers::pages::dashboard))
        .route("/static/capture.js", get(handlers::pages::capture_js))
        .route("/static/style.css", get(handlers::pages::style_css))
        .route("/health", get(handlers::health::health_check))
        .merge(api_routes)
        // Data URLs of full camera frames exceed axum's 2 MiB default
        .layer(DefaultBodyLimit::max(state.config.max_image_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}
