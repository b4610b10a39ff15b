//! Face Login Server - Main Application Entry Point
//!
//! Employees sign in by showing their face to a browser camera. The server
//! matches the captured frame against enrolled face encodings, logs every
//! attempt, and exposes admin endpoints for managing employees and reviewing
//! login history.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: SQLite with sqlx (async queries)
//! - **Face matching**: pluggable `FaceEngine`, in-process sample embeddings
//! - **Admin authentication**: HTTP Basic with SHA-256 password hashes
//! - **Format**: JSON requests/responses, embedded HTML capture client
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Create database connection pool
//! 3. Run database migrations
//! 4. Build the face engine and HTTP router
//! 5. Start server on configured port

mod config;
mod db;
mod error;
mod face;
mod handlers;
mod middleware;
mod models;
mod routes;
mod services;
mod state;

use std::{net::SocketAddr, sync::Arc};

use tracing_subscriber::EnvFilter;

use crate::{face::SampleEngine, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Reads RUST_LOG (defaults to "info")
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = config::Config::from_env()?;
    tracing::info!(
        tolerance = config.face_recognition_tolerance,
        threshold = config.min_confidence_threshold,
        "Configuration loaded"
    );

    let pool = db::create_pool(&config.database_url, config.database_max_connections).await?;
    tracing::info!("Database pool created");

    db::run_migrations(&pool).await?;
    tracing::info!("Database migrations complete");

    if let Some(dir) = &config.photo_dir {
        tokio::fs::create_dir_all(dir).await?;
        tracing::info!(photo_dir = %dir.display(), "Registration photos enabled");
    }

    let engine = Arc::new(SampleEngine::from_config(&config));
    let port = config.server_port;
    let app = routes::build_router(AppState::new(pool, config, engine));

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // Peer addresses feed the login audit when no X-Forwarded-For is present
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
