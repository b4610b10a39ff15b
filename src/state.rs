//! Shared handler state.

use std::sync::Arc;

use axum::extract::FromRef;

use crate::{config::Config, db::DbPool, face::FaceEngine};

/// Everything a handler may need. Cloned per request; all fields are cheap handles.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub config: Arc<Config>,
    pub engine: Arc<dyn FaceEngine>,
}

impl AppState {
    pub fn new(pool: DbPool, config: Config, engine: Arc<dyn FaceEngine>) -> Self {
        Self {
            pool,
            config: Arc::new(config),
            engine,
        }
    }
}

/// Lets handlers that only touch the database keep extracting `State<DbPool>`.
impl FromRef<AppState> for DbPool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}
