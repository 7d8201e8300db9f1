use std::sync::Arc;

use axum::{routing::post, Router};

use crate::core::config::AdminConfig;
use crate::features::auth::handlers;

/// Create routes for the auth feature (public)
pub fn routes(config: Arc<AdminConfig>) -> Router {
    Router::new()
        .route("/api/auth/login", post(handlers::login))
        .with_state(config)
}
