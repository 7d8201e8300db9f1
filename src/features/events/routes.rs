use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::features::events::handlers::{self, EventState};

/// Public routes for the events feature.
///
/// Every `/api/events/{id}` route uses the same capture name so the merged
/// method routers share one path entry; handlers read it as a slug or a UUID
/// as appropriate.
pub fn public_routes(state: EventState) -> Router {
    Router::new()
        .route("/api/events", get(handlers::list_events))
        .route("/api/events/{id}", get(handlers::get_event))
        .route("/api/events/{id}/zip", get(handlers::download_event_zip))
        .route(
            "/api/events/{id}/download",
            get(handlers::download_event_alias),
        )
        .with_state(state)
}

/// Admin routes for the events feature.
///
/// The caller applies the admin-password gate as a route layer.
pub fn admin_routes(state: EventState) -> Router {
    Router::new()
        .route("/api/events", post(handlers::create_event))
        .route(
            "/api/events/{id}",
            axum::routing::delete(handlers::delete_event),
        )
        .route("/api/events/{id}/cover", patch(handlers::update_event_cover))
        .with_state(state)
}
