use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};

use crate::features::photos::handlers::{self, PhotoState};

/// Public routes for the photos feature.
///
/// The favorite toggle is public on purpose; see the handler doc.
pub fn public_routes(state: PhotoState) -> Router {
    Router::new()
        .route("/api/photos", get(handlers::list_photos))
        .route(
            "/api/photos/{id}/favorite",
            patch(handlers::update_photo_favorite),
        )
        .route("/api/events/{id}/photos", get(handlers::list_event_photos))
        .with_state(state)
}

/// Admin routes for the photos feature.
///
/// The caller applies the admin-password gate as a route layer. The upload
/// route gets its own raised body limit to fit multi-file photo batches.
pub fn admin_routes(state: PhotoState, max_upload_body_size: usize) -> Router {
    Router::new()
        .route(
            "/api/events/{id}/photos",
            post(handlers::upload_photos)
                .layer(DefaultBodyLimit::max(max_upload_body_size)),
        )
        .route(
            "/api/photos/{id}",
            patch(handlers::update_photo_caption).delete(handlers::remove_photo),
        )
        .with_state(state)
}
