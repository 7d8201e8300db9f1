use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use tracing::debug;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::photos::dtos::{PhotoResponseDto, UploadPhotosDto};
use crate::features::photos::handlers::PhotoState;
use crate::shared::types::ApiResponse;

/// Upload a batch of photos into an event (admin)
///
/// Multipart form with one or more `files` fields. Each stream is handled
/// independently: empty files are silently skipped, undecodable files are
/// rejected without aborting the rest, and whatever succeeded stays
/// persisted. The whole request only fails when nothing was usable.
#[utoipa::path(
    post,
    path = "/api/events/{id}/photos",
    tag = "photos",
    params(("id" = Uuid, Path, description = "Event id")),
    request_body(content = UploadPhotosDto, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Created photos in submission order", body = ApiResponse<Vec<PhotoResponseDto>>),
        (status = 400, description = "No files uploaded, or no valid images among them"),
        (status = 401, description = "Admin password required"),
        (status = 404, description = "Event not found")
    ),
    security(("admin_password" = []))
)]
pub async fn upload_photos(
    State(state): State<PhotoState>,
    Path(event_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<Vec<PhotoResponseDto>>>)> {
    // The event must exist before anything touches the filesystem
    let event = state.event_service.get_by_id(event_id).await?;
    state.ingestion_service.prepare_event_folder(&event).await?;

    let mut created: Vec<PhotoResponseDto> = Vec::new();
    let mut received = 0usize;
    let mut rejected = 0usize;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();
        if field_name != "files" && field_name != "file" {
            debug!("Ignoring unknown field: {}", field_name);
            continue;
        }
        received += 1;

        let original_name = field.file_name().map(|s| s.to_string());
        let content_type = field.content_type().map(|s| s.to_string());

        match state
            .ingestion_service
            .ingest_stream(&event, original_name, content_type, field)
            .await
        {
            Ok(Some(photo)) => created.push(photo.into()),
            // Empty stream: silently excluded from the batch
            Ok(None) => {}
            // A corrupt file fails its own stream only; it was already
            // logged and cleaned up by the pipeline
            Err(AppError::InvalidImage(_)) => rejected += 1,
            Err(e) => return Err(e),
        }
    }

    if received == 0 {
        return Err(AppError::Validation("No files uploaded".to_string()));
    }
    if created.is_empty() {
        return Err(AppError::BadRequest(
            "No valid images were uploaded".to_string(),
        ));
    }

    if rejected > 0 {
        debug!(
            "Upload batch for {} kept {} of {} streams",
            event.slug,
            created.len(),
            received
        );
    }

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(created), None)),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderName, HeaderValue};
    use axum::middleware::from_fn_with_state;
    use axum::Router;
    use axum_test::multipart::{MultipartForm, Part};
    use axum_test::TestServer;
    use std::sync::Arc;

    use crate::core::config::AdminConfig;
    use crate::core::middleware;
    use crate::features::events::models::Event;
    use crate::features::events::EventService;
    use crate::features::photos::routes as photos_routes;
    use crate::features::photos::services::{IngestionService, PhotoService};
    use crate::shared::test_helpers::{png_bytes, sample_event_dto, test_pool, test_store};

    const ADMIN_PASSWORD: &str = "test-admin";

    async fn test_app() -> (TestServer, Event, tempfile::TempDir) {
        let pool = test_pool().await;
        let (store, dir) = test_store();
        let event_service = Arc::new(EventService::new(pool.clone(), Arc::clone(&store)));
        let event = event_service
            .create(sample_event_dto("expo"))
            .await
            .unwrap();

        let state = PhotoState {
            photo_service: Arc::new(PhotoService::new(pool.clone(), Arc::clone(&store))),
            ingestion_service: Arc::new(IngestionService::new(pool, Arc::clone(&store))),
            event_service,
        };
        let admin_config = Arc::new(AdminConfig {
            password: ADMIN_PASSWORD.to_string(),
        });

        let app = Router::new()
            .merge(
                photos_routes::admin_routes(state.clone(), 32 * 1024 * 1024).route_layer(
                    from_fn_with_state(admin_config, middleware::admin_middleware),
                ),
            )
            .merge(photos_routes::public_routes(state));

        (TestServer::new(app).unwrap(), event, dir)
    }

    fn admin_header() -> (HeaderName, HeaderValue) {
        (
            HeaderName::from_static("x-admin-password"),
            HeaderValue::from_static(ADMIN_PASSWORD),
        )
    }

    fn image_part(width: u32, height: u32, name: &str) -> Part {
        Part::bytes(png_bytes(width, height))
            .file_name(name.to_string())
            .mime_type("image/png")
    }

    #[tokio::test]
    async fn test_upload_requires_admin_password() {
        let (server, event, _dir) = test_app().await;

        let form = MultipartForm::new().add_part("files", image_part(1, 1, "a.png"));
        let response = server
            .post(&format!("/api/events/{}/photos", event.id))
            .multipart(form)
            .await;
        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_upload_batch_keeps_valid_streams() {
        let (server, event, _dir) = test_app().await;
        let (name, value) = admin_header();

        let form = MultipartForm::new()
            .add_part("files", image_part(2, 1, "a.png"))
            .add_part(
                "files",
                Part::bytes(b"not an image".to_vec())
                    .file_name("broken.jpg")
                    .mime_type("image/jpeg"),
            )
            .add_part("files", image_part(1, 2, "b.png"));

        let response = server
            .post(&format!("/api/events/{}/photos", event.id))
            .add_header(name, value)
            .multipart(form)
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);

        let body: ApiResponse<Vec<PhotoResponseDto>> = response.json();
        let photos = body.data.unwrap();
        assert_eq!(photos.len(), 2);
        // Submission order survives
        assert_eq!(photos[0].name, "a.png");
        assert_eq!((photos[0].width, photos[0].height), (2, 1));
        assert_eq!(photos[1].name, "b.png");
        assert_eq!((photos[1].width, photos[1].height), (1, 2));
        assert!(photos[0].url.starts_with("/static/expo/"));
    }

    #[tokio::test]
    async fn test_upload_all_invalid_is_rejected() {
        let (server, event, _dir) = test_app().await;
        let (name, value) = admin_header();

        let form = MultipartForm::new()
            .add_part(
                "files",
                Part::bytes(b"junk".to_vec())
                    .file_name("junk.jpg")
                    .mime_type("image/jpeg"),
            )
            .add_part(
                "files",
                Part::bytes(Vec::new())
                    .file_name("empty.jpg")
                    .mime_type("image/jpeg"),
            );

        let response = server
            .post(&format!("/api/events/{}/photos", event.id))
            .add_header(name, value)
            .multipart(form)
            .await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_upload_to_unknown_event_is_not_found() {
        let (server, _event, _dir) = test_app().await;
        let (name, value) = admin_header();

        let form = MultipartForm::new().add_part("files", image_part(1, 1, "a.png"));
        let response = server
            .post(&format!("/api/events/{}/photos", uuid::Uuid::new_v4()))
            .add_header(name, value)
            .multipart(form)
            .await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_favorite_toggle_is_public() {
        let (server, event, _dir) = test_app().await;
        let (name, value) = admin_header();

        let form = MultipartForm::new().add_part("files", image_part(1, 1, "a.png"));
        let response = server
            .post(&format!("/api/events/{}/photos", event.id))
            .add_header(name, value)
            .multipart(form)
            .await;
        let body: ApiResponse<Vec<PhotoResponseDto>> = response.json();
        let photo_id = body.data.unwrap()[0].id;

        // No admin header on purpose
        let response = server
            .patch(&format!("/api/photos/{}/favorite", photo_id))
            .json(&serde_json::json!({"isFavorite": true}))
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);

        let body: ApiResponse<PhotoResponseDto> = response.json();
        assert!(body.data.unwrap().is_favorite);
    }
}
