use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::events::services::EventService;
use crate::features::photos::dtos::{CaptionUpdateDto, FavoriteUpdateDto, PhotoResponseDto};
use crate::features::photos::services::{IngestionService, PhotoService};
use crate::shared::types::ApiResponse;

/// Shared state for the photos feature routers
#[derive(Clone)]
pub struct PhotoState {
    pub photo_service: Arc<PhotoService>,
    pub ingestion_service: Arc<IngestionService>,
    pub event_service: Arc<EventService>,
}

/// List every photo across all events
#[utoipa::path(
    get,
    path = "/api/photos",
    tag = "photos",
    responses(
        (status = 200, description = "All photos in upload order", body = ApiResponse<Vec<PhotoResponseDto>>),
    )
)]
pub async fn list_photos(
    State(state): State<PhotoState>,
) -> Result<Json<ApiResponse<Vec<PhotoResponseDto>>>> {
    let photos = state.photo_service.list_all().await?;
    let dtos: Vec<PhotoResponseDto> = photos.into_iter().map(|p| p.into()).collect();
    Ok(Json(ApiResponse::success(Some(dtos), None)))
}

/// List an event's photos
#[utoipa::path(
    get,
    path = "/api/events/{slug}/photos",
    tag = "photos",
    params(("slug" = String, Path, description = "Event slug")),
    responses(
        (status = 200, description = "Photos of the event in upload order", body = ApiResponse<Vec<PhotoResponseDto>>),
        (status = 404, description = "Event not found")
    )
)]
pub async fn list_event_photos(
    State(state): State<PhotoState>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<Vec<PhotoResponseDto>>>> {
    let event = state.event_service.get_by_slug(&slug).await?;
    let photos = state.photo_service.list_for_event(event.id).await?;
    let dtos: Vec<PhotoResponseDto> = photos.into_iter().map(|p| p.into()).collect();
    Ok(Json(ApiResponse::success(Some(dtos), None)))
}

/// Update a photo's caption (admin)
#[utoipa::path(
    patch,
    path = "/api/photos/{id}",
    tag = "photos",
    params(("id" = Uuid, Path, description = "Photo id")),
    request_body = CaptionUpdateDto,
    responses(
        (status = 200, description = "Caption updated", body = ApiResponse<PhotoResponseDto>),
        (status = 401, description = "Admin password required"),
        (status = 404, description = "Photo not found")
    ),
    security(("admin_password" = []))
)]
pub async fn update_photo_caption(
    State(state): State<PhotoState>,
    Path(photo_id): Path<Uuid>,
    AppJson(dto): AppJson<CaptionUpdateDto>,
) -> Result<Json<ApiResponse<PhotoResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let photo = state
        .photo_service
        .update_caption(photo_id, dto.caption)
        .await?;
    Ok(Json(ApiResponse::success(Some(photo.into()), None)))
}

/// Flag or unflag a photo as a favorite
///
/// Deliberately public: gallery visitors mark favorites while reviewing a
/// shoot, so this mutation carries no admin gate.
#[utoipa::path(
    patch,
    path = "/api/photos/{id}/favorite",
    tag = "photos",
    params(("id" = Uuid, Path, description = "Photo id")),
    request_body = FavoriteUpdateDto,
    responses(
        (status = 200, description = "Favorite flag updated", body = ApiResponse<PhotoResponseDto>),
        (status = 404, description = "Photo not found")
    )
)]
pub async fn update_photo_favorite(
    State(state): State<PhotoState>,
    Path(photo_id): Path<Uuid>,
    AppJson(dto): AppJson<FavoriteUpdateDto>,
) -> Result<Json<ApiResponse<PhotoResponseDto>>> {
    let photo = state
        .photo_service
        .update_favorite(photo_id, dto.is_favorite)
        .await?;
    Ok(Json(ApiResponse::success(Some(photo.into()), None)))
}

/// Delete a photo (admin)
#[utoipa::path(
    delete,
    path = "/api/photos/{id}",
    tag = "photos",
    params(("id" = Uuid, Path, description = "Photo id")),
    responses(
        (status = 204, description = "Photo removed"),
        (status = 401, description = "Admin password required"),
        (status = 404, description = "Photo not found")
    ),
    security(("admin_password" = []))
)]
pub async fn remove_photo(
    State(state): State<PhotoState>,
    Path(photo_id): Path<Uuid>,
) -> Result<StatusCode> {
    state.photo_service.delete(photo_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
