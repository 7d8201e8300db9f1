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
use crate::features::events::dtos::{CreateEventDto, EventResponseDto, SetCoverDto};
use crate::features::events::services::{ArchiveService, EventService};
use crate::shared::types::ApiResponse;

/// Shared state for the events feature routers
#[derive(Clone)]
pub struct EventState {
    pub event_service: Arc<EventService>,
    pub archive_service: Arc<ArchiveService>,
}

/// List all events
#[utoipa::path(
    get,
    path = "/api/events",
    tag = "events",
    responses(
        (status = 200, description = "All events, newest first", body = ApiResponse<Vec<EventResponseDto>>),
    )
)]
pub async fn list_events(
    State(state): State<EventState>,
) -> Result<Json<ApiResponse<Vec<EventResponseDto>>>> {
    let events = state.event_service.list().await?;
    let dtos: Vec<EventResponseDto> = events.into_iter().map(|e| e.into()).collect();
    Ok(Json(ApiResponse::success(Some(dtos), None)))
}

/// Get a single event by slug
#[utoipa::path(
    get,
    path = "/api/events/{slug}",
    tag = "events",
    params(("slug" = String, Path, description = "Event slug")),
    responses(
        (status = 200, description = "Event found", body = ApiResponse<EventResponseDto>),
        (status = 404, description = "Event not found")
    )
)]
pub async fn get_event(
    State(state): State<EventState>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<EventResponseDto>>> {
    let event = state.event_service.get_by_slug(&slug).await?;
    Ok(Json(ApiResponse::success(Some(event.into()), None)))
}

/// Create an event (admin)
#[utoipa::path(
    post,
    path = "/api/events",
    tag = "events",
    request_body = CreateEventDto,
    responses(
        (status = 201, description = "Event created", body = ApiResponse<EventResponseDto>),
        (status = 400, description = "Invalid payload or unsafe slug"),
        (status = 401, description = "Admin password required"),
        (status = 409, description = "Slug already exists")
    ),
    security(("admin_password" = []))
)]
pub async fn create_event(
    State(state): State<EventState>,
    AppJson(dto): AppJson<CreateEventDto>,
) -> Result<(StatusCode, Json<ApiResponse<EventResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let event = state.event_service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(event.into()), None)),
    ))
}

/// Delete an event and everything it owns (admin)
#[utoipa::path(
    delete,
    path = "/api/events/{id}",
    tag = "events",
    params(("id" = Uuid, Path, description = "Event id")),
    responses(
        (status = 204, description = "Event, photos and folder removed"),
        (status = 401, description = "Admin password required"),
        (status = 404, description = "Event not found")
    ),
    security(("admin_password" = []))
)]
pub async fn delete_event(
    State(state): State<EventState>,
    Path(event_id): Path<Uuid>,
) -> Result<StatusCode> {
    state.event_service.delete(event_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Set the event's cover photo (admin)
#[utoipa::path(
    patch,
    path = "/api/events/{id}/cover",
    tag = "events",
    params(("id" = Uuid, Path, description = "Event id")),
    request_body = SetCoverDto,
    responses(
        (status = 200, description = "Cover updated", body = ApiResponse<EventResponseDto>),
        (status = 400, description = "Photo does not belong to this event"),
        (status = 401, description = "Admin password required"),
        (status = 404, description = "Event not found")
    ),
    security(("admin_password" = []))
)]
pub async fn update_event_cover(
    State(state): State<EventState>,
    Path(event_id): Path<Uuid>,
    AppJson(dto): AppJson<SetCoverDto>,
) -> Result<Json<ApiResponse<EventResponseDto>>> {
    let event = state.event_service.set_cover(event_id, dto.photo_id).await?;
    Ok(Json(ApiResponse::success(Some(event.into()), None)))
}
