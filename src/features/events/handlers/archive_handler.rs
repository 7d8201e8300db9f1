use axum::{
    body::Body,
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};

use crate::core::error::Result;
use crate::features::events::handlers::EventState;

/// Download an event's photos as a zip archive
///
/// The archive is built into a temporary file and streamed back; the file is
/// deleted once the response body is dropped, however the download ends.
#[utoipa::path(
    get,
    path = "/api/events/{slug}/zip",
    tag = "events",
    params(("slug" = String, Path, description = "Event slug")),
    responses(
        (status = 200, description = "Zip archive of the event folder", content_type = "application/zip"),
        (status = 404, description = "Event not found or no photos available")
    )
)]
pub async fn download_event_zip(
    State(state): State<EventState>,
    Path(slug): Path<String>,
) -> Result<Response> {
    let event = state.event_service.get_by_slug(&slug).await?;
    let archive = state.archive_service.export(&event.slug).await?;

    let headers = [
        (header::CONTENT_TYPE, "application/zip".to_string()),
        (header::CONTENT_LENGTH, archive.content_length().to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}.zip\"", event.slug),
        ),
    ];

    Ok((headers, Body::from_stream(archive)).into_response())
}

/// Alias of the zip download kept for older gallery links
#[utoipa::path(
    get,
    path = "/api/events/{slug}/download",
    tag = "events",
    params(("slug" = String, Path, description = "Event slug")),
    responses(
        (status = 200, description = "Zip archive of the event folder", content_type = "application/zip"),
        (status = 404, description = "Event not found or no photos available")
    )
)]
pub async fn download_event_alias(
    state: State<EventState>,
    slug: Path<String>,
) -> Result<Response> {
    download_event_zip(state, slug).await
}
