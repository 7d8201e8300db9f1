use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::photos::models::Photo;

/// Response DTO for a photo, including its public URL
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PhotoResponseDto {
    pub id: Uuid,
    pub event_id: Uuid,
    pub event_slug: String,
    pub filename: String,
    pub name: String,
    #[serde(rename = "type")]
    pub content_type: Option<String>,
    pub caption: Option<String>,
    pub width: i64,
    pub height: i64,
    pub size: i64,
    pub uploaded_at: i64,
    pub url: String,
    pub is_favorite: bool,
}

impl From<Photo> for PhotoResponseDto {
    fn from(p: Photo) -> Self {
        let url = format!("/static/{}/{}", p.event_slug, p.filename);
        Self {
            id: p.id,
            event_id: p.event_id,
            event_slug: p.event_slug,
            filename: p.filename,
            name: p.name,
            content_type: p.content_type,
            caption: p.caption,
            width: p.width,
            height: p.height,
            size: p.size,
            uploaded_at: p.uploaded_at,
            url,
            is_favorite: p.is_favorite,
        }
    }
}

/// Request DTO to update a photo's caption
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CaptionUpdateDto {
    #[validate(length(max = 500, message = "caption is too long"))]
    pub caption: String,
}

/// Request DTO to flag or unflag a photo as favorite
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteUpdateDto {
    pub is_favorite: bool,
}

/// Multipart upload form, for OpenAPI documentation only.
/// The handler reads the multipart fields directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadPhotosDto {
    /// One or more image files under the `files` field
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub files: String,
}
