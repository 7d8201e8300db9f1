use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::events::models::Event;

/// Request DTO to create an event.
///
/// The slug is additionally checked against the slug pattern in the service
/// layer since it becomes the event's folder name on disk.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventDto {
    #[validate(length(min = 1, max = 200, message = "title is required"))]
    pub title: String,
    #[validate(length(min = 1, max = 80, message = "slug is required"))]
    pub slug: String,
    pub date: NaiveDate,
    pub description: Option<String>,
    pub watermark_text: Option<String>,
}

/// Request DTO to set an event's cover photo
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetCoverDto {
    pub photo_id: Uuid,
}

/// Response DTO for an event
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventResponseDto {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub date: NaiveDate,
    pub description: Option<String>,
    pub watermark_text: Option<String>,
    pub cover_photo_id: Option<Uuid>,
    pub created_at: i64,
}

impl From<Event> for EventResponseDto {
    fn from(e: Event) -> Self {
        Self {
            id: e.id,
            title: e.title,
            slug: e.slug,
            date: e.date,
            description: e.description,
            watermark_text: e.watermark_text,
            cover_photo_id: e.cover_photo_id,
            created_at: e.created_at,
        }
    }
}
