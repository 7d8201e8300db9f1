use chrono::NaiveDate;
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for an event (a named, dated photo gallery)
#[derive(Debug, Clone, FromRow)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub date: NaiveDate,
    pub description: Option<String>,
    pub watermark_text: Option<String>,
    pub cover_photo_id: Option<Uuid>,
    /// Millisecond unix timestamp, set once at creation
    pub created_at: i64,
}
