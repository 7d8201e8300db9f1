use sqlx::FromRow;
use uuid::Uuid;

/// Database model for an uploaded photo
#[derive(Debug, Clone, FromRow)]
pub struct Photo {
    pub id: Uuid,
    pub event_id: Uuid,
    /// Owning event's slug, denormalized for folder lookups without a join
    pub event_slug: String,
    /// Server-generated name on disk, never the client's original name
    pub filename: String,
    /// Original client-supplied filename, display only
    pub name: String,
    pub content_type: Option<String>,
    pub caption: Option<String>,
    pub width: i64,
    pub height: i64,
    pub size: i64,
    /// Millisecond unix timestamp, set once at ingestion
    pub uploaded_at: i64,
    pub is_favorite: bool,
}
