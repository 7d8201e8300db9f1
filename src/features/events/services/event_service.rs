use std::sync::Arc;

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::events::dtos::CreateEventDto;
use crate::features::events::models::Event;
use crate::features::photos::models::Photo;
use crate::modules::storage::UploadStore;
use crate::shared::validation::is_safe_slug;

/// Service for event CRUD and the record/filesystem consistency rules
pub struct EventService {
    pool: SqlitePool,
    store: Arc<UploadStore>,
}

impl EventService {
    pub fn new(pool: SqlitePool, store: Arc<UploadStore>) -> Self {
        Self { pool, store }
    }

    /// List all events, newest event date first
    pub async fn list(&self) -> Result<Vec<Event>> {
        let events = sqlx::query_as::<_, Event>("SELECT * FROM events ORDER BY date DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(events)
    }

    pub async fn get_by_id(&self, event_id: Uuid) -> Result<Event> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = ?")
            .bind(event_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Event not found".to_string()))
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Event> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE slug = ?")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Event not found".to_string()))
    }

    /// Create an event and ensure its upload folder exists.
    ///
    /// The folder is ensured before success is reported; a filesystem failure
    /// surfaces as a storage error instead of leaving a half-usable event.
    pub async fn create(&self, dto: CreateEventDto) -> Result<Event> {
        if !is_safe_slug(&dto.slug) {
            return Err(AppError::Validation(format!(
                "Invalid slug: {:?} (lowercase letters, digits, '-' and '_' only)",
                dto.slug
            )));
        }

        let existing = sqlx::query_as::<_, Event>("SELECT * FROM events WHERE slug = ?")
            .bind(&dto.slug)
            .fetch_optional(&self.pool)
            .await?;
        if existing.is_some() {
            return Err(AppError::Conflict("Slug already exists".to_string()));
        }

        let event = sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (id, title, slug, date, description, watermark_text, cover_photo_id, created_at)
            VALUES (?, ?, ?, ?, ?, ?, NULL, ?)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&dto.title)
        .bind(&dto.slug)
        .bind(dto.date)
        .bind(&dto.description)
        .bind(&dto.watermark_text)
        .bind(Utc::now().timestamp_millis())
        .fetch_one(&self.pool)
        .await?;

        self.store.ensure_folder(&event.slug).await?;

        info!("Event created: id={}, slug={}", event.id, event.slug);
        Ok(event)
    }

    /// Delete an event: best-effort delete every owned photo's file, delete
    /// the photo records, delete the event record, then remove the folder.
    ///
    /// Records are the source of truth; filesystem cleanup failures are
    /// logged and never roll back the record deletions.
    pub async fn delete(&self, event_id: Uuid) -> Result<()> {
        let event = self.get_by_id(event_id).await?;

        let photos = sqlx::query_as::<_, Photo>("SELECT * FROM photos WHERE event_id = ?")
            .bind(event.id)
            .fetch_all(&self.pool)
            .await?;

        // Break the cover reference up front so photo deletion order never matters
        sqlx::query("UPDATE events SET cover_photo_id = NULL WHERE id = ?")
            .bind(event.id)
            .execute(&self.pool)
            .await?;

        for photo in &photos {
            if let Err(e) = self.store.remove_file(&photo.event_slug, &photo.filename).await {
                warn!("Skipping file cleanup for photo {}: {}", photo.id, e);
            }
            sqlx::query("DELETE FROM photos WHERE id = ?")
                .bind(photo.id)
                .execute(&self.pool)
                .await?;
        }

        sqlx::query("DELETE FROM events WHERE id = ?")
            .bind(event.id)
            .execute(&self.pool)
            .await?;

        if let Err(e) = self.store.remove_folder(&event.slug).await {
            warn!("Skipping folder cleanup for event {}: {}", event.slug, e);
        }

        info!(
            "Event deleted: id={}, slug={}, photos={}",
            event.id,
            event.slug,
            photos.len()
        );
        Ok(())
    }

    /// Point the event's cover at one of its own photos
    pub async fn set_cover(&self, event_id: Uuid, photo_id: Uuid) -> Result<Event> {
        let event = self.get_by_id(event_id).await?;

        let photo = sqlx::query_as::<_, Photo>("SELECT * FROM photos WHERE id = ?")
            .bind(photo_id)
            .fetch_optional(&self.pool)
            .await?;

        match photo {
            Some(ref p) if p.event_id == event.id => {}
            _ => {
                return Err(AppError::Validation(
                    "Photo does not belong to this event".to_string(),
                ))
            }
        }

        sqlx::query("UPDATE events SET cover_photo_id = ? WHERE id = ?")
            .bind(photo_id)
            .bind(event.id)
            .execute(&self.pool)
            .await?;

        self.get_by_id(event.id).await
    }
}
