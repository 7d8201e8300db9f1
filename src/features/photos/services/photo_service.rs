use std::sync::Arc;

use sqlx::SqlitePool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::photos::models::Photo;
use crate::modules::storage::UploadStore;

/// Service for photo queries and admin mutations
pub struct PhotoService {
    pool: SqlitePool,
    store: Arc<UploadStore>,
}

impl PhotoService {
    pub fn new(pool: SqlitePool, store: Arc<UploadStore>) -> Self {
        Self { pool, store }
    }

    /// List every photo across all events, in upload order
    pub async fn list_all(&self) -> Result<Vec<Photo>> {
        let photos = sqlx::query_as::<_, Photo>("SELECT * FROM photos ORDER BY uploaded_at")
            .fetch_all(&self.pool)
            .await?;
        Ok(photos)
    }

    /// List an event's photos in upload order
    pub async fn list_for_event(&self, event_id: Uuid) -> Result<Vec<Photo>> {
        let photos = sqlx::query_as::<_, Photo>(
            "SELECT * FROM photos WHERE event_id = ? ORDER BY uploaded_at",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(photos)
    }

    pub async fn get_by_id(&self, photo_id: Uuid) -> Result<Photo> {
        sqlx::query_as::<_, Photo>("SELECT * FROM photos WHERE id = ?")
            .bind(photo_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Photo not found".to_string()))
    }

    pub async fn update_caption(&self, photo_id: Uuid, caption: String) -> Result<Photo> {
        self.get_by_id(photo_id).await?;
        let photo =
            sqlx::query_as::<_, Photo>("UPDATE photos SET caption = ? WHERE id = ? RETURNING *")
                .bind(caption)
                .bind(photo_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(photo)
    }

    pub async fn update_favorite(&self, photo_id: Uuid, is_favorite: bool) -> Result<Photo> {
        self.get_by_id(photo_id).await?;
        let photo =
            sqlx::query_as::<_, Photo>("UPDATE photos SET is_favorite = ? WHERE id = ? RETURNING *")
                .bind(is_favorite)
                .bind(photo_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(photo)
    }

    /// Delete a photo: remove the file (tolerant of one already gone), null
    /// out the owning event's cover reference if it pointed here, then delete
    /// the record.
    pub async fn delete(&self, photo_id: Uuid) -> Result<()> {
        let photo = self.get_by_id(photo_id).await?;

        if let Err(e) = self
            .store
            .remove_file(&photo.event_slug, &photo.filename)
            .await
        {
            warn!("Skipping file cleanup for photo {}: {}", photo.id, e);
        }

        sqlx::query("UPDATE events SET cover_photo_id = NULL WHERE id = ? AND cover_photo_id = ?")
            .bind(photo.event_id)
            .bind(photo.id)
            .execute(&self.pool)
            .await?;

        sqlx::query("DELETE FROM photos WHERE id = ?")
            .bind(photo.id)
            .execute(&self.pool)
            .await?;

        info!(
            "Photo deleted: id={}, event={}, filename={}",
            photo.id, photo.event_slug, photo.filename
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::events::EventService;
    use crate::shared::test_helpers::{sample_event_dto, seed_photo, test_pool, test_store};

    async fn setup() -> (
        PhotoService,
        EventService,
        Arc<UploadStore>,
        tempfile::TempDir,
    ) {
        let pool = test_pool().await;
        let (store, dir) = test_store();
        (
            PhotoService::new(pool.clone(), Arc::clone(&store)),
            EventService::new(pool, Arc::clone(&store)),
            store,
            dir,
        )
    }

    #[tokio::test]
    async fn test_update_caption_and_favorite() {
        let (photos, events, store, _dir) = setup().await;
        let event = events.create(sample_event_dto("expo")).await.unwrap();
        let photo = seed_photo(photos.pool.clone(), &store, &event, "a.jpg").await;

        let updated = photos
            .update_caption(photo.id, "First dance".to_string())
            .await
            .unwrap();
        assert_eq!(updated.caption.as_deref(), Some("First dance"));

        let updated = photos.update_favorite(photo.id, true).await.unwrap();
        assert!(updated.is_favorite);
    }

    #[tokio::test]
    async fn test_update_missing_photo_not_found() {
        let (photos, _events, _store, _dir) = setup().await;

        let err = photos
            .update_caption(Uuid::new_v4(), "x".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = photos.update_favorite(Uuid::new_v4(), true).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = photos.delete(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_photo_removes_file_and_record() {
        let (photos, events, store, _dir) = setup().await;
        let event = events.create(sample_event_dto("expo")).await.unwrap();
        let photo = seed_photo(photos.pool.clone(), &store, &event, "a.jpg").await;
        let path = store.file_path(&event.slug, &photo.filename).unwrap();
        assert!(path.exists());

        photos.delete(photo.id).await.unwrap();

        assert!(!path.exists());
        assert!(matches!(
            photos.get_by_id(photo.id).await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_delete_cover_photo_nulls_reference() {
        let (photos, events, store, _dir) = setup().await;
        let event = events.create(sample_event_dto("expo")).await.unwrap();
        let photo = seed_photo(photos.pool.clone(), &store, &event, "a.jpg").await;
        events.set_cover(event.id, photo.id).await.unwrap();

        photos.delete(photo.id).await.unwrap();

        let event = events.get_by_id(event.id).await.unwrap();
        assert!(event.cover_photo_id.is_none());
    }

    #[tokio::test]
    async fn test_delete_tolerates_missing_file() {
        let (photos, events, store, _dir) = setup().await;
        let event = events.create(sample_event_dto("expo")).await.unwrap();
        let photo = seed_photo(photos.pool.clone(), &store, &event, "a.jpg").await;
        tokio::fs::remove_file(store.file_path(&event.slug, &photo.filename).unwrap())
            .await
            .unwrap();

        photos.delete(photo.id).await.unwrap();
        assert!(matches!(
            photos.get_by_id(photo.id).await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_list_orders_by_upload_time() {
        let (photos, events, store, _dir) = setup().await;
        let event = events.create(sample_event_dto("expo")).await.unwrap();
        let first = seed_photo(photos.pool.clone(), &store, &event, "a.jpg").await;
        let second = seed_photo(photos.pool.clone(), &store, &event, "b.jpg").await;

        let listed = photos.list_for_event(event.id).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, first.id);
        assert_eq!(listed[1].id, second.id);
    }
}
