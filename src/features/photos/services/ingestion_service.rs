use std::path::Path;
use std::sync::Arc;

use axum::body::Bytes;
use chrono::Utc;
use futures::{Stream, StreamExt};
use sqlx::SqlitePool;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::events::models::Event;
use crate::features::photos::models::Photo;
use crate::modules::storage::UploadStore;

/// Turns raw upload streams into stored files plus photo records.
///
/// Per stream: stream the body to a freshly named file, skip it silently if
/// it was empty, probe the decoded pixel dimensions, and register a record.
/// A file always exists before its record does; every rejection path removes
/// the file it created.
pub struct IngestionService {
    pool: SqlitePool,
    store: Arc<UploadStore>,
}

impl IngestionService {
    pub fn new(pool: SqlitePool, store: Arc<UploadStore>) -> Self {
        Self { pool, store }
    }

    /// Create the event's upload folder. Called once per batch, before any
    /// stream is processed.
    pub async fn prepare_event_folder(&self, event: &Event) -> Result<()> {
        self.store.ensure_folder(&event.slug).await?;
        Ok(())
    }

    /// Ingest a single upload stream for an event.
    ///
    /// Returns `Ok(None)` when the stream carried zero bytes (silently
    /// excluded from the batch), `Err(InvalidImage)` when the stored bytes do
    /// not decode as an image, and the persisted photo otherwise.
    pub async fn ingest_stream<S, E>(
        &self,
        event: &Event,
        original_name: Option<String>,
        content_type: Option<String>,
        body: S,
    ) -> Result<Option<Photo>>
    where
        S: Stream<Item = std::result::Result<Bytes, E>>,
        E: std::fmt::Display,
    {
        let extension = derive_extension(original_name.as_deref(), content_type.as_deref());
        // 128-bit random token; create_new below guarantees no clobbering
        // even in the astronomically unlikely collision case.
        let filename = format!("{}{}", Uuid::new_v4().simple(), extension);
        let path = self.store.file_path(&event.slug, &filename)?;

        let size = match self.write_to_disk(&path, body).await {
            Ok(size) => size,
            Err(e) => {
                self.cleanup(&event.slug, &filename).await;
                return Err(e);
            }
        };

        if size == 0 {
            debug!("Skipping empty upload for event {}", event.slug);
            self.cleanup(&event.slug, &filename).await;
            return Ok(None);
        }

        // Dimensions come from the decoded header, never from the client
        let probe_path = path.clone();
        let probed = tokio::task::spawn_blocking(move || probe_dimensions(&probe_path))
            .await
            .map_err(|e| AppError::Internal(format!("Image probe task failed: {}", e)))?;
        let (width, height) = match probed {
            Ok(dimensions) => dimensions,
            Err(e) => {
                warn!(
                    "Rejecting undecodable upload {:?} for event {}: {}",
                    original_name, event.slug, e
                );
                self.cleanup(&event.slug, &filename).await;
                return Err(AppError::InvalidImage("Invalid image file".to_string()));
            }
        };

        let photo = sqlx::query_as::<_, Photo>(
            r#"
            INSERT INTO photos (id, event_id, event_slug, filename, name, content_type,
                                caption, width, height, size, uploaded_at, is_favorite)
            VALUES (?, ?, ?, ?, ?, ?, NULL, ?, ?, ?, ?, FALSE)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(event.id)
        .bind(&event.slug)
        .bind(&filename)
        .bind(original_name.as_deref().unwrap_or(&filename))
        .bind(&content_type)
        .bind(width as i64)
        .bind(height as i64)
        .bind(size as i64)
        .bind(Utc::now().timestamp_millis())
        .fetch_one(&self.pool)
        .await?;

        info!(
            "Photo ingested: id={}, event={}, file={}, {}x{}, {} bytes",
            photo.id, event.slug, filename, width, height, size
        );
        Ok(Some(photo))
    }

    /// Stream the body to disk in bounded chunks, returning the bytes written
    async fn write_to_disk<S, E>(&self, path: &Path, body: S) -> Result<u64>
    where
        S: Stream<Item = std::result::Result<Bytes, E>>,
        E: std::fmt::Display,
    {
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .await?;

        let mut size: u64 = 0;
        let mut body = std::pin::pin!(body);
        while let Some(chunk) = body.next().await {
            let chunk = chunk
                .map_err(|e| AppError::BadRequest(format!("Failed to read upload stream: {}", e)))?;
            file.write_all(&chunk).await?;
            size += chunk.len() as u64;
        }
        file.flush().await?;

        Ok(size)
    }

    /// Remove a just-created file on a rejection path. Its own failure is
    /// logged inside the store, never propagated over the primary error.
    async fn cleanup(&self, slug: &str, filename: &str) {
        if let Err(e) = self.store.remove_file(slug, filename).await {
            warn!("Cleanup failed for {}/{}: {}", slug, filename, e);
        }
    }
}

/// Derive the stored file's extension: client filename extension first,
/// then the declared content type, then `.jpg`.
fn derive_extension(original_name: Option<&str>, content_type: Option<&str>) -> String {
    if let Some(ext) = original_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
    {
        return format!(".{}", ext.to_ascii_lowercase());
    }

    if let Some(ext) = content_type.and_then(extension_for_content_type) {
        return format!(".{}", ext);
    }

    ".jpg".to_string()
}

fn extension_for_content_type(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        _ => mime_guess::get_mime_extensions_str(content_type).and_then(|exts| exts.first().copied()),
    }
}

/// Read only as much of the file as needed to learn its pixel dimensions.
/// No pixel-count ceiling here: oversized galleries are legitimate input.
fn probe_dimensions(path: &Path) -> std::result::Result<(u32, u32), image::ImageError> {
    image::ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(image::ImageError::IoError)?
        .into_dimensions()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::events::EventService;
    use crate::shared::test_helpers::{png_bytes, sample_event_dto, test_pool, test_store};
    use futures::stream;

    fn ok_stream(chunks: Vec<&'static [u8]>) -> impl Stream<Item = std::result::Result<Bytes, std::convert::Infallible>> {
        stream::iter(
            chunks
                .into_iter()
                .map(|c| Ok(Bytes::from_static(c)))
                .collect::<Vec<_>>(),
        )
    }

    fn owned_stream(bytes: Vec<u8>) -> impl Stream<Item = std::result::Result<Bytes, std::convert::Infallible>> {
        stream::iter(vec![Ok(Bytes::from(bytes))])
    }

    async fn setup() -> (
        IngestionService,
        Event,
        Arc<UploadStore>,
        tempfile::TempDir,
    ) {
        let pool = test_pool().await;
        let (store, dir) = test_store();
        let events = EventService::new(pool.clone(), Arc::clone(&store));
        let event = events.create(sample_event_dto("expo")).await.unwrap();
        let service = IngestionService::new(pool, Arc::clone(&store));
        service.prepare_event_folder(&event).await.unwrap();
        (service, event, store, dir)
    }

    #[tokio::test]
    async fn test_ingest_valid_image() {
        let (service, event, store, _dir) = setup().await;
        let bytes = png_bytes(3, 2);
        let len = bytes.len() as i64;

        let photo = service
            .ingest_stream(
                &event,
                Some("holiday.png".to_string()),
                Some("image/png".to_string()),
                owned_stream(bytes),
            )
            .await
            .unwrap()
            .expect("photo created");

        assert_eq!(photo.width, 3);
        assert_eq!(photo.height, 2);
        assert_eq!(photo.size, len);
        assert_eq!(photo.name, "holiday.png");
        assert!(photo.filename.ends_with(".png"));
        assert_ne!(photo.filename, "holiday.png");

        let path = store.file_path(&event.slug, &photo.filename).unwrap();
        assert_eq!(tokio::fs::metadata(&path).await.unwrap().len() as i64, len);
    }

    #[tokio::test]
    async fn test_ingest_empty_stream_is_skipped() {
        let (service, event, store, _dir) = setup().await;

        let result = service
            .ingest_stream(
                &event,
                Some("nothing.jpg".to_string()),
                None,
                ok_stream(vec![]),
            )
            .await
            .unwrap();

        assert!(result.is_none());
        // No residual file
        let mut entries = tokio::fs::read_dir(store.folder_for(&event.slug).unwrap())
            .await
            .unwrap();
        assert!(entries.next_entry().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ingest_corrupt_image_cleans_up() {
        let (service, event, store, _dir) = setup().await;

        let err = service
            .ingest_stream(
                &event,
                Some("broken.jpg".to_string()),
                Some("image/jpeg".to_string()),
                ok_stream(vec![b"definitely not a jpeg".as_slice()]),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InvalidImage(_)));
        let mut entries = tokio::fs::read_dir(store.folder_for(&event.slug).unwrap())
            .await
            .unwrap();
        assert!(entries.next_entry().await.unwrap().is_none());

        let photos = sqlx::query_as::<_, Photo>("SELECT * FROM photos")
            .fetch_all(&service.pool)
            .await
            .unwrap();
        assert!(photos.is_empty());
    }

    #[tokio::test]
    async fn test_ingest_chunked_stream_counts_all_bytes() {
        let (service, event, _store, _dir) = setup().await;
        let bytes = png_bytes(1, 1);
        // Split the encoded image across several chunks
        let leaked: &'static [u8] = Box::leak(bytes.into_boxed_slice());
        let (head, tail) = leaked.split_at(8);

        let photo = service
            .ingest_stream(
                &event,
                Some("tiny.png".to_string()),
                None,
                ok_stream(vec![head, tail]),
            )
            .await
            .unwrap()
            .expect("photo created");

        assert_eq!(photo.size as usize, leaked.len());
        assert_eq!((photo.width, photo.height), (1, 1));
    }

    #[test]
    fn test_derive_extension_prefers_filename() {
        assert_eq!(
            derive_extension(Some("IMG_0042.JPG"), Some("image/png")),
            ".jpg"
        );
        assert_eq!(derive_extension(Some("a.webp"), None), ".webp");
    }

    #[test]
    fn test_derive_extension_falls_back_to_content_type() {
        assert_eq!(derive_extension(Some("noext"), Some("image/png")), ".png");
        assert_eq!(derive_extension(None, Some("image/jpeg")), ".jpg");
    }

    #[test]
    fn test_derive_extension_defaults_to_jpg() {
        assert_eq!(derive_extension(None, None), ".jpg");
        assert_eq!(derive_extension(Some("noext"), Some("not/a-mime")), ".jpg");
    }
}
