#[cfg(test)]
use std::sync::atomic::{AtomicI64, Ordering};
#[cfg(test)]
use std::sync::Arc;

#[cfg(test)]
use uuid::Uuid;

#[cfg(test)]
use crate::core::config::StorageConfig;
#[cfg(test)]
use crate::features::events::dtos::CreateEventDto;
#[cfg(test)]
use crate::features::events::models::Event;
#[cfg(test)]
use crate::features::photos::models::Photo;
#[cfg(test)]
use crate::modules::storage::UploadStore;

/// In-memory database with migrations applied. Single connection: every
/// `sqlite::memory:` connection is its own database.
#[cfg(test)]
pub async fn test_pool() -> sqlx::SqlitePool {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory database");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations");
    pool
}

/// Upload store rooted in a scratch directory. Keep the returned TempDir
/// alive for the duration of the test.
#[cfg(test)]
pub fn test_store() -> (Arc<UploadStore>, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = Arc::new(UploadStore::new(&StorageConfig {
        uploads_dir: dir.path().to_path_buf(),
    }));
    (store, dir)
}

#[cfg(test)]
pub fn sample_event_dto(slug: &str) -> CreateEventDto {
    CreateEventDto {
        title: format!("Event {}", slug),
        slug: slug.to_string(),
        date: chrono::NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
        description: None,
        watermark_text: None,
    }
}

/// Encode a solid-color PNG of the given dimensions.
#[cfg(test)]
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([120, 90, 200, 255]));
    let mut out = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .expect("encode png");
    out.into_inner()
}

#[cfg(test)]
static NEXT_UPLOADED_AT: AtomicI64 = AtomicI64::new(1_700_000_000_000);

/// Insert a photo record with a backing file, bypassing the ingestion
/// pipeline. Timestamps are strictly increasing so upload-order assertions
/// stay deterministic.
#[cfg(test)]
pub async fn seed_photo(
    pool: sqlx::SqlitePool,
    store: &UploadStore,
    event: &Event,
    original_name: &str,
) -> Photo {
    let filename = format!("{}.jpg", Uuid::new_v4().simple());
    let path = store.file_path(&event.slug, &filename).expect("file path");
    tokio::fs::write(&path, b"seeded image bytes")
        .await
        .expect("write photo file");

    let uploaded_at = NEXT_UPLOADED_AT.fetch_add(1, Ordering::Relaxed);

    sqlx::query_as::<_, Photo>(
        r#"
        INSERT INTO photos (id, event_id, event_slug, filename, name, content_type,
                            caption, width, height, size, uploaded_at, is_favorite)
        VALUES (?, ?, ?, ?, ?, 'image/jpeg', NULL, 4, 3, 18, ?, FALSE)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(event.id)
    .bind(&event.slug)
    .bind(&filename)
    .bind(original_name)
    .bind(uploaded_at)
    .fetch_one(&pool)
    .await
    .expect("insert photo")
}
