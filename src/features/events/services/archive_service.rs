use std::path::Path;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Bytes;
use futures::Stream;
use tempfile::TempPath;
use tokio_util::io::ReaderStream;
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::CompressionMethod;

use crate::core::error::{AppError, Result};
use crate::modules::storage::UploadStore;

/// Archive bytes are streamed back in bounded chunks as they are read from
/// the temporary file.
const STREAM_CHUNK_SIZE: usize = 1024 * 1024; // 1MB

/// Builds zip archives of event folders into a temporary file and streams
/// them back.
pub struct ArchiveService {
    store: Arc<UploadStore>,
}

impl ArchiveService {
    pub fn new(store: Arc<UploadStore>) -> Self {
        Self { store }
    }

    /// Produce a streamed zip of every file in the event's folder.
    ///
    /// Fails with not-found if the folder is missing or empty. The temporary
    /// archive is removed once the returned stream is dropped, whether it was
    /// fully consumed, abandoned mid-download, or never polled.
    pub async fn export(&self, slug: &str) -> Result<ArchiveStream> {
        let folder = self.store.folder_for(slug)?;
        if !folder_has_entries(&folder).await {
            return Err(AppError::NotFound(
                "No photos available for download".to_string(),
            ));
        }

        // Zip construction is blocking I/O plus deflate work
        let temp_path = tokio::task::spawn_blocking(move || build_archive(&folder))
            .await
            .map_err(|e| AppError::Internal(format!("Archive task failed: {}", e)))??;

        let file = tokio::fs::File::open(&temp_path).await?;
        let content_length = file.metadata().await?.len();
        debug!(
            "Archive built for {}: {} bytes at {}",
            slug,
            content_length,
            temp_path.display()
        );

        Ok(ArchiveStream {
            inner: ReaderStream::with_capacity(file, STREAM_CHUNK_SIZE),
            content_length,
            temp_path,
        })
    }
}

/// A zip archive being streamed from a temporary file. Dropping the stream
/// deletes the file (`TempPath` unlinks on drop), so cleanup happens on every
/// exit path including client disconnects.
#[derive(Debug)]
pub struct ArchiveStream {
    inner: ReaderStream<tokio::fs::File>,
    content_length: u64,
    temp_path: TempPath,
}

impl ArchiveStream {
    pub fn content_length(&self) -> u64 {
        self.content_length
    }

    pub fn path(&self) -> &Path {
        &self.temp_path
    }
}

impl Stream for ArchiveStream {
    type Item = std::io::Result<Bytes>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.get_mut().inner).poll_next(cx)
    }
}

async fn folder_has_entries(folder: &Path) -> bool {
    match tokio::fs::read_dir(folder).await {
        Ok(mut entries) => matches!(entries.next_entry().await, Ok(Some(_))),
        Err(_) => false,
    }
}

/// Write a deflate-compressed zip of `folder` into a fresh temp file and
/// return its path. Entries are named relative to the folder root.
fn build_archive(folder: &Path) -> Result<TempPath> {
    let temp = tempfile::Builder::new()
        .prefix("gallery-")
        .suffix(".zip")
        .tempfile()?;
    let (file, temp_path) = temp.into_parts();

    let mut writer = zip::ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    add_directory(&mut writer, folder, folder, options)?;
    writer.finish()?;

    Ok(temp_path)
}

fn add_directory(
    writer: &mut zip::ZipWriter<std::fs::File>,
    root: &Path,
    dir: &Path,
    options: SimpleFileOptions,
) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            add_directory(writer, root, &path, options)?;
            continue;
        }
        let name = path
            .strip_prefix(root)
            .map_err(|_| AppError::Internal("Archive entry escaped its root".to_string()))?
            .to_string_lossy()
            .replace('\\', "/");
        writer.start_file(name, options)?;
        let mut source = std::fs::File::open(&path)?;
        std::io::copy(&mut source, writer)?;
    }
    Ok(())
}
