use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::core::config::StorageConfig;
use crate::core::error::{AppError, Result};
use crate::shared::validation::is_safe_slug;

/// Single source of truth for mapping an event slug to its folder under the
/// uploads root. Slugs arrive from records and requests alike, so every entry
/// point re-checks them before they touch a path.
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            root: config.uploads_dir.clone(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Pure path computation, no I/O.
    pub fn folder_for(&self, slug: &str) -> Result<PathBuf> {
        if !is_safe_slug(slug) {
            return Err(AppError::Validation(format!(
                "Unsafe event slug: {:?}",
                slug
            )));
        }
        Ok(self.root.join(slug))
    }

    /// Path of one stored file inside an event folder.
    pub fn file_path(&self, slug: &str, filename: &str) -> Result<PathBuf> {
        if filename.is_empty()
            || filename.contains('/')
            || filename.contains('\\')
            || filename.contains("..")
        {
            return Err(AppError::Validation(format!(
                "Unsafe file name: {:?}",
                filename
            )));
        }
        Ok(self.folder_for(slug)?.join(filename))
    }

    /// Create the uploads root and the event subfolder if missing.
    pub async fn ensure_folder(&self, slug: &str) -> Result<PathBuf> {
        let folder = self.folder_for(slug)?;
        tokio::fs::create_dir_all(&folder).await?;
        Ok(folder)
    }

    /// Recursively delete an event folder. Tolerant of a folder that is
    /// already gone; other failures are logged, not propagated (records are
    /// the source of truth).
    pub async fn remove_folder(&self, slug: &str) -> Result<()> {
        let folder = self.folder_for(slug)?;
        match tokio::fs::remove_dir_all(&folder).await {
            Ok(()) => debug!("Removed event folder: {}", folder.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove folder {}: {}", folder.display(), e),
        }
        Ok(())
    }

    /// Delete one stored file, tolerating a file that is already gone.
    pub async fn remove_file(&self, slug: &str, filename: &str) -> Result<()> {
        let path = self.file_path(slug, filename)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => debug!("Removed file: {}", path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove file {}: {}", path.display(), e),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &Path) -> UploadStore {
        UploadStore::new(&StorageConfig {
            uploads_dir: dir.to_path_buf(),
        })
    }

    #[test]
    fn test_folder_for_computes_path() {
        let store = store_in(Path::new("/srv/uploads"));
        let folder = store.folder_for("summer-wedding").unwrap();
        assert_eq!(folder, Path::new("/srv/uploads/summer-wedding"));
    }

    #[test]
    fn test_folder_for_rejects_traversal() {
        let store = store_in(Path::new("/srv/uploads"));
        assert!(store.folder_for("../evil").is_err());
        assert!(store.folder_for("a/b").is_err());
        assert!(store.folder_for("").is_err());
    }

    #[test]
    fn test_file_path_rejects_unsafe_names() {
        let store = store_in(Path::new("/srv/uploads"));
        assert!(store.file_path("event", "../../etc/passwd").is_err());
        assert!(store.file_path("event", "a/b.jpg").is_err());
        assert!(store.file_path("event", "").is_err());
        assert!(store.file_path("event", "abc123.jpg").is_ok());
    }

    #[tokio::test]
    async fn test_ensure_and_remove_folder() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(tmp.path());

        let folder = store.ensure_folder("shoot_2024").await.unwrap();
        assert!(folder.is_dir());

        // Idempotent
        store.ensure_folder("shoot_2024").await.unwrap();

        store.remove_folder("shoot_2024").await.unwrap();
        assert!(!folder.exists());

        // Removing an already-missing folder is fine
        store.remove_folder("shoot_2024").await.unwrap();
    }

    #[tokio::test]
    async fn test_remove_file_tolerates_missing() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(tmp.path());
        store.ensure_folder("event").await.unwrap();

        let path = store.file_path("event", "a.jpg").unwrap();
        tokio::fs::write(&path, b"bytes").await.unwrap();

        store.remove_file("event", "a.jpg").await.unwrap();
        assert!(!path.exists());

        store.remove_file("event", "a.jpg").await.unwrap();
    }
}
