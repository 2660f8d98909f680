use crate::error::{StorageError, StorageResult};
use crate::keys;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

/// Longest stored path the `images.path` column holds, in characters.
pub const MAX_PATH_CHARS: usize = 255;

/// Local filesystem storage for resized images
#[derive(Clone, Debug)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for stored images (e.g., "/var/lib/imgest/images")
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Destination path for the image with record `id` uploaded as `original_filename`.
    ///
    /// Only the final component of `original_filename` is used, so the result always sits
    /// directly under the base directory. Paths longer than [`MAX_PATH_CHARS`] are rejected.
    pub fn image_path(&self, id: Uuid, original_filename: &str) -> StorageResult<PathBuf> {
        let file_name = keys::image_file_name(id, original_filename)?;
        let path = self.base_path.join(&file_name);

        if path.parent() != Some(self.base_path.as_path()) {
            return Err(StorageError::InvalidName(format!(
                "'{}' resolves outside storage directory",
                original_filename
            )));
        }

        let length = path.to_string_lossy().chars().count();
        if length > MAX_PATH_CHARS {
            return Err(StorageError::InvalidName(format!(
                "stored path for '{}' would be {} characters; the limit is {}",
                original_filename, length, MAX_PATH_CHARS
            )));
        }

        Ok(path)
    }

    /// Atomically create an empty file at `path`, claiming it for the caller.
    ///
    /// Fails with [`StorageError::AlreadyExists`] instead of touching an existing file.
    pub async fn reserve(&self, path: &Path) -> StorageResult<()> {
        match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .await
        {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                Err(StorageError::AlreadyExists(path.display().to_string()))
            }
            Err(e) => Err(StorageError::IoError(e)),
        }
    }

    /// Remove a stored image. A file that is already gone is not an error.
    pub async fn remove(&self, path: &Path) -> StorageResult<()> {
        if !path.starts_with(&self.base_path) {
            return Err(StorageError::DeleteFailed(format!(
                "{} is outside storage directory",
                path.display()
            )));
        }

        let start = std::time::Instant::now();

        match fs::remove_file(path).await {
            Ok(()) => {
                tracing::info!(
                    path = %path.display(),
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Local storage delete successful"
                );
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "File already removed");
                Ok(())
            }
            Err(e) => Err(StorageError::DeleteFailed(format!(
                "Failed to delete file {}: {}",
                path.display(),
                e
            ))),
        }
    }
}
