use imgest_core::{AppError, ImageRecord};
use imgest_db::{with_transaction, ImageRepository};
use imgest_processing::{sha256_file, ImageResize, ResizeError};
use imgest_storage::{LocalStorage, StorageError};
use std::path::Path;
use tempfile::TempPath;
use uuid::Uuid;

/// An upload staged by the transport layer in a temporary file.
///
/// Ownership of the temporary file passes to [`IngestionService::create`], which removes it
/// once processing ends, whatever the outcome.
#[derive(Debug)]
pub struct StagedUpload {
    pub temp_path: TempPath,
    pub original_filename: String,
    /// Declared by the client; not trusted for format detection.
    pub content_type: Option<String>,
    /// Headers of the uploaded part (`Content-Disposition`, `Content-Type`).
    pub headers: Vec<(String, String)>,
}

impl StagedUpload {
    pub fn new(temp_path: TempPath, original_filename: impl Into<String>) -> Self {
        Self {
            temp_path,
            original_filename: original_filename.into(),
            content_type: None,
            headers: Vec::new(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_headers(mut self, headers: Vec<(String, String)>) -> Self {
        self.headers = headers;
        self
    }
}

/// Synchronous image ingestion: resize into permanent storage, checksum the stored
/// bytes, derive the status and insert the record in one transaction.
#[derive(Clone)]
pub struct IngestionService {
    repository: ImageRepository,
    storage: LocalStorage,
    image_width: u32,
}

impl IngestionService {
    pub fn new(repository: ImageRepository, storage: LocalStorage, image_width: u32) -> Self {
        Self {
            repository,
            storage,
            image_width,
        }
    }

    /// Ingest `upload` under a freshly allocated id.
    pub async fn create(&self, upload: StagedUpload) -> Result<ImageRecord, AppError> {
        self.create_with_id(Uuid::new_v4(), upload).await
    }

    /// Ingest `upload` as record `id`.
    ///
    /// An id that is already in use surfaces as [`AppError::Conflict`]; the existing file
    /// and record are left untouched.
    #[tracing::instrument(
        skip(self, upload),
        fields(
            image_id = %id,
            original_filename = %upload.original_filename,
            operation = "ingest_image"
        )
    )]
    pub async fn create_with_id(
        &self,
        id: Uuid,
        upload: StagedUpload,
    ) -> Result<ImageRecord, AppError> {
        let StagedUpload {
            temp_path,
            original_filename,
            content_type,
            headers,
        } = upload;

        tracing::debug!(
            content_type = ?content_type,
            header_count = headers.len(),
            "Ingesting upload"
        );

        let destination = self
            .storage
            .image_path(id, &original_filename)
            .map_err(storage_error)?;
        let path = destination
            .to_str()
            .map(str::to_string)
            .ok_or_else(|| {
                AppError::Storage(format!(
                    "Storage path {} is not valid UTF-8",
                    destination.display()
                ))
            })?;

        self.storage
            .reserve(&destination)
            .await
            .map_err(storage_error)?;

        let width = self.image_width;
        let target = destination.clone();
        let resized = run_blocking(&self.storage, &destination, "Resize", move || {
            let result = ImageResize::resize_file(&temp_path, &target, width);
            if let Err(e) = temp_path.close() {
                tracing::warn!(error = %e, "Failed to remove temporary upload file");
            }
            result
        })
        .await?;

        if let Err(e) = resized {
            self.discard(&destination).await;
            resize_failure(e)?;
        }

        let record = run_blocking(&self.storage, &destination, "Checksum", move || {
            ImageRecord::derive(id, path, |stored| {
                sha256_file(stored).inspect_err(|e| {
                    tracing::warn!(
                        error = %e,
                        path = %stored.display(),
                        "Checksum of stored image failed"
                    );
                })
            })
        })
        .await?;

        let repository = self.repository.clone();
        let inserted = with_transaction(self.repository.pool(), move |tx| {
            Box::pin(async move { repository.insert_tx(tx, &record).await })
        })
        .await;

        match inserted {
            Ok(stored) => {
                tracing::info!(
                    image_id = %stored.id(),
                    path = %stored.path(),
                    status = %stored.status(),
                    "Image ingested"
                );
                Ok(stored)
            }
            Err(e) => {
                // No record references the file anymore
                self.discard(&destination).await;
                Err(e)
            }
        }
    }

    async fn discard(&self, path: &Path) {
        discard(&self.storage, path).await
    }
}

async fn discard(storage: &LocalStorage, path: &Path) {
    if let Err(e) = storage.remove(path).await {
        tracing::warn!(error = %e, path = %path.display(), "Failed to remove stored image");
    }
}

/// Run `f` on the blocking pool. If the task dies, the reserved `destination` is
/// removed before the failure is returned.
async fn run_blocking<T, F>(
    storage: &LocalStorage,
    destination: &Path,
    task: &str,
    f: F,
) -> Result<T, AppError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(value) => Ok(value),
        Err(e) => {
            discard(storage, destination).await;
            Err(AppError::Internal(format!("{} task failed: {}", task, e)))
        }
    }
}

/// Corrupt input continues as a `CORRUPTED` record; anything else aborts ingestion.
fn resize_failure(err: ResizeError) -> Result<(), AppError> {
    if err.is_corrupt_input() {
        tracing::warn!(error = %err, "Upload is not a decodable image");
        Ok(())
    } else if err.is_client_error() {
        Err(AppError::ImageProcessing(err.to_string()))
    } else {
        Err(AppError::Storage(format!("Failed to store resized image: {}", err)))
    }
}

fn storage_error(err: StorageError) -> AppError {
    match err {
        StorageError::InvalidName(msg) => AppError::InvalidInput(msg),
        StorageError::AlreadyExists(path) => {
            AppError::Conflict(format!("Image path {} is already taken", path))
        }
        other => AppError::Storage(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imgest_core::ErrorCategory;
    use std::io;

    #[test]
    fn test_resize_failure_classification() {
        let corrupt = ResizeError::Decode(image_error());
        assert!(resize_failure(corrupt).is_ok());

        let empty = ResizeError::EmptyImage {
            width: 0,
            height: 10,
        };
        assert_eq!(
            resize_failure(empty).unwrap_err().category(),
            ErrorCategory::Client
        );

        let io = ResizeError::Io(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        assert_eq!(
            resize_failure(io).unwrap_err().category(),
            ErrorCategory::Server
        );
    }

    #[test]
    fn test_storage_error_mapping() {
        assert_eq!(
            storage_error(StorageError::InvalidName("..".into())).category(),
            ErrorCategory::Client
        );
        assert_eq!(
            storage_error(StorageError::AlreadyExists("/a".into())).category(),
            ErrorCategory::Conflict
        );
        assert_eq!(
            storage_error(StorageError::DeleteFailed("x".into())).category(),
            ErrorCategory::Server
        );
    }

    #[tokio::test]
    async fn test_failed_blocking_task_removes_reserved_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();
        let destination = storage.image_path(Uuid::new_v4(), "a.png").unwrap();
        storage.reserve(&destination).await.unwrap();

        let err = run_blocking(&storage, &destination, "Resize", || -> () {
            panic!("decoder blew up")
        })
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::Internal(_)));
        assert!(!destination.exists());
    }

    #[tokio::test]
    async fn test_successful_blocking_task_keeps_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();
        let destination = storage.image_path(Uuid::new_v4(), "a.png").unwrap();
        storage.reserve(&destination).await.unwrap();

        let value = run_blocking(&storage, &destination, "Checksum", || 7)
            .await
            .unwrap();

        assert_eq!(value, 7);
        assert!(destination.exists());
    }

    #[test]
    fn test_oversized_output_is_client_error() {
        let err = resize_failure(ResizeError::TooLarge {
            width: 1500,
            height: 150_000_000,
        })
        .unwrap_err();
        assert!(matches!(err, AppError::ImageProcessing(_)));
    }

    fn image_error() -> image::ImageError {
        image::ImageError::IoError(io::Error::new(io::ErrorKind::InvalidData, "bad"))
    }
}
