use imgest_core::{AppError, ImagePage, ImageRecord};
use imgest_db::ImageRepository;
use uuid::Uuid;

/// Largest page a single listing call returns
pub const MAX_PAGE_SIZE: i64 = 100;

/// Paginated, creation-ordered reads of ingested images
#[derive(Clone)]
pub struct ListingService {
    repository: ImageRepository,
}

impl ListingService {
    pub fn new(repository: ImageRepository) -> Self {
        Self { repository }
    }

    /// One page of records ordered by `(created, id)` plus the total count.
    ///
    /// An empty store is an empty page with `total = 0`, not an error.
    #[tracing::instrument(skip(self), fields(operation = "list_images"))]
    pub async fn list(&self, offset: i64, limit: i64) -> Result<ImagePage, AppError> {
        if offset < 0 {
            return Err(AppError::InvalidInput(format!(
                "offset must be non-negative, got {}",
                offset
            )));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&limit) {
            return Err(AppError::InvalidInput(format!(
                "limit must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, limit
            )));
        }

        let page = self.repository.list_page(offset, limit).await?;

        tracing::debug!(
            returned = page.records.len(),
            total = page.total,
            "Listed images"
        );

        Ok(page)
    }

    #[tracing::instrument(skip(self), fields(operation = "get_image"))]
    pub async fn get(&self, id: Uuid) -> Result<ImageRecord, AppError> {
        self.repository
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Image {} not found", id)))
    }
}
