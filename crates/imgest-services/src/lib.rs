//! Imgest Services Layer
//!
//! This crate is the **business service layer**: ingestion orchestrates storage,
//! resizing, checksumming and the transactional insert; listing serves paginated
//! reads. Keep business logic here; keep thin HTTP handling in imgest-api.

pub mod ingestion;
pub mod listing;

pub use imgest_db::ImageRepository;
pub use imgest_storage::{LocalStorage, StorageError};
pub use ingestion::{IngestionService, StagedUpload};
pub use listing::{ListingService, MAX_PAGE_SIZE};
