//! Storage, repository and service wiring

use crate::state::AppState;
use anyhow::{Context, Result};
use imgest_core::Config;
use imgest_services::{ImageRepository, IngestionService, ListingService, LocalStorage};
use sqlx::PgPool;
use std::sync::Arc;

/// Build the services around an already migrated pool.
pub async fn initialize_services(config: &Config, pool: PgPool) -> Result<Arc<AppState>> {
    let storage = LocalStorage::new(&config.ingest.base_path)
        .await
        .context("Failed to initialize image storage")?;

    tracing::info!(
        base_path = %storage.base_path().display(),
        image_width = config.ingest.image_width,
        "Local image storage ready"
    );

    let repository = ImageRepository::new(pool.clone());

    Ok(Arc::new(AppState {
        config: config.clone(),
        pool,
        ingestion: IngestionService::new(
            repository.clone(),
            storage,
            config.ingest.image_width,
        ),
        listing: ListingService::new(repository),
    }))
}
