//! Application state shared by all handlers.

use imgest_core::Config;
use imgest_services::{IngestionService, ListingService};
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub pool: PgPool,
    pub ingestion: IngestionService,
    pub listing: ListingService,
}
