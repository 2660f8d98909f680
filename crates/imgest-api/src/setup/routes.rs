//! Route configuration and setup

use crate::constants::{API_PREFIX, MULTIPART_OVERHEAD_BYTES};
use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Json, Router,
};
use imgest_core::Config;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Router<()> {
    let body_limit = config.ingest.max_file_size_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .merge(public_routes())
        .merge(image_routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health and documentation
fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route(
            &format!("{}/openapi.json", API_PREFIX),
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        )
}

/// Image routes
fn image_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/submit", API_PREFIX),
            post(handlers::image_upload::upload_image),
        )
        .route(
            &format!("{}/list", API_PREFIX),
            get(handlers::image_get::list_images),
        )
        .route(
            &format!("{}/images/{{id}}", API_PREFIX),
            get(handlers::image_get::get_image),
        )
}
