//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use imgest_core::models;

/// Returns the OpenAPI document served at `/api/openapi.json`.
pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "imgest API",
        version = "0.1.0",
        description = "Image ingestion service. Uploaded images are resized to a canonical width, fingerprinted with SHA-256 and recorded with a processing status; records are listed in creation order."
    ),
    paths(
        handlers::image_upload::upload_image,
        handlers::image_get::list_images,
        handlers::image_get::get_image,
        handlers::health::health_check,
    ),
    components(
        schemas(
            models::ImageResponse,
            models::ImageStatus,
            handlers::image_get::PaginationQuery,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "images", description = "Image ingestion and listing"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;
