use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use imgest_core::ImageResponse;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::upload::stage_multipart_image;

/// Upload image handler
///
/// Stages the multipart file into a temporary file and hands it to the ingestion
/// service, which resizes, checksums and records it before responding.
///
/// # Returns
/// `ImageResponse` of the stored record (HTTP 201 Created). An undecodable upload is
/// still created, with status `CORRUPTED`.
///
/// # Errors
/// - `AppError::InvalidInput` - Missing file field or unusable filename
/// - `AppError::PayloadTooLarge` - File exceeds size limit
/// - `AppError::Conflict` - Derived storage path already taken
/// - `AppError::Storage` / `AppError::Database` - Infrastructure failure
#[utoipa::path(
    post,
    path = "/api/submit",
    tag = "images",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Image ingested", body = ImageResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 409, description = "Storage path conflict", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_image"))]
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, HttpAppError> {
    let multipart = multipart?;
    let upload =
        stage_multipart_image(multipart, state.config.ingest.max_file_size_bytes).await?;

    let image = state.ingestion.create(upload).await?;

    Ok((StatusCode::CREATED, Json(ImageResponse::from(image))))
}
