use crate::constants::{
    DEFAULT_PAGE_SIZE, HEADER_PAGE, HEADER_PAGE_SIZE, HEADER_TOTAL_COUNT, HEADER_TOTAL_PAGES,
};
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::rejection::{PathRejection, QueryRejection},
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderName, HeaderValue},
    response::IntoResponse,
    Json,
};
use imgest_core::{ImagePage, ImageResponse};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/api/images/{id}",
    tag = "images",
    params(
        ("id" = Uuid, Path, description = "Image ID")
    ),
    responses(
        (status = 200, description = "Image found", body = ImageResponse),
        (status = 400, description = "Malformed image ID", body = ErrorResponse),
        (status = 404, description = "Image not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, id), fields(operation = "get_image"))]
pub async fn get_image(
    id: Result<Path<Uuid>, PathRejection>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let Path(id) = id?;
    let image = state.listing.get(id).await?;

    Ok(Json(ImageResponse::from(image)))
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct PaginationQuery {
    /// Number of records to skip
    #[serde(default)]
    pub offset: i64,
    /// Page size, 1 to 100
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    DEFAULT_PAGE_SIZE
}

/// `X-Total-Count`, `X-Page`, `X-Page-Size` and `X-Total-Pages` for a listed page.
fn pagination_headers(page: &ImagePage) -> HeaderMap {
    let mut headers = HeaderMap::new();
    for (name, value) in [
        (HEADER_TOTAL_COUNT, page.total),
        (HEADER_PAGE, page.page()),
        (HEADER_PAGE_SIZE, page.page_size()),
        (HEADER_TOTAL_PAGES, page.total_pages()),
    ] {
        headers.insert(HeaderName::from_static(name), HeaderValue::from(value));
    }
    headers
}

#[utoipa::path(
    get,
    path = "/api/list",
    tag = "images",
    params(
        PaginationQuery
    ),
    responses(
        (status = 200, description = "Images in creation order", body = Vec<ImageResponse>,
            headers(
                ("X-Total-Count" = i64, description = "Total number of images"),
                ("X-Page" = i64, description = "1-based page number"),
                ("X-Page-Size" = i64, description = "Requested page size"),
                ("X-Total-Pages" = i64, description = "Number of pages at this page size")
            )
        ),
        (status = 400, description = "Offset or limit out of range", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, pagination), fields(operation = "list_images"))]
pub async fn list_images(
    State(state): State<Arc<AppState>>,
    pagination: Result<Query<PaginationQuery>, QueryRejection>,
) -> Result<impl IntoResponse, HttpAppError> {
    let Query(pagination) = pagination?;

    let page = state
        .listing
        .list(pagination.offset, pagination.limit)
        .await?;

    let headers = pagination_headers(&page);
    let body: Vec<ImageResponse> = page.records.into_iter().map(ImageResponse::from).collect();

    Ok((headers, Json(body)))
}
