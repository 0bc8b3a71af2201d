//! Handlers for the URL management endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::pagination::PaginationParams;
use crate::api::dto::urls::{DeleteUrlResponse, ListUrlsResponse, ShortenRequest, UrlResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short URL for the submitted original URL.
///
/// # Endpoint
///
/// `POST /api/urls`
///
/// Submitting a URL that was already shortened returns the existing record
/// with its original short code instead of minting a new one.
///
/// # Errors
///
/// Returns 400 if the body is not a well-formed absolute URL.
pub async fn shorten_url_handler(
    State(state): State<AppState>,
    Json(payload): Json<ShortenRequest>,
) -> Result<(StatusCode, Json<UrlResponse>), AppError> {
    payload.validate()?;

    let record = state.url_service.shorten_url(&payload.url).await?;

    Ok((
        StatusCode::CREATED,
        Json(UrlResponse::from_record(record, &state.base_url)),
    ))
}

/// Returns the record behind a short code, including its visit counter.
///
/// # Endpoint
///
/// `GET /api/urls/{code}`
pub async fn url_info_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<UrlResponse>, AppError> {
    let record = state.url_service.get_url(&code).await?;

    Ok(Json(UrlResponse::from_record(record, &state.base_url)))
}

/// Lists URL records, newest first.
///
/// # Endpoint
///
/// `GET /api/urls?limit=10&offset=0`
///
/// Absent or non-numeric pagination values fall back to `limit=10`,
/// `offset=0`; the served page size is capped at 100.
pub async fn list_urls_handler(
    Query(params): Query<PaginationParams>,
    State(state): State<AppState>,
) -> Result<Json<ListUrlsResponse>, AppError> {
    let (limit, offset) = params.resolve();

    let records = state.url_service.list_urls(limit, offset).await?;

    let urls = records
        .into_iter()
        .map(|record| UrlResponse::from_record(record, &state.base_url))
        .collect();

    Ok(Json(ListUrlsResponse {
        urls,
        limit,
        offset,
    }))
}

/// Deletes the record behind a short code.
///
/// # Endpoint
///
/// `DELETE /api/urls/{code}`
pub async fn delete_url_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<DeleteUrlResponse>, AppError> {
    state.url_service.delete_url(&code).await?;

    Ok(Json(DeleteUrlResponse {
        message: "URL deleted".to_string(),
    }))
}
