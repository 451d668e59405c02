// src/server/handlers.rs
use crate::application::error::ApplicationError;
use crate::domain::bookmark::{Bookmark, BookmarkCandidate};
use crate::domain::error::DomainError;
use crate::server::caller::Caller;
use crate::server::error::ApiError;
use crate::server::AppState;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Success body of `POST /api/bookmarks/import`
#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub success: bool,
    pub count: usize,
}

/// Query string of `GET /api/bookmarks`
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub category: Option<String>,
}

/// `GET /health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/bookmarks`: stored bookmarks ordered by id, optionally one category
#[instrument(skip(state))]
pub async fn list_bookmarks(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Bookmark>>, ApiError> {
    let service = state.bookmark_service.clone();
    let bookmarks = tokio::task::spawn_blocking(move || match params.category {
        Some(category) => service.get_bookmarks_in(&category),
        None => service.get_all_bookmarks(),
    })
    .await
    .map_err(ApplicationError::from)??;
    Ok(Json(bookmarks))
}

/// `GET /api/bookmarks/{id}`
#[instrument(skip(state, id))]
pub async fn get_bookmark(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<Bookmark>, ApiError> {
    let Path(id) = id.map_err(|rejection| {
        debug!("Rejected path: {}", rejection);
        ApiError::bad_request("invalid bookmark id")
    })?;

    let service = state.bookmark_service.clone();
    let bookmark = tokio::task::spawn_blocking(move || service.get_bookmark(id))
        .await
        .map_err(ApplicationError::from)??;
    bookmark
        .map(Json)
        .ok_or_else(|| DomainError::BookmarkNotFound(id.to_string()).into())
}

/// `GET /api/categories`
#[instrument(skip(state))]
pub async fn list_categories(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    let service = state.bookmark_service.clone();
    let categories = tokio::task::spawn_blocking(move || service.get_categories())
        .await
        .map_err(ApplicationError::from)??;
    Ok(Json(categories))
}

/// `POST /api/bookmarks`: one candidate, created for the caller
#[instrument(skip(state, payload), fields(caller = %caller.0))]
pub async fn create_bookmark(
    State(state): State<AppState>,
    caller: Caller,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Bookmark>), ApiError> {
    let Json(body) = payload.map_err(|rejection| {
        debug!("Rejected body: {}", rejection);
        ApiError::from_json_rejection(&rejection)
    })?;
    if !body.is_object() {
        return Err(ApiError::invalid_format());
    }
    let candidate = BookmarkCandidate::from_json(&body);

    let service = state.bookmark_service.clone();
    let bookmark = tokio::task::spawn_blocking(move || service.add_bookmark(caller.0, &candidate))
        .await
        .map_err(ApplicationError::from)??;
    Ok((StatusCode::CREATED, Json(bookmark)))
}

/// `POST /api/bookmarks/import`: `{"bookmarks": [...]}` for the caller
#[instrument(skip(state, payload), fields(caller = %caller.0))]
pub async fn import_bookmarks(
    State(state): State<AppState>,
    caller: Caller,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ImportResponse>, ApiError> {
    let Json(body) = payload.map_err(|rejection| {
        debug!("Rejected body: {}", rejection);
        ApiError::from_json_rejection(&rejection)
    })?;
    let batch = body.get("bookmarks").cloned().unwrap_or_default();

    let summary = state
        .import_service
        .import_bookmarks(caller.0, &batch)
        .await?;
    Ok(Json(ImportResponse {
        success: true,
        count: summary.count,
    }))
}
