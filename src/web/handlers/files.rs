//! File listing and deletion handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use std::fs;
use std::sync::Arc;
use utoipa;

use crate::gallery::scan;
use crate::web::dto::ApiResponse;
use crate::web::error::ApiError;
use crate::web::handlers::{sanitize_filename, AppState};

/// GET /api/files - List gallery image files.
///
/// Returns the image files in the gallery directory, each as `/` + filename.
#[utoipa::path(
    get,
    path = "/files",
    tag = "files",
    responses(
        (status = 200, description = "Image files in the gallery directory", body = Vec<String>)
    )
)]
pub async fn list_files(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<String>>>, ApiError> {
    let files = scan::list_image_files(&state.images_dir).map_err(|e| {
        tracing::error!("Failed to scan gallery directory: {}", e);
        ApiError::internal("Unable to scan directory")
    })?;

    let paths = files.into_iter().map(|f| format!("/{f}")).collect();
    Ok(Json(ApiResponse::new(paths)))
}

/// DELETE /api/files/:filename - Delete a gallery image.
///
/// Removes the file, its thumbnail, and its metadata record.
#[utoipa::path(
    delete,
    path = "/files/{filename}",
    tag = "files",
    params(
        ("filename" = String, Path, description = "Image filename")
    ),
    responses(
        (status = 200, description = "Image deleted"),
        (status = 400, description = "Invalid filename"),
        (status = 404, description = "Image not found")
    )
)]
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    sanitize_filename(&filename).map_err(ApiError::bad_request)?;

    let path = state.image_path(&filename);
    if !path.is_file() {
        return Err(ApiError::not_found("Image not found"));
    }

    fs::remove_file(&path).map_err(|e| {
        tracing::error!("Failed to delete image {}: {}", filename, e);
        ApiError::internal("Failed to delete image")
    })?;

    // Thumbnail may never have been generated
    let _ = fs::remove_file(state.thumbnail_path(&filename));

    // Drop the metadata record; reconciliation would catch this later,
    // but the delete endpoint keeps the sidecar in step immediately.
    let records = state.store.load().map_err(|e| {
        tracing::error!("Failed to read metadata: {}", e);
        ApiError::internal("Unable to read metadata")
    })?;

    let remaining: Vec<_> = records
        .into_iter()
        .filter(|r| r.filename() != filename)
        .collect();

    state.store.save(&remaining).map_err(|e| {
        tracing::error!("Failed to update metadata: {}", e);
        ApiError::internal("Failed to update metadata")
    })?;

    tracing::info!(file = %filename, "Deleted gallery image");

    Ok(Json(ApiResponse::new(())))
}
