//! Upload and optimization pipeline handler.

use axum::{
    extract::{Multipart, State},
    Json,
};
use std::sync::Arc;
use utoipa;

use crate::events::ProgressEvent;
use crate::gallery::{scan, ImageRecord};
use crate::processing::{self, thumbnail, OptimizedImage};
use crate::web::dto::{ApiResponse, RejectedImage, UploadResponse, UploadedImage};
use crate::web::error::ApiError;
use crate::web::handlers::{sanitize_filename, AppState};

/// POST /api/upload - Upload and optimize gallery images.
///
/// Accepts any number of file parts. Each file is optimized into the gallery
/// directory under its original name, gets a thumbnail, and gets a default
/// metadata record if it has none. One progress event is broadcast per file;
/// a failing file does not abort the batch.
#[utoipa::path(
    post,
    path = "/upload",
    tag = "upload",
    request_body(content = Vec<u8>, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Per-file upload results", body = UploadResponse),
        (status = 400, description = "Malformed multipart body or no files provided")
    )
)]
pub async fn upload_images(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<UploadResponse>>, ApiError> {
    // Read the whole batch up front so progress events can carry batch totals.
    let mut incoming: Vec<(String, Vec<u8>)> = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::error!("Failed to read multipart field: {}", e);
        ApiError::bad_request("Invalid multipart data")
    })? {
        // Parts without a filename (plain form fields) are ignored
        let Some(filename) = field.file_name().map(|s| s.to_string()) else {
            continue;
        };

        let content = field
            .bytes()
            .await
            .map_err(|e| {
                tracing::error!("Failed to read file content: {}", e);
                ApiError::bad_request("Failed to read file")
            })?
            .to_vec();

        incoming.push((filename, content));
    }

    if incoming.is_empty() {
        return Err(ApiError::bad_request("No files provided"));
    }

    let total = incoming.len();
    state
        .broadcaster
        .broadcast_lossy(ProgressEvent::upload_started(total));

    let mut records = state.store.load().map_err(|e| {
        tracing::error!("Failed to read metadata: {}", e);
        ApiError::internal("Unable to read metadata")
    })?;

    let mut uploaded = Vec::new();
    let mut failed = Vec::new();

    for (index, (filename, content)) in incoming.into_iter().enumerate() {
        match process_file(&state, &filename, &content) {
            Ok(result) => {
                state.broadcaster.broadcast_lossy(ProgressEvent::file_optimized(
                    &filename,
                    index,
                    total,
                    result.width,
                    result.height,
                    result.bytes,
                ));

                // Re-uploads keep their existing record
                if !records.iter().any(|r| r.filename() == filename) {
                    records.push(ImageRecord::for_file(&filename));
                }

                uploaded.push(UploadedImage {
                    src: format!("/{filename}"),
                    thumbnail: state.thumbnail_src(&filename),
                    width: result.width,
                    height: result.height,
                    bytes: result.bytes,
                });
            }
            Err(reason) => {
                tracing::warn!(file = %filename, %reason, "Rejected upload");
                state.broadcaster.broadcast_lossy(ProgressEvent::file_failed(
                    &filename, index, total, &reason,
                ));
                failed.push(RejectedImage { filename, reason });
            }
        }
    }

    if !uploaded.is_empty() {
        state.store.save(&records).map_err(|e| {
            tracing::error!("Failed to update metadata: {}", e);
            ApiError::internal("Failed to update metadata")
        })?;
    }

    state
        .broadcaster
        .broadcast_lossy(ProgressEvent::upload_completed(
            total,
            uploaded.len(),
            failed.len(),
        ));

    tracing::info!(
        total,
        succeeded = uploaded.len(),
        failed = failed.len(),
        "Upload batch finished"
    );

    Ok(Json(ApiResponse::new(UploadResponse { uploaded, failed })))
}

/// Optimize one upload into the gallery directory.
///
/// Returns a client-facing reason string on rejection. Thumbnail generation
/// is best-effort: the image is already stored when it runs.
fn process_file(
    state: &AppState,
    filename: &str,
    content: &[u8],
) -> std::result::Result<OptimizedImage, String> {
    sanitize_filename(filename)?;

    if !scan::is_image_file(filename) {
        return Err("unsupported file extension".to_string());
    }

    if content.len() as u64 > state.max_upload_size {
        return Err(format!(
            "file too large (max {}MB)",
            state.max_upload_size / 1024 / 1024
        ));
    }

    let img = processing::decode(content).map_err(|e| format!("not a decodable image: {e}"))?;

    let result = state
        .optimizer
        .optimize_to(&img, &state.image_path(filename))
        .map_err(|e| format!("optimization failed: {e}"))?;

    if let Err(e) = thumbnail::generate(&img, &state.thumbnail_path(filename), state.thumbnail_size)
    {
        tracing::warn!(file = %filename, "Failed to generate thumbnail: {}", e);
    }

    Ok(result)
}
