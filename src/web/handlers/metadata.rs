//! Metadata handlers.

use axum::{extract::State, Json};
use std::collections::HashMap;
use std::sync::Arc;
use utoipa;
use validator::Validate;

use crate::gallery::{sync, ImageRecord, SyncReport};
use crate::web::dto::{ApiResponse, MetadataWriteResponse};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// GET /api/metadata - Get all image metadata records.
#[utoipa::path(
    get,
    path = "/metadata",
    tag = "metadata",
    responses(
        (status = 200, description = "All metadata records", body = Vec<ImageRecord>)
    )
)]
pub async fn get_metadata(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<ImageRecord>>>, ApiError> {
    let records = state.store.load().map_err(|e| {
        tracing::error!("Failed to read metadata: {}", e);
        ApiError::internal("Unable to read metadata")
    })?;

    Ok(Json(ApiResponse::new(records)))
}

/// PUT /api/metadata - Replace the whole metadata array.
///
/// Also registered for POST for older clients. Records are validated
/// individually; the write is all-or-nothing.
#[utoipa::path(
    put,
    path = "/metadata",
    tag = "metadata",
    request_body = Vec<ImageRecord>,
    responses(
        (status = 200, description = "Metadata replaced", body = MetadataWriteResponse),
        (status = 422, description = "One or more records are invalid")
    )
)]
pub async fn replace_metadata(
    State(state): State<Arc<AppState>>,
    Json(records): Json<Vec<ImageRecord>>,
) -> Result<Json<ApiResponse<MetadataWriteResponse>>, ApiError> {
    let mut details: HashMap<String, Vec<String>> = HashMap::new();

    for (i, record) in records.iter().enumerate() {
        if let Err(errors) = record.validate() {
            for (field, field_errors) in errors.field_errors() {
                let messages: Vec<String> = field_errors
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| format!("Invalid value for {field}"))
                    })
                    .collect();
                details.insert(format!("[{i}].{field}"), messages);
            }
        }
    }

    if !details.is_empty() {
        return Err(ApiError::validation(details));
    }

    state.store.save(&records).map_err(|e| {
        tracing::error!("Failed to update metadata: {}", e);
        ApiError::internal("Failed to update metadata")
    })?;

    tracing::info!(count = records.len(), "Replaced metadata records");

    Ok(Json(ApiResponse::new(MetadataWriteResponse {
        count: records.len(),
    })))
}

/// POST /api/metadata/sync - Reconcile metadata with the gallery directory.
///
/// Drops records for deleted files and adds default records for new ones.
#[utoipa::path(
    post,
    path = "/metadata/sync",
    tag = "metadata",
    responses(
        (status = 200, description = "Reconciliation outcome", body = SyncReport)
    )
)]
pub async fn sync_metadata(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<SyncReport>>, ApiError> {
    let report = sync::reconcile(&state.store, &state.images_dir).map_err(|e| {
        tracing::error!("Reconciliation failed: {}", e);
        ApiError::internal("Failed to sync metadata")
    })?;

    Ok(Json(ApiResponse::new(report)))
}
