//! Router configuration for the Web API.

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use std::path::Path;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{self, AppState};
use super::middleware::create_cors_layer;

/// OpenAPI documentation for the gallery API.
#[derive(OpenApi)]
#[openapi(
    info(title = "Picwall API", description = "Static image gallery backend"),
    paths(
        handlers::files::list_files,
        handlers::files::delete_file,
        handlers::metadata::get_metadata,
        handlers::metadata::replace_metadata,
        handlers::metadata::sync_metadata,
        handlers::upload::upload_images,
        handlers::progress::progress_stream,
    ),
    components(schemas(
        crate::gallery::ImageRecord,
        crate::gallery::SyncReport,
        super::dto::MetadataWriteResponse,
        super::dto::UploadResponse,
        super::dto::UploadedImage,
        super::dto::RejectedImage,
    )),
    tags(
        (name = "files", description = "Gallery file listing and deletion"),
        (name = "metadata", description = "Metadata sidecar operations"),
        (name = "upload", description = "Upload and optimization pipeline"),
        (name = "progress", description = "Optimization progress stream"),
    )
)]
struct ApiDoc;

/// Create the main API router.
pub fn create_router(app_state: Arc<AppState>, cors_origins: &[String]) -> Router {
    // Request-body headroom for multi-file batches; the per-file limit is
    // enforced in the upload handler.
    let body_limit = (app_state.max_upload_size as usize) * 8;

    let api_routes = Router::new()
        .route("/files", get(handlers::list_files))
        .route("/files/:filename", delete(handlers::delete_file))
        .route(
            "/metadata",
            get(handlers::get_metadata)
                .put(handlers::replace_metadata)
                .post(handlers::replace_metadata),
        )
        .route("/metadata/sync", post(handlers::sync_metadata))
        .route(
            "/upload",
            post(handlers::upload_images).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/progress", get(handlers::progress_stream));

    Router::new()
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins)),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}

/// Create a router serving the gallery directory as static files.
///
/// Returns `None` when the directory does not exist.
pub fn create_static_router(static_path: &Path) -> Option<Router> {
    if !static_path.is_dir() {
        tracing::warn!(
            "Static path {} does not exist, static serving disabled",
            static_path.display()
        );
        return None;
    }

    Some(Router::new().fallback_service(ServeDir::new(static_path)))
}

/// Create the Swagger UI router.
pub fn create_swagger_router() -> Router {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}
