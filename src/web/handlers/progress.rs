//! Progress stream handler.

use axum::{
    extract::State,
    response::sse::{Event, Sse},
};
use futures::stream::Stream;
use std::convert::Infallible;
use std::sync::Arc;
use utoipa;

use crate::web::handlers::AppState;

/// GET /api/progress - SSE stream of upload progress events.
///
/// Long-lived connection; events are named after the progress variant
/// (`upload_started`, `file_optimized`, `file_failed`, `upload_completed`)
/// with a JSON payload, plus periodic keep-alive comments.
#[utoipa::path(
    get,
    path = "/progress",
    tag = "progress",
    responses(
        (status = 200, description = "Server-sent event stream of upload progress",
         content_type = "text/event-stream")
    )
)]
pub async fn progress_stream(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    state.broadcaster.handle_sse_connection()
}
