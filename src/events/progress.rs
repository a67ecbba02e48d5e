//! Progress event types for upload optimization.

use serde::{Deserialize, Serialize};

/// Progress event emitted by the upload pipeline.
///
/// One `FileOptimized` or `FileFailed` event is emitted per uploaded file,
/// bracketed by `UploadStarted` and `UploadCompleted`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressEvent {
    /// An upload batch started.
    UploadStarted {
        total: usize,
        timestamp: i64,
    },

    /// A file was optimized and written to the gallery.
    FileOptimized {
        file: String,
        index: usize,
        total: usize,
        width: u32,
        height: u32,
        bytes: u64,
        timestamp: i64,
    },

    /// A file could not be processed; the batch continues.
    FileFailed {
        file: String,
        index: usize,
        total: usize,
        reason: String,
        timestamp: i64,
    },

    /// An upload batch finished.
    UploadCompleted {
        total: usize,
        succeeded: usize,
        failed: usize,
        timestamp: i64,
    },
}

impl ProgressEvent {
    /// Current timestamp in milliseconds since UNIX epoch.
    fn now_ms() -> i64 {
        chrono::Utc::now().timestamp_millis()
    }

    /// Create an UploadStarted event.
    pub fn upload_started(total: usize) -> Self {
        Self::UploadStarted {
            total,
            timestamp: Self::now_ms(),
        }
    }

    /// Create a FileOptimized event.
    pub fn file_optimized(
        file: &str,
        index: usize,
        total: usize,
        width: u32,
        height: u32,
        bytes: u64,
    ) -> Self {
        Self::FileOptimized {
            file: file.to_string(),
            index,
            total,
            width,
            height,
            bytes,
            timestamp: Self::now_ms(),
        }
    }

    /// Create a FileFailed event.
    pub fn file_failed(file: &str, index: usize, total: usize, reason: &str) -> Self {
        Self::FileFailed {
            file: file.to_string(),
            index,
            total,
            reason: reason.to_string(),
            timestamp: Self::now_ms(),
        }
    }

    /// Create an UploadCompleted event.
    pub fn upload_completed(total: usize, succeeded: usize, failed: usize) -> Self {
        Self::UploadCompleted {
            total,
            succeeded,
            failed,
            timestamp: Self::now_ms(),
        }
    }

    /// SSE event name for this variant.
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::UploadStarted { .. } => "upload_started",
            Self::FileOptimized { .. } => "file_optimized",
            Self::FileFailed { .. } => "file_failed",
            Self::UploadCompleted { .. } => "upload_completed",
        }
    }
}
