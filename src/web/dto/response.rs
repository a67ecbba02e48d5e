//! Response DTOs for the Web API.

use serde::Serialize;
use utoipa::ToSchema;

/// Generic API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a new API response.
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Result of a wholesale metadata write.
#[derive(Debug, Serialize, ToSchema)]
pub struct MetadataWriteResponse {
    /// Number of records written.
    pub count: usize,
}

/// One successfully optimized upload.
#[derive(Debug, Serialize, ToSchema)]
pub struct UploadedImage {
    /// Gallery path of the stored image (`/` + filename).
    pub src: String,
    /// Gallery path of the generated thumbnail.
    pub thumbnail: String,
    /// Final pixel width after optimization.
    pub width: u32,
    /// Final pixel height after optimization.
    pub height: u32,
    /// Encoded file size in bytes.
    pub bytes: u64,
}

/// One upload that could not be processed.
#[derive(Debug, Serialize, ToSchema)]
pub struct RejectedImage {
    /// Filename as sent by the client.
    pub filename: String,
    /// Why the file was rejected.
    pub reason: String,
}

/// Result of an upload batch.
#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    /// Files optimized and stored.
    pub uploaded: Vec<UploadedImage>,
    /// Files skipped with their reasons.
    pub failed: Vec<RejectedImage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_response_wraps_data() {
        let response = ApiResponse::new(vec!["/a.jpg".to_string()]);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["data"][0], "/a.jpg");
    }

    #[test]
    fn test_upload_response_shape() {
        let response = UploadResponse {
            uploaded: vec![UploadedImage {
                src: "/a.jpg".to_string(),
                thumbnail: "/thumbs/a.jpg".to_string(),
                width: 640,
                height: 480,
                bytes: 1234,
            }],
            failed: vec![RejectedImage {
                filename: "b.txt".to_string(),
                reason: "unsupported file extension".to_string(),
            }],
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["uploaded"][0]["src"], "/a.jpg");
        assert_eq!(json["failed"][0]["filename"], "b.txt");
    }
}
