//! Data transfer objects for the Web API.

pub mod response;

pub use response::{
    ApiResponse, MetadataWriteResponse, RejectedImage, UploadResponse, UploadedImage,
};
