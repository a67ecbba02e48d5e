//! Error types for Picwall.

use thiserror::Error;

/// Common error type for Picwall.
#[derive(Error, Debug)]
pub enum PicwallError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Metadata file could not be read or written as JSON.
    #[error("metadata error: {0}")]
    Metadata(String),

    /// Image decoding or encoding error.
    ///
    /// Wraps errors from the image crate as strings so callers are not
    /// coupled to codec internals.
    #[error("image error: {0}")]
    Image(String),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

// Conversion from serde_json errors
impl From<serde_json::Error> for PicwallError {
    fn from(e: serde_json::Error) -> Self {
        PicwallError::Metadata(e.to_string())
    }
}

// Conversion from image crate errors
impl From<image::ImageError> for PicwallError {
    fn from(e: image::ImageError) -> Self {
        PicwallError::Image(e.to_string())
    }
}

/// Result type alias for Picwall operations.
pub type Result<T> = std::result::Result<T, PicwallError>;
