//! Per-image metadata records.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Metadata record for a single gallery image.
///
/// `src` is the unique key: `"/" + filename` of an image in the gallery
/// directory. All other fields are free-form and default to empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct ImageRecord {
    /// Image path relative to the gallery root, always `/`-prefixed.
    #[validate(custom(function = validate_src))]
    pub src: String,
    /// Alt text / caption.
    #[serde(default)]
    pub alt: String,
    /// Tag list (serialized as `type`).
    #[serde(default, rename = "type")]
    pub tags: Vec<String>,
    /// Longer description.
    #[serde(default)]
    pub description: String,
    /// Where the picture was taken.
    #[serde(default)]
    pub location: String,
}

impl ImageRecord {
    /// Create a default record for a gallery file, with all metadata fields empty.
    pub fn for_file(filename: &str) -> Self {
        Self {
            src: format!("/{filename}"),
            alt: String::new(),
            tags: Vec::new(),
            description: String::new(),
            location: String::new(),
        }
    }

    /// The bare filename this record refers to (the `src` without its leading slash).
    pub fn filename(&self) -> &str {
        self.src.strip_prefix('/').unwrap_or(&self.src)
    }
}

/// Validate a record `src`: `/`-prefixed bare filename, no traversal, no
/// control characters.
pub fn validate_src(src: &str) -> Result<(), ValidationError> {
    let Some(name) = src.strip_prefix('/') else {
        return Err(ValidationError::new("src_prefix")
            .with_message("src must start with '/'".into()));
    };
    if name.is_empty() {
        return Err(ValidationError::new("src_empty")
            .with_message("src must name a file".into()));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(ValidationError::new("src_nested")
            .with_message("src must not contain path separators".into()));
    }
    if name == "." || name == ".." {
        return Err(ValidationError::new("src_traversal")
            .with_message("src must not be a directory reference".into()));
    }
    if name.chars().any(|c| c.is_control()) {
        return Err(ValidationError::new("src_control_chars")
            .with_message("src must not contain control characters".into()));
    }
    Ok(())
}
