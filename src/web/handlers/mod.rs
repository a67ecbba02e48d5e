//! API handlers for the Web API.

pub mod files;
pub mod metadata;
pub mod progress;
pub mod upload;

pub use files::{delete_file, list_files};
pub use metadata::{get_metadata, replace_metadata, sync_metadata};
pub use progress::progress_stream;
pub use upload::upload_images;

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::events::ProgressBroadcaster;
use crate::gallery::MetadataStore;
use crate::processing::ImageOptimizer;
use crate::Result;

/// Events buffered per lagging SSE client.
const EVENT_BUFFER: usize = 100;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Gallery directory holding the image files.
    pub images_dir: PathBuf,
    /// Flat-file metadata store (sidecar inside the gallery directory).
    pub store: MetadataStore,
    /// Upload optimizer.
    pub optimizer: ImageOptimizer,
    /// Thumbnail subdirectory name.
    pub thumbnail_dir: String,
    /// Thumbnail bounding box in pixels.
    pub thumbnail_size: u32,
    /// Progress event fan-out.
    pub broadcaster: ProgressBroadcaster,
    /// Maximum upload size in bytes.
    pub max_upload_size: u64,
}

impl AppState {
    /// Build the application state from configuration.
    ///
    /// Creates the gallery and thumbnail directories if they don't exist.
    pub fn from_config(config: &Config) -> Result<Self> {
        let images_dir = PathBuf::from(&config.gallery.images_dir);
        std::fs::create_dir_all(&images_dir)?;
        std::fs::create_dir_all(images_dir.join(&config.processing.thumbnail_dir))?;

        let store = MetadataStore::new(images_dir.join(&config.gallery.metadata_file));
        let optimizer = ImageOptimizer::new(
            config.processing.max_dimension,
            config.processing.jpeg_quality,
        );

        Ok(Self {
            images_dir,
            store,
            optimizer,
            thumbnail_dir: config.processing.thumbnail_dir.clone(),
            thumbnail_size: config.processing.thumbnail_size,
            broadcaster: ProgressBroadcaster::new(EVENT_BUFFER),
            max_upload_size: config.gallery.max_upload_size_mb * 1024 * 1024,
        })
    }

    /// Filesystem path of a gallery image.
    pub fn image_path(&self, filename: &str) -> PathBuf {
        self.images_dir.join(filename)
    }

    /// Filesystem path of a thumbnail (same filename, inside the thumbnail directory).
    pub fn thumbnail_path(&self, filename: &str) -> PathBuf {
        self.images_dir.join(&self.thumbnail_dir).join(filename)
    }

    /// Gallery-relative URL of a thumbnail.
    pub fn thumbnail_src(&self, filename: &str) -> String {
        format!("/{}/{}", self.thumbnail_dir, filename)
    }
}

/// Reject filenames that could escape the gallery directory.
pub(crate) fn sanitize_filename(filename: &str) -> std::result::Result<(), String> {
    let name = Path::new(filename);
    if filename.is_empty()
        || filename.contains('/')
        || filename.contains('\\')
        || filename.contains('\0')
        || name.file_name().map(|n| n != filename).unwrap_or(true)
    {
        return Err("invalid filename".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_config(dir: &TempDir) -> Config {
        let mut config = Config::default();
        config.gallery.images_dir = dir.path().join("public").to_string_lossy().into_owned();
        config
    }

    #[test]
    fn test_from_config_creates_directories() {
        let dir = TempDir::new().unwrap();
        let state = AppState::from_config(&test_config(&dir)).unwrap();

        assert!(state.images_dir.is_dir());
        assert!(state.images_dir.join("thumbs").is_dir());
        assert_eq!(state.max_upload_size, 10 * 1024 * 1024);
    }

    #[test]
    fn test_paths() {
        let dir = TempDir::new().unwrap();
        let state = AppState::from_config(&test_config(&dir)).unwrap();

        assert_eq!(state.image_path("a.jpg"), state.images_dir.join("a.jpg"));
        assert_eq!(
            state.thumbnail_path("a.jpg"),
            state.images_dir.join("thumbs").join("a.jpg")
        );
        assert_eq!(state.thumbnail_src("a.jpg"), "/thumbs/a.jpg");
    }

    #[test]
    fn test_sanitize_filename() {
        assert!(sanitize_filename("cat.jpg").is_ok());
        assert!(sanitize_filename("with spaces.png").is_ok());

        assert!(sanitize_filename("").is_err());
        assert!(sanitize_filename("a/b.jpg").is_err());
        assert!(sanitize_filename("a\\b.jpg").is_err());
        assert!(sanitize_filename("..").is_err());
        assert!(sanitize_filename("bad\0.jpg").is_err());
    }
}
