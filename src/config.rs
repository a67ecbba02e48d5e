//! Configuration module for Picwall.

use serde::Deserialize;
use std::path::Path;

use crate::{PicwallError, Result};

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origins. Empty means permissive (development mode).
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Whether to serve the gallery directory as static files.
    #[serde(default = "default_serve_static")]
    pub serve_static: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_serve_static() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![],
            serve_static: default_serve_static(),
        }
    }
}

/// Gallery storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct GalleryConfig {
    /// Directory holding the image files.
    #[serde(default = "default_images_dir")]
    pub images_dir: String,
    /// Name of the metadata sidecar file, relative to the images directory.
    #[serde(default = "default_metadata_file")]
    pub metadata_file: String,
    /// Maximum upload size per file in megabytes.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size_mb: u64,
    /// Interval for the periodic reconciliation pass in seconds (0 disables it).
    #[serde(default = "default_sync_interval")]
    pub sync_interval_secs: u64,
}

fn default_images_dir() -> String {
    "public".to_string()
}

fn default_metadata_file() -> String {
    "images.json".to_string()
}

fn default_max_upload_size() -> u64 {
    10
}

fn default_sync_interval() -> u64 {
    300
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            images_dir: default_images_dir(),
            metadata_file: default_metadata_file(),
            max_upload_size_mb: default_max_upload_size(),
            sync_interval_secs: default_sync_interval(),
        }
    }
}

/// Image processing configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessingConfig {
    /// Maximum width or height of an optimized image in pixels.
    /// Larger uploads are scaled down; smaller ones are never upscaled.
    #[serde(default = "default_max_dimension")]
    pub max_dimension: u32,
    /// JPEG re-encoding quality (1-100).
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
    /// Thumbnail bounding box size in pixels (square).
    #[serde(default = "default_thumbnail_size")]
    pub thumbnail_size: u32,
    /// Thumbnail subdirectory name inside the images directory.
    #[serde(default = "default_thumbnail_dir")]
    pub thumbnail_dir: String,
}

fn default_max_dimension() -> u32 {
    1920
}

fn default_jpeg_quality() -> u8 {
    80
}

fn default_thumbnail_size() -> u32 {
    256
}

fn default_thumbnail_dir() -> String {
    "thumbs".to_string()
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            max_dimension: default_max_dimension(),
            jpeg_quality: default_jpeg_quality(),
            thumbnail_size: default_thumbnail_size(),
            thumbnail_dir: default_thumbnail_dir(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/picwall.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Gallery storage configuration.
    #[serde(default)]
    pub gallery: GalleryConfig,
    /// Image processing configuration.
    #[serde(default)]
    pub processing: ProcessingConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(PicwallError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| PicwallError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `PICWALL_IMAGES_DIR`: Override the gallery images directory
    pub fn apply_env_overrides(&mut self) {
        if let Ok(dir) = std::env::var("PICWALL_IMAGES_DIR") {
            if !dir.is_empty() {
                self.gallery.images_dir = dir;
            }
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.processing.jpeg_quality == 0 || self.processing.jpeg_quality > 100 {
            return Err(PicwallError::Config(
                "jpeg_quality must be between 1 and 100".to_string(),
            ));
        }
        if self.processing.max_dimension == 0 {
            return Err(PicwallError::Config(
                "max_dimension must be greater than 0".to_string(),
            ));
        }
        if self.processing.thumbnail_size == 0 {
            return Err(PicwallError::Config(
                "thumbnail_size must be greater than 0".to_string(),
            ));
        }
        if self.gallery.metadata_file.contains('/') || self.gallery.metadata_file.contains('\\') {
            return Err(PicwallError::Config(
                "metadata_file must be a bare file name inside the images directory".to_string(),
            ));
        }
        Ok(())
    }
}
