//! Upload optimization: bounded resize and re-encode.

use std::fs;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::{imageops::FilterType, DynamicImage};

use crate::Result;

/// Decode an uploaded image from its raw bytes, sniffing the format.
pub fn decode(data: &[u8]) -> Result<DynamicImage> {
    Ok(image::load_from_memory(data)?)
}

/// Result of writing an optimized image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptimizedImage {
    /// Final pixel width.
    pub width: u32,
    /// Final pixel height.
    pub height: u32,
    /// Size of the encoded file in bytes.
    pub bytes: u64,
}

/// Optimizer for uploaded images.
///
/// Scales images down so neither side exceeds `max_dimension` (aspect ratio
/// preserved, never upscales) and re-encodes them. JPEG output uses the
/// configured quality; other formats use their default encoder.
#[derive(Debug, Clone, Copy)]
pub struct ImageOptimizer {
    max_dimension: u32,
    jpeg_quality: u8,
}

impl ImageOptimizer {
    /// Create a new optimizer.
    pub fn new(max_dimension: u32, jpeg_quality: u8) -> Self {
        Self {
            max_dimension,
            jpeg_quality,
        }
    }

    /// Optimize a decoded image and write it to `dest`.
    ///
    /// The output format follows the destination extension.
    pub fn optimize_to(&self, img: &DynamicImage, dest: &Path) -> Result<OptimizedImage> {
        let resized;
        let out: &DynamicImage = if img.width().max(img.height()) > self.max_dimension {
            resized = img.resize(self.max_dimension, self.max_dimension, FilterType::Lanczos3);
            &resized
        } else {
            img
        };

        let ext = dest
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("jpg") | Some("jpeg") => {
                let mut buf = Vec::new();
                let mut encoder = JpegEncoder::new_with_quality(&mut buf, self.jpeg_quality);
                // JPEG carries no alpha channel
                encoder.encode_image(&out.to_rgb8())?;
                fs::write(dest, &buf)?;
            }
            _ => out.save(dest)?,
        }

        let bytes = fs::metadata(dest)?.len();

        Ok(OptimizedImage {
            width: out.width(),
            height: out.height(),
            bytes,
        })
    }
}
