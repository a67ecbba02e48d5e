//! Thumbnail generation for gallery images.

use std::fs;
use std::path::Path;

use image::{imageops::FilterType, DynamicImage};

use crate::Result;

/// Generate a thumbnail bounded by `size` x `size` pixels and save it to `dest`.
///
/// The output format follows the destination extension; thumbnails keep the
/// filename and format of their source image, so `dest` should be the source
/// filename inside the thumbnail directory.
pub fn generate(img: &DynamicImage, dest: &Path, size: u32) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }

    // resize would upscale a smaller source, so guard on the larger side
    if img.width().max(img.height()) > size {
        let thumb = img.resize(size, size, FilterType::Lanczos3);
        thumb.save(dest)?;
    } else {
        img.save(dest)?;
    }

    Ok(())
}
