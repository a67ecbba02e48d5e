//! Gallery directory scanning.

use std::fs;
use std::path::Path;

use crate::Result;

/// File extensions recognized as gallery images (case-insensitive).
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// Check whether a filename carries a recognized image extension.
pub fn is_image_file(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let e = e.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&e.as_str())
        })
        .unwrap_or(false)
}

/// List the image files in a gallery directory.
///
/// Returns bare filenames, sorted. Subdirectories (such as the thumbnail
/// directory) and non-image files (such as the metadata sidecar) are skipped.
pub fn list_image_files(dir: &Path) -> Result<Vec<String>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if let Ok(name) = entry.file_name().into_string() {
            if is_image_file(&name) {
                files.push(name);
            }
        }
    }

    files.sort();
    Ok(files)
}
