//! Reconciliation of the metadata sidecar against the gallery directory.

use std::collections::HashSet;
use std::path::Path;

use serde::Serialize;
use utoipa::ToSchema;

use crate::gallery::{scan, ImageRecord, MetadataStore};
use crate::Result;

/// Outcome of a reconciliation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct SyncReport {
    /// Default records created for files that had none.
    pub added: usize,
    /// Records dropped because their file is gone (or was a duplicate).
    pub removed: usize,
    /// Record count after the pass.
    pub total: usize,
}

impl SyncReport {
    /// Whether the pass changed the sidecar file.
    pub fn changed(&self) -> bool {
        self.added > 0 || self.removed > 0
    }
}

/// Reconcile the metadata sidecar with the gallery directory.
///
/// Drops records whose file no longer exists, drops duplicate records for the
/// same file (first occurrence wins), and appends a default record for every
/// image file that has none. The sidecar is only rewritten when something
/// changed. The resulting invariant is advisory: a concurrent writer can
/// still break it between the scan and the write.
pub fn reconcile(store: &MetadataStore, images_dir: &Path) -> Result<SyncReport> {
    let files = scan::list_image_files(images_dir)?;
    let records = store.load()?;
    let before = records.len();

    let file_set: HashSet<&str> = files.iter().map(String::as_str).collect();

    // Keep the first record per existing file, preserving stored order.
    let mut seen: HashSet<String> = HashSet::new();
    let mut kept: Vec<ImageRecord> = records
        .into_iter()
        .filter(|r| file_set.contains(r.filename()) && seen.insert(r.filename().to_string()))
        .collect();

    let removed = before - kept.len();

    // Append defaults for untracked files, in sorted filename order.
    let mut added = 0;
    for file in &files {
        if !seen.contains(file.as_str()) {
            kept.push(ImageRecord::for_file(file));
            added += 1;
        }
    }

    let report = SyncReport {
        added,
        removed,
        total: kept.len(),
    };

    if report.changed() {
        store.save(&kept)?;
        tracing::info!(
            added = report.added,
            removed = report.removed,
            total = report.total,
            "Reconciled metadata with gallery directory"
        );
    }

    Ok(report)
}
