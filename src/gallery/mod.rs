//! Gallery domain: image records, directory scanning, the flat-file
//! metadata store, and the reconciliation pass that keeps the two in step.

pub mod record;
pub mod scan;
pub mod store;
pub mod sync;

pub use record::{validate_src, ImageRecord};
pub use scan::{is_image_file, list_image_files, IMAGE_EXTENSIONS};
pub use store::MetadataStore;
pub use sync::{reconcile, SyncReport};
