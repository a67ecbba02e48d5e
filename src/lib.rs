//! PICWALL - Static Image Gallery Backend
//!
//! A small backend for a static image gallery: lists image files in a
//! directory, persists per-image metadata in a JSON sidecar file, accepts
//! uploads, optimizes and thumbnails them, and streams optimization progress
//! to clients over SSE.

pub mod config;
pub mod error;
pub mod events;
pub mod gallery;
pub mod logging;
pub mod processing;
pub mod web;

pub use config::Config;
pub use error::{PicwallError, Result};
pub use events::{ProgressBroadcaster, ProgressEvent};
pub use gallery::{ImageRecord, MetadataStore, SyncReport};
pub use processing::{ImageOptimizer, OptimizedImage};
pub use web::WebServer;
