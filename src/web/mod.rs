//! Web API module for Picwall.
//!
//! REST endpoints for listing, metadata, uploads and deletion, plus the SSE
//! progress stream and static serving of the gallery directory.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use router::create_router;
pub use server::WebServer;
