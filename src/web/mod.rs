//! Web layer.
//!
//! Browser pages for uploading and viewing files, plus a small JSON API the
//! chat bridge uses to issue upload slots.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod pages;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use router::create_router;
pub use server::WebServer;
