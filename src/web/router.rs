//! Router configuration.

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{
    create_slot, index, not_found, request_page, slot_stats, storage_full, upload_file,
    upload_success, view_file, AppState,
};
use super::middleware::{upload_rate_limit, RateLimitState};

/// Room for multipart framing on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Request body limit for the upload route.
fn body_limit(max_file_bytes: u64) -> usize {
    usize::try_from(max_file_bytes)
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD_BYTES)
}

/// Create the main router.
pub fn create_router(app_state: Arc<AppState>, rate_limit: Arc<RateLimitState>) -> Router {
    let limit = body_limit(app_state.slots.max_file_bytes());

    // Endpoints that create slots or write to disk
    let limited_routes = Router::new()
        .route("/upload/:token/:username/:room", post(upload_file))
        .route("/api/slots", post(create_slot))
        .route_layer(middleware::from_fn(move |req, next| {
            let state = rate_limit.clone();
            upload_rate_limit(state, req, next)
        }))
        .layer(DefaultBodyLimit::max(limit));

    let page_routes = Router::new()
        .route("/", get(index))
        .route("/request/:token/:username/:room", get(request_page))
        .route("/view/:token/:filename", get(view_file))
        .route("/storage-full", get(storage_full))
        .route("/upload-success", get(upload_success))
        .route("/api/slots/stats", get(slot_stats));

    Router::new()
        .merge(limited_routes)
        .merge(page_routes)
        .fallback(not_found)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}
