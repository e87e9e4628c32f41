//! JSON endpoints used by the chat bridge.

use axum::{extract::State, Json};
use std::sync::Arc;

use super::AppState;
use crate::notify::Notice;
use crate::web::dto::{ApiResponse, CreateSlotRequest, SlotResponse, StatsResponse};
use crate::web::error::ApiError;
use crate::web::middleware::BotAuth;

/// POST /api/slots - Issue an upload slot and DM the link to the requester.
///
/// A failed DM is logged but does not fail the request; the bridge gets the
/// link back in the response either way.
pub async fn create_slot(
    State(state): State<Arc<AppState>>,
    _auth: BotAuth,
    Json(req): Json<CreateSlotRequest>,
) -> Result<Json<ApiResponse<SlotResponse>>, ApiError> {
    let room = req.room.trim();
    let requester = req.requester.trim();
    if room.is_empty() || requester.is_empty() {
        return Err(ApiError::bad_request("room and requester are required"));
    }

    let slot = state.slots.create_upload_slot(room, requester)?;
    let upload_url = state.links.upload_url(&slot.token, requester, room);

    if let Err(e) = state
        .notifier
        .notify(Notice::upload_link(room, requester, &upload_url))
        .await
    {
        tracing::warn!(
            requester = %requester,
            error = %e,
            "Failed to send upload link"
        );
    }

    Ok(Json(ApiResponse::new(SlotResponse::new(&slot, upload_url))))
}

/// GET /api/slots/stats - Slot counts and storage usage.
pub async fn slot_stats(
    State(state): State<Arc<AppState>>,
    _auth: BotAuth,
) -> Json<ApiResponse<StatsResponse>> {
    Json(ApiResponse::new(StatsResponse {
        slots: state.slots.stats(),
        max_storage_bytes: state.slots.max_storage_bytes(),
        max_file_bytes: state.slots.max_file_bytes(),
    }))
}
