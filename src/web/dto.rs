//! Request and response bodies for the JSON API.

use serde::{Deserialize, Serialize};

use crate::slot::{SlotStats, UploadSlot};

/// Generic API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a new API response.
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Body of `POST /api/slots`, sent by the chat bridge when a user runs the
/// upload command.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSlotRequest {
    /// Room the command was issued in, with or without the leading `#`.
    pub room: String,
    /// User who asked for the link.
    pub requester: String,
}

/// A newly issued upload slot.
#[derive(Debug, Serialize)]
pub struct SlotResponse {
    /// Token identifying the slot.
    pub token: String,
    /// Link the requester opens to upload a file.
    pub upload_url: String,
    /// RFC 3339 time from which the slot may be reclaimed.
    pub expires_at: String,
}

impl SlotResponse {
    /// Describe `slot`, reachable at `upload_url`.
    pub fn new(slot: &UploadSlot, upload_url: String) -> Self {
        Self {
            token: slot.token.clone(),
            upload_url,
            expires_at: slot.expires_at.to_rfc3339(),
        }
    }
}

/// Current slot counts and storage usage.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    /// Entry counts per state and bytes in use.
    #[serde(flatten)]
    pub slots: SlotStats,
    /// Aggregate storage quota.
    pub max_storage_bytes: u64,
    /// Per-upload size limit.
    pub max_file_bytes: u64,
}
