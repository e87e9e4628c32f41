//! Upload slot lifecycle management.
//!
//! This module provides the in-memory side of the service:
//! - Token generation for new slots
//! - The token to entry registry and its lifecycle states
//! - Aggregate storage quota checks
//! - Retention sweeping of expired slots
//! - Directory-per-token storage on disk

mod clock;
mod entry;
mod manager;
mod quota;
mod registry;
mod storage;
mod sweeper;
mod token;

pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::{Entry, EntryState};
pub use manager::{SlotLimits, SlotManager, StoredFile, UploadPermit, UploadSlot};
pub use quota::StorageQuota;
pub use registry::{SlotRegistry, SlotStats};
pub use storage::{validate_file_name, SlotStorage};
pub use sweeper::{RetentionSweeper, SweepReport};
pub use token::{TokenGenerator, MAX_TOKEN_BYTES, MIN_TOKEN_BYTES};

/// Format a byte count with the largest binary unit it fills.
///
/// Integer division, so 1.5 MiB prints as "1 MiB".
pub fn format_file_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = KIB * 1024;
    const GIB: u64 = MIB * 1024;

    if bytes >= GIB {
        format!("{} GiB", bytes / GIB)
    } else if bytes >= MIB {
        format!("{} MiB", bytes / MIB)
    } else if bytes >= KIB {
        format!("{} KiB", bytes / KIB)
    } else {
        format!("{bytes} B")
    }
}
