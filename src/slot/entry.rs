//! Registry entry model.

use chrono::{DateTime, Utc};

/// Lifecycle state of an upload slot.
///
/// A token that is not in the registry at all has no state; callers see that
/// as `None` from lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    /// Token issued, no file yet. The only state that accepts an upload.
    Pending,
    /// An upload has been admitted and its bytes are being written.
    Uploading,
    /// A file is stored and can be retrieved. No further uploads.
    Occupied,
}

impl EntryState {
    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryState::Pending => "pending",
            EntryState::Uploading => "uploading",
            EntryState::Occupied => "occupied",
        }
    }
}

impl std::fmt::Display for EntryState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One tracked upload slot, keyed by its token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Unique token; also the name of the slot's storage directory.
    pub token: String,
    /// Distinguishes this entry from earlier ones that used the same token.
    pub generation: u64,
    /// Current lifecycle state.
    pub state: EntryState,
    /// Original name of the uploaded file. Empty while pending.
    pub file_name: String,
    /// Size of the stored (or reserved) file in bytes. Zero while pending.
    pub byte_size: u64,
    /// Creation time; retention age is measured from here.
    pub created_at: DateTime<Utc>,
    /// Chat room the slot was requested from.
    pub room: String,
    /// Chat user who requested the slot.
    pub requester: String,
}

impl Entry {
    /// Create a new pending entry.
    pub fn pending(
        token: impl Into<String>,
        room: impl Into<String>,
        requester: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            token: token.into(),
            generation: 0,
            state: EntryState::Pending,
            file_name: String::new(),
            byte_size: 0,
            created_at,
            room: room.into(),
            requester: requester.into(),
        }
    }

    /// Whether the entry still accepts an upload.
    pub fn is_usable(&self) -> bool {
        self.state == EntryState::Pending
    }

    /// Whether a file is stored and can be served.
    pub fn is_occupied(&self) -> bool {
        self.state == EntryState::Occupied
    }

    /// Age of the entry at `now`. Zero if `now` is before creation.
    pub fn age(&self, now: DateTime<Utc>) -> chrono::Duration {
        (now - self.created_at).max(chrono::Duration::zero())
    }
}
