//! dropslot - ephemeral file drop for chat rooms
//!
//! A chat user asks for an upload link, uploads one file through it, and the
//! file is posted back to the room. Links are single use, stored files count
//! against an aggregate quota, and everything is reclaimed after a fixed
//! retention window.

pub mod config;
pub mod error;
pub mod logging;
pub mod notify;
pub mod slot;
pub mod web;

pub use config::Config;
pub use error::{DropError, Result};
pub use notify::{LinkBuilder, LogNotifier, Notice, Notifier, WebhookNotifier};
pub use slot::{
    format_file_size, Clock, Entry, EntryState, ManualClock, SlotLimits, SlotManager, SlotStats,
    SlotStorage, StoredFile, SystemClock, UploadPermit, UploadSlot,
};
pub use web::{AppState, WebServer};
