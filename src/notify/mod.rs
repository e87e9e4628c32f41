//! Chat notifications.
//!
//! The service does not speak the chat protocol itself. Messages for the
//! chat are handed to a `Notifier`, which either logs them or forwards them
//! to a bridge over HTTP.

mod message;
mod webhook;

use futures::future::BoxFuture;
use serde::Serialize;

pub use message::{
    chat_room, display_file_name, markdown_image, strip_room_prefix, upload_link_text,
    LinkBuilder, DISPLAY_NAME_CHARS,
};
pub use webhook::WebhookNotifier;

use crate::Result;

/// A message to deliver to the chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    /// Private message to one user, sent from within `room`.
    Direct {
        /// Room the conversation happens in.
        room: String,
        /// Recipient.
        to: String,
        /// Message body.
        text: String,
    },
    /// Public message posted to `room` on behalf of `from`.
    Room {
        /// Target room, including the leading `#`.
        room: String,
        /// Author shown in the chat.
        from: String,
        /// Message body.
        text: String,
    },
}

impl Notice {
    /// DM to `requester` with the link to upload into a new slot.
    pub fn upload_link(room: &str, requester: &str, upload_url: &str) -> Self {
        Notice::Direct {
            room: room.to_string(),
            to: requester.to_string(),
            text: upload_link_text(upload_url),
        }
    }

    /// Room post showing a freshly uploaded file.
    pub fn uploaded(room: &str, uploader: &str, view_url: &str) -> Self {
        Notice::Room {
            room: chat_room(room),
            from: uploader.to_string(),
            text: markdown_image(view_url),
        }
    }
}

/// Delivers notices to the chat.
pub trait Notifier: Send + Sync {
    /// Deliver one notice.
    fn notify(&self, notice: Notice) -> BoxFuture<'_, Result<()>>;
}

/// Notifier that only writes notices to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: Notice) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            match &notice {
                Notice::Direct { room, to, text } => {
                    tracing::info!(room = %room, to = %to, text = %text, "Chat DM");
                }
                Notice::Room { room, from, text } => {
                    tracing::info!(room = %room, from = %from, text = %text, "Chat post");
                }
            }
            Ok(())
        })
    }
}
