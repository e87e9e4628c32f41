//! HTTP handlers.

pub mod slot;
pub mod upload;

pub use slot::{create_slot, slot_stats};
pub use upload::{
    index, not_found, request_page, storage_full, upload_file, upload_success, view_file,
};

use std::sync::Arc;

use crate::config::Config;
use crate::notify::{LinkBuilder, LogNotifier, Notifier, WebhookNotifier};
use crate::slot::SlotManager;
use crate::Result;

/// Shared state for all handlers.
pub struct AppState {
    /// Slot lifecycle manager.
    pub slots: Arc<SlotManager>,
    /// Builds public upload and view links.
    pub links: LinkBuilder,
    /// Outbound chat messages.
    pub notifier: Arc<dyn Notifier>,
    /// Shared secret expected from the chat bridge.
    pub bot_token: String,
}

impl AppState {
    /// Create a new application state.
    pub fn new(
        slots: Arc<SlotManager>,
        links: LinkBuilder,
        notifier: Arc<dyn Notifier>,
        bot_token: impl Into<String>,
    ) -> Self {
        Self {
            slots,
            links,
            notifier,
            bot_token: bot_token.into(),
        }
    }

    /// Build the state from configuration.
    ///
    /// Notices go to the log unless a webhook URL is configured.
    pub fn from_config(config: &Config, slots: Arc<SlotManager>) -> Result<Self> {
        let links = LinkBuilder::new(&config.web.public_url)?;

        let notifier: Arc<dyn Notifier> = if config.chat.webhook_url.is_empty() {
            tracing::info!("No chat webhook configured, chat notices will only be logged");
            Arc::new(LogNotifier)
        } else {
            tracing::info!(url = %config.chat.webhook_url, "Chat notices go to webhook");
            Arc::new(WebhookNotifier::new(
                config.chat.webhook_url.clone(),
                config.chat.token.clone(),
            )?)
        };

        Ok(Self::new(slots, links, notifier, config.chat.token.clone()))
    }
}
