//! Test helpers for the HTTP tests.
//!
//! Provides a `TestApp` wiring a slot manager on a temporary directory, a
//! manual clock and a notifier that records what it was asked to send.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum_test::multipart::{MultipartForm, Part};
use axum_test::{TestResponse, TestServer};
use chrono::{TimeZone, Utc};
use futures::future::BoxFuture;
use tempfile::TempDir;

use dropslot::web::create_router;
use dropslot::web::middleware::RateLimitState;
use dropslot::{
    AppState, DropError, LinkBuilder, ManualClock, Notice, Notifier, SlotLimits, SlotManager,
    SlotStorage,
};

/// Bridge token used by the test app.
pub const BOT_TOKEN: &str = "test-bot-token";

/// Public URL used by the test app.
pub const PUBLIC_URL: &str = "http://files.example.com";

/// Notifier that keeps every notice it receives.
#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
    fail: bool,
}

impl RecordingNotifier {
    /// A notifier whose deliveries always fail, after recording the notice.
    pub fn failing() -> Self {
        Self {
            notices: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// Notices received so far.
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) -> BoxFuture<'_, dropslot::Result<()>> {
        Box::pin(async move {
            self.notices.lock().unwrap().push(notice);
            if self.fail {
                Err(DropError::Notify("bridge down".to_string()))
            } else {
                Ok(())
            }
        })
    }
}

/// Limits used unless a test asks for others.
pub fn default_limits() -> SlotLimits {
    SlotLimits {
        max_storage_bytes: 1024,
        max_file_bytes: 512,
        retention: Duration::from_secs(600),
    }
}

/// A running app plus handles to its collaborators.
pub struct TestApp {
    pub server: TestServer,
    pub slots: Arc<SlotManager>,
    pub clock: Arc<ManualClock>,
    pub notifier: Arc<RecordingNotifier>,
    /// Keeps the storage directory alive for the test's duration.
    pub temp_dir: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_limits(default_limits())
    }

    pub fn with_limits(limits: SlotLimits) -> Self {
        Self::build(limits, RecordingNotifier::default(), 1000)
    }

    pub fn build(limits: SlotLimits, notifier: RecordingNotifier, rate_limit: u32) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let storage = SlotStorage::new(temp_dir.path().join("storage")).unwrap();
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
        ));
        let slots = Arc::new(SlotManager::new(storage, limits, clock.clone()));
        let notifier = Arc::new(notifier);

        let app_state = Arc::new(AppState::new(
            slots.clone(),
            LinkBuilder::new(PUBLIC_URL).unwrap(),
            notifier.clone(),
            BOT_TOKEN,
        ));
        let router = create_router(app_state, Arc::new(RateLimitState::new(rate_limit)));
        let server = TestServer::new(router).unwrap();

        Self {
            server,
            slots,
            clock,
            notifier,
            temp_dir,
        }
    }

    /// Issue a slot directly through the manager.
    pub fn create_slot(&self) -> String {
        self.slots.create_upload_slot("main", "alice").unwrap().token
    }

    /// Upload `content` as `file_name` into `token` through the HTTP form.
    pub async fn upload(&self, token: &str, file_name: &str, content: &[u8]) -> TestResponse {
        let part = Part::bytes(content.to_vec())
            .file_name(file_name)
            .mime_type("application/octet-stream");
        let form = MultipartForm::new().add_part("filename", part);

        self.server
            .post(&format!("/upload/{token}/alice/main"))
            .multipart(form)
            .await
    }
}

/// Location header of a redirect response.
pub fn location(response: &TestResponse) -> String {
    response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}
