//! Middleware for the web server.

pub mod auth;
pub mod rate_limit;

pub use auth::BotAuth;
pub use rate_limit::{get_client_ip, upload_rate_limit, RateLimitState};
