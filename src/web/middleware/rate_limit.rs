//! Rate limiting middleware.

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use std::{
    collections::HashMap,
    net::SocketAddr,
    num::NonZeroU32,
    sync::{Arc, Mutex, PoisonError, RwLock},
    time::{Duration, Instant},
};

use crate::web::error::ApiError;

/// Per-IP rate limiter using Governor.
pub type IpRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// How often idle limiters are dropped.
const CLEANUP_INTERVAL_SECS: u64 = 300;

/// A per-minute quota is fully replenished after this long without requests,
/// so dropping the limiter then loses nothing.
const REFILL_WINDOW: Duration = Duration::from_secs(60);

#[derive(Debug)]
struct TrackedLimiter {
    limiter: IpRateLimiter,
    last_seen: Mutex<Instant>,
}

/// Per-IP limits for the endpoints that create slots or store files.
#[derive(Debug)]
pub struct RateLimitState {
    limiters: RwLock<HashMap<String, Arc<TrackedLimiter>>>,
    /// Requests per minute per IP.
    requests_per_minute: u32,
    /// Take the client address from `X-Forwarded-For`/`X-Real-IP`.
    trust_proxy_headers: bool,
}

impl RateLimitState {
    /// Create a new rate limit state keyed by the peer address.
    pub fn new(requests_per_minute: u32) -> Self {
        Self {
            limiters: RwLock::new(HashMap::new()),
            requests_per_minute,
            trust_proxy_headers: false,
        }
    }

    /// Key clients by the proxy headers instead of the peer address.
    ///
    /// Only enable this behind a reverse proxy that overwrites those headers;
    /// otherwise clients pick their own key.
    pub fn trusting_proxy_headers(mut self, trust: bool) -> Self {
        self.trust_proxy_headers = trust;
        self
    }

    fn get_or_create_limiter(&self, ip: &str) -> Arc<TrackedLimiter> {
        {
            let read_guard = self.limiters.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(limiter) = read_guard.get(ip) {
                return limiter.clone();
            }
        }

        let mut write_guard = self.limiters.write().unwrap_or_else(PoisonError::into_inner);

        // Another request may have inserted it meanwhile.
        if let Some(limiter) = write_guard.get(ip) {
            return limiter.clone();
        }

        let quota = Quota::per_minute(
            NonZeroU32::new(self.requests_per_minute).unwrap_or(NonZeroU32::MIN),
        );
        let limiter = Arc::new(TrackedLimiter {
            limiter: RateLimiter::direct(quota),
            last_seen: Mutex::new(Instant::now()),
        });
        write_guard.insert(ip.to_string(), limiter.clone());
        limiter
    }

    /// Check if a request from `ip` is allowed.
    pub fn check(&self, ip: &str) -> bool {
        let tracked = self.get_or_create_limiter(ip);
        *tracked
            .last_seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Instant::now();
        tracked.limiter.check().is_ok()
    }

    /// Number of tracked IPs.
    pub fn tracked(&self) -> usize {
        self.limiters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Drop limiters that have been idle long enough to be full again.
    pub fn cleanup(&self) {
        self.cleanup_at(Instant::now());
    }

    fn cleanup_at(&self, now: Instant) {
        self.limiters
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|_, tracked| {
                let last_seen = *tracked
                    .last_seen
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner);
                Arc::strong_count(tracked) > 1
                    || now.saturating_duration_since(last_seen) < REFILL_WINDOW
            });
    }

    /// Start a background task to periodically clean up old entries.
    pub fn start_cleanup_task(self: Arc<Self>) {
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(Duration::from_secs(CLEANUP_INTERVAL_SECS)).await;
                self.cleanup();
            }
        });
    }
}

/// Extract client IP from request.
///
/// Proxy headers are only consulted when `trust_proxy_headers` is set.
pub fn get_client_ip(req: &Request<Body>, trust_proxy_headers: bool) -> String {
    if trust_proxy_headers {
        // The proxy appends, so the first hop is the client.
        if let Some(forwarded) = req
            .headers()
            .get("X-Forwarded-For")
            .and_then(|v| v.to_str().ok())
        {
            if let Some(ip) = forwarded.split(',').next() {
                return ip.trim().to_string();
            }
        }

        if let Some(real_ip) = req
            .headers()
            .get("X-Real-IP")
            .and_then(|v| v.to_str().ok())
        {
            return real_ip.to_string();
        }
    }

    if let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip().to_string();
    }

    "unknown".to_string()
}

/// Rate limiting middleware for slot creation and uploads.
pub async fn upload_rate_limit(
    state: Arc<RateLimitState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let ip = get_client_ip(&req, state.trust_proxy_headers);

    if !state.check(&ip) {
        tracing::warn!(ip = %ip, path = %req.uri().path(), "Upload rate limit exceeded");
        return ApiError::too_many_requests("Too many requests. Please try again later.")
            .into_response();
    }

    next.run(req).await
}
