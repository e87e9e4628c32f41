//! Upload token generation.
//!
//! Tokens are hex-encoded random bytes. Generation starts with
//! `MIN_TOKEN_BYTES` bytes and only grows the length when a candidate
//! collides with a live token, so links stay short while the registry is
//! small.

use chrono::{DateTime, Utc};
use rand::RngCore;

/// Length in bytes of the first candidate (4 hex characters).
pub const MIN_TOKEN_BYTES: usize = 2;

/// Length in bytes of the last random candidate (32 hex characters).
pub const MAX_TOKEN_BYTES: usize = 16;

/// Generates tokens that are not currently in use.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenGenerator;

impl TokenGenerator {
    /// Create a new generator.
    pub fn new() -> Self {
        Self
    }

    /// Generate a token for which `is_taken` returns false.
    ///
    /// One candidate is drawn per length from `MIN_TOKEN_BYTES` to
    /// `MAX_TOKEN_BYTES`. If every candidate collides, the nanosecond
    /// timestamp `now` is returned instead. That value is predictable and is
    /// only unique as long as no two fallbacks share a nanosecond.
    pub fn generate(&self, is_taken: impl Fn(&str) -> bool, now: DateTime<Utc>) -> String {
        let mut rng = rand::rng();

        for length in MIN_TOKEN_BYTES..=MAX_TOKEN_BYTES {
            let mut bytes = vec![0u8; length];
            rng.fill_bytes(&mut bytes);

            let candidate = hex::encode(&bytes);
            if !is_taken(&candidate) {
                return candidate;
            }
        }

        let fallback = now
            .timestamp_nanos_opt()
            .unwrap_or_else(|| now.timestamp_micros())
            .to_string();
        tracing::warn!(
            token = %fallback,
            "All random token candidates collided, using timestamp token"
        );
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::cell::Cell;
    use std::collections::HashSet;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_first_candidate_is_short_hex() {
        let token = TokenGenerator::new().generate(|_| false, now());

        assert_eq!(token.len(), MIN_TOKEN_BYTES * 2);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(token, token.to_lowercase());
    }

    #[test]
    fn test_grows_length_on_collision() {
        // Reject everything shorter than 4 bytes.
        let token = TokenGenerator::new().generate(|t| t.len() < 8, now());
        assert_eq!(token.len(), 8);
    }

    #[test]
    fn test_tries_every_length_before_fallback() {
        let attempts = Cell::new(0);
        let token = TokenGenerator::new().generate(
            |_| {
                attempts.set(attempts.get() + 1);
                true
            },
            now(),
        );

        assert_eq!(attempts.get(), MAX_TOKEN_BYTES - MIN_TOKEN_BYTES + 1);
        assert_eq!(token, now().timestamp_nanos_opt().unwrap().to_string());
    }

    #[test]
    fn test_avoids_taken_tokens() {
        let generator = TokenGenerator::new();
        let mut taken = HashSet::new();

        for _ in 0..500 {
            let token = generator.generate(|t| taken.contains(t), now());
            assert!(taken.insert(token));
        }
    }
}
