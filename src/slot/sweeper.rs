//! Retention sweeping.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use super::registry::SlotRegistry;
use super::storage::SlotStorage;

/// Outcome of one sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Tokens removed from the registry.
    pub evicted: Vec<String>,
    /// Evicted tokens whose directory could not be deleted.
    pub orphaned: Vec<String>,
}

impl SweepReport {
    /// Whether the sweep changed anything.
    pub fn is_empty(&self) -> bool {
        self.evicted.is_empty()
    }
}

/// Evicts entries older than the retention window.
#[derive(Debug, Clone, Copy)]
pub struct RetentionSweeper {
    retention: chrono::Duration,
}

impl RetentionSweeper {
    /// Create a sweeper with the given retention window.
    pub fn new(retention: Duration) -> Self {
        Self {
            retention: chrono::Duration::from_std(retention).unwrap_or(chrono::Duration::MAX),
        }
    }

    /// Retention window.
    pub fn retention(&self) -> chrono::Duration {
        self.retention
    }

    /// Remove every entry with `now - created_at >= retention`, regardless
    /// of state, deleting its directory first.
    ///
    /// A failed directory deletion is logged and the entry is removed from
    /// the registry anyway.
    pub fn sweep(
        &self,
        registry: &mut SlotRegistry,
        storage: &SlotStorage,
        now: DateTime<Utc>,
    ) -> SweepReport {
        let mut report = SweepReport::default();

        for token in registry.expired(now, self.retention) {
            match storage.remove_slot_dir(&token) {
                Ok(true) => {}
                Ok(false) => debug!(token = %token, "Expired slot had no directory"),
                Err(e) => {
                    warn!(
                        token = %token,
                        error = %e,
                        "Failed to remove expired slot directory"
                    );
                    report.orphaned.push(token.clone());
                }
            }

            registry.remove(&token);
            report.evicted.push(token);
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    fn setup() -> (TempDir, SlotStorage, SlotRegistry) {
        let temp_dir = TempDir::new().unwrap();
        let storage = SlotStorage::new(temp_dir.path()).unwrap();
        (temp_dir, storage, SlotRegistry::new())
    }

    fn add(registry: &mut SlotRegistry, storage: &SlotStorage, token: &str, at: DateTime<Utc>) {
        registry.create(token, "main", "alice", at).unwrap();
        storage.create_slot_dir(token).unwrap();
    }

    #[test]
    fn test_sweep_evicts_expired_only() {
        let (_temp_dir, storage, mut registry) = setup();
        let sweeper = RetentionSweeper::new(Duration::from_secs(600));

        add(&mut registry, &storage, "old", t0());
        add(&mut registry, &storage, "new", t0() + chrono::Duration::minutes(5));
        registry.finalize("old", "cat.png", 10).unwrap();

        let report = sweeper.sweep(&mut registry, &storage, t0() + chrono::Duration::minutes(11));

        assert_eq!(report.evicted, vec!["old".to_string()]);
        assert!(report.orphaned.is_empty());
        assert!(!registry.contains("old"));
        assert!(!storage.slot_exists("old"));
        assert!(registry.contains("new"));
        assert!(storage.slot_exists("new"));
    }

    #[test]
    fn test_sweep_is_idempotent() {
        let (_temp_dir, storage, mut registry) = setup();
        let sweeper = RetentionSweeper::new(Duration::from_secs(600));
        add(&mut registry, &storage, "old", t0());

        let now = t0() + chrono::Duration::minutes(10);
        let first = sweeper.sweep(&mut registry, &storage, now);
        let second = sweeper.sweep(&mut registry, &storage, now);

        assert_eq!(first.evicted.len(), 1);
        assert!(second.is_empty());
    }

    #[test]
    fn test_sweep_missing_directory_still_evicts() {
        let (_temp_dir, storage, mut registry) = setup();
        let sweeper = RetentionSweeper::new(Duration::from_secs(60));
        registry.create("nodir", "main", "alice", t0()).unwrap();

        let report = sweeper.sweep(&mut registry, &storage, t0() + chrono::Duration::minutes(2));

        assert_eq!(report.evicted, vec!["nodir".to_string()]);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_sweep_failed_delete_still_evicts() {
        let (_temp_dir, storage, mut registry) = setup();
        let sweeper = RetentionSweeper::new(Duration::from_secs(60));
        registry.create("stuck", "main", "alice", t0()).unwrap();
        // A plain file where the directory should be cannot be removed as one.
        std::fs::write(storage.slot_dir("stuck"), b"not a directory").unwrap();

        let report = sweeper.sweep(&mut registry, &storage, t0() + chrono::Duration::minutes(2));

        assert_eq!(report.evicted, vec!["stuck".to_string()]);
        assert_eq!(report.orphaned, vec!["stuck".to_string()]);
        assert!(!registry.contains("stuck"));
        assert!(storage.slot_dir("stuck").is_file());
    }

    #[test]
    fn test_retention_conversion() {
        let sweeper = RetentionSweeper::new(Duration::from_secs(90));
        assert_eq!(sweeper.retention(), chrono::Duration::seconds(90));
    }
}
