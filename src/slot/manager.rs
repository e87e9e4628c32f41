//! Upload slot lifecycle.
//!
//! `SlotManager` is the only way in to the registry. It keeps the registry
//! behind one mutex and holds that lock across each check-then-act pair:
//! usability check plus state change, quota check plus reservation. File
//! contents are written to a staging file with the lock released; an
//! admitted upload holds an `UploadPermit` in the meantime, and committing it
//! moves the file into the slot.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::clock::{Clock, SystemClock};
use super::entry::{Entry, EntryState};
use super::quota::StorageQuota;
use super::registry::{SlotRegistry, SlotStats};
use super::storage::{validate_file_name, SlotStorage};
use super::sweeper::{RetentionSweeper, SweepReport};
use super::token::TokenGenerator;
use crate::config::StorageConfig;
use crate::{DropError, Result};

/// Limits applied by the manager.
#[derive(Debug, Clone, Copy)]
pub struct SlotLimits {
    /// Maximum aggregate bytes across all entries.
    pub max_storage_bytes: u64,
    /// Maximum bytes of a single upload.
    pub max_file_bytes: u64,
    /// Age at which an entry is reclaimed.
    pub retention: Duration,
}

impl From<&StorageConfig> for SlotLimits {
    fn from(config: &StorageConfig) -> Self {
        Self {
            max_storage_bytes: config.max_storage_bytes,
            max_file_bytes: config.max_file_bytes,
            retention: config.retention(),
        }
    }
}

/// A freshly issued upload slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSlot {
    /// Token identifying the slot.
    pub token: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Time from which the slot is eligible for reclamation.
    pub expires_at: DateTime<Utc>,
}

/// A stored file ready to be served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Original file name.
    pub file_name: String,
    /// Size in bytes.
    pub byte_size: u64,
    /// Location on disk.
    pub path: PathBuf,
}

/// Lifecycle coordinator for upload slots.
pub struct SlotManager {
    registry: Mutex<SlotRegistry>,
    storage: SlotStorage,
    quota: StorageQuota,
    sweeper: RetentionSweeper,
    tokens: TokenGenerator,
    clock: Arc<dyn Clock>,
    max_file_bytes: u64,
}

impl std::fmt::Debug for SlotManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlotManager")
            .field("storage", &self.storage)
            .field("quota", &self.quota)
            .field("sweeper", &self.sweeper)
            .field("max_file_bytes", &self.max_file_bytes)
            .finish_non_exhaustive()
    }
}

impl SlotManager {
    /// Create a manager over `storage` with an explicit clock.
    pub fn new(storage: SlotStorage, limits: SlotLimits, clock: Arc<dyn Clock>) -> Self {
        Self {
            registry: Mutex::new(SlotRegistry::new()),
            storage,
            quota: StorageQuota::new(limits.max_storage_bytes),
            sweeper: RetentionSweeper::new(limits.retention),
            tokens: TokenGenerator::new(),
            clock,
            max_file_bytes: limits.max_file_bytes,
        }
    }

    /// Create a manager from configuration, using the wall clock.
    pub fn from_config(config: &StorageConfig) -> Result<Self> {
        let storage = SlotStorage::new(&config.path)?;
        Ok(Self::new(
            storage,
            SlotLimits::from(config),
            Arc::new(SystemClock),
        ))
    }

    /// Storage backing the slots.
    pub fn storage(&self) -> &SlotStorage {
        &self.storage
    }

    /// Per-upload size limit.
    pub fn max_file_bytes(&self) -> u64 {
        self.max_file_bytes
    }

    /// Aggregate size limit.
    pub fn max_storage_bytes(&self) -> u64 {
        self.quota.max_bytes()
    }

    fn lock(&self) -> MutexGuard<'_, SlotRegistry> {
        // Every mutation leaves the registry consistent, so a panic elsewhere
        // does not invalidate it.
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Issue a new pending slot for `requester` in `room`.
    ///
    /// The slot's directory is created together with the registry entry.
    pub fn create_upload_slot(&self, room: &str, requester: &str) -> Result<UploadSlot> {
        let now = self.clock.now();
        let mut registry = self.lock();

        let token = self.tokens.generate(|t| registry.contains(t), now);
        self.storage.create_slot_dir(&token)?;

        if let Err(e) = registry.create(&token, room, requester, now) {
            if let Err(cleanup) = self.storage.remove_slot_dir(&token) {
                warn!(token = %token, error = %cleanup, "Failed to remove unused slot directory");
            }
            return Err(e);
        }

        info!(
            token = %token,
            room = %room,
            requester = %requester,
            "Upload slot created"
        );

        Ok(UploadSlot {
            token,
            created_at: now,
            expires_at: now
                .checked_add_signed(self.sweeper.retention())
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        })
    }

    /// Whether `token` can still receive an upload.
    ///
    /// Expired entries are swept first.
    pub fn is_usable(&self, token: &str) -> bool {
        let mut registry = self.lock();
        self.sweep_locked(&mut registry, self.clock.now());

        registry.get(token).is_some_and(Entry::is_usable)
    }

    /// Authorize an upload of `byte_size` bytes named `file_name`.
    ///
    /// A token that cannot take an upload is `NotFound` whatever the name or
    /// size. On success the entry is reserved for this upload and its size
    /// counts against the quota. The caller writes the file to the permit's
    /// staging path and then commits the permit; dropping the permit instead
    /// hands the slot back.
    pub fn admit_upload(
        &self,
        token: &str,
        file_name: &str,
        byte_size: u64,
    ) -> Result<UploadPermit<'_>> {
        let mut registry = self.lock();
        self.sweep_locked(&mut registry, self.clock.now());

        let generation = match registry.get(token) {
            Some(entry) if entry.is_usable() => entry.generation,
            _ => {
                debug!(token = %token, "Upload rejected: token not usable");
                return Err(DropError::NotFound(format!("token {token}")));
            }
        };

        validate_file_name(file_name)?;
        if byte_size > self.max_file_bytes {
            return Err(DropError::FileTooLarge {
                size: byte_size,
                limit: self.max_file_bytes,
            });
        }

        if let Err(e) = self.quota.check(&registry, byte_size) {
            warn!(token = %token, error = %e, "Upload rejected: storage full");
            return Err(e);
        }

        registry.reserve(token, file_name, byte_size)?;
        debug!(token = %token, file_name = %file_name, byte_size, "Upload admitted");

        Ok(UploadPermit {
            manager: self,
            token: token.to_string(),
            generation,
            file_name: file_name.to_string(),
            byte_size,
            staged: self.storage.staging_path(token, generation),
            committed: false,
        })
    }

    /// Admit, write and finalize an upload in one call.
    ///
    /// The registry lock is not held while `content` is written.
    pub async fn store_upload(&self, token: &str, file_name: &str, content: &[u8]) -> Result<()> {
        let permit = self.admit_upload(token, file_name, content.len() as u64)?;
        let staged = permit.staging_path().to_path_buf();

        let result = match self.storage.write_staged(&staged, content).await {
            Ok(()) => permit.commit(),
            Err(e) => {
                warn!(token = %token, error = %e, "Failed to write upload");
                drop(permit);
                Err(e)
            }
        };

        if result.is_err() {
            if let Err(e) = self.storage.discard_staged(&staged).await {
                debug!(token = %token, error = %e, "Failed to discard staged upload");
            }
        }
        result
    }

    /// Stored file for `token`, if it holds one.
    ///
    /// Unknown, pending and uploading tokens are all `NotFound`.
    pub fn describe_for_retrieval(&self, token: &str) -> Result<StoredFile> {
        let mut registry = self.lock();
        self.sweep_locked(&mut registry, self.clock.now());

        match registry.get(token) {
            Some(entry) if entry.is_occupied() => Ok(StoredFile {
                path: self.storage.file_path(token, &entry.file_name)?,
                file_name: entry.file_name.clone(),
                byte_size: entry.byte_size,
            }),
            _ => Err(DropError::NotFound(format!("token {token}"))),
        }
    }

    /// Snapshot of one entry.
    pub fn get(&self, token: &str) -> Option<Entry> {
        self.lock().get(token).cloned()
    }

    /// Sweep at the clock's current time.
    pub fn sweep(&self) -> SweepReport {
        self.sweep_at(self.clock.now())
    }

    /// Sweep as if the time were `now`.
    pub fn sweep_at(&self, now: DateTime<Utc>) -> SweepReport {
        let mut registry = self.lock();
        self.sweep_locked(&mut registry, now)
    }

    fn sweep_locked(&self, registry: &mut SlotRegistry, now: DateTime<Utc>) -> SweepReport {
        let report = self.sweeper.sweep(registry, &self.storage, now);
        if !report.is_empty() {
            let stats = registry.stats();
            info!(
                evicted = report.evicted.len(),
                orphaned = report.orphaned.len(),
                remaining = registry.len(),
                total_bytes = stats.total_bytes,
                "Swept expired upload slots"
            );
        }
        report
    }

    /// Bytes currently stored or reserved.
    pub fn aggregate_bytes(&self) -> u64 {
        self.lock().total_bytes()
    }

    /// Entry counts and stored bytes.
    pub fn stats(&self) -> SlotStats {
        self.lock().stats()
    }

    fn finalize(&self, permit: &UploadPermit<'_>) -> Result<()> {
        let token = permit.token.as_str();
        let mut registry = self.lock();

        let still_ours = registry
            .get_generation(token, permit.generation)
            .is_some_and(|e| e.state == EntryState::Uploading);
        if !still_ours {
            // Swept while the bytes were being written, maybe reissued since.
            warn!(token = %token, "Upload finished after its slot expired");
            return Err(DropError::NotFound(format!("token {token}")));
        }

        if let Err(e) = self
            .storage
            .promote(&permit.staged, token, &permit.file_name)
        {
            registry.release(token);
            warn!(token = %token, error = %e, "Failed to move upload into its slot");
            if !self.storage.slot_exists(token) {
                return Err(DropError::NotFound(format!("token {token}")));
            }
            return Err(e);
        }

        registry.finalize(token, &permit.file_name, permit.byte_size)?;
        info!(
            token = %token,
            file_name = %permit.file_name,
            byte_size = permit.byte_size,
            "Upload stored"
        );
        Ok(())
    }

    fn release(&self, token: &str, generation: u64) {
        let mut registry = self.lock();
        if registry.get_generation(token, generation).is_none() {
            return;
        }
        if registry.release(token) {
            debug!(token = %token, "Upload abandoned, slot is pending again");
        }
    }
}

/// An admitted, not yet committed upload.
///
/// Dropping it without calling `commit` returns the slot to pending.
#[must_use = "an upload permit must be committed once the file is written"]
#[derive(Debug)]
pub struct UploadPermit<'a> {
    manager: &'a SlotManager,
    token: String,
    generation: u64,
    file_name: String,
    byte_size: u64,
    staged: PathBuf,
    committed: bool,
}

impl UploadPermit<'_> {
    /// Token the upload belongs to.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Name the file is stored under.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Where the content must be written before `commit`.
    pub fn staging_path(&self) -> &Path {
        &self.staged
    }

    /// Move the staged file into the slot and mark the slot occupied.
    ///
    /// Fails with `NotFound` if the slot this permit was issued for has been
    /// swept, even when its token has been handed out again since.
    pub fn commit(mut self) -> Result<()> {
        self.committed = true;
        self.manager.finalize(&self)
    }
}

impl Drop for UploadPermit<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.manager.release(&self.token, self.generation);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slot::clock::ManualClock;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    fn setup(max_storage_bytes: u64) -> (TempDir, Arc<ManualClock>, SlotManager) {
        let temp_dir = TempDir::new().unwrap();
        let storage = SlotStorage::new(temp_dir.path().join("storage")).unwrap();
        let clock = Arc::new(ManualClock::new(t0()));
        let limits = SlotLimits {
            max_storage_bytes,
            max_file_bytes: 4096,
            retention: Duration::from_secs(600),
        };
        let manager = SlotManager::new(storage, limits, clock.clone());
        (temp_dir, clock, manager)
    }

    #[test]
    fn test_create_upload_slot() {
        let (_temp_dir, _clock, manager) = setup(10_000);

        let slot = manager.create_upload_slot("main", "alice").unwrap();

        assert_eq!(slot.created_at, t0());
        assert_eq!(slot.expires_at, t0() + chrono::Duration::minutes(10));
        assert!(manager.storage().slot_exists(&slot.token));

        let entry = manager.get(&slot.token).unwrap();
        assert_eq!(entry.state, EntryState::Pending);
        assert_eq!(entry.room, "main");
        assert_eq!(entry.requester, "alice");
    }

    #[test]
    fn test_tokens_are_distinct() {
        let (_temp_dir, _clock, manager) = setup(10_000);
        let mut seen = std::collections::HashSet::new();

        for _ in 0..200 {
            let slot = manager.create_upload_slot("main", "alice").unwrap();
            assert!(seen.insert(slot.token));
        }
    }

    #[test]
    fn test_unknown_token_not_usable() {
        let (_temp_dir, _clock, manager) = setup(10_000);
        assert!(!manager.is_usable("ffff"));
    }

    #[tokio::test]
    async fn test_full_lifecycle() {
        let (_temp_dir, _clock, manager) = setup(10_000);
        let token = manager.create_upload_slot("main", "alice").unwrap().token;
        assert!(manager.is_usable(&token));

        let data = vec![7u8; 2048];
        manager.store_upload(&token, "cat.png", &data).await.unwrap();

        assert!(!manager.is_usable(&token));
        let stored = manager.describe_for_retrieval(&token).unwrap();
        assert_eq!(stored.file_name, "cat.png");
        assert_eq!(stored.byte_size, 2048);
        assert_eq!(std::fs::read(&stored.path).unwrap(), data);
        assert_eq!(manager.aggregate_bytes(), 2048);
    }

    #[test]
    fn test_admit_unknown_token() {
        let (_temp_dir, _clock, manager) = setup(10_000);
        manager.create_upload_slot("main", "alice").unwrap();
        let before = manager.stats();

        for (name, size) in [("a.bin", 10), ("../x", 10), ("a.bin", 1_000_000), ("", 0)] {
            let result = manager.admit_upload("ffff", name, size);
            assert!(
                matches!(result, Err(DropError::NotFound(_))),
                "{name:?} ({size} bytes) should be NotFound"
            );
        }
        assert_eq!(manager.stats(), before);
    }

    #[tokio::test]
    async fn test_admit_used_token_is_not_found_first() {
        let (_temp_dir, _clock, manager) = setup(10);
        let token = manager.create_upload_slot("main", "alice").unwrap().token;
        manager.store_upload(&token, "a.bin", b"data").await.unwrap();

        for (name, size) in [("../x", 1), ("b.bin", 5000), ("b.bin", 9)] {
            assert!(matches!(
                manager.admit_upload(&token, name, size),
                Err(DropError::NotFound(_))
            ));
        }
    }

    #[test]
    fn test_admit_over_quota() {
        let (_temp_dir, _clock, manager) = setup(1000);
        let token = manager.create_upload_slot("main", "alice").unwrap().token;

        let result = manager.admit_upload(&token, "a.bin", 1200);

        assert!(matches!(result, Err(DropError::QuotaExceeded { .. })));
        assert_eq!(manager.aggregate_bytes(), 0);
        assert!(manager.is_usable(&token));
    }

    #[test]
    fn test_admit_counts_reserved_bytes() {
        let (_temp_dir, _clock, manager) = setup(1000);
        let first = manager.create_upload_slot("main", "alice").unwrap().token;
        let second = manager.create_upload_slot("main", "bob").unwrap().token;

        let permit = manager.admit_upload(&first, "a.bin", 600).unwrap();
        let result = manager.admit_upload(&second, "b.bin", 600);

        assert!(matches!(result, Err(DropError::QuotaExceeded { .. })));
        drop(permit);
        assert!(manager.admit_upload(&second, "b.bin", 600).is_ok());
    }

    #[test]
    fn test_admit_file_too_large() {
        let (_temp_dir, _clock, manager) = setup(1_000_000);
        let token = manager.create_upload_slot("main", "alice").unwrap().token;

        let result = manager.admit_upload(&token, "big.bin", 4097);
        assert!(matches!(result, Err(DropError::FileTooLarge { .. })));
        assert!(manager.is_usable(&token));
    }

    #[test]
    fn test_admit_invalid_file_name() {
        let (_temp_dir, _clock, manager) = setup(10_000);
        let token = manager.create_upload_slot("main", "alice").unwrap().token;

        let result = manager.admit_upload(&token, "../escape.txt", 10);
        assert!(matches!(result, Err(DropError::InvalidFileName(_))));
        assert!(manager.is_usable(&token));
    }

    #[test]
    fn test_second_admission_rejected_while_uploading() {
        let (_temp_dir, _clock, manager) = setup(10_000);
        let token = manager.create_upload_slot("main", "alice").unwrap().token;

        let permit = manager.admit_upload(&token, "a.bin", 10).unwrap();
        assert!(!manager.is_usable(&token));
        assert!(matches!(
            manager.admit_upload(&token, "b.bin", 10),
            Err(DropError::NotFound(_))
        ));

        permit.commit().unwrap();
        assert!(matches!(
            manager.admit_upload(&token, "b.bin", 10),
            Err(DropError::NotFound(_))
        ));
    }

    #[test]
    fn test_dropped_permit_releases_slot() {
        let (_temp_dir, _clock, manager) = setup(10_000);
        let token = manager.create_upload_slot("main", "alice").unwrap().token;

        {
            let _permit = manager.admit_upload(&token, "a.bin", 500).unwrap();
            assert_eq!(manager.aggregate_bytes(), 500);
        }

        assert!(manager.is_usable(&token));
        assert_eq!(manager.aggregate_bytes(), 0);
        assert!(manager.describe_for_retrieval(&token).is_err());
    }

    #[test]
    fn test_describe_pending_is_not_found() {
        let (_temp_dir, _clock, manager) = setup(10_000);
        let token = manager.create_upload_slot("main", "alice").unwrap().token;

        assert!(matches!(
            manager.describe_for_retrieval(&token),
            Err(DropError::NotFound(_))
        ));
        assert!(matches!(
            manager.describe_for_retrieval("ffff"),
            Err(DropError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_expired_slot_is_reclaimed() {
        let (_temp_dir, clock, manager) = setup(10_000);
        let pending = manager.create_upload_slot("main", "alice").unwrap().token;
        let occupied = manager.create_upload_slot("main", "bob").unwrap().token;
        manager.store_upload(&occupied, "a.bin", b"data").await.unwrap();

        clock.advance(Duration::from_secs(11 * 60));

        assert!(!manager.is_usable(&pending));
        assert!(manager.get(&pending).is_none());
        assert!(manager.get(&occupied).is_none());
        assert!(!manager.storage().slot_exists(&pending));
        assert!(!manager.storage().slot_exists(&occupied));
        assert_eq!(manager.aggregate_bytes(), 0);
    }

    #[test]
    fn test_sweep_at_explicit_time() {
        let (_temp_dir, _clock, manager) = setup(10_000);
        let token = manager.create_upload_slot("main", "alice").unwrap().token;

        let now = t0() + chrono::Duration::minutes(11);
        let first = manager.sweep_at(now);
        let second = manager.sweep_at(now);

        assert_eq!(first.evicted, vec![token]);
        assert!(second.is_empty());
    }

    #[tokio::test]
    async fn test_commit_after_sweep_fails() {
        let (_temp_dir, clock, manager) = setup(10_000);
        let token = manager.create_upload_slot("main", "alice").unwrap().token;

        let permit = manager.admit_upload(&token, "a.bin", 4).unwrap();
        clock.advance(Duration::from_secs(601));
        manager.sweep();

        assert!(matches!(permit.commit(), Err(DropError::NotFound(_))));
        assert!(manager.get(&token).is_none());
    }

    #[tokio::test]
    async fn test_stale_permit_cannot_commit_reissued_token() {
        let (_temp_dir, clock, manager) = setup(10_000);
        let token = manager.create_upload_slot("main", "alice").unwrap().token;
        let stale = manager.admit_upload(&token, "old.bin", 10).unwrap();
        std::fs::write(stale.staging_path(), b"old upload").unwrap();

        clock.advance(Duration::from_secs(601));
        manager.sweep();

        // The same token is handed out again.
        manager.lock().create(&token, "main", "bob", clock.now()).unwrap();
        manager.storage().create_slot_dir(&token).unwrap();
        let fresh = manager.admit_upload(&token, "new.bin", 7).unwrap();

        assert!(matches!(stale.commit(), Err(DropError::NotFound(_))));
        let entry = manager.get(&token).unwrap();
        assert_eq!(entry.state, EntryState::Uploading);
        assert_eq!(entry.file_name, "new.bin");
        assert_eq!(entry.byte_size, 7);
        assert!(!manager.storage().slot_dir(&token).join("old.bin").exists());

        std::fs::write(fresh.staging_path(), b"new 123").unwrap();
        fresh.commit().unwrap();
        let stored = manager.describe_for_retrieval(&token).unwrap();
        assert_eq!(stored.file_name, "new.bin");
        assert_eq!(std::fs::read(&stored.path).unwrap(), b"new 123");
    }

    #[test]
    fn test_stale_permit_drop_keeps_reissued_reservation() {
        let (_temp_dir, clock, manager) = setup(10_000);
        let token = manager.create_upload_slot("main", "alice").unwrap().token;
        let stale = manager.admit_upload(&token, "old.bin", 10).unwrap();

        clock.advance(Duration::from_secs(601));
        manager.sweep();
        manager.lock().create(&token, "main", "bob", clock.now()).unwrap();
        manager.storage().create_slot_dir(&token).unwrap();
        let _fresh = manager.admit_upload(&token, "new.bin", 5).unwrap();

        drop(stale);

        assert_eq!(manager.get(&token).unwrap().state, EntryState::Uploading);
        assert_eq!(manager.aggregate_bytes(), 5);
    }

    #[tokio::test]
    async fn test_failed_store_leaves_no_staged_file() {
        let (temp_dir, _clock, manager) = setup(10_000);
        let token = manager.create_upload_slot("main", "alice").unwrap().token;
        manager.storage().remove_slot_dir(&token).unwrap();

        assert!(manager.store_upload(&token, "a.bin", b"data").await.is_err());

        let staging = temp_dir.path().join("storage").join(".staging");
        assert_eq!(std::fs::read_dir(staging).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_store_into_missing_directory() {
        let (_temp_dir, _clock, manager) = setup(10_000);
        let token = manager.create_upload_slot("main", "alice").unwrap().token;
        manager.storage().remove_slot_dir(&token).unwrap();

        let result = manager.store_upload(&token, "a.bin", b"data").await;

        assert!(matches!(result, Err(DropError::NotFound(_))));
        assert_eq!(manager.get(&token).unwrap().state, EntryState::Pending);
        assert_eq!(manager.aggregate_bytes(), 0);
    }

    #[test]
    fn test_stats() {
        let (_temp_dir, _clock, manager) = setup(10_000);
        let a = manager.create_upload_slot("main", "alice").unwrap().token;
        manager.create_upload_slot("main", "bob").unwrap();

        let permit = manager.admit_upload(&a, "a.bin", 100).unwrap();
        let stats = manager.stats();
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.uploading, 1);
        assert_eq!(stats.total_bytes, 100);

        permit.commit().unwrap();
        assert_eq!(manager.stats().occupied, 1);
    }

    #[test]
    fn test_from_config() {
        let temp_dir = TempDir::new().unwrap();
        let config = StorageConfig {
            path: temp_dir.path().join("files").to_string_lossy().into_owned(),
            max_storage_bytes: 5000,
            max_file_bytes: 100,
            retention_secs: 30,
        };

        let manager = SlotManager::from_config(&config).unwrap();
        assert_eq!(manager.max_storage_bytes(), 5000);
        assert_eq!(manager.max_file_bytes(), 100);
        assert!(temp_dir.path().join("files").is_dir());
    }
}
