//! Token to entry mapping.
//!
//! `SlotRegistry` is a plain data structure. It does no locking and no disk
//! I/O; `SlotManager` keeps it behind a single mutex and pairs directory
//! changes with the registry mutations.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::entry::{Entry, EntryState};
use crate::{DropError, Result};

/// Entry counts and stored bytes at one point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SlotStats {
    /// Entries waiting for an upload.
    pub pending: usize,
    /// Entries with an upload in flight.
    pub uploading: usize,
    /// Entries holding a stored file.
    pub occupied: usize,
    /// Bytes stored or reserved across all entries.
    pub total_bytes: u64,
}

/// Authoritative token to entry mapping.
#[derive(Debug, Default)]
pub struct SlotRegistry {
    entries: HashMap<String, Entry>,
    next_generation: u64,
}

impl SlotRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new pending entry.
    ///
    /// Each entry gets a generation number never handed out before, so a
    /// token reissued after a sweep is told apart from its predecessor.
    pub fn create(
        &mut self,
        token: &str,
        room: &str,
        requester: &str,
        now: DateTime<Utc>,
    ) -> Result<&Entry> {
        if self.entries.contains_key(token) {
            return Err(DropError::DuplicateToken(token.to_string()));
        }

        self.next_generation += 1;
        let mut entry = Entry::pending(token, room, requester, now);
        entry.generation = self.next_generation;
        Ok(self.entries.entry(token.to_string()).or_insert(entry))
    }

    /// Look up an entry.
    pub fn get(&self, token: &str) -> Option<&Entry> {
        self.entries.get(token)
    }

    /// Look up `token` only if it is still the given generation.
    pub fn get_generation(&self, token: &str, generation: u64) -> Option<&Entry> {
        self.entries
            .get(token)
            .filter(|entry| entry.generation == generation)
    }

    /// Whether a token is present in any state.
    pub fn contains(&self, token: &str) -> bool {
        self.entries.contains_key(token)
    }

    /// Claim a pending entry for an upload of `byte_size` bytes.
    ///
    /// The entry moves to `Uploading` and its size counts towards the total
    /// until it is finalized or released.
    pub fn reserve(&mut self, token: &str, file_name: &str, byte_size: u64) -> Result<()> {
        match self.entries.get_mut(token) {
            Some(entry) if entry.state == EntryState::Pending => {
                entry.state = EntryState::Uploading;
                entry.file_name = file_name.to_string();
                entry.byte_size = byte_size;
                Ok(())
            }
            _ => Err(DropError::NotFound(format!("token {token}"))),
        }
    }

    /// Return an uploading entry to `Pending`.
    ///
    /// Returns false if the entry is gone or not uploading.
    pub fn release(&mut self, token: &str) -> bool {
        match self.entries.get_mut(token) {
            Some(entry) if entry.state == EntryState::Uploading => {
                entry.state = EntryState::Pending;
                entry.file_name.clear();
                entry.byte_size = 0;
                true
            }
            _ => false,
        }
    }

    /// Mark an entry as holding `file_name` of `byte_size` bytes.
    ///
    /// Accepts pending or uploading entries. Occupied entries are rejected
    /// the same way as unknown ones.
    pub fn finalize(&mut self, token: &str, file_name: &str, byte_size: u64) -> Result<()> {
        match self.entries.get_mut(token) {
            Some(entry) if entry.state != EntryState::Occupied => {
                entry.state = EntryState::Occupied;
                entry.file_name = file_name.to_string();
                entry.byte_size = byte_size;
                Ok(())
            }
            _ => Err(DropError::NotFound(format!("token {token}"))),
        }
    }

    /// Remove an entry unconditionally.
    pub fn remove(&mut self, token: &str) -> Option<Entry> {
        self.entries.remove(token)
    }

    /// Sum of `byte_size` over all entries.
    pub fn total_bytes(&self) -> u64 {
        self.entries.values().map(|e| e.byte_size).sum()
    }

    /// Tokens whose age at `now` is at least `retention`.
    pub fn expired(&self, now: DateTime<Utc>, retention: chrono::Duration) -> Vec<String> {
        self.entries
            .values()
            .filter(|e| e.age(now) >= retention)
            .map(|e| e.token.clone())
            .collect()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Per-state counts and total bytes.
    pub fn stats(&self) -> SlotStats {
        self.entries
            .values()
            .fold(SlotStats::default(), |mut stats, entry| {
                match entry.state {
                    EntryState::Pending => stats.pending += 1,
                    EntryState::Uploading => stats.uploading += 1,
                    EntryState::Occupied => stats.occupied += 1,
                }
                stats.total_bytes += entry.byte_size;
                stats
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_create_and_get() {
        let mut registry = SlotRegistry::new();
        let entry = registry.create("ab12", "main", "alice", t0()).unwrap();

        assert_eq!(entry.state, EntryState::Pending);
        assert_eq!(entry.created_at, t0());
        assert!(registry.contains("ab12"));
        assert_eq!(registry.get("ab12").unwrap().requester, "alice");
        assert!(registry.get("ffff").is_none());
    }

    #[test]
    fn test_generations_increase() {
        let mut registry = SlotRegistry::new();
        let first = registry.create("ab12", "main", "alice", t0()).unwrap().generation;
        registry.remove("ab12");
        let second = registry.create("ab12", "main", "bob", t0()).unwrap().generation;

        assert!(second > first);
        assert!(registry.get_generation("ab12", first).is_none());
        assert_eq!(
            registry.get_generation("ab12", second).unwrap().requester,
            "bob"
        );
    }

    #[test]
    fn test_create_duplicate() {
        let mut registry = SlotRegistry::new();
        registry.create("ab12", "main", "alice", t0()).unwrap();

        let result = registry.create("ab12", "other", "bob", t0());
        assert!(matches!(result, Err(DropError::DuplicateToken(_))));
        assert_eq!(registry.get("ab12").unwrap().room, "main");
    }

    #[test]
    fn test_reserve_then_finalize() {
        let mut registry = SlotRegistry::new();
        registry.create("ab12", "main", "alice", t0()).unwrap();

        registry.reserve("ab12", "cat.png", 2048).unwrap();
        let entry = registry.get("ab12").unwrap();
        assert_eq!(entry.state, EntryState::Uploading);
        assert_eq!(registry.total_bytes(), 2048);

        registry.finalize("ab12", "cat.png", 2048).unwrap();
        let entry = registry.get("ab12").unwrap();
        assert_eq!(entry.state, EntryState::Occupied);
        assert_eq!(entry.file_name, "cat.png");
        assert_eq!(entry.byte_size, 2048);
    }

    #[test]
    fn test_reserve_rejects_non_pending() {
        let mut registry = SlotRegistry::new();
        registry.create("ab12", "main", "alice", t0()).unwrap();
        registry.reserve("ab12", "a.bin", 1).unwrap();

        assert!(matches!(
            registry.reserve("ab12", "b.bin", 1),
            Err(DropError::NotFound(_))
        ));
        assert!(matches!(
            registry.reserve("none", "b.bin", 1),
            Err(DropError::NotFound(_))
        ));
    }

    #[test]
    fn test_release_restores_pending() {
        let mut registry = SlotRegistry::new();
        registry.create("ab12", "main", "alice", t0()).unwrap();
        registry.reserve("ab12", "a.bin", 500).unwrap();

        assert!(registry.release("ab12"));
        let entry = registry.get("ab12").unwrap();
        assert_eq!(entry.state, EntryState::Pending);
        assert_eq!(entry.byte_size, 0);
        assert!(entry.file_name.is_empty());

        // Nothing to release any more.
        assert!(!registry.release("ab12"));
        assert!(!registry.release("none"));
    }

    #[test]
    fn test_finalize_unknown_or_occupied() {
        let mut registry = SlotRegistry::new();
        assert!(matches!(
            registry.finalize("none", "a.bin", 1),
            Err(DropError::NotFound(_))
        ));

        registry.create("ab12", "main", "alice", t0()).unwrap();
        registry.finalize("ab12", "a.bin", 10).unwrap();
        assert!(matches!(
            registry.finalize("ab12", "b.bin", 20),
            Err(DropError::NotFound(_))
        ));
        assert_eq!(registry.get("ab12").unwrap().file_name, "a.bin");
    }

    #[test]
    fn test_remove() {
        let mut registry = SlotRegistry::new();
        registry.create("ab12", "main", "alice", t0()).unwrap();

        let removed = registry.remove("ab12").unwrap();
        assert_eq!(removed.token, "ab12");
        assert!(registry.is_empty());
        assert!(registry.remove("ab12").is_none());
    }

    #[test]
    fn test_expired_boundary() {
        let mut registry = SlotRegistry::new();
        registry.create("old", "main", "alice", t0()).unwrap();
        registry
            .create("new", "main", "bob", t0() + chrono::Duration::minutes(5))
            .unwrap();

        let retention = chrono::Duration::minutes(10);

        let at_boundary = registry.expired(t0() + retention, retention);
        assert_eq!(at_boundary, vec!["old".to_string()]);

        let mut later = registry.expired(t0() + chrono::Duration::minutes(20), retention);
        later.sort();
        assert_eq!(later, vec!["new".to_string(), "old".to_string()]);

        assert!(registry.expired(t0(), retention).is_empty());
    }

    #[test]
    fn test_stats() {
        let mut registry = SlotRegistry::new();
        registry.create("a", "main", "alice", t0()).unwrap();
        registry.create("b", "main", "alice", t0()).unwrap();
        registry.create("c", "main", "alice", t0()).unwrap();
        registry.reserve("b", "b.bin", 100).unwrap();
        registry.finalize("c", "c.bin", 50).unwrap();

        let stats = registry.stats();
        assert_eq!(
            stats,
            SlotStats {
                pending: 1,
                uploading: 1,
                occupied: 1,
                total_bytes: 150,
            }
        );
        assert_eq!(registry.len(), 3);
    }
}
