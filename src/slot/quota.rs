//! Aggregate storage quota.

use super::registry::SlotRegistry;
use crate::{DropError, Result};

/// Caps the total bytes held by all registry entries.
///
/// The check is a snapshot of the registry it is given; it reserves nothing
/// by itself. `SlotManager` runs it under the registry lock together with
/// the reservation that follows.
#[derive(Debug, Clone, Copy)]
pub struct StorageQuota {
    max_bytes: u64,
}

impl StorageQuota {
    /// Create a quota of `max_bytes`.
    pub fn new(max_bytes: u64) -> Self {
        Self { max_bytes }
    }

    /// Configured maximum.
    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Fail with `QuotaExceeded` if adding `additional` bytes would go over
    /// the quota. Reaching the limit exactly is allowed.
    pub fn check(&self, registry: &SlotRegistry, additional: u64) -> Result<()> {
        let used = registry.total_bytes();
        if used.saturating_add(additional) > self.max_bytes {
            return Err(DropError::QuotaExceeded {
                requested: additional,
                used,
                limit: self.max_bytes,
            });
        }
        Ok(())
    }
}
