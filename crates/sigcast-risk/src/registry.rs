//! Single-active-instance exclusivity.
//!
//! Process-wide registry preventing two strategy instances from
//! publishing for the same (account, instrument) pair at the same
//! time. Entries are never removed; a released key stays in the map
//! with its flag down and is reusable.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Registry key: one account trading one instrument.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InstanceKey {
    pub account: String,
    pub instrument: String,
}

impl InstanceKey {
    pub fn new(account: impl Into<String>, instrument: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            instrument: instrument.into(),
        }
    }
}

impl std::fmt::Display for InstanceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.account, self.instrument)
    }
}

/// Process-wide active-instance registry.
///
/// Cheap to clone; all clones share the same underlying map. All
/// mutation happens under one internal lock, so `acquire` and
/// `release` are atomic with respect to each other.
#[derive(Debug, Clone, Default)]
pub struct InstanceRegistry {
    active: Arc<Mutex<HashMap<InstanceKey, bool>>>,
}

impl InstanceRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically claim the key.
    ///
    /// Returns `None` when another instance already holds it; the
    /// caller must then stay inert for its entire lifetime. On success
    /// the returned grant releases the key on `release()` or drop.
    pub fn acquire(&self, key: InstanceKey) -> Option<InstanceGrant> {
        let mut active = self.active.lock();
        if active.get(&key).copied().unwrap_or(false) {
            warn!(%key, "Another instance is already active, this instance stays inert");
            return None;
        }
        active.insert(key.clone(), true);
        info!(%key, "Instance activated");
        Some(InstanceGrant {
            registry: self.clone(),
            key,
            released: false,
        })
    }

    fn release(&self, key: &InstanceKey) {
        let mut active = self.active.lock();
        if let Some(flag) = active.get_mut(key) {
            *flag = false;
        }
        info!(%key, "Instance deactivated");
    }

    /// Whether the key is currently held. For tests and diagnostics.
    #[must_use]
    pub fn is_active(&self, key: &InstanceKey) -> bool {
        self.active.lock().get(key).copied().unwrap_or(false)
    }
}

/// Proof of a successful `acquire`.
///
/// Only a grant can release its key, so an instance that never
/// acquired cannot release someone else's claim. Dropping the grant
/// releases too, but the terminal lifecycle state should call
/// `release()` explicitly.
#[derive(Debug)]
pub struct InstanceGrant {
    registry: InstanceRegistry,
    key: InstanceKey,
    released: bool,
}

impl InstanceGrant {
    #[must_use]
    pub fn key(&self) -> &InstanceKey {
        &self.key
    }

    /// Give the key back. Safe to call more than once.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.registry.release(&self.key);
    }
}

impl Drop for InstanceGrant {
    fn drop(&mut self) {
        self.release();
    }
}
