//! Per-document write serialization.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type LockMap = HashMap<i64, Arc<AsyncMutex<()>>>;

/// A set of async locks keyed by `doc_id`.
///
/// Entries are created on first use and dropped again once no task holds or
/// waits on them, so the map only grows with the number of documents being
/// written concurrently.
#[derive(Debug, Default)]
pub struct DocLocks {
    inner: Arc<Mutex<LockMap>>,
}

impl DocLocks {
    /// Create an empty lock set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `doc_id`.
    pub async fn acquire(&self, doc_id: i64) -> DocLockGuard {
        // Declared before the wait so it is dropped after the pending lock
        // future if this call is cancelled.
        let slot = LockSlot {
            doc_id,
            locks: Arc::clone(&self.inner),
        };
        let lock = slot.entry();
        let guard = lock.lock_owned().await;

        DocLockGuard { guard, slot }
    }

    /// Number of documents with a live lock entry.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether no document currently has a lock entry.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Membership of one task in a `doc_id` entry, waiting or holding.
///
/// Dropping it removes the entry when no other task references it.
#[derive(Debug)]
struct LockSlot {
    doc_id: i64,
    locks: Arc<Mutex<LockMap>>,
}

impl LockSlot {
    fn entry(&self) -> Arc<AsyncMutex<()>> {
        let mut map = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        map.entry(self.doc_id).or_default().clone()
    }
}

impl Drop for LockSlot {
    fn drop(&mut self) {
        let mut map = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        // Tasks clone the entry under the map lock, so a count of 1 means
        // only the map itself still references it.
        if map
            .get(&self.doc_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            map.remove(&self.doc_id);
        }
    }
}

/// Exclusive access to one `doc_id`, released on drop.
#[derive(Debug)]
pub struct DocLockGuard {
    // Field order matters: the async lock is released before the slot prunes.
    guard: OwnedMutexGuard<()>,
    slot: LockSlot,
}

impl DocLockGuard {
    /// The document this guard protects.
    pub fn doc_id(&self) -> i64 {
        self.slot.doc_id
    }
}
