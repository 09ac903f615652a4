//! Keyed lock table.
//!
//! [`KeyLocks`] hands out one mutex per key. Holders of different keys
//! never block each other; holders of the same key are serialized.
//!
//! ```text
//! table: RwLock<HashMap<K, Arc<Mutex<()>>>>
//!   lookup   → read lock (shared), clone the Arc
//!   first use → write lock, insert
//!   lock     → Mutex::lock_arc() on the clone, table lock already released
//! ```

use parking_lot::{ArcMutexGuard, Mutex, RawMutex, RwLock};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

/// Guard returned by [`KeyLocks::lock`]; the key is unlocked on drop.
pub type KeyGuard = ArcMutexGuard<RawMutex, ()>;

/// A table of per-key mutexes.
///
/// # Example
///
/// ```
/// use rolebind_runtime::KeyLocks;
///
/// let locks = KeyLocks::new();
/// let a = locks.lock(&"a");
/// let b = locks.lock(&"b"); // different key, does not block
/// drop((a, b));
/// assert_eq!(locks.len(), 2);
/// ```
#[derive(Debug)]
pub struct KeyLocks<K> {
    table: RwLock<HashMap<K, Arc<Mutex<()>>>>,
}

impl<K> Default for KeyLocks<K> {
    fn default() -> Self {
        Self {
            table: RwLock::new(HashMap::new()),
        }
    }
}

impl<K: Eq + Hash + Clone> KeyLocks<K> {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Blocks until the lock for `key` is held.
    pub fn lock(&self, key: &K) -> KeyGuard {
        let existing = self.table.read().get(key).cloned();
        let mutex = match existing {
            Some(mutex) => mutex,
            None => Arc::clone(self.table.write().entry(key.clone()).or_default()),
        };
        mutex.lock_arc()
    }

    /// Drops the table entry for `key` if nobody holds or awaits it.
    ///
    /// Returns `true` if the entry was removed.
    pub fn remove_idle(&self, key: &K) -> bool {
        let mut table = self.table.write();
        // With the table write-locked no new Arc can be handed out, so a
        // count of one means the table holds the only reference.
        if table.get(key).is_some_and(|m| Arc::strong_count(m) == 1) {
            table.remove(key);
            return true;
        }
        false
    }

    /// Number of keys currently in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.read().len()
    }

    /// Returns `true` if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
