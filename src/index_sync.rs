//! Mutex-guarded hash index for shared use across threads.

use std::fmt;
use std::hash::{BuildHasher, Hash};

use parking_lot::{Mutex, MutexGuard};

use crate::config::Config;
use crate::error::Result;
use crate::hash::DefaultHashBuilder;
use crate::index::HashIndex;
use crate::iter::Snapshot;
use crate::undo::Transactional;

/// [`HashIndex`] behind one coarse lock.
///
/// Every method takes `&self` and holds the lock for exactly one call;
/// lookups return clones. Multi-step sequences that must not interleave
/// with other writers go through [`transaction`](Self::transaction) or
/// [`lock`](Self::lock).
pub struct SyncHashIndex<K, V, S = DefaultHashBuilder> {
    inner: Mutex<HashIndex<K, V, S>>,
}

impl<K, V, S> SyncHashIndex<K, V, S> {
    /// Wraps an existing index.
    #[must_use]
    pub fn from_index(index: HashIndex<K, V, S>) -> Self {
        Self {
            inner: Mutex::new(index),
        }
    }

    /// Returns the number of live entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Returns `true` if the index holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Locks the index for a sequence of calls.
    pub fn lock(&self) -> MutexGuard<'_, HashIndex<K, V, S>> {
        self.inner.lock()
    }

    /// Unwraps the index.
    #[must_use]
    pub fn into_inner(self) -> HashIndex<K, V, S> {
        self.inner.into_inner()
    }

    /// Returns a snapshot iterator that stays valid after the lock is
    /// released.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot<K, V> {
        self.inner.lock().snapshot()
    }
}

impl<K, V> SyncHashIndex<K, V> {
    /// Creates an empty index with the default hasher.
    #[must_use]
    pub fn new() -> Self {
        Self::from_index(HashIndex::new())
    }
}

impl<K: Clone, V: Clone> SyncHashIndex<K, V> {
    /// Creates an index from `config`.
    pub fn with_config(config: Config) -> Result<Self> {
        HashIndex::with_config(config).map(Self::from_index)
    }
}

impl<K: Hash + Eq, V: Clone, S: BuildHasher> SyncHashIndex<K, V, S> {
    /// Returns a clone of the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<V> {
        self.inner.lock().get(key).cloned()
    }

    /// Returns `true` if `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.inner.lock().contains_key(key)
    }
}

impl<K, V, S> SyncHashIndex<K, V, S>
where
    K: Hash + Eq + Clone,
    V: Clone,
    S: BuildHasher,
{
    /// See [`HashIndex::insert`].
    pub fn insert(&self, key: K, value: V) -> Result<Option<V>> {
        self.inner.lock().insert(key, value)
    }

    /// See [`HashIndex::add`].
    pub fn add(&self, key: K, value: V) -> Result<()> {
        self.inner.lock().add(key, value)
    }

    /// See [`HashIndex::remove`].
    pub fn remove(&self, key: &K) -> Option<V> {
        self.inner.lock().remove(key)
    }

    /// See [`HashIndex::clear`].
    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    /// Runs `body` inside a transaction while holding the lock.
    ///
    /// `Ok` commits and `Err` rolls back, so other threads see either all
    /// of `body`'s mutations or none. If a transaction was already open on
    /// the wrapped index, `body` joins it and the outcome closes it.
    pub fn transaction<R>(
        &self,
        body: impl FnOnce(&mut HashIndex<K, V, S>) -> Result<R>,
    ) -> Result<R> {
        let mut index = self.inner.lock();
        index.begin_transaction();
        match body(&mut index) {
            Ok(value) => {
                index.commit_transaction();
                Ok(value)
            }
            Err(err) => {
                tracing::debug!(%err, "transaction body failed");
                index.rollback_transaction();
                Err(err)
            }
        }
    }
}

impl<K, V, S: Default> Default for SyncHashIndex<K, V, S> {
    fn default() -> Self {
        Self::from_index(HashIndex::default())
    }
}

impl<K, V, S> fmt::Debug for SyncHashIndex<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("SyncHashIndex");
        match self.inner.try_lock() {
            Some(index) => d.field("inner", &*index),
            None => d.field("inner", &format_args!("<locked>")),
        };
        d.finish()
    }
}

impl<K, V, S> From<HashIndex<K, V, S>> for SyncHashIndex<K, V, S> {
    fn from(index: HashIndex<K, V, S>) -> Self {
        Self::from_index(index)
    }
}
