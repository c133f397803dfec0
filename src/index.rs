//! Open-chained hash index over segmented storage.

use std::collections::HashSet;
use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::mem;
use std::ops;

use rand::Rng;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::hash::{DefaultHashBuilder, hash_code};
use crate::iter::{Iter, LiveCursor, Snapshot};
use crate::ops::get::find_slot;
use crate::ops::insert::{InsertOutcome, OnDuplicate, insert_slot};
use crate::ops::remove::remove_slot;
use crate::slot::Slot;
use crate::table::Table;
use crate::undo::{RollbackOperation, Transactional, UndoLog, replayed};

/// Key → value table whose bucket and slot arrays are [`SegmentedArray`]s.
///
/// Collisions are resolved by chaining through slot indices. Removed slots
/// are tombstoned and reused through a free list; they are never compacted,
/// so a slot keeps its position for as long as it is live, growth included.
/// Capacity is always prime and grows by [`prime::expand`].
///
/// Mutations can be bracketed in a transaction (see [`Transactional`]);
/// rollback restores the keys and values present at `begin_transaction`.
///
/// ```
/// use segmented_store::{HashIndex, Transactional};
///
/// let mut index: HashIndex<&str, i32> = HashIndex::new();
/// index.insert("a", 1)?;
/// index.begin_transaction();
/// index.insert("b", 2)?;
/// index.remove(&"a");
/// index.rollback_transaction();
/// assert_eq!(index.get(&"a"), Some(&1));
/// assert!(!index.contains_key(&"b"));
/// # Ok::<(), segmented_store::Error>(())
/// ```
///
/// [`SegmentedArray`]: crate::SegmentedArray
/// [`prime::expand`]: crate::prime::expand
pub struct HashIndex<K, V, S = DefaultHashBuilder> {
    table: Table<K, V>,
    hasher: S,
    version: u64,
    undo: UndoLog<IndexOp<K, V>>,
}

/// Inverse of one hash-index mutation.
pub(crate) enum IndexOp<K, V> {
    /// `key` was new; undo removes it.
    Inserted { key: K },
    /// `key` held `old`; undo writes it back.
    Replaced { key: K, old: V },
    /// `key → value` was removed; undo re-adds it.
    Removed { key: K, value: V },
    /// The whole table was swapped out by `clear`; undo reinstates it.
    Cleared { table: Table<K, V> },
}

// ---------------------------------------------------------------------------
// Construction & accessors: no trait bounds
// ---------------------------------------------------------------------------

impl<K, V, S> HashIndex<K, V, S> {
    /// Creates an empty index that hashes with `hasher`. Nothing is
    /// allocated until the first insert.
    #[must_use]
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            table: Table::empty(Config::new()),
            hasher,
            version: 0,
            undo: UndoLog::new(),
        }
    }

    /// Returns the number of live entries.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.table.live()
    }

    /// Returns `true` if the index holds no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the bucket count. Always prime, or zero before first use.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns the largest capacity this index can grow to under its chunk
    /// byte budget.
    #[must_use]
    pub const fn capacity_ceiling(&self) -> usize {
        self.table.capacity_ceiling()
    }

    /// Returns the number of slots ever used, live or tombstoned.
    #[must_use]
    pub const fn slot_count(&self) -> usize {
        self.table.count
    }

    /// Returns the number of tombstoned slots awaiting reuse.
    #[must_use]
    pub const fn free_slots(&self) -> usize {
        self.table.free_count
    }

    /// Returns the structural mutation counter.
    ///
    /// Every successful insert, overwrite, remove, and clear bumps it, as
    /// does every replayed record during rollback.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Returns the configuration this index was built with.
    #[must_use]
    pub const fn config(&self) -> Config {
        self.table.config
    }

    /// Returns the hasher builder.
    #[must_use]
    pub const fn hasher(&self) -> &S {
        &self.hasher
    }

    pub(crate) const fn table(&self) -> &Table<K, V> {
        &self.table
    }

    /// Returns an iterator over `(&K, &V)` pairs in slot order.
    #[must_use]
    pub const fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.table)
    }

    /// Returns an iterator over keys in slot order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(key, _)| key)
    }

    /// Returns an iterator over values in slot order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }

    /// Returns a version-checked cursor positioned before the first entry.
    #[must_use]
    pub const fn cursor(&self) -> LiveCursor {
        LiveCursor::new(self.version)
    }

    /// Returns an owning iterator over the entries as of now.
    ///
    /// O(1): the slot array is shared copy-on-write.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot<K, V> {
        Snapshot::new(&self.table)
    }
}

impl<K, V> HashIndex<K, V, DefaultHashBuilder> {
    /// Creates an empty index with the default hasher and configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_hasher(DefaultHashBuilder::default())
    }
}

impl<K: Clone, V: Clone> HashIndex<K, V, DefaultHashBuilder> {
    /// Creates an index sized for at least `capacity` entries.
    ///
    /// The actual capacity is the smallest table prime `>= capacity`.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Self::with_config(Config::new().with_initial_capacity(capacity))
    }

    /// Creates an index from `config`, allocating eagerly when
    /// `config.initial_capacity > 0`.
    pub fn with_config(config: Config) -> Result<Self> {
        Self::with_config_and_hasher(config, DefaultHashBuilder::default())
    }
}

impl<K: Clone, V: Clone, S> HashIndex<K, V, S> {
    /// Creates an index from `config` that hashes with `hasher`.
    pub fn with_config_and_hasher(config: Config, hasher: S) -> Result<Self> {
        config.validate()?;
        let table = if config.initial_capacity > 0 {
            Table::with_capacity(config.initial_capacity, config)?
        } else {
            Table::empty(config)
        };
        Ok(Self {
            table,
            hasher,
            version: 0,
            undo: UndoLog::new(),
        })
    }
}

// ---------------------------------------------------------------------------
// Read operations: K: Hash + Eq, S: BuildHasher
// ---------------------------------------------------------------------------

impl<K: Hash + Eq, V, S: BuildHasher> HashIndex<K, V, S> {
    fn find(&self, key: &K) -> Option<&Slot<K, V>> {
        let hash = hash_code(&self.hasher, key);
        let slot = find_slot(&self.table, hash, key)?;
        self.table.slots.get(slot)
    }

    /// Returns a reference to the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.find(key)?.entry().map(|(_, value)| value)
    }

    /// Returns the stored key and value for `key`.
    #[must_use]
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        self.find(key)?.entry()
    }

    /// Strict lookup: fails with [`Error::KeyNotFound`] on a miss.
    pub fn try_get(&self, key: &K) -> Result<&V> {
        self.get(key).ok_or(Error::KeyNotFound)
    }

    /// Returns `true` if `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Looks up every key in `keys`, returning the values found in order.
    /// Misses are skipped.
    #[must_use]
    pub fn get_many(&self, keys: &[K]) -> Vec<&V> {
        keys.iter().filter_map(|key| self.get(key)).collect()
    }

    /// Picks a live key not in `existing`, starting from a random position
    /// and walking forward in slot order with wraparound.
    ///
    /// Returns `None` when every key is excluded or the index is empty.
    pub fn random_unique_key<R, H>(&self, rng: &mut R, existing: &HashSet<K, H>) -> Option<&K>
    where
        R: Rng + ?Sized,
        H: BuildHasher,
    {
        let len = self.len();
        if len == 0 {
            return None;
        }
        let start = rng.gen_range(0..len);
        self.keys()
            .skip(start)
            .chain(self.keys().take(start))
            .find(|key| !existing.contains(*key))
    }
}

// ---------------------------------------------------------------------------
// Sampling: no trait bounds
// ---------------------------------------------------------------------------

impl<K, V, S> HashIndex<K, V, S> {
    /// Returns a uniformly chosen live key, or `None` if empty.
    ///
    /// O(slot count): slots are walked to the chosen position.
    pub fn random_key<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&K> {
        let len = self.len();
        if len == 0 {
            return None;
        }
        self.keys().nth(rng.gen_range(0..len))
    }
}

impl<K, V: PartialEq, S> HashIndex<K, V, S> {
    /// Returns `true` if any entry holds `value`.
    ///
    /// Unlike [`contains_key`](Self::contains_key) this is a linear scan
    /// over every used slot: values are not indexed.
    #[must_use]
    pub fn contains_value(&self, value: &V) -> bool {
        self.values().any(|v| v == value)
    }
}

// ---------------------------------------------------------------------------
// Write operations: K: Hash + Eq + Clone, V: Clone, S: BuildHasher
// ---------------------------------------------------------------------------

impl<K, V, S> HashIndex<K, V, S>
where
    K: Hash + Eq + Clone,
    V: Clone,
    S: BuildHasher,
{
    /// Inserts `key → value`, overwriting any existing value.
    ///
    /// Returns the previous value, if any. Fails only when growth would
    /// pass the capacity ceiling.
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>> {
        self.insert_with(key, value, OnDuplicate::Overwrite)
    }

    /// Inserts `key → value`, failing with [`Error::DuplicateKey`] if `key`
    /// is already present. The index is unchanged on failure.
    pub fn add(&mut self, key: K, value: V) -> Result<()> {
        self.insert_with(key, value, OnDuplicate::Fail).map(drop)
    }

    fn insert_with(&mut self, key: K, value: V, on_duplicate: OnDuplicate) -> Result<Option<V>> {
        let hash = hash_code(&self.hasher, &key);
        let recorded_key = self.undo.is_active().then(|| key.clone());
        let outcome = insert_slot(&mut self.table, hash, key, value, on_duplicate)?;
        self.version += 1;

        let (record, old) = match outcome {
            InsertOutcome::Inserted { .. } => {
                (recorded_key.map(|key| IndexOp::Inserted { key }), None)
            }
            InsertOutcome::Replaced { old, .. } => (
                recorded_key.map(|key| IndexOp::Replaced {
                    key,
                    old: old.clone(),
                }),
                Some(old),
            ),
        };
        if let Some(record) = record {
            self.undo.append_if_active(|| record);
        }
        Ok(old)
    }

    /// Removes `key`, returning its value. Returns `None` if absent.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let hash = hash_code(&self.hasher, key);
        let (key, value) = remove_slot(&mut self.table, hash, key)?;
        self.version += 1;
        self.undo.append_if_active(|| IndexOp::Removed {
            key,
            value: value.clone(),
        });
        Some(value)
    }

    /// Removes a uniformly chosen entry, returning it. Recorded for
    /// rollback like [`remove`](Self::remove).
    pub fn remove_random<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<(K, V)> {
        let key = self.random_key(rng)?.clone();
        let value = self.remove(&key)?;
        Some((key, value))
    }

    /// Removes every entry.
    ///
    /// Outside a transaction the arrays are reset in place and capacity is
    /// kept. Inside one, the whole table is set aside in the undo log and
    /// replaced by an unallocated one.
    pub fn clear(&mut self) {
        self.version += 1;
        if self.undo.is_active() {
            let fresh = Table::empty(self.table.config);
            let previous = mem::replace(&mut self.table, fresh);
            self.undo
                .append_if_active(|| IndexOp::Cleared { table: previous });
        } else {
            self.table.reset();
        }
    }
}

impl<K, V, S> RollbackOperation<HashIndex<K, V, S>> for IndexOp<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
    S: BuildHasher,
{
    fn rollback(&self, index: &mut HashIndex<K, V, S>) {
        match self {
            Self::Inserted { key } => {
                replayed(index.remove(key).map(drop).ok_or(Error::KeyNotFound));
            }
            Self::Replaced { key, old } => {
                let previous = index.insert(key.clone(), old.clone());
                replayed(previous.and_then(|v| v.map(drop).ok_or(Error::KeyNotFound)));
            }
            Self::Removed { key, value } => {
                replayed(index.add(key.clone(), value.clone()));
            }
            Self::Cleared { table } => {
                index.table = table.share();
                index.version += 1;
            }
        }
    }
}

impl<K, V, S> Transactional for HashIndex<K, V, S>
where
    K: Hash + Eq + Clone,
    V: Clone,
    S: BuildHasher,
{
    fn begin_transaction(&mut self) {
        self.undo.begin();
    }

    fn commit_transaction(&mut self) {
        self.undo.commit();
    }

    fn rollback_transaction(&mut self) {
        let mut log = mem::take(&mut self.undo);
        log.rollback(self);
        self.undo = log;
    }

    fn in_transaction(&self) -> bool {
        self.undo.is_active()
    }
}

// ---------------------------------------------------------------------------
// Trait impls
// ---------------------------------------------------------------------------

impl<K, V, S: Default> Default for HashIndex<K, V, S> {
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K: Clone, V: Clone, S: Clone> Clone for HashIndex<K, V, S> {
    /// Structural copy with fresh chunks. The clone starts outside any
    /// transaction.
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            hasher: self.hasher.clone(),
            version: self.version,
            undo: UndoLog::new(),
        }
    }
}

impl<K, V, S> fmt::Debug for HashIndex<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashIndex")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field("free_slots", &self.free_slots())
            .field("version", &self.version)
            .field("undo", &self.undo)
            .finish_non_exhaustive()
    }
}

impl<K, V, S> Extend<(K, V)> for HashIndex<K, V, S>
where
    K: Hash + Eq + Clone,
    V: Clone,
    S: BuildHasher,
{
    /// Inserts every pair, overwriting duplicates.
    ///
    /// # Panics
    ///
    /// Panics if the index would grow past its capacity ceiling.
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            if let Err(err) = self.insert(key, value) {
                panic!("extend failed: {err}");
            }
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for HashIndex<K, V, S>
where
    K: Hash + Eq + Clone,
    V: Clone,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut index = Self::default();
        index.extend(iter);
        index
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> ops::Index<&K> for HashIndex<K, V, S> {
    type Output = V;

    fn index(&self, key: &K) -> &V {
        match self.get(key) {
            Some(value) => value,
            None => panic!("key not found"),
        }
    }
}

impl<'a, K, V, S> IntoIterator for &'a HashIndex<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}
