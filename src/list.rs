//! Growable list on a segmented array, with undo support.

use std::fmt;
use std::mem;
use std::ops;

use crate::config::Config;
use crate::error::{Error, Result, check_range};
use crate::segmented::SegmentedArray;
use crate::undo::{RollbackOperation, Transactional, UndoLog, replayed};

/// Minimum capacity allocated by the first growth.
const MIN_GROWTH: usize = 4;

/// Index-addressed list whose backing store is a [`SegmentedArray`].
///
/// The backing array's length is the list's capacity; positions at
/// `len..` hold default values. Growth doubles capacity (at least to 4),
/// clamped to the backing array's ceiling.
///
/// ```
/// use segmented_store::{SegmentedList, Transactional};
///
/// let mut list = SegmentedList::new();
/// list.push('a')?;
/// list.begin_transaction();
/// list.insert(0, 'z')?;
/// list.remove_at(1)?;
/// list.rollback_transaction();
/// assert_eq!(list.to_vec(), vec!['a']);
/// # Ok::<(), segmented_store::Error>(())
/// ```
pub struct SegmentedList<T> {
    items: SegmentedArray<T>,
    len: usize,
    version: u64,
    config: Config,
    undo: UndoLog<ListOp<T>>,
}

/// Inverse of one list mutation.
pub(crate) enum ListOp<T> {
    Inserted { index: usize },
    BulkInserted { index: usize, count: usize },
    Removed { index: usize, value: T },
    BulkRemoved { index: usize, values: Vec<T> },
    Replaced { index: usize, old: T },
    Cleared { items: SegmentedArray<T>, len: usize },
}

impl<T> SegmentedList<T> {
    /// Creates an empty list with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        let config = Config::new();
        Self {
            items: SegmentedArray::empty(config.chunk_bytes),
            len: 0,
            version: 0,
            config,
            undo: UndoLog::new(),
        }
    }

    /// Returns the number of elements.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the list holds no elements.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of elements the backing store can hold.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.items.len()
    }

    /// Returns the mutation counter.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Returns the element at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        if index < self.len {
            self.items.get(index)
        } else {
            None
        }
    }

    /// Iterates elements in order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        (0..self.len).map(|i| &self.items[i])
    }

    const fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.len {
            return Err(Error::IndexOutOfRange {
                index,
                len: self.len,
            });
        }
        Ok(())
    }
}

impl<T: PartialEq> SegmentedList<T> {
    /// Returns the first index holding `value`.
    #[must_use]
    pub fn index_of(&self, value: &T) -> Option<usize> {
        self.iter().position(|v| v == value)
    }

    /// Returns `true` if any element equals `value`.
    #[must_use]
    pub fn contains(&self, value: &T) -> bool {
        self.index_of(value).is_some()
    }
}

impl<T: Clone + Default> SegmentedList<T> {
    /// Creates a list from `config`, allocating `config.initial_capacity`.
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            items: SegmentedArray::with_chunk_bytes(config.chunk_bytes, config.initial_capacity)?,
            len: 0,
            version: 0,
            config,
            undo: UndoLog::new(),
        })
    }

    /// Creates a list with room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Self::with_config(Config::new().with_initial_capacity(capacity))
    }

    fn ensure_capacity(&mut self, min: usize) -> Result<()> {
        let capacity = self.capacity();
        if capacity >= min {
            return Ok(());
        }
        let ceiling = self.items.capacity_ceiling();
        if min > ceiling {
            return Err(Error::CapacityExceeded {
                requested: min,
                ceiling,
            });
        }
        let wanted = capacity.saturating_mul(2).max(MIN_GROWTH).max(min);
        let new_capacity = if wanted > ceiling {
            tracing::warn!(wanted, ceiling, "list capacity clamped to ceiling");
            ceiling
        } else {
            wanted
        };
        let mut grown = SegmentedArray::with_chunk_bytes(self.config.chunk_bytes, new_capacity)?;
        SegmentedArray::copy(&self.items, 0, &mut grown, 0, self.len)?;
        tracing::debug!(
            old_capacity = capacity,
            new_capacity,
            len = self.len,
            "list backing store grown"
        );
        self.items = grown;
        Ok(())
    }

    /// Appends `value`.
    pub fn push(&mut self, value: T) -> Result<()> {
        self.insert(self.len, value)
    }

    /// Inserts `value` at `index`, shifting later elements up by one.
    ///
    /// `index == len()` appends.
    pub fn insert(&mut self, index: usize, value: T) -> Result<()> {
        if index > self.len {
            return Err(Error::IndexOutOfRange {
                index,
                len: self.len,
            });
        }
        self.ensure_capacity(self.len + 1)?;
        self.items.copy_within(index, index + 1, self.len - index)?;
        self.items.set(index, value)?;
        self.len += 1;
        self.version += 1;
        self.undo.append_if_active(|| ListOp::Inserted { index });
        Ok(())
    }

    /// Inserts every element of `values` at `index`, in order.
    pub fn insert_slice(&mut self, index: usize, values: &[T]) -> Result<()> {
        if index > self.len {
            return Err(Error::IndexOutOfRange {
                index,
                len: self.len,
            });
        }
        let count = values.len();
        if count == 0 {
            return Ok(());
        }
        let needed = self.len.checked_add(count).ok_or(Error::InvalidArgument {
            detail: "list length overflows usize",
        })?;
        self.ensure_capacity(needed)?;
        self.items.copy_within(index, index + count, self.len - index)?;
        self.items.copy_from(index, values)?;
        self.len = needed;
        self.version += 1;
        self.undo
            .append_if_active(|| ListOp::BulkInserted { index, count });
        Ok(())
    }

    /// Removes and returns the element at `index`, shifting later elements
    /// down by one.
    pub fn remove_at(&mut self, index: usize) -> Result<T> {
        self.check_index(index)?;
        let value = mem::take(&mut self.items[index]);
        self.items
            .copy_within(index + 1, index, self.len - index - 1)?;
        self.len -= 1;
        self.items.clear_range(self.len, 1)?;
        self.version += 1;
        self.undo.append_if_active(|| ListOp::Removed {
            index,
            value: value.clone(),
        });
        Ok(value)
    }

    /// Removes `count` elements starting at `index` and returns them.
    pub fn remove_range(&mut self, index: usize, count: usize) -> Result<Vec<T>> {
        check_range(index, count, self.len)?;
        if count == 0 {
            return Ok(Vec::new());
        }
        let mut values = vec![T::default(); count];
        self.items.copy_to(index, &mut values)?;
        let tail = self.len - index - count;
        self.items.copy_within(index + count, index, tail)?;
        self.len -= count;
        self.items.clear_range(self.len, count)?;
        self.version += 1;
        self.undo.append_if_active(|| ListOp::BulkRemoved {
            index,
            values: values.clone(),
        });
        Ok(values)
    }

    /// Replaces the element at `index`, returning the old one.
    pub fn set(&mut self, index: usize, value: T) -> Result<T> {
        self.check_index(index)?;
        let old = mem::replace(&mut self.items[index], value);
        self.version += 1;
        self.undo.append_if_active(|| ListOp::Replaced {
            index,
            old: old.clone(),
        });
        Ok(old)
    }

    /// Removes every element.
    ///
    /// Inside a transaction the backing store is set aside whole in the
    /// undo log and the list restarts unallocated.
    pub fn clear(&mut self) {
        self.version += 1;
        if self.undo.is_active() {
            let fresh = SegmentedArray::empty(self.config.chunk_bytes);
            let items = mem::replace(&mut self.items, fresh);
            let len = mem::take(&mut self.len);
            self.undo.append_if_active(|| ListOp::Cleared { items, len });
        } else {
            self.items.clear();
            self.len = 0;
        }
    }

    /// Shrinks the backing store to `len()` when less than 90% is used.
    pub fn trim_excess(&mut self) -> Result<()> {
        let capacity = self.capacity();
        let threshold = capacity / 10 * 9 + capacity % 10 * 9 / 10;
        if self.len < threshold {
            self.items.resize(self.len)?;
        }
        Ok(())
    }

    /// Collects the elements into a `Vec`.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

impl<T: Clone + Default> RollbackOperation<SegmentedList<T>> for ListOp<T> {
    fn rollback(&self, list: &mut SegmentedList<T>) {
        match self {
            Self::Inserted { index } => {
                replayed(list.remove_at(*index));
            }
            Self::BulkInserted { index, count } => {
                replayed(list.remove_range(*index, *count));
            }
            Self::Removed { index, value } => replayed(list.insert(*index, value.clone())),
            Self::BulkRemoved { index, values } => replayed(list.insert_slice(*index, values)),
            Self::Replaced { index, old } => {
                replayed(list.set(*index, old.clone()));
            }
            Self::Cleared { items, len } => {
                list.items = items.share();
                list.len = *len;
                list.version += 1;
            }
        }
    }
}

impl<T: Clone + Default> Transactional for SegmentedList<T> {
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

impl<T> Default for SegmentedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for SegmentedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SegmentedList")
            .field("len", &self.len)
            .field("capacity", &self.capacity())
            .field("undo", &self.undo)
            .finish_non_exhaustive()
    }
}

impl<T> ops::Index<usize> for SegmentedList<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        match self.get(index) {
            Some(value) => value,
            None => panic!("index {index} out of range for length {}", self.len),
        }
    }
}

impl<T: Clone + Default> Extend<T> for SegmentedList<T> {
    /// Appends every element.
    ///
    /// # Panics
    ///
    /// Panics if the list would grow past its capacity ceiling.
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            if let Err(err) = self.push(value) {
                panic!("extend failed: {err}");
            }
        }
    }
}

impl<T: Clone + Default> FromIterator<T> for SegmentedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}
