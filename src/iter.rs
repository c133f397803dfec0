//! Enumeration over hash indexes.
//!
//! Three flavors:
//!
//! - [`Iter`] borrows the index. The borrow checker rules out concurrent
//!   mutation, so no version check is needed.
//! - [`LiveCursor`] holds only a position and the version it was created at.
//!   It is passed the index on every step and fails with
//!   [`Error::ConcurrentModification`] once the index has been mutated.
//! - [`Snapshot`] owns a copy-on-write view of the slot array taken at
//!   creation. Later mutations, growth, or clears of the index never reach
//!   it.

use std::fmt;

use crate::error::{Error, Result};
use crate::index::HashIndex;
use crate::segmented::SegmentedArray;
use crate::slot::Slot;
use crate::table::Table;

/// Iterator over `(&K, &V)` pairs of a [`HashIndex`], in slot order.
pub struct Iter<'a, K, V> {
    slots: &'a SegmentedArray<Slot<K, V>>,
    pos: usize,
    end: usize,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) const fn new(table: &'a Table<K, V>) -> Self {
        Self {
            slots: &table.slots,
            pos: 0,
            end: table.count,
            remaining: table.live(),
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        while self.pos < self.end {
            let slot = self.slots.get(self.pos)?;
            self.pos += 1;
            if let Some(entry) = slot.entry() {
                self.remaining -= 1;
                return Some(entry);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter")
            .field("remaining", &self.remaining)
            .finish_non_exhaustive()
    }
}

/// Version-checked position inside a [`HashIndex`].
///
/// A cursor does not borrow the index, so the index may be mutated while
/// the cursor is alive. Every call afterwards reports
/// [`Error::ConcurrentModification`].
///
/// ```
/// use segmented_store::HashIndex;
///
/// let mut index: HashIndex<u32, &str> = HashIndex::new();
/// index.insert(1, "one")?;
/// let mut cursor = index.cursor();
/// assert!(cursor.move_next(&index)?);
/// assert_eq!(cursor.current(&index)?, Some((&1, &"one")));
/// index.insert(2, "two")?;
/// assert!(cursor.move_next(&index).is_err());
/// # Ok::<(), segmented_store::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct LiveCursor {
    version: u64,
    next: usize,
    current: Option<usize>,
}

impl LiveCursor {
    pub(crate) const fn new(version: u64) -> Self {
        Self {
            version,
            next: 0,
            current: None,
        }
    }

    const fn check<K, V, S>(&self, index: &HashIndex<K, V, S>) -> Result<()> {
        if index.version() != self.version {
            return Err(Error::ConcurrentModification);
        }
        Ok(())
    }

    /// Advances to the next live entry. Returns `false` past the end.
    pub fn move_next<K, V, S>(&mut self, index: &HashIndex<K, V, S>) -> Result<bool> {
        self.check(index)?;
        let table = index.table();
        while self.next < table.count {
            let i = self.next;
            self.next += 1;
            if table.slots[i].is_occupied() {
                self.current = Some(i);
                return Ok(true);
            }
        }
        self.current = None;
        Ok(false)
    }

    /// Returns the entry the cursor is positioned on, if any.
    pub fn current<'a, K, V, S>(
        &self,
        index: &'a HashIndex<K, V, S>,
    ) -> Result<Option<(&'a K, &'a V)>> {
        self.check(index)?;
        Ok(self
            .current
            .and_then(|i| index.table().slots.get(i))
            .and_then(Slot::entry))
    }

    /// Rewinds to before the first entry and adopts the index's current
    /// version.
    pub const fn reset<K, V, S>(&mut self, index: &HashIndex<K, V, S>) {
        self.version = index.version();
        self.next = 0;
        self.current = None;
    }
}

/// Owning iterator over a frozen view of a [`HashIndex`].
///
/// Taking a snapshot is O(1): the slot array is shared copy-on-write, so
/// the index only pays for a chunk copy the first time it writes into a
/// chunk the snapshot still holds. Yields cloned pairs.
pub struct Snapshot<K, V> {
    slots: SegmentedArray<Slot<K, V>>,
    pos: usize,
    end: usize,
    remaining: usize,
}

impl<K, V> Snapshot<K, V> {
    pub(crate) fn new(table: &Table<K, V>) -> Self {
        Self {
            slots: table.slots.share(),
            pos: 0,
            end: table.count,
            remaining: table.live(),
        }
    }
}

impl<K: Clone, V: Clone> Iterator for Snapshot<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        while self.pos < self.end {
            let slot = self.slots.get(self.pos)?;
            self.pos += 1;
            if let Some((key, value)) = slot.entry() {
                self.remaining -= 1;
                return Some((key.clone(), value.clone()));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K: Clone, V: Clone> ExactSizeIterator for Snapshot<K, V> {}

impl<K, V> fmt::Debug for Snapshot<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field("remaining", &self.remaining)
            .finish_non_exhaustive()
    }
}
