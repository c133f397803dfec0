//! Insertion: reuse a free slot, append, or grow.

use std::mem;

use crate::error::{Error, Result};
use crate::ops::get::find_slot;
use crate::ops::grow::grow;
use crate::slot::{Link, Slot};
use crate::table::Table;

/// What to do when the key is already present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnDuplicate {
    /// Replace the stored value.
    Overwrite,
    /// Leave the table untouched and report [`Error::DuplicateKey`].
    Fail,
}

/// Outcome of a successful insert.
pub enum InsertOutcome<V> {
    /// A new entry was written into slot `slot`.
    Inserted { slot: usize },
    /// The value in slot `slot` was replaced; `old` is the previous value.
    Replaced { slot: usize, old: V },
}

/// Inserts `key → value` into `table`.
///
/// Slot choice: pop the free list if non-empty, otherwise append at
/// `count`, growing first when the slot array is full. The new slot is
/// pushed onto the front of its bucket chain.
pub fn insert_slot<K, V>(
    table: &mut Table<K, V>,
    hash: u32,
    key: K,
    value: V,
    on_duplicate: OnDuplicate,
) -> Result<InsertOutcome<V>>
where
    K: Eq + Clone,
    V: Clone,
{
    if table.capacity() == 0 {
        *table = Table::with_capacity(table.config.initial_capacity, table.config)?;
    }

    if let Some(slot) = find_slot(table, hash, &key) {
        if on_duplicate == OnDuplicate::Fail {
            return Err(Error::DuplicateKey);
        }
        return match &mut table.slots[slot] {
            Slot::Occupied { value: stored, .. } => Ok(InsertOutcome::Replaced {
                slot,
                old: mem::replace(stored, value),
            }),
            Slot::Vacant { .. } => Err(Error::KeyNotFound),
        };
    }

    let slot = match table.free_head.get() {
        Some(slot) => {
            table.free_head = table.slots[slot].next();
            table.free_count -= 1;
            slot
        }
        None => {
            if table.count == table.slots.len() {
                grow(table)?;
            }
            table.count += 1;
            table.count - 1
        }
    };

    let bucket = table.bucket_of(hash);
    let next = table.buckets[bucket];
    table.slots[slot] = Slot::Occupied {
        hash,
        next,
        key,
        value,
    };
    table.buckets[bucket] = Link::to(slot);
    Ok(InsertOutcome::Inserted { slot })
}
