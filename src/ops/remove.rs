//! Removal: unlink from the chain and tombstone the slot.

use std::mem;

use crate::slot::{Link, Slot};
use crate::table::Table;

/// Removes `key` from `table`, returning the stored key and value.
///
/// The slot becomes `Vacant` and heads the free list. Returns `None` if
/// the key is absent.
pub fn remove_slot<K, V>(table: &mut Table<K, V>, hash: u32, key: &K) -> Option<(K, V)>
where
    K: Eq + Clone,
    V: Clone,
{
    if table.capacity() == 0 {
        return None;
    }
    let bucket = table.bucket_of(hash);
    let mut prev: Option<usize> = None;
    let mut cursor = table.buckets[bucket];

    while let Some(i) = cursor.get() {
        let (found, next) = match &table.slots[i] {
            Slot::Occupied {
                hash: slot_hash,
                next,
                key: slot_key,
                ..
            } => (*slot_hash == hash && slot_key == key, *next),
            Slot::Vacant { .. } => return None,
        };

        if found {
            match prev {
                None => table.buckets[bucket] = next,
                Some(p) => table.slots[p].set_next(next),
            }
            let tombstone = Slot::Vacant {
                next_free: table.free_head,
            };
            let removed = mem::replace(&mut table.slots[i], tombstone);
            table.free_head = Link::to(i);
            table.free_count += 1;
            return match removed {
                Slot::Occupied { key, value, .. } => Some((key, value)),
                Slot::Vacant { .. } => None,
            };
        }

        prev = Some(i);
        cursor = next;
    }
    None
}
