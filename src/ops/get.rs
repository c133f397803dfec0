//! Lookup: walk one bucket chain.

use crate::slot::Slot;
use crate::table::Table;

/// Returns the slot index holding `key`, whose masked hash is `hash`.
///
/// Compares the stored hash code first and the full key only on a match.
pub fn find_slot<K: Eq, V>(table: &Table<K, V>, hash: u32, key: &K) -> Option<usize> {
    if table.capacity() == 0 {
        return None;
    }
    let mut cursor = table.buckets[table.bucket_of(hash)];
    while let Some(i) = cursor.get() {
        match &table.slots[i] {
            Slot::Occupied {
                hash: slot_hash,
                next,
                key: slot_key,
                ..
            } => {
                if *slot_hash == hash && slot_key == key {
                    return Some(i);
                }
                cursor = *next;
            }
            // Chains only link live slots.
            Slot::Vacant { .. } => return None,
        }
    }
    None
}
