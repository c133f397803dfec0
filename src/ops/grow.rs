//! Growth: reallocate to the next prime and rebuild chains.

use std::mem;

use crate::error::{Error, Result};
use crate::prime;
use crate::segmented::SegmentedArray;
use crate::slot::{Link, Slot};
use crate::table::{Table, clamp_capacity};

/// Grows `table` to `prime::expand(capacity)`, clamped to the ceiling.
///
/// Slots keep their positions, so the free list and any slot index held
/// elsewhere stay valid. Chains are rebuilt from the stored hash codes.
/// New arrays are fully allocated before the old ones are released.
pub fn grow<K: Clone, V: Clone>(table: &mut Table<K, V>) -> Result<()> {
    let old_capacity = table.capacity();
    let new_capacity = next_capacity(old_capacity, table.capacity_ceiling())?;
    let chunk_bytes = table.config.chunk_bytes;

    let mut buckets = SegmentedArray::<Link>::with_chunk_bytes(chunk_bytes, new_capacity)?;
    let mut slots = SegmentedArray::<Slot<K, V>>::with_chunk_bytes(chunk_bytes, new_capacity)?;

    let old_slots = mem::take(&mut table.slots);
    for (i, mut slot) in old_slots.into_values().take(table.count).enumerate() {
        if let Slot::Occupied { hash, next, .. } = &mut slot {
            let bucket = *hash as usize % new_capacity;
            *next = buckets[bucket];
            buckets[bucket] = Link::to(i);
        }
        slots[i] = slot;
    }

    table.buckets = buckets;
    table.slots = slots;
    tracing::debug!(
        old_capacity,
        new_capacity,
        live = table.live(),
        "hash index grown"
    );
    Ok(())
}

/// Picks the capacity after `old`, or fails if no larger prime fits.
pub(crate) fn next_capacity(old: usize, ceiling: usize) -> Result<usize> {
    let requested = prime::expand(old);
    if requested <= old {
        return Err(Error::CapacityExceeded {
            requested: old.saturating_add(1),
            ceiling: requested,
        });
    }
    clamp_capacity(requested, old, ceiling)
}
