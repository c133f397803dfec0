//! Raw bucket/slot storage behind a hash index.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::prime;
use crate::segmented::SegmentedArray;
use crate::slot::{Link, Slot};

/// Bucket and slot arrays plus free-list bookkeeping.
///
/// `buckets[h % capacity]` heads the chain of slots with hash `h`.
/// `count` is the high-water mark of used slots; slots at `count..` have
/// never been touched. Both arrays always have the same, prime, length.
pub(crate) struct Table<K, V> {
    pub(crate) buckets: SegmentedArray<Link>,
    pub(crate) slots: SegmentedArray<Slot<K, V>>,
    pub(crate) count: usize,
    pub(crate) free_head: Link,
    pub(crate) free_count: usize,
    pub(crate) config: Config,
}

impl<K, V> Table<K, V> {
    /// Unallocated table; the first insert sizes it.
    pub(crate) fn empty(config: Config) -> Self {
        Self {
            buckets: SegmentedArray::empty(config.chunk_bytes),
            slots: SegmentedArray::empty(config.chunk_bytes),
            count: 0,
            free_head: Link::NONE,
            free_count: 0,
            config,
        }
    }

    pub(crate) const fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub(crate) const fn live(&self) -> usize {
        self.count - self.free_count
    }

    pub(crate) const fn bucket_of(&self, hash: u32) -> usize {
        hash as usize % self.capacity()
    }

    /// Largest capacity both arrays can address under the configured budget,
    /// and that every slot index still fits in a [`Link`].
    pub(crate) const fn capacity_ceiling(&self) -> usize {
        let buckets = SegmentedArray::<Link>::ceiling_for(self.config.chunk_bytes);
        let slots = SegmentedArray::<Slot<K, V>>::ceiling_for(self.config.chunk_bytes);
        let ceiling = if buckets < slots { buckets } else { slots };
        if ceiling < Link::MAX_INDEX {
            ceiling
        } else {
            Link::MAX_INDEX
        }
    }

    /// Copy-on-write view of the whole table.
    pub(crate) fn share(&self) -> Self {
        Self {
            buckets: self.buckets.share(),
            slots: self.slots.share(),
            count: self.count,
            free_head: self.free_head,
            free_count: self.free_count,
            config: self.config,
        }
    }
}

impl<K: Clone, V: Clone> Clone for Table<K, V> {
    /// Deep copy: fresh chunks for both arrays.
    fn clone(&self) -> Self {
        Self {
            buckets: self.buckets.clone(),
            slots: self.slots.clone(),
            count: self.count,
            free_head: self.free_head,
            free_count: self.free_count,
            config: self.config,
        }
    }
}

impl<K: Clone, V: Clone> Table<K, V> {
    /// Allocates a table of prime size `>= capacity`.
    pub(crate) fn with_capacity(capacity: usize, config: Config) -> Result<Self> {
        let mut table = Self::empty(config);
        let size = clamp_capacity(prime::next_prime(capacity), 0, table.capacity_ceiling())?;
        table.buckets = SegmentedArray::with_chunk_bytes(config.chunk_bytes, size)?;
        table.slots = SegmentedArray::with_chunk_bytes(config.chunk_bytes, size)?;
        Ok(table)
    }

    /// Empties the table in place, keeping its capacity.
    pub(crate) fn reset(&mut self) {
        self.buckets.clear();
        self.slots.clear();
        self.count = 0;
        self.free_head = Link::NONE;
        self.free_count = 0;
    }
}

/// Fits a prime `requested` under `ceiling`, stepping down to the largest
/// prime that still exceeds `current`.
pub(crate) fn clamp_capacity(requested: usize, current: usize, ceiling: usize) -> Result<usize> {
    if requested <= ceiling {
        return Ok(requested);
    }
    let clamped = prime::prev_prime(ceiling)
        .filter(|&p| p > current)
        .ok_or(Error::CapacityExceeded { requested, ceiling })?;
    tracing::warn!(requested, ceiling, clamped, "hash index capacity clamped to ceiling");
    Ok(clamped)
}
