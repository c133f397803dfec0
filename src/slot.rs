//! Slot and link types of the hash index.

use std::fmt;

/// Index of a slot, or "none". Same width as a 32-bit bucket entry.
#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) struct Link(u32);

impl Link {
    /// End of a chain or of the free list.
    pub(crate) const NONE: Self = Self(u32::MAX);

    /// Largest slot index a link can carry; `u32::MAX` is [`Link::NONE`].
    pub(crate) const MAX_INDEX: usize = u32::MAX as usize - 1;

    /// Link to slot `index`. `index` must not exceed [`Link::MAX_INDEX`].
    pub(crate) const fn to(index: usize) -> Self {
        Self(index as u32)
    }

    /// Slot index, or `None` at the end of a chain.
    pub(crate) const fn get(self) -> Option<usize> {
        if self.0 == u32::MAX {
            None
        } else {
            Some(self.0 as usize)
        }
    }
}

impl Default for Link {
    fn default() -> Self {
        Self::NONE
    }
}

impl fmt::Debug for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(index) => write!(f, "Link({index})"),
            None => f.write_str("Link(NONE)"),
        }
    }
}

/// One storage cell of the slot array.
///
/// A removed slot becomes `Vacant` (tombstoned) and is threaded into the
/// free list through `next_free`. Slots are never compacted.
#[derive(Clone)]
pub(crate) enum Slot<K, V> {
    /// Free: never used, or removed and awaiting reuse.
    Vacant { next_free: Link },
    /// Live entry in the chain of bucket `hash % capacity`.
    Occupied {
        hash: u32,
        next: Link,
        key: K,
        value: V,
    },
}

impl<K, V> Slot<K, V> {
    /// Key and value of a live slot.
    pub(crate) const fn entry(&self) -> Option<(&K, &V)> {
        match self {
            Self::Occupied { key, value, .. } => Some((key, value)),
            Self::Vacant { .. } => None,
        }
    }

    /// Chain successor of a live slot, free-list successor of a vacant one.
    pub(crate) const fn next(&self) -> Link {
        match self {
            Self::Occupied { next, .. } => *next,
            Self::Vacant { next_free } => *next_free,
        }
    }

    /// Rewrites the successor link.
    pub(crate) const fn set_next(&mut self, link: Link) {
        match self {
            Self::Occupied { next, .. } => *next = link,
            Self::Vacant { next_free } => *next_free = link,
        }
    }

    pub(crate) const fn is_occupied(&self) -> bool {
        matches!(self, Self::Occupied { .. })
    }
}

impl<K, V> Default for Slot<K, V> {
    fn default() -> Self {
        Self::Vacant {
            next_free: Link::NONE,
        }
    }
}
