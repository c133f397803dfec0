//! Chunked storage primitives for large in-memory caches.
//!
//! Every collection here stores its elements in fixed-budget chunks, so no
//! single allocation grows with the collection. Millions of entries never
//! require one huge contiguous block.
//!
//! # Components
//!
//! - [`SegmentedArray`]: one logical indexable sequence stored as bounded
//!   chunks, with cross-chunk bulk copy and an O(1) copy-on-write view.
//! - [`prime`]: capacity selection from a curated prime table.
//! - [`HashIndex`]: open-chained key → value table whose buckets and slots
//!   both live in segmented arrays. Removed slots are reused through a free
//!   list; growth rebuilds chains without moving slots.
//! - [`UndoLog`]: optional begin/commit/rollback over a sequence of
//!   mutations, shared by [`HashIndex`] and [`SegmentedList`] through the
//!   [`Transactional`] and [`RollbackOperation`] traits.
//! - [`SyncHashIndex`]: a hash index behind one coarse lock.
//!
//! # Key properties
//!
//! - **Bounded allocations**: each chunk fits the configured byte budget
//! - **Stable slots**: a live entry keeps its slot through growth
//! - **Frozen snapshots**: snapshot iterators never observe later writes
//! - **Zero `unsafe`**: enforced by `#![forbid(unsafe_code)]`
//!
//! Transactions are single-writer undo logs. They do not nest and give no
//! isolation from concurrent readers.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod hash;
pub mod iter;
pub mod prime;
pub mod segmented;
pub mod undo;

mod cursor;
mod index;
mod index_sync;
mod list;
mod ops;
mod slot;
mod table;

#[cfg(test)]
mod tests;

pub use config::Config;
pub use error::{Error, Result};
pub use index::HashIndex;
pub use index_sync::SyncHashIndex;
pub use list::SegmentedList;
pub use segmented::SegmentedArray;
pub use undo::{RollbackOperation, Transactional, UndoLog};
