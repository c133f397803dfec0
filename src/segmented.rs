//! Segmented array: one logical sequence stored as fixed-budget chunks.
//!
//! No single allocation ever exceeds the chunk byte budget, so arrays of
//! millions of elements are built from many small blocks. Logical index `i`
//! lives at chunk `i / chunk_capacity`, offset `i % chunk_capacity`.
//!
//! # Layout
//!
//! - Every chunk but the last holds exactly `chunk_capacity` elements.
//! - The last chunk holds the remainder. There is no trailing empty chunk:
//!   a length that is an exact multiple of `chunk_capacity` uses exactly
//!   `len / chunk_capacity` chunks, and an empty array has no chunks.
//! - `capacity_ceiling() == chunk_capacity²`. Growth beyond it fails with
//!   [`Error::CapacityExceeded`].
//!
//! # Sharing
//!
//! Chunks are reference counted. [`SegmentedArray::share`] hands out an O(1)
//! view. Every write goes through [`Arc::make_mut`], so a write clones only
//! the chunk it touches and only while that chunk is still shared. Resize
//! always builds a new chunk table and swaps it in. A shared view is
//! therefore frozen by construction.

use std::fmt;
use std::mem;
use std::ops;
use std::sync::Arc;

use crate::cursor::ChunkCursor;
use crate::error::{Error, Result, check_range};

/// Default per-chunk byte budget (80 KiB).
pub const DEFAULT_CHUNK_BYTES: usize = 81_920;

type Chunk<T> = Arc<Vec<T>>;

/// Logical array of `T` stored as a sequence of bounded chunks.
pub struct SegmentedArray<T> {
    chunk_capacity: usize,
    len: usize,
    chunks: Arc<Vec<Chunk<T>>>,
}

// ---------------------------------------------------------------------------
// Construction & accessors: no trait bounds
// ---------------------------------------------------------------------------

impl<T> SegmentedArray<T> {
    /// Elements per chunk for a given byte budget.
    ///
    /// Zero-sized types count as one byte.
    #[must_use]
    pub const fn chunk_capacity_for(chunk_bytes: usize) -> usize {
        let size = if mem::size_of::<T>() == 0 {
            1
        } else {
            mem::size_of::<T>()
        };
        let capacity = chunk_bytes / size;
        if capacity == 0 { 1 } else { capacity }
    }

    /// Largest logical length addressable with a given byte budget.
    #[must_use]
    pub const fn ceiling_for(chunk_bytes: usize) -> usize {
        let capacity = Self::chunk_capacity_for(chunk_bytes);
        capacity.saturating_mul(capacity)
    }

    /// Creates a zero-length array with the given byte budget.
    #[must_use]
    pub fn empty(chunk_bytes: usize) -> Self {
        Self {
            chunk_capacity: Self::chunk_capacity_for(chunk_bytes),
            len: 0,
            chunks: Arc::new(Vec::new()),
        }
    }

    /// Returns the logical length.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the logical length is zero.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of elements per full chunk.
    #[must_use]
    pub const fn chunk_capacity(&self) -> usize {
        self.chunk_capacity
    }

    /// Returns the number of allocated chunks.
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Returns the largest logical length this layout can address.
    #[must_use]
    pub const fn capacity_ceiling(&self) -> usize {
        self.chunk_capacity.saturating_mul(self.chunk_capacity)
    }

    /// Translates a logical index into `(chunk, offset)`.
    #[must_use]
    pub const fn locate(&self, index: usize) -> (usize, usize) {
        (index / self.chunk_capacity, index % self.chunk_capacity)
    }

    /// Returns a reference to the element at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len {
            return None;
        }
        let (chunk, offset) = self.locate(index);
        self.chunks.get(chunk)?.get(offset)
    }

    /// Iterates elements in logical order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> {
        self.chunks.iter().flat_map(|chunk| chunk.iter())
    }

    /// Returns an O(1) copy-on-write view of this array.
    ///
    /// Writes on either side clone the touched chunk first, so neither
    /// observes the other's later mutations.
    #[must_use]
    pub fn share(&self) -> Self {
        Self {
            chunk_capacity: self.chunk_capacity,
            len: self.len,
            chunks: Arc::clone(&self.chunks),
        }
    }

    fn check_len(&self, len: usize) -> Result<()> {
        let ceiling = self.capacity_ceiling();
        if len > ceiling {
            return Err(Error::CapacityExceeded {
                requested: len,
                ceiling,
            });
        }
        Ok(())
    }
}

const fn chunk_len(chunk_capacity: usize, len: usize, chunk: usize) -> usize {
    let remaining = len - chunk * chunk_capacity;
    if remaining < chunk_capacity {
        remaining
    } else {
        chunk_capacity
    }
}

// ---------------------------------------------------------------------------
// Allocation: T: Clone + Default
// ---------------------------------------------------------------------------

impl<T: Clone + Default> SegmentedArray<T> {
    /// Creates an array of `len` default elements with the default budget.
    pub fn new(len: usize) -> Result<Self> {
        Self::with_chunk_bytes(DEFAULT_CHUNK_BYTES, len)
    }

    /// Creates an array whose chunks fit in `chunk_bytes` bytes.
    pub fn with_chunk_bytes(chunk_bytes: usize, len: usize) -> Result<Self> {
        Self::build(Self::chunk_capacity_for(chunk_bytes), len)
    }

    /// Creates an array with an explicit element count per chunk.
    pub fn with_chunk_capacity(chunk_capacity: usize, len: usize) -> Result<Self> {
        if chunk_capacity == 0 {
            return Err(Error::InvalidArgument {
                detail: "chunk capacity must be non-zero",
            });
        }
        Self::build(chunk_capacity, len)
    }

    fn build(chunk_capacity: usize, len: usize) -> Result<Self> {
        let mut array = Self {
            chunk_capacity,
            len: 0,
            chunks: Arc::new(Vec::new()),
        };
        array.check_len(len)?;
        let chunks = (0..len.div_ceil(chunk_capacity))
            .map(|i| Arc::new(vec![T::default(); chunk_len(chunk_capacity, len, i)]))
            .collect();
        array.chunks = Arc::new(chunks);
        array.len = len;
        Ok(array)
    }

    /// Changes the logical length.
    ///
    /// Elements below `min(old, new)` keep their values, new positions are
    /// default-initialized, and trailing chunks are dropped when shrinking.
    /// The new chunk table is fully built before it replaces the old one.
    pub fn resize(&mut self, new_len: usize) -> Result<()> {
        self.check_len(new_len)?;
        let needed = new_len.div_ceil(self.chunk_capacity);
        let mut chunks: Vec<Chunk<T>> = Vec::with_capacity(needed);
        for i in 0..needed {
            let want = chunk_len(self.chunk_capacity, new_len, i);
            match self.chunks.get(i) {
                Some(chunk) if chunk.len() == want => chunks.push(Arc::clone(chunk)),
                Some(chunk) => {
                    let mut resized = Vec::with_capacity(want);
                    resized.extend_from_slice(&chunk[..chunk.len().min(want)]);
                    resized.resize(want, T::default());
                    chunks.push(Arc::new(resized));
                }
                None => chunks.push(Arc::new(vec![T::default(); want])),
            }
        }
        tracing::debug!(
            old_len = self.len,
            new_len,
            chunks = needed,
            "segmented array resized"
        );
        self.chunks = Arc::new(chunks);
        self.len = new_len;
        Ok(())
    }

    /// Resets `count` elements starting at `index` to their default value.
    pub fn clear_range(&mut self, index: usize, count: usize) -> Result<()> {
        check_range(index, count, self.len)?;
        let mut cursor = ChunkCursor::new(self.chunk_capacity, index);
        let mut done = 0;
        while done < count {
            let chunk = self.chunk_mut(cursor.chunk);
            let n = (chunk.len() - cursor.offset).min(count - done);
            chunk[cursor.offset..cursor.offset + n].fill(T::default());
            done += n;
            cursor.advance(n);
        }
        Ok(())
    }

    /// Resets every element to its default value.
    pub fn clear(&mut self) {
        for chunk in Arc::make_mut(&mut self.chunks) {
            match Arc::get_mut(chunk) {
                Some(owned) => owned.fill(T::default()),
                None => *chunk = Arc::new(vec![T::default(); chunk.len()]),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Writes & bulk transfer: T: Clone
// ---------------------------------------------------------------------------

impl<T: Clone> SegmentedArray<T> {
    fn chunk_mut(&mut self, chunk: usize) -> &mut Vec<T> {
        Arc::make_mut(&mut Arc::make_mut(&mut self.chunks)[chunk])
    }

    /// Returns a mutable reference to the element at `index`.
    ///
    /// Clones the containing chunk first if it is shared.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index >= self.len {
            return None;
        }
        let (chunk, offset) = self.locate(index);
        self.chunk_mut(chunk).get_mut(offset)
    }

    /// Stores `value` at `index`.
    pub fn set(&mut self, index: usize, value: T) -> Result<()> {
        let len = self.len;
        let slot = self
            .get_mut(index)
            .ok_or(Error::IndexOutOfRange { index, len })?;
        *slot = value;
        Ok(())
    }

    /// Copies `src` into this array starting at logical `index`.
    ///
    /// The span is split at chunk boundaries, one bulk copy per chunk.
    pub fn copy_from(&mut self, index: usize, src: &[T]) -> Result<()> {
        check_range(index, src.len(), self.len)?;
        let mut cursor = ChunkCursor::new(self.chunk_capacity, index);
        let mut done = 0;
        while done < src.len() {
            let chunk = self.chunk_mut(cursor.chunk);
            let n = (chunk.len() - cursor.offset).min(src.len() - done);
            chunk[cursor.offset..cursor.offset + n].clone_from_slice(&src[done..done + n]);
            done += n;
            cursor.advance(n);
        }
        Ok(())
    }

    /// Copies `dst.len()` elements starting at logical `index` into `dst`.
    pub fn copy_to(&self, index: usize, dst: &mut [T]) -> Result<()> {
        check_range(index, dst.len(), self.len)?;
        let mut cursor = ChunkCursor::new(self.chunk_capacity, index);
        let mut done = 0;
        while done < dst.len() {
            let chunk = &self.chunks[cursor.chunk];
            let n = (chunk.len() - cursor.offset).min(dst.len() - done);
            dst[done..done + n].clone_from_slice(&chunk[cursor.offset..cursor.offset + n]);
            done += n;
            cursor.advance(n);
        }
        Ok(())
    }

    /// Copies `count` elements between two arrays.
    ///
    /// Each side walks its own `(chunk, offset)` cursor, so the arrays may
    /// have different chunk capacities. Every step copies the smaller of the
    /// two in-chunk spans that remain.
    pub fn copy(
        src: &Self,
        src_index: usize,
        dst: &mut Self,
        dst_index: usize,
        count: usize,
    ) -> Result<()> {
        check_range(src_index, count, src.len)?;
        check_range(dst_index, count, dst.len)?;
        let mut from = ChunkCursor::new(src.chunk_capacity, src_index);
        let mut to = ChunkCursor::new(dst.chunk_capacity, dst_index);
        let mut copied = 0;
        while copied < count {
            let src_chunk = &src.chunks[from.chunk];
            let dst_chunk = dst.chunk_mut(to.chunk);
            let n = (count - copied)
                .min(dst_chunk.len() - to.offset)
                .min(src_chunk.len() - from.offset);
            dst_chunk[to.offset..to.offset + n]
                .clone_from_slice(&src_chunk[from.offset..from.offset + n]);
            copied += n;
            from.advance(n);
            to.advance(n);
        }
        Ok(())
    }

    /// Moves `count` elements from `src_index` to `dst_index` within this
    /// array. Overlapping spans behave like `memmove`.
    pub fn copy_within(&mut self, src_index: usize, dst_index: usize, count: usize) -> Result<()> {
        check_range(src_index, count, self.len)?;
        check_range(dst_index, count, self.len)?;
        if count == 0 || src_index == dst_index {
            return Ok(());
        }
        let cap = self.chunk_capacity;
        if dst_index < src_index {
            let mut done = 0;
            while done < count {
                let (src, dst) = (src_index + done, dst_index + done);
                let n = (cap - src % cap).min(cap - dst % cap).min(count - done);
                self.move_segment(src, dst, n);
                done += n;
            }
        } else {
            let mut left = count;
            while left > 0 {
                let (src_end, dst_end) = (src_index + left, dst_index + left);
                let n = ((src_end - 1) % cap + 1)
                    .min((dst_end - 1) % cap + 1)
                    .min(left);
                self.move_segment(src_end - n, dst_end - n, n);
                left -= n;
            }
        }
        Ok(())
    }

    // Both spans lie inside a single chunk each.
    fn move_segment(&mut self, src: usize, dst: usize, n: usize) {
        let (src_chunk, src_offset) = self.locate(src);
        let staged = self.chunks[src_chunk][src_offset..src_offset + n].to_vec();
        let (dst_chunk, dst_offset) = self.locate(dst);
        self.chunk_mut(dst_chunk)[dst_offset..dst_offset + n].clone_from_slice(&staged);
    }

    /// Collects the logical contents into a `Vec`.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.len);
        for chunk in self.chunks.iter() {
            out.extend_from_slice(chunk);
        }
        out
    }

    /// Consumes the array, yielding its elements in order.
    ///
    /// Chunks not shared with another view are moved, not cloned.
    pub fn into_values(self) -> impl Iterator<Item = T> {
        Arc::unwrap_or_clone(self.chunks)
            .into_iter()
            .flat_map(|chunk| Arc::unwrap_or_clone(chunk).into_iter())
    }
}

// ---------------------------------------------------------------------------
// Search: T: PartialEq
// ---------------------------------------------------------------------------

impl<T: PartialEq> SegmentedArray<T> {
    /// Returns the first logical index holding `value`.
    #[must_use]
    pub fn index_of(&self, value: &T) -> Option<usize> {
        self.chunks.iter().enumerate().find_map(|(c, chunk)| {
            chunk
                .iter()
                .position(|v| v == value)
                .map(|offset| c * self.chunk_capacity + offset)
        })
    }

    /// Returns the last logical index holding `value`.
    #[must_use]
    pub fn last_index_of(&self, value: &T) -> Option<usize> {
        self.chunks.iter().enumerate().rev().find_map(|(c, chunk)| {
            chunk
                .iter()
                .rposition(|v| v == value)
                .map(|offset| c * self.chunk_capacity + offset)
        })
    }
}

// ---------------------------------------------------------------------------
// Trait impls
// ---------------------------------------------------------------------------

impl<T: Clone> Clone for SegmentedArray<T> {
    /// Structural deep clone: fresh chunks with every element cloned.
    fn clone(&self) -> Self {
        let chunks = self
            .chunks
            .iter()
            .map(|chunk| Arc::new(Vec::clone(chunk)))
            .collect();
        Self {
            chunk_capacity: self.chunk_capacity,
            len: self.len,
            chunks: Arc::new(chunks),
        }
    }
}

impl<T> Default for SegmentedArray<T> {
    fn default() -> Self {
        Self::empty(DEFAULT_CHUNK_BYTES)
    }
}

impl<T> fmt::Debug for SegmentedArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SegmentedArray")
            .field("len", &self.len)
            .field("chunk_capacity", &self.chunk_capacity)
            .field("chunks", &self.chunks.len())
            .finish_non_exhaustive()
    }
}

impl<T: PartialEq> PartialEq for SegmentedArray<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for SegmentedArray<T> {}

impl<T> ops::Index<usize> for SegmentedArray<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        match self.get(index) {
            Some(value) => value,
            None => panic!("index {index} out of range for length {}", self.len),
        }
    }
}

impl<T: Clone> ops::IndexMut<usize> for SegmentedArray<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        let len = self.len;
        match self.get_mut(index) {
            Some(value) => value,
            None => panic!("index {index} out of range for length {len}"),
        }
    }
}

impl<T: Clone + Default> TryFrom<&[T]> for SegmentedArray<T> {
    type Error = Error;

    fn try_from(values: &[T]) -> Result<Self> {
        let mut array = Self::new(values.len())?;
        array.copy_from(0, values)?;
        Ok(array)
    }
}
