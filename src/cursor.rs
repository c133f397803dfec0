//! `(chunk, offset)` position inside a chunked layout.

/// Two-level position that advances across chunk boundaries.
///
/// Each array walks its own cursor, so source and destination of a copy
/// may use different chunk capacities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ChunkCursor {
    chunk_capacity: usize,
    /// Chunk number.
    pub(crate) chunk: usize,
    /// Offset within the chunk.
    pub(crate) offset: usize,
}

impl ChunkCursor {
    /// Positions the cursor at logical `index`.
    pub(crate) const fn new(chunk_capacity: usize, index: usize) -> Self {
        Self {
            chunk_capacity,
            chunk: index / chunk_capacity,
            offset: index % chunk_capacity,
        }
    }

    /// Moves forward by `n` logical positions.
    pub(crate) const fn advance(&mut self, n: usize) {
        let offset = self.offset + n;
        self.chunk += offset / self.chunk_capacity;
        self.offset = offset % self.chunk_capacity;
    }
}
