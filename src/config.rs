//! Construction-time settings for chunked collections.

use crate::error::{Error, Result};
use crate::segmented::DEFAULT_CHUNK_BYTES;

/// Chunk sizing and initial capacity for a collection.
///
/// ```
/// use segmented_store::Config;
///
/// let config = Config::new().with_chunk_bytes(4096).with_initial_capacity(100);
/// assert_eq!(config.chunk_bytes, 4096);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Byte budget of a single chunk. Element count per chunk is
    /// `max(1, chunk_bytes / size_of::<T>())`.
    pub chunk_bytes: usize,
    /// Capacity requested up front. Zero defers allocation to first insert.
    pub initial_capacity: usize,
}

impl Config {
    /// Default settings: 80 KiB chunks, lazy allocation.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            chunk_bytes: DEFAULT_CHUNK_BYTES,
            initial_capacity: 0,
        }
    }

    /// Sets the per-chunk byte budget.
    #[must_use]
    pub const fn with_chunk_bytes(mut self, chunk_bytes: usize) -> Self {
        self.chunk_bytes = chunk_bytes;
        self
    }

    /// Sets the capacity allocated at construction.
    #[must_use]
    pub const fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    /// Rejects settings no collection can be built from.
    pub const fn validate(&self) -> Result<()> {
        if self.chunk_bytes == 0 {
            return Err(Error::InvalidArgument {
                detail: "chunk byte budget must be non-zero",
            });
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
