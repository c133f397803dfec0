//! Error type shared by every collection in the crate.

use thiserror::Error;

/// Errors raised by segmented arrays, hash indexes, and their hosts.
///
/// All variants are caller-fault conditions detected before any state is
/// mutated. None of them are worth retrying.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Malformed argument: zero chunk capacity, overflowing range, ...
    #[error("invalid argument: {detail}")]
    InvalidArgument {
        /// What was wrong with the argument.
        detail: &'static str,
    },

    /// Index (or the first index of a range) lies outside the logical length.
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange {
        /// First offending index.
        index: usize,
        /// Logical length at the time of the call.
        len: usize,
    },

    /// Strict lookup missed.
    #[error("key not found")]
    KeyNotFound,

    /// Insert with fail-on-duplicate found the key already present.
    #[error("an entry with the same key already exists")]
    DuplicateKey,

    /// A live cursor observed a structural mutation of its table.
    #[error("collection was modified; enumeration cannot continue")]
    ConcurrentModification,

    /// Requested length does not fit under `chunk_capacity²`.
    #[error("requested length {requested} exceeds capacity ceiling {ceiling}")]
    CapacityExceeded {
        /// Length that was asked for.
        requested: usize,
        /// Largest length the chunk layout can address.
        ceiling: usize,
    },
}

/// Crate-wide result alias.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Checks that `start..start + count` lies within `0..len`.
pub(crate) fn check_range(start: usize, count: usize, len: usize) -> Result<()> {
    let end = start.checked_add(count).ok_or(Error::InvalidArgument {
        detail: "range end overflows usize",
    })?;
    if end > len {
        return Err(Error::IndexOutOfRange {
            index: start.max(len),
            len,
        });
    }
    Ok(())
}
