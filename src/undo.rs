//! Undo log: begin/commit/rollback over a sequence of mutations.
//!
//! A host collection embeds an [`UndoLog`] and, as the last step of every
//! mutating call, appends one record describing how to invert exactly that
//! call. Records are built only while a transaction is active; inactive
//! hosts pay a single branch.
//!
//! Rollback replays records newest-first. A record's captured index or key
//! is valid only once every later record has been undone, so replay order
//! is strictly LIFO.
//!
//! This is not an ACID transaction. Transactions do not nest: a second
//! `begin` while active is a no-op.

use std::fmt;

use safe_bump::{Checkpoint, Idx, SharedArena};

use crate::error::Result;

/// Inverse of one mutation, applied against the host `H`.
pub trait RollbackOperation<H: ?Sized> {
    /// Undoes the mutation this record describes.
    ///
    /// Panics if the host no longer matches the record, which only happens
    /// when records are replayed out of order.
    fn rollback(&self, host: &mut H);
}

/// Begin/commit/rollback surface shared by transactional collections.
pub trait Transactional {
    /// Starts recording. No-op if already active.
    fn begin_transaction(&mut self);

    /// Discards the recorded inverses and stops recording.
    fn commit_transaction(&mut self);

    /// Replays the recorded inverses newest-first, then stops recording.
    fn rollback_transaction(&mut self);

    /// Returns `true` while a transaction is active.
    fn in_transaction(&self) -> bool;
}

/// Append-only log of rollback records.
///
/// Records are bump-allocated in a [`SharedArena`], so hosts stay
/// `Send + Sync`. `begin` takes an arena checkpoint; `commit` and
/// `rollback` restore it, which drops the records.
pub struct UndoLog<Op> {
    records: SharedArena<Op>,
    start: Option<(Checkpoint<Op>, usize)>,
}

impl<Op> UndoLog<Op> {
    /// Creates an inactive, empty log.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: SharedArena::new(),
            start: None,
        }
    }

    /// Returns `true` while recording.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.start.is_some()
    }

    /// Returns the number of records in the current transaction.
    #[must_use]
    pub fn len(&self) -> usize {
        self.start
            .as_ref()
            .map_or(0, |(_, base)| self.records.len() - base)
    }

    /// Returns `true` if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Starts recording. Calling it again while active changes nothing.
    pub fn begin(&mut self) {
        if self.start.is_none() {
            self.start = Some((self.records.checkpoint(), self.records.len()));
            tracing::trace!("transaction started");
        }
    }

    /// Appends the record built by `build`, only if active.
    pub fn append_if_active(&mut self, build: impl FnOnce() -> Op) {
        if self.start.is_some() {
            self.records.alloc(build());
        }
    }

    /// Drops every record and stops recording.
    pub fn commit(&mut self) {
        if let Some((checkpoint, base)) = self.start.take() {
            tracing::trace!(records = self.records.len() - base, "transaction committed");
            self.records.rollback(checkpoint);
        }
    }

    /// Replays every record against `host`, newest first, then drops them.
    ///
    /// The host must not be recording into this same log during replay;
    /// hosts move the log out of themselves before calling this.
    pub fn rollback<H: ?Sized>(&mut self, host: &mut H)
    where
        Op: RollbackOperation<H>,
    {
        let Some((checkpoint, base)) = self.start.take() else {
            return;
        };
        let end = self.records.len();
        tracing::debug!(records = end - base, "rolling back transaction");
        for raw in (base..end).rev() {
            self.records.get(Idx::from_raw(raw)).rollback(host);
        }
        self.records.rollback(checkpoint);
    }
}

impl<Op> Default for UndoLog<Op> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Op> fmt::Debug for UndoLog<Op> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UndoLog")
            .field("active", &self.is_active())
            .field("records", &self.len())
            .finish()
    }
}

/// Unwraps the result of re-applying an operation during replay.
///
/// A failure means the host's records were replayed out of order.
#[track_caller]
pub(crate) fn replayed<T>(result: Result<T>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("undo record no longer applies to its host: {err}"),
    }
}
