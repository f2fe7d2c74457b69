//! Monotonic identifier sequence for subscriptions and notices.
//!
//! # Why not random identifiers? (for beginners)
//!
//! Subscription and notice identifiers only need to be unique within one page
//! session, and a simple counter gives that for free.  Counters also make
//! ordering meaningful: a notice with a smaller id was pushed earlier, which
//! keeps rendering order stable without storing timestamps twice.
//!
//! The counter uses `AtomicU64` so a sequence can be shared behind `&self`
//! (for example by several observers created from one shell) without a lock.

use std::sync::atomic::{AtomicU64, Ordering};

/// A monotonically increasing source of `u64` identifiers.
///
/// Identifiers start at 1 so that 0 is never handed out; callers that
/// serialise ids to JSON can therefore treat 0 as "no id".
///
/// # Examples
///
/// ```rust
/// use pagekit_core::IdSequence;
///
/// let ids = IdSequence::new();
/// assert_eq!(ids.next(), 1);
/// assert_eq!(ids.next(), 2);
/// ```
#[derive(Debug)]
pub struct IdSequence {
    inner: AtomicU64,
}

impl IdSequence {
    /// Creates a sequence whose first identifier is 1.
    pub fn new() -> Self {
        Self {
            inner: AtomicU64::new(1),
        }
    }

    /// Returns the next identifier and advances the sequence.
    ///
    /// `Ordering::Relaxed` is enough: identifiers only need uniqueness, not
    /// synchronisation of other memory.
    pub fn next(&self) -> u64 {
        self.inner.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for IdSequence {
    fn default() -> Self {
        Self::new()
    }
}
