//! Per-reception insertion sequence

use std::fmt;

use serde::{Deserialize, Serialize};

/// Insertion position of an item within its reception.
///
/// Sequences start at [`ItemSequence::FIRST`] and only grow. Removing the last
/// item leaves a gap; the freed value is never handed out again, so ordering
/// survives restarts and never depends on timestamps.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct ItemSequence(u64);

impl ItemSequence {
    /// Placeholder carried by items that have not been appended yet
    pub const UNASSIGNED: ItemSequence = ItemSequence(0);

    /// First sequence handed out by a fresh reception
    pub const FIRST: ItemSequence = ItemSequence(1);

    /// Wrap a raw value
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Raw value
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// Whether this sequence was stamped by an append
    pub const fn is_assigned(&self) -> bool {
        self.0 != 0
    }

    /// The following sequence
    #[must_use]
    pub const fn next(&self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for ItemSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
