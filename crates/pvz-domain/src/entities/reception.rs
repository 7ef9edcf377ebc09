//! Reception entity - the lifecycle state machine
//!
//! ```text
//!            append_item / remove_last_item
//!                 +----------+
//!                 v          |
//!   open() --> [Open] -------+
//!                 |
//!               close()
//!                 v
//!             [Closed]   (terminal: close, append and remove all fail)
//! ```
//!
//! Items form an append-only log ordered by [`ItemSequence`]. Removal pops the
//! highest sequence; the counter never moves backwards.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    DomainError, DomainResult,
    entities::Item,
    value_objects::{ItemSequence, PickupPointId, ReceptionId},
};

/// Reception lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReceptionStatus {
    /// Accepting items
    #[serde(rename = "in_progress")]
    Open,
    /// Finished; terminal
    #[serde(rename = "close")]
    Closed,
}

impl ReceptionStatus {
    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            ReceptionStatus::Open => "in_progress",
            ReceptionStatus::Closed => "close",
        }
    }
}

impl fmt::Display for ReceptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bounded period during which items are logged against a pickup point
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reception {
    id: ReceptionId,
    pickup_point_id: PickupPointId,
    opened_at: DateTime<Utc>,
    status: ReceptionStatus,
    items: Vec<Item>,
    next_sequence: ItemSequence,
}

impl Reception {
    /// Open a new, empty reception for a pickup point
    pub fn open(pickup_point_id: PickupPointId) -> Self {
        Self {
            id: ReceptionId::new(),
            pickup_point_id,
            opened_at: Utc::now(),
            status: ReceptionStatus::Open,
            items: Vec::new(),
            next_sequence: ItemSequence::FIRST,
        }
    }

    /// Rebuild a reception from stored parts.
    ///
    /// Items are re-sorted by sequence.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvariantViolation`] when an item belongs to another
    /// reception, carries no or a duplicate sequence, or when `next_sequence`
    /// does not exceed every stored sequence.
    pub fn restore(
        id: ReceptionId,
        pickup_point_id: PickupPointId,
        opened_at: DateTime<Utc>,
        status: ReceptionStatus,
        mut items: Vec<Item>,
        next_sequence: ItemSequence,
    ) -> DomainResult<Self> {
        items.sort_by_key(Item::sequence);

        if let Some(foreign) = items.iter().find(|item| item.reception_id() != id) {
            return Err(DomainError::invariant_violation(format!(
                "item {} belongs to reception {}, not {id}",
                foreign.id(),
                foreign.reception_id()
            )));
        }
        if items.iter().any(|item| !item.sequence().is_assigned()) {
            return Err(DomainError::invariant_violation(format!(
                "reception {id} holds an item without a sequence"
            )));
        }
        if items
            .windows(2)
            .any(|pair| pair[0].sequence() == pair[1].sequence())
        {
            return Err(DomainError::invariant_violation(format!(
                "reception {id} holds duplicate item sequences"
            )));
        }
        if let Some(last) = items.last()
            && last.sequence() >= next_sequence
        {
            return Err(DomainError::invariant_violation(format!(
                "reception {id} next sequence {next_sequence} does not follow {}",
                last.sequence()
            )));
        }

        Ok(Self {
            id,
            pickup_point_id,
            opened_at,
            status,
            items,
            next_sequence,
        })
    }

    /// Identifier
    pub fn id(&self) -> ReceptionId {
        self.id
    }

    /// Owning pickup point
    pub fn pickup_point_id(&self) -> PickupPointId {
        self.pickup_point_id
    }

    /// Opening timestamp
    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    /// Current status
    pub fn status(&self) -> ReceptionStatus {
        self.status
    }

    /// Whether the reception still accepts items
    pub fn is_open(&self) -> bool {
        self.status == ReceptionStatus::Open
    }

    /// Items in insertion order
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Most recently appended item
    pub fn last_item(&self) -> Option<&Item> {
        self.items.last()
    }

    /// Sequence the next appended item will receive
    pub fn next_sequence(&self) -> ItemSequence {
        self.next_sequence
    }

    /// Fail unless the reception is open
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::ReceptionNotOpen`] for a closed reception.
    pub fn ensure_open(&self) -> DomainResult<()> {
        if self.is_open() {
            Ok(())
        } else {
            Err(DomainError::ReceptionNotOpen(self.id))
        }
    }

    /// Transition Open -> Closed.
    ///
    /// Not idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::AlreadyClosed`] if the reception is already closed.
    pub fn close(&mut self) -> DomainResult<()> {
        if !self.is_open() {
            return Err(DomainError::AlreadyClosed(self.id));
        }
        self.status = ReceptionStatus::Closed;
        Ok(())
    }

    /// Append an item, stamping it with the next sequence.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::ReceptionNotOpen`] for a closed reception and
    /// [`DomainError::InvariantViolation`] if the item belongs to another reception.
    pub fn append_item(&mut self, mut item: Item) -> DomainResult<&Item> {
        self.ensure_open()?;
        if item.reception_id() != self.id {
            return Err(DomainError::invariant_violation(format!(
                "item {} belongs to reception {}, not {}",
                item.id(),
                item.reception_id(),
                self.id
            )));
        }

        item.assign_sequence(self.next_sequence);
        self.next_sequence = self.next_sequence.next();
        self.items.push(item);

        self.items
            .last()
            .ok_or_else(|| DomainError::invariant_violation("appended item vanished"))
    }

    /// Remove and return the most recently appended item (LIFO).
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::ReceptionNotOpen`] for a closed reception and
    /// [`DomainError::EmptySequence`] when there is nothing to remove.
    pub fn remove_last_item(&mut self) -> DomainResult<Item> {
        self.ensure_open()?;
        self.items.pop().ok_or(DomainError::EmptySequence(self.id))
    }
}
