//! Received item entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    DomainResult,
    value_objects::{ItemId, ItemSequence, ItemType, ReceptionId},
};

/// Single received unit belonging to exactly one reception.
///
/// A freshly constructed item carries [`ItemSequence::UNASSIGNED`]; the
/// reception stamps the real sequence when the item is appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    id: ItemId,
    reception_id: ReceptionId,
    item_type: ItemType,
    received_at: DateTime<Utc>,
    sequence: ItemSequence,
}

impl Item {
    /// Create an item of the named type for a reception
    ///
    /// # Errors
    ///
    /// Returns [`crate::DomainError::InvalidItemType`] if the type is not on the allow-list.
    pub fn new(item_type: &str, reception_id: ReceptionId) -> DomainResult<Self> {
        Ok(Self::of_type(item_type.parse()?, reception_id))
    }

    /// Create an item of an already validated type
    pub fn of_type(item_type: ItemType, reception_id: ReceptionId) -> Self {
        Self {
            id: ItemId::new(),
            reception_id,
            item_type,
            received_at: Utc::now(),
            sequence: ItemSequence::UNASSIGNED,
        }
    }

    /// Rebuild an item from stored parts
    pub fn restore(
        id: ItemId,
        reception_id: ReceptionId,
        item_type: ItemType,
        received_at: DateTime<Utc>,
        sequence: ItemSequence,
    ) -> Self {
        Self {
            id,
            reception_id,
            item_type,
            received_at,
            sequence,
        }
    }

    /// Identifier
    pub fn id(&self) -> ItemId {
        self.id
    }

    /// Owning reception
    pub fn reception_id(&self) -> ReceptionId {
        self.reception_id
    }

    /// Item type
    pub fn item_type(&self) -> ItemType {
        self.item_type
    }

    /// Creation timestamp
    pub fn received_at(&self) -> DateTime<Utc> {
        self.received_at
    }

    /// Insertion sequence within the reception
    pub fn sequence(&self) -> ItemSequence {
        self.sequence
    }

    pub(crate) fn assign_sequence(&mut self, sequence: ItemSequence) {
        self.sequence = sequence;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DomainError;

    #[test]
    fn test_new_item_is_unsequenced() {
        let reception = ReceptionId::new();
        let item = Item::new("electronics", reception).unwrap();

        assert_eq!(item.item_type(), ItemType::Electronics);
        assert_eq!(item.reception_id(), reception);
        assert_eq!(item.sequence(), ItemSequence::UNASSIGNED);
    }

    #[test]
    fn test_new_item_invalid_type() {
        let err = Item::new("groceries", ReceptionId::new()).unwrap_err();
        assert_eq!(err, DomainError::InvalidItemType("groceries".to_string()));
    }
}
