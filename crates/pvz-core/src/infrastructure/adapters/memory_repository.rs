//! In-memory registry implementations
//!
//! # Concurrency Model
//!
//! Pickup points are independent single-key records and live in an
//! [`InMemoryStore`] (sharded `DashMap`).
//!
//! Receptions are different: opening, appending, removing and closing each
//! read and write several structures (the reception record, the open
//! reception index and the item log) that must agree. They live together in
//! one [`ReceptionLedger`] behind a `parking_lot::Mutex`, so every
//! check-then-act primitive runs as a single critical section. No lock is
//! held across an `.await`.
//!
//! Every primitive validates before it mutates, so a rejected call leaves
//! the ledger untouched.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::trace;

use crate::domain::{
    DomainError, DomainResult, Item, ItemId, ItemSequence, PickupPoint, PickupPointId, Reception,
    ReceptionId, ReceptionStatus,
    ports::{Pagination, PickupPointFilter, PickupPointRepository, ReceptionRepository},
};

use super::generic_store::InMemoryStore;

// ============================================================================
// Pickup points
// ============================================================================

/// Pickup point registry backed by a `DashMap`
#[derive(Debug, Clone, Default)]
pub struct InMemoryPickupPointRepository {
    store: InMemoryStore<PickupPointId, PickupPoint>,
}

impl InMemoryPickupPointRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered pickup points
    pub fn len(&self) -> usize {
        self.store.count()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

impl PickupPointRepository for InMemoryPickupPointRepository {
    async fn create_pickup_point(&self, point: PickupPoint) -> DomainResult<()> {
        let id = point.id();
        if self.store.insert_new(id, point) {
            Ok(())
        } else {
            Err(DomainError::ConcurrencyConflict(format!(
                "pickup point {id} is already registered"
            )))
        }
    }

    async fn find_pickup_point(&self, id: PickupPointId) -> DomainResult<Option<PickupPoint>> {
        Ok(self.store.get(&id))
    }

    async fn list_pickup_points(
        &self,
        filter: PickupPointFilter,
        pagination: Pagination,
    ) -> DomainResult<Vec<PickupPoint>> {
        let mut points = self.store.filter(|point| filter.accepts(point.id()));

        // Newest first; the id breaks ties so pages are stable.
        points.sort_by(|a, b| {
            b.registered_at()
                .cmp(&a.registered_at())
                .then_with(|| a.id().as_uuid().cmp(&b.id().as_uuid()))
        });

        Ok(points
            .into_iter()
            .skip(pagination.offset())
            .take(pagination.page_size)
            .collect())
    }
}

// ============================================================================
// Receptions
// ============================================================================

/// Stored form of a reception: the header plus its item log keyed by sequence
#[derive(Debug, Clone)]
struct ReceptionRecord {
    id: ReceptionId,
    pickup_point_id: PickupPointId,
    opened_at: DateTime<Utc>,
    status: ReceptionStatus,
    next_sequence: ItemSequence,
    /// Creation order, breaks ties between receptions opened in the same instant
    serial: u64,
    items: BTreeMap<ItemSequence, Item>,
}

impl ReceptionRecord {
    fn to_reception(&self) -> DomainResult<Reception> {
        Reception::restore(
            self.id,
            self.pickup_point_id,
            self.opened_at,
            self.status,
            self.items.values().cloned().collect(),
            self.next_sequence,
        )
    }

    fn is_open(&self) -> bool {
        self.status == ReceptionStatus::Open
    }
}

#[derive(Debug, Default)]
struct ReceptionLedger {
    receptions: HashMap<ReceptionId, ReceptionRecord>,
    open_by_point: HashMap<PickupPointId, ReceptionId>,
    item_index: HashMap<ItemId, (ReceptionId, ItemSequence)>,
    next_serial: u64,
}

impl ReceptionLedger {
    fn record(&self, id: ReceptionId) -> DomainResult<&ReceptionRecord> {
        self.receptions
            .get(&id)
            .ok_or(DomainError::ReceptionNotFound(id))
    }

    fn record_mut(&mut self, id: ReceptionId) -> DomainResult<&mut ReceptionRecord> {
        self.receptions
            .get_mut(&id)
            .ok_or(DomainError::ReceptionNotFound(id))
    }

    fn insert(&mut self, reception: Reception) -> DomainResult<()> {
        let id = reception.id();
        let point_id = reception.pickup_point_id();

        if self.receptions.contains_key(&id) {
            return Err(DomainError::ConcurrencyConflict(format!(
                "reception {id} is already stored"
            )));
        }
        if reception.is_open() && self.open_by_point.contains_key(&point_id) {
            return Err(DomainError::DuplicateOpenReception(point_id));
        }
        if let Some(taken) = reception
            .items()
            .iter()
            .find(|item| self.item_index.contains_key(&item.id()))
        {
            return Err(DomainError::ConcurrencyConflict(format!(
                "item {} is already stored",
                taken.id()
            )));
        }

        let items: BTreeMap<_, _> = reception
            .items()
            .iter()
            .map(|item| (item.sequence(), item.clone()))
            .collect();
        for (sequence, item) in &items {
            self.item_index.insert(item.id(), (id, *sequence));
        }
        if reception.is_open() {
            self.open_by_point.insert(point_id, id);
        }

        let serial = self.next_serial;
        self.next_serial += 1;
        self.receptions.insert(
            id,
            ReceptionRecord {
                id,
                pickup_point_id: point_id,
                opened_at: reception.opened_at(),
                status: reception.status(),
                next_sequence: reception.next_sequence(),
                serial,
                items,
            },
        );
        Ok(())
    }

    /// Stamp `item` with the reception's next sequence and store it.
    /// Whatever sequence the caller staged is replaced.
    fn append(&mut self, item: Item) -> DomainResult<Item> {
        if self.item_index.contains_key(&item.id()) {
            return Err(DomainError::ConcurrencyConflict(format!(
                "item {} is already stored",
                item.id()
            )));
        }

        let record = self.record_mut(item.reception_id())?;
        if !record.is_open() {
            return Err(DomainError::ReceptionNotOpen(record.id));
        }

        let sequence = record.next_sequence;
        let stamped = Item::restore(
            item.id(),
            item.reception_id(),
            item.item_type(),
            item.received_at(),
            sequence,
        );

        record.next_sequence = sequence.next();
        record.items.insert(sequence, stamped.clone());
        let key = (record.id, sequence);
        self.item_index.insert(stamped.id(), key);
        Ok(stamped)
    }

    fn pop_last(&mut self, reception_id: ReceptionId) -> DomainResult<Item> {
        let record = self.record_mut(reception_id)?;
        if !record.is_open() {
            return Err(DomainError::ReceptionNotOpen(reception_id));
        }
        let (_, item) = record
            .items
            .pop_last()
            .ok_or(DomainError::EmptySequence(reception_id))?;

        self.item_index.remove(&item.id());
        Ok(item)
    }

    fn delete(&mut self, item_id: ItemId) -> DomainResult<Item> {
        let (reception_id, sequence) = *self
            .item_index
            .get(&item_id)
            .ok_or(DomainError::ItemNotFound(item_id))?;

        let item = self
            .record_mut(reception_id)?
            .items
            .remove(&sequence)
            .ok_or_else(|| {
                DomainError::invariant_violation(format!(
                    "item index points at missing item {item_id}"
                ))
            })?;

        self.item_index.remove(&item_id);
        Ok(item)
    }

    fn item(&self, item_id: ItemId) -> Option<Item> {
        let (reception_id, sequence) = self.item_index.get(&item_id)?;
        self.receptions
            .get(reception_id)?
            .items
            .get(sequence)
            .cloned()
    }

    fn update_status(&mut self, reception: &Reception) -> DomainResult<()> {
        let record = self.record_mut(reception.id())?;

        match (record.status, reception.status()) {
            (ReceptionStatus::Open, ReceptionStatus::Open) => Ok(()),
            (ReceptionStatus::Open, ReceptionStatus::Closed) => {
                record.status = ReceptionStatus::Closed;
                let (id, point_id) = (record.id, record.pickup_point_id);
                if self.open_by_point.get(&point_id) == Some(&id) {
                    self.open_by_point.remove(&point_id);
                }
                Ok(())
            }
            (ReceptionStatus::Closed, ReceptionStatus::Closed) => {
                Err(DomainError::AlreadyClosed(reception.id()))
            }
            (ReceptionStatus::Closed, ReceptionStatus::Open) => {
                Err(DomainError::invariant_violation(format!(
                    "reception {} cannot be reopened",
                    reception.id()
                )))
            }
        }
    }
}

/// Reception registry holding receptions, the open reception index and the
/// item log under one lock
#[derive(Debug, Default)]
pub struct InMemoryReceptionRepository {
    ledger: Mutex<ReceptionLedger>,
}

impl InMemoryReceptionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored receptions, open or closed
    pub fn reception_count(&self) -> usize {
        self.ledger.lock().receptions.len()
    }

    /// Number of stored items across all receptions
    pub fn item_count(&self) -> usize {
        self.ledger.lock().item_index.len()
    }
}

impl ReceptionRepository for InMemoryReceptionRepository {
    async fn create_reception(&self, reception: Reception) -> DomainResult<()> {
        let id = reception.id();
        self.ledger.lock().insert(reception)?;
        trace!(reception_id = %id, "reception stored");
        Ok(())
    }

    async fn find_reception(&self, id: ReceptionId) -> DomainResult<Option<Reception>> {
        let ledger = self.ledger.lock();
        ledger
            .receptions
            .get(&id)
            .map(ReceptionRecord::to_reception)
            .transpose()
    }

    async fn find_open_reception(
        &self,
        pickup_point_id: PickupPointId,
    ) -> DomainResult<Option<Reception>> {
        let ledger = self.ledger.lock();
        match ledger.open_by_point.get(&pickup_point_id) {
            Some(id) => ledger.record(*id)?.to_reception().map(Some),
            None => Ok(None),
        }
    }

    async fn append_item(&self, item: Item) -> DomainResult<Item> {
        let stored = self.ledger.lock().append(item)?;
        trace!(
            reception_id = %stored.reception_id(),
            sequence = stored.sequence().value(),
            "item appended"
        );
        Ok(stored)
    }

    async fn remove_last_item(&self, reception_id: ReceptionId) -> DomainResult<Item> {
        let removed = self.ledger.lock().pop_last(reception_id)?;
        trace!(
            reception_id = %reception_id,
            sequence = removed.sequence().value(),
            "last item popped"
        );
        Ok(removed)
    }

    async fn delete_item(&self, item_id: ItemId) -> DomainResult<Item> {
        self.ledger.lock().delete(item_id)
    }

    async fn find_item(&self, item_id: ItemId) -> DomainResult<Option<Item>> {
        Ok(self.ledger.lock().item(item_id))
    }

    async fn update_reception_status(&self, reception: Reception) -> DomainResult<()> {
        self.ledger.lock().update_status(&reception)
    }

    async fn list_items(&self, reception_id: ReceptionId) -> DomainResult<Vec<Item>> {
        let ledger = self.ledger.lock();
        Ok(ledger
            .record(reception_id)?
            .items
            .values()
            .cloned()
            .collect())
    }

    async fn list_receptions(&self, pickup_point_id: PickupPointId) -> DomainResult<Vec<Reception>> {
        let ledger = self.ledger.lock();
        let mut records: Vec<&ReceptionRecord> = ledger
            .receptions
            .values()
            .filter(|record| record.pickup_point_id == pickup_point_id)
            .collect();

        records.sort_by(|a, b| {
            b.opened_at
                .cmp(&a.opened_at)
                .then_with(|| b.serial.cmp(&a.serial))
        });

        records
            .into_iter()
            .map(ReceptionRecord::to_reception)
            .collect()
    }

    async fn pickup_points_with_receptions_between(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> DomainResult<Vec<PickupPointId>> {
        let ledger = self.ledger.lock();
        let points: HashSet<PickupPointId> = ledger
            .receptions
            .values()
            .filter(|record| from.is_none_or(|from| record.opened_at >= from))
            .filter(|record| to.is_none_or(|to| record.opened_at <= to))
            .map(|record| record.pickup_point_id)
            .collect();

        Ok(points.into_iter().collect())
    }
}
