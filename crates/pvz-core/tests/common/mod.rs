//! Common test utilities and mock implementations
//!
//! Provides fixtures wired to the in-memory registry plus a reception
//! repository that can be told to fail, for exercising error paths.

#![allow(dead_code)]

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
    time::Duration,
};

use chrono::{DateTime, Utc};
use pvz_core::{
    DomainError, DomainResult, InMemoryPickupPointRepository, InMemoryReceptionRepository, Item,
    ItemId, ItemSequence, PickupPointId, Reception, ReceptionCommandHandler, ReceptionId,
    ReceptionQueryHandler, ReceptionRepository,
};

pub const TEST_SECRET: &[u8] = b"integration-test-secret";

/// Command and query handlers sharing one in-memory registry
pub struct Fixture<R: ReceptionRepository + 'static = InMemoryReceptionRepository> {
    pub pickup_points: Arc<InMemoryPickupPointRepository>,
    pub receptions: Arc<R>,
    pub commands: ReceptionCommandHandler<InMemoryPickupPointRepository, R>,
    pub queries: ReceptionQueryHandler<InMemoryPickupPointRepository, R>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_receptions(Arc::new(InMemoryReceptionRepository::new()))
    }
}

impl<R: ReceptionRepository + 'static> Fixture<R> {
    pub fn with_receptions(receptions: Arc<R>) -> Self {
        let pickup_points = Arc::new(InMemoryPickupPointRepository::new());
        Self {
            commands: ReceptionCommandHandler::new(pickup_points.clone(), receptions.clone()),
            queries: ReceptionQueryHandler::new(pickup_points.clone(), receptions.clone()),
            pickup_points,
            receptions,
        }
    }
}

/// Reception repository delegating to the in-memory one, with switchable
/// write failures, stale reads and slow listings
#[derive(Default)]
pub struct FlakyReceptionRepository {
    inner: InMemoryReceptionRepository,
    fail_writes: AtomicBool,
    stale_reads: AtomicBool,
    listing_delay_ms: AtomicU64,
}

impl FlakyReceptionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Serve open receptions as they looked before any item was added,
    /// like a reader that lost a race with concurrent writers
    pub fn stale_reads(&self, stale: bool) {
        self.stale_reads.store(stale, Ordering::SeqCst);
    }

    /// Make `list_receptions` sleep before answering
    pub fn slow_listings(&self, delay: Duration) {
        let millis = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self.listing_delay_ms.store(millis, Ordering::SeqCst);
    }

    pub fn item_count(&self) -> usize {
        self.inner.item_count()
    }

    fn check(&self) -> DomainResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(DomainError::storage("registry unavailable"))
        } else {
            Ok(())
        }
    }
}

impl ReceptionRepository for FlakyReceptionRepository {
    async fn create_reception(&self, reception: Reception) -> DomainResult<()> {
        self.check()?;
        self.inner.create_reception(reception).await
    }

    async fn find_reception(&self, id: ReceptionId) -> DomainResult<Option<Reception>> {
        self.inner.find_reception(id).await
    }

    async fn find_open_reception(
        &self,
        pickup_point_id: PickupPointId,
    ) -> DomainResult<Option<Reception>> {
        let current = self.inner.find_open_reception(pickup_point_id).await?;
        if !self.stale_reads.load(Ordering::SeqCst) {
            return Ok(current);
        }
        current
            .map(|reception| {
                Reception::restore(
                    reception.id(),
                    reception.pickup_point_id(),
                    reception.opened_at(),
                    reception.status(),
                    Vec::new(),
                    ItemSequence::FIRST,
                )
            })
            .transpose()
    }

    async fn append_item(&self, item: Item) -> DomainResult<Item> {
        self.check()?;
        self.inner.append_item(item).await
    }

    async fn remove_last_item(&self, reception_id: ReceptionId) -> DomainResult<Item> {
        self.check()?;
        self.inner.remove_last_item(reception_id).await
    }

    async fn delete_item(&self, item_id: ItemId) -> DomainResult<Item> {
        self.check()?;
        self.inner.delete_item(item_id).await
    }

    async fn find_item(&self, item_id: ItemId) -> DomainResult<Option<Item>> {
        self.inner.find_item(item_id).await
    }

    async fn update_reception_status(&self, reception: Reception) -> DomainResult<()> {
        self.check()?;
        self.inner.update_reception_status(reception).await
    }

    async fn list_items(&self, reception_id: ReceptionId) -> DomainResult<Vec<Item>> {
        self.inner.list_items(reception_id).await
    }

    async fn list_receptions(&self, pickup_point_id: PickupPointId) -> DomainResult<Vec<Reception>> {
        let delay = self.listing_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        self.inner.list_receptions(pickup_point_id).await
    }

    async fn pickup_points_with_receptions_between(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> DomainResult<Vec<PickupPointId>> {
        self.inner.pickup_points_with_receptions_between(from, to).await
    }
}
