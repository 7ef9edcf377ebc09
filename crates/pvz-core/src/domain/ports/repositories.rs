//! Registry ports for pickup points and receptions
//!
//! One trait per entity kind. Every cross-aggregate rule that needs atomicity
//! (a single open reception per pickup point, gap-free sequence stamping,
//! status checks before mutation) is part of the contract: implementations
//! must perform the check and the write as one step.

use chrono::{DateTime, Utc};

use crate::domain::{
    Item, ItemId, PickupPoint, PickupPointId, Reception, ReceptionId,
    config::limits::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE},
};

registry_port! {
    /// Storage for pickup points
    pub trait PickupPointRepository {
        /// Persist a newly registered pickup point.
        ///
        /// Fails with `ConcurrencyConflict` if the id is already stored.
        async fn create_pickup_point(&self, point: PickupPoint) -> ();

        /// Find a pickup point by id
        async fn find_pickup_point(&self, id: PickupPointId) -> Option<PickupPoint>;

        /// List pickup points, newest registration first
        async fn list_pickup_points(
            &self,
            filter: PickupPointFilter,
            pagination: Pagination,
        ) -> Vec<PickupPoint>;
    }
}

registry_port! {
    /// Storage for receptions and their item logs
    pub trait ReceptionRepository {
        /// Persist a new reception.
        ///
        /// Fails with `DuplicateOpenReception` when the reception is open and
        /// its pickup point already has an open one.
        async fn create_reception(&self, reception: Reception) -> ();

        /// Find a reception by id, items included
        async fn find_reception(&self, id: ReceptionId) -> Option<Reception>;

        /// Find the open reception of a pickup point
        async fn find_open_reception(&self, pickup_point_id: PickupPointId) -> Option<Reception>;

        /// Store an item under its reception's next sequence and return it
        /// stamped.
        ///
        /// Any sequence the caller staged is replaced. Fails with
        /// `ReceptionNotOpen` when the owning reception is closed and with
        /// `ConcurrencyConflict` when the item id is already stored.
        async fn append_item(&self, item: Item) -> Item;

        /// Delete and return the item with the highest sequence.
        ///
        /// Fails with `EmptySequence` when the reception holds no items and
        /// with `ReceptionNotOpen` when it is closed.
        async fn remove_last_item(&self, reception_id: ReceptionId) -> Item;

        /// Delete an item by id regardless of its position
        async fn delete_item(&self, item_id: ItemId) -> Item;

        /// Find an item by id
        async fn find_item(&self, item_id: ItemId) -> Option<Item>;

        /// Persist the status of a reception.
        ///
        /// Fails with `AlreadyClosed` when closing a reception that is
        /// already closed in storage.
        async fn update_reception_status(&self, reception: Reception) -> ();

        /// Items of a reception in sequence order
        async fn list_items(&self, reception_id: ReceptionId) -> Vec<Item>;

        /// Receptions of a pickup point, most recently opened first
        async fn list_receptions(&self, pickup_point_id: PickupPointId) -> Vec<Reception>;

        /// Pickup points with at least one reception opened inside the
        /// inclusive range. Missing bounds are unbounded.
        async fn pickup_points_with_receptions_between(
            &self,
            from: Option<DateTime<Utc>>,
            to: Option<DateTime<Utc>>,
        ) -> Vec<PickupPointId>;
    }
}

/// Restriction applied to pickup point listings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PickupPointFilter {
    /// Only these pickup points; `None` means all
    pub ids: Option<Vec<PickupPointId>>,
}

impl PickupPointFilter {
    /// Filter accepting every pickup point
    pub fn all() -> Self {
        Self::default()
    }

    /// Filter accepting only the given pickup points
    pub fn only(ids: Vec<PickupPointId>) -> Self {
        Self { ids: Some(ids) }
    }

    /// Whether the filter accepts a pickup point
    pub fn accepts(&self, id: PickupPointId) -> bool {
        self.ids.as_ref().is_none_or(|ids| ids.contains(&id))
    }
}

/// 1-based page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Page number, starting at 1
    pub page: usize,
    /// Items per page
    pub page_size: usize,
}

impl Pagination {
    /// Build a page request, applying defaults and clamping to the limits
    pub fn new(page: Option<usize>, page_size: Option<usize>) -> Self {
        let page = page.filter(|page| *page >= DEFAULT_PAGE).unwrap_or(DEFAULT_PAGE);
        let page_size = match page_size {
            None | Some(0) => DEFAULT_PAGE_SIZE,
            Some(size) => size.min(MAX_PAGE_SIZE),
        };
        Self { page, page_size }
    }

    /// Number of entries to skip
    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults() {
        let pagination = Pagination::default();
        assert_eq!(pagination.page, 1);
        assert_eq!(pagination.page_size, 10);
        assert_eq!(pagination.offset(), 0);
    }

    #[test]
    fn test_pagination_clamps() {
        assert_eq!(Pagination::new(Some(0), Some(0)), Pagination::default());
        assert_eq!(Pagination::new(Some(2), Some(500)).page_size, 30);
        assert_eq!(Pagination::new(Some(3), Some(20)).offset(), 40);
    }

    #[test]
    fn test_filter_accepts() {
        let kept = PickupPointId::new();
        let dropped = PickupPointId::new();

        assert!(PickupPointFilter::all().accepts(dropped));

        let filter = PickupPointFilter::only(vec![kept]);
        assert!(filter.accepts(kept));
        assert!(!filter.accepts(dropped));
    }
}
