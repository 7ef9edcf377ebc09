//! Queries - Read operations that don't change state

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    application::UseCase,
    domain::{PickupPoint, PickupPointId, Reception, Role},
};

/// List pickup points with their receptions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListPickupPointsQuery {
    /// Keep points with a reception opened at or after this instant
    pub received_from: Option<DateTime<Utc>>,
    /// Keep points with a reception opened at or before this instant
    pub received_to: Option<DateTime<Utc>>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

/// List the receptions of one pickup point
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListReceptionsQuery {
    pub pickup_point_id: PickupPointId,
}

impl UseCase for ListPickupPointsQuery {
    const NAME: &'static str = "list_pickup_points";
    const REQUIRED_ROLE: Option<Role> = None;
}

impl UseCase for ListReceptionsQuery {
    const NAME: &'static str = "list_receptions";
    const REQUIRED_ROLE: Option<Role> = None;
}

/// A pickup point with every reception it has had
#[derive(Debug, Clone)]
pub struct PickupPointOverview {
    pub pickup_point: PickupPoint,
    /// Most recently opened first, items in sequence order
    pub receptions: Vec<Reception>,
}

/// One page of pickup point overviews
#[derive(Debug, Clone)]
pub struct PickupPointsResponse {
    pub page: usize,
    pub page_size: usize,
    pub pickup_points: Vec<PickupPointOverview>,
}
