//! Wire types for the HTTP API
//!
//! Field names are camelCase (`registrationDate`, `dateTime`, `pvzId`,
//! `receptionId`). Cities and item types are written with their English
//! names; the Russian names are accepted on input only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    application::queries::{ListPickupPointsQuery, PickupPointOverview},
    domain::{City, Item, ItemType, PickupPoint, Reception, ReceptionStatus},
};

#[derive(Debug, Deserialize)]
pub struct DummyLoginRequest {
    pub role: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct CreatePickupPointRequest {
    pub city: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReceptionRequest {
    pub pvz_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub pvz_id: String,
    #[serde(rename = "type")]
    pub item_type: String,
}

/// Raw listing parameters.
///
/// Kept as strings: a value that fails to parse is ignored and its default
/// applies, rather than failing the whole request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPickupPointsParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl ListPickupPointsParams {
    pub fn into_query(self) -> ListPickupPointsQuery {
        fn instant(raw: Option<String>) -> Option<DateTime<Utc>> {
            raw.and_then(|raw| DateTime::parse_from_rfc3339(raw.trim()).ok())
                .map(|parsed| parsed.with_timezone(&Utc))
        }
        fn positive(raw: Option<String>) -> Option<usize> {
            raw.and_then(|raw| raw.trim().parse().ok())
                .filter(|value: &usize| *value > 0)
        }

        ListPickupPointsQuery {
            received_from: instant(self.start_date),
            received_to: instant(self.end_date),
            page: positive(self.page),
            page_size: positive(self.limit),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickupPointDto {
    pub id: String,
    pub registration_date: DateTime<Utc>,
    pub city: City,
}

impl From<&PickupPoint> for PickupPointDto {
    fn from(point: &PickupPoint) -> Self {
        Self {
            id: point.id().to_string(),
            registration_date: point.registered_at(),
            city: point.city(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceptionDto {
    pub id: String,
    pub date_time: DateTime<Utc>,
    pub pvz_id: String,
    pub status: ReceptionStatus,
}

impl From<&Reception> for ReceptionDto {
    fn from(reception: &Reception) -> Self {
        Self {
            id: reception.id().to_string(),
            date_time: reception.opened_at(),
            pvz_id: reception.pickup_point_id().to_string(),
            status: reception.status(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDto {
    pub id: String,
    pub date_time: DateTime<Utc>,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub reception_id: String,
    pub sequence: u64,
}

impl From<&Item> for ItemDto {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id().to_string(),
            date_time: item.received_at(),
            item_type: item.item_type(),
            reception_id: item.reception_id().to_string(),
            sequence: item.sequence().value(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReceptionWithItemsDto {
    pub reception: ReceptionDto,
    pub products: Vec<ItemDto>,
}

impl From<&Reception> for ReceptionWithItemsDto {
    fn from(reception: &Reception) -> Self {
        Self {
            reception: reception.into(),
            products: reception.items().iter().map(ItemDto::from).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PickupPointWithReceptionsDto {
    pub pvz: PickupPointDto,
    pub receptions: Vec<ReceptionWithItemsDto>,
}

impl From<&PickupPointOverview> for PickupPointWithReceptionsDto {
    fn from(overview: &PickupPointOverview) -> Self {
        Self {
            pvz: (&overview.pickup_point).into(),
            receptions: overview
                .receptions
                .iter()
                .map(ReceptionWithItemsDto::from)
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}
