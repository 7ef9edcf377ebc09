//! Commands - Write operations that change system state

use serde::{Deserialize, Serialize};

use crate::{
    application::UseCase,
    domain::{PickupPointId, Role},
};

/// Register a new pickup point
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePickupPointCommand {
    pub city: String,
}

/// Open a reception at a pickup point
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenReceptionCommand {
    pub pickup_point_id: PickupPointId,
}

/// Log an item against the open reception of a pickup point
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddItemCommand {
    pub pickup_point_id: PickupPointId,
    pub item_type: String,
}

/// Undo the most recent item of the open reception
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveLastItemCommand {
    pub pickup_point_id: PickupPointId,
}

/// Close the open reception of a pickup point
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloseReceptionCommand {
    pub pickup_point_id: PickupPointId,
}

impl UseCase for CreatePickupPointCommand {
    const NAME: &'static str = "create_pickup_point";
    const REQUIRED_ROLE: Option<Role> = Some(Role::Moderator);
}

impl UseCase for OpenReceptionCommand {
    const NAME: &'static str = "open_reception";
    const REQUIRED_ROLE: Option<Role> = Some(Role::Employee);
}

impl UseCase for AddItemCommand {
    const NAME: &'static str = "add_item";
    const REQUIRED_ROLE: Option<Role> = Some(Role::Employee);
}

impl UseCase for RemoveLastItemCommand {
    const NAME: &'static str = "remove_last_item";
    const REQUIRED_ROLE: Option<Role> = Some(Role::Employee);
}

impl UseCase for CloseReceptionCommand {
    const NAME: &'static str = "close_reception";
    const REQUIRED_ROLE: Option<Role> = Some(Role::Employee);
}
