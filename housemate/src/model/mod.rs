//! Domain model for the home: houses, rooms, devices, occupants and statuses.

mod status;

pub use status::*;

use serde::{Deserialize, Serialize};

/// Types of entities in the home model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    House,
    Room,
    Sensor,
    Appliance,
    Occupant,
    Status,
}

impl EntityKind {
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::House => "house",
            EntityKind::Room => "room",
            EntityKind::Sensor => "sensor",
            EntityKind::Appliance => "appliance",
            EntityKind::Occupant => "occupant",
            EntityKind::Status => "status",
        }
    }

    /// Parse a command keyword such as `sensor`.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_lowercase().as_str() {
            "house" => Some(EntityKind::House),
            "room" => Some(EntityKind::Room),
            "sensor" => Some(EntityKind::Sensor),
            "appliance" => Some(EntityKind::Appliance),
            "occupant" => Some(EntityKind::Occupant),
            "status" => Some(EntityKind::Status),
            _ => None,
        }
    }

    /// Check whether entities of this kind can carry statuses.
    pub fn has_statuses(&self) -> bool {
        matches!(
            self,
            EntityKind::Sensor | EntityKind::Appliance | EntityKind::Occupant
        )
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A house. Its identifier is also its name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct House {
    pub id: String,
}

/// A room, identified as `house:room`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: String,
    pub name: String,
    pub house: String,
    pub floor: i32,
    pub room_type: String,
}

/// A sensor or appliance, identified as `house:room:device`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: String,
    pub name: String,
    pub room: String,
    pub device_type: String,
}

/// A person or pet. Occupants are global and may belong to several houses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occupant {
    pub id: String,
    pub occupant_type: String,
}

/// Any entity of the home model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ModelEntity {
    House(House),
    Room(Room),
    Sensor(Device),
    Appliance(Device),
    Occupant(Occupant),
    Status(Status),
}

impl ModelEntity {
    pub fn kind(&self) -> EntityKind {
        match self {
            ModelEntity::House(_) => EntityKind::House,
            ModelEntity::Room(_) => EntityKind::Room,
            ModelEntity::Sensor(_) => EntityKind::Sensor,
            ModelEntity::Appliance(_) => EntityKind::Appliance,
            ModelEntity::Occupant(_) => EntityKind::Occupant,
            ModelEntity::Status(_) => EntityKind::Status,
        }
    }

    /// Full identifier as it was defined.
    pub fn id(&self) -> &str {
        match self {
            ModelEntity::House(house) => &house.id,
            ModelEntity::Room(room) => &room.id,
            ModelEntity::Sensor(device) | ModelEntity::Appliance(device) => &device.id,
            ModelEntity::Occupant(occupant) => &occupant.id,
            ModelEntity::Status(status) => &status.id,
        }
    }

    /// Short, user-facing name without the owner prefix.
    pub fn name(&self) -> &str {
        match self {
            ModelEntity::House(house) => &house.id,
            ModelEntity::Room(room) => &room.name,
            ModelEntity::Sensor(device) | ModelEntity::Appliance(device) => &device.name,
            ModelEntity::Occupant(occupant) => &occupant.id,
            ModelEntity::Status(status) => &status.name,
        }
    }
}
