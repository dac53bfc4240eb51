//! Configuration rendering for `show` commands.

use super::{
    HouseMateService, CONTAINS_APPLIANCE, CONTAINS_OCCUPANT, CONTAINS_ROOM, CONTAINS_SENSOR,
};
use crate::error::Result;
use crate::model::{Device, House, ModelEntity, Occupant, Room, Status};

const INDENT: &str = "  ";

/// Text shown for a status that has never been set.
pub const UNSET_VALUE: &str = "<unset>";

impl HouseMateService {
    /// Render the configuration of every house, or of one entity.
    pub fn show_configuration(&self, identifier: Option<&str>) -> Result<Vec<String>> {
        let mut lines = Vec::new();
        match identifier {
            None => {
                for house in self.houses() {
                    self.render_house(house, &mut lines);
                }
            }
            Some(identifier) => match self.lookup(identifier)? {
                ModelEntity::House(house) => self.render_house(house, &mut lines),
                ModelEntity::Room(room) => self.render_room(room, "", &mut lines),
                ModelEntity::Sensor(device) => self.render_device(device, "Sensor", "", &mut lines),
                ModelEntity::Appliance(device) => {
                    self.render_device(device, "Appliance", "", &mut lines)
                }
                ModelEntity::Occupant(occupant) => {
                    self.render_occupant(occupant, None, "", &mut lines)
                }
                ModelEntity::Status(status) => render_status(status, "", &mut lines),
            },
        }
        Ok(lines)
    }

    fn render_house(&self, house: &House, lines: &mut Vec<String>) {
        lines.push(house.id.clone());

        lines.push(format!("{INDENT}Occupants:"));
        let nested = INDENT.repeat(2);
        for entity in self.related(&house.id, CONTAINS_OCCUPANT) {
            if let ModelEntity::Occupant(occupant) = entity {
                self.render_occupant(occupant, Some(house), &nested, lines);
            }
        }

        lines.push(format!("{INDENT}Rooms:"));
        for entity in self.related(&house.id, CONTAINS_ROOM) {
            if let ModelEntity::Room(room) = entity {
                self.render_room(room, &nested, lines);
            }
        }
    }

    fn render_room(&self, room: &Room, indent: &str, lines: &mut Vec<String>) {
        lines.push(format!(
            "{indent}{} (floor {}, type {})",
            room.name, room.floor, room.room_type
        ));

        let nested = format!("{indent}{INDENT}{INDENT}");
        lines.push(format!("{indent}{INDENT}Sensors:"));
        for entity in self.related(&room.id, CONTAINS_SENSOR) {
            if let ModelEntity::Sensor(device) = entity {
                self.render_device(device, "Sensor", &nested, lines);
            }
        }
        lines.push(format!("{indent}{INDENT}Appliances:"));
        for entity in self.related(&room.id, CONTAINS_APPLIANCE) {
            if let ModelEntity::Appliance(device) = entity {
                self.render_device(device, "Appliance", &nested, lines);
            }
        }
    }

    fn render_device(&self, device: &Device, label: &str, indent: &str, lines: &mut Vec<String>) {
        lines.push(format!("{indent}{} ({label} type {})", device.name, device.device_type));
        self.render_statuses(&device.id, indent, lines);
    }

    fn render_occupant(
        &self,
        occupant: &Occupant,
        house: Option<&House>,
        indent: &str,
        lines: &mut Vec<String>,
    ) {
        match house {
            Some(house) => {
                let relation = self
                    .relation(&occupant.id, &house.id)
                    .unwrap_or_else(|| "unknown".to_string());
                lines.push(format!(
                    "{indent}{} ({}, {relation})",
                    occupant.id, occupant.occupant_type
                ));
            }
            None => lines.push(format!("{indent}{} ({})", occupant.id, occupant.occupant_type)),
        }
        self.render_statuses(&occupant.id, indent, lines);
    }

    fn render_statuses(&self, owner: &str, indent: &str, lines: &mut Vec<String>) {
        let nested = format!("{indent}{INDENT}");
        for status in self.statuses(owner) {
            render_status(status, &nested, lines);
        }
    }
}

fn render_status(status: &Status, indent: &str, lines: &mut Vec<String>) {
    let value = status.value.as_deref().unwrap_or(UNSET_VALUE);
    lines.push(format!("{indent}{}: {value}", status.name));
}
