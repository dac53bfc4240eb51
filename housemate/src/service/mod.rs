//! HouseMate model service - the home model stored as triples.
//!
//! Every relationship lives in the knowledge graph, so raw pattern queries
//! see the same model the service does:
//!
//! | Subject | Predicate | Object |
//! |---|---|---|
//! | `system` | `contains` | house |
//! | `system` | `has_occupant` | occupant |
//! | house | `contains_room` | room |
//! | room | `contains_sensor` / `contains_appliance` | device |
//! | house | `contains_occupant` | occupant |
//! | `house:occupant` | `has_relationship` | relation |
//! | owner | `has_status` | status |
//! | status | `has_value` | value |

mod show;

use std::collections::HashMap;
use tracing::{debug, info};

use knowledge_engine::{
    canonicalize, EngineConfig, KnowledgeError, NodeId, Pattern, QueryEngine, QueryOutcome,
    SharedGraph, TripleLiteral, WILDCARD,
};

use crate::error::{HouseMateError, Result};
use crate::model::{Device, EntityKind, House, ModelEntity, Occupant, Room, Status, StatusOptions};

/// Root node that owns every house and occupant.
pub const SYSTEM_NODE: &str = "system";

pub const CONTAINS: &str = "contains";
pub const HAS_OCCUPANT: &str = "has_occupant";
pub const CONTAINS_ROOM: &str = "contains_room";
pub const CONTAINS_SENSOR: &str = "contains_sensor";
pub const CONTAINS_APPLIANCE: &str = "contains_appliance";
pub const CONTAINS_OCCUPANT: &str = "contains_occupant";
pub const HAS_RELATIONSHIP: &str = "has_relationship";
pub const HAS_STATUS: &str = "has_status";
pub const HAS_VALUE: &str = "has_value";

/// Relation used when an occupant is added without one.
pub const DEFAULT_RELATION: &str = "resident";

/// Separator between the parts of composite identifiers.
pub const ID_SEPARATOR: char = ':';

/// Stands in for whitespace when a status value is written to the graph.
pub const VALUE_SPACE: &str = "_";

/// Identifier of the node holding an occupant's relation to a house.
pub fn relationship_node(house: &str, occupant: &str) -> String {
    format!("{house}{ID_SEPARATOR}{occupant}")
}

/// Graph token for a status value. Whitespace runs become [`VALUE_SPACE`];
/// the exact value stays on the [`Status`].
pub fn value_token(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(VALUE_SPACE)
}

/// Check a user-supplied identifier before it is combined into a composite one.
pub fn validate_identifier(identifier: &str) -> Result<()> {
    let trimmed = identifier.trim();
    if trimmed.is_empty() || trimmed == WILDCARD {
        return Err(HouseMateError::invalid_command(
            "identifier must be set and must not be `?`",
            identifier,
        ));
    }
    if canonicalize(trimmed).is_ok_and(|canonical| canonical == SYSTEM_NODE) {
        return Err(HouseMateError::invalid_command(
            "`system` is reserved for the model root",
            identifier,
        ));
    }
    if trimmed.contains(ID_SEPARATOR) {
        return Err(HouseMateError::invalid_command(
            "identifier must not contain `:`",
            identifier,
        ));
    }
    Ok(())
}

/// Owns the home model of one session.
#[derive(Debug)]
pub struct HouseMateService {
    graph: SharedGraph,
    entities: HashMap<NodeId, ModelEntity>,
    queries: QueryEngine,
}

impl HouseMateService {
    /// Create a service over `graph` with default settings.
    pub fn new(graph: SharedGraph) -> Self {
        Self::with_config(graph, &EngineConfig::default())
    }

    /// Create a service over `graph`, running queries with `config`.
    pub fn with_config(graph: SharedGraph, config: &EngineConfig) -> Self {
        Self {
            graph,
            entities: HashMap::new(),
            queries: QueryEngine::new(config),
        }
    }

    pub fn graph(&self) -> &SharedGraph {
        &self.graph
    }

    /// Text printed for a query with no matches.
    pub fn sentinel(&self) -> &str {
        self.queries.sentinel()
    }

    /// Find a model entity by identifier.
    pub fn entity(&self, identifier: &str) -> Option<&ModelEntity> {
        let node = self.graph.read().find_node(identifier)?;
        self.entities.get(&node)
    }

    pub fn kind_of(&self, identifier: &str) -> Option<EntityKind> {
        self.entity(identifier).map(ModelEntity::kind)
    }

    /// Get the number of model entities.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    fn lookup(&self, identifier: &str) -> Result<&ModelEntity> {
        self.entity(identifier)
            .ok_or_else(|| KnowledgeError::unknown_identifier(identifier).into())
    }

    fn expect_kind(&self, identifier: &str, kind: EntityKind) -> Result<&ModelEntity> {
        let entity = self.lookup(identifier)?;
        if entity.kind() != kind {
            return Err(HouseMateError::wrong_kind(
                identifier,
                format!("a {kind}"),
                entity.kind(),
            ));
        }
        Ok(entity)
    }

    /// An identifier is taken once it names a model entity or is the subject
    /// of any statement. Nodes seen only as values stay free.
    fn ensure_new(&self, identifier: &str) -> Result<()> {
        let as_subject = Pattern::new(identifier, WILDCARD, WILDCARD)?;
        let graph = self.graph.read();
        let is_entity = graph
            .find_node(identifier)
            .is_some_and(|node| self.entities.contains_key(&node));
        if is_entity || !graph.query_pattern(&as_subject).is_empty() {
            return Err(KnowledgeError::duplicate_identifier(identifier).into());
        }
        Ok(())
    }

    fn register(&mut self, node: NodeId, entity: ModelEntity) {
        debug!(kind = %entity.kind(), id = entity.id(), "registered entity");
        self.entities.insert(node, entity);
    }

    /// Define a new house.
    pub fn create_house(&mut self, identifier: &str) -> Result<()> {
        validate_identifier(identifier)?;
        self.ensure_new(identifier)?;

        let node = self.graph.write().add_triple(SYSTEM_NODE, CONTAINS, identifier)?.object;
        self.register(
            node,
            ModelEntity::House(House {
                id: identifier.to_string(),
            }),
        );
        info!(house = identifier, "created house");
        Ok(())
    }

    /// Define a room inside an existing house. Its identifier becomes `house:room`.
    pub fn create_room(
        &mut self,
        identifier: &str,
        floor: i32,
        room_type: &str,
        house: &str,
    ) -> Result<()> {
        validate_identifier(identifier)?;
        let house_id = self.expect_kind(house, EntityKind::House)?.id().to_string();
        let room_id = format!("{house_id}{ID_SEPARATOR}{identifier}");
        self.ensure_new(&room_id)?;

        let node = self.graph.write().add_triple(&house_id, CONTAINS_ROOM, &room_id)?.object;
        self.register(
            node,
            ModelEntity::Room(Room {
                id: room_id,
                name: identifier.to_string(),
                house: house_id,
                floor,
                room_type: room_type.to_string(),
            }),
        );
        Ok(())
    }

    /// Define a sensor inside an existing room.
    pub fn create_sensor(&mut self, identifier: &str, sensor_type: &str, room: &str) -> Result<()> {
        self.create_device(EntityKind::Sensor, identifier, sensor_type, room)
    }

    /// Define an appliance inside an existing room.
    pub fn create_appliance(
        &mut self,
        identifier: &str,
        appliance_type: &str,
        room: &str,
    ) -> Result<()> {
        self.create_device(EntityKind::Appliance, identifier, appliance_type, room)
    }

    fn create_device(
        &mut self,
        kind: EntityKind,
        identifier: &str,
        device_type: &str,
        room: &str,
    ) -> Result<()> {
        validate_identifier(identifier)?;
        let room_id = self.expect_kind(room, EntityKind::Room)?.id().to_string();
        let device_id = format!("{room_id}{ID_SEPARATOR}{identifier}");
        self.ensure_new(&device_id)?;

        let device = Device {
            id: device_id.clone(),
            name: identifier.to_string(),
            room: room_id.clone(),
            device_type: device_type.to_string(),
        };
        let (predicate, entity) = match kind {
            EntityKind::Sensor => (CONTAINS_SENSOR, ModelEntity::Sensor(device)),
            _ => (CONTAINS_APPLIANCE, ModelEntity::Appliance(device)),
        };

        let node = self.graph.write().add_triple(&room_id, predicate, &device_id)?.object;
        self.register(node, entity);
        Ok(())
    }

    /// Define an occupant. Occupants are not tied to a house until added to one.
    pub fn create_occupant(&mut self, identifier: &str, occupant_type: &str) -> Result<()> {
        validate_identifier(identifier)?;
        self.ensure_new(identifier)?;

        let node = self.graph.write().add_triple(SYSTEM_NODE, HAS_OCCUPANT, identifier)?.object;
        self.register(
            node,
            ModelEntity::Occupant(Occupant {
                id: identifier.to_string(),
                occupant_type: occupant_type.to_lowercase(),
            }),
        );
        Ok(())
    }

    /// Place an occupant in a house. A later call replaces the relation.
    pub fn add_occupant(&mut self, occupant: &str, house: &str, relation: &str) -> Result<()> {
        let occupant_id = self.expect_kind(occupant, EntityKind::Occupant)?.id().to_string();
        let house_id = self.expect_kind(house, EntityKind::House)?.id().to_string();
        let relation = relation.trim().to_lowercase();
        let link = relationship_node(&house_id, &occupant_id);
        TripleLiteral::new(&link, HAS_RELATIONSHIP, &relation).validate()?;

        let mut graph = self.graph.write();
        graph.add_triple(&house_id, CONTAINS_OCCUPANT, &occupant_id)?;

        let previous: Vec<String> = graph
            .query_pattern(&Pattern::new(&link, HAS_RELATIONSHIP, WILDCARD)?)
            .iter()
            .map(|triple| triple.key().object().to_string())
            .collect();
        for old in &previous {
            graph.delete_triple(&link, HAS_RELATIONSHIP, old);
        }
        graph.add_triple(&link, HAS_RELATIONSHIP, &relation)?;
        Ok(())
    }

    /// Relation of an occupant to a house, if one was recorded.
    pub fn relation(&self, occupant: &str, house: &str) -> Option<String> {
        let link = relationship_node(house, occupant);
        let pattern = Pattern::new(&link, HAS_RELATIONSHIP, WILDCARD).ok()?;
        let graph = self.graph.read();
        let relation = graph
            .objects_matching(&pattern)
            .first()
            .and_then(|node| graph.node(*node))
            .map(|entity| entity.display().to_string());
        relation
    }

    /// Set a status on a sensor, appliance or occupant, creating the status
    /// on first use. Returns the value actually stored.
    ///
    /// The graph holds the value as a single token (see [`value_token`]);
    /// the status keeps it as given.
    pub fn set_status(&mut self, target: &str, status_name: &str, value: &str) -> Result<String> {
        validate_identifier(status_name)?;
        let owner = self.lookup(target)?;
        if !owner.kind().has_statuses() {
            return Err(HouseMateError::wrong_kind(
                target,
                "a sensor, appliance or occupant",
                owner.kind(),
            ));
        }
        let owner_id = owner.id().to_string();
        let status_id = format!("{owner_id}{ID_SEPARATOR}{status_name}");

        let mut status = match self.entity(&status_id) {
            Some(ModelEntity::Status(status)) => status.clone(),
            Some(other) => {
                return Err(HouseMateError::wrong_kind(&status_id, "a status", other.kind()));
            }
            None => Status::new(&owner_id, status_name),
        };
        let resolved = status
            .resolve(value)
            .map_err(|reason| HouseMateError::invalid_status_value(&status.id, value, reason))?;
        let token = value_token(&resolved);
        TripleLiteral::new(&status.id, HAS_VALUE, &token).validate()?;

        let node = {
            let mut graph = self.graph.write();
            let node = graph.add_triple(&owner_id, HAS_STATUS, &status.id)?.object;
            if let Some(previous) = &status.value {
                graph.delete_triple(&status.id, HAS_VALUE, &value_token(previous));
            }
            graph.add_triple(&status.id, HAS_VALUE, &token)?;
            node
        };

        debug!(status = %status.id, value = %resolved, "set status");
        status.value = Some(resolved.clone());
        self.entities.insert(node, ModelEntity::Status(status));
        Ok(resolved)
    }

    /// Constrain the values of an existing status.
    pub fn set_status_options(
        &mut self,
        status_id: &str,
        params: &HashMap<String, String>,
    ) -> Result<()> {
        let options = StatusOptions::from_params(params)?;
        let node = self.graph.read().require_node(status_id)?;

        match self.entities.get_mut(&node) {
            Some(ModelEntity::Status(status)) => {
                status.options = Some(options);
                Ok(())
            }
            Some(other) => Err(HouseMateError::wrong_kind(status_id, "a status", other.kind())),
            None => Err(KnowledgeError::unknown_identifier(status_id).into()),
        }
    }

    /// Run a pattern query against the model's graph.
    pub fn query(&self, line: &str) -> Result<Option<QueryOutcome>> {
        Ok(self.queries.execute_query(&self.graph.read(), line)?)
    }

    /// Model entities reached from `subject` through `predicate`, in name order.
    fn related(&self, subject: &str, predicate: &str) -> Vec<&ModelEntity> {
        let Ok(pattern) = Pattern::new(subject, predicate, WILDCARD) else {
            return Vec::new();
        };
        let objects = self.graph.read().objects_matching(&pattern);
        objects
            .into_iter()
            .filter_map(|node| self.entities.get(&node))
            .collect()
    }

    /// All houses, in name order.
    pub fn houses(&self) -> Vec<&House> {
        self.related(SYSTEM_NODE, CONTAINS)
            .into_iter()
            .filter_map(|entity| match entity {
                ModelEntity::House(house) => Some(house),
                _ => None,
            })
            .collect()
    }

    /// Statuses of an entity, in name order.
    pub fn statuses(&self, owner: &str) -> Vec<&Status> {
        self.related(owner, HAS_STATUS)
            .into_iter()
            .filter_map(|entity| match entity {
                ModelEntity::Status(status) => Some(status),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValueRejected;

    fn service_with_kitchen() -> HouseMateService {
        let mut service = HouseMateService::new(SharedGraph::new());
        service.create_house("house1").unwrap();
        service.create_room("kitchen1", 1, "kitchen", "house1").unwrap();
        service
    }

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn test_create_house_writes_triple() {
        let service = service_with_kitchen();

        assert_eq!(
            service.graph().query("system contains ?").unwrap(),
            vec!["system contains house1"]
        );
        assert_eq!(service.kind_of("HOUSE1"), Some(EntityKind::House));
        assert_eq!(service.houses().len(), 1);
    }

    #[test]
    fn test_duplicate_house_rejected() {
        let mut service = service_with_kitchen();

        let err = service.create_house("House1").unwrap_err();
        assert!(matches!(
            err,
            HouseMateError::Knowledge(KnowledgeError::DuplicateIdentifier { .. })
        ));
        assert_eq!(service.houses().len(), 1);
    }

    #[test]
    fn test_identifier_rules() {
        let mut service = HouseMateService::new(SharedGraph::new());

        assert!(matches!(
            service.create_house("?"),
            Err(HouseMateError::InvalidCommand { .. })
        ));
        assert!(matches!(
            service.create_house("a:b"),
            Err(HouseMateError::InvalidCommand { .. })
        ));
        assert!(matches!(
            service.create_house(""),
            Err(HouseMateError::InvalidCommand { .. })
        ));
        assert!(service.graph().is_empty());
    }

    #[test]
    fn test_system_identifier_reserved() {
        let mut service = HouseMateService::new(SharedGraph::new());

        for identifier in ["system", "System."] {
            assert!(matches!(
                service.create_house(identifier),
                Err(HouseMateError::InvalidCommand { .. })
            ));
        }
        assert!(matches!(
            service.create_occupant("SYSTEM", "adult"),
            Err(HouseMateError::InvalidCommand { .. })
        ));
        assert!(service.graph().is_empty());
        assert!(service.houses().is_empty());
    }

    #[test]
    fn test_values_do_not_reserve_identifiers() {
        let mut service = service_with_kitchen();
        service.create_appliance("oven1", "oven", "house1:kitchen1").unwrap();
        service.set_status("house1:kitchen1:oven1", "power", "on").unwrap();
        service.create_occupant("jane", "adult").unwrap();
        service.add_occupant("jane", "house1", "resident").unwrap();

        service.create_house("on").unwrap();
        service.create_occupant("resident", "adult").unwrap();

        assert_eq!(service.kind_of("on"), Some(EntityKind::House));
        assert_eq!(service.kind_of("resident"), Some(EntityKind::Occupant));
        assert_eq!(
            service.graph().query("house1:kitchen1:oven1:power has_value ?").unwrap(),
            vec!["house1:kitchen1:oven1:power has_value on"]
        );
        assert_eq!(service.relation("jane", "house1").as_deref(), Some("resident"));
    }

    #[test]
    fn test_imported_subject_reserves_identifier() {
        let graph = SharedGraph::new();
        graph.add_triple("garage", "built_in", "1999").unwrap();
        let mut service = HouseMateService::new(graph);

        assert!(matches!(
            service.create_house("garage"),
            Err(HouseMateError::Knowledge(KnowledgeError::DuplicateIdentifier { .. }))
        ));
        service.create_house("1999").unwrap();
        assert_eq!(service.houses().len(), 1);
    }

    #[test]
    fn test_room_composite_identifier() {
        let service = service_with_kitchen();

        let room = service.entity("house1:kitchen1").unwrap();
        assert_eq!(room.kind(), EntityKind::Room);
        assert_eq!(room.name(), "kitchen1");
        assert_eq!(
            service.graph().query("house1 contains_room ?").unwrap(),
            vec!["house1 contains_room house1:kitchen1"]
        );
    }

    #[test]
    fn test_room_requires_house() {
        let mut service = service_with_kitchen();

        assert!(matches!(
            service.create_room("den", 1, "den", "house9"),
            Err(HouseMateError::Knowledge(KnowledgeError::UnknownIdentifier { .. }))
        ));
        assert!(matches!(
            service.create_room("den", 1, "den", "house1:kitchen1"),
            Err(HouseMateError::WrongKind {
                actual: EntityKind::Room,
                ..
            })
        ));
        // `system` is a graph node but not a model entity
        assert!(matches!(
            service.create_room("den", 1, "den", "system"),
            Err(HouseMateError::Knowledge(KnowledgeError::UnknownIdentifier { .. }))
        ));
    }

    #[test]
    fn test_devices_in_room() {
        let mut service = service_with_kitchen();
        service.create_sensor("smoke1", "smoke_detector", "house1:kitchen1").unwrap();
        service.create_appliance("oven1", "oven", "house1:kitchen1").unwrap();

        assert_eq!(service.kind_of("house1:kitchen1:smoke1"), Some(EntityKind::Sensor));
        assert_eq!(service.kind_of("house1:kitchen1:oven1"), Some(EntityKind::Appliance));
        assert_eq!(
            service.graph().query("house1:kitchen1 ? ?").unwrap(),
            vec![
                "house1:kitchen1 contains_appliance house1:kitchen1:oven1",
                "house1:kitchen1 contains_sensor house1:kitchen1:smoke1",
            ]
        );
        assert!(service.create_sensor("smoke1", "smoke_detector", "house1:kitchen1").is_err());
    }

    #[test]
    fn test_add_occupant_replaces_relation() {
        let mut service = service_with_kitchen();
        service.create_occupant("jane", "Adult").unwrap();

        service.add_occupant("jane", "house1", DEFAULT_RELATION).unwrap();
        assert_eq!(service.relation("jane", "house1").as_deref(), Some("resident"));

        service.add_occupant("jane", "house1", "Guest").unwrap();
        assert_eq!(service.relation("jane", "house1").as_deref(), Some("guest"));
        assert_eq!(
            service.graph().query("house1:jane has_relationship ?").unwrap(),
            vec!["house1:jane has_relationship guest"]
        );
        assert_eq!(
            service.graph().query("house1 contains_occupant ?").unwrap(),
            vec!["house1 contains_occupant jane"]
        );
    }

    #[test]
    fn test_add_occupant_checks_kinds() {
        let mut service = service_with_kitchen();
        service.create_occupant("jane", "adult").unwrap();

        assert!(matches!(
            service.add_occupant("house1", "house1", "resident"),
            Err(HouseMateError::WrongKind { .. })
        ));
        assert!(matches!(
            service.add_occupant("jane", "house2", "resident"),
            Err(HouseMateError::Knowledge(KnowledgeError::UnknownIdentifier { .. }))
        ));
    }

    #[test]
    fn test_set_status_replaces_value() {
        let mut service = service_with_kitchen();
        service.create_appliance("oven1", "oven", "house1:kitchen1").unwrap();

        service.set_status("house1:kitchen1:oven1", "power", "on").unwrap();
        service.set_status("house1:kitchen1:oven1", "power", "off").unwrap();

        assert_eq!(
            service.graph().query("house1:kitchen1:oven1:power has_value ?").unwrap(),
            vec!["house1:kitchen1:oven1:power has_value off"]
        );
        let statuses = service.statuses("house1:kitchen1:oven1");
        assert_eq!(statuses.len(), 1);
        assert_eq!(statuses[0].value.as_deref(), Some("off"));
    }

    #[test]
    fn test_set_status_same_value_twice() {
        let mut service = service_with_kitchen();
        service.create_sensor("cam1", "camera", "house1:kitchen1").unwrap();

        service.set_status("house1:kitchen1:cam1", "mode", "record").unwrap();
        service.set_status("house1:kitchen1:cam1", "mode", "record").unwrap();

        assert_eq!(
            service.graph().query("house1:kitchen1:cam1:mode has_value ?").unwrap().len(),
            1
        );
    }

    #[test]
    fn test_set_status_keeps_multi_word_value() {
        let mut service = service_with_kitchen();
        service.create_occupant("jane", "adult").unwrap();

        assert_eq!(service.set_status("jane", "mood", "not  sure").unwrap(), "not  sure");
        assert_eq!(
            service.graph().query("jane:mood has_value ?").unwrap(),
            vec!["jane:mood has_value not_sure"]
        );
        assert_eq!(service.statuses("jane")[0].value.as_deref(), Some("not  sure"));

        service.set_status("jane", "mood", "happy").unwrap();
        assert_eq!(
            service.graph().query("jane:mood has_value ?").unwrap(),
            vec!["jane:mood has_value happy"]
        );
    }

    #[test]
    fn test_value_token() {
        assert_eq!(value_token("on"), "on");
        assert_eq!(value_token(" not \t sure "), "not_sure");
    }

    #[test]
    fn test_set_status_on_room_rejected() {
        let mut service = service_with_kitchen();

        assert!(matches!(
            service.set_status("house1:kitchen1", "lights", "on"),
            Err(HouseMateError::WrongKind {
                actual: EntityKind::Room,
                ..
            })
        ));
    }

    #[test]
    fn test_range_options_drive_values() {
        let mut service = service_with_kitchen();
        service.create_appliance("tv1", "tv", "house1:kitchen1").unwrap();
        service.set_status("house1:kitchen1:tv1", "channel", "5").unwrap();
        service
            .set_status_options(
                "house1:kitchen1:tv1:channel",
                &params(&[
                    ("type", "range"),
                    ("min", "1"),
                    ("max", "10"),
                    ("incrementor", "UP"),
                    ("decrementor", "DOWN"),
                    ("maxlabel", "LAST"),
                ]),
            )
            .unwrap();

        assert_eq!(service.set_status("house1:kitchen1:tv1", "channel", "UP").unwrap(), "6");
        assert_eq!(service.set_status("house1:kitchen1:tv1", "channel", "99").unwrap(), "10");
        assert_eq!(service.set_status("house1:kitchen1:tv1", "channel", "DOWN").unwrap(), "9");
        assert_eq!(service.set_status("house1:kitchen1:tv1", "channel", "last").unwrap(), "10");
    }

    #[test]
    fn test_enum_options_reject_value() {
        let mut service = service_with_kitchen();
        service.create_occupant("rex", "pet").unwrap();
        service.set_status("rex", "state", "sleeping").unwrap();
        let options = params(&[("type", "enum"), ("values", "active|sleeping")]);
        service.set_status_options("rex:state", &options).unwrap();

        let err = service.set_status("rex", "state", "flying").unwrap_err();
        assert!(matches!(
            err,
            HouseMateError::InvalidStatusValue {
                reason: ValueRejected::NotInEnum(_),
                ..
            }
        ));
        assert_eq!(
            service.graph().query("rex:state has_value ?").unwrap(),
            vec!["rex:state has_value sleeping"]
        );
    }

    #[test]
    fn test_options_require_existing_status() {
        let mut service = service_with_kitchen();

        let options = params(&[("type", "enum"), ("values", "a")]);
        assert!(service
            .set_status_options("house1:kitchen1:tv1:channel", &options)
            .is_err());
        assert!(matches!(
            service.set_status_options("house1", &options),
            Err(HouseMateError::WrongKind { .. })
        ));
    }

    #[test]
    fn test_query_delegates_to_engine() {
        let service = service_with_kitchen();

        let outcome = service.query("? contains_room ?").unwrap().unwrap();
        assert_eq!(outcome.matches, vec!["house1 contains_room house1:kitchen1"]);
        assert!(service.query("# nothing").unwrap().is_none());
        assert!(service.query("? ?").is_err());
    }
}
