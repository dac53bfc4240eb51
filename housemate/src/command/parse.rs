//! Command grammar - tokenizing and parsing command lines.

use std::collections::HashMap;

use crate::error::{HouseMateError, Result};
use crate::model::EntityKind;
use crate::service::{DEFAULT_RELATION, ID_SEPARATOR};

/// Split a command line on whitespace. Double-quoted spans keep their
/// spaces and lose their quotes.
pub fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut pending = false;

    for ch in line.trim().chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                pending = true;
            }
            ch if ch.is_whitespace() && !in_quotes => {
                if pending {
                    tokens.push(std::mem::take(&mut current));
                    pending = false;
                }
            }
            ch => {
                current.push(ch);
                pending = true;
            }
        }
    }
    if pending {
        tokens.push(current);
    }
    tokens
}

/// Pair up `key value` tokens. Keys are case-folded; a trailing key
/// without a value is dropped.
pub fn key_values(tokens: &[String]) -> HashMap<String, String> {
    tokens
        .chunks_exact(2)
        .map(|pair| (pair[0].to_lowercase(), pair[1].clone()))
        .collect()
}

/// One parsed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    DefineHouse {
        id: String,
    },
    DefineRoom {
        id: String,
        floor: i32,
        room_type: String,
        house: String,
    },
    DefineSensor {
        id: String,
        sensor_type: String,
        room: String,
    },
    DefineAppliance {
        id: String,
        appliance_type: String,
        room: String,
    },
    DefineOccupant {
        id: String,
        occupant_type: String,
    },
    AddOccupant {
        occupant: String,
        house: String,
        relation: String,
    },
    SetStatus {
        target_kind: EntityKind,
        target: String,
        status: String,
        value: String,
    },
    SetOptions {
        status: String,
        params: HashMap<String, String>,
    },
    Show {
        id: Option<String>,
    },
    Query {
        pattern: String,
    },
}

impl Command {
    /// Parse a command line. Returns `Ok(None)` for blank and comment lines.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let tokens = tokenize(line);
        let Some(verb) = tokens.first() else {
            return Ok(None);
        };
        if verb.starts_with('#') {
            return Ok(None);
        }

        let command = match verb.to_lowercase().as_str() {
            "define" => parse_define(&tokens, line)?,
            "add" => parse_add(&tokens, line)?,
            "set" => parse_set(&tokens, line)?,
            "show" => parse_show(&tokens, line)?,
            "query" => parse_query(&tokens, line)?,
            _ => {
                return Err(HouseMateError::invalid_command(
                    "command must start with define, add, set, show or query",
                    line.trim(),
                ))
            }
        };
        Ok(Some(command))
    }
}

fn keyword(tokens: &[String], index: usize) -> Option<String> {
    tokens.get(index).map(|token| token.to_lowercase())
}

fn required<'a>(
    params: &'a HashMap<String, String>,
    key: &str,
    description: &str,
    line: &str,
) -> Result<&'a str> {
    params
        .get(key)
        .map(String::as_str)
        .ok_or_else(|| HouseMateError::invalid_command(description, line.trim()))
}

fn parse_define(tokens: &[String], line: &str) -> Result<Command> {
    let params = key_values(&tokens[1..]);
    let kind = keyword(tokens, 1).unwrap_or_default();

    match (kind.as_str(), tokens.len()) {
        ("house", 3) => Ok(Command::DefineHouse {
            id: tokens[2].clone(),
        }),
        ("room", 9) => {
            let description = "define room needs room, floor, type and house";
            let floor = required(&params, "floor", description, line)?;
            Ok(Command::DefineRoom {
                id: required(&params, "room", description, line)?.to_string(),
                floor: floor.parse().map_err(|_| {
                    HouseMateError::invalid_command("floor must be an integer", floor)
                })?,
                room_type: required(&params, "type", description, line)?.to_string(),
                house: required(&params, "house", description, line)?.to_string(),
            })
        }
        ("sensor", 7) => {
            let description = "define sensor needs sensor, type and room";
            Ok(Command::DefineSensor {
                id: required(&params, "sensor", description, line)?.to_string(),
                sensor_type: required(&params, "type", description, line)?.to_string(),
                room: required(&params, "room", description, line)?.to_string(),
            })
        }
        ("appliance", 7) => {
            let description = "define appliance needs appliance, type and room";
            Ok(Command::DefineAppliance {
                id: required(&params, "appliance", description, line)?.to_string(),
                appliance_type: required(&params, "type", description, line)?.to_string(),
                room: required(&params, "room", description, line)?.to_string(),
            })
        }
        ("occupant", 5) => {
            let description = "define occupant needs occupant and type";
            Ok(Command::DefineOccupant {
                id: required(&params, "occupant", description, line)?.to_string(),
                occupant_type: required(&params, "type", description, line)?.to_string(),
            })
        }
        _ => Err(HouseMateError::invalid_command(
            "define takes house, room, sensor, appliance or occupant",
            line.trim(),
        )),
    }
}

fn parse_add(tokens: &[String], line: &str) -> Result<Command> {
    if keyword(tokens, 1).as_deref() != Some("occupant") || !matches!(tokens.len(), 5 | 7) {
        return Err(HouseMateError::invalid_command(
            "expected `add occupant <id> to_house <house> [relation <relation>]`",
            line.trim(),
        ));
    }

    let params = key_values(&tokens[1..]);
    let description = "add occupant needs occupant and to_house";
    let relation = match params.get("relation") {
        Some(relation) => relation.clone(),
        None if tokens.len() == 5 => DEFAULT_RELATION.to_string(),
        None => {
            return Err(HouseMateError::invalid_command(
                "add occupant takes only a relation after to_house",
                line.trim(),
            ))
        }
    };
    Ok(Command::AddOccupant {
        occupant: required(&params, "occupant", description, line)?.to_string(),
        house: required(&params, "to_house", description, line)?.to_string(),
        relation,
    })
}

fn parse_set(tokens: &[String], line: &str) -> Result<Command> {
    let params = key_values(&tokens[1..]);

    if keyword(tokens, 1).as_deref() == Some("options") {
        let status = required(&params, "options", "set options needs a status", line)?.to_string();
        if !params.contains_key("type") {
            return Err(HouseMateError::invalid_command("set options needs a type", line.trim()));
        }
        return Ok(Command::SetOptions { status, params });
    }

    if tokens.len() != 7 {
        return Err(HouseMateError::invalid_command(
            "expected `set <sensor|appliance|occupant> <id> status <status> value <value>`",
            line.trim(),
        ));
    }
    let target_kind = keyword(tokens, 1)
        .and_then(|keyword| EntityKind::from_keyword(&keyword))
        .filter(EntityKind::has_statuses)
        .ok_or_else(|| {
            HouseMateError::invalid_command(
                "only a sensor, appliance or occupant can be set",
                line.trim(),
            )
        })?;

    let description = "set needs status and value";
    Ok(Command::SetStatus {
        target_kind,
        target: tokens[2].clone(),
        status: required(&params, "status", description, line)?.to_string(),
        value: required(&params, "value", description, line)?.to_string(),
    })
}

fn parse_show(tokens: &[String], line: &str) -> Result<Command> {
    let is_configuration = keyword(tokens, 1).as_deref() == Some("configuration");
    let id = match tokens.len() {
        2 if is_configuration => None,
        3 => Some(tokens[2].clone()),
        4 if is_configuration => Some(tokens[3].clone()),
        5 if !is_configuration && keyword(tokens, 3).as_deref() == Some("status") => {
            Some(format!("{}{ID_SEPARATOR}{}", tokens[2], tokens[4]))
        }
        _ => {
            return Err(HouseMateError::invalid_command(
                "expected `show configuration [<kind> <id>]` \
                 or `show <kind> <id> [status <status>]`",
                line.trim(),
            ))
        }
    };
    Ok(Command::Show { id })
}

fn parse_query(tokens: &[String], line: &str) -> Result<Command> {
    if tokens.len() != 4 {
        return Err(HouseMateError::invalid_command(
            "expected `query <subject> <predicate> <object>`",
            line.trim(),
        ));
    }
    Ok(Command::Query {
        pattern: tokens[1..].join(" "),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Command {
        Command::parse(line).unwrap().unwrap()
    }

    #[test]
    fn test_tokenize_quotes() {
        assert_eq!(tokenize("  define house  house1 "), vec!["define", "house", "house1"]);
        assert_eq!(
            tokenize(r#"set occupant jane status note value "hello there""#),
            vec!["set", "occupant", "jane", "status", "note", "value", "hello there"]
        );
        assert_eq!(tokenize(r#"a "" b"#), vec!["a", "", "b"]);
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn test_key_values() {
        let tokens = tokenize("room kitchen1 FLOOR 1 type kitchen extra");
        let params = key_values(&tokens);
        assert_eq!(params.get("room").map(String::as_str), Some("kitchen1"));
        assert_eq!(params.get("floor").map(String::as_str), Some("1"));
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn test_skips_comments_and_blanks() {
        assert!(Command::parse("").unwrap().is_none());
        assert!(Command::parse("# define house house1").unwrap().is_none());
    }

    #[test]
    fn test_parse_define() {
        assert_eq!(
            parse("define house house1"),
            Command::DefineHouse { id: "house1".into() }
        );
        assert_eq!(
            parse("define room kitchen1 floor 1 type kitchen house house1"),
            Command::DefineRoom {
                id: "kitchen1".into(),
                floor: 1,
                room_type: "kitchen".into(),
                house: "house1".into(),
            }
        );
        assert_eq!(
            parse("define appliance oven1 type oven room house1:kitchen1"),
            Command::DefineAppliance {
                id: "oven1".into(),
                appliance_type: "oven".into(),
                room: "house1:kitchen1".into(),
            }
        );
        assert_eq!(
            parse("define occupant jane type adult"),
            Command::DefineOccupant {
                id: "jane".into(),
                occupant_type: "adult".into(),
            }
        );
    }

    #[test]
    fn test_parse_define_errors() {
        assert!(
            Command::parse("define room kitchen1 floor one type kitchen house house1").is_err()
        );
        assert!(Command::parse("define room kitchen1 floor 1 type kitchen").is_err());
        assert!(Command::parse("define garage g1").is_err());
        assert!(Command::parse("launch rocket").is_err());
    }

    #[test]
    fn test_parse_add_occupant() {
        assert_eq!(
            parse("add occupant jane to_house house1"),
            Command::AddOccupant {
                occupant: "jane".into(),
                house: "house1".into(),
                relation: "resident".into(),
            }
        );
        assert_eq!(
            parse("add occupant jane to_house house1 relation guest"),
            Command::AddOccupant {
                occupant: "jane".into(),
                house: "house1".into(),
                relation: "guest".into(),
            }
        );
        assert!(Command::parse("add occupant jane to_house house1 mood happy").is_err());
    }

    #[test]
    fn test_parse_set() {
        assert_eq!(
            parse("set appliance house1:kitchen1:oven1 status power value on"),
            Command::SetStatus {
                target_kind: EntityKind::Appliance,
                target: "house1:kitchen1:oven1".into(),
                status: "power".into(),
                value: "on".into(),
            }
        );
        assert!(Command::parse("set room house1:kitchen1 status lights value on").is_err());

        match parse("set options house1:kitchen1:tv1:channel type range min 0 max 100") {
            Command::SetOptions { status, params } => {
                assert_eq!(status, "house1:kitchen1:tv1:channel");
                assert_eq!(params.get("max").map(String::as_str), Some("100"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_show() {
        assert_eq!(parse("show configuration"), Command::Show { id: None });
        assert_eq!(
            parse("show configuration house house1"),
            Command::Show { id: Some("house1".into()) }
        );
        assert_eq!(
            parse("show appliance house1:kitchen1:oven1"),
            Command::Show { id: Some("house1:kitchen1:oven1".into()) }
        );
        assert_eq!(
            parse("show appliance house1:kitchen1:oven1 status power"),
            Command::Show { id: Some("house1:kitchen1:oven1:power".into()) }
        );
        assert!(Command::parse("show").is_err());
    }

    #[test]
    fn test_parse_query() {
        assert_eq!(
            parse("query house1 contains_room ?"),
            Command::Query { pattern: "house1 contains_room ?".into() }
        );
        assert!(Command::parse("query house1 ?").is_err());
    }
}
