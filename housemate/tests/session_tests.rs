//! End-to-end session tests: statements, commands and queries over one graph.

use std::io::Write;

use housemate::{CommandProcessor, HouseMateConfig, HouseMateService};
use knowledge_engine::{ErrorPolicy, Importer, QueryEngine, SharedGraph};

const COMMANDS: &str = r#"
define house house1
define room living1 floor 1 type living_room house house1
define sensor thermo1 type thermostat room house1:living1
define appliance tv1 type tv room house1:living1
define occupant jane type adult
add occupant jane to_house house1 relation resident

set appliance house1:living1:tv1 status channel value 3
set options house1:living1:tv1:channel type range min 1 max 5 incrementor UP decrementor DOWN
set appliance house1:living1:tv1 status channel value UP
set appliance house1:living1:tv1 status channel value UP
set appliance house1:living1:tv1 status channel value UP

set sensor house1:living1:thermo1 status reading value 21
set occupant jane status mood value "not sure"
"#;

#[test]
fn test_session_over_preloaded_graph() {
    let graph = SharedGraph::new();
    Importer::new(ErrorPolicy::FailFast)
        .import_str(&mut graph.write(), "house1 built_in 1999.\nhouse1 painted blue.\n", "facts")
        .unwrap();

    let service = HouseMateService::new(graph.clone());
    let mut processor = CommandProcessor::new(service, ErrorPolicy::Tolerant);
    let mut out = Vec::new();
    let report = processor
        .execute_reader(COMMANDS.as_bytes(), "setup", &mut out)
        .unwrap();

    // `house1` is already the subject of imported statements, so defining it
    // is a duplicate and every command that depends on it fails too.
    // Only the occupant and its mood do not depend on the house.
    assert_eq!(report.executed, 2);
    assert!(report.errors.len() > 1);
    assert!(graph.exists_identifier("jane"));
    assert_eq!(graph.query("jane:mood has_value ?").unwrap(), vec!["jane:mood has_value not_sure"]);
    assert_eq!(graph.query("house1 painted ?").unwrap(), vec!["house1 painted blue"]);
}

#[test]
fn test_session_builds_model() {
    let config = HouseMateConfig::default();
    let graph = SharedGraph::new();
    let service = HouseMateService::with_config(graph.clone(), &config.engine);
    let mut processor = CommandProcessor::new(service, config.command_policy);

    let mut out = Vec::new();
    let report = processor
        .execute_reader(COMMANDS.as_bytes(), "setup", &mut out)
        .unwrap();

    assert!(report.is_clean());
    assert_eq!(report.executed, 13);

    // The quoted mood keeps its space on the status and is a single token in the graph
    let mood = processor.service().statuses("jane")[0].clone();
    assert_eq!(mood.value.as_deref(), Some("not sure"));
    assert_eq!(graph.query("jane:mood has_value ?").unwrap(), vec!["jane:mood has_value not_sure"]);

    assert_eq!(
        graph.query("house1:living1:tv1:channel has_value ?").unwrap(),
        vec!["house1:living1:tv1:channel has_value 5"]
    );
    assert_eq!(
        graph.query("? has_status ?").unwrap(),
        vec![
            "house1:living1:thermo1 has_status house1:living1:thermo1:reading",
            "house1:living1:tv1 has_status house1:living1:tv1:channel",
            "jane has_status jane:mood",
        ]
    );

    let mut graph_view = graph.write();
    let outcome = QueryEngine::with_defaults()
        .execute_query(&graph_view, "house1:jane has_relationship ?")
        .unwrap()
        .unwrap();
    assert_eq!(outcome.matches, vec!["house1:jane has_relationship resident"]);

    // Raw triples added outside the service stay queryable alongside the model
    graph_view.add_triple("house1", "painted", "blue").unwrap();
    assert_eq!(graph_view.query("house1 ? ?").unwrap().len(), 3);
}

#[test]
fn test_fail_fast_command_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "define house house1").unwrap();
    writeln!(file, "define room kitchen1 floor 1 type kitchen house house2").unwrap();
    writeln!(file, "define house house3").unwrap();

    let service = HouseMateService::new(SharedGraph::new());
    let mut processor = CommandProcessor::new(service, ErrorPolicy::FailFast);
    let mut out = Vec::new();

    let err = processor.execute_file(file.path(), &mut out).unwrap_err();
    assert_eq!(err.location().line, Some(2));
    assert!(err.to_string().contains("unknown identifier"));
    assert!(processor.service().entity("house3").is_none());
}
