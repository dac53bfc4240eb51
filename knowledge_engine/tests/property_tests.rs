//! Property-based tests for the triple store.
//!
//! These tests check invariants that hold for any sequence of operations:
//! - Interning identity
//! - Indexing completeness
//! - Deletion completeness
//! - Wildcard completeness

use knowledge_engine::{Importer, KnowledgeGraph, Pattern};
use proptest::prelude::*;
use std::collections::HashSet;

fn arb_identifier() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9_:]{0,8}".prop_map(|s| s)
}

fn arb_predicate() -> impl Strategy<Value = String> {
    "[a-z_]{1,6}".prop_map(|s| s)
}

fn arb_triple() -> impl Strategy<Value = (String, String, String)> {
    (arb_identifier(), arb_predicate(), arb_identifier())
}

/// The eight query lines that must find `s p o`.
fn shapes(s: &str, p: &str, o: &str) -> Vec<String> {
    (0..8)
        .map(|mask| {
            let pick = |bit: usize, token: &str| {
                if mask & bit != 0 {
                    token.to_string()
                } else {
                    "?".to_string()
                }
            };
            format!("{} {} {}", pick(0b100, s), pick(0b010, p), pick(0b001, o))
        })
        .collect()
}

fn canonical((s, p, o): &(String, String, String)) -> String {
    format!("{} {} {}", s.to_lowercase(), p.to_lowercase(), o.to_lowercase())
}

mod interning_props {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn case_variants_share_one_node(id in arb_identifier()) {
            let mut graph = KnowledgeGraph::new();

            let lower = graph.get_or_create_node(&id.to_lowercase()).unwrap();
            let upper = graph.get_or_create_node(&id.to_uppercase()).unwrap();
            let dotted = graph.get_or_create_node(&format!("{id}.")).unwrap();

            prop_assert_eq!(lower, upper);
            prop_assert_eq!(lower, dotted);
            prop_assert_eq!(graph.node_count(), 1);
        }
    }
}

mod index_props {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn every_shape_finds_added_triple(triples in prop::collection::vec(arb_triple(), 1..20)) {
            let mut graph = KnowledgeGraph::new();
            for (s, p, o) in &triples {
                graph.add_triple(s, p, o).unwrap();
            }

            for (s, p, o) in &triples {
                let id = graph.find_triple(s, p, o).unwrap().id;
                for shape in shapes(s, p, o) {
                    prop_assert!(
                        graph.query(&shape).unwrap().contains(id),
                        "`{} {} {}` missing from `{}`", s, p, o, shape
                    );
                }
            }
        }

        #[test]
        fn deleted_triple_is_gone_from_every_shape(
            triples in prop::collection::vec(arb_triple(), 1..20),
            victim in any::<prop::sample::Index>(),
        ) {
            let mut graph = KnowledgeGraph::new();
            for (s, p, o) in &triples {
                graph.add_triple(s, p, o).unwrap();
            }

            let (s, p, o) = &triples[victim.index(triples.len())];
            let removed = graph.delete_triple(s, p, o).unwrap();

            for shape in shapes(s, p, o) {
                prop_assert!(!graph.query(&shape).unwrap().contains(removed.id));
            }
            let exact = format!("{} {} {}", s, p, o);
            prop_assert!(graph.query(&exact).unwrap().is_empty());
        }

        #[test]
        fn everything_equals_net_set(
            added in prop::collection::vec(arb_triple(), 0..30),
            deleted in prop::collection::vec(any::<prop::sample::Index>(), 0..10),
        ) {
            let mut graph = KnowledgeGraph::new();
            let mut expected: HashSet<String> = HashSet::new();

            for triple in &added {
                let (s, p, o) = triple;
                graph.add_triple(s, p, o).unwrap();
                expected.insert(canonical(triple));
            }
            if !added.is_empty() {
                for index in &deleted {
                    let triple = &added[index.index(added.len())];
                    let (s, p, o) = triple;
                    graph.delete_triple(s, p, o);
                    expected.remove(&canonical(triple));
                }
            }

            let everything = graph.query_pattern(&Pattern::everything());
            let found: HashSet<String> = everything.identifiers().into_iter().collect();
            prop_assert_eq!(everything.len(), graph.len());
            prop_assert_eq!(found, expected);
        }
    }
}

mod import_props {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn imported_statement_round_trips(triple in arb_triple()) {
            let (s, p, o) = &triple;
            let mut graph = KnowledgeGraph::new();
            Importer::default()
                .import_str(&mut graph, &format!("{s} {p} {o}.\n"), "prop")
                .unwrap();

            let result = graph.query(&format!("{s} {p} {o}")).unwrap();
            prop_assert_eq!(result.identifiers(), vec![canonical(&triple)]);
        }
    }
}
