//! Knowledge Graph - the in-memory triple store.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::{debug, warn};
use uuid::Uuid;

use super::entity::{Arena, Entity, NodeId, PredicateId};
use super::index::PatternIndex;
use super::pattern::Pattern;
use super::triple::{Triple, TripleId, TripleLiteral};
use crate::config::ErrorPolicy;
use crate::error::{KnowledgeError, Result};

/// Unique identifier for a graph instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphId(pub Uuid);

impl GraphId {
    /// Create a new random graph ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for GraphId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GraphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outcome of inserting a triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    /// The triple was new.
    Added(TripleId),
    /// The triple was already stored; nothing changed.
    Existing(TripleId),
}

impl Insertion {
    pub fn id(self) -> TripleId {
        match self {
            Insertion::Added(id) | Insertion::Existing(id) => id,
        }
    }

    pub fn is_new(self) -> bool {
        matches!(self, Insertion::Added(_))
    }
}

/// Summary of a batch import.
#[derive(Debug, Default)]
pub struct ImportReport {
    /// Triples that were new.
    pub added: usize,

    /// Triples that were already stored.
    pub duplicates: usize,

    /// Statements skipped under the tolerant policy.
    pub errors: Vec<KnowledgeError>,
}

impl ImportReport {
    pub fn skipped(&self) -> usize {
        self.errors.len()
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Size counters for a graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub graph_id: GraphId,
    pub node_count: usize,
    pub predicate_count: usize,
    pub triple_count: usize,
    pub bucket_count: usize,
}

/// The main knowledge graph structure.
///
/// Holds two interning arenas, the triple table and the 8-way pattern
/// index. Every pattern query is a single hash lookup; `add_triple` and
/// `delete_triple` pay for that with eight index updates each. Both take
/// `&mut self`, so a reader can never observe a half-applied update.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeGraph {
    id: GraphId,

    nodes: Arena<NodeId>,

    predicates: Arena<PredicateId>,

    /// All triples stored by ID.
    triples: HashMap<TripleId, Triple>,

    /// Canonical identifier -> triple.
    by_identifier: HashMap<String, TripleId>,

    /// Pattern key -> matching triples.
    index: PatternIndex,

    next_triple_id: u64,
}

impl KnowledgeGraph {
    /// Create a new empty knowledge graph.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(&self) -> GraphId {
        self.id
    }

    /// Return the node for `identifier`, creating it on first reference.
    pub fn get_or_create_node(&mut self, identifier: &str) -> Result<NodeId> {
        let (id, created) = self.nodes.intern(identifier)?;
        if created {
            debug!(graph = %self.id, node = identifier, "interned node");
        }
        Ok(id)
    }

    /// Return the predicate for `identifier`, creating it on first reference.
    pub fn get_or_create_predicate(&mut self, identifier: &str) -> Result<PredicateId> {
        let (id, created) = self.predicates.intern(identifier)?;
        if created {
            debug!(graph = %self.id, predicate = identifier, "interned predicate");
        }
        Ok(id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Entity> {
        self.nodes.get(id)
    }

    pub fn predicate(&self, id: PredicateId) -> Option<&Entity> {
        self.predicates.get(id)
    }

    /// Find a node without creating it.
    pub fn find_node(&self, identifier: &str) -> Option<NodeId> {
        self.nodes.lookup(identifier)
    }

    /// Find a node that is expected to exist.
    pub fn require_node(&self, identifier: &str) -> Result<NodeId> {
        self.find_node(identifier)
            .ok_or_else(|| KnowledgeError::unknown_identifier(identifier))
    }

    /// Check whether a node with this identifier has ever been referenced.
    pub fn exists_identifier(&self, identifier: &str) -> bool {
        self.find_node(identifier).is_some()
    }

    /// Add a triple, returning the stored instance.
    ///
    /// Adding a triple that already exists returns the existing instance.
    pub fn add_triple(&mut self, subject: &str, predicate: &str, object: &str) -> Result<&Triple> {
        let id = self.insert_triple(subject, predicate, object)?.id();
        self.triples
            .get(&id)
            .ok_or_else(|| KnowledgeError::unknown_identifier(id.to_string()))
    }

    /// Add a triple, reporting whether it was new.
    pub fn insert_triple(
        &mut self,
        subject: &str,
        predicate: &str,
        object: &str,
    ) -> Result<Insertion> {
        // Validate all three positions before interning any of them
        let key = TripleLiteral::new(subject, predicate, object).validate()?;
        let identifier = key.identifier();

        if let Some(&existing) = self.by_identifier.get(&identifier) {
            return Ok(Insertion::Existing(existing));
        }

        let subject = self.get_or_create_node(subject)?;
        let predicate = self.get_or_create_predicate(predicate)?;
        let object = self.get_or_create_node(object)?;

        let id = TripleId(self.next_triple_id);
        self.next_triple_id += 1;

        self.index.insert(&key.bucket_keys(), id);
        self.by_identifier.insert(identifier, id);
        let triple = Triple::new(id, subject, predicate, object, key);
        debug!(graph = %self.id, triple = %triple, "added triple");
        self.triples.insert(id, triple);

        Ok(Insertion::Added(id))
    }

    /// Add a literal statement.
    pub fn add_literal(&mut self, literal: &TripleLiteral) -> Result<Insertion> {
        self.insert_triple(&literal.subject, &literal.predicate, &literal.object)
    }

    /// Add a batch of statements.
    ///
    /// Under [`ErrorPolicy::FailFast`] the whole batch is validated first and
    /// the graph is left untouched if any statement is bad. Under
    /// [`ErrorPolicy::Tolerant`] bad statements are skipped and reported.
    pub fn import_triples<I>(&mut self, batch: I, policy: ErrorPolicy) -> Result<ImportReport>
    where
        I: IntoIterator<Item = TripleLiteral>,
    {
        let batch: Vec<TripleLiteral> = batch.into_iter().collect();
        let mut report = ImportReport::default();

        if policy.is_fail_fast() {
            for literal in &batch {
                literal.validate()?;
            }
        }

        for literal in &batch {
            match self.add_literal(literal) {
                Ok(Insertion::Added(_)) => report.added += 1,
                Ok(Insertion::Existing(_)) => report.duplicates += 1,
                Err(err) if policy.is_fail_fast() => return Err(err),
                Err(err) => {
                    warn!(graph = %self.id, error = %err, "skipping statement");
                    report.errors.push(err);
                }
            }
        }

        Ok(report)
    }

    /// Delete a triple. Returns the removed triple, or `None` if absent.
    pub fn delete_triple(
        &mut self,
        subject: &str,
        predicate: &str,
        object: &str,
    ) -> Option<Triple> {
        let id = self.find_triple(subject, predicate, object)?.id;
        self.remove(id)
    }

    /// Delete a triple by ID.
    pub fn remove(&mut self, id: TripleId) -> Option<Triple> {
        let triple = self.triples.remove(&id)?;
        self.by_identifier.remove(triple.identifier());
        self.index.remove(&triple.key().bucket_keys(), id);
        debug!(graph = %self.id, triple = %triple, "deleted triple");
        Some(triple)
    }

    /// Get a triple by ID.
    pub fn triple(&self, id: TripleId) -> Option<&Triple> {
        self.triples.get(&id)
    }

    /// Find a stored triple by its three identifiers.
    pub fn find_triple(&self, subject: &str, predicate: &str, object: &str) -> Option<&Triple> {
        let key = TripleLiteral::new(subject, predicate, object).validate().ok()?;
        let id = self.by_identifier.get(&key.identifier())?;
        self.triples.get(id)
    }

    pub fn contains_triple(&self, subject: &str, predicate: &str, object: &str) -> bool {
        self.find_triple(subject, predicate, object).is_some()
    }

    /// All triples matching a pattern. A single bucket lookup.
    pub fn query_pattern(&self, pattern: &Pattern) -> TripleSet<'_> {
        TripleSet {
            triples: &self.triples,
            ids: self.index.bucket(&pattern.key()),
        }
    }

    /// Parse a three-token query line and run it.
    pub fn query(&self, line: &str) -> Result<TripleSet<'_>> {
        Ok(self.query_pattern(&Pattern::parse(line)?))
    }

    /// Distinct objects of the triples matching a pattern, in display order.
    pub fn objects_matching(&self, pattern: &Pattern) -> Vec<NodeId> {
        let objects: HashSet<NodeId> =
            self.query_pattern(pattern).iter().map(|t| t.object).collect();
        let mut objects: Vec<NodeId> = objects.into_iter().collect();
        objects.sort_by_key(|id| {
            self.node(*id)
                .map(|entity| entity.canonical().to_string())
                .unwrap_or_default()
        });
        objects
    }

    /// Render a triple with the first-seen spelling of each part.
    pub fn describe(&self, triple: &Triple) -> String {
        let subject = self.node(triple.subject).map(Entity::display);
        let predicate = self.predicate(triple.predicate).map(Entity::display);
        let object = self.node(triple.object).map(Entity::display);
        match (subject, predicate, object) {
            (Some(s), Some(p), Some(o)) => format!("{s} {p} {o}"),
            _ => triple.identifier().to_string(),
        }
    }

    /// Get all triples in the graph.
    pub fn triples(&self) -> impl Iterator<Item = &Triple> {
        self.triples.values()
    }

    /// Get the total number of triples.
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn predicate_count(&self) -> usize {
        self.predicates.len()
    }

    pub fn stats(&self) -> GraphStats {
        GraphStats {
            graph_id: self.id,
            node_count: self.nodes.len(),
            predicate_count: self.predicates.len(),
            triple_count: self.triples.len(),
            bucket_count: self.index.bucket_count(),
        }
    }

    #[cfg(test)]
    pub(crate) fn index(&self) -> &PatternIndex {
        &self.index
    }
}

/// Borrowed view over the triples matching one pattern.
#[derive(Debug, Clone, Copy)]
pub struct TripleSet<'a> {
    triples: &'a HashMap<TripleId, Triple>,
    ids: Option<&'a HashSet<TripleId>>,
}

impl<'a> TripleSet<'a> {
    pub fn len(&self) -> usize {
        self.ids.map_or(0, HashSet::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: TripleId) -> bool {
        self.ids.is_some_and(|ids| ids.contains(&id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Triple> + 'a {
        let triples = self.triples;
        self.ids
            .into_iter()
            .flatten()
            .filter_map(move |id| triples.get(id))
    }

    /// Canonical identifiers of the matches, sorted.
    pub fn identifiers(&self) -> Vec<String> {
        let mut identifiers: Vec<String> =
            self.iter().map(|t| t.identifier().to_string()).collect();
        identifiers.sort();
        identifiers
    }
}
