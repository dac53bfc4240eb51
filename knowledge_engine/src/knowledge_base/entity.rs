//! Entity definitions - interned nodes and predicates.
//!
//! Entities are never constructed directly. The graph owns one [`Arena`] for
//! nodes and one for predicates, and hands out `Copy` handles into them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use crate::error::{KnowledgeError, Result};

/// The token that matches any value in a query position.
pub const WILDCARD: &str = "?";

/// Punctuation stripped from the end of an identifier before comparison.
const TRAILING_SEPARATORS: &[char] = &['.', ',', ';'];

/// Normalize an identifier for identity comparison and indexing.
///
/// Trims whitespace, strips trailing separator punctuation and case-folds.
/// Fails with `InvalidIdentifier` when nothing is left or when the identifier
/// has inner whitespace.
pub fn canonicalize(raw: &str) -> Result<String> {
    let display = display_text(raw);
    if display.is_empty() || display.chars().any(char::is_whitespace) {
        return Err(KnowledgeError::invalid_identifier(raw));
    }
    Ok(display.to_lowercase())
}

/// Canonical key for something that will be stored, which rules out the wildcard.
pub(crate) fn storable_key(raw: &str) -> Result<String> {
    let canonical = canonicalize(raw)?;
    if canonical == WILDCARD {
        return Err(KnowledgeError::reserved(raw));
    }
    Ok(canonical)
}

fn display_text(raw: &str) -> &str {
    raw.trim().trim_end_matches(TRAILING_SEPARATORS).trim_end()
}

/// What an interned entity stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Subject or object of a triple.
    Node,
    /// Relation name of a triple.
    Predicate,
}

impl EntityKind {
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Node => "node",
            EntityKind::Predicate => "predicate",
        }
    }
}

/// An interned identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    kind: EntityKind,

    /// Identity of the entity.
    canonical: String,

    /// First-seen spelling, kept for display only.
    display: String,
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    pub fn display(&self) -> &str {
        &self.display
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display)
    }
}

/// A typed index into an [`Arena`].
pub trait Handle: Copy + Eq + Hash + fmt::Debug {
    const KIND: EntityKind;

    fn from_index(index: usize) -> Self;

    fn index(self) -> usize;
}

/// Handle to an interned node (subject or object).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(usize);

impl Handle for NodeId {
    const KIND: EntityKind = EntityKind::Node;

    fn from_index(index: usize) -> Self {
        Self(index)
    }

    fn index(self) -> usize {
        self.0
    }
}

/// Handle to an interned predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PredicateId(usize);

impl Handle for PredicateId {
    const KIND: EntityKind = EntityKind::Predicate;

    fn from_index(index: usize) -> Self {
        Self(index)
    }

    fn index(self) -> usize {
        self.0
    }
}

/// Interning arena: one [`Entity`] per canonical identifier.
#[derive(Debug, Clone)]
pub struct Arena<H> {
    entries: Vec<Entity>,
    by_key: HashMap<String, H>,
}

impl<H: Handle> Default for Arena<H> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            by_key: HashMap::new(),
        }
    }
}

impl<H: Handle> Arena<H> {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the handle for `raw`, creating the entity on first sight.
    ///
    /// The boolean is true when the entity was created by this call.
    pub fn intern(&mut self, raw: &str) -> Result<(H, bool)> {
        let canonical = storable_key(raw)?;
        if let Some(&handle) = self.by_key.get(&canonical) {
            return Ok((handle, false));
        }

        let handle = H::from_index(self.entries.len());
        self.entries.push(Entity {
            kind: H::KIND,
            canonical: canonical.clone(),
            display: display_text(raw).to_string(),
        });
        self.by_key.insert(canonical, handle);
        Ok((handle, true))
    }

    /// Find an existing entity without creating one.
    pub fn lookup(&self, raw: &str) -> Option<H> {
        let canonical = canonicalize(raw).ok()?;
        self.by_key.get(&canonical).copied()
    }

    /// Get an entity by handle.
    pub fn get(&self, handle: H) -> Option<&Entity> {
        self.entries.get(handle.index())
    }

    /// Iterate over all entities in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (H, &Entity)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, entity)| (H::from_index(index), entity))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonicalize() {
        assert_eq!(canonicalize("Kitchen1").unwrap(), "kitchen1");
        assert_eq!(canonicalize("  House1.  ").unwrap(), "house1");
        assert_eq!(canonicalize("room;,.").unwrap(), "room");
        assert_eq!(canonicalize("house1:kitchen").unwrap(), "house1:kitchen");
        assert_eq!(canonicalize("?").unwrap(), "?");
    }

    #[test]
    fn test_canonicalize_rejects_empty_and_spaces() {
        assert!(matches!(
            canonicalize(""),
            Err(KnowledgeError::InvalidIdentifier { .. })
        ));
        assert!(matches!(
            canonicalize("..."),
            Err(KnowledgeError::InvalidIdentifier { .. })
        ));
        assert!(matches!(
            canonicalize("living room"),
            Err(KnowledgeError::InvalidIdentifier { .. })
        ));
    }

    #[test]
    fn test_intern_same_instance() {
        let mut arena: Arena<NodeId> = Arena::new();

        let (first, created) = arena.intern("Kitchen1").unwrap();
        assert!(created);
        let (second, created) = arena.intern("kitchen1").unwrap();
        assert!(!created);

        assert_eq!(first, second);
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn test_first_spelling_kept_for_display() {
        let mut arena: Arena<NodeId> = Arena::new();

        let (id, _) = arena.intern("Kitchen1.").unwrap();
        arena.intern("KITCHEN1").unwrap();

        let entity = arena.get(id).unwrap();
        assert_eq!(entity.display(), "Kitchen1");
        assert_eq!(entity.canonical(), "kitchen1");
        assert_eq!(entity.kind(), EntityKind::Node);
        assert_eq!(entity.to_string(), "Kitchen1");
    }

    #[test]
    fn test_wildcard_is_reserved() {
        let mut arena: Arena<PredicateId> = Arena::new();
        assert!(matches!(
            arena.intern("?"),
            Err(KnowledgeError::ReservedToken { .. })
        ));
        assert!(arena.is_empty());
    }

    #[test]
    fn test_lookup_does_not_create() {
        let mut arena: Arena<PredicateId> = Arena::new();
        assert_eq!(arena.lookup("contains"), None);
        assert!(arena.is_empty());

        let (id, _) = arena.intern("Contains").unwrap();
        assert_eq!(arena.lookup("CONTAINS"), Some(id));
        assert_eq!(arena.get(id).unwrap().kind(), EntityKind::Predicate);
        assert_eq!(arena.lookup(""), None);
    }

    #[test]
    fn test_iter_in_creation_order() {
        let mut arena: Arena<NodeId> = Arena::new();
        arena.intern("b").unwrap();
        arena.intern("a").unwrap();

        let names: Vec<_> = arena.iter().map(|(_, e)| e.canonical().to_string()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }
}
