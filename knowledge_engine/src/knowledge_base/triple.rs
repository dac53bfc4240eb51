//! Triple definitions - the statements stored in the knowledge graph.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::entity::{storable_key, NodeId, PredicateId};
use super::index::{bucket_key, bucket_keys, BUCKETS_PER_TRIPLE};
use crate::error::Result;

/// Unique identifier for stored triples.
///
/// Ids are never reused within a graph, so a triple that is deleted and
/// added again gets a fresh id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TripleId(pub(crate) u64);

impl fmt::Display for TripleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The canonical tokens of a triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TripleKey {
    subject: String,
    predicate: String,
    object: String,
}

impl TripleKey {
    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn predicate(&self) -> &str {
        &self.predicate
    }

    pub fn object(&self) -> &str {
        &self.object
    }

    /// Canonical `"subject predicate object"` identifier.
    pub fn identifier(&self) -> String {
        bucket_key(Some(&self.subject), Some(&self.predicate), Some(&self.object))
    }

    /// Every pattern bucket this triple belongs to.
    pub fn bucket_keys(&self) -> [String; BUCKETS_PER_TRIPLE] {
        bucket_keys(&self.subject, &self.predicate, &self.object)
    }
}

/// A stored statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triple {
    pub id: TripleId,
    pub subject: NodeId,
    pub predicate: PredicateId,
    pub object: NodeId,

    /// Canonical identifier, cached for output.
    identifier: String,

    key: TripleKey,
}

impl Triple {
    pub(crate) fn new(
        id: TripleId,
        subject: NodeId,
        predicate: PredicateId,
        object: NodeId,
        key: TripleKey,
    ) -> Self {
        Self {
            id,
            subject,
            predicate,
            object,
            identifier: key.identifier(),
            key,
        }
    }

    /// Canonical `"subject predicate object"` identifier.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn key(&self) -> &TripleKey {
        &self.key
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier)
    }
}

/// A statement as read from outside, before interning.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TripleLiteral {
    pub subject: String,
    pub predicate: String,
    pub object: String,
}

impl TripleLiteral {
    /// Create a literal from three raw tokens.
    pub fn new(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }

    /// Raw `"subject predicate object"` text, as written.
    pub fn identifier(&self) -> String {
        format!("{} {} {}", self.subject, self.predicate, self.object)
    }

    /// Check that every token can be stored and return the canonical key.
    pub fn validate(&self) -> Result<TripleKey> {
        Ok(TripleKey {
            subject: storable_key(&self.subject)?,
            predicate: storable_key(&self.predicate)?,
            object: storable_key(&self.object)?,
        })
    }
}

impl fmt::Display for TripleLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier())
    }
}
