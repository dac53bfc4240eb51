//! Shared graph handle for concurrent callers.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::graph::{Insertion, KnowledgeGraph};
use super::triple::Triple;
use crate::error::Result;

/// A cloneable handle to one graph.
///
/// Queries take the read lock and may run in parallel; adds and deletes take
/// the write lock, so the triple table and all eight buckets change together.
#[derive(Debug, Clone, Default)]
pub struct SharedGraph {
    inner: Arc<RwLock<KnowledgeGraph>>,
}

impl SharedGraph {
    /// Wrap a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire shared access.
    pub fn read(&self) -> RwLockReadGuard<'_, KnowledgeGraph> {
        // Every mutation completes before the guard drops, so a poisoned
        // lock still guards a consistent graph.
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Acquire exclusive access.
    pub fn write(&self) -> RwLockWriteGuard<'_, KnowledgeGraph> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add_triple(&self, subject: &str, predicate: &str, object: &str) -> Result<Insertion> {
        self.write().insert_triple(subject, predicate, object)
    }

    pub fn delete_triple(&self, subject: &str, predicate: &str, object: &str) -> Option<Triple> {
        self.write().delete_triple(subject, predicate, object)
    }

    /// Run a query line and collect the sorted identifiers of the matches.
    pub fn query(&self, line: &str) -> Result<Vec<String>> {
        Ok(self.read().query(line)?.identifiers())
    }

    pub fn exists_identifier(&self, identifier: &str) -> bool {
        self.read().exists_identifier(identifier)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}

impl From<KnowledgeGraph> for SharedGraph {
    fn from(graph: KnowledgeGraph) -> Self {
        Self {
            inner: Arc::new(RwLock::new(graph)),
        }
    }
}
