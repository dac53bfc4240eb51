//! Knowledge Base module - the in-memory triple store.
//!
//! The store consists of:
//! - **Entities**: Interned nodes (subjects, objects) and predicates
//! - **Triples**: Deduplicated subject-predicate-object statements
//! - **Pattern index**: Eight buckets per triple, one per wildcard shape

mod entity;
mod graph;
mod index;
mod pattern;
mod shared;
mod triple;

pub use entity::*;
pub use graph::*;
pub use index::*;
pub use pattern::*;
pub use shared::*;
pub use triple::*;
