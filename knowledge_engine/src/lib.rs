//! # Knowledge Engine
//!
//! An in-memory store of subject-predicate-object statements. Every pattern
//! query, with wildcards in any position, is answered by a single hash
//! lookup.
//!
//! ## Core Components
//!
//! - **knowledge_base**: Interned entities, triples and the 8-way pattern index
//! - **importer**: Line-oriented statement import
//! - **query_engine**: Line-oriented pattern queries and result formatting
//! - **config**: Error policies and output settings, loadable from TOML
//! - **source**: Numbered line reading that survives undecodable lines
//!
//! ## Design Philosophy
//!
//! - **Read-Optimized**: Writes pay for eight index updates so reads never scan
//! - **Interned**: One entity per canonical identifier, reached through handles
//! - **Explicit Ownership**: No global store; callers own graphs and share them via [`SharedGraph`]

pub mod config;
pub mod error;
pub mod importer;
pub mod knowledge_base;
pub mod query_engine;
pub mod source;

pub use config::*;
pub use error::*;
pub use importer::*;
pub use knowledge_base::*;
pub use query_engine::*;
pub use source::*;
