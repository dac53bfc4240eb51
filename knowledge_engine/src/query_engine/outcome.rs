//! Query outcomes and their rendering.

use serde::{Deserialize, Serialize};
use std::io::{self, Write};

use crate::error::KnowledgeError;

/// The result of one query line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryOutcome {
    /// Canonicalized query line.
    pub query: String,

    /// Sorted canonical identifiers of the matching triples.
    pub matches: Vec<String>,
}

impl QueryOutcome {
    pub fn new(query: impl Into<String>, matches: Vec<String>) -> Self {
        Self {
            query: query.into(),
            matches,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Render as text lines: the query, then each match or the sentinel.
    pub fn render(&self, sentinel: &str) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.matches.len() + 1);
        lines.push(format!("{}.", self.query));
        if self.matches.is_empty() {
            lines.push(sentinel.to_string());
        } else {
            lines.extend(self.matches.iter().map(|m| format!("{m}.")));
        }
        lines
    }

    /// Write the text rendering, one line each.
    pub fn write_to<W: Write>(&self, out: &mut W, sentinel: &str) -> io::Result<()> {
        for line in self.render(sentinel) {
            writeln!(out, "{line}")?;
        }
        Ok(())
    }
}

/// Summary of a query file run.
#[derive(Debug, Default)]
pub struct QueryReport {
    /// Queries that ran.
    pub executed: usize,

    /// Queries that matched nothing.
    pub empty: usize,

    /// Lines skipped under the tolerant policy.
    pub errors: Vec<KnowledgeError>,
}
