//! Query Engine - runs pattern query lines against a graph.
//!
//! Each query line goes through the same steps:
//! 1. **Skip**: Blank lines and `#` comments carry no query
//! 2. **Parse**: Exactly three tokens, any of which may be `?`
//! 3. **Lookup**: One bucket lookup in the pattern index
//! 4. **Format**: Sorted identifiers, or the no-match sentinel

mod outcome;

pub use outcome::*;

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use tracing::{info, warn};

use crate::config::{EngineConfig, ErrorPolicy};
use crate::error::{KnowledgeError, Result};
use crate::importer::is_skippable;
use crate::knowledge_base::{KnowledgeGraph, Pattern};
use crate::source::SourceLines;

/// Executes query lines and formats their results.
#[derive(Debug, Clone)]
pub struct QueryEngine {
    policy: ErrorPolicy,
    sentinel: String,
}

impl QueryEngine {
    /// Create a query engine from the given configuration.
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            policy: config.query_policy,
            sentinel: config.no_match_sentinel.clone(),
        }
    }

    /// Create a query engine with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(&EngineConfig::default())
    }

    pub fn policy(&self) -> ErrorPolicy {
        self.policy
    }

    pub fn sentinel(&self) -> &str {
        &self.sentinel
    }

    /// Run one query line. Returns `Ok(None)` for blank and comment lines.
    pub fn execute_query(
        &self,
        graph: &KnowledgeGraph,
        line: &str,
    ) -> Result<Option<QueryOutcome>> {
        if is_skippable(line) {
            return Ok(None);
        }

        let pattern = Pattern::parse(line)?;
        let matches = graph.query_pattern(&pattern).identifiers();
        Ok(Some(QueryOutcome::new(pattern.to_string(), matches)))
    }

    /// Run every query in `reader`, handing each outcome to `emit`.
    ///
    /// Bad lines abort the run under fail-fast and are logged and collected
    /// under the tolerant policy. Failures inside `emit` always abort.
    pub fn execute_reader<R, F>(
        &self,
        graph: &KnowledgeGraph,
        reader: R,
        source: &str,
        mut emit: F,
    ) -> Result<QueryReport>
    where
        R: BufRead,
        F: FnMut(&QueryOutcome) -> io::Result<()>,
    {
        let mut report = QueryReport::default();

        for (line_number, line) in SourceLines::new(reader) {
            let line =
                line.map_err(|err| KnowledgeError::io(source, err).at(line_number, source))?;

            match line.into_text().and_then(|text| self.execute_query(graph, &text)) {
                Ok(Some(outcome)) => {
                    report.executed += 1;
                    if outcome.is_empty() {
                        report.empty += 1;
                    }
                    emit(&outcome).map_err(|err| {
                        KnowledgeError::io(outcome.query.as_str(), err).at(line_number, source)
                    })?;
                }
                Ok(None) => {}
                Err(err) => {
                    let err = err.at(line_number, source);
                    if self.policy.is_fail_fast() {
                        return Err(err);
                    }
                    warn!(error = %err, "skipping query");
                    report.errors.push(err);
                }
            }
        }

        info!(
            graph = %graph.id(),
            source,
            executed = report.executed,
            empty = report.empty,
            skipped = report.errors.len(),
            "ran queries"
        );
        Ok(report)
    }

    /// Run a query file.
    pub fn execute_file<F>(
        &self,
        graph: &KnowledgeGraph,
        path: impl AsRef<Path>,
        emit: F,
    ) -> Result<QueryReport>
    where
        F: FnMut(&QueryOutcome) -> io::Result<()>,
    {
        let path = path.as_ref();
        let source = path.display().to_string();
        let file = File::open(path)
            .map_err(|err| KnowledgeError::io(&source, err).in_source(&source))?;
        self.execute_reader(graph, BufReader::new(file), &source, emit)
    }
}

impl Default for QueryEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}
