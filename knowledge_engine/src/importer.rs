//! Statement importer - reads the line format into the graph.
//!
//! One statement per line: three whitespace-separated tokens with an
//! optional trailing period. Blank lines and `#` comments are skipped.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{info, warn};

use crate::config::{EngineConfig, ErrorPolicy};
use crate::error::{KnowledgeError, Result};
use crate::knowledge_base::{
    tokenize_statement, ImportReport, KnowledgeGraph, TripleLiteral, WILDCARD,
};
use crate::source::SourceLines;

/// Check whether a line carries no statement.
pub fn is_skippable(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('#')
}

/// Parse one statement line.
///
/// Returns `Ok(None)` for blank and comment lines.
pub fn parse_statement(line: &str) -> Result<Option<TripleLiteral>> {
    if is_skippable(line) {
        return Ok(None);
    }

    match tokenize_statement(line).as_slice() {
        [subject, predicate, object] => {
            if [subject, predicate, object].iter().any(|token| **token == WILDCARD) {
                return Err(KnowledgeError::reserved(line.trim()));
            }
            Ok(Some(TripleLiteral::new(*subject, *predicate, *object)))
        }
        tokens => Err(KnowledgeError::malformed(line.trim(), tokens.len())),
    }
}

/// Loads statements into a [`KnowledgeGraph`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Importer {
    policy: ErrorPolicy,
}

impl Importer {
    pub fn new(policy: ErrorPolicy) -> Self {
        Self { policy }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.import_policy)
    }

    pub fn policy(&self) -> ErrorPolicy {
        self.policy
    }

    /// Import statements from in-memory text.
    pub fn import_str(
        &self,
        graph: &mut KnowledgeGraph,
        text: &str,
        source: &str,
    ) -> Result<ImportReport> {
        self.import_reader(graph, text.as_bytes(), source)
    }

    /// Import statements from a file.
    pub fn import_file(
        &self,
        graph: &mut KnowledgeGraph,
        path: impl AsRef<Path>,
    ) -> Result<ImportReport> {
        let path = path.as_ref();
        let source = path.display().to_string();
        let file = File::open(path)
            .map_err(|err| KnowledgeError::io(&source, err).in_source(&source))?;
        self.import_reader(graph, BufReader::new(file), &source)
    }

    /// Import statements from any buffered reader.
    ///
    /// Every line is parsed and validated before the graph is touched, so a
    /// fail-fast import that stops on a bad line adds nothing. Lines that are
    /// not valid UTF-8 are bad lines like any other.
    pub fn import_reader<R: BufRead>(
        &self,
        graph: &mut KnowledgeGraph,
        reader: R,
        source: &str,
    ) -> Result<ImportReport> {
        let mut errors = Vec::new();
        let mut batch = Vec::new();

        for (line_number, line) in SourceLines::new(reader) {
            let line =
                line.map_err(|err| KnowledgeError::io(source, err).at(line_number, source))?;

            let parsed = line
                .into_text()
                .and_then(|text| parse_statement(&text))
                .and_then(|literal| match literal {
                    Some(literal) => literal.validate().map(|_| Some(literal)),
                    None => Ok(None),
                });

            match parsed {
                Ok(Some(literal)) => batch.push(literal),
                Ok(None) => {}
                Err(err) => {
                    let err = err.at(line_number, source);
                    if self.policy.is_fail_fast() {
                        return Err(err);
                    }
                    warn!(error = %err, "skipping statement");
                    errors.push(err);
                }
            }
        }

        let mut report = graph.import_triples(batch, self.policy)?;
        errors.append(&mut report.errors);
        report.errors = errors;

        info!(
            graph = %graph.id(),
            source,
            added = report.added,
            duplicates = report.duplicates,
            skipped = report.skipped(),
            "imported statements"
        );
        Ok(report)
    }
}
