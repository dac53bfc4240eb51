//! Query patterns - triple shapes with wildcards, never stored.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::entity::{canonicalize, WILDCARD};
use super::index::bucket_key;
use crate::error::{KnowledgeError, Result};

/// Split a statement or query line into tokens.
///
/// The optional trailing period is dropped before splitting on whitespace.
pub fn tokenize_statement(line: &str) -> Vec<&str> {
    line.trim().trim_end_matches('.').split_whitespace().collect()
}

/// One position of a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Term {
    /// Matches any value.
    Wildcard,
    /// Matches one canonical identifier.
    Literal(String),
}

impl Term {
    /// Parse a token, canonicalizing literals and passing `?` through.
    pub fn parse(token: &str) -> Result<Self> {
        let canonical = canonicalize(token)?;
        if canonical == WILDCARD {
            return Ok(Term::Wildcard);
        }
        Ok(Term::Literal(canonical))
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Term::Wildcard)
    }

    fn bound(&self) -> Option<&str> {
        match self {
            Term::Wildcard => None,
            Term::Literal(value) => Some(value.as_str()),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Wildcard => write!(f, "{WILDCARD}"),
            Term::Literal(value) => write!(f, "{value}"),
        }
    }
}

/// A canonical three-position query shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pattern {
    pub subject: Term,
    pub predicate: Term,
    pub object: Term,
}

impl Pattern {
    /// Build a pattern from three tokens, any of which may be `?`.
    pub fn new(subject: &str, predicate: &str, object: &str) -> Result<Self> {
        Ok(Self {
            subject: Term::parse(subject)?,
            predicate: Term::parse(predicate)?,
            object: Term::parse(object)?,
        })
    }

    /// Parse a query line of exactly three tokens.
    pub fn parse(line: &str) -> Result<Self> {
        match tokenize_statement(line).as_slice() {
            [subject, predicate, object] => Self::new(subject, predicate, object),
            tokens => Err(KnowledgeError::malformed(line.trim(), tokens.len())),
        }
    }

    /// The pattern matching everything.
    pub fn everything() -> Self {
        Self {
            subject: Term::Wildcard,
            predicate: Term::Wildcard,
            object: Term::Wildcard,
        }
    }

    /// Index key of the bucket that answers this pattern.
    pub fn key(&self) -> String {
        bucket_key(self.subject.bound(), self.predicate.bound(), self.object.bound())
    }

    pub fn wildcard_count(&self) -> usize {
        [&self.subject, &self.predicate, &self.object]
            .into_iter()
            .filter(|term| term.is_wildcard())
            .count()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.subject, self.predicate, self.object)
    }
}
