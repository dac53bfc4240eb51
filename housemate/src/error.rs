//! Error types for the home model and its command language.

use knowledge_engine::{KnowledgeError, Location};
use thiserror::Error;

use crate::model::EntityKind;

/// Why a status refused a value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueRejected {
    #[error("expected one of {0}")]
    NotInEnum(String),

    #[error("expected an integer or a range keyword")]
    NotANumber,

    #[error("the current value is not a number")]
    NoCurrentValue,
}

/// Errors raised by the model service and the command processor.
#[derive(Error, Debug)]
pub enum HouseMateError {
    /// A command line that does not fit the command grammar.
    #[error("{location}invalid command, {description}: `{input}`")]
    InvalidCommand {
        description: String,
        input: String,
        location: Location,
    },

    /// A failure inside the knowledge graph.
    #[error(transparent)]
    Knowledge(#[from] KnowledgeError),

    /// An identifier names an entity of the wrong kind.
    #[error("{location}`{identifier}` is a {actual}, expected {expected}")]
    WrongKind {
        identifier: String,
        expected: String,
        actual: EntityKind,
        location: Location,
    },

    /// A status rejected the value it was given.
    #[error("{location}invalid value `{value}` for status `{status}`: {reason}")]
    InvalidStatusValue {
        status: String,
        value: String,
        #[source]
        reason: ValueRejected,
        location: Location,
    },

    /// Reading commands or writing output failed.
    #[error("{location}i/o failure on `{input}`: {source}")]
    Io {
        input: String,
        location: Location,
        #[source]
        source: std::io::Error,
    },
}

impl HouseMateError {
    pub fn invalid_command(description: impl Into<String>, input: impl Into<String>) -> Self {
        Self::InvalidCommand {
            description: description.into(),
            input: input.into(),
            location: Location::default(),
        }
    }

    pub fn wrong_kind(
        identifier: impl Into<String>,
        expected: impl Into<String>,
        actual: EntityKind,
    ) -> Self {
        Self::WrongKind {
            identifier: identifier.into(),
            expected: expected.into(),
            actual,
            location: Location::default(),
        }
    }

    pub fn invalid_status_value(
        status: impl Into<String>,
        value: impl Into<String>,
        reason: ValueRejected,
    ) -> Self {
        Self::InvalidStatusValue {
            status: status.into(),
            value: value.into(),
            reason,
            location: Location::default(),
        }
    }

    pub fn io(input: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            input: input.into(),
            location: Location::default(),
            source,
        }
    }

    /// Where the failing command came from, if known.
    pub fn location(&self) -> &Location {
        match self {
            Self::Knowledge(err) => err.location(),
            Self::InvalidCommand { location, .. }
            | Self::WrongKind { location, .. }
            | Self::InvalidStatusValue { location, .. }
            | Self::Io { location, .. } => location,
        }
    }

    /// Attach a line number and source name.
    pub fn at(self, line: usize, source_name: &str) -> Self {
        match self {
            Self::Knowledge(err) => Self::Knowledge(err.at(line, source_name)),
            Self::InvalidCommand {
                description, input, ..
            } => Self::InvalidCommand {
                description,
                input,
                location: Location::new(line, source_name),
            },
            Self::WrongKind {
                identifier,
                expected,
                actual,
                ..
            } => Self::WrongKind {
                identifier,
                expected,
                actual,
                location: Location::new(line, source_name),
            },
            Self::InvalidStatusValue {
                status,
                value,
                reason,
                ..
            } => Self::InvalidStatusValue {
                status,
                value,
                reason,
                location: Location::new(line, source_name),
            },
            Self::Io { input, source, .. } => Self::Io {
                input,
                source,
                location: Location::new(line, source_name),
            },
        }
    }
}

/// Result type for home model operations.
pub type Result<T> = std::result::Result<T, HouseMateError>;
