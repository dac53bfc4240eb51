//! Error types for the knowledge engine.

use std::fmt;
use thiserror::Error;

/// Where a piece of offending input came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    /// 1-based line number within the source.
    pub line: Option<usize>,
    /// Name of the source, usually a file path.
    pub source_name: Option<String>,
}

impl Location {
    /// Create a location pointing at a line of a named source.
    pub fn new(line: usize, source_name: impl Into<String>) -> Self {
        Self {
            line: Some(line),
            source_name: Some(source_name.into()),
        }
    }

    /// Check whether nothing is known about the origin.
    pub fn is_unknown(&self) -> bool {
        self.line.is_none() && self.source_name.is_none()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.source_name, self.line) {
            (Some(source), Some(line)) => write!(f, "{source}:{line}: "),
            (Some(source), None) => write!(f, "{source}: "),
            (None, Some(line)) => write!(f, "line {line}: "),
            (None, None) => Ok(()),
        }
    }
}

/// Errors raised by the store and its line-oriented collaborators.
///
/// Every variant keeps the raw offending text and a [`Location`], which is
/// empty until a caller that knows the line number fills it in via
/// [`KnowledgeError::at`].
#[derive(Error, Debug)]
pub enum KnowledgeError {
    /// A statement or pattern did not have exactly three tokens.
    #[error("{location}malformed statement, expected 3 tokens but found {found}: `{raw}`")]
    MalformedStatement {
        raw: String,
        found: usize,
        location: Location,
    },

    /// The wildcard token appeared where a stored value was expected.
    #[error("{location}`?` is reserved for queries and cannot be stored: `{raw}`")]
    ReservedToken { raw: String, location: Location },

    /// Empty identifier, or one that would not survive tokenizing.
    #[error("{location}invalid identifier: `{raw}`")]
    InvalidIdentifier { raw: String, location: Location },

    /// An entity that was expected to exist has never been interned.
    #[error("{location}unknown identifier: `{raw}`")]
    UnknownIdentifier { raw: String, location: Location },

    /// An entity that must be new already exists.
    #[error("{location}identifier already exists: `{raw}`")]
    DuplicateIdentifier { raw: String, location: Location },

    /// A source line that is not valid UTF-8.
    #[error("{location}line is not valid UTF-8: `{raw}`")]
    InvalidEncoding { raw: String, location: Location },

    /// Reading a source (or writing results) failed.
    #[error("{location}i/o failure on `{raw}`: {source}")]
    Io {
        raw: String,
        location: Location,
        #[source]
        source: std::io::Error,
    },
}

impl KnowledgeError {
    pub fn malformed(raw: impl Into<String>, found: usize) -> Self {
        Self::MalformedStatement {
            raw: raw.into(),
            found,
            location: Location::default(),
        }
    }

    pub fn reserved(raw: impl Into<String>) -> Self {
        Self::ReservedToken {
            raw: raw.into(),
            location: Location::default(),
        }
    }

    pub fn invalid_identifier(raw: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            raw: raw.into(),
            location: Location::default(),
        }
    }

    pub fn unknown_identifier(raw: impl Into<String>) -> Self {
        Self::UnknownIdentifier {
            raw: raw.into(),
            location: Location::default(),
        }
    }

    pub fn duplicate_identifier(raw: impl Into<String>) -> Self {
        Self::DuplicateIdentifier {
            raw: raw.into(),
            location: Location::default(),
        }
    }

    pub fn invalid_encoding(raw: impl Into<String>) -> Self {
        Self::InvalidEncoding {
            raw: raw.into(),
            location: Location::default(),
        }
    }

    pub fn io(raw: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            raw: raw.into(),
            location: Location::default(),
            source,
        }
    }

    /// The offending raw text.
    pub fn raw(&self) -> &str {
        match self {
            Self::MalformedStatement { raw, .. }
            | Self::ReservedToken { raw, .. }
            | Self::InvalidIdentifier { raw, .. }
            | Self::UnknownIdentifier { raw, .. }
            | Self::DuplicateIdentifier { raw, .. }
            | Self::InvalidEncoding { raw, .. }
            | Self::Io { raw, .. } => raw,
        }
    }

    /// Where the offending text came from, if known.
    pub fn location(&self) -> &Location {
        match self {
            Self::MalformedStatement { location, .. }
            | Self::ReservedToken { location, .. }
            | Self::InvalidIdentifier { location, .. }
            | Self::UnknownIdentifier { location, .. }
            | Self::DuplicateIdentifier { location, .. }
            | Self::InvalidEncoding { location, .. }
            | Self::Io { location, .. } => location,
        }
    }

    fn location_mut(&mut self) -> &mut Location {
        match self {
            Self::MalformedStatement { location, .. }
            | Self::ReservedToken { location, .. }
            | Self::InvalidIdentifier { location, .. }
            | Self::UnknownIdentifier { location, .. }
            | Self::DuplicateIdentifier { location, .. }
            | Self::InvalidEncoding { location, .. }
            | Self::Io { location, .. } => location,
        }
    }

    /// Attach a line number and source name.
    pub fn at(mut self, line: usize, source_name: &str) -> Self {
        *self.location_mut() = Location::new(line, source_name);
        self
    }

    /// Attach only a source name, keeping any line number already set.
    pub fn in_source(mut self, source_name: &str) -> Self {
        self.location_mut().source_name = Some(source_name.to_string());
        self
    }
}

/// Result type for knowledge engine operations.
pub type Result<T> = std::result::Result<T, KnowledgeError>;

/// Errors raised while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("unknown error policy `{0}`, expected `tolerant` or `fail-fast`")]
    UnknownPolicy(String),
}
