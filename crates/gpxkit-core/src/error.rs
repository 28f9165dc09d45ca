//! Error types for gpxkit

use std::io;

use thiserror::Error;

/// Core gpxkit errors
#[derive(Error, Debug)]
pub enum GpxError {
    // Stream errors
    #[error("Malformed XML: {0}")]
    Xml(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // Schema errors
    #[error("Unexpected element <{0}>")]
    UnexpectedElement(String),

    // Value errors
    #[error("{kind} value {value} is out of range {range}")]
    OutOfRange {
        kind: &'static str,
        value: String,
        range: &'static str,
    },

    #[error("Cannot parse {kind} from '{value}'")]
    Parse { kind: &'static str, value: String },

    #[error("Missing mandatory field '{field}' of <{element}>")]
    MissingField { element: String, field: String },

    #[error("Invalid value for '{name}': {source}")]
    InvalidValue {
        name: String,
        #[source]
        source: Box<GpxError>,
    },

    // Structural errors
    #[error("Premature end of file while reading '{0}'")]
    PrematureEnd(String),

    #[error("No root element found")]
    NoRootElement,

    // Binary errors
    #[error("Invalid wire format: {0}")]
    InvalidWireFormat(String),

    #[error("Buffer too short: expected {expected}, got {actual}")]
    BufferTooShort { expected: usize, actual: usize },

    #[error("Unknown type tag: {0}")]
    UnknownTypeTag(u8),

    #[error("Unsupported binary format version: {0}")]
    UnsupportedFormat(u8),

    // Geodesy
    #[error("Distance between {start} and {end} did not converge")]
    NoConvergence { start: String, end: String },

    // Location patterns
    #[error("Invalid location pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: &'static str },

    #[error("Pattern '{pattern}' cannot format {location}")]
    Unformattable { pattern: String, location: String },

    // Combinator construction
    #[error("Invalid combinator: {0}")]
    Combinator(String),
}

impl GpxError {
    /// Value errors are the only ones lenient reading may turn into an absent value.
    pub fn is_value_error(&self) -> bool {
        matches!(
            self,
            GpxError::OutOfRange { .. }
                | GpxError::Parse { .. }
                | GpxError::MissingField { .. }
                | GpxError::InvalidValue { .. }
        )
    }

    /// Wrap a value error with the name of the element or attribute it was read from.
    pub fn invalid_value(name: impl Into<String>, source: GpxError) -> Self {
        GpxError::InvalidValue {
            name: name.into(),
            source: Box::new(source),
        }
    }

    pub(crate) fn parse(kind: &'static str, value: &str) -> Self {
        GpxError::Parse {
            kind,
            value: value.to_string(),
        }
    }
}

/// Result type for gpxkit operations
pub type GpxResult<T> = Result<T, GpxError>;
