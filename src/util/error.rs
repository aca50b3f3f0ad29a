//! Error types for trial data.

use thiserror::Error;

use super::{Dimensions, Frame};

/// Broad class of an [`Error`], used by callers that only care about the
/// category of failure (shape, range, lookup, ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A table or array does not have the required columns or dimensions.
    Shape,
    /// A frame lies outside the bounds of a series.
    Range,
    /// A marker, channel or key does not exist.
    Lookup,
    /// A derived value cannot be computed from the available fields.
    Compute,
    /// A construction invariant was violated.
    Invariant,
    /// A deserialized object is not of the expected type.
    Type,
    /// Underlying I/O or encoding failure.
    Io,
}

/// Main error type for trial operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Table is missing required columns
    #[error("{table}: missing required columns: {missing:?}")]
    MissingColumns { table: String, missing: Vec<String> },

    /// Sequence or column length does not match the expected length
    #[error("{what} has {actual} frames, expected {expected} frames")]
    LengthMismatch {
        what: String,
        expected: usize,
        actual: usize,
    },

    /// Fixed-shape array has the wrong dimensions
    #[error("{what} must be {expected}, got {actual}")]
    DimensionMismatch {
        what: String,
        expected: Dimensions,
        actual: Dimensions,
    },

    /// Column name appears twice in one table
    #[error("Duplicate column: {0}")]
    DuplicateColumn(String),

    /// A cell could not be cast to a 64-bit float
    #[error("Column '{column}' row {row}: cannot cast {value} to float")]
    NonNumeric {
        column: String,
        row: usize,
        value: String,
    },

    /// Frame outside the inclusive range of a series
    #[error("Frame {frame} out of bounds [{first}, {last}]")]
    FrameOutOfRange { frame: Frame, first: Frame, last: Frame },

    /// Marker not found by name
    #[error("Marker '{0}' not found in trajectories")]
    MarkerNotFound(String),

    /// Analog channel not found by name
    #[error("Analog channel '{0}' not found")]
    ChannelNotFound(String),

    /// Frame/time conversion impossible
    #[error("Cannot compute {0}")]
    Compute(String),

    /// Construction invariant violated
    #[error("Invariant violated: {0}")]
    Invariant(String),

    /// Unit label unknown or not convertible
    #[error("Cannot convert units from '{from}' to '{to}'")]
    UnknownUnit { from: String, to: String },

    /// Type mismatch when loading a stored object
    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an invariant error from a string.
    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::Invariant(msg.into())
    }

    /// Create a length mismatch error.
    pub fn length(what: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::LengthMismatch {
            what: what.into(),
            expected,
            actual,
        }
    }

    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingColumns { .. }
            | Self::LengthMismatch { .. }
            | Self::DimensionMismatch { .. }
            | Self::DuplicateColumn(_)
            | Self::NonNumeric { .. } => ErrorKind::Shape,
            Self::FrameOutOfRange { .. } => ErrorKind::Range,
            Self::MarkerNotFound(_) | Self::ChannelNotFound(_) | Self::UnknownUnit { .. } => {
                ErrorKind::Lookup
            }
            Self::Compute(_) => ErrorKind::Compute,
            Self::Invariant(_) => ErrorKind::Invariant,
            Self::TypeMismatch { .. } => ErrorKind::Type,
            Self::Io(_) | Self::Json(_) => ErrorKind::Io,
        }
    }
}

/// Result type alias for trial operations.
pub type Result<T> = std::result::Result<T, Error>;
