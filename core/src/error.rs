//! This module aggregates errors that may emerge from the library.
use crate::value::ValueType;
use crate::Tag;
use snafu::Snafu;
use std::fmt;
use std::result;

/// The value parsing error used throughout the value module, shared under
/// this name for conversions that fail for a parsing-related reason.
pub use crate::value::deserialize::Error as InvalidValueReadError;

/// The main data type for errors in the library.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    /// Raised when the obtained data element was not the one expected.
    #[snafu(display("unexpected DICOM tag {}", tag))]
    UnexpectedTag {
        /// the tag that was read
        tag: Tag,
    },
    /// Raised when the obtained length is inconsistent.
    #[snafu(display("inconsistent data value length in data element"))]
    UnexpectedDataValueLength,
    /// Error related to an invalid value read.
    #[snafu(display("invalid value read: {}", source))]
    ReadValue {
        /// the parse failure
        source: InvalidValueReadError,
    },
    /// A failed attempt to cast a value to an inappropriate format.
    #[snafu(display("failed value cast: {}", source))]
    CastValue {
        /// the cast failure
        source: CastValueError,
    },
}

impl From<InvalidValueReadError> for Error {
    fn from(source: InvalidValueReadError) -> Self {
        Error::ReadValue { source }
    }
}

impl From<CastValueError> for Error {
    fn from(source: CastValueError) -> Self {
        Error::CastValue { source }
    }
}

/// Type alias for a result from this library.
pub type Result<T, E = Error> = result::Result<T, E>;

/// An error type for an attempt of accessing a value
/// in an inappropriate format.
#[derive(Debug, Clone, PartialEq)]
pub struct CastValueError {
    /// The value format requested
    pub requested: &'static str,
    /// The value's actual representation
    pub got: ValueType,
}

impl fmt::Display for CastValueError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "bad value cast: requested {} but value is {:?}",
            self.requested, self.got
        )
    }
}

impl std::error::Error for CastValueError {}

/// An error type for an attempt to convert a value into an inappropriate
/// or incompatible representation (for instance, an integer or date that
/// does not parse).
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertValueError {
    /// The value format requested
    pub requested: &'static str,
    /// The value's actual representation
    pub original: ValueType,
    /// The reason why the conversion could not be completed, if known in
    /// more detail than the representation mismatch itself.
    pub cause: Option<InvalidValueReadError>,
}

impl fmt::Display for ConvertValueError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "could not convert {:?} value to {}",
            self.original, self.requested
        )
    }
}

impl std::error::Error for ConvertValueError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause.as_ref().map(|e| e as _)
    }
}
