use crate::core::models::error::ModelError;
use std::fmt;
use std::io;
use thiserror::Error;

/// Where in a record a bad value was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldLocation {
    /// 1-based inclusive column range of the fixed layout, e.g. `"31-38"`.
    Columns(&'static str),
    /// 1-based token position within a whitespace layout of `of` tokens.
    Token { index: usize, of: usize },
}

impl fmt::Display for FieldLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldLocation::Columns(range) => write!(f, "columns {}", range),
            FieldLocation::Token { index, of } => {
                write!(f, "token {} (using {} columns)", index, of)
            }
        }
    }
}

/// Reasons a single ATOM line could not be decoded.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error(
        "Did not match number of columns: {tokens} whitespace-delimited tokens (expected 10 or 11, or an 80-column record)"
    )]
    UnrecognizedLayout { tokens: usize },
    #[error("Invalid integer in {location} (value: '{value}')")]
    InvalidInt {
        location: FieldLocation,
        value: String,
    },
    #[error("Invalid float in {location} (value: '{value}')")]
    InvalidFloat {
        location: FieldLocation,
        value: String,
    },
    #[error("Invalid charge in {location} (value: '{value}')")]
    InvalidCharge {
        location: FieldLocation,
        value: String,
    },
}

/// A value that does not fit its fixed-width output column.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error(
    "Field '{field}' is wider than allowed by PDB formatting: '{value}' must be equal to or less than {width} characters"
)]
pub struct FieldOverflow {
    pub field: &'static str,
    pub value: String,
    pub width: usize,
}

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Malformed ATOM record on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: RecordError,
    },
    #[error("Error writing PDB record: {0}")]
    Encode(#[from] FieldOverflow),
    #[error(transparent)]
    Model(#[from] ModelError),
}
