//! Error types for parsing segments and ctm-edits records.
use std::error::Error as StdError;
use std::fmt;
use std::num::ParseFloatError;

/// Errors while turning one whitespace-delimited record into an entity.
/// The error carries no file or line context; callers reading files attach it.
#[derive(Debug, PartialEq)]
pub struct Error {
    // Underlying float parsing error, when a numeric field was malformed
    pub source: Option<ParseFloatError>,
    // Enum representing which category of error
    pub error_kind: ParseErrorKind,
}

#[derive(Debug, PartialEq)]
pub enum ParseErrorKind {
    // Record has the wrong number of fields
    FieldCount {
        expected: &'static str,
        found: usize,
    },
    // A numeric field could not be parsed
    InvalidNumber { field: &'static str, value: String },
    // Unknown ctm-edits edit type
    InvalidEditType(String),
    // Segment start is negative or end does not follow start
    InvalidInterval { start: f64, end: f64 },
    // Negative word duration
    NegativeDuration(f64),
}

impl Error {
    pub(crate) fn new(error_kind: ParseErrorKind) -> Self {
        Error {
            source: None,
            error_kind,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.error_kind {
            ParseErrorKind::FieldCount { expected, found } => {
                write!(f, "expected {expected} fields, found {found}")
            }
            ParseErrorKind::InvalidNumber { field, value } => {
                write!(f, "invalid number {value:?} for field {field}")
            }
            ParseErrorKind::InvalidEditType(value) => {
                write!(f, "unknown edit type {value:?}")
            }
            ParseErrorKind::InvalidInterval { start, end } => {
                write!(f, "invalid segment interval [{start}, {end})")
            }
            ParseErrorKind::NegativeDuration(duration) => {
                write!(f, "negative duration {duration}")
            }
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn StdError + 'static))
    }
}
