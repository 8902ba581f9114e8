use crate::error::{Error, ParseErrorKind};
use std::fmt;

/// A floating point field that remembers the text it was parsed from, so that
/// records are written back exactly as they were read.
#[derive(Debug, Clone, PartialEq)]
pub struct VerbatimFloat {
    value: f64,
    text: String,
}

impl VerbatimFloat {
    /// Parses `text`, naming `field` in the error when it is not a number.
    pub fn parse(field: &'static str, text: &str) -> Result<Self, Error> {
        match text.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(VerbatimFloat {
                value,
                text: text.to_string(),
            }),
            Ok(_) => Err(Error::new(ParseErrorKind::InvalidNumber {
                field,
                value: text.to_string(),
            })),
            Err(err) => Err(Error {
                source: Some(err),
                error_kind: ParseErrorKind::InvalidNumber {
                    field,
                    value: text.to_string(),
                },
            }),
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

impl fmt::Display for VerbatimFloat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.text)
    }
}
