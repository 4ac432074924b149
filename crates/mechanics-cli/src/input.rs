//! Numeric input at the user boundary.
//!
//! Text typed by a user is parsed into a [`ParsedNumber`] before it goes
//! anywhere near a simulation. An entry that is not a finite number stays
//! [`ParsedNumber::Invalid`] and is reported, never replaced by a
//! placeholder value.

use std::fmt;

use thiserror::Error;

/// Result of parsing one numeric text entry.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedNumber {
    /// A finite number.
    Value(f64),
    /// The text as given, which did not parse to a finite number.
    Invalid(String),
}

impl ParsedNumber {
    /// Parses `text`, ignoring surrounding whitespace.
    ///
    /// `NaN`, `inf` and other non-finite spellings are invalid.
    pub fn parse(text: &str) -> Self {
        match text.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => Self::Value(value),
            _ => Self::Invalid(text.to_string()),
        }
    }

    /// The parsed value, if any.
    #[must_use]
    pub const fn value(&self) -> Option<f64> {
        match self {
            Self::Value(value) => Some(*value),
            Self::Invalid(_) => None,
        }
    }

    /// Returns true for [`ParsedNumber::Value`].
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    /// Converts into a `Result`, keeping the rejected text in the error.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::NotANumber`] for an invalid entry.
    pub fn into_result(self) -> Result<f64, InputError> {
        match self {
            Self::Value(value) => Ok(value),
            Self::Invalid(text) => Err(InputError::NotANumber { text }),
        }
    }
}

impl From<&str> for ParsedNumber {
    fn from(text: &str) -> Self {
        Self::parse(text)
    }
}

impl fmt::Display for ParsedNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => write!(f, "{value}"),
            Self::Invalid(text) => write!(f, "{text:?} (invalid)"),
        }
    }
}

/// A rejected numeric entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("{text:?} is not a finite number")]
    NotANumber { text: String },
}

/// Value parser for numeric command-line flags.
///
/// # Errors
///
/// Returns [`InputError`] when `text` is not a finite number. clap reports
/// it against the offending flag.
pub fn parse_number(text: &str) -> Result<f64, InputError> {
    ParsedNumber::parse(text).into_result()
}
