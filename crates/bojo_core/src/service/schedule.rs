//! Seam for natural-language time parsing.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Free text could not be turned into a timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeParseError {
    pub input: String,
    pub reason: String,
}

impl TimeParseError {
    pub fn new(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            reason: reason.into(),
        }
    }
}

impl Display for TimeParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "cannot parse time `{}`: {}", self.input, self.reason)
    }
}

impl Error for TimeParseError {}

/// Resolves user text such as "tomorrow at 6pm" to epoch milliseconds.
///
/// `now_ms` is the reference instant for relative expressions.
pub trait TimeResolver {
    fn resolve(&self, text: &str, now_ms: i64) -> Result<i64, TimeParseError>;
}

impl<F> TimeResolver for F
where
    F: Fn(&str, i64) -> Result<i64, TimeParseError>,
{
    fn resolve(&self, text: &str, now_ms: i64) -> Result<i64, TimeParseError> {
        self(text, now_ms)
    }
}
