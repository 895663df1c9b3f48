use std::fmt;

/// Errors produced when parsing a `start-end` percent range.
#[derive(Debug)]
pub struct ParseError {
    input: String,
    message: String,
}

impl ParseError {
    pub(crate) fn new(input: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            message: message.into(),
        }
    }

    /// The text that failed to parse.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "range format exception '{}', format pattern is: startRange-endRange: {}",
            self.input, self.message
        )
    }
}

impl std::error::Error for ParseError {}
