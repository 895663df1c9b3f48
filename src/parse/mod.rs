mod error;
mod grammar;

pub use error::ParseError;

use crate::PercentRange;

/// Parse a `start-end` percent range such as `"0-50"` or `"12.5-40"`.
///
/// # Errors
///
/// Returns [`ParseError`] naming the input when it is not two decimal
/// numbers separated by `-`.
pub fn parse_percent_range(input: &str) -> Result<PercentRange, ParseError> {
    use winnow::Parser;
    grammar::percent_range
        .parse(input.trim())
        .map_err(|e| ParseError::new(input, e.inner().to_string()))
}
