use winnow::ascii::{float, space0};
use winnow::combinator::{cut_err, delimited, separated_pair};
use winnow::error::{ModalResult, StrContext, StrContextValue};
use winnow::prelude::*;

use crate::PercentRange;

// -- Bounds -----------------------------------------------------------------

fn bound(input: &mut &str) -> ModalResult<f64> {
    delimited(space0, float, space0)
        .context(StrContext::Label("percent"))
        .context(StrContext::Expected(StrContextValue::Description(
            "a decimal number",
        )))
        .parse_next(input)
}

// -- Range ------------------------------------------------------------------

/// `start-end`, each bound a decimal number, surrounding spaces allowed.
pub(super) fn percent_range(input: &mut &str) -> ModalResult<PercentRange> {
    separated_pair(
        bound,
        '-'.context(StrContext::Expected(StrContextValue::CharLiteral('-'))),
        cut_err(bound),
    )
    .map(|(start, end)| PercentRange::new(start, end))
    .parse_next(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_integers_and_decimals() {
        let r = percent_range.parse("0-50").unwrap();
        assert_eq!(r, PercentRange::new(0.0, 50.0));
        let r = percent_range.parse(" 12.25 - 99.5 ").unwrap();
        assert_eq!(r, PercentRange::new(12.25, 99.5));
    }

    #[test]
    fn rejects_missing_separator() {
        assert!(percent_range.parse("50").is_err());
    }

    #[test]
    fn rejects_trailing_input() {
        assert!(percent_range.parse("10-20-30").is_err());
        assert!(percent_range.parse("10-abc").is_err());
    }
}
