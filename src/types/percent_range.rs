use std::fmt;
use std::str::FromStr;

use crate::parse::{self, ParseError};

/// A half-open traffic slice `[start, end)` in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PercentRange {
    pub start: f64,
    pub end: f64,
}

impl PercentRange {
    #[must_use]
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// `other` starts inside this range.
    #[must_use]
    pub fn contains_start_of(&self, other: &PercentRange) -> bool {
        self.start <= other.start && other.start < self.end
    }

    /// Either range starts inside the other.
    #[must_use]
    pub fn overlaps(&self, other: &PercentRange) -> bool {
        self.contains_start_of(other) || other.contains_start_of(self)
    }
}

impl FromStr for PercentRange {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse::parse_percent_range(s)
    }
}

impl fmt::Display for PercentRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacent_ranges_do_not_overlap() {
        let a = PercentRange::new(0.0, 50.0);
        let b = PercentRange::new(50.0, 100.0);
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn nested_and_identical_ranges_overlap() {
        let outer = PercentRange::new(0.0, 60.0);
        let inner = PercentRange::new(10.0, 20.0);
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
        assert!(inner.overlaps(&inner));
    }

    #[test]
    fn display_round_trips_through_from_str() {
        let r: PercentRange = "12.5-40".parse().unwrap();
        assert_eq!(r, PercentRange::new(12.5, 40.0));
        assert_eq!(r.to_string(), "12.5-40");
    }
}
