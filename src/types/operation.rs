//! Condition operation names and the per-kind allow-lists.
//!
//! Operation names are matched case-insensitively everywhere.

pub const IS: &str = "IS";
pub const LIKE: &str = "LIKE";
pub const EXISTS: &str = "EXISTS";
pub const PERCENT: &str = "PERCENT";
pub const IN_LIST: &str = "IN_LIST";
pub const GTE: &str = "GTE";
pub const LTE: &str = "LTE";
pub const IN: &str = "IN";
pub const MATCH: &str = "MATCH";
pub const RANGE: &str = "RANGE";

const BASE: &[&str] = &[IS, LIKE, EXISTS, PERCENT, IN_LIST, GTE, LTE];
const FIRMWARE: &[&str] = &[IS, LIKE, EXISTS, PERCENT, IN_LIST, GTE, LTE, IN, MATCH];
const FEATURE: &[&str] = &[IS, LIKE, EXISTS, PERCENT, IN_LIST, GTE, LTE, IN, MATCH, RANGE];

/// Operations every rule kind accepts.
#[must_use]
pub fn base_rule_operations() -> &'static [&'static str] {
    BASE
}

/// Base operations plus `IN` and `MATCH`.
#[must_use]
pub fn firmware_rule_operations() -> &'static [&'static str] {
    FIRMWARE
}

/// Firmware operations plus `RANGE`.
#[must_use]
pub fn feature_rule_operations() -> &'static [&'static str] {
    FEATURE
}

#[must_use]
pub fn same_operation(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

#[must_use]
pub fn is_allowed(operation: &str, allowed: &[&str]) -> bool {
    allowed.iter().any(|op| same_operation(op, operation))
}
