use std::fmt;

use serde::{Deserialize, Serialize};

/// The fixed (literal) side of a condition.
///
/// Serialized untagged, so a stored condition carries a bare JSON string,
/// number, boolean or string array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FixedValue {
    /// A boolean flag.
    Bool(bool),
    /// A numeric literal, used by `PERCENT`, `GTE` and `LTE`.
    Number(f64),
    /// A UTF-8 string. Also carries list ids for `IN_LIST` and ranges for `RANGE`.
    String(String),
    /// A string collection, used by `IN`.
    Collection(Vec<String>),
}

impl FixedValue {
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FixedValue::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_collection(&self) -> Option<&[String]> {
        match self {
            FixedValue::Collection(items) => Some(items),
            _ => None,
        }
    }

    /// Numeric view of the value. Strings holding a number are accepted,
    /// since percent arguments arrive both ways.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FixedValue::Number(n) => Some(*n),
            FixedValue::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// True for a string that is empty or only spaces.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        matches!(self, FixedValue::String(s) if s.trim().is_empty())
    }

    /// Every string carried by this value: the string itself, or each collection item.
    pub fn strings(&self) -> impl Iterator<Item = &str> {
        let (single, many): (Option<&str>, &[String]) = match self {
            FixedValue::String(s) => (Some(s.as_str()), &[]),
            FixedValue::Collection(items) => (None, items.as_slice()),
            _ => (None, &[]),
        };
        single.into_iter().chain(many.iter().map(String::as_str))
    }
}

impl From<f64> for FixedValue {
    fn from(v: f64) -> Self {
        FixedValue::Number(v)
    }
}

impl From<i64> for FixedValue {
    #[allow(clippy::cast_precision_loss)]
    fn from(v: i64) -> Self {
        FixedValue::Number(v as f64)
    }
}

impl From<bool> for FixedValue {
    fn from(v: bool) -> Self {
        FixedValue::Bool(v)
    }
}

impl From<&str> for FixedValue {
    fn from(v: &str) -> Self {
        FixedValue::String(v.to_owned())
    }
}

impl From<String> for FixedValue {
    fn from(v: String) -> Self {
        FixedValue::String(v)
    }
}

impl From<Vec<String>> for FixedValue {
    fn from(v: Vec<String>) -> Self {
        FixedValue::Collection(v)
    }
}

impl From<Vec<&str>> for FixedValue {
    fn from(v: Vec<&str>) -> Self {
        FixedValue::Collection(v.into_iter().map(str::to_owned).collect())
    }
}

impl fmt::Display for FixedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FixedValue::Bool(b) => write!(f, "{b}"),
            FixedValue::Number(n) => write!(f, "{n}"),
            FixedValue::String(s) => write!(f, "\"{s}\""),
            FixedValue::Collection(items) => write!(f, "[{}]", items.join(", ")),
        }
    }
}
