use std::fmt;
use std::ops::Not;

use serde::{Deserialize, Serialize};

use super::operation;
use super::FixedValue;

/// How a compound part joins the parts before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Relation {
    And,
    Or,
}

/// Declared type of the context value a condition reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FreeArgType {
    #[default]
    String,
    Long,
    Void,
    Any,
}

/// The variable side of a condition: a named, typed context key.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FreeArg {
    pub name: String,
    #[serde(rename = "type", default)]
    pub arg_type: FreeArgType,
}

impl FreeArg {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arg_type: FreeArgType::String,
        }
    }
}

/// A leaf test: `free_arg <operation> fixed_arg`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    pub free_arg: FreeArg,
    pub operation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_arg: Option<FixedValue>,
}

impl Condition {
    #[must_use]
    pub fn new(free_arg: FreeArg, operation: impl Into<String>, fixed_arg: Option<FixedValue>) -> Self {
        Self {
            free_arg,
            operation: operation.into(),
            fixed_arg,
        }
    }
}

/// A rule tree node.
///
/// A node is either a leaf (`condition` set, no parts) or a compound node
/// (`compound_parts` set, no condition). Compound parts are single-level:
/// each part is a leaf, the first part has no relation and every later
/// part has one.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    #[serde(default)]
    pub negated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation: Option<Relation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub compound_parts: Vec<Rule>,
}

impl Rule {
    /// A single-condition rule.
    #[must_use]
    pub fn when(condition: Condition) -> Rule {
        Rule {
            condition: Some(condition),
            ..Rule::default()
        }
    }

    #[must_use]
    pub fn and(self, condition: Condition) -> Rule {
        self.push_part(Relation::And, Rule::when(condition))
    }

    #[must_use]
    pub fn or(self, condition: Condition) -> Rule {
        self.push_part(Relation::Or, Rule::when(condition))
    }

    /// Append a leaf part, turning a leaf into a compound node first.
    #[must_use]
    pub fn push_part(self, relation: Relation, part: Rule) -> Rule {
        let mut root = if self.compound_parts.is_empty() && self.condition.is_some() {
            let first = Rule {
                relation: None,
                ..self
            };
            Rule {
                compound_parts: vec![first],
                ..Rule::default()
            }
        } else {
            self
        };
        let relation = if root.compound_parts.is_empty() {
            None
        } else {
            Some(relation)
        };
        root.compound_parts.push(Rule { relation, ..part });
        root
    }

    #[must_use]
    pub fn is_compound(&self) -> bool {
        !self.compound_parts.is_empty()
    }

    /// No condition and no parts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.condition.is_none() && self.compound_parts.is_empty()
    }

    /// All conditions in tree order.
    #[must_use]
    pub fn conditions(&self) -> Vec<&Condition> {
        let mut out = Vec::new();
        self.collect_conditions(&mut out);
        out
    }

    fn collect_conditions<'a>(&'a self, out: &mut Vec<&'a Condition>) {
        if let Some(condition) = &self.condition {
            out.push(condition);
        }
        for part in &self.compound_parts {
            part.collect_conditions(out);
        }
    }

    /// Fixed-argument strings of every condition using `op`.
    #[must_use]
    pub fn fixed_args_by_operation(&self, op: &str) -> Vec<&str> {
        self.conditions()
            .into_iter()
            .filter(|c| operation::same_operation(&c.operation, op))
            .filter_map(|c| c.fixed_arg.as_ref())
            .flat_map(|value| value.strings())
            .collect()
    }

    /// Canonical spelling: upper-case operation names and trimmed free-arg
    /// names. The shape of the tree is left as submitted, so structural
    /// validation still sees what the caller sent.
    pub fn normalize(&mut self) {
        if let Some(condition) = &mut self.condition {
            condition.operation = condition.operation.trim().to_ascii_uppercase();
            let trimmed = condition.free_arg.name.trim();
            if trimmed.len() != condition.free_arg.name.len() {
                condition.free_arg.name = trimmed.to_owned();
            }
        }
        for part in &mut self.compound_parts {
            part.normalize();
        }
    }
}

impl From<Condition> for Rule {
    fn from(condition: Condition) -> Self {
        Rule::when(condition)
    }
}

impl Not for Rule {
    type Output = Rule;

    fn not(self) -> Rule {
        Rule {
            negated: !self.negated,
            ..self
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relation::And => write!(f, "AND"),
            Relation::Or => write!(f, "OR"),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.fixed_arg {
            Some(value) => write!(f, "{} {} {value}", self.free_arg.name, self.operation),
            None => write!(f, "{} {}", self.free_arg.name, self.operation),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            write!(f, "NOT ")?;
        }
        if let Some(condition) = &self.condition {
            return write!(f, "({condition})");
        }
        write!(f, "(")?;
        for (i, part) in self.compound_parts.iter().enumerate() {
            if i > 0 {
                match part.relation {
                    Some(relation) => write!(f, " {relation} ")?,
                    None => write!(f, " ? ")?,
                }
            }
            write!(f, "{part}")?;
        }
        write!(f, ")")
    }
}

/// Start building a condition on the context key `name`.
#[must_use]
pub fn free_arg(name: &str) -> ConditionBuilder {
    ConditionBuilder {
        free_arg: FreeArg::new(name),
    }
}

/// Intermediate builder for conditions. Created by [`free_arg()`].
#[derive(Debug, Clone)]
pub struct ConditionBuilder {
    free_arg: FreeArg,
}

impl ConditionBuilder {
    #[must_use]
    pub fn typed(mut self, arg_type: FreeArgType) -> Self {
        self.free_arg.arg_type = arg_type;
        self
    }

    #[must_use]
    pub fn is(self, value: impl Into<FixedValue>) -> Condition {
        self.op(operation::IS, value)
    }

    #[must_use]
    pub fn like(self, pattern: &str) -> Condition {
        self.op(operation::LIKE, pattern)
    }

    #[must_use]
    pub fn exists(self) -> Condition {
        Condition::new(self.free_arg, operation::EXISTS, None)
    }

    #[must_use]
    pub fn percent(self, value: f64) -> Condition {
        self.op(operation::PERCENT, value)
    }

    #[must_use]
    pub fn in_list(self, list_id: &str) -> Condition {
        self.op(operation::IN_LIST, list_id)
    }

    #[must_use]
    pub fn gte(self, value: impl Into<FixedValue>) -> Condition {
        self.op(operation::GTE, value)
    }

    #[must_use]
    pub fn lte(self, value: impl Into<FixedValue>) -> Condition {
        self.op(operation::LTE, value)
    }

    #[must_use]
    pub fn one_of(self, values: Vec<&str>) -> Condition {
        self.op(operation::IN, values)
    }

    #[must_use]
    pub fn matches(self, pattern: &str) -> Condition {
        self.op(operation::MATCH, pattern)
    }

    /// A `RANGE` condition over `start-end` percent ranges, e.g. `"0-50"`.
    #[must_use]
    pub fn range(self, ranges: &str) -> Condition {
        self.op(operation::RANGE, ranges)
    }

    #[must_use]
    pub fn op(self, operation: &str, value: impl Into<FixedValue>) -> Condition {
        Condition::new(self.free_arg, operation, Some(value.into()))
    }
}
