//! Rule-tree validation.
//!
//! Every check returns on the first violation and leaves the tree untouched.

use std::collections::HashSet;

use regex::Regex;

use crate::parse;
use crate::types::operation::{self, EXISTS, LIKE, PERCENT, RANGE};
use crate::{Condition, FixedValue, PercentRange, Rule, ValidationError};

/// Validate a rule tree against the operations its kind allows.
///
/// # Errors
///
/// Returns the first [`ValidationError`] found, checking in order: emptiness,
/// structure, relations, each condition, then duplicate conditions.
pub fn validate_rule(rule: &Rule, allowed_operations: &[&str]) -> Result<(), ValidationError> {
    if rule.is_empty() {
        return Err(ValidationError::EmptyRule);
    }
    check_structure(rule)?;
    check_relations(rule)?;
    for condition in rule.conditions() {
        check_condition_nulls_or_blanks(condition)?;
        check_operation_name(&condition.operation, allowed_operations)?;
        check_fixed_arg_value(condition)?;
    }
    assert_no_duplicate_conditions(&find_duplicate_conditions(rule))
}

fn check_structure(rule: &Rule) -> Result<(), ValidationError> {
    if rule.condition.is_some() && rule.is_compound() {
        return Err(ValidationError::ConditionWithCompoundParts);
    }
    for (index, part) in rule.compound_parts.iter().enumerate() {
        if part.is_compound() {
            return Err(ValidationError::NestedCompoundParts { index });
        }
        if part.condition.is_none() {
            return Err(ValidationError::EmptyCompoundPart { index });
        }
    }
    Ok(())
}

fn check_relations(rule: &Rule) -> Result<(), ValidationError> {
    for (index, part) in rule.compound_parts.iter().enumerate() {
        match (index, part.relation) {
            (0, Some(_)) => return Err(ValidationError::UnexpectedRelation),
            (0, None) => {}
            (_, None) => return Err(ValidationError::MissingRelation { index }),
            (_, Some(_)) => {}
        }
    }
    Ok(())
}

/// Non-blank free argument and operation; a fixed argument unless the
/// operation is `EXISTS`; a scalar string fixed argument must not be blank.
///
/// # Errors
///
/// Returns the matching [`ValidationError`] for the first missing or blank part.
pub fn check_condition_nulls_or_blanks(condition: &Condition) -> Result<(), ValidationError> {
    let free_arg = condition.free_arg.name.trim();
    if free_arg.is_empty() {
        return Err(ValidationError::BlankFreeArg);
    }
    if condition.operation.trim().is_empty() {
        return Err(ValidationError::BlankOperation {
            free_arg: free_arg.to_owned(),
        });
    }
    if operation::same_operation(&condition.operation, EXISTS) {
        return Ok(());
    }
    match &condition.fixed_arg {
        None => Err(ValidationError::MissingFixedArg {
            free_arg: free_arg.to_owned(),
            operation: condition.operation.clone(),
        }),
        Some(value) if value.is_blank() => Err(ValidationError::BlankFixedArg {
            free_arg: free_arg.to_owned(),
        }),
        Some(_) => Ok(()),
    }
}

/// # Errors
///
/// Returns [`ValidationError::OperationNotAllowed`] when `operation` is not in
/// `allowed` (compared case-insensitively).
pub fn check_operation_name(operation: &str, allowed: &[&str]) -> Result<(), ValidationError> {
    if operation::is_allowed(operation, allowed) {
        Ok(())
    } else {
        Err(ValidationError::OperationNotAllowed {
            operation: operation.to_owned(),
        })
    }
}

fn check_fixed_arg_value(condition: &Condition) -> Result<(), ValidationError> {
    let Some(value) = &condition.fixed_arg else {
        return Ok(());
    };
    let free_arg = condition.free_arg.name.trim();
    if operation::same_operation(&condition.operation, PERCENT) {
        match value.as_number() {
            Some(n) if (0.0..=100.0).contains(&n) => {}
            _ => {
                return Err(ValidationError::InvalidPercent {
                    free_arg: free_arg.to_owned(),
                })
            }
        }
    }
    if operation::same_operation(&condition.operation, LIKE) {
        if let Some(pattern) = value.as_str() {
            Regex::new(pattern).map_err(|e| ValidationError::InvalidRegex {
                pattern: pattern.to_owned(),
                reason: e.to_string(),
            })?;
        }
    }
    if let FixedValue::Collection(items) = value {
        let mut seen = HashSet::new();
        let mut repeated: Vec<String> = Vec::new();
        for item in items {
            if !seen.insert(item.as_str()) && !repeated.contains(item) {
                repeated.push(item.clone());
            }
        }
        if !repeated.is_empty() {
            return Err(ValidationError::DuplicateListItems {
                free_arg: free_arg.to_owned(),
                items: repeated,
            });
        }
    }
    Ok(())
}

/// Every condition structurally equal to one appearing earlier in the tree.
#[must_use]
pub fn find_duplicate_conditions(rule: &Rule) -> Vec<&Condition> {
    let conditions = rule.conditions();
    conditions
        .iter()
        .enumerate()
        .filter(|(i, condition)| conditions[..*i].contains(*condition))
        .map(|(_, condition)| *condition)
        .collect()
}

/// Rejects any non-empty list of conditions, a single one included.
///
/// # Errors
///
/// Returns [`ValidationError::DuplicateConditions`] naming every condition given.
pub fn assert_no_duplicate_conditions(duplicates: &[&Condition]) -> Result<(), ValidationError> {
    if duplicates.is_empty() {
        return Ok(());
    }
    Err(ValidationError::DuplicateConditions {
        conditions: duplicates.iter().map(ToString::to_string).collect(),
    })
}

/// Parse the `RANGE` conditions of a rule into percent ranges.
///
/// # Errors
///
/// Returns [`ValidationError::PercentRange`] for the first malformed range string.
pub fn percent_ranges(rule: &Rule) -> Result<Vec<PercentRange>, ValidationError> {
    rule.conditions()
        .into_iter()
        .filter(|c| operation::same_operation(&c.operation, RANGE))
        .filter_map(|c| c.fixed_arg.as_ref().and_then(FixedValue::as_str))
        .map(|s| parse::parse_percent_range(s).map_err(ValidationError::from))
        .collect()
}

/// Bounds of each range, then pairwise overlap.
///
/// Two ranges overlap when one starts inside the other; identical ranges
/// count as overlapping.
///
/// # Errors
///
/// Returns the first bound or overlap violation.
pub fn validate_percent_ranges(ranges: &[PercentRange]) -> Result<(), ValidationError> {
    for range in ranges {
        if !(0.0..100.0).contains(&range.start) {
            return Err(ValidationError::StartRangeInvalid { start: range.start });
        }
        if !(0.0..=100.0).contains(&range.end) {
            return Err(ValidationError::EndRangeInvalid { end: range.end });
        }
        if range.start >= range.end {
            return Err(ValidationError::StartNotBelowEnd {
                start: range.start,
                end: range.end,
            });
        }
    }
    for (i, a) in ranges.iter().enumerate() {
        for (j, b) in ranges.iter().enumerate() {
            if i != j && a.contains_start_of(b) {
                return Err(ValidationError::RangesOverlap {
                    first: a.to_string(),
                    second: b.to_string(),
                });
            }
        }
    }
    Ok(())
}
