use thiserror::Error;

use crate::parse::ParseError;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Rule is empty")]
    EmptyRule,

    #[error("rule has both a condition and compound parts")]
    ConditionWithCompoundParts,

    #[error("compound part {index} has nested compound parts")]
    NestedCompoundParts { index: usize },

    #[error("compound part {index} has no condition")]
    EmptyCompoundPart { index: usize },

    #[error("first compound part must not have a relation")]
    UnexpectedRelation,

    #[error("compound part {index} is missing a relation")]
    MissingRelation { index: usize },

    #[error("free argument name is blank")]
    BlankFreeArg,

    #[error("operation is blank for '{free_arg}'")]
    BlankOperation { free_arg: String },

    #[error("operation '{operation}' is not allowed")]
    OperationNotAllowed { operation: String },

    #[error("fixed argument is missing for '{free_arg} {operation}'")]
    MissingFixedArg { free_arg: String, operation: String },

    #[error("fixed argument is blank for '{free_arg}'")]
    BlankFixedArg { free_arg: String },

    #[error("percent value for '{free_arg}' must be a number between 0 and 100")]
    InvalidPercent { free_arg: String },

    #[error("'{pattern}' is not a valid regular expression: {reason}")]
    InvalidRegex { pattern: String, reason: String },

    #[error("duplicate items in '{free_arg}' list: {}", items.join(", "))]
    DuplicateListItems { free_arg: String, items: Vec<String> },

    #[error("duplicate conditions: {}", conditions.join(", "))]
    DuplicateConditions { conditions: Vec<String> },

    #[error(transparent)]
    PercentRange(#[from] ParseError),

    #[error("start range {start} is not valid")]
    StartRangeInvalid { start: f64 },

    #[error("end range {end} is not valid")]
    EndRangeInvalid { end: f64 },

    #[error("start range {start} should be less than end range {end}")]
    StartNotBelowEnd { start: f64, end: f64 },

    #[error("ranges overlap each other: {first}, {second}")]
    RangesOverlap { first: String, second: String },

    #[error("{kind} name is blank")]
    BlankName { kind: &'static str },

    #[error("property key is blank")]
    BlankPropertyKey,

    #[error("Features should be specified")]
    MissingFeatures,

    #[error("number of features should be up to {max} items")]
    TooManyFeatures { max: usize },

    #[error("feature '{feature}' belongs to application type '{feature_type}', not '{rule_type}'")]
    FeatureApplicationMismatch {
        feature: String,
        feature_type: String,
        rule_type: String,
    },

    #[error("ApplicationType is empty")]
    BlankApplicationType,

    #[error("ApplicationType '{value}' is not valid")]
    UnknownApplicationType { value: String },

    #[error("ApplicationType mismatch: entity has '{entity}', request has '{request}'")]
    ApplicationTypeMismatch { entity: String, request: String },

    #[error("Invalid priority value {priority}")]
    InvalidPriority { priority: i32 },

    #[error("list id is blank")]
    BlankListId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_rule_message() {
        assert_eq!(ValidationError::EmptyRule.to_string(), "Rule is empty");
    }

    #[test]
    fn missing_relation_message() {
        let err = ValidationError::MissingRelation { index: 2 };
        assert_eq!(err.to_string(), "compound part 2 is missing a relation");
    }

    #[test]
    fn duplicate_list_items_message() {
        let err = ValidationError::DuplicateListItems {
            free_arg: "model".into(),
            items: vec!["A".into(), "B".into()],
        };
        assert_eq!(err.to_string(), "duplicate items in 'model' list: A, B");
    }

    #[test]
    fn overlap_message() {
        let err = ValidationError::RangesOverlap {
            first: "0-50".into(),
            second: "40-60".into(),
        };
        assert_eq!(err.to_string(), "ranges overlap each other: 0-50, 40-60");
    }

    #[test]
    fn blank_name_message() {
        let err = ValidationError::BlankName {
            kind: "FeatureRule",
        };
        assert_eq!(err.to_string(), "FeatureRule name is blank");
    }

    #[test]
    fn invalid_priority_message() {
        let err = ValidationError::InvalidPriority { priority: 0 };
        assert_eq!(err.to_string(), "Invalid priority value 0");
    }
}
