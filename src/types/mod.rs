mod error;
mod feature;
mod firmware;
mod namespaced_list;
pub mod operation;
mod percent_range;
mod prioritizable;
mod rule;
mod value;

pub use error::ValidationError;
pub use feature::{Feature, FeatureRule};
pub use firmware::{FirmwareRule, FirmwareRuleTemplate, TemplateActionType};
pub use namespaced_list::{NamespacedList, NamespacedListType};
pub use percent_range::PercentRange;
pub use prioritizable::Prioritizable;
pub use rule::{free_arg, Condition, ConditionBuilder, FreeArg, FreeArgType, Relation, Rule};
pub use value::FixedValue;
