//! Administration core for priority-ordered device configuration rules.
//!
//! Firmware rules, firmware-rule templates and feature rules are validated
//! as rule trees and kept in a dense `1..=n` priority order per scope.
//! Storage and locking are traits; [`store::memory`] has in-memory versions.
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use ordo::service::FirmwareRuleService;
//! use ordo::store::{InMemoryLock, InMemoryStore, FIRMWARE_RULE_TABLE};
//! use ordo::{free_arg, AdminConfig, FirmwareRule, Rule};
//!
//! let service = FirmwareRuleService::new(
//!     Arc::new(InMemoryStore::new()),
//!     Arc::new(InMemoryLock::new(FIRMWARE_RULE_TABLE, Duration::from_secs(10))),
//!     Arc::new(AdminConfig::default()),
//! );
//! let rule = FirmwareRule::new("qa", Rule::when(free_arg("env").is("QA")), "ENV_RULE");
//! let created = service.create(rule, "stb", "admin").unwrap();
//! assert_eq!(created.priority, 1);
//! ```

mod config;
mod error;
pub mod parse;
pub mod reorganize;
pub mod service;
pub mod store;
mod types;
pub mod validate;

pub use config::{AdminConfig, ConfigError};
pub use error::AdminError;
pub use types::operation;
pub use types::{
    free_arg, Condition, ConditionBuilder, Feature, FeatureRule, FirmwareRule,
    FirmwareRuleTemplate, FixedValue, FreeArg, FreeArgType, NamespacedList, NamespacedListType,
    PercentRange, Prioritizable, Relation, Rule, TemplateActionType, ValidationError,
};
