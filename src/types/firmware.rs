use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Prioritizable, Rule};

/// A firmware rule: a rule tree bound to a template and an application type.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirmwareRule {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub rule: Rule,
    /// Id of the [`FirmwareRuleTemplate`] this rule was built from.
    #[serde(default, rename = "type")]
    pub template_id: String,
    #[serde(default)]
    pub application_type: String,
    #[serde(default)]
    pub priority: i32,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl FirmwareRule {
    #[must_use]
    pub fn new(name: impl Into<String>, rule: Rule, template_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rule,
            template_id: template_id.into(),
            active: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    #[must_use]
    pub fn with_application_type(mut self, application_type: &str) -> Self {
        self.application_type = application_type.to_owned();
        self
    }
}

impl Prioritizable for FirmwareRule {
    fn id(&self) -> &str {
        &self.id
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn set_priority(&mut self, priority: i32) {
        self.priority = priority;
    }
}

/// What a firmware rule built from a template does when it matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TemplateActionType {
    #[default]
    Rule,
    BlockingFilter,
    DefineProperties,
}

impl fmt::Display for TemplateActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateActionType::Rule => write!(f, "RULE"),
            TemplateActionType::BlockingFilter => write!(f, "BLOCKING_FILTER"),
            TemplateActionType::DefineProperties => write!(f, "DEFINE_PROPERTIES"),
        }
    }
}

/// A reusable firmware rule skeleton. Templates are identified by their id,
/// which doubles as their name, and are ordered within
/// (application type, action type).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirmwareRuleTemplate {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub rule: Rule,
    #[serde(default)]
    pub action_type: TemplateActionType,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
    #[serde(default)]
    pub bypass_filters: Vec<String>,
    #[serde(default)]
    pub editable: bool,
    #[serde(default)]
    pub application_type: String,
    #[serde(default)]
    pub priority: i32,
}

impl FirmwareRuleTemplate {
    #[must_use]
    pub fn new(id: impl Into<String>, rule: Rule, action_type: TemplateActionType) -> Self {
        Self {
            id: id.into(),
            rule,
            action_type,
            editable: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    #[must_use]
    pub fn with_property(mut self, key: &str, value: &str) -> Self {
        self.properties.insert(key.to_owned(), value.to_owned());
        self
    }
}

impl Prioritizable for FirmwareRuleTemplate {
    fn id(&self) -> &str {
        &self.id
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn set_priority(&mut self, priority: i32) {
        self.priority = priority;
    }
}
