use serde::{Deserialize, Serialize};

use super::{Prioritizable, Rule};

/// A feature rule: a rule tree that switches on a set of features.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureRule {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub rule: Rule,
    #[serde(default)]
    pub feature_ids: Vec<String>,
    #[serde(default)]
    pub application_type: String,
    #[serde(default)]
    pub priority: i32,
}

impl FeatureRule {
    #[must_use]
    pub fn new(name: impl Into<String>, rule: Rule, feature_ids: Vec<String>) -> Self {
        Self {
            name: name.into(),
            rule,
            feature_ids,
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

impl Prioritizable for FeatureRule {
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

/// A feature that feature rules switch on. Whitelisted features are
/// restricted to the members of a namespaced list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    pub id: String,
    #[serde(default)]
    pub feature_name: String,
    #[serde(default)]
    pub application_type: String,
    #[serde(default)]
    pub whitelisted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whitelist_property: Option<String>,
}

impl Feature {
    #[must_use]
    pub fn new(id: &str, feature_name: &str, application_type: &str) -> Self {
        Self {
            id: id.to_owned(),
            feature_name: feature_name.to_owned(),
            application_type: application_type.to_owned(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn whitelisted_by(mut self, list_id: &str) -> Self {
        self.whitelisted = true;
        self.whitelist_property = Some(list_id.to_owned());
        self
    }
}
