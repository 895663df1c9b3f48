use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::store::{
    KeyValueStore, Table, FEATURE_RULE_TABLE, FEATURE_TABLE, FIRMWARE_RULE_TABLE,
    FIRMWARE_RULE_TEMPLATE_TABLE,
};
use crate::types::operation;
use crate::validate;
use crate::{
    AdminConfig, AdminError, Feature, FeatureRule, FirmwareRule, FirmwareRuleTemplate,
    Prioritizable, Rule, TemplateActionType, ValidationError,
};

/// What the kind checks may consult besides the entity itself.
pub struct KindContext<'a> {
    pub store: &'a dyn KeyValueStore,
    pub config: &'a AdminConfig,
    /// Application type of the request, already defaulted.
    pub application_type: &'a str,
}

/// A rule kind managed by [`RuleService`](super::RuleService).
pub trait RuleKind: Prioritizable + Clone + Serialize + DeserializeOwned + Send + Sync {
    /// Store table holding this kind.
    const TABLE: &'static str;
    /// Name used in messages and logs.
    const LABEL: &'static str;

    fn allowed_operations() -> &'static [&'static str];

    fn name(&self) -> &str;
    fn rule(&self) -> &Rule;
    fn rule_mut(&mut self) -> &mut Rule;
    fn set_id(&mut self, id: String);
    fn application_type(&self) -> &str;
    fn set_application_type(&mut self, application_type: String);

    /// Entities in one scope share a dense priority sequence.
    fn same_scope(&self, other: &Self) -> bool {
        self.application_type() == other.application_type()
    }

    /// Name of a field that differs from the stored version but must not.
    fn changed_immutable_field(&self, stored: &Self) -> Option<&'static str> {
        (self.application_type() != stored.application_type()).then_some("ApplicationType")
    }

    /// # Errors
    ///
    /// Kind-specific validation failures.
    fn validate_kind(&self, _ctx: &KindContext<'_>) -> Result<(), AdminError> {
        Ok(())
    }

    /// # Errors
    ///
    /// [`AdminError::Conflict`] while other records reference this one.
    fn check_deletable(&self, _store: &dyn KeyValueStore) -> Result<(), AdminError> {
        Ok(())
    }
}

impl RuleKind for FirmwareRule {
    const TABLE: &'static str = FIRMWARE_RULE_TABLE;
    const LABEL: &'static str = "FirmwareRule";

    fn allowed_operations() -> &'static [&'static str] {
        operation::firmware_rule_operations()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn rule(&self) -> &Rule {
        &self.rule
    }

    fn rule_mut(&mut self) -> &mut Rule {
        &mut self.rule
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn application_type(&self) -> &str {
        &self.application_type
    }

    fn set_application_type(&mut self, application_type: String) {
        self.application_type = application_type;
    }
}

impl RuleKind for FirmwareRuleTemplate {
    const TABLE: &'static str = FIRMWARE_RULE_TEMPLATE_TABLE;
    const LABEL: &'static str = "FirmwareRuleTemplate";

    fn allowed_operations() -> &'static [&'static str] {
        operation::firmware_rule_operations()
    }

    fn name(&self) -> &str {
        &self.id
    }

    fn rule(&self) -> &Rule {
        &self.rule
    }

    fn rule_mut(&mut self) -> &mut Rule {
        &mut self.rule
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn application_type(&self) -> &str {
        &self.application_type
    }

    fn set_application_type(&mut self, application_type: String) {
        self.application_type = application_type;
    }

    fn same_scope(&self, other: &Self) -> bool {
        self.application_type == other.application_type && self.action_type == other.action_type
    }

    fn changed_immutable_field(&self, stored: &Self) -> Option<&'static str> {
        if self.application_type != stored.application_type {
            Some("ApplicationType")
        } else if self.action_type != stored.action_type {
            Some("ActionType")
        } else {
            None
        }
    }

    fn validate_kind(&self, _ctx: &KindContext<'_>) -> Result<(), AdminError> {
        if self.action_type == TemplateActionType::DefineProperties
            && self.properties.keys().any(|key| key.trim().is_empty())
        {
            return Err(ValidationError::BlankPropertyKey.into());
        }
        Ok(())
    }

    fn check_deletable(&self, store: &dyn KeyValueStore) -> Result<(), AdminError> {
        let rules: Table<FirmwareRule> = Table::new(FIRMWARE_RULE_TABLE);
        let users: Vec<String> = rules
            .all(store)?
            .into_iter()
            .filter(|rule| rule.template_id == self.id)
            .map(|rule| rule.name)
            .collect();
        if users.is_empty() {
            return Ok(());
        }
        Err(AdminError::Conflict(format!(
            "Template {} is used by rule(s): {}",
            self.id,
            users.join(", ")
        )))
    }
}

impl RuleKind for FeatureRule {
    const TABLE: &'static str = FEATURE_RULE_TABLE;
    const LABEL: &'static str = "FeatureRule";

    fn allowed_operations() -> &'static [&'static str] {
        operation::feature_rule_operations()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn rule(&self) -> &Rule {
        &self.rule
    }

    fn rule_mut(&mut self) -> &mut Rule {
        &mut self.rule
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn application_type(&self) -> &str {
        &self.application_type
    }

    fn set_application_type(&mut self, application_type: String) {
        self.application_type = application_type;
    }

    fn validate_kind(&self, ctx: &KindContext<'_>) -> Result<(), AdminError> {
        if self.feature_ids.is_empty() {
            return Err(ValidationError::MissingFeatures.into());
        }
        let max = ctx.config.max_features_per_rule;
        if self.feature_ids.len() > max {
            return Err(ValidationError::TooManyFeatures { max }.into());
        }

        let features: Table<Feature> = Table::new(FEATURE_TABLE);
        for feature_id in &self.feature_ids {
            let feature = features.get(ctx.store, feature_id)?.ok_or_else(|| {
                AdminError::NotFound(format!("Feature with id: {feature_id} does not exist"))
            })?;
            if feature.application_type != self.application_type {
                return Err(ValidationError::FeatureApplicationMismatch {
                    feature: feature.feature_name,
                    feature_type: feature.application_type,
                    rule_type: self.application_type.clone(),
                }
                .into());
            }
        }

        if self.application_type != ctx.application_type {
            return Err(ValidationError::ApplicationTypeMismatch {
                entity: self.application_type.clone(),
                request: ctx.application_type.to_owned(),
            }
            .into());
        }

        let ranges = validate::percent_ranges(&self.rule)?;
        validate::validate_percent_ranges(&ranges)?;
        Ok(())
    }
}
