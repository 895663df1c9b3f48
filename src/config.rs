use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ValidationError;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("no application types configured")]
    NoApplicationTypes,

    #[error("default application type '{0}' is not one of the configured types")]
    UnknownDefault(String),

    #[error("max_features_per_rule must be greater than zero")]
    ZeroFeatureLimit,
}

/// Administrative settings shared by every service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Application types entities may belong to.
    #[serde(default = "default_application_types")]
    pub application_types: Vec<String>,

    /// Used when neither the entity nor the caller names one.
    #[serde(default = "default_application_type")]
    pub default_application_type: String,

    /// Upper bound on feature ids per feature rule.
    #[serde(default = "default_max_features")]
    pub max_features_per_rule: usize,

    /// Seconds before a held table lock may be taken over.
    #[serde(default = "default_lock_ttl")]
    pub lock_ttl_secs: u64,
}

fn default_application_types() -> Vec<String> {
    vec!["stb".to_owned(), "rdkcloud".to_owned()]
}

fn default_application_type() -> String {
    "stb".to_owned()
}

fn default_max_features() -> usize {
    100
}

fn default_lock_ttl() -> u64 {
    10
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            application_types: default_application_types(),
            default_application_type: default_application_type(),
            max_features_per_rule: default_max_features(),
            lock_ttl_secs: default_lock_ttl(),
        }
    }
}

impl AdminConfig {
    /// Parse and validate a JSON document. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for malformed JSON or settings that fail
    /// [`AdminConfig::validate`].
    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`AdminConfig::from_json_str`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// # Errors
    ///
    /// Returns the first inconsistency found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.application_types.is_empty() {
            return Err(ConfigError::NoApplicationTypes);
        }
        if !self.is_valid_application_type(&self.default_application_type) {
            return Err(ConfigError::UnknownDefault(
                self.default_application_type.clone(),
            ));
        }
        if self.max_features_per_rule == 0 {
            return Err(ConfigError::ZeroFeatureLimit);
        }
        Ok(())
    }

    #[must_use]
    pub fn is_valid_application_type(&self, application_type: &str) -> bool {
        self.application_types.iter().any(|t| t == application_type)
    }

    /// # Errors
    ///
    /// [`ValidationError::BlankApplicationType`] or
    /// [`ValidationError::UnknownApplicationType`].
    pub fn validate_application_type(&self, application_type: &str) -> Result<(), ValidationError> {
        if application_type.trim().is_empty() {
            return Err(ValidationError::BlankApplicationType);
        }
        if !self.is_valid_application_type(application_type) {
            return Err(ValidationError::UnknownApplicationType {
                value: application_type.to_owned(),
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn lock_ttl(&self) -> Duration {
        Duration::from_secs(self.lock_ttl_secs)
    }
}
