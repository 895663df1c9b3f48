use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, instrument};

use super::RuleKind;
use crate::store::{
    DistributedLock, KeyValueStore, LockGuard, StoreError, Table, FEATURE_TABLE,
    NAMESPACED_LIST_TABLE,
};
use crate::types::operation::IN_LIST;
use crate::{
    AdminError, Feature, FeatureRule, FirmwareRule, FirmwareRuleTemplate, NamespacedList,
    NamespacedListType, Rule, ValidationError,
};

/// Rule tables scanned for `IN_LIST` references, with their labels.
const RULE_SOURCES: &[(&str, &str)] = &[
    (FirmwareRule::TABLE, FirmwareRule::LABEL),
    (FirmwareRuleTemplate::TABLE, FirmwareRuleTemplate::LABEL),
    (FeatureRule::TABLE, FeatureRule::LABEL),
];

/// The fields every rule record shares; the rest of the document is ignored.
#[derive(Deserialize)]
struct RuleRecord {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    rule: Rule,
}

/// Named MAC / IP / string lists referenced by rules and feature whitelists.
pub struct NamespacedListService {
    store: Arc<dyn KeyValueStore>,
    lock: Arc<dyn DistributedLock>,
    table: Table<NamespacedList>,
}

impl NamespacedListService {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, lock: Arc<dyn DistributedLock>) -> Self {
        Self {
            store,
            lock,
            table: Table::new(NAMESPACED_LIST_TABLE),
        }
    }

    /// # Errors
    ///
    /// Store failures.
    pub fn get(&self, id: &str) -> Result<Option<NamespacedList>, AdminError> {
        Ok(self.table.get(self.store.as_ref(), id)?)
    }

    /// # Errors
    ///
    /// [`ValidationError::BlankListId`] for a blank id,
    /// [`AdminError::Conflict`] if the id is taken.
    #[instrument(skip(self, list), fields(id = %list.id))]
    pub fn create(&self, list: NamespacedList, owner: &str) -> Result<NamespacedList, AdminError> {
        if list.id.trim().is_empty() {
            return Err(ValidationError::BlankListId.into());
        }
        let _guard = self.acquire(owner)?;
        if self.get(&list.id)?.is_some() {
            return Err(AdminError::Conflict(format!(
                "NamespacedList with id: {} already exists",
                list.id
            )));
        }
        self.table.put(self.store.as_ref(), &list.id, &list)?;
        info!(type_name = %list.type_name, size = list.data.len(), "NamespacedList created");
        Ok(list)
    }

    /// Delete a list nothing references. When `type_name` is given the
    /// stored list must have that type.
    ///
    /// # Errors
    ///
    /// [`AdminError::NotFound`] when absent or of another type,
    /// [`AdminError::Conflict`] while a rule or whitelisted feature uses it.
    #[instrument(skip(self))]
    pub fn delete(
        &self,
        id: &str,
        type_name: Option<NamespacedListType>,
        owner: &str,
    ) -> Result<NamespacedList, AdminError> {
        let _guard = self.acquire(owner)?;
        let stored = self
            .get(id)?
            .filter(|list| type_name.map_or(true, |t| t == list.type_name))
            .ok_or_else(|| AdminError::NotFound(format!("List with id: {id} does not exist")))?;
        if let Some(usage) = self.find_usage(id)? {
            return Err(AdminError::Conflict(usage));
        }
        self.table.delete(self.store.as_ref(), id)?;
        info!("NamespacedList deleted");
        Ok(stored)
    }

    /// Describe the first record that references list `id`, if any.
    ///
    /// # Errors
    ///
    /// Store failures or undecodable records.
    pub fn find_usage(&self, id: &str) -> Result<Option<String>, AdminError> {
        let store = self.store.as_ref();
        for (table, label) in RULE_SOURCES {
            for doc in store.get_all_as_list(table)? {
                let record: RuleRecord =
                    serde_json::from_value(doc).map_err(StoreError::from)?;
                if record.rule.fixed_args_by_operation(IN_LIST).contains(&id) {
                    let name = if record.name.is_empty() {
                        record.id
                    } else {
                        record.name
                    };
                    return Ok(Some(format!("List is used by {label} {name}")));
                }
            }
        }

        let features: Table<Feature> = Table::new(FEATURE_TABLE);
        let user = features.all(store)?.into_iter().find(|feature| {
            feature.whitelisted && feature.whitelist_property.as_deref() == Some(id)
        });
        Ok(user.map(|feature| format!("List is used by feature {}", feature.feature_name)))
    }

    fn acquire(&self, owner: &str) -> Result<LockGuard<'_>, AdminError> {
        let guard = LockGuard::acquire(self.lock.as_ref(), owner)?;
        self.store.force_sync_changes()?;
        Ok(guard)
    }
}
