//! Rule administration services.
//!
//! Every mutating call takes the table lock for the caller's owner token,
//! forces a cache sync, validates, reorganizes the entity's scope and
//! persists only the entities whose priority changed.

mod kind;
pub mod namespaced_list;

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

pub use kind::{KindContext, RuleKind};
pub use namespaced_list::NamespacedListService;

use crate::reorganize;
use crate::store::{DistributedLock, KeyValueStore, LockGuard, Table};
use crate::validate;
use crate::{
    AdminConfig, AdminError, FeatureRule, FirmwareRule, FirmwareRuleTemplate, ValidationError,
};

pub type FirmwareRuleService = RuleService<FirmwareRule>;
pub type FirmwareRuleTemplateService = RuleService<FirmwareRuleTemplate>;
pub type FeatureRuleService = RuleService<FeatureRule>;

/// Outcome of [`RuleService::import_all`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub imported: Vec<String>,
    pub not_imported: Vec<String>,
}

/// Create, update, delete and reorder one rule kind.
pub struct RuleService<K> {
    store: Arc<dyn KeyValueStore>,
    lock: Arc<dyn DistributedLock>,
    config: Arc<AdminConfig>,
    table: Table<K>,
}

impl<K: RuleKind> RuleService<K> {
    #[must_use]
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        lock: Arc<dyn DistributedLock>,
        config: Arc<AdminConfig>,
    ) -> Self {
        Self {
            store,
            lock,
            config,
            table: Table::new(K::TABLE),
        }
    }

    /// # Errors
    ///
    /// Store failures.
    pub fn get(&self, id: &str) -> Result<Option<K>, AdminError> {
        Ok(self.table.get(self.store.as_ref(), id)?)
    }

    /// Every entity of `application_type`, sorted by priority then id.
    ///
    /// # Errors
    ///
    /// Store failures.
    pub fn list(&self, application_type: &str) -> Result<Vec<K>, AdminError> {
        let mut items: Vec<K> = self
            .table
            .all(self.store.as_ref())?
            .into_iter()
            .filter(|item| item.application_type() == application_type)
            .collect();
        reorganize::sort_by_priority(&mut items);
        Ok(items)
    }

    /// The priority-ordered scope `entity` belongs to, including any stored
    /// version of `entity` itself.
    ///
    /// # Errors
    ///
    /// Store failures.
    pub fn scope_of(&self, entity: &K) -> Result<Vec<K>, AdminError> {
        let mut scope: Vec<K> = self
            .table
            .all(self.store.as_ref())?
            .into_iter()
            .filter(|item| item.same_scope(entity))
            .collect();
        reorganize::sort_by_priority(&mut scope);
        if !reorganize::is_dense(&scope) {
            warn!(table = K::TABLE, size = scope.len(), "scope priorities are not dense");
        }
        Ok(scope)
    }

    /// Validate `entity` and insert it at its requested priority.
    ///
    /// # Errors
    ///
    /// [`AdminError::Conflict`] if the id, name or rule is already taken;
    /// [`AdminError::Validation`] for an invalid entity; infrastructure
    /// errors for lock or store failures.
    #[instrument(skip(self, entity), fields(table = K::TABLE))]
    pub fn create(&self, entity: K, application_type: &str, owner: &str) -> Result<K, AdminError> {
        let _guard = self.acquire(owner)?;
        self.create_locked(entity, application_type)
    }

    /// Replace a stored entity, moving it if its priority changed.
    ///
    /// # Errors
    ///
    /// [`AdminError::NotFound`] for a blank or unknown id,
    /// [`AdminError::Conflict`] when an immutable field changes or the name or
    /// rule is taken, plus everything [`RuleService::create`] can return.
    #[instrument(skip(self, entity), fields(table = K::TABLE))]
    pub fn update(&self, entity: K, application_type: &str, owner: &str) -> Result<K, AdminError> {
        let _guard = self.acquire(owner)?;
        self.update_locked(entity, application_type)
    }

    /// Remove an entity and close the gap in its scope.
    ///
    /// # Errors
    ///
    /// [`AdminError::NotFound`] for an unknown id; [`AdminError::Conflict`]
    /// when other entities still reference it.
    #[instrument(skip(self), fields(table = K::TABLE))]
    pub fn delete(&self, id: &str, owner: &str) -> Result<K, AdminError> {
        let _guard = self.acquire(owner)?;
        let stored = self.find(id)?;
        stored.check_deletable(self.store.as_ref())?;
        self.table.delete(self.store.as_ref(), id)?;
        let scope = self.scope_of(&stored)?;
        let altered = reorganize::pack(scope, id);
        self.save_all(&altered)?;
        info!(id, priority = stored.priority(), shifted = altered.len(), "{} deleted", K::LABEL);
        Ok(stored)
    }

    /// Move an entity to `new_priority` within its scope and return every
    /// entity whose priority changed.
    ///
    /// # Errors
    ///
    /// [`ValidationError::InvalidPriority`] for `new_priority <= 0`;
    /// [`AdminError::NotFound`] for an unknown id.
    #[instrument(skip(self), fields(table = K::TABLE))]
    pub fn change_priority(
        &self,
        id: &str,
        new_priority: i32,
        owner: &str,
    ) -> Result<Vec<K>, AdminError> {
        if new_priority <= 0 {
            return Err(ValidationError::InvalidPriority {
                priority: new_priority,
            }
            .into());
        }
        let _guard = self.acquire(owner)?;
        let stored = self.find(id)?;
        let mut scope = self.scope_of(&stored)?;
        let altered =
            reorganize::change_priority(&mut scope, stored.priority(), new_priority)?.to_vec();
        if !altered.iter().any(|item| item.id() == id) {
            return Err(AdminError::Conflict(format!(
                "Updated {} {id} is not present in reorganized list",
                K::LABEL
            )));
        }
        self.save_all(&altered)?;
        info!(
            id,
            old_priority = stored.priority(),
            new_priority,
            "{} priority changed",
            K::LABEL
        );
        Ok(altered)
    }

    /// Create or update each entity under a single lock acquisition.
    /// Failures are logged and reported; they never stop the batch.
    ///
    /// # Errors
    ///
    /// Only lock or cache-sync failures before the batch starts.
    #[instrument(skip(self, entities), fields(table = K::TABLE, count = entities.len()))]
    pub fn import_all(
        &self,
        entities: Vec<K>,
        application_type: &str,
        owner: &str,
    ) -> Result<ImportReport, AdminError> {
        let _guard = self.acquire(owner)?;
        let mut report = ImportReport::default();
        for entity in entities {
            let id = entity.id().to_owned();
            let result = match self.exists(&id) {
                Ok(true) => self.update_locked(entity, application_type),
                Ok(false) => self.create_locked(entity, application_type),
                Err(err) => Err(err),
            };
            match result {
                Ok(saved) => report.imported.push(saved.id().to_owned()),
                Err(err) => {
                    warn!(id = %id, error = %err, "{} not imported", K::LABEL);
                    report.not_imported.push(id);
                }
            }
        }
        info!(
            imported = report.imported.len(),
            not_imported = report.not_imported.len(),
            "{} import finished",
            K::LABEL
        );
        Ok(report)
    }

    fn acquire(&self, owner: &str) -> Result<LockGuard<'_>, AdminError> {
        let guard = LockGuard::acquire(self.lock.as_ref(), owner)?;
        self.store.force_sync_changes()?;
        Ok(guard)
    }

    fn exists(&self, id: &str) -> Result<bool, AdminError> {
        if id.trim().is_empty() {
            return Ok(false);
        }
        Ok(self.get(id)?.is_some())
    }

    fn find(&self, id: &str) -> Result<K, AdminError> {
        if id.trim().is_empty() {
            return Err(AdminError::NotFound(format!("{} id is empty", K::LABEL)));
        }
        self.get(id)?.ok_or_else(|| {
            AdminError::NotFound(format!("{} with id: {id} does not exist", K::LABEL))
        })
    }

    fn create_locked(&self, mut entity: K, application_type: &str) -> Result<K, AdminError> {
        if entity.id().trim().is_empty() {
            entity.set_id(Uuid::new_v4().to_string());
        } else if self.get(entity.id())?.is_some() {
            return Err(AdminError::Conflict(format!(
                "{} with id: {} already exists",
                K::LABEL,
                entity.id()
            )));
        }
        self.prepare(&mut entity, application_type)?;
        let mut scope = self.scope_of(&entity)?;
        check_duplicates(&entity, &scope)?;

        let id = entity.id().to_owned();
        let altered = reorganize::add_new(entity, &mut scope)?.to_vec();
        let created = altered
            .iter()
            .find(|item| item.id() == id)
            .cloned()
            .ok_or_else(|| {
                AdminError::Conflict(format!(
                    "Created {} {id} is not present in reorganized list",
                    K::LABEL
                ))
            })?;
        self.save_all(&altered)?;
        info!(id = %id, priority = created.priority(), "{} created", K::LABEL);
        Ok(created)
    }

    fn update_locked(&self, mut entity: K, application_type: &str) -> Result<K, AdminError> {
        let stored = self.find(entity.id())?;
        self.prepare(&mut entity, application_type)?;
        if let Some(field) = entity.changed_immutable_field(&stored) {
            return Err(AdminError::Conflict(format!("{field} cannot be changed")));
        }
        let mut scope = self.scope_of(&entity)?;
        check_duplicates(&entity, &scope)?;

        let id = entity.id().to_owned();
        if entity.priority() == stored.priority() {
            self.table.put(self.store.as_ref(), &id, &entity)?;
            info!(id = %id, priority = entity.priority(), "{} updated", K::LABEL);
            return Ok(entity);
        }

        let altered = reorganize::update_existing(entity, &mut scope, stored.priority())?.to_vec();
        let updated = altered
            .iter()
            .find(|item| item.id() == id)
            .cloned()
            .ok_or_else(|| {
                AdminError::Conflict(format!(
                    "Updated {} {id} is not present in reorganized list",
                    K::LABEL
                ))
            })?;
        self.save_all(&altered)?;
        info!(
            id = %id,
            old_priority = stored.priority(),
            new_priority = updated.priority(),
            "{} updated",
            K::LABEL
        );
        Ok(updated)
    }

    /// Default the application type, normalize and validate the tree, then
    /// run the kind's own checks.
    fn prepare(&self, entity: &mut K, application_type: &str) -> Result<(), AdminError> {
        let caller = if application_type.trim().is_empty() {
            self.config.default_application_type.as_str()
        } else {
            application_type
        };
        if entity.application_type().trim().is_empty() {
            entity.set_application_type(caller.to_owned());
        }
        self.config
            .validate_application_type(entity.application_type())?;

        entity.rule_mut().normalize();
        validate::validate_rule(entity.rule(), K::allowed_operations())?;
        if entity.name().trim().is_empty() {
            return Err(ValidationError::BlankName { kind: K::LABEL }.into());
        }
        let ctx = KindContext {
            store: self.store.as_ref(),
            config: self.config.as_ref(),
            application_type: caller,
        };
        entity.validate_kind(&ctx)
    }

    /// Writes stop at the first failure; earlier writes are kept.
    fn save_all(&self, items: &[K]) -> Result<(), AdminError> {
        debug!(table = K::TABLE, count = items.len(), "saving altered entities");
        for item in items {
            self.table.put(self.store.as_ref(), item.id(), item)?;
        }
        debug!(table = K::TABLE, count = items.len(), "saved altered entities");
        Ok(())
    }
}

fn check_duplicates<K: RuleKind>(entity: &K, scope: &[K]) -> Result<(), AdminError> {
    let name = entity.name().to_lowercase();
    for other in scope.iter().filter(|other| other.id() != entity.id()) {
        if other.name().to_lowercase() == name {
            return Err(AdminError::Conflict(format!(
                "Name is already used: {}",
                entity.name()
            )));
        }
        let mut other_rule = other.rule().clone();
        other_rule.normalize();
        if &other_rule == entity.rule() {
            return Err(AdminError::Conflict(format!(
                "Rule has duplicate: {}",
                other.name()
            )));
        }
    }
    Ok(())
}
