// EstateActivity - app/shared.rs
//
// Cloneable, thread-safe handle around one ActivityLogStore.
// Writers take the write lock and readers the read lock, so a query never
// sees a half-inserted entry.

use crate::app::helpers::{self, Actor, ResourceRef};
use crate::app::store::ActivityLogStore;
use crate::core::filter::ActivityFilter;
use crate::core::model::{Category, LogEntry, NewLogEntry, Severity};
use crate::core::stats::ActivityStatistics;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Shared handle to a single store. Clones point at the same store.
#[derive(Debug, Clone)]
pub struct ActivityLog {
    inner: Arc<RwLock<ActivityLogStore>>,
}

impl ActivityLog {
    pub fn new(store: ActivityLogStore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    // A panic while holding the lock cannot leave the store half-updated
    // (record is a single push), so poisoned guards are used as-is.
    fn read(&self) -> RwLockReadGuard<'_, ActivityLogStore> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ActivityLogStore> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record an entry and return a copy of what was stored.
    pub fn record(&self, new: NewLogEntry) -> LogEntry {
        self.write().record(new).clone()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn query(&self, filter: Option<&ActivityFilter>) -> Vec<LogEntry> {
        self.read().query(filter)
    }

    pub fn query_by_actor(&self, actor_id: &str, limit: Option<usize>) -> Vec<LogEntry> {
        self.read().query_by_actor(actor_id, limit)
    }

    pub fn query_by_resource(
        &self,
        resource_type: &str,
        resource_id: Option<&str>,
        limit: Option<usize>,
    ) -> Vec<LogEntry> {
        self.read()
            .query_by_resource(resource_type, resource_id, limit)
    }

    pub fn query_by_severity(&self, severity: Severity, limit: Option<usize>) -> Vec<LogEntry> {
        self.read().query_by_severity(severity, limit)
    }

    pub fn query_by_category(&self, category: Category, limit: Option<usize>) -> Vec<LogEntry> {
        self.read().query_by_category(category, limit)
    }

    pub fn recent_since(&self, hours: u32) -> Vec<LogEntry> {
        self.read().recent_since(hours)
    }

    pub fn statistics(&self) -> ActivityStatistics {
        self.read().statistics()
    }

    pub fn export_csv(&self, filter: Option<&ActivityFilter>) -> String {
        self.read().export_csv(filter)
    }

    // -------------------------------------------------------------------------
    // Tagged recording, same tagging as app::helpers
    // -------------------------------------------------------------------------

    pub fn log_user_action(
        &self,
        actor: &Actor,
        action: &str,
        resource_type: &str,
        details: &str,
        resource: ResourceRef,
    ) -> LogEntry {
        helpers::log_user_action(&mut self.write(), actor, action, resource_type, details, resource)
            .clone()
    }

    pub fn log_security_event(
        &self,
        actor: &Actor,
        action: &str,
        details: &str,
        severity: Option<Severity>,
    ) -> LogEntry {
        helpers::log_security_event(&mut self.write(), actor, action, details, severity).clone()
    }

    pub fn log_data_change(
        &self,
        actor: &Actor,
        action: &str,
        resource_type: &str,
        details: &str,
        resource: ResourceRef,
    ) -> LogEntry {
        helpers::log_data_change(&mut self.write(), actor, action, resource_type, details, resource)
            .clone()
    }

    pub fn log_access_control(&self, actor: &Actor, action: &str, details: &str) -> LogEntry {
        helpers::log_access_control(&mut self.write(), actor, action, details).clone()
    }

    /// Run `f` with exclusive access, e.g. to record several entries as one
    /// step that no reader can observe halfway.
    pub fn with_store_mut<R>(&self, f: impl FnOnce(&mut ActivityLogStore) -> R) -> R {
        f(&mut *self.write())
    }
}
