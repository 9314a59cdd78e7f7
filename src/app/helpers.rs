// EstateActivity - app/helpers.rs
//
// Convenience call-sites for the rest of the application (CRUD handlers,
// auth flow). Each fixes the category, and where relevant the severity and
// resource, so tagging stays consistent across callers.

use crate::app::store::ActivityLogStore;
use crate::core::model::{Category, LogEntry, NewLogEntry, Severity};

/// Who performed an action, and optionally from where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: String,
    pub name: String,
    pub role: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl Actor {
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role: role.into(),
            ip_address: None,
            user_agent: None,
        }
    }

    /// Attach the request origin; every entry recorded for this actor carries it.
    pub fn with_origin(mut self, ip_address: Option<String>, user_agent: Option<String>) -> Self {
        self.ip_address = ip_address;
        self.user_agent = user_agent;
        self
    }
}

/// Optional identifiers of the specific object an action touched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceRef {
    pub id: Option<String>,
    pub name: Option<String>,
}

impl ResourceRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: Some(name.into()),
        }
    }
}

/// Resource type used for events that are about the system itself.
const SYSTEM_RESOURCE: &str = "system";

fn base(actor: &Actor, action: &str, resource_type: &str, details: &str) -> NewLogEntry {
    NewLogEntry::new(
        actor.id.as_str(),
        actor.name.as_str(),
        actor.role.as_str(),
        action,
        resource_type,
        details,
    )
    .with_origin(actor.ip_address.clone(), actor.user_agent.clone())
}

/// Something a user did on purpose: `info`, `user_action`.
pub fn log_user_action<'s>(
    store: &'s mut ActivityLogStore,
    actor: &Actor,
    action: &str,
    resource_type: &str,
    details: &str,
    resource: ResourceRef,
) -> &'s LogEntry {
    store.record(
        base(actor, action, resource_type, details)
            .with_resource(resource.id, resource.name)
            .with_severity(Severity::Info)
            .with_category(Category::UserAction),
    )
}

/// A security-relevant event on the system: `security`, severity
/// `warning` unless given. Security events are never plain `info`; an `info`
/// severity is raised to `warning`.
pub fn log_security_event<'s>(
    store: &'s mut ActivityLogStore,
    actor: &Actor,
    action: &str,
    details: &str,
    severity: Option<Severity>,
) -> &'s LogEntry {
    let severity = match severity {
        None | Some(Severity::Info) => Severity::Warning,
        Some(other) => other,
    };
    store.record(
        base(actor, action, SYSTEM_RESOURCE, details)
            .with_severity(severity)
            .with_category(Category::Security),
    )
}

/// A create/update/delete on stored data: `info`, `data_change`.
pub fn log_data_change<'s>(
    store: &'s mut ActivityLogStore,
    actor: &Actor,
    action: &str,
    resource_type: &str,
    details: &str,
    resource: ResourceRef,
) -> &'s LogEntry {
    store.record(
        base(actor, action, resource_type, details)
            .with_resource(resource.id, resource.name)
            .with_severity(Severity::Info)
            .with_category(Category::DataChange),
    )
}

/// Login, logout, permission grants: `info`, `access_control`, on `system`.
pub fn log_access_control<'s>(
    store: &'s mut ActivityLogStore,
    actor: &Actor,
    action: &str,
    details: &str,
) -> &'s LogEntry {
    store.record(
        base(actor, action, SYSTEM_RESOURCE, details)
            .with_severity(Severity::Info)
            .with_category(Category::AccessControl),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jane() -> Actor {
        Actor::new("user2", "Jane Smith", "agent")
    }

    #[test]
    fn test_user_action_tagging() {
        let mut store = ActivityLogStore::new();
        let entry = log_user_action(
            &mut store,
            &jane(),
            "exported",
            "report",
            "Exported listings",
            ResourceRef::default(),
        );
        assert_eq!(entry.category, Category::UserAction);
        assert_eq!(entry.severity, Severity::Info);
        assert_eq!(entry.actor_role, "agent");
        assert!(entry.resource_id.is_none());
    }

    #[test]
    fn test_security_event_defaults_to_warning() {
        let mut store = ActivityLogStore::new();
        let entry = log_security_event(&mut store, &jane(), "failed_login", "Bad password", None);
        assert_eq!(entry.severity, Severity::Warning);
        assert_eq!(entry.category, Category::Security);
        assert_eq!(entry.resource_type, "system");
    }

    #[test]
    fn test_security_event_keeps_explicit_severity_but_not_info() {
        let mut store = ActivityLogStore::new();
        let critical = log_security_event(
            &mut store,
            &jane(),
            "brute_force",
            "50 attempts",
            Some(Severity::Critical),
        )
        .severity;
        assert_eq!(critical, Severity::Critical);

        let raised =
            log_security_event(&mut store, &jane(), "port_scan", "Scan detected", Some(Severity::Info)).severity;
        assert_eq!(raised, Severity::Warning);
    }

    #[test]
    fn test_data_change_carries_resource() {
        let mut store = ActivityLogStore::new();
        let entry = log_data_change(
            &mut store,
            &jane(),
            "updated",
            "property",
            "Price cut",
            ResourceRef::new("prop456", "Downtown Condo"),
        );
        assert_eq!(entry.category, Category::DataChange);
        assert_eq!(entry.resource_id.as_deref(), Some("prop456"));
        assert_eq!(entry.resource_name.as_deref(), Some("Downtown Condo"));
    }

    #[test]
    fn test_actor_origin_is_recorded() {
        let mut store = ActivityLogStore::new();
        let actor = jane().with_origin(
            Some("192.168.1.100".to_string()),
            Some("Mozilla/5.0".to_string()),
        );
        let entry = log_access_control(&mut store, &actor, "login", "Signed in");
        assert_eq!(entry.ip_address.as_deref(), Some("192.168.1.100"));
        assert_eq!(entry.user_agent.as_deref(), Some("Mozilla/5.0"));

        let plain = log_access_control(&mut store, &jane(), "logout", "Signed out");
        assert!(plain.ip_address.is_none());
    }

    #[test]
    fn test_access_control_on_system() {
        let mut store = ActivityLogStore::new();
        log_access_control(&mut store, &jane(), "login", "Signed in");
        let entry = &store.query(None)[0];
        assert_eq!(entry.category, Category::AccessControl);
        assert_eq!(entry.resource_type, "system");
        assert_eq!(entry.action, "login");
    }
}
