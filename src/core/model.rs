// EstateActivity - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no
// platform dependencies.
//
// These types are the shared vocabulary across all layers.

use crate::util::error::FilterError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// =============================================================================
// Log Entry
// =============================================================================

/// One immutable record of an observed action.
///
/// Created only by the store (which assigns `id` and `timestamp`) or by the
/// seed step. Fields are public for reading; nothing in the crate mutates an
/// entry after it has been stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Opaque identifier, unique within the store's lifetime.
    pub id: String,

    /// Moment the entry was recorded, in UTC.
    pub timestamp: DateTime<Utc>,

    pub actor_id: String,
    pub actor_name: String,
    pub actor_role: String,

    /// Short verb tag, e.g. "created", "login", "failed_login".
    pub action: String,

    /// Kind of thing acted upon, e.g. "property", "user", "system".
    pub resource_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_name: Option<String>,

    /// Free-text, human-readable description.
    pub details: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,

    pub severity: Severity,
    pub category: Category,
}

impl LogEntry {
    /// Materialise a caller-supplied entry with a store-assigned id and time.
    pub(crate) fn from_new(new: NewLogEntry, id: String, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            timestamp,
            actor_id: new.actor_id,
            actor_name: new.actor_name,
            actor_role: new.actor_role,
            action: new.action,
            resource_type: new.resource_type,
            resource_id: new.resource_id,
            resource_name: new.resource_name,
            details: new.details,
            ip_address: new.ip_address,
            user_agent: new.user_agent,
            severity: new.severity,
            category: new.category,
        }
    }

    /// Compact relative age for listings: `42s ago`, `5m ago`, `3h ago`,
    /// `2d ago`. Entries stamped after `now` read as `0s ago`.
    pub fn time_ago(&self, now: DateTime<Utc>) -> String {
        let secs = (now - self.timestamp).num_seconds().max(0);
        match secs {
            s if s < 60 => format!("{s}s ago"),
            s if s < 3_600 => format!("{}m ago", s / 60),
            s if s < 86_400 => format!("{}h ago", s / 3_600),
            s => format!("{}d ago", s / 86_400),
        }
    }
}

// =============================================================================
// New entry (record input)
// =============================================================================

/// Every `LogEntry` field except the store-assigned `id` and `timestamp`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLogEntry {
    pub actor_id: String,
    pub actor_name: String,
    pub actor_role: String,
    pub action: String,
    pub resource_type: String,
    pub resource_id: Option<String>,
    pub resource_name: Option<String>,
    pub details: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub severity: Severity,
    pub category: Category,
}

impl NewLogEntry {
    /// Start an entry with the mandatory fields.
    ///
    /// Severity defaults to `Info` and category to `UserAction`; use the
    /// `with_*` methods to override them or attach optional metadata.
    pub fn new(
        actor_id: impl Into<String>,
        actor_name: impl Into<String>,
        actor_role: impl Into<String>,
        action: impl Into<String>,
        resource_type: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            actor_id: actor_id.into(),
            actor_name: actor_name.into(),
            actor_role: actor_role.into(),
            action: action.into(),
            resource_type: resource_type.into(),
            resource_id: None,
            resource_name: None,
            details: details.into(),
            ip_address: None,
            user_agent: None,
            severity: Severity::Info,
            category: Category::UserAction,
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Attach the identifiers of the specific object acted upon.
    pub fn with_resource(mut self, id: Option<String>, name: Option<String>) -> Self {
        self.resource_id = id;
        self.resource_name = name;
        self
    }

    /// Attach request-origin metadata.
    pub fn with_origin(mut self, ip_address: Option<String>, user_agent: Option<String>) -> Self {
        self.ip_address = ip_address;
        self.user_agent = user_agent;
        self
    }
}

// =============================================================================
// Severity
// =============================================================================

/// How urgent an entry is. Treated as a closed set, not an ordered scale;
/// `Ord` follows declaration order and only serves as a sorted-map key.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Error,
    Critical,
}

impl Severity {
    /// Returns all variants in display order.
    pub fn all() -> &'static [Severity] {
        &[
            Severity::Info,
            Severity::Warning,
            Severity::Error,
            Severity::Critical,
        ]
    }

    /// Wire tag, as used in CSV export and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Critical => "critical",
        }
    }

    /// Short label for compact display (e.g. table columns).
    pub fn short_label(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARN",
            Severity::Error => "ERR",
            Severity::Critical => "CRIT",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Severity::all()
            .iter()
            .copied()
            .find(|sev| sev.as_str() == lower)
            .ok_or_else(|| FilterError::UnknownSeverity {
                input: s.to_string(),
            })
    }
}

// =============================================================================
// Category
// =============================================================================

/// Why an entry was recorded (as opposed to severity, which is how urgent).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    UserAction,
    SystemEvent,
    Security,
    DataChange,
    AccessControl,
}

impl Category {
    /// Returns all variants in display order.
    pub fn all() -> &'static [Category] {
        &[
            Category::UserAction,
            Category::SystemEvent,
            Category::Security,
            Category::DataChange,
            Category::AccessControl,
        ]
    }

    /// Wire tag, as used in CSV export and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::UserAction => "user_action",
            Category::SystemEvent => "system_event",
            Category::Security => "security",
            Category::DataChange => "data_change",
            Category::AccessControl => "access_control",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised = s.trim().to_lowercase().replace('-', "_");
        Category::all()
            .iter()
            .copied()
            .find(|cat| cat.as_str() == normalised)
            .ok_or_else(|| FilterError::UnknownCategory {
                input: s.to_string(),
            })
    }
}
