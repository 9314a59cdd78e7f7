// EstateActivity - core/seed.rs
//
// Fixture entries the store starts with: the site's demo audit trail.
// Timestamps are relative to `now` so the trail always looks recent.

use crate::core::model::{Category, LogEntry, NewLogEntry, Severity};
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// Build the default seed set, newest first.
pub fn default_entries(now: DateTime<Utc>) -> Vec<LogEntry> {
    let hours = Duration::hours;

    let fixtures = [
        (
            hours(2),
            NewLogEntry::new(
                "user1",
                "John Doe",
                "admin",
                "created",
                "property",
                "Added new property listing with 5 bedrooms, 4 bathrooms",
            )
            .with_resource(
                Some("prop123".to_string()),
                Some("Luxury Villa in Beverly Hills".to_string()),
            )
            .with_category(Category::DataChange),
        ),
        (
            hours(4),
            NewLogEntry::new(
                "user2",
                "Jane Smith",
                "agent",
                "updated",
                "property",
                "Updated property price from $450,000 to $425,000",
            )
            .with_resource(
                Some("prop456".to_string()),
                Some("Downtown Condo".to_string()),
            )
            .with_category(Category::DataChange),
        ),
        (
            hours(6),
            NewLogEntry::new(
                "user3",
                "Mike Johnson",
                "developer",
                "deleted",
                "blog_post",
                "Deleted outdated blog post",
            )
            .with_resource(
                Some("blog789".to_string()),
                Some("Market Update Q3".to_string()),
            )
            .with_severity(Severity::Warning)
            .with_category(Category::DataChange),
        ),
        (
            hours(8),
            NewLogEntry::new(
                "user1",
                "John Doe",
                "admin",
                "login",
                "system",
                "User logged in from IP 192.168.1.100",
            )
            .with_category(Category::AccessControl),
        ),
        (
            hours(12),
            NewLogEntry::new(
                "user4",
                "Sarah Wilson",
                "seller",
                "failed_login",
                "system",
                "Failed login attempt with incorrect password",
            )
            .with_severity(Severity::Warning)
            .with_category(Category::Security),
        ),
        (
            hours(24),
            NewLogEntry::new(
                "user1",
                "John Doe",
                "admin",
                "permission_granted",
                "user",
                "Granted admin permissions to new user",
            )
            .with_resource(Some("user5".to_string()), Some("New Agent".to_string()))
            .with_category(Category::AccessControl),
        ),
        (
            hours(48),
            NewLogEntry::new(
                "system",
                "System",
                "system",
                "backup_completed",
                "database",
                "Daily database backup completed successfully",
            )
            .with_category(Category::SystemEvent),
        ),
        (
            hours(72),
            NewLogEntry::new(
                "user2",
                "Jane Smith",
                "agent",
                "exported",
                "report",
                "Exported property listings report to CSV",
            )
            .with_category(Category::UserAction),
        ),
    ];

    fixtures
        .into_iter()
        .map(|(age, new)| LogEntry::from_new(new, Uuid::new_v4().to_string(), now - age))
        .collect()
}
