// EstateActivity - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "EstateActivity";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "EstateActivity";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Query defaults
// =============================================================================

/// Look-back window used by `recent` when the caller gives no hours.
pub const DEFAULT_RECENT_HOURS: u32 = 24;

/// Lower bound for the configurable recent window (hours).
pub const MIN_RECENT_HOURS: u32 = 1;

/// Upper bound for the configurable recent window (one year, in hours).
pub const MAX_RECENT_HOURS: u32 = 24 * 365;

/// Lower bound for a configured default listing limit.
pub const MIN_LIST_LIMIT: usize = 1;

/// Upper bound for a configured default listing limit.
pub const MAX_LIST_LIMIT: usize = 10_000;

/// Maximum regex pattern length accepted for the details filter.
pub const MAX_REGEX_PATTERN_LENGTH: usize = 4_096;

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Log levels accepted in `[logging] level`.
pub const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

// =============================================================================
// Export
// =============================================================================

/// Header row of the CSV export, in column order.
pub const CSV_HEADERS: [&str; 8] = [
    "Timestamp",
    "User",
    "Role",
    "Action",
    "Resource",
    "Details",
    "Severity",
    "Category",
];

/// File name prefix for exported logs (`activity-logs-<date>.csv`).
pub const EXPORT_FILE_PREFIX: &str = "activity-logs";

/// MIME type of the CSV export.
pub const CSV_MIME_TYPE: &str = "text/csv";

/// MIME type of the JSON export.
pub const JSON_MIME_TYPE: &str = "application/json";

/// Subdirectory of the platform data directory used for exports.
pub const EXPORTS_DIR_NAME: &str = "exports";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
