// EstateActivity - platform/config.rs
//
// Platform-specific configuration, data directory resolution, and config.toml
// loading with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for EstateActivity configuration and exports.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/estateactivity/).
    pub config_dir: PathBuf,

    /// Data directory; exports default to a subdirectory of it.
    pub data_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            let data_dir = proj_dirs.data_dir().to_path_buf();

            tracing::debug!(
                config = %config_dir.display(),
                data = %data_dir.display(),
                "Platform paths resolved"
            );

            Self {
                config_dir,
                data_dir,
            }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            let fallback = PathBuf::from(".");
            Self {
                config_dir: fallback.clone(),
                data_dir: fallback,
            }
        }
    }

    /// Default location of config.toml.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }

    /// Default directory for exported files.
    pub fn export_dir(&self) -> PathBuf {
        self.data_dir.join(constants::EXPORTS_DIR_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[store]` section.
    pub store: StoreSection,
    /// `[query]` section.
    pub query: QuerySection,
    /// `[export]` section.
    pub export: ExportSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[store]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct StoreSection {
    /// Start with the demo audit trail.
    pub seed: Option<bool>,
}

/// `[query]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct QuerySection {
    /// Window used by `recent` when no hours are given.
    pub recent_hours: Option<u32>,
    /// Row cap for `list` when no --limit is given.
    pub default_limit: Option<usize>,
}

/// `[export]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ExportSection {
    /// Directory exports are written to.
    pub directory: Option<String>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Seed the store with the demo trail at startup.
    pub seed: bool,
    /// Default window for `recent`, in hours.
    pub recent_hours: u32,
    /// Default row cap for `list` (None = unlimited).
    pub default_limit: Option<usize>,
    /// Export directory override.
    pub export_dir: Option<PathBuf>,
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            seed: true,
            recent_hours: constants::DEFAULT_RECENT_HOURS,
            default_limit: None,
            export_dir: None,
            log_level: None,
        }
    }
}

/// Load and validate `config.toml` at `config_path`.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// If the file does not exist, returns defaults with no warnings (first-run).
/// If the file is unparseable, returns defaults with a warning so the
/// application still starts but the user is informed.
pub fn load_config(config_path: &Path) -> (AppConfig, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), warnings);
    }

    let raw = match read_raw(config_path) {
        Ok(r) => r,
        Err(e) => {
            let msg = format!("{e}. Using defaults.");
            tracing::warn!("{}", msg);
            warnings.push(msg);
            return (AppConfig::default(), warnings);
        }
    };

    tracing::info!(path = %config_path.display(), "Loaded config.toml");

    let config = validate(raw, &mut warnings);

    if !warnings.is_empty() {
        tracing::warn!(
            count = warnings.len(),
            "Config validation produced warnings"
        );
    }

    (config, warnings)
}

/// Read and parse config.toml without validating values.
pub fn read_raw(config_path: &Path) -> Result<RawConfig, ConfigError> {
    let content = std::fs::read_to_string(config_path).map_err(|e| ConfigError::Io {
        path: config_path.to_path_buf(),
        source: e,
    })?;
    toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
        path: config_path.to_path_buf(),
        source: e,
    })
}

fn out_of_range(field: &str, value: impl ToString, expected: String) -> ConfigError {
    ConfigError::ValueOutOfRange {
        field: field.to_string(),
        value: value.to_string(),
        expected,
    }
}

/// Check each field against named constants, accumulating all problems.
fn validate(raw: RawConfig, warnings: &mut Vec<String>) -> AppConfig {
    let mut config = AppConfig::default();

    // -- Store: seed --
    if let Some(seed) = raw.store.seed {
        config.seed = seed;
    }

    // -- Query: recent_hours --
    if let Some(hours) = raw.query.recent_hours {
        if (constants::MIN_RECENT_HOURS..=constants::MAX_RECENT_HOURS).contains(&hours) {
            config.recent_hours = hours;
        } else {
            let err = out_of_range(
                "query.recent_hours",
                hours,
                format!(
                    "{}-{}",
                    constants::MIN_RECENT_HOURS,
                    constants::MAX_RECENT_HOURS
                ),
            );
            warnings.push(format!(
                "{err}. Using default ({}).",
                constants::DEFAULT_RECENT_HOURS
            ));
        }
    }

    // -- Query: default_limit --
    if let Some(limit) = raw.query.default_limit {
        if (constants::MIN_LIST_LIMIT..=constants::MAX_LIST_LIMIT).contains(&limit) {
            config.default_limit = Some(limit);
        } else {
            let err = out_of_range(
                "query.default_limit",
                limit,
                format!("{}-{}", constants::MIN_LIST_LIMIT, constants::MAX_LIST_LIMIT),
            );
            warnings.push(format!("{err}. Listing is unlimited."));
        }
    }

    // -- Export: directory --
    if let Some(ref dir) = raw.export.directory {
        if !dir.trim().is_empty() {
            config.export_dir = Some(PathBuf::from(dir));
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        if constants::VALID_LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: {}. Using default ({}).",
                constants::VALID_LOG_LEVELS.join(", "),
                constants::DEFAULT_LOG_LEVEL,
            ));
        }
    }

    config
}
