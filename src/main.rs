// EstateActivity - main.rs
//
// Command-line log viewer. Handles:
// 1. CLI argument parsing
// 2. Config loading and logging initialisation
// 3. Building the (seeded) activity store
// 4. Running one query or export against it
//
// The store lives only for this process; nothing is persisted between runs
// apart from export files.

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use estate_activity::app::helpers::{self, Actor, ResourceRef};
use estate_activity::app::store::ActivityLogStore;
use estate_activity::core::export::{self, ExportFormat};
use estate_activity::core::filter::{effective_limit, parse_date_bound, ActivityFilter};
use estate_activity::core::model::{Category, LogEntry, Severity};
use estate_activity::core::stats::ActivityStatistics;
use estate_activity::platform::config::{self, AppConfig, PlatformPaths};
use estate_activity::platform::fs::write_atomic;
use estate_activity::util::error::{
    ActivityLogError, ConfigError, ExportError, FilterError, Result,
};
use estate_activity::util::{constants, logging};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// EstateActivity - activity and audit log viewer.
///
/// Builds the site's in-memory activity log and lists, summarises, or
/// exports it.
#[derive(Parser, Debug)]
#[command(name = "estate-activity", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to config.toml (defaults to the platform config directory).
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,

    /// Start with an empty store instead of the demo audit trail.
    #[arg(long = "no-seed", global = true)]
    no_seed: bool,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug", global = true)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List entries matching the filter, newest first.
    List {
        #[command(flatten)]
        filter: FilterArgs,

        /// Show at most this many entries.
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Print entries as a JSON array.
        #[arg(long)]
        json: bool,
    },

    /// Show aggregate counts.
    Stats {
        /// Print statistics as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List entries from the last N hours.
    Recent {
        /// Look-back window in hours (config `[query] recent_hours`, else 24).
        #[arg(long)]
        hours: Option<u32>,
    },

    /// Export entries matching the filter to activity-logs-<date>.csv.
    Export {
        #[command(flatten)]
        filter: FilterArgs,

        /// Output directory (config `[export] directory`, else the data dir).
        #[arg(short = 'o', long = "out")]
        out: Option<PathBuf>,

        /// Write JSON instead of CSV.
        #[arg(long)]
        json: bool,

        /// Print to stdout instead of writing a file.
        #[arg(long)]
        stdout: bool,
    },

    /// Record one entry through a logging helper, then show it.
    Record(RecordArgs),
}

/// Filter flags shared by `list` and `export`.
#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// Earliest timestamp (RFC 3339 or YYYY-MM-DD), inclusive.
    #[arg(long)]
    since: Option<String>,

    /// Latest timestamp (RFC 3339 or YYYY-MM-DD, whole day), inclusive.
    #[arg(long)]
    until: Option<String>,

    /// Actor id, e.g. user1.
    #[arg(long)]
    actor: Option<String>,

    /// Action tag, e.g. login.
    #[arg(long)]
    action: Option<String>,

    /// Resource type, e.g. property.
    #[arg(long)]
    resource: Option<String>,

    /// info, warning, error or critical.
    #[arg(long)]
    severity: Option<String>,

    /// user_action, system_event, security, data_change or access_control.
    #[arg(long)]
    category: Option<String>,

    /// Case-insensitive text search.
    #[arg(short = 's', long)]
    search: Option<String>,

    /// Regex matched against details.
    #[arg(long)]
    regex: Option<String>,
}

impl FilterArgs {
    /// Validate the raw flags into a filter. This is the only place user
    /// input can be rejected; the store itself accepts any filter.
    /// Blank flags (`--actor ""`) mean "any", like leaving them out.
    fn into_filter(self) -> std::result::Result<ActivityFilter, FilterError> {
        let mut filter = ActivityFilter {
            start_date: non_blank(self.since)
                .as_deref()
                .map(|s| parse_date_bound(s, false))
                .transpose()?,
            end_date: non_blank(self.until)
                .as_deref()
                .map(|s| parse_date_bound(s, true))
                .transpose()?,
            actor_id: non_blank(self.actor),
            action: non_blank(self.action),
            resource_type: non_blank(self.resource),
            severity: non_blank(self.severity)
                .as_deref()
                .map(str::parse::<Severity>)
                .transpose()?,
            category: non_blank(self.category)
                .as_deref()
                .map(str::parse::<Category>)
                .transpose()?,
            ..Default::default()
        };
        if let Some(ref text) = self.search {
            filter.set_text(text);
        }
        if let Some(ref pattern) = self.regex {
            filter.set_pattern(pattern)?;
        }
        Ok(filter)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum RecordKind {
    UserAction,
    Security,
    DataChange,
    AccessControl,
}

#[derive(Args, Debug)]
struct RecordArgs {
    /// Which helper to record through.
    #[arg(value_enum)]
    kind: RecordKind,

    #[arg(long = "actor-id")]
    actor_id: String,

    #[arg(long = "actor-name")]
    actor_name: String,

    #[arg(long, default_value = "agent")]
    role: String,

    #[arg(long)]
    action: String,

    /// Free-text description.
    #[arg(long)]
    details: String,

    /// Resource type (user-action / data-change only).
    #[arg(long, default_value = "system")]
    resource: String,

    #[arg(long = "resource-id")]
    resource_id: Option<String>,

    #[arg(long = "resource-name")]
    resource_name: Option<String>,

    /// Severity for security events (warning, error, critical).
    #[arg(long)]
    severity: Option<Severity>,

    /// Client IP address the action came from.
    #[arg(long = "ip")]
    ip_address: Option<String>,

    /// Client user agent string.
    #[arg(long = "user-agent")]
    user_agent: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let platform_paths = PlatformPaths::resolve();

    // A config file named on the command line must exist; the default one
    // is optional.
    if let Some(ref path) = cli.config {
        if !path.is_file() {
            return Err(ConfigError::Io {
                path: path.clone(),
                source: io::Error::new(io::ErrorKind::NotFound, "config file not found"),
            }
            .into());
        }
    }

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| platform_paths.config_file());

    // Config is read before logging exists, so its warnings are replayed
    // once the subscriber is up.
    let (app_config, config_warnings) = config::load_config(&config_path);
    logging::init(cli.debug, app_config.log_level.as_deref());
    for warning in &config_warnings {
        tracing::warn!("{}", warning);
    }

    tracing::info!(
        version = constants::APP_VERSION,
        debug = cli.debug,
        "EstateActivity starting"
    );

    let mut store = if cli.no_seed || !app_config.seed {
        ActivityLogStore::new()
    } else {
        ActivityLogStore::with_default_seed()
    };
    tracing::debug!(entries = store.len(), "Store ready");

    match cli.command {
        Command::List {
            filter,
            limit,
            json,
        } => {
            let filter = filter.into_filter()?;
            let entries = list_entries(&store, &filter, limit.or(app_config.default_limit));
            if json {
                print_json(&entries)?;
            } else {
                print_entries(&entries, &store);
            }
        }
        Command::Stats { json } => {
            let stats = store.statistics();
            if json {
                print_json(&stats)?;
            } else {
                print_stats(&stats);
            }
        }
        Command::Recent { hours } => {
            let hours = hours.unwrap_or(app_config.recent_hours);
            let entries = store.recent_since(hours);
            println!("{} entries in the last {hours}h", entries.len());
            print_entries(&entries, &store);
        }
        Command::Export {
            filter,
            out,
            json,
            stdout,
        } => {
            let filter = filter.into_filter()?;
            let format = if json {
                ExportFormat::Json
            } else {
                ExportFormat::Csv
            };
            export_entries(&store, &filter, format, stdout, out, &app_config, &platform_paths)?;
        }
        Command::Record(args) => {
            let entry = record(&mut store, args).clone();
            print_entries(std::slice::from_ref(&entry), &store);
            println!("{} entries in store", store.len());
        }
    }

    Ok(())
}

fn record(store: &mut ActivityLogStore, args: RecordArgs) -> &LogEntry {
    let actor = Actor::new(args.actor_id, args.actor_name, args.role)
        .with_origin(args.ip_address, args.user_agent);
    let resource = ResourceRef {
        id: args.resource_id,
        name: args.resource_name,
    };
    match args.kind {
        RecordKind::UserAction => helpers::log_user_action(
            store,
            &actor,
            &args.action,
            &args.resource,
            &args.details,
            resource,
        ),
        RecordKind::DataChange => helpers::log_data_change(
            store,
            &actor,
            &args.action,
            &args.resource,
            &args.details,
            resource,
        ),
        RecordKind::Security => {
            helpers::log_security_event(store, &actor, &args.action, &args.details, args.severity)
        }
        RecordKind::AccessControl => {
            helpers::log_access_control(store, &actor, &args.action, &args.details)
        }
    }
}

/// Filtered entries capped at `limit`; `Some(0)` lists everything, the same
/// rule the store's projections use.
fn list_entries(
    store: &ActivityLogStore,
    filter: &ActivityFilter,
    limit: Option<usize>,
) -> Vec<LogEntry> {
    let mut entries = store.query(Some(filter));
    if let Some(n) = effective_limit(limit) {
        entries.truncate(n);
    }
    entries
}

fn export_entries(
    store: &ActivityLogStore,
    filter: &ActivityFilter,
    format: ExportFormat,
    to_stdout: bool,
    out: Option<PathBuf>,
    app_config: &AppConfig,
    platform_paths: &PlatformPaths,
) -> Result<()> {
    let bytes = match format {
        ExportFormat::Csv => store.export_csv(Some(filter)).into_bytes(),
        ExportFormat::Json => {
            let mut buf = Vec::new();
            store.export_json(Some(filter), &mut buf, Path::new("<buffer>"))?;
            buf
        }
    };

    if to_stdout {
        println!("{}", String::from_utf8_lossy(&bytes));
        return Ok(());
    }

    let dir = out
        .or_else(|| app_config.export_dir.clone())
        .unwrap_or_else(|| platform_paths.export_dir());
    let path = dir.join(export::export_file_name(
        store.now().date_naive(),
        format,
    ));

    write_atomic(&path, &bytes)?;

    tracing::info!(
        path = %path.display(),
        bytes = bytes.len(),
        mime = format.mime_type(),
        "Export written"
    );
    println!("{}", path.display());
    Ok(())
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).map_err(|e| {
        ActivityLogError::from(ExportError::Json {
            path: PathBuf::from("<stdout>"),
            source: e,
        })
    })?;
    println!("{text}");
    Ok(())
}

fn print_entries(entries: &[LogEntry], store: &ActivityLogStore) {
    let now = store.now();
    for entry in entries {
        println!("{}", format_entry(entry, now));
    }
}

/// One listing line. Request origin is appended when the entry has one.
fn format_entry(entry: &LogEntry, now: DateTime<Utc>) -> String {
    let resource = match entry.resource_name.as_deref() {
        Some(name) => format!("{} \"{name}\"", entry.resource_type),
        None => entry.resource_type.clone(),
    };
    let mut line = format!(
        "{}  {:<4} {:<14} {} ({})  {} {}  {}  [{}]",
        export::format_timestamp(&entry.timestamp),
        entry.severity.short_label(),
        entry.category.as_str(),
        entry.actor_name,
        entry.actor_role,
        entry.action,
        resource,
        entry.details,
        entry.time_ago(now),
    );
    if let Some(ref ip) = entry.ip_address {
        line.push_str(&format!("  ip={ip}"));
    }
    if let Some(ref agent) = entry.user_agent {
        line.push_str(&format!("  ua=\"{agent}\""));
    }
    line
}

fn print_stats(stats: &ActivityStatistics) {
    println!("Total logs: {}", stats.total_logs);

    println!("By severity:");
    for severity in Severity::all() {
        println!("  {:<15} {}", severity.as_str(), stats.severity_count(*severity));
    }

    println!("By category:");
    for category in Category::all() {
        println!("  {:<15} {}", category.as_str(), stats.category_count(*category));
    }

    println!("By user:");
    for (name, count) in &stats.by_actor {
        println!("  {name:<15} {count}");
    }

    println!("By resource:");
    for (resource, count) in &stats.by_resource {
        println!("  {resource:<15} {count}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use estate_activity::core::model::NewLogEntry;

    #[test]
    fn test_list_zero_limit_lists_everything() {
        let store = ActivityLogStore::with_default_seed();
        let filter = ActivityFilter::default();
        assert_eq!(list_entries(&store, &filter, Some(0)).len(), store.len());
        assert_eq!(list_entries(&store, &filter, None).len(), store.len());
        assert_eq!(list_entries(&store, &filter, Some(2)).len(), 2);
    }

    #[test]
    fn test_blank_filter_flags_mean_any() {
        let args = FilterArgs {
            actor: Some(String::new()),
            action: Some("  ".to_string()),
            resource: Some(String::new()),
            severity: Some(String::new()),
            category: Some(String::new()),
            since: Some(String::new()),
            ..Default::default()
        };
        let filter = args.into_filter().unwrap();
        assert!(filter.is_empty());
        assert!(filter.actor_id.is_none());
        assert!(filter.severity.is_none());
    }

    #[test]
    fn test_filter_flags_still_validated() {
        let args = FilterArgs {
            severity: Some("loud".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            args.into_filter(),
            Err(FilterError::UnknownSeverity { .. })
        ));
    }

    #[test]
    fn test_record_carries_origin_and_listing_shows_it() {
        let cli = Cli::try_parse_from([
            "estate-activity",
            "record",
            "access-control",
            "--actor-id",
            "user1",
            "--actor-name",
            "John Doe",
            "--action",
            "login",
            "--details",
            "Signed in",
            "--ip",
            "192.168.1.100",
            "--user-agent",
            "Mozilla/5.0",
        ])
        .unwrap();
        let Command::Record(args) = cli.command else {
            panic!("expected record subcommand");
        };

        let mut store = ActivityLogStore::new();
        let entry = record(&mut store, args).clone();
        assert_eq!(entry.ip_address.as_deref(), Some("192.168.1.100"));

        let line = format_entry(&entry, store.now());
        assert!(line.contains("ip=192.168.1.100"), "{line}");
        assert!(line.contains("ua=\"Mozilla/5.0\""), "{line}");
    }

    #[test]
    fn test_listing_omits_missing_origin() {
        let mut store = ActivityLogStore::new();
        let entry = store
            .record(NewLogEntry::new("u", "U", "agent", "viewed", "property", "d"))
            .clone();
        let line = format_entry(&entry, store.now());
        assert!(!line.contains("ip="));
        assert!(!line.contains("ua="));
    }
}
