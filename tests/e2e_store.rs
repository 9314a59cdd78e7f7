// EstateActivity - tests/e2e_store.rs
//
// End-to-end tests for the activity store through the public library API:
// seeding, recording via the helpers, querying, statistics, CSV export to a
// real file, and config loading from a real temp directory. No mocks.

use estate_activity::app::helpers::{self, Actor, ResourceRef};
use estate_activity::app::shared::ActivityLog;
use estate_activity::app::store::ActivityLogStore;
use estate_activity::core::export::{export_file_name, ExportFormat};
use estate_activity::core::filter::{parse_date_bound, ActivityFilter};
use estate_activity::core::model::{Category, LogEntry, NewLogEntry, Severity};
use estate_activity::core::seed;
use estate_activity::platform::config::load_config;
use estate_activity::platform::fs::write_atomic;
use std::fs;

// =============================================================================
// Helpers
// =============================================================================

fn seeded() -> ActivityLogStore {
    ActivityLogStore::with_default_seed()
}

fn seed_count() -> usize {
    seed::default_entries(chrono::Utc::now()).len()
}

fn admin() -> Actor {
    Actor::new("user1", "John Doe", "admin")
}

/// Every predicate the filter sets, checked independently of the filter code.
fn satisfies(entry: &LogEntry, f: &ActivityFilter) -> bool {
    f.start_date.map_or(true, |d| entry.timestamp >= d)
        && f.end_date.map_or(true, |d| entry.timestamp <= d)
        && f.actor_id.as_ref().map_or(true, |v| &entry.actor_id == v)
        && f.action.as_ref().map_or(true, |v| &entry.action == v)
        && f.resource_type.as_ref().map_or(true, |v| &entry.resource_type == v)
        && f.severity.map_or(true, |v| entry.severity == v)
        && f.category.map_or(true, |v| entry.category == v)
}

/// Parse the store's CSV the simple way: one line per row, fields between
/// `","` separators with the outer quotes stripped.
fn naive_parse(csv: &str) -> Vec<Vec<String>> {
    csv.split('\n')
        .map(|line| {
            line.trim_start_matches('"')
                .trim_end_matches('"')
                .split("\",\"")
                .map(str::to_string)
                .collect()
        })
        .collect()
}

// =============================================================================
// Counting and ordering
// =============================================================================

#[test]
fn e2e_count_is_records_plus_seed() {
    let mut store = seeded();
    for i in 0..7 {
        helpers::log_access_control(&mut store, &admin(), "login", &format!("login {i}"));
    }
    assert_eq!(store.query(None).len(), seed_count() + 7);
}

#[test]
fn e2e_most_recent_record_is_first() {
    let mut store = seeded();
    helpers::log_access_control(&mut store, &admin(), "login", "first");
    helpers::log_access_control(&mut store, &admin(), "logout", "second");

    let all = store.query(None);
    assert_eq!(all[0].details, "second");
    assert_eq!(all[1].details, "first");
}

// =============================================================================
// Filtering
// =============================================================================

#[test]
fn e2e_filters_have_no_false_positives_or_negatives() {
    let mut store = seeded();
    helpers::log_security_event(
        &mut store,
        &Actor::new("user4", "Sarah Wilson", "seller"),
        "failed_login",
        "Third failed attempt",
        Some(Severity::Error),
    );
    helpers::log_data_change(
        &mut store,
        &admin(),
        "updated",
        "property",
        "Changed photos",
        ResourceRef::new("prop123", "Luxury Villa in Beverly Hills"),
    );

    let now = chrono::Utc::now();
    let filters = vec![
        ActivityFilter::default(),
        ActivityFilter::for_actor("user1"),
        ActivityFilter::security_only(),
        ActivityFilter {
            resource_type: Some("property".to_string()),
            category: Some(Category::DataChange),
            ..Default::default()
        },
        ActivityFilter {
            start_date: Some(now - chrono::Duration::hours(10)),
            end_date: Some(now),
            severity: Some(Severity::Warning),
            ..Default::default()
        },
        ActivityFilter {
            action: Some("failed_login".to_string()),
            actor_id: Some("user4".to_string()),
            ..Default::default()
        },
        ActivityFilter {
            actor_id: Some("nobody".to_string()),
            ..Default::default()
        },
    ];

    let all = store.query(None);
    for filter in &filters {
        let got = store.query(Some(filter));
        let expected: Vec<LogEntry> = all.iter().filter(|e| satisfies(e, filter)).cloned().collect();
        assert_eq!(got, expected, "filter {filter:?}");
    }
}

#[test]
fn e2e_impossible_filter_yields_empty() {
    let store = seeded();
    let filter = ActivityFilter {
        start_date: Some(parse_date_bound("2030-01-01", false).unwrap()),
        end_date: Some(parse_date_bound("2020-01-01", true).unwrap()),
        ..Default::default()
    };
    assert!(store.query(Some(&filter)).is_empty());
}

#[test]
fn e2e_query_by_actor_limit_one() {
    let mut store = ActivityLogStore::new();
    for details in ["oldest", "middle", "newest"] {
        store.record(NewLogEntry::new("user1", "John Doe", "admin", "viewed", "property", details));
    }
    store.record(NewLogEntry::new("user2", "Jane Smith", "agent", "viewed", "property", "other"));

    let got = store.query_by_actor("user1", Some(1));
    assert_eq!(got.len(), 1);
    assert_eq!(got[0].details, "newest");
}

#[test]
fn e2e_text_search_matches_viewer_search_box() {
    let store = seeded();
    let mut filter = ActivityFilter::default();
    filter.set_text("beverly");
    let got = store.query(Some(&filter));
    assert_eq!(got.len(), 1);
    assert_eq!(got[0].action, "created");
}

// =============================================================================
// Statistics
// =============================================================================

#[test]
fn e2e_statistics_sums_are_consistent() {
    let mut store = seeded();
    helpers::log_user_action(
        &mut store,
        &admin(),
        "exported",
        "report",
        "Monthly report",
        ResourceRef::default(),
    );
    let stats = store.statistics();
    assert_eq!(stats.total_logs, store.len());
    assert_eq!(stats.by_severity.values().sum::<usize>(), stats.total_logs);
    assert_eq!(stats.by_category.values().sum::<usize>(), stats.total_logs);
    assert_eq!(stats.by_actor.values().sum::<usize>(), stats.total_logs);
    assert_eq!(stats.by_resource.values().sum::<usize>(), stats.total_logs);
}

#[test]
fn e2e_critical_security_event_moves_only_critical() {
    let mut store = seeded();
    let before = store.statistics();
    helpers::log_security_event(
        &mut store,
        &admin(),
        "privilege_escalation",
        "Unexpected role change",
        Some(Severity::Critical),
    );
    let after = store.statistics();

    assert_eq!(
        after.severity_count(Severity::Critical),
        before.severity_count(Severity::Critical) + 1
    );
    for severity in [Severity::Info, Severity::Warning, Severity::Error] {
        assert_eq!(after.severity_count(severity), before.severity_count(severity));
    }
}

// =============================================================================
// Recent window
// =============================================================================

#[test]
fn e2e_recent_since_one_hour_includes_new_entry() {
    let mut store = seeded();
    let id = helpers::log_access_control(&mut store, &admin(), "login", "just now")
        .id
        .clone();
    let recent = store.recent_since(1);
    assert!(recent.iter().any(|e| e.id == id));
    // The seed's newest entry is two hours old.
    assert_eq!(recent.len(), 1);
}

// =============================================================================
// CSV export
// =============================================================================

#[test]
fn e2e_csv_row_count_and_naive_round_trip() {
    let store = seeded();
    let filter = ActivityFilter::for_actor("user1");
    let entries = store.query(Some(&filter));
    let csv = store.export_csv(Some(&filter));

    let rows = naive_parse(&csv);
    assert_eq!(rows.len(), entries.len() + 1);
    assert_eq!(
        rows[0],
        vec!["Timestamp", "User", "Role", "Action", "Resource", "Details", "Severity", "Category"]
    );

    for (row, entry) in rows[1..].iter().zip(&entries) {
        let ts = chrono::DateTime::parse_from_rfc3339(&row[0]).unwrap();
        assert_eq!(ts.timestamp_millis(), entry.timestamp.timestamp_millis());
        assert_eq!(row[1], entry.actor_name);
        assert_eq!(row[2], entry.actor_role);
        assert_eq!(row[3], entry.action);
        assert_eq!(row[4], entry.resource_type);
        assert_eq!(row[5], entry.details);
        assert_eq!(row[6], entry.severity.to_string());
        assert_eq!(row[7], entry.category.to_string());
    }
}

#[test]
fn e2e_csv_parses_with_csv_reader_even_with_quotes() {
    let mut store = ActivityLogStore::new();
    store.record(NewLogEntry::new(
        "user3",
        "Mike Johnson",
        "developer",
        "updated",
        "blog_post",
        r#"Retitled post to "Spring, 2025""#,
    ));
    let csv = store.export_csv(None);

    let mut reader = csv::Reader::from_reader(csv.as_bytes());
    let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 1);
    assert_eq!(&records[0][5], r#"Retitled post to "Spring, 2025""#);
}

#[test]
fn e2e_export_writes_named_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = seeded();
    let csv = store.export_csv(None);

    let name = export_file_name(store.now().date_naive(), ExportFormat::Csv);
    assert!(name.starts_with("activity-logs-") && name.ends_with(".csv"));

    let path = dir.path().join(&name);
    write_atomic(&path, csv.as_bytes()).unwrap();

    let written = fs::read_to_string(&path).unwrap();
    assert_eq!(written, csv);
    assert_eq!(written.lines().count(), store.len() + 1);
}

// =============================================================================
// Shared handle
// =============================================================================

#[test]
fn e2e_shared_handle_matches_store_semantics() {
    let log = ActivityLog::new(seeded());
    let writer = log.clone();
    std::thread::spawn(move || {
        writer.record(
            NewLogEntry::new("system", "System", "system", "backup_failed", "database", "Disk full")
                .with_severity(Severity::Error)
                .with_category(Category::SystemEvent),
        );
    })
    .join()
    .unwrap();

    assert_eq!(log.len(), seed_count() + 1);
    assert_eq!(log.query_by_severity(Severity::Error, None).len(), 1);
    assert_eq!(log.query_by_category(Category::SystemEvent, None).len(), 2);
    assert_eq!(log.query_by_resource("database", None, Some(1))[0].action, "backup_failed");
}

// =============================================================================
// Config
// =============================================================================

#[test]
fn e2e_missing_config_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let (config, warnings) = load_config(&dir.path().join("config.toml"));
    assert!(warnings.is_empty());
    assert!(config.seed);
    assert_eq!(config.recent_hours, 24);
}

#[test]
fn e2e_config_file_loaded_and_validated() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        "[store]\nseed = false\n[query]\nrecent_hours = 100000\n[export]\ndirectory = \"out\"\n",
    )
    .unwrap();

    let (config, warnings) = load_config(&path);
    assert!(!config.seed);
    assert_eq!(config.recent_hours, 24, "out-of-range value falls back");
    assert_eq!(warnings.len(), 1);
    assert_eq!(config.export_dir.as_deref(), Some(std::path::Path::new("out")));
}

#[test]
fn e2e_unparseable_config_warns_and_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "this is = = not toml").unwrap();

    let (config, warnings) = load_config(&path);
    assert_eq!(warnings.len(), 1);
    assert!(config.seed);
}
