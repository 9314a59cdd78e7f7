// EstateActivity - app/store.rs
//
// The activity log store: an append-only, newest-first sequence of entries
// with filter, aggregate and export queries over it.
// Owned by the composition root (main) and passed by reference; see
// app::shared for the cross-thread handle.

use crate::core::export;
use crate::core::filter::{apply_filters, effective_limit, ActivityFilter};
use crate::core::model::{Category, LogEntry, NewLogEntry, Severity};
use crate::core::seed;
use crate::core::stats::{self, ActivityStatistics};
use crate::util::error::ExportError;
use chrono::{DateTime, Duration, Utc};
use std::collections::{HashSet, VecDeque};
use std::io::Write;
use std::path::Path;
use uuid::Uuid;

/// Source of the current time. Swappable so tests can pin the clock.
pub type Clock = fn() -> DateTime<Utc>;

/// In-memory activity log.
///
/// Entries are held newest-first: `record` pushes to the front, so every
/// query result is already in display order without sorting.
#[derive(Debug)]
pub struct ActivityLogStore {
    entries: VecDeque<LogEntry>,

    /// Ids handed out so far, including seed ids.
    ids: HashSet<String>,

    clock: Clock,
}

impl Default for ActivityLogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ActivityLogStore {
    /// Create an empty store using the system clock.
    pub fn new() -> Self {
        Self::with_clock(Utc::now)
    }

    /// Create an empty store that reads time from `clock`.
    pub fn with_clock(clock: Clock) -> Self {
        Self {
            entries: VecDeque::new(),
            ids: HashSet::new(),
            clock,
        }
    }

    /// Create a store pre-filled with the site's demo audit trail.
    pub fn with_default_seed() -> Self {
        let mut store = Self::new();
        let now = (store.clock)();
        store.seed(seed::default_entries(now));
        store
    }

    /// Load initial entries. Intended to run once, right after construction.
    ///
    /// Seed entries are placed behind anything already recorded, ordered
    /// newest-first by timestamp. An entry whose id is already present is
    /// skipped so ids stay unique. Returns the number of entries added.
    pub fn seed(&mut self, mut entries: Vec<LogEntry>) -> usize {
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        let mut added = 0;
        for entry in entries {
            if !self.ids.insert(entry.id.clone()) {
                tracing::warn!(id = %entry.id, "Skipping seed entry with duplicate id");
                continue;
            }
            self.entries.push_back(entry);
            added += 1;
        }

        tracing::debug!(added, total = self.entries.len(), "Store seeded");
        added
    }

    /// Record a new entry.
    ///
    /// Assigns a fresh id and the current time and makes the entry the
    /// newest one. Never fails.
    pub fn record(&mut self, new: NewLogEntry) -> &LogEntry {
        let id = self.next_id();
        let entry = LogEntry::from_new(new, id, (self.clock)());

        tracing::debug!(
            id = %entry.id,
            actor = %entry.actor_id,
            action = %entry.action,
            resource = %entry.resource_type,
            severity = %entry.severity,
            category = %entry.category,
            "Activity recorded"
        );

        self.entries.push_front(entry);
        &self.entries[0]
    }

    fn next_id(&mut self) -> String {
        loop {
            let candidate = Uuid::new_v4().to_string();
            if self.ids.insert(candidate.clone()) {
                return candidate;
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries, newest first.
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    /// Current time according to the store's clock.
    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Entries matching every criterion of `filter`, newest first.
    /// `None` returns everything.
    pub fn query(&self, filter: Option<&ActivityFilter>) -> Vec<LogEntry> {
        let result: Vec<LogEntry> = match filter {
            Some(f) => apply_filters(&self.entries, f)
                .into_iter()
                .cloned()
                .collect(),
            None => self.entries.iter().cloned().collect(),
        };
        tracing::debug!(matched = result.len(), total = self.entries.len(), "Query");
        result
    }

    /// Entries by one actor, newest first, optionally truncated.
    pub fn query_by_actor(&self, actor_id: &str, limit: Option<usize>) -> Vec<LogEntry> {
        self.project(|e| e.actor_id == actor_id, limit)
    }

    /// Entries on one resource type, optionally narrowed to a resource id.
    /// An empty resource id does not narrow.
    pub fn query_by_resource(
        &self,
        resource_type: &str,
        resource_id: Option<&str>,
        limit: Option<usize>,
    ) -> Vec<LogEntry> {
        self.project(
            |e| {
                e.resource_type == resource_type
                    && resource_id
                        .filter(|id| !id.is_empty())
                        .map_or(true, |id| e.resource_id.as_deref() == Some(id))
            },
            limit,
        )
    }

    pub fn query_by_severity(&self, severity: Severity, limit: Option<usize>) -> Vec<LogEntry> {
        self.project(|e| e.severity == severity, limit)
    }

    pub fn query_by_category(&self, category: Category, limit: Option<usize>) -> Vec<LogEntry> {
        self.project(|e| e.category == category, limit)
    }

    /// Single-predicate projection. A limit of `None` or `Some(0)` keeps every
    /// match; otherwise only the first `n` (newest) are returned.
    fn project<P>(&self, predicate: P, limit: Option<usize>) -> Vec<LogEntry>
    where
        P: Fn(&LogEntry) -> bool,
    {
        let take = effective_limit(limit).unwrap_or(usize::MAX);
        self.entries
            .iter()
            .filter(|e| predicate(e))
            .take(take)
            .cloned()
            .collect()
    }

    /// Entries recorded within the last `hours` hours.
    ///
    /// The cutoff is inclusive: an entry stamped exactly `now - hours` is kept.
    /// A window reaching past the earliest representable time keeps everything.
    pub fn recent_since(&self, hours: u32) -> Vec<LogEntry> {
        let cutoff = self
            .now()
            .checked_sub_signed(Duration::hours(i64::from(hours)))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        // Timestamps are not guaranteed monotonic; scan everything.
        self.entries
            .iter()
            .filter(|e| e.timestamp >= cutoff)
            .cloned()
            .collect()
    }

    /// Aggregate counts over the whole store.
    pub fn statistics(&self) -> ActivityStatistics {
        stats::compute(&self.entries)
    }

    /// Filtered entries rendered as CSV text (header line first).
    pub fn export_csv(&self, filter: Option<&ActivityFilter>) -> String {
        let entries = self.query(filter);
        tracing::debug!(rows = entries.len(), "CSV export rendered");
        export::to_csv_string(&entries)
    }

    /// Filtered entries written to `writer` as a pretty JSON array.
    pub fn export_json<W: Write>(
        &self,
        filter: Option<&ActivityFilter>,
        writer: W,
        export_path: &Path,
    ) -> Result<usize, ExportError> {
        let entries = self.query(filter);
        export::export_json(&entries, writer, export_path)
    }
}
