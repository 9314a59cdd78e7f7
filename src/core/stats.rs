// EstateActivity - core/stats.rs
//
// Aggregate statistics over a set of entries, computed in one pass.

use crate::core::model::{Category, LogEntry, Severity};
use serde::Serialize;
use std::collections::BTreeMap;

/// Counts over the whole store.
///
/// `by_severity` and `by_category` always carry every variant (zero when
/// unused), so their values each sum to `total_logs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityStatistics {
    pub total_logs: usize,
    #[serde(rename = "logsBySeverity")]
    pub by_severity: BTreeMap<Severity, usize>,
    #[serde(rename = "logsByCategory")]
    pub by_category: BTreeMap<Category, usize>,
    /// Keyed by actor display name.
    #[serde(rename = "logsByUser")]
    pub by_actor: BTreeMap<String, usize>,
    #[serde(rename = "logsByResource")]
    pub by_resource: BTreeMap<String, usize>,
}

impl ActivityStatistics {
    fn zeroed() -> Self {
        Self {
            total_logs: 0,
            by_severity: Severity::all().iter().map(|s| (*s, 0)).collect(),
            by_category: Category::all().iter().map(|c| (*c, 0)).collect(),
            by_actor: BTreeMap::new(),
            by_resource: BTreeMap::new(),
        }
    }

    pub fn severity_count(&self, severity: Severity) -> usize {
        self.by_severity.get(&severity).copied().unwrap_or(0)
    }

    pub fn category_count(&self, category: Category) -> usize {
        self.by_category.get(&category).copied().unwrap_or(0)
    }
}

/// Compute statistics with a single scan of `entries`.
pub fn compute<'a, I>(entries: I) -> ActivityStatistics
where
    I: IntoIterator<Item = &'a LogEntry>,
{
    let mut stats = ActivityStatistics::zeroed();

    for entry in entries {
        stats.total_logs += 1;
        *stats.by_severity.entry(entry.severity).or_insert(0) += 1;
        *stats.by_category.entry(entry.category).or_insert(0) += 1;
        *stats.by_actor.entry(entry.actor_name.clone()).or_insert(0) += 1;
        *stats
            .by_resource
            .entry(entry.resource_type.clone())
            .or_insert(0) += 1;
    }

    stats
}
