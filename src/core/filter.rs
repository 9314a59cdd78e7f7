// EstateActivity - core/filter.rs
//
// Composable filter over activity log entries.
// Every present field is AND-combined; an absent field imposes no constraint.
// Core layer: pure logic, no I/O.

use crate::core::model::{Category, LogEntry, Severity};
use crate::util::constants;
use crate::util::error::FilterError;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use regex::Regex;

/// Filter criteria for a store query. All fields are AND-combined.
///
/// Values are compared as given: an actor id or action nobody used simply
/// matches nothing. An empty string imposes no constraint, the same as `None`
/// (a viewer's "All" choice arrives as `""`).
#[derive(Debug, Clone, Default)]
pub struct ActivityFilter {
    /// Lower time bound (inclusive).
    pub start_date: Option<DateTime<Utc>>,

    /// Upper time bound (inclusive).
    pub end_date: Option<DateTime<Utc>>,

    /// Exact actor id.
    pub actor_id: Option<String>,

    /// Exact action tag.
    pub action: Option<String>,

    /// Exact resource type.
    pub resource_type: Option<String>,

    pub severity: Option<Severity>,
    pub category: Option<Category>,

    /// Case-insensitive substring searched in actor name, action, resource
    /// type, details and resource name.
    pub text: Option<String>,

    /// Compiled regex matched against `details`.
    pub pattern: Option<Regex>,
}

impl ActivityFilter {
    /// Returns true if no criteria are set.
    pub fn is_empty(&self) -> bool {
        self.start_date.is_none()
            && self.end_date.is_none()
            && constraint(&self.actor_id).is_none()
            && constraint(&self.action).is_none()
            && constraint(&self.resource_type).is_none()
            && self.severity.is_none()
            && self.category.is_none()
            && self.text.is_none()
            && self.pattern.is_none()
    }

    /// Set the details regex, compiling it. An empty pattern clears it.
    pub fn set_pattern(&mut self, pattern: &str) -> Result<(), FilterError> {
        if pattern.is_empty() {
            self.pattern = None;
            return Ok(());
        }
        if pattern.len() > constants::MAX_REGEX_PATTERN_LENGTH {
            return Err(FilterError::RegexTooLong {
                length: pattern.len(),
                max_length: constants::MAX_REGEX_PATTERN_LENGTH,
            });
        }
        let regex = Regex::new(pattern).map_err(|e| FilterError::InvalidRegex {
            pattern: pattern.to_string(),
            source: e,
        })?;
        self.pattern = Some(regex);
        Ok(())
    }

    /// Set the free-text search. Blank input clears it.
    pub fn set_text(&mut self, text: &str) {
        let trimmed = text.trim();
        self.text = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
    }

    /// Quick filter: security events only.
    pub fn security_only() -> Self {
        Self {
            category: Some(Category::Security),
            ..Default::default()
        }
    }

    /// Quick filter: everything one actor did.
    pub fn for_actor(actor_id: impl Into<String>) -> Self {
        Self {
            actor_id: Some(actor_id.into()),
            ..Default::default()
        }
    }
}

/// Apply a filter to a sequence of entries, returning the matching ones.
///
/// Input order is preserved, so a newest-first sequence yields a newest-first
/// result. The entries themselves are only borrowed.
pub fn apply_filters<'a, I>(entries: I, filter: &ActivityFilter) -> Vec<&'a LogEntry>
where
    I: IntoIterator<Item = &'a LogEntry>,
{
    if filter.is_empty() {
        return entries.into_iter().collect();
    }

    let text_lower = filter.text.as_deref().map(str::to_lowercase);

    entries
        .into_iter()
        .filter(|entry| matches_all(entry, filter, text_lower.as_deref()))
        .collect()
}

/// Check a single entry against every present criterion.
fn matches_all(entry: &LogEntry, filter: &ActivityFilter, text_lower: Option<&str>) -> bool {
    if let Some(ref start) = filter.start_date {
        if entry.timestamp < *start {
            return false;
        }
    }
    if let Some(ref end) = filter.end_date {
        if entry.timestamp > *end {
            return false;
        }
    }

    if let Some(actor_id) = constraint(&filter.actor_id) {
        if entry.actor_id != actor_id {
            return false;
        }
    }
    if let Some(action) = constraint(&filter.action) {
        if entry.action != action {
            return false;
        }
    }
    if let Some(resource_type) = constraint(&filter.resource_type) {
        if entry.resource_type != resource_type {
            return false;
        }
    }
    if let Some(severity) = filter.severity {
        if entry.severity != severity {
            return false;
        }
    }
    if let Some(category) = filter.category {
        if entry.category != category {
            return false;
        }
    }

    if let Some(needle) = text_lower {
        if !matches_text(entry, needle) {
            return false;
        }
    }

    if let Some(ref regex) = filter.pattern {
        if !regex.is_match(&entry.details) {
            return false;
        }
    }

    true
}

/// A string criterion that actually constrains: present and non-empty.
fn constraint(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Row cap actually applied for a requested limit. `None` and `Some(0)` both
/// mean unlimited.
pub fn effective_limit(limit: Option<usize>) -> Option<usize> {
    limit.filter(|&n| n > 0)
}

/// `needle` must already be lowercased.
fn matches_text(entry: &LogEntry, needle: &str) -> bool {
    let hit = |s: &str| s.to_lowercase().contains(needle);
    hit(&entry.actor_name)
        || hit(&entry.action)
        || hit(&entry.resource_type)
        || hit(&entry.details)
        || entry.resource_name.as_deref().is_some_and(hit)
}

/// Parse a date bound typed by a user.
///
/// Accepts RFC 3339 (`2024-05-01T12:00:00Z`) or a plain `YYYY-MM-DD`. A plain
/// date used as an end bound covers the whole day, so both bounds stay
/// inclusive in the way a person reading them would expect.
pub fn parse_date_bound(input: &str, end_of_day: bool) -> Result<DateTime<Utc>, FilterError> {
    let trimmed = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| {
        FilterError::InvalidDate {
            input: input.to_string(),
        }
    })?;
    let time = if end_of_day {
        NaiveTime::from_hms_milli_opt(23, 59, 59, 999)
    } else {
        NaiveTime::from_hms_opt(0, 0, 0)
    }
    .ok_or_else(|| FilterError::InvalidDate {
        input: input.to_string(),
    })?;
    Ok(date.and_time(time).and_utc())
}
