// EstateActivity - core/export.rs
//
// CSV and JSON export of filtered activity entries.
// Core layer: writes to any Write trait object; the in-memory CSV rendering
// used by the store never fails.

use crate::core::model::LogEntry;
use crate::util::constants;
use crate::util::error::ExportError;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use std::io::Write;
use std::path::Path;

/// Output format of an export file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => constants::CSV_MIME_TYPE,
            ExportFormat::Json => constants::JSON_MIME_TYPE,
        }
    }
}

/// Download file name for an export made on `date`:
/// `activity-logs-<YYYY-MM-DD>.<ext>`.
pub fn export_file_name(date: NaiveDate, format: ExportFormat) -> String {
    format!(
        "{}-{}.{}",
        constants::EXPORT_FILE_PREFIX,
        date.format("%Y-%m-%d"),
        format.extension()
    )
}

/// Canonical sortable timestamp text: RFC 3339, UTC, millisecond precision,
/// `Z` suffix (e.g. `2024-06-01T09:30:00.000Z`).
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Export entries to CSV.
///
/// Columns: Timestamp, User, Role, Action, Resource, Details, Severity,
/// Category. Every field is wrapped in double quotes; a quote inside a field
/// is doubled so the file stays parseable. Each record ends with `\n`.
///
/// Returns the number of data rows written.
pub fn write_csv<W: Write>(
    entries: &[LogEntry],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    let csv_err = |e: csv::Error| ExportError::Csv {
        path: export_path.to_path_buf(),
        source: e,
    };

    csv_writer
        .write_record(constants::CSV_HEADERS)
        .map_err(csv_err)?;

    let mut count = 0;
    for entry in entries {
        let ts = format_timestamp(&entry.timestamp);
        csv_writer
            .write_record([
                ts.as_str(),
                entry.actor_name.as_str(),
                entry.actor_role.as_str(),
                entry.action.as_str(),
                entry.resource_type.as_str(),
                entry.details.as_str(),
                entry.severity.as_str(),
                entry.category.as_str(),
            ])
            .map_err(csv_err)?;
        count += 1;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    Ok(count)
}

/// Render entries as CSV text: header line plus one line per entry, lines
/// joined by `\n` with no trailing newline. An empty slice yields the header
/// alone.
pub fn to_csv_string(entries: &[LogEntry]) -> String {
    let mut buf = Vec::new();
    if let Err(e) = write_csv(entries, &mut buf, Path::new("<memory>")) {
        // Vec<u8> never reports I/O errors; whatever was written is kept.
        tracing::error!(error = %e, "In-memory CSV rendering failed");
    }
    let mut text = String::from_utf8_lossy(&buf).into_owned();
    if text.ends_with('\n') {
        text.pop();
    }
    text
}

/// Export entries to JSON format (pretty-printed array of objects).
pub fn export_json<W: Write>(
    entries: &[LogEntry],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    serde_json::to_writer_pretty(writer, entries).map_err(|e| ExportError::Json {
        path: export_path.to_path_buf(),
        source: e,
    })?;
    Ok(entries.len())
}
