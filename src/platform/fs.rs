// EstateActivity - platform/fs.rs
//
// Filesystem helpers for writing export files.

use crate::util::error::ActivityLogError;
use std::path::Path;

/// Write `bytes` to `path` atomically (write temp, then rename).
///
/// Creates all parent directories as needed. A crash between write and
/// rename loses the new file but never leaves a truncated one at `path`.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), ActivityLogError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| ActivityLogError::Io {
                path: parent.to_path_buf(),
                operation: "create directory",
                source: e,
            })?;
        }
    }

    let mut tmp_name = path.as_os_str().to_os_string();
    tmp_name.push(".tmp");
    let tmp = std::path::PathBuf::from(tmp_name);

    std::fs::write(&tmp, bytes).map_err(|e| ActivityLogError::Io {
        path: tmp.clone(),
        operation: "write",
        source: e,
    })?;

    std::fs::rename(&tmp, path).map_err(|e| {
        // Clean up the temp file on failure; ignore any secondary error.
        let _ = std::fs::remove_file(&tmp);
        ActivityLogError::Io {
            path: path.to_path_buf(),
            operation: "rename",
            source: e,
        }
    })?;

    tracing::debug!(path = %path.display(), bytes = bytes.len(), "File written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_atomic_creates_parents_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.csv");

        write_atomic(&path, b"first").unwrap();
        write_atomic(&path, b"second").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
        assert!(!dir.path().join("nested").join("out.csv.tmp").exists());
    }

    #[test]
    fn test_write_atomic_reports_path_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should go makes the rename fail.
        let path = dir.path().join("taken");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("child"), b"x").unwrap();

        let err = write_atomic(&path, b"data").unwrap_err();
        assert!(matches!(err, ActivityLogError::Io { .. }));
    }
}
