//! Size-rotated log file for the `--log-file` layer.
//!
//! The active file is `<path>`; rotated files are `<path>.1` (newest) up to
//! `<path>.<backups>` (oldest). Older files are deleted.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;

use file_rotate::compression::Compression;
use file_rotate::suffix::AppendCount;
use file_rotate::{ContentLimit, FileRotate};

/// Log file used when `--log-file` is not given
pub const DEFAULT_LOG_FILE: &str = "logs/annotation.log";

/// Rotate once the active file passes 5 MiB
pub const LOG_MAX_BYTES: usize = 5 * 1024 * 1024;

/// Rotated files kept next to the active one
pub const LOG_BACKUPS: usize = 3;

/// Open `path` for appending, rotating after `max_bytes` and keeping `backups` old files.
///
/// Missing parent directories are created.
///
/// # Errors
///
/// Returns `std::io::Error` if the directory cannot be created or the file cannot
/// be opened for writing.
pub fn rotating_log(
    path: &Path,
    max_bytes: usize,
    backups: usize,
) -> io::Result<FileRotate<AppendCount>> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    // Surface permission problems here rather than losing log lines later
    OpenOptions::new().create(true).append(true).open(path)?;

    Ok(FileRotate::new(
        path,
        AppendCount::new(backups),
        ContentLimit::BytesSurpassed(max_bytes),
        Compression::None,
        #[cfg(unix)]
        None,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_rotates_past_size_limit() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("logs").join("run.log");

        let mut log = rotating_log(&path, 100, 2).unwrap();
        for i in 0..20 {
            let line = format!("line {i:02} of the annotation log, padded out\n");
            log.write_all(line.as_bytes()).unwrap();
        }
        log.flush().unwrap();
        drop(log);

        let rotated = |n: usize| dir.path().join("logs").join(format!("run.log.{n}"));
        assert!(path.exists());
        assert!(rotated(1).exists());
        assert!(rotated(2).exists());
        assert!(!rotated(3).exists());

        // Newest lines stay in the active file
        let active = fs::read_to_string(&path).unwrap();
        assert!(fs::metadata(rotated(1)).unwrap().len() > 100);
        assert!(active.is_empty() || active.contains("line 19"));
    }

    #[test]
    fn test_small_log_is_not_rotated() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("run.log");

        let mut log = rotating_log(&path, LOG_MAX_BYTES, LOG_BACKUPS).unwrap();
        log.write_all(b"Processing complete\n").unwrap();
        log.flush().unwrap();
        drop(log);

        assert_eq!(fs::read_to_string(&path).unwrap(), "Processing complete\n");
        assert!(!dir.path().join("run.log.1").exists());
    }

    #[test]
    fn test_unwritable_log_path() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "").unwrap();

        assert!(rotating_log(&blocker.join("run.log"), LOG_MAX_BYTES, LOG_BACKUPS).is_err());
    }
}
