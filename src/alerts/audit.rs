use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use file_rotate::{compression::Compression, suffix::AppendCount, ContentLimit, FileRotate};

const AUDIT_FILE_NAME: &str = "alerts.log";

/// Append-only audit trail of every evaluation that found an open condition,
/// written regardless of whether a notification is due. Append failures are
/// logged and swallowed; the trail must never take a pass down with it.
pub struct AuditLog {
    path: PathBuf,
    max_file_size_bytes: u64,
    retention_files: usize,
}

impl AuditLog {
    pub fn new(dir: impl AsRef<Path>, max_file_size_bytes: u64, retention_files: usize) -> Self {
        Self {
            path: dir.as_ref().join(AUDIT_FILE_NAME),
            max_file_size_bytes,
            retention_files,
        }
    }

    pub fn append(&self, server: &str, hostname: &str, message: &str, now: DateTime<Utc>) {
        let line = format!(
            "[{}] {} ({}): {}\n",
            now.format("%Y-%m-%d %H:%M:%S"),
            server,
            hostname,
            message
        );

        if let Err(error) = self.write_line(&line) {
            log::warn!("audit_append_failed path={} error={}", self.path.display(), error);
        }
    }

    fn write_line(&self, line: &str) -> Result<(), std::io::Error> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let max_bytes = usize::try_from(self.max_file_size_bytes).unwrap_or(usize::MAX);
        let mut writer = FileRotate::new(
            &self.path,
            AppendCount::new(self.retention_files),
            ContentLimit::BytesSurpassed(max_bytes),
            Compression::None,
            None,
        );
        writer.write_all(line.as_bytes())?;
        Ok(())
    }
}
