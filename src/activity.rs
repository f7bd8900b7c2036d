//! Append-only, timestamped activity log
//!
//! Records refresh events, fetch failures and write summaries in a plain
//! text file so an interrupted export can be audited afterwards.

use chrono::{SecondsFormat, Utc};
use log::warn;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Plain-text log file; a disabled log discards every entry
#[derive(Debug, Clone, Default)]
pub struct ActivityLog {
    path: Option<PathBuf>,
}

impl ActivityLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Log that records nothing (tests, dry runs)
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Append one entry. Failures are reported and otherwise ignored.
    pub fn record(&self, message: impl AsRef<str>) {
        let Some(path) = &self.path else {
            return;
        };

        let entry = format_entry(message.as_ref());
        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .and_then(|mut file| file.write_all(entry.as_bytes()));

        if let Err(e) = result {
            warn!("Could not append to log file {}: {}", path.display(), e);
        }
    }
}

fn format_entry(message: &str) -> String {
    format!(
        "{}: {}\n\n",
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        message
    )
}
