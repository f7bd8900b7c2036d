//! Writes a dataset to its delimited and structured targets

use log::{error, info};
use std::fs;
use std::path::{Path, PathBuf};

use super::json::to_json;
use super::tsv::to_tsv;
use crate::activity::ActivityLog;
use crate::analytics::MergedDataset;
use crate::config::export;

/// File names of one export: final files plus per-page snapshots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportLayout {
    dir: PathBuf,
    name: String,
}

impl ExportLayout {
    pub fn new(dir: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            name: name.into(),
        }
    }

    /// `<dir>/<name>.tsv` and `<dir>/<name>_all.json`
    pub fn targets(&self) -> ExportTargets {
        ExportTargets {
            delimited: self
                .dir
                .join(format!("{}.{}", self.name, export::DELIMITED_EXT)),
            structured: self.dir.join(format!(
                "{}{}.{}",
                self.name,
                export::STRUCTURED_SUFFIX,
                export::STRUCTURED_EXT
            )),
        }
    }

    /// `<dir>/<name>_pages/<name>-<n>.tsv` and `.../<name>_all-<n>.json`
    pub fn page_targets(&self, page: u32) -> ExportTargets {
        let pages_dir = self
            .dir
            .join(format!("{}{}", self.name, export::PAGES_DIR_SUFFIX));
        ExportTargets {
            delimited: pages_dir.join(format!(
                "{}-{}.{}",
                self.name,
                page,
                export::DELIMITED_EXT
            )),
            structured: pages_dir.join(format!(
                "{}{}-{}.{}",
                self.name,
                export::STRUCTURED_SUFFIX,
                page,
                export::STRUCTURED_EXT
            )),
        }
    }
}

/// The two files one dataset is written to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTargets {
    pub delimited: PathBuf,
    pub structured: PathBuf,
}

/// Paths written successfully and paths that failed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteOutcome {
    pub succeeded: Vec<PathBuf>,
    pub failed: Vec<PathBuf>,
}

impl WriteOutcome {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    fn push(&mut self, path: &Path, ok: bool) {
        if ok {
            self.succeeded.push(path.to_path_buf());
        } else {
            self.failed.push(path.to_path_buf());
        }
    }

    /// One-line summary, e.g. `Wrote 2 files [a, b]. 2 passed, 0 failed.`
    pub fn summary(&self) -> String {
        let passed = self.succeeded.len();
        let failed = self.failed.len();
        let failed_list = if failed > 0 {
            format!(" [{}]", join_paths(&self.failed))
        } else {
            String::new()
        };

        format!(
            "Wrote {} file{} [{}]. {} passed, {} failed{}.",
            passed,
            if passed == 1 { "" } else { "s" },
            join_paths(&self.succeeded),
            passed,
            failed,
            failed_list
        )
    }
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Persists a dataset in both formats; each target succeeds or fails on its own
#[derive(Debug, Clone, Default)]
pub struct DualFormatWriter {
    log: ActivityLog,
}

impl DualFormatWriter {
    pub fn new(log: ActivityLog) -> Self {
        Self { log }
    }

    /// Write both targets. Never fails: failures are only reported in the
    /// returned outcome and the activity log.
    pub fn write(&self, dataset: &MergedDataset, targets: &ExportTargets) -> WriteOutcome {
        let mut outcome = WriteOutcome::default();

        let structured = to_json(dataset).map_err(|e| e.to_string());
        outcome.push(
            &targets.structured,
            self.persist(&targets.structured, structured),
        );

        let delimited = Ok(to_tsv(dataset));
        outcome.push(
            &targets.delimited,
            self.persist(&targets.delimited, delimited),
        );

        let summary = outcome.summary();
        info!("{}", summary);
        self.log.record(&summary);
        outcome
    }

    fn persist(&self, path: &Path, content: Result<String, String>) -> bool {
        let result = content.and_then(|text| {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| e.to_string())?;
            }
            fs::write(path, text).map_err(|e| e.to_string())
        });

        match result {
            Ok(()) => true,
            Err(e) => {
                let message = format!("Failed to write {}: {}", path.display(), e);
                error!("{}", message);
                self.log.record(&message);
                false
            }
        }
    }
}
