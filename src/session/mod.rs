//! Per-run session state: configuration, log and the session record.

mod config;
mod log;
mod paths;

pub use config::{Config, ConfigError};
pub use log::{
    ConsoleSink, Entry, FileSink, LOG_TARGET, Level, LogError, LogSink, MemorySink, SessionLog,
    banner,
};
pub use paths::{get_config_dir, get_config_path, get_log_path};

use std::path::{Path, PathBuf};

use crate::sync::{DeletionReport, delete_entity};

/// State of a single run, owned by whichever frontend drives it.
pub struct Session {
    pub source: String,
    pub destination: String,
    pub options: Vec<String>,
    pub deletions: Vec<PathBuf>,
    pub deleted: usize,
    pub log: SessionLog,
}

impl Session {
    pub fn new(log: SessionLog) -> Self {
        Self {
            source: String::new(),
            destination: String::new(),
            options: Vec::new(),
            deletions: Vec::new(),
            deleted: 0,
            log,
        }
    }

    pub fn source_path(&self) -> &Path {
        Path::new(&self.source)
    }

    pub fn destination_path(&self) -> &Path {
        Path::new(&self.destination)
    }

    /// Absolute location of a deletion candidate under the destination.
    pub fn candidate_path(&self, candidate: &Path) -> PathBuf {
        self.destination_path().join(candidate)
    }

    /// Delete the given candidates, attempting every one.
    ///
    /// Failures are logged and skipped; `deleted` counts successes only.
    pub fn delete_confirmed<P: AsRef<Path>>(&mut self, candidates: &[P]) -> DeletionReport {
        self.deleted = 0;
        let mut report = DeletionReport::default();

        for candidate in candidates {
            let path = self.candidate_path(candidate.as_ref());
            match delete_entity(&path) {
                Ok(kind) => {
                    self.deleted += 1;
                    tracing::debug!(path = %path.display(), %kind, "deleted");
                    self.log.info(format!("{} deleted.", path.display()));
                    report.deleted.push(path);
                }
                Err(e) => {
                    self.log
                        .error_detail(format!("Error while deleting {}!", path.display()), &e);
                    report.failed.push(path);
                }
            }
        }

        self.log.success(format!("{} entities deleted.", self.deleted));
        report
    }
}
