//! Session log fan-out.
//!
//! Every user-facing message goes through [`SessionLog`], which hands it to
//! each registered [`LogSink`] (terminal, log file, UI console pane) and
//! mirrors it to `tracing`.

use chrono::{DateTime, Local};
use miette::Diagnostic;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// `tracing` target of mirrored session log entries.
pub const LOG_TARGET: &str = "session_log";

/// Errors that can occur while opening the session log.
#[derive(Error, Diagnostic, Debug)]
pub enum LogError {
    #[error("Error while creating session log {}: {source}", path.display())]
    #[diagnostic(
        code(arxive::session::log::open),
        help("Check that the installation directory is writable, or pass --log <path>.")
    )]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Severity of a log entry, also used to colour the UI console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warning,
    Error,
}

impl Level {
    /// Classify a free-form line (e.g. rsync output) by keyword.
    pub fn classify(message: &str) -> Self {
        let lower = message.to_lowercase();
        if lower.contains("error") {
            Level::Error
        } else if lower.contains("warning") {
            Level::Warning
        } else if ["finished", "deleted.", "saved", "success"]
            .iter()
            .any(|k| lower.contains(k))
        {
            Level::Success
        } else {
            Level::Info
        }
    }
}

/// One logged message with optional detail (error text or exit code).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub level: Level,
    pub message: String,
    pub detail: Option<String>,
}

impl Entry {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl fmt::Display) -> Self {
        self.detail = Some(detail.to_string());
        self
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "{} - {}", self.message, detail),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Destination for session log entries.
pub trait LogSink: Send {
    fn write(&mut self, entry: &Entry);
}

/// Prints messages to the terminal; errors and warnings go to stderr.
///
/// Details are kept for the file log only.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl LogSink for ConsoleSink {
    fn write(&mut self, entry: &Entry) {
        match entry.level {
            Level::Error | Level::Warning => eprintln!("{}", entry.message),
            Level::Info | Level::Success => println!("{}", entry.message),
        }
    }
}

/// Appends entries to the session log file.
pub struct FileSink {
    path: PathBuf,
    file: File,
}

impl FileSink {
    /// Open (or create) the log at `path` and write the run banner.
    pub fn open(path: &Path) -> Result<Self, LogError> {
        Self::open_at(path, Local::now())
    }

    pub(crate) fn open_at(path: &Path, now: DateTime<Local>) -> Result<Self, LogError> {
        let open_err = |source| LogError::Open {
            path: path.to_path_buf(),
            source,
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(open_err)?;
        file.write_all(banner(now).as_bytes()).map_err(open_err)?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }
}

impl LogSink for FileSink {
    fn write(&mut self, entry: &Entry) {
        if let Err(e) = writeln!(self.file, "{}", entry) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to write session log");
        }
    }
}

/// Banner written at the start of every run.
pub fn banner(now: DateTime<Local>) -> String {
    let rule = "=".repeat(45);
    format!(
        "{rule}\narXive session log -- {}\n{rule}\n",
        now.format("%Y %b %d. - %X")
    )
}

/// In-memory sink; clones share the same buffer.
///
/// Used as the UI console pane and in tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    entries: Arc<Mutex<Vec<Entry>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<Entry> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.entries().into_iter().map(|e| e.message).collect()
    }
}

impl LogSink for MemorySink {
    fn write(&mut self, entry: &Entry) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(entry.clone());
        }
    }
}

/// The session log: fans entries out to every sink.
#[derive(Default)]
pub struct SessionLog {
    sinks: Vec<Box<dyn LogSink>>,
}

impl SessionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sink(mut self, sink: impl LogSink + 'static) -> Self {
        self.add_sink(sink);
        self
    }

    pub fn add_sink(&mut self, sink: impl LogSink + 'static) {
        self.sinks.push(Box::new(sink));
    }

    pub fn log(&mut self, entry: Entry) {
        let detail = entry.detail.as_deref();
        match entry.level {
            Level::Error => tracing::error!(target: LOG_TARGET, detail, "{}", entry.message),
            Level::Warning => tracing::warn!(target: LOG_TARGET, detail, "{}", entry.message),
            Level::Info | Level::Success => {
                tracing::info!(target: LOG_TARGET, detail, "{}", entry.message)
            }
        }
        for sink in &mut self.sinks {
            sink.write(&entry);
        }
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.log(Entry::new(Level::Info, message));
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.log(Entry::new(Level::Success, message));
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.log(Entry::new(Level::Warning, message));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.log(Entry::new(Level::Error, message));
    }

    /// Log an error annotated with an error value or exit code.
    pub fn error_detail(&mut self, message: impl Into<String>, detail: impl fmt::Display) {
        self.log(Entry::new(Level::Error, message).with_detail(detail));
    }
}
