//! Window controller for the graphical frontend.
//!
//! Holds everything the main window shows (directory fields, the deletion
//! checklist, status bar, console pane) and implements the toolbar and
//! button actions. Toolkit bindings only forward events and render this
//! state. All calls block the caller until rsync returns.

use std::path::{Path, PathBuf};

use crate::session::{Config, ConfigError, Level, MemorySink, Session, SessionLog};
use crate::sync::{
    RsyncOps, format_options_text, list_deletions, validate_options, validate_paths,
};
use crate::workflow::log_output;

/// Colour class of a console line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Normal,
    Success,
    Warning,
    Error,
}

impl From<Level> for Tone {
    fn from(level: Level) -> Self {
        match level {
            Level::Info => Tone::Normal,
            Level::Success => Tone::Success,
            Level::Warning => Tone::Warning,
            Level::Error => Tone::Error,
        }
    }
}

/// A line of the console pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleLine {
    pub text: String,
    pub tone: Tone,
}

/// One row of the deletion checklist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub path: PathBuf,
    pub checked: bool,
}

/// Which directory field a chooser fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryRole {
    Source,
    Destination,
}

impl DirectoryRole {
    fn label(self) -> &'static str {
        match self {
            DirectoryRole::Source => "Source",
            DirectoryRole::Destination => "Destination",
        }
    }
}

/// Contents of the configuration dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigForm {
    pub source: String,
    pub destination: String,
    /// Options as `"--progress, -l"`.
    pub options: String,
}

/// Contents of the about dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AboutInfo {
    pub description: &'static str,
    pub version: &'static str,
    pub link: &'static str,
}

impl AboutInfo {
    pub fn current() -> Self {
        Self {
            description: "arXive: a CLI/GUI frontend for rsync",
            version: env!("CARGO_PKG_VERSION"),
            link: env!("CARGO_PKG_REPOSITORY"),
        }
    }
}

/// State and actions of the main window.
pub struct WindowController<R: RsyncOps> {
    rsync: R,
    session: Session,
    config: Config,
    config_path: PathBuf,
    console: MemorySink,
    candidates: Vec<Candidate>,
    status: String,
    sync_enabled: bool,
    exit_requested: bool,
}

impl<R: RsyncOps> WindowController<R> {
    /// Create the controller; `log` receives the console pane as an
    /// extra sink, so file/terminal sinks added by the caller keep working.
    pub fn new(rsync: R, mut log: SessionLog, config: Config, config_path: PathBuf) -> Self {
        let console = MemorySink::new();
        log.add_sink(console.clone());

        let mut session = Session::new(log);
        session.source = config.source.clone();
        session.destination = config.destination.clone();
        session.options = config.options().to_vec();

        Self {
            rsync,
            session,
            config,
            config_path,
            console,
            candidates: Vec::new(),
            status: String::new(),
            sync_enabled: false,
            exit_requested: false,
        }
    }

    pub fn source(&self) -> &str {
        &self.session.source
    }

    pub fn destination(&self) -> &str {
        &self.session.destination
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn sync_enabled(&self) -> bool {
        self.sync_enabled
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    pub fn deleted(&self) -> usize {
        self.session.deleted
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Console pane contents with their colour class.
    pub fn console(&self) -> Vec<ConsoleLine> {
        self.console
            .entries()
            .into_iter()
            .map(|entry| ConsoleLine {
                text: entry.message,
                tone: entry.level.into(),
            })
            .collect()
    }

    /// Apply a directory picked in the chooser dialog.
    ///
    /// Any previous listing is stale afterwards, so sync is disabled.
    pub fn choose_directory(&mut self, role: DirectoryRole, path: &Path) {
        let text = path.to_string_lossy().into_owned();
        self.session
            .log
            .info(format!("{}: {}", role.label(), text));
        match role {
            DirectoryRole::Source => self.session.source = text,
            DirectoryRole::Destination => self.session.destination = text,
        }
        self.candidates.clear();
        self.sync_enabled = false;
        self.status = "Ready.".to_string();
    }

    pub fn choose_source(&mut self, path: &Path) {
        self.choose_directory(DirectoryRole::Source, path);
    }

    pub fn choose_destination(&mut self, path: &Path) {
        self.choose_directory(DirectoryRole::Destination, path);
    }

    /// "List deletions" button: validate and fill the checklist.
    ///
    /// Candidates start unchecked; only checked ones are deleted.
    pub fn list_deletions(&mut self) -> bool {
        self.candidates.clear();
        self.sync_enabled = false;

        if let Err(invalid) = validate_paths(&self.session.source, &self.session.destination) {
            for issue in &invalid.issues {
                self.session.log.error(format!("Error: {}", issue));
            }
            self.status = "Invalid source or destination.".to_string();
            return false;
        }

        self.session.log.info("Listing deletions...");
        let result = list_deletions(
            &self.rsync,
            self.session.source_path(),
            self.session.destination_path(),
        );
        match result {
            Ok(deletions) => {
                self.session
                    .log
                    .info(format!("{} deletion(s) found.", deletions.len()));
                self.candidates = deletions
                    .iter()
                    .map(|path| Candidate {
                        path: path.clone(),
                        checked: false,
                    })
                    .collect();
                self.session.deletions = deletions;
                self.sync_enabled = true;
                self.status = "Ready to sync.".to_string();
                true
            }
            Err(e) => {
                self.session.deletions.clear();
                self.session
                    .log
                    .error_detail("Error while listing deletions!", &e);
                self.status = "Listing failed, see console.".to_string();
                false
            }
        }
    }

    /// Toggle a checklist row; out-of-range indices are ignored.
    pub fn set_checked(&mut self, index: usize, checked: bool) {
        if let Some(candidate) = self.candidates.get_mut(index) {
            candidate.checked = checked;
        }
    }

    pub fn check_all(&mut self, checked: bool) {
        for candidate in &mut self.candidates {
            candidate.checked = checked;
        }
    }

    /// "Run sync" button: delete the checked candidates, then mirror.
    ///
    /// Returns rsync's exit code, or `None` when nothing ran.
    pub fn run_sync(&mut self) -> Option<i32> {
        if !self.sync_enabled {
            self.session
                .log
                .warn("Warning: list deletions before synchronizing.");
            return None;
        }

        let checked: Vec<PathBuf> = self
            .candidates
            .iter()
            .filter(|c| c.checked)
            .map(|c| c.path.clone())
            .collect();
        let unchecked = self.candidates.len() - checked.len();
        if unchecked > 0 {
            self.session
                .log
                .info(format!("Deletion of {} entities skipped.", unchecked));
        }
        if !checked.is_empty() {
            self.session.delete_confirmed(&checked);
        }

        let validated = validate_options(&self.session.options);
        if let Some(warning) = validated.warning() {
            self.session.log.warn(warning);
        }
        self.session.options = validated.options;

        self.session.log.info(format!(
            "Syncing from {} to {}...",
            self.session.source, self.session.destination
        ));
        let result = self.rsync.mirror(
            self.session.source_path(),
            self.session.destination_path(),
            &self.session.options,
        );

        self.candidates.clear();
        self.sync_enabled = false;

        match result {
            Ok(output) => {
                log_output(&mut self.session, &output);
                let code = output.status.code().unwrap_or(-1);
                if code == 0 {
                    self.session.log.success("Synchronization finished.");
                    self.status = "Synchronization finished.".to_string();
                } else {
                    self.session
                        .log
                        .error_detail("Error while running rsync!", code);
                    self.status = format!("rsync exited with code {}.", code);
                }
                Some(code)
            }
            Err(e) => {
                self.session.log.error_detail("Error while synchronizing!", &e);
                self.status = "Synchronization failed, see console.".to_string();
                None
            }
        }
    }

    /// Toolbar "Configuration": current values for the dialog.
    pub fn open_config(&self) -> ConfigForm {
        ConfigForm {
            source: self.config.source.clone(),
            destination: self.config.destination.clone(),
            options: format_options_text(self.config.options.as_deref()),
        }
    }

    /// Dialog accepted: validate, persist and apply the new defaults.
    pub fn save_config(&mut self, form: &ConfigForm) -> Result<(), ConfigError> {
        self.config.source = form.source.clone();
        self.config.destination = form.destination.clone();
        let validated = self.config.set_options_text(&form.options);
        if let Some(warning) = validated.warning() {
            self.session.log.warn(warning);
        }

        if let Err(e) = self.config.save(&self.config_path) {
            self.session
                .log
                .error_detail("Error while saving configurations!", &e);
            return Err(e);
        }
        self.session.log.success("Configurations saved.");

        self.session.options = self.config.options().to_vec();
        if !self.config.source.is_empty() {
            self.session.source = self.config.source.clone();
        }
        if !self.config.destination.is_empty() {
            self.session.destination = self.config.destination.clone();
        }
        self.candidates.clear();
        self.sync_enabled = false;
        Ok(())
    }

    /// Toolbar "About".
    pub fn about(&self) -> AboutInfo {
        AboutInfo::current()
    }

    /// Toolbar "Exit".
    pub fn exit(&mut self) {
        self.session.log.info("Goodbye!");
        self.exit_requested = true;
    }
}
