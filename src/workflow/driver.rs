//! Orchestration of a mirror run.
//!
//! `ConfigLoaded → PathsValidated → DeletionsListed →
//! [DeletionsConfirmed | DeletionsSkipped] → EntitiesDeleted →
//! [SyncConfirmed | SyncSkipped] → SyncComplete`
//!
//! Invalid paths and listing failures end the run before anything is
//! deleted or synchronised.

use std::fmt;
use std::path::PathBuf;
use std::process::Output;

use super::error::{WorkflowError, WorkflowResult};
use super::prompt::{DeletionMode, Prompter};
use crate::session::{Entry, Level, Session};
use crate::sync::{DeletionReport, RsyncOps, list_deletions, validate_options, validate_paths};

/// Steps of the mirror workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    ConfigLoaded,
    PathsValidated,
    DeletionsListed,
    DeletionsConfirmed,
    DeletionsSkipped,
    EntitiesDeleted,
    SyncConfirmed,
    SyncSkipped,
    SyncComplete,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Run-mode switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkflowOptions {
    /// Answer every prompt with "delete all" / "proceed".
    pub unattended: bool,
    /// Return an error when rsync exits non-zero instead of only reporting it.
    pub abort_on_sync_failure: bool,
}

/// What happened to the synchronisation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    Skipped,
    Succeeded,
    /// rsync failed to start (`None`) or exited with the given code.
    Failed { exit_code: Option<i32> },
}

/// Summary of a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub final_stage: Stage,
    pub listed: usize,
    pub deleted: usize,
    pub failed: usize,
    pub sync: SyncStatus,
}

/// Drives one session through the workflow.
pub struct Workflow<R: RsyncOps, P: Prompter> {
    rsync: R,
    prompter: P,
    options: WorkflowOptions,
    history: Vec<Stage>,
}

impl<R: RsyncOps, P: Prompter> Workflow<R, P> {
    pub fn new(rsync: R, prompter: P, options: WorkflowOptions) -> Self {
        Self {
            rsync,
            prompter,
            options,
            history: vec![Stage::Start],
        }
    }

    /// Stages entered so far, in order.
    pub fn history(&self) -> &[Stage] {
        &self.history
    }

    pub fn stage(&self) -> Stage {
        self.history.last().copied().unwrap_or(Stage::Start)
    }

    fn enter(&mut self, stage: Stage) {
        tracing::debug!(%stage, "workflow transition");
        self.history.push(stage);
    }

    /// Run the workflow on `session`, whose source, destination and options
    /// are already set from the configuration and command line.
    pub fn run(&mut self, session: &mut Session) -> WorkflowResult<Outcome> {
        self.enter(Stage::ConfigLoaded);

        if self.options.unattended {
            session.log.warn("No interruption mode is ACTIVE!");
        }

        let validated = validate_options(&session.options);
        if let Some(warning) = validated.warning() {
            session.log.warn(warning);
        }
        session.options = validated.options;

        if let Err(invalid) = validate_paths(&session.source, &session.destination) {
            for issue in &invalid.issues {
                session.log.error(format!("Error: {}", issue));
            }
            return Err(invalid.into());
        }
        session.log.info(format!(
            "Source: {}\nDestination: {}",
            session.source, session.destination
        ));
        self.enter(Stage::PathsValidated);

        session.log.info("Listing deletions...");
        session.deletions =
            match list_deletions(&self.rsync, session.source_path(), session.destination_path()) {
                Ok(deletions) => deletions,
                Err(source) => {
                    session.deletions.clear();
                    session
                        .log
                        .error_detail("Error while listing deletions!", &source);
                    return Err(WorkflowError::Listing { source });
                }
            };
        self.enter(Stage::DeletionsListed);

        let listed = session.deletions.len();
        session.log.info(format!("{} deletion(s) found.", listed));
        self.prompter.show_candidates(&session.deletions);

        let report = self.confirm_and_delete(session);
        let failed = report.map(|r| r.failed.len()).unwrap_or(0);
        session.log.info(format!(
            "Deletion stage finished: {} deleted, {} failed.",
            session.deleted, failed
        ));
        self.enter(Stage::EntitiesDeleted);

        let sync = self.confirm_and_sync(session)?;

        Ok(Outcome {
            final_stage: self.stage(),
            listed,
            deleted: session.deleted,
            failed,
            sync,
        })
    }

    fn confirm_and_delete(&mut self, session: &mut Session) -> Option<DeletionReport> {
        session.deleted = 0;
        if session.deletions.is_empty() {
            session.log.info("No deletions to confirm.");
            self.enter(Stage::DeletionsSkipped);
            return None;
        }

        let mode = if self.options.unattended {
            DeletionMode::All
        } else {
            self.prompter.deletion_mode(session.deletions.len())
        };

        let confirmed: Vec<PathBuf> = match mode {
            DeletionMode::All => session.deletions.clone(),
            DeletionMode::None => {
                session.log.info(format!(
                    "Deletion of {} entities skipped.",
                    session.deletions.len()
                ));
                self.enter(Stage::DeletionsSkipped);
                return None;
            }
            DeletionMode::Each => session
                .deletions
                .iter()
                .filter(|candidate| {
                    let path = session.candidate_path(candidate);
                    self.prompter.confirm_entity(&path)
                })
                .cloned()
                .collect(),
        };

        self.enter(Stage::DeletionsConfirmed);
        Some(session.delete_confirmed(&confirmed))
    }

    fn confirm_and_sync(&mut self, session: &mut Session) -> WorkflowResult<SyncStatus> {
        let proceed = self.options.unattended || self.prompter.confirm_sync();
        if !proceed {
            session.log.info("Synchronization stopped.");
            self.enter(Stage::SyncSkipped);
            return Ok(SyncStatus::Skipped);
        }
        self.enter(Stage::SyncConfirmed);

        session.log.info(format!(
            "Syncing from {} to {}...",
            session.source, session.destination
        ));
        let output = match self.rsync.mirror(
            session.source_path(),
            session.destination_path(),
            &session.options,
        ) {
            Ok(output) => output,
            Err(source) => {
                session.log.error_detail("Error while synchronizing!", &source);
                if self.options.abort_on_sync_failure {
                    return Err(WorkflowError::Sync { source });
                }
                return Ok(SyncStatus::Failed { exit_code: None });
            }
        };

        log_output(session, &output);
        self.enter(Stage::SyncComplete);

        match output.status.code() {
            Some(0) => {
                session.log.success("Synchronization finished.");
                Ok(SyncStatus::Succeeded)
            }
            code => {
                let code = code.unwrap_or(-1);
                session.log.error_detail("Error while running rsync!", code);
                if self.options.abort_on_sync_failure {
                    Err(WorkflowError::SyncFailed { code })
                } else {
                    Ok(SyncStatus::Failed {
                        exit_code: Some(code),
                    })
                }
            }
        }
    }
}

/// Mirror rsync's captured output into the session log.
///
/// stdout lines are classified by keyword; stderr lines are at least
/// warnings.
pub(crate) fn log_output(session: &mut Session, output: &Output) {
    for line in String::from_utf8_lossy(&output.stdout).lines() {
        if !line.trim().is_empty() {
            session.log.log(Entry::new(Level::classify(line), line));
        }
    }
    for line in String::from_utf8_lossy(&output.stderr).lines() {
        if !line.trim().is_empty() {
            let level = match Level::classify(line) {
                Level::Error => Level::Error,
                _ => Level::Warning,
            };
            session.log.log(Entry::new(level, line));
        }
    }
}
