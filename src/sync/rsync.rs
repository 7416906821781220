//! Rsync invocation for the mirror workflow.
//!
//! This module provides a trait-based abstraction over the rsync commands
//! so the workflow can be driven against a mock in tests.

use miette::Diagnostic;
use std::path::Path;
use std::process::{Command, Output};
use thiserror::Error;

#[cfg(test)]
use mockall::automock;

/// Program used when no override is configured.
pub const DEFAULT_PROGRAM: &str = "rsync";

/// Errors that can occur while running rsync.
#[derive(Error, Diagnostic, Debug)]
pub enum RsyncError {
    #[error("Failed to start {program}: {message}")]
    #[diagnostic(code(arxive::sync::rsync::command_failed))]
    CommandFailed { program: String, message: String },

    #[error("rsync returned non-zero exit code {code}: {stderr}")]
    #[diagnostic(code(arxive::sync::rsync::non_zero_exit))]
    NonZeroExit { code: i32, stderr: String },

    #[error("{program} not installed or not in PATH")]
    #[diagnostic(
        code(arxive::sync::rsync::not_found),
        help("Install rsync or point --rsync / ARXIVE_RSYNC at the binary.")
    )]
    NotFound { program: String },
}

impl RsyncError {
    /// Exit code reported by rsync, if it got far enough to produce one.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            RsyncError::NonZeroExit { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Trait for rsync operations. Can be mocked in tests.
#[cfg_attr(test, automock)]
pub trait RsyncOps {
    /// Run `rsync -av --delete --dry-run <source> <destination>`.
    ///
    /// A non-zero exit is reported as [`RsyncError::NonZeroExit`].
    fn dry_run_delete(&self, source: &Path, destination: &Path) -> Result<Output, RsyncError>;

    /// Run `rsync -av [options...] <source> <destination>`.
    ///
    /// The exit status is left for the caller to judge.
    fn mirror(
        &self,
        source: &Path,
        destination: &Path,
        options: &[String],
    ) -> Result<Output, RsyncError>;
}

/// Real implementation of RsyncOps using std::process::Command.
#[derive(Clone, Debug)]
pub struct RealRsync {
    program: String,
}

impl RealRsync {
    pub fn new() -> Self {
        Self::with_program(DEFAULT_PROGRAM)
    }

    /// Use a specific rsync binary instead of the one on PATH.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub(crate) fn build_args(
        options: &[&str],
        extra: &[String],
        source: &Path,
        destination: &Path,
    ) -> Vec<String> {
        let mut args: Vec<String> = options.iter().map(|s| s.to_string()).collect();
        args.extend(extra.iter().cloned());
        args.push(source.to_string_lossy().into_owned());
        args.push(destination.to_string_lossy().into_owned());
        args
    }

    /// Helper to run rsync and capture its output.
    fn run_rsync(&self, args: &[String]) -> Result<Output, RsyncError> {
        tracing::debug!(program = %self.program, ?args, "running rsync");
        Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    RsyncError::NotFound {
                        program: self.program.clone(),
                    }
                } else {
                    RsyncError::CommandFailed {
                        program: self.program.clone(),
                        message: e.to_string(),
                    }
                }
            })
    }

    /// Check if the output indicates success, otherwise return an error.
    fn check_output(&self, output: Output) -> Result<Output, RsyncError> {
        if output.status.success() {
            Ok(output)
        } else {
            Err(RsyncError::NonZeroExit {
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

impl Default for RealRsync {
    fn default() -> Self {
        Self::new()
    }
}

impl RsyncOps for RealRsync {
    fn dry_run_delete(&self, source: &Path, destination: &Path) -> Result<Output, RsyncError> {
        let args = Self::build_args(
            &["-av", "--delete", "--dry-run"],
            &[],
            source,
            destination,
        );
        let output = self.run_rsync(&args)?;
        self.check_output(output)
    }

    fn mirror(
        &self,
        source: &Path,
        destination: &Path,
        options: &[String],
    ) -> Result<Output, RsyncError> {
        let args = Self::build_args(&["-av"], options, source, destination);
        self.run_rsync(&args)
    }
}
