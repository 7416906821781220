use miette::Diagnostic;
use thiserror::Error;

use crate::sync::{InvalidPaths, RsyncError};

/// Reasons the workflow stops before completing.
#[derive(Error, Diagnostic, Debug)]
pub enum WorkflowError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    InvalidPaths(#[from] InvalidPaths),

    #[error("Error while listing deletions: {source}")]
    #[diagnostic(code(arxive::workflow::listing))]
    Listing {
        #[source]
        source: RsyncError,
    },

    #[error("Error while synchronizing: {source}")]
    #[diagnostic(code(arxive::workflow::sync))]
    Sync {
        #[source]
        source: RsyncError,
    },

    #[error("rsync exited with code {code}")]
    #[diagnostic(
        code(arxive::workflow::sync_failed),
        help("See the session log for rsync's output.")
    )]
    SyncFailed { code: i32 },
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;
