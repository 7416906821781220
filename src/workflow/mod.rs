//! Workflow module - the interactive mirror run.
//!
//! Validates the chosen directories, lists what a mirror would delete,
//! asks which entries to remove and finally runs rsync.

mod driver;
mod error;
mod prompt;

pub(crate) use driver::log_output;
pub use driver::{Outcome, Stage, SyncStatus, Workflow, WorkflowOptions};
pub use error::{WorkflowError, WorkflowResult};
#[cfg(test)]
pub use prompt::MockPrompter;
pub use prompt::{
    DeletionMode, Prompter, TerminalPrompter, candidates_table, parse_deletion_mode,
    parse_yes_default,
};
