use miette::Diagnostic;
use thiserror::Error;

use crate::session::{ConfigError, LogError};
use crate::workflow::WorkflowError;

#[derive(Error, Diagnostic, Debug)]
pub enum CliError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Log(#[from] LogError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Workflow(#[from] WorkflowError),
}

pub type CliResult<T> = Result<T, CliError>;
