//! Source and destination validation.
//!
//! Runs before any rsync invocation: both directories must exist and
//! must not be the same directory.

use miette::Diagnostic;
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// A single problem with the chosen source/destination pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathIssue {
    Missing,
    InvalidSource,
    InvalidDestination,
    Identical,
}

impl fmt::Display for PathIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            PathIssue::Missing => "Source and destination must be provided!",
            PathIssue::InvalidSource => "Invalid source!",
            PathIssue::InvalidDestination => "Invalid destination!",
            PathIssue::Identical => "Source and destination must be different!",
        };
        write!(f, "{}", message)
    }
}

/// Every problem found by [`validate_paths`].
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
#[error("Invalid source/destination: {}", format_issues(.issues))]
#[diagnostic(
    code(arxive::sync::paths::invalid),
    help("Both directories must exist and differ.")
)]
pub struct InvalidPaths {
    pub issues: Vec<PathIssue>,
}

fn format_issues(issues: &[PathIssue]) -> String {
    issues
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Check that `source` and `destination` exist and differ.
pub fn validate_paths(source: &str, destination: &str) -> Result<(), InvalidPaths> {
    if source.trim().is_empty() || destination.trim().is_empty() {
        return Err(InvalidPaths {
            issues: vec![PathIssue::Missing],
        });
    }

    let source_path = Path::new(source);
    let destination_path = Path::new(destination);
    let mut issues = Vec::new();

    if !source_path.exists() {
        issues.push(PathIssue::InvalidSource);
    }
    if !destination_path.exists() {
        issues.push(PathIssue::InvalidDestination);
    }
    if source == destination || same_directory(source_path, destination_path) {
        issues.push(PathIssue::Identical);
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(InvalidPaths { issues })
    }
}

fn same_directory(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
