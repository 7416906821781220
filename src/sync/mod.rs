//! Sync module - rsync-backed mirror synchronisation.
//!
//! Wraps the external rsync binary: listing what a mirror would delete,
//! removing confirmed entries and running the mirror itself.

mod deleter;
mod lister;
mod options;
mod paths;
mod rsync;

pub use deleter::{DeleteError, DeletionReport, EntityKind, delete_entity};
pub use lister::{DELETING_PREFIX, list_deletions, parse_deletions, unescape_name};
pub use options::{
    IMPLICIT_OPTIONS, ValidatedOptions, format_options_text, parse_options_text, validate_options,
};
pub use paths::{InvalidPaths, PathIssue, validate_paths};
#[cfg(test)]
pub use rsync::MockRsyncOps;
pub use rsync::{DEFAULT_PROGRAM, RealRsync, RsyncError, RsyncOps};
