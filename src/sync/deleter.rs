//! Removal of confirmed deletion candidates.
//!
//! Only single entries are removed: files (and symlinks) directly,
//! directories only when they are already empty. rsync reports a
//! directory's contents before the directory itself, so deleting the
//! candidates in listing order empties directories before they are reached.

use miette::Diagnostic;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while deleting an entity.
#[derive(Error, Diagnostic, Debug)]
pub enum DeleteError {
    #[error("{} could not be deleted: not found", path.display())]
    #[diagnostic(code(arxive::sync::delete::not_found))]
    NotFound { path: PathBuf },

    #[error("{} could not be deleted: {source}", path.display())]
    #[diagnostic(code(arxive::sync::delete::io))]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// What kind of entry was removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    File,
    Symlink,
    Directory,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::File => write!(f, "file"),
            EntityKind::Symlink => write!(f, "symlink"),
            EntityKind::Directory => write!(f, "directory"),
        }
    }
}

/// Delete a single file, symlink or empty directory.
///
/// Non-empty directories are left untouched and reported as an I/O error.
pub fn delete_entity(path: &Path) -> Result<EntityKind, DeleteError> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(DeleteError::NotFound {
                path: path.to_path_buf(),
            });
        }
        Err(source) => {
            return Err(DeleteError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let file_type = metadata.file_type();
    let (kind, result) = if file_type.is_symlink() {
        (EntityKind::Symlink, fs::remove_file(path))
    } else if file_type.is_file() {
        (EntityKind::File, fs::remove_file(path))
    } else if file_type.is_dir() {
        (EntityKind::Directory, fs::remove_dir(path))
    } else {
        return Err(DeleteError::NotFound {
            path: path.to_path_buf(),
        });
    };

    result.map(|_| kind).map_err(|source| DeleteError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Tally of a batch of deletions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeletionReport {
    pub deleted: Vec<PathBuf>,
    pub failed: Vec<PathBuf>,
}
