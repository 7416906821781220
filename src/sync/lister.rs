//! Deletion listing from an rsync dry run.
//!
//! rsync prints names byte for byte and escapes bytes it cannot show as
//! `\#ooo` (three octal digits), so candidates are parsed from raw stdout
//! and decoded back to the exact on-disk name.

use std::path::{Path, PathBuf};

use super::rsync::{RsyncError, RsyncOps};

/// Prefix rsync uses for entries it would remove from the destination.
pub const DELETING_PREFIX: &[u8] = b"deleting ";

/// Extract deletion candidates from dry-run stdout, in rsync's order.
pub fn parse_deletions(stdout: &[u8]) -> Vec<PathBuf> {
    stdout
        .split(|&b| b == b'\n')
        .filter_map(|line| line.strip_prefix(DELETING_PREFIX))
        .map(|rest| rest.trim_ascii())
        .filter(|rest| !rest.is_empty())
        .map(|rest| path_from_bytes(unescape_name(rest)))
        .collect()
}

/// Decode rsync's `\#ooo` escapes; other bytes pass through unchanged.
pub fn unescape_name(name: &[u8]) -> Vec<u8> {
    let mut decoded = Vec::with_capacity(name.len());
    let mut i = 0;
    while i < name.len() {
        if let Some(byte) = octal_escape(&name[i..]) {
            decoded.push(byte);
            i += 5;
        } else {
            decoded.push(name[i]);
            i += 1;
        }
    }
    decoded
}

fn octal_escape(bytes: &[u8]) -> Option<u8> {
    match bytes {
        [b'\\', b'#', digits @ ..] if digits.len() >= 3 => {
            let digits = &digits[..3];
            if !digits.iter().all(|d| (b'0'..=b'7').contains(d)) {
                return None;
            }
            let value = digits
                .iter()
                .fold(0u16, |acc, d| acc * 8 + u16::from(d - b'0'));
            u8::try_from(value).ok()
        }
        _ => None,
    }
}

#[cfg(unix)]
fn path_from_bytes(bytes: Vec<u8>) -> PathBuf {
    use std::ffi::OsString;
    use std::os::unix::ffi::OsStringExt;
    PathBuf::from(OsString::from_vec(bytes))
}

#[cfg(not(unix))]
fn path_from_bytes(bytes: Vec<u8>) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(&bytes).into_owned())
}

/// List the entries present at `destination` that a mirror of `source`
/// would remove.
pub fn list_deletions<R: RsyncOps + ?Sized>(
    rsync: &R,
    source: &Path,
    destination: &Path,
) -> Result<Vec<PathBuf>, RsyncError> {
    let output = rsync.dry_run_delete(source, destination)?;
    Ok(parse_deletions(&output.stdout))
}
