use super::ClaimIdentity;
use crate::error::{ClaimFilerError, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

/// Loss date format used in claim directory names
pub const DATE_FORMAT: &str = "%m.%d.%Y";

/// `"<last> <first> <MM.dd.yyyy> AAG <claim>"`
///
/// Archival tooling matches on this exact pattern.
pub fn claim_directory_name(identity: &ClaimIdentity) -> String {
    format!(
        "{} {} {} AAG {}",
        identity.last_name,
        identity.first_name,
        identity.loss_date.format(DATE_FORMAT),
        identity.claim_number
    )
}

/// Ensures the claim directory for `identity` exists under `root`.
///
/// An existing directory of the same name is joined as is, never recreated
/// or merged. Fails with `RootMissing` without touching the filesystem when
/// `root` is not a directory.
pub fn provision(root: &Path, identity: &ClaimIdentity) -> Result<PathBuf> {
    if !root.is_dir() {
        return Err(ClaimFilerError::RootMissing(root.to_path_buf()));
    }

    let dir = root.join(claim_directory_name(identity));

    if dir.is_dir() {
        info!(dir = %dir.display(), "joining existing claim directory");
        return Ok(dir);
    }

    match fs::create_dir(&dir) {
        Ok(()) => {
            info!(dir = %dir.display(), "claim directory created");
            Ok(dir)
        }
        // Someone else created it between the check and the create
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && dir.is_dir() => Ok(dir),
        Err(source) => Err(ClaimFilerError::CreateFailed { path: dir, source }),
    }
}
