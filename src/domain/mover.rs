//! Copying queued files into a claim directory.
//!
//! The claim directory is not locked. If another process writes to it while
//! a move is running the outcome is undefined; a same-named file appearing
//! mid-move is still never overwritten.

use super::FileKind;
use crate::error::{ClaimFilerError, Result};
use serde::Serialize;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Subdirectory of a claim directory that receives pictures
pub const PICTURES_DIR: &str = "Pictures";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CopiedFile {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub kind: FileKind,
}

/// Why a single queued file was not copied
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum CopyFailure {
    /// A file with the same name is already in the destination
    Conflict { name: String },
    Failed { name: String, cause: String },
}

impl CopyFailure {
    pub fn name(&self) -> &str {
        match self {
            CopyFailure::Conflict { name } | CopyFailure::Failed { name, .. } => name,
        }
    }
}

impl fmt::Display for CopyFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CopyFailure::Conflict { name } => write!(f, "{} (already exists)", name),
            CopyFailure::Failed { name, cause } => write!(f, "{} ({})", name, cause),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    NothingQueued,
    AllCopied,
    Partial,
}

/// Result of one move, per file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MoveSummary {
    pub copied: Vec<CopiedFile>,
    pub failures: Vec<CopyFailure>,
}

impl MoveSummary {
    pub fn outcome(&self) -> MoveOutcome {
        if self.failures.is_empty() {
            if self.copied.is_empty() {
                MoveOutcome::NothingQueued
            } else {
                MoveOutcome::AllCopied
            }
        } else {
            MoveOutcome::Partial
        }
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failed_names(&self) -> Vec<&str> {
        self.failures.iter().map(CopyFailure::name).collect()
    }
}

impl fmt::Display for MoveSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.outcome() {
            MoveOutcome::NothingQueued => f.write_str("No files moved."),
            MoveOutcome::AllCopied => write!(
                f,
                "Files migrated successfully ({} copied).",
                self.copied.len()
            ),
            MoveOutcome::Partial => {
                write!(
                    f,
                    "Migrated {} of {} files. Not copied: ",
                    self.copied.len(),
                    self.copied.len() + self.failures.len()
                )?;
                for (i, failure) in self.failures.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", failure)?;
                }
                Ok(())
            }
        }
    }
}

/// Copies `documents` into `destination` and `pictures` into
/// `destination/Pictures`.
///
/// Sources are left in place and nothing is overwritten. Each file succeeds
/// or fails on its own; failures are collected in the summary and never stop
/// the rest of the batch. Only a missing `destination` fails the whole call.
pub fn move_files(
    documents: &[PathBuf],
    pictures: &[PathBuf],
    destination: &Path,
) -> Result<MoveSummary> {
    if !destination.is_dir() {
        return Err(ClaimFilerError::NoDestination);
    }

    let mut summary = MoveSummary::default();

    for source in documents {
        copy_into(source, destination, FileKind::Document, &mut summary);
    }

    if !pictures.is_empty() {
        let picture_dir = destination.join(PICTURES_DIR);
        match ensure_dir(&picture_dir) {
            Ok(()) => {
                for source in pictures {
                    copy_into(source, &picture_dir, FileKind::Picture, &mut summary);
                }
            }
            Err(e) => {
                warn!(dir = %picture_dir.display(), error = %e, "cannot create pictures directory");
                let cause = format!("could not create {} directory: {}", PICTURES_DIR, e);
                for source in pictures {
                    record_failure(
                        &mut summary,
                        CopyFailure::Failed {
                            name: display_name(source),
                            cause: cause.clone(),
                        },
                    );
                }
            }
        }
    }

    Ok(summary)
}

fn ensure_dir(dir: &Path) -> io::Result<()> {
    if dir.is_dir() {
        return Ok(());
    }
    match fs::create_dir(dir) {
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && dir.is_dir() => Ok(()),
        other => other,
    }
}

fn copy_into(source: &Path, dir: &Path, kind: FileKind, summary: &mut MoveSummary) {
    let Some(file_name) = source.file_name() else {
        record_failure(
            summary,
            CopyFailure::Failed {
                name: source.display().to_string(),
                cause: "path has no file name".to_string(),
            },
        );
        return;
    };

    let target = dir.join(file_name);
    let name = file_name.to_string_lossy().into_owned();

    match copy_no_clobber(source, &target) {
        Ok(()) => summary.copied.push(CopiedFile {
            source: source.to_path_buf(),
            destination: target,
            kind,
        }),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            record_failure(summary, CopyFailure::Conflict { name })
        }
        Err(e) => record_failure(
            summary,
            CopyFailure::Failed {
                name,
                cause: e.to_string(),
            },
        ),
    }
}

/// Copies `source` to `target`, failing with `AlreadyExists` instead of
/// replacing an existing file. Permission bits follow the source, as with
/// `fs::copy`.
fn copy_no_clobber(source: &Path, target: &Path) -> io::Result<()> {
    if fs::metadata(source)?.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "source is a directory",
        ));
    }

    let mut reader = File::open(source)?;
    let mut writer = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(target)?;
    io::copy(&mut reader, &mut writer)?;

    // The content is already in place, so a refused chmod only gets logged
    let permissions = reader.metadata()?.permissions();
    if let Err(e) = writer.set_permissions(permissions) {
        warn!(path = %target.display(), error = %e, "permissions not copied");
    }
    writer.sync_all()
}

fn record_failure(summary: &mut MoveSummary, failure: CopyFailure) {
    warn!(%failure, "file not copied");
    summary.failures.push(failure);
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
