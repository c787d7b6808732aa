//! claimfiler - files insurance claim attachments into claim directories
//!
//! Sorts selected files into documents and pictures, creates a claim
//! directory named after the claim under a configured root, and copies the
//! files into it (pictures into a `Pictures` subdirectory).

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod pickers;
pub mod platform;
pub mod tui;

// Re-export primary types for convenience
pub use config::{ConfigStore, RootConfig, UserPreferences};
pub use domain::{
    move_files, provision, ClaimForm, ClaimIdentity, ClaimSession, Classifier, ClassifySummary,
    CopyFailure, DamageType, FileKind, ImageExtensions, MoveOutcome, MoveSummary,
};
pub use error::{ClaimFilerError, Result};
pub use pickers::{Confirmer, DirectoryPicker, FilePicker, PromptPicker};
pub use platform::{HostEnv, Platform};
