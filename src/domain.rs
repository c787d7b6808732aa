pub mod classifier;
pub mod mover;
pub mod provisioner;

pub use classifier::{Classifier, ClassifySummary, ImageExtensions, LoadedKind};
pub use mover::{move_files, CopiedFile, CopyFailure, MoveOutcome, MoveSummary, PICTURES_DIR};
pub use provisioner::{claim_directory_name, provision, DATE_FORMAT};

use crate::config::RootConfig;
use crate::error::{ClaimFilerError, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DamageType {
    Water,
    Fire,
    Wind,
}

impl DamageType {
    pub const ALL: [DamageType; 3] = [DamageType::Water, DamageType::Fire, DamageType::Wind];

    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_lowercase().as_str() {
            "water" => Some(DamageType::Water),
            "fire" => Some(DamageType::Fire),
            "wind" => Some(DamageType::Wind),
            _ => None,
        }
    }

    /// The next damage type in selection order, `None` after the last one
    pub fn cycle(current: Option<Self>) -> Option<Self> {
        match current {
            None => Some(DamageType::Water),
            Some(DamageType::Water) => Some(DamageType::Fire),
            Some(DamageType::Fire) => Some(DamageType::Wind),
            Some(DamageType::Wind) => None,
        }
    }
}

impl fmt::Display for DamageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DamageType::Water => "Water",
            DamageType::Fire => "Fire",
            DamageType::Wind => "Wind",
        };
        f.write_str(name)
    }
}

/// Claim metadata entered by the clerk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimIdentity {
    pub first_name: String,
    pub last_name: String,
    pub loss_date: NaiveDate,
    pub claim_number: String,
    pub damage_type: Option<DamageType>,
}

impl ClaimIdentity {
    /// Name of the directory this claim's files go into
    pub fn directory_name(&self) -> String {
        claim_directory_name(self)
    }
}

/// Form fields the clerk can leave empty or fill in wrongly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    FirstName,
    LastName,
    LossDate,
    DamageType,
    ClaimNumber,
}

impl FormField {
    pub fn label(&self) -> &'static str {
        match self {
            FormField::FirstName => "First name",
            FormField::LastName => "Last name",
            FormField::LossDate => "Date of loss",
            FormField::DamageType => "Damage type",
            FormField::ClaimNumber => "AAG claim number",
        }
    }

    /// Whether the form marks this field with a `*`
    pub fn is_required(&self) -> bool {
        matches!(
            self,
            FormField::LastName | FormField::LossDate | FormField::ClaimNumber
        )
    }
}

/// Raw text of the intake form, before validation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClaimForm {
    pub first_name: String,
    pub last_name: String,
    pub loss_date: String,
    pub damage_type: String,
    pub claim_number: String,
}

/// Accepted spellings of the loss date, tried in order
const LOSS_DATE_FORMATS: [&str; 3] = ["%m.%d.%Y", "%m/%d/%Y", "%Y-%m-%d"];

impl ClaimForm {
    /// Turns the form into a claim identity.
    ///
    /// Returns every field that is required but empty, or filled with a value
    /// that cannot be parsed.
    pub fn validate(&self) -> std::result::Result<ClaimIdentity, Vec<FormField>> {
        let mut invalid = Vec::new();

        let last_name = self.last_name.trim();
        if last_name.is_empty() {
            invalid.push(FormField::LastName);
        }

        let loss_date = parse_loss_date(&self.loss_date);
        if loss_date.is_none() {
            invalid.push(FormField::LossDate);
        }

        let damage_type = if self.damage_type.trim().is_empty() {
            None
        } else {
            let parsed = DamageType::parse(&self.damage_type);
            if parsed.is_none() {
                invalid.push(FormField::DamageType);
            }
            parsed
        };

        let claim_number = self.claim_number.trim();
        if claim_number.is_empty() {
            invalid.push(FormField::ClaimNumber);
        }

        match loss_date {
            Some(loss_date) if invalid.is_empty() => Ok(ClaimIdentity {
                first_name: self.first_name.trim().to_string(),
                last_name: last_name.to_string(),
                loss_date,
                claim_number: claim_number.to_string(),
                damage_type,
            }),
            _ => Err(invalid),
        }
    }
}

pub fn parse_loss_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    LOSS_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}

/// Content classes a queued file can fall in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Document,
    Picture,
}

/// State of the claim currently being filed.
///
/// Holds the two file queues and the claim directory once it is created.
/// One session serves one claim at a time and is only touched by the thread
/// driving the form.
#[derive(Debug, Default)]
pub struct ClaimSession {
    documents: Vec<PathBuf>,
    pictures: Vec<PathBuf>,
    claim_dir: Option<PathBuf>,
}

impl ClaimSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn documents(&self) -> &[PathBuf] {
        &self.documents
    }

    pub fn pictures(&self) -> &[PathBuf] {
        &self.pictures
    }

    /// The directory created by the last successful `provision`
    pub fn claim_dir(&self) -> Option<&Path> {
        self.claim_dir.as_deref()
    }

    pub fn has_queued_files(&self) -> bool {
        !self.documents.is_empty() || !self.pictures.is_empty()
    }

    /// Sorts `paths` into the queues, appending to what is already queued
    pub fn add_files<I, P>(&mut self, classifier: &Classifier, paths: I) -> ClassifySummary
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        classifier.classify_into(paths, &mut self.documents, &mut self.pictures)
    }

    /// Creates (or joins) the claim directory and makes it the copy target
    pub fn provision(&mut self, root: &RootConfig, identity: &ClaimIdentity) -> Result<PathBuf> {
        let dir = provision(&root.root_path, identity)?;
        self.claim_dir = Some(dir.clone());
        Ok(dir)
    }

    /// Copies every queued file into the claim directory, then empties the
    /// queues whatever the individual copies did.
    ///
    /// Without a claim directory nothing is copied and the queues are kept so
    /// the clerk can provision and try again.
    pub fn move_queued(&mut self) -> Result<MoveSummary> {
        let destination = self.claim_dir.as_deref().ok_or(ClaimFilerError::NoDestination)?;

        let summary = move_files(&self.documents, &self.pictures, destination)?;
        self.clear_queues();

        info!(
            copied = summary.copied.len(),
            failed = summary.failures.len(),
            "queued files moved"
        );
        Ok(summary)
    }

    pub fn clear_queues(&mut self) {
        self.documents.clear();
        self.pictures.clear();
    }

    /// Forgets everything about the current claim
    pub fn clear(&mut self) {
        self.clear_queues();
        self.claim_dir = None;
    }
}
