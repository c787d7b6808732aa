// CLI module for argument parsing and the headless filing command

use crate::config::{ConfigStore, RootConfig};
use crate::domain::{ClaimForm, ClaimSession, Classifier, ClassifySummary, DamageType, MoveSummary};
use crate::error::{ClaimFilerError, Result};
use crate::pickers::{Confirmer, DirectoryPicker, FilePicker};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

/// claimfiler - file claim attachments into claim directories
///
/// Without a subcommand the intake form opens in the terminal.
#[derive(Parser, Debug, Clone)]
#[command(name = "claimfiler")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Show or change the claim root directory
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// File a claim without opening the form
    File(FileArgs),
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigAction {
    /// Print the configured claim root
    Show,
    /// Print where the configuration is stored
    Path,
    /// Set the claim root; prompts when no directory is given
    Set { directory: Option<PathBuf> },
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct FileArgs {
    /// Claimant first name
    #[arg(long = "first", default_value = "")]
    pub first_name: String,

    /// Claimant last name (required)
    #[arg(long = "last", default_value = "")]
    pub last_name: String,

    /// Date of loss: MM.dd.yyyy, MM/dd/yyyy or yyyy-mm-dd (required)
    #[arg(long = "date", default_value = "")]
    pub loss_date: String,

    /// Type of damage
    #[arg(long = "damage", value_enum)]
    pub damage: Option<DamageArg>,

    /// AAG claim number (required)
    #[arg(long = "claim", default_value = "")]
    pub claim_number: String,

    /// Choose more files at a prompt before filing
    #[arg(short = 'p', long = "pick", action = ArgAction::SetTrue)]
    pub pick: bool,

    /// Create the claim directory without asking when no files are given
    #[arg(short = 'y', long = "yes", action = ArgAction::SetTrue)]
    pub yes: bool,

    /// Print the result as JSON
    #[arg(long = "json", action = ArgAction::SetTrue)]
    pub json: bool,

    /// Files to sort into the claim directory
    pub files: Vec<PathBuf>,
}

/// Damage type options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DamageArg {
    Water,
    Fire,
    Wind,
}

impl From<DamageArg> for DamageType {
    fn from(arg: DamageArg) -> Self {
        match arg {
            DamageArg::Water => DamageType::Water,
            DamageArg::Fire => DamageType::Fire,
            DamageArg::Wind => DamageType::Wind,
        }
    }
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Args::parse()
    }
}

impl FileArgs {
    pub fn form(&self) -> ClaimForm {
        ClaimForm {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            loss_date: self.loss_date.clone(),
            damage_type: self
                .damage
                .map(|d| DamageType::from(d).to_string())
                .unwrap_or_default(),
            claim_number: self.claim_number.clone(),
        }
    }
}

/// What the `file` command did
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub claim_dir: PathBuf,
    pub documents: usize,
    pub pictures: usize,
    pub moved: MoveSummary,
}

impl FileReport {
    pub fn status_lines(&self) -> Vec<String> {
        let loaded = ClassifySummary {
            documents: self.documents,
            pictures: self.pictures,
        };
        vec![
            loaded.to_string(),
            format!("Claim directory: {}", self.claim_dir.display()),
            self.moved.to_string(),
        ]
    }
}

/// Files a claim from command line arguments.
///
/// Asks `prompts` for a root on first run, for extra files with `--pick`,
/// and for confirmation when no files were given (unless `--yes`). Returns
/// `Ok(None)` when the clerk declines.
pub fn file_claim<P>(
    args: &FileArgs,
    store: &ConfigStore,
    classifier: &Classifier,
    prompts: &mut P,
) -> Result<Option<FileReport>>
where
    P: DirectoryPicker + FilePicker + Confirmer,
{
    let identity = args.form().validate().map_err(|fields| {
        ClaimFilerError::IncompleteForm(fields.iter().map(|f| f.label().to_string()).collect())
    })?;

    let root: RootConfig = store.bootstrap(&mut *prompts)?;

    let mut session = ClaimSession::new();
    let mut loaded = session.add_files(classifier, &args.files);

    if args.pick {
        if let Some(picked) = prompts.pick_files("Claim files to add (Enter for none)") {
            loaded = session.add_files(classifier, picked);
        }
    }

    if !session.has_queued_files()
        && !args.yes
        && !prompts.confirm(
            "No files or pictures have been added. Create the claim directory anyway? \
             You will have to add them manually later.",
        )
    {
        info!("filing cancelled, no files attached");
        return Ok(None);
    }

    let claim_dir = session.provision(&root, &identity)?;
    let moved = session.move_queued()?;

    Ok(Some(FileReport {
        claim_dir,
        documents: loaded.documents,
        pictures: loaded.pictures,
        moved,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MoveOutcome;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    /// Canned answers for the root prompt and the confirmation
    struct Scripted {
        root: Option<PathBuf>,
        confirm: bool,
        confirmations_asked: usize,
        files: Option<Vec<PathBuf>>,
        files_asked: usize,
    }

    impl Scripted {
        fn new(root: Option<&Path>, confirm: bool) -> Self {
            Self {
                root: root.map(Path::to_path_buf),
                confirm,
                confirmations_asked: 0,
                files: None,
                files_asked: 0,
            }
        }
    }

    impl DirectoryPicker for Scripted {
        fn pick_directory(&mut self, _prompt: &str) -> Option<PathBuf> {
            self.root.clone()
        }
    }

    impl FilePicker for Scripted {
        fn pick_files(&mut self, _prompt: &str) -> Option<Vec<PathBuf>> {
            self.files_asked += 1;
            self.files.clone()
        }
    }

    impl Confirmer for Scripted {
        fn confirm(&mut self, _question: &str) -> bool {
            self.confirmations_asked += 1;
            self.confirm
        }
    }

    fn john_doe(files: Vec<PathBuf>) -> FileArgs {
        FileArgs {
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            loss_date: "2024-03-05".to_string(),
            damage: Some(DamageArg::Wind),
            claim_number: "551".to_string(),
            files,
            ..FileArgs::default()
        }
    }

    mod args_tests {
        use super::*;

        #[test]
        fn test_no_subcommand_opens_form() {
            let args = Args::try_parse_from(["claimfiler"]).unwrap();
            assert!(args.command.is_none());
            assert_eq!(args.verbose, 0);
        }

        #[test]
        fn test_verbose_count() {
            let args = Args::try_parse_from(["claimfiler", "-vv", "config", "show"]).unwrap();
            assert_eq!(args.verbose, 2);
        }

        #[test]
        fn test_config_set() {
            let args = Args::try_parse_from(["claimfiler", "config", "set", "/claims"]).unwrap();
            match args.command {
                Some(Command::Config { action }) => assert_eq!(
                    action,
                    ConfigAction::Set {
                        directory: Some(PathBuf::from("/claims"))
                    }
                ),
                other => panic!("unexpected command: {:?}", other),
            }
        }

        #[test]
        fn test_file_command() {
            let args = Args::try_parse_from([
                "claimfiler",
                "file",
                "--first",
                "John",
                "--last",
                "Doe",
                "--date",
                "03.05.2024",
                "--claim",
                "551",
                "--damage",
                "fire",
                "--json",
                "a.pdf",
                "b.png",
            ])
            .unwrap();

            let Some(Command::File(file)) = args.command else {
                panic!("expected file command");
            };
            assert_eq!(file.files, vec![PathBuf::from("a.pdf"), PathBuf::from("b.png")]);
            assert!(file.json);
            assert!(!file.yes);

            let form = file.form();
            assert_eq!(form.damage_type, "Fire");
            assert_eq!(
                form.validate().unwrap().directory_name(),
                "Doe John 03.05.2024 AAG 551"
            );
        }

        #[test]
        fn test_pick_flag() {
            let args = Args::try_parse_from(["claimfiler", "file", "-p"]).unwrap();
            let Some(Command::File(file)) = args.command else {
                panic!("expected file command");
            };
            assert!(file.pick);
            assert!(file.files.is_empty());
        }

        #[test]
        fn test_damage_conversion() {
            assert_eq!(DamageType::from(DamageArg::Water), DamageType::Water);
            assert_eq!(DamageType::from(DamageArg::Fire), DamageType::Fire);
            assert_eq!(DamageType::from(DamageArg::Wind), DamageType::Wind);
        }

        #[test]
        fn test_invalid_damage_rejected() {
            assert!(Args::try_parse_from(["claimfiler", "file", "--damage", "hail"]).is_err());
        }
    }

    mod file_claim_tests {
        use super::*;

        fn setup() -> (TempDir, ConfigStore, PathBuf) {
            let temp = TempDir::new().unwrap();
            let store = ConfigStore::new(temp.path().join("config").join("rootdir.txt"));
            let root = temp.path().join("claims");
            fs::create_dir(&root).unwrap();
            (temp, store, root)
        }

        #[test]
        fn test_files_claim_and_bootstraps_root() {
            let (temp, store, root) = setup();
            let doc = temp.path().join("estimate.pdf");
            let pic = temp.path().join("roof.jpg");
            fs::write(&doc, b"pdf").unwrap();
            fs::write(&pic, b"jpg").unwrap();
            let mut prompts = Scripted::new(Some(&root), false);

            let report = file_claim(
                &john_doe(vec![doc, pic]),
                &store,
                &Classifier::default(),
                &mut prompts,
            )
            .unwrap()
            .unwrap();

            assert_eq!(report.claim_dir, root.join("Doe John 03.05.2024 AAG 551"));
            assert_eq!(report.moved.outcome(), MoveOutcome::AllCopied);
            assert_eq!((report.documents, report.pictures), (1, 1));
            assert!(report.claim_dir.join("Pictures").join("roof.jpg").exists());
            assert_eq!(store.load().unwrap().root_path, root);
            assert_eq!(prompts.confirmations_asked, 0);
        }

        #[test]
        fn test_picked_files_are_filed() {
            let (temp, store, root) = setup();
            store.save(&root).unwrap();
            let given = temp.path().join("estimate.pdf");
            let picked = temp.path().join("porch.jpeg");
            fs::write(&given, b"pdf").unwrap();
            fs::write(&picked, b"jpeg").unwrap();
            let mut prompts = Scripted::new(None, false);
            prompts.files = Some(vec![picked]);
            let args = FileArgs {
                pick: true,
                ..john_doe(vec![given])
            };

            let report = file_claim(&args, &store, &Classifier::default(), &mut prompts)
                .unwrap()
                .unwrap();

            assert_eq!(prompts.files_asked, 1);
            assert_eq!((report.documents, report.pictures), (1, 1));
            assert!(report.claim_dir.join("estimate.pdf").is_file());
            assert!(report.claim_dir.join("Pictures").join("porch.jpeg").is_file());
        }

        #[test]
        fn test_pick_cancel_falls_back_to_confirmation() {
            let (_temp, store, root) = setup();
            store.save(&root).unwrap();
            let mut prompts = Scripted::new(None, false);
            let args = FileArgs {
                pick: true,
                ..john_doe(vec![])
            };

            let report = file_claim(&args, &store, &Classifier::default(), &mut prompts).unwrap();

            assert!(report.is_none());
            assert_eq!(prompts.files_asked, 1);
            assert_eq!(prompts.confirmations_asked, 1);
        }

        #[test]
        fn test_files_not_picked_without_flag() {
            let (_temp, store, root) = setup();
            store.save(&root).unwrap();
            let mut prompts = Scripted::new(None, true);

            file_claim(&john_doe(vec![]), &store, &Classifier::default(), &mut prompts).unwrap();

            assert_eq!(prompts.files_asked, 0);
        }

        #[test]
        fn test_no_files_declined() {
            let (_temp, store, root) = setup();
            store.save(&root).unwrap();
            let mut prompts = Scripted::new(None, false);

            let report =
                file_claim(&john_doe(vec![]), &store, &Classifier::default(), &mut prompts)
                    .unwrap();

            assert!(report.is_none());
            assert_eq!(prompts.confirmations_asked, 1);
            assert_eq!(fs::read_dir(&root).unwrap().count(), 0);
        }

        #[test]
        fn test_no_files_confirmed_creates_directory() {
            let (_temp, store, root) = setup();
            store.save(&root).unwrap();
            let mut prompts = Scripted::new(None, true);

            let report =
                file_claim(&john_doe(vec![]), &store, &Classifier::default(), &mut prompts)
                    .unwrap()
                    .unwrap();

            assert!(report.claim_dir.is_dir());
            assert_eq!(report.moved.outcome(), MoveOutcome::NothingQueued);
        }

        #[test]
        fn test_yes_skips_confirmation() {
            let (_temp, store, root) = setup();
            store.save(&root).unwrap();
            let mut prompts = Scripted::new(None, false);
            let args = FileArgs {
                yes: true,
                ..john_doe(vec![])
            };

            let report = file_claim(&args, &store, &Classifier::default(), &mut prompts).unwrap();

            assert!(report.is_some());
            assert_eq!(prompts.confirmations_asked, 0);
        }

        #[test]
        fn test_incomplete_form() {
            let (_temp, store, _root) = setup();
            let mut prompts = Scripted::new(None, true);
            let args = FileArgs {
                last_name: String::new(),
                claim_number: " ".to_string(),
                ..john_doe(vec![])
            };

            let result = file_claim(&args, &store, &Classifier::default(), &mut prompts);

            match result {
                Err(ClaimFilerError::IncompleteForm(fields)) => {
                    assert_eq!(fields, vec!["Last name", "AAG claim number"])
                }
                other => panic!("unexpected result: {:?}", other.map(|r| r.is_some())),
            }
        }

        #[test]
        fn test_cancelled_bootstrap() {
            let (_temp, store, _root) = setup();
            let mut prompts = Scripted::new(None, true);

            let result = file_claim(&john_doe(vec![]), &store, &Classifier::default(), &mut prompts);

            assert!(matches!(result, Err(ClaimFilerError::NotConfigured)));
        }

        #[test]
        fn test_root_removed_after_configuring() {
            let (_temp, store, root) = setup();
            store.save(&root).unwrap();
            fs::remove_dir(&root).unwrap();
            let mut prompts = Scripted::new(None, true);

            let result = file_claim(&john_doe(vec![]), &store, &Classifier::default(), &mut prompts);

            assert!(matches!(result, Err(ClaimFilerError::RootMissing(_))));
            assert!(!root.exists());
        }

        #[test]
        fn test_report_status_lines() {
            let report = FileReport {
                claim_dir: PathBuf::from("/claims/Doe John 03.05.2024 AAG 551"),
                documents: 2,
                pictures: 0,
                moved: MoveSummary::default(),
            };
            let lines = report.status_lines();
            assert_eq!(lines[0], "Loaded 2 files successfully.");
            assert!(lines[1].contains("AAG 551"));
            assert_eq!(lines[2], "No files moved.");
        }
    }
}
