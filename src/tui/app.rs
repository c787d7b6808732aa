//! State and behaviour of the intake form, independent of drawing

use super::input::{handle_confirm_input, handle_key_event, handle_prompt_input, KeyAction};
use crate::config::{ConfigStore, RootConfig};
use crate::domain::{ClaimForm, ClaimIdentity, ClaimSession, Classifier, DamageType, FormField};
use crate::error::ClaimFilerError;
use crate::pickers::{parse_path_list, parse_single_path};
use crossterm::event::KeyEvent;
use std::path::PathBuf;
use tracing::info;

/// Focusable rows of the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Field {
    #[default]
    FirstName,
    LastName,
    LossDate,
    DamageType,
    ClaimNumber,
    Files,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::FirstName,
        Field::LastName,
        Field::LossDate,
        Field::DamageType,
        Field::ClaimNumber,
        Field::Files,
    ];

    fn index(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn form_field(self) -> Option<FormField> {
        match self {
            Field::FirstName => Some(FormField::FirstName),
            Field::LastName => Some(FormField::LastName),
            Field::LossDate => Some(FormField::LossDate),
            Field::DamageType => Some(FormField::DamageType),
            Field::ClaimNumber => Some(FormField::ClaimNumber),
            Field::Files => None,
        }
    }

    pub fn label(self) -> &'static str {
        self.form_field().map_or("Add files", |f| f.label())
    }

    pub fn is_required(self) -> bool {
        self.form_field().is_some_and(|f| f.is_required())
    }
}

/// Text typed into the form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub first_name: String,
    pub last_name: String,
    pub loss_date: String,
    pub damage: Option<DamageType>,
    pub claim_number: String,
    /// Paths typed on the file line, not yet queued
    pub file_input: String,
    pub focus: Field,
}

impl FormState {
    fn text_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::FirstName => Some(&mut self.first_name),
            Field::LastName => Some(&mut self.last_name),
            Field::LossDate => Some(&mut self.loss_date),
            Field::ClaimNumber => Some(&mut self.claim_number),
            Field::Files => Some(&mut self.file_input),
            Field::DamageType => None,
        }
    }

    /// Display text of a field
    pub fn value(&self, field: Field) -> String {
        match field {
            Field::FirstName => self.first_name.clone(),
            Field::LastName => self.last_name.clone(),
            Field::LossDate => self.loss_date.clone(),
            Field::DamageType => self.damage.map(|d| d.to_string()).unwrap_or_default(),
            Field::ClaimNumber => self.claim_number.clone(),
            Field::Files => self.file_input.clone(),
        }
    }

    pub fn insert(&mut self, c: char) {
        if let Some(text) = self.text_mut(self.focus) {
            text.push(c);
        } else if c == ' ' {
            self.damage = DamageType::cycle(self.damage);
        }
    }

    pub fn backspace(&mut self) {
        match self.text_mut(self.focus) {
            Some(text) => {
                text.pop();
            }
            None => self.damage = None,
        }
    }

    pub fn claim_form(&self) -> ClaimForm {
        ClaimForm {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            loss_date: self.loss_date.clone(),
            damage_type: self.value(Field::DamageType),
            claim_number: self.claim_number.clone(),
        }
    }
}

/// UI view state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    /// The form itself
    Form,
    /// Help overlay visible
    Help,
    /// Welcome screen shown on first launch
    Welcome,
    /// "No files attached, proceed anyway?"
    ConfirmNoFiles,
    /// Required fields are empty or invalid
    MissingFields(Vec<FormField>),
    /// Typing a new claim root directory
    RootPrompt(String),
}

/// What the event loop has to do after an input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppSignal {
    None,
    Quit,
    /// The welcome screen was closed and should not be shown again
    WelcomeDismissed,
}

/// The intake form: field text, the claim session and the configured root
#[derive(Debug)]
pub struct FormApp {
    pub form: FormState,
    pub session: ClaimSession,
    pub view: ViewState,
    /// Result of the last operation, shown in the status bar
    pub status: String,
    classifier: Classifier,
    store: ConfigStore,
    root: Option<RootConfig>,
    pending: Option<ClaimIdentity>,
    home: Option<PathBuf>,
}

impl FormApp {
    pub fn new(
        store: ConfigStore,
        root: Option<RootConfig>,
        classifier: Classifier,
        show_welcome: bool,
    ) -> Self {
        let status = match &root {
            Some(root) => format!("Claim directory: {}", root.root_path.display()),
            None => "No claim directory configured. Press Ctrl+R to choose one.".to_string(),
        };

        Self {
            form: FormState::default(),
            session: ClaimSession::new(),
            view: if show_welcome {
                ViewState::Welcome
            } else {
                ViewState::Form
            },
            status,
            classifier,
            store,
            root,
            pending: None,
            home: dirs::home_dir(),
        }
    }

    pub fn root(&self) -> Option<&RootConfig> {
        self.root.as_ref()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> AppSignal {
        match self.view.clone() {
            ViewState::Welcome => {
                self.view = ViewState::Form;
                AppSignal::WelcomeDismissed
            }
            ViewState::Help | ViewState::MissingFields(_) => {
                self.view = ViewState::Form;
                AppSignal::None
            }
            ViewState::ConfirmNoFiles => {
                match handle_confirm_input(key) {
                    KeyAction::Confirm => {
                        self.view = ViewState::Form;
                        if let Some(identity) = self.pending.take() {
                            self.file_claim(&identity);
                        }
                    }
                    KeyAction::Cancel => {
                        self.view = ViewState::Form;
                        self.pending = None;
                    }
                    _ => {}
                }
                AppSignal::None
            }
            ViewState::RootPrompt(mut text) => {
                match handle_prompt_input(key) {
                    KeyAction::Confirm => {
                        self.view = ViewState::Form;
                        self.apply_root(&text);
                    }
                    KeyAction::Cancel => self.view = ViewState::Form,
                    KeyAction::Insert(c) => {
                        text.push(c);
                        self.view = ViewState::RootPrompt(text);
                    }
                    KeyAction::Backspace => {
                        text.pop();
                        self.view = ViewState::RootPrompt(text);
                    }
                    _ => {}
                }
                AppSignal::None
            }
            ViewState::Form => self.handle_form_key(key),
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> AppSignal {
        match handle_key_event(key) {
            KeyAction::Quit => return AppSignal::Quit,
            KeyAction::NextField => self.form.focus = self.form.focus.next(),
            KeyAction::PreviousField => self.form.focus = self.form.focus.previous(),
            KeyAction::Insert(c) => self.form.insert(c),
            KeyAction::Backspace => self.form.backspace(),
            KeyAction::Enter => match self.form.focus {
                Field::Files => {
                    let typed = std::mem::take(&mut self.form.file_input);
                    self.add_paths(parse_path_list(&typed, self.home.as_deref()));
                }
                Field::DamageType => self.form.damage = DamageType::cycle(self.form.damage),
                other => self.form.focus = other.next(),
            },
            KeyAction::Submit => self.submit(),
            KeyAction::ClearForm => self.clear(),
            KeyAction::SetRoot => {
                let current = self
                    .root
                    .as_ref()
                    .map(|r| r.root_path.display().to_string())
                    .unwrap_or_default();
                self.view = ViewState::RootPrompt(current);
            }
            KeyAction::Help => self.view = ViewState::Help,
            KeyAction::Confirm | KeyAction::Cancel | KeyAction::None => {}
        }
        AppSignal::None
    }

    /// Handles a bracketed paste, which is how terminals deliver dropped files
    pub fn handle_paste(&mut self, text: &str) {
        match &mut self.view {
            ViewState::RootPrompt(prompt) => prompt.push_str(text.trim()),
            ViewState::Form => {
                let paths = parse_path_list(text, self.home.as_deref());
                self.add_paths(paths);
            }
            _ => {}
        }
    }

    /// Queues files picked, typed or dropped by the clerk
    pub fn add_paths(&mut self, paths: Vec<PathBuf>) {
        if paths.is_empty() {
            self.status = "No file paths found in the input.".to_string();
            return;
        }
        let summary = self.session.add_files(&self.classifier, paths);
        self.status = summary.to_string();
    }

    /// The create button: validate, confirm when nothing is queued, then
    /// provision and move
    pub fn submit(&mut self) {
        let identity = match self.form.claim_form().validate() {
            Ok(identity) => identity,
            Err(fields) => {
                self.view = ViewState::MissingFields(fields);
                return;
            }
        };

        if self.session.has_queued_files() {
            self.file_claim(&identity);
        } else {
            self.pending = Some(identity);
            self.view = ViewState::ConfirmNoFiles;
        }
    }

    fn file_claim(&mut self, identity: &ClaimIdentity) {
        let Some(root) = self.root.clone() else {
            self.status = ClaimFilerError::NotConfigured.to_string();
            self.view = ViewState::RootPrompt(String::new());
            return;
        };

        let dir = match self.session.provision(&root, identity) {
            Ok(dir) => dir,
            Err(e @ ClaimFilerError::RootMissing(_)) => {
                self.status = e.to_string();
                self.view = ViewState::RootPrompt(root.root_path.display().to_string());
                return;
            }
            Err(e) => {
                self.status = e.to_string();
                return;
            }
        };

        if !self.session.has_queued_files() {
            self.status = format!("Claim directory ready: {}. No files moved.", dir.display());
            return;
        }

        self.status = match self.session.move_queued() {
            Ok(summary) => summary.to_string(),
            Err(e) => e.to_string(),
        };
    }

    fn apply_root(&mut self, text: &str) {
        let Some(path) = parse_single_path(text, self.home.as_deref()) else {
            self.status = "Claim directory unchanged.".to_string();
            return;
        };

        match self.store.set_root(&path) {
            Ok(root) => {
                info!(root = %root.root_path.display(), "claim root changed from the form");
                self.status = format!("Set claim directory to {}", root.root_path.display());
                self.root = Some(root);
            }
            Err(e) => self.status = e.to_string(),
        }
    }

    /// Clears the form, the queues and the status text
    pub fn clear(&mut self) {
        self.form = FormState::default();
        self.session.clear();
        self.pending = None;
        self.status.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_text(app: &mut FormApp, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    struct Fixture {
        temp: TempDir,
        root: PathBuf,
    }

    impl Fixture {
        fn new() -> Self {
            let temp = TempDir::new().unwrap();
            let root = temp.path().join("claims");
            fs::create_dir(&root).unwrap();
            Self { temp, root }
        }

        fn store(&self) -> ConfigStore {
            ConfigStore::new(self.temp.path().join("config").join("rootdir.txt"))
        }

        fn app(&self) -> FormApp {
            FormApp::new(
                self.store(),
                Some(RootConfig::new(&self.root)),
                Classifier::default(),
                false,
            )
        }

        fn file(&self, name: &str) -> PathBuf {
            let path = self.temp.path().join(name);
            fs::write(&path, name.as_bytes()).unwrap();
            path
        }
    }

    fn fill_john_doe(app: &mut FormApp) {
        app.form.first_name = "John".to_string();
        app.form.last_name = "Doe".to_string();
        app.form.loss_date = "03.05.2024".to_string();
        app.form.claim_number = "551".to_string();
    }

    mod field_tests {
        use super::*;

        #[test]
        fn test_field_cycle() {
            assert_eq!(Field::FirstName.next(), Field::LastName);
            assert_eq!(Field::Files.next(), Field::FirstName);
            assert_eq!(Field::FirstName.previous(), Field::Files);
        }

        #[test]
        fn test_field_labels() {
            assert_eq!(Field::LastName.label(), "Last name");
            assert_eq!(Field::Files.label(), "Add files");
            assert!(Field::ClaimNumber.is_required());
            assert!(!Field::Files.is_required());
        }

        #[test]
        fn test_damage_field_cycles_on_space() {
            let mut form = FormState {
                focus: Field::DamageType,
                ..FormState::default()
            };
            form.insert(' ');
            assert_eq!(form.damage, Some(DamageType::Water));
            form.insert('x');
            assert_eq!(form.damage, Some(DamageType::Water));
            form.backspace();
            assert_eq!(form.damage, None);
        }
    }

    mod form_tests {
        use super::*;

        #[test]
        fn test_typing_and_navigation() {
            let fx = Fixture::new();
            let mut app = fx.app();

            type_text(&mut app, "John");
            app.handle_key(key(KeyCode::Tab));
            type_text(&mut app, "Doe");
            app.handle_key(key(KeyCode::Backspace));

            assert_eq!(app.form.first_name, "John");
            assert_eq!(app.form.last_name, "Do");
            assert_eq!(app.form.focus, Field::LastName);
        }

        #[test]
        fn test_escape_quits() {
            let fx = Fixture::new();
            let mut app = fx.app();
            assert_eq!(app.handle_key(key(KeyCode::Esc)), AppSignal::Quit);
        }

        #[test]
        fn test_welcome_dismissed_by_any_key() {
            let fx = Fixture::new();
            let mut app = FormApp::new(fx.store(), None, Classifier::default(), true);
            assert_eq!(app.view, ViewState::Welcome);

            let signal = app.handle_key(key(KeyCode::Char('x')));

            assert_eq!(signal, AppSignal::WelcomeDismissed);
            assert_eq!(app.view, ViewState::Form);
            assert!(app.form.first_name.is_empty());
        }

        #[test]
        fn test_enter_on_file_line_queues_paths() {
            let fx = Fixture::new();
            let mut app = fx.app();
            app.form.focus = Field::Files;
            app.form.file_input = "/in/a.pdf /in/b.png".to_string();

            app.handle_key(key(KeyCode::Enter));

            assert!(app.form.file_input.is_empty());
            assert_eq!(app.session.documents(), &[PathBuf::from("/in/a.pdf")]);
            assert_eq!(app.session.pictures(), &[PathBuf::from("/in/b.png")]);
            assert_eq!(app.status, "Loaded 1 pictures and 1 other files successfully.");
        }

        #[test]
        fn test_paste_is_a_drop() {
            let fx = Fixture::new();
            let mut app = fx.app();

            app.handle_paste("'/in/roof photo.jpg'\n'/in/deck.png'");
            app.handle_paste("/in/estimate.pdf");

            assert_eq!(app.session.pictures().len(), 2);
            assert_eq!(app.session.documents().len(), 1);
            assert_eq!(app.status, "Loaded 2 pictures and 1 other files successfully.");
        }

        #[test]
        fn test_empty_paste() {
            let fx = Fixture::new();
            let mut app = fx.app();
            app.handle_paste("  \n");
            assert!(!app.session.has_queued_files());
            assert_eq!(app.status, "No file paths found in the input.");
        }

        #[test]
        fn test_clear_form() {
            let fx = Fixture::new();
            let mut app = fx.app();
            fill_john_doe(&mut app);
            app.handle_paste("/in/a.pdf");

            app.handle_key(ctrl('l'));

            assert_eq!(app.form, FormState::default());
            assert!(!app.session.has_queued_files());
            assert!(app.status.is_empty());
        }
    }

    mod submit_tests {
        use super::*;

        #[test]
        fn test_missing_fields_dialog() {
            let fx = Fixture::new();
            let mut app = fx.app();
            app.form.first_name = "John".to_string();

            app.handle_key(ctrl('s'));

            assert_eq!(
                app.view,
                ViewState::MissingFields(vec![
                    FormField::LastName,
                    FormField::LossDate,
                    FormField::ClaimNumber
                ])
            );
            app.handle_key(key(KeyCode::Enter));
            assert_eq!(app.view, ViewState::Form);
            assert_eq!(fs::read_dir(&fx.root).unwrap().count(), 0);
        }

        #[test]
        fn test_submit_moves_files() {
            let fx = Fixture::new();
            let mut app = fx.app();
            fill_john_doe(&mut app);
            let doc = fx.file("estimate.pdf");
            let pic = fx.file("roof.bmp");
            app.add_paths(vec![doc, pic]);

            app.handle_key(ctrl('s'));

            let dir = fx.root.join("Doe John 03.05.2024 AAG 551");
            assert!(dir.join("estimate.pdf").is_file());
            assert!(dir.join("Pictures").join("roof.bmp").is_file());
            assert_eq!(app.status, "Files migrated successfully (2 copied).");
            assert!(!app.session.has_queued_files());
            assert_eq!(app.session.claim_dir(), Some(dir.as_path()));
        }

        #[test]
        fn test_no_files_confirmed() {
            let fx = Fixture::new();
            let mut app = fx.app();
            fill_john_doe(&mut app);

            app.handle_key(ctrl('s'));
            assert_eq!(app.view, ViewState::ConfirmNoFiles);
            assert_eq!(fs::read_dir(&fx.root).unwrap().count(), 0);

            app.handle_key(key(KeyCode::Char('y')));

            assert_eq!(app.view, ViewState::Form);
            assert!(fx.root.join("Doe John 03.05.2024 AAG 551").is_dir());
            assert!(app.status.contains("No files moved"));
        }

        #[test]
        fn test_no_files_declined() {
            let fx = Fixture::new();
            let mut app = fx.app();
            fill_john_doe(&mut app);

            app.handle_key(ctrl('s'));
            app.handle_key(key(KeyCode::Esc));

            assert_eq!(app.view, ViewState::Form);
            assert_eq!(fs::read_dir(&fx.root).unwrap().count(), 0);
        }

        #[test]
        fn test_submit_without_root_opens_prompt() {
            let fx = Fixture::new();
            let mut app = FormApp::new(fx.store(), None, Classifier::default(), false);
            fill_john_doe(&mut app);
            app.handle_paste("/in/a.pdf");

            app.handle_key(ctrl('s'));

            assert_eq!(app.view, ViewState::RootPrompt(String::new()));
            assert_eq!(app.status, ClaimFilerError::NotConfigured.to_string());
            // Nothing was attempted, so the queue is still there
            assert!(app.session.has_queued_files());
        }

        #[test]
        fn test_missing_root_opens_prompt() {
            let fx = Fixture::new();
            let mut app = fx.app();
            fs::remove_dir(&fx.root).unwrap();
            fill_john_doe(&mut app);
            app.handle_paste("/in/a.pdf");

            app.handle_key(ctrl('s'));

            assert!(matches!(app.view, ViewState::RootPrompt(_)));
            assert!(app.status.contains("does not exist"));
            assert!(!fx.root.exists());
        }
    }

    mod root_prompt_tests {
        use super::*;

        #[test]
        fn test_set_root_from_prompt() {
            let fx = Fixture::new();
            let mut app = FormApp::new(fx.store(), None, Classifier::default(), false);
            let new_root = fx.temp.path().join("other root");
            fs::create_dir(&new_root).unwrap();

            app.handle_key(ctrl('r'));
            app.handle_paste(&new_root.display().to_string());
            app.handle_key(key(KeyCode::Enter));

            assert_eq!(app.view, ViewState::Form);
            assert_eq!(app.root(), Some(&RootConfig::new(&new_root)));
            assert_eq!(fx.store().load().unwrap().root_path, new_root);
        }

        #[test]
        fn test_prompt_starts_with_current_root() {
            let fx = Fixture::new();
            let mut app = fx.app();

            app.handle_key(ctrl('r'));

            assert_eq!(
                app.view,
                ViewState::RootPrompt(fx.root.display().to_string())
            );
        }

        #[test]
        fn test_prompt_typing_and_cancel() {
            let fx = Fixture::new();
            let mut app = fx.app();
            app.view = ViewState::RootPrompt(String::new());

            type_text(&mut app, "/x");
            app.handle_key(key(KeyCode::Backspace));
            assert_eq!(app.view, ViewState::RootPrompt("/".to_string()));

            app.handle_key(key(KeyCode::Esc));
            assert_eq!(app.view, ViewState::Form);
            assert_eq!(app.root(), Some(&RootConfig::new(&fx.root)));
        }

        #[test]
        fn test_prompt_rejects_missing_directory() {
            let fx = Fixture::new();
            let mut app = fx.app();
            let missing = fx.temp.path().join("missing");
            app.view = ViewState::RootPrompt(missing.display().to_string());

            app.handle_key(key(KeyCode::Enter));

            assert!(app.status.contains("does not exist"));
            assert_eq!(app.root(), Some(&RootConfig::new(&fx.root)));
            assert!(!Path::new(fx.store().path()).exists());
        }
    }
}
