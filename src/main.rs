use claimfiler::cli::{file_claim, Args, Command, ConfigAction, FileArgs};
use claimfiler::config::{ConfigStore, RootConfig, UserPreferences};
use claimfiler::domain::{Classifier, ImageExtensions};
use claimfiler::error::ClaimFilerError;
use claimfiler::logging;
use claimfiler::pickers::PromptPicker;
use claimfiler::platform::{HostEnv, Platform};
use claimfiler::tui::{render, AppSignal, FormApp};

use crossterm::{
    event::{self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::path::Path;
use std::process::ExitCode;
use std::{io, time::Duration};
use tracing::warn;

fn main() -> ExitCode {
    // Parse command line arguments
    let args = Args::parse_args();
    let level = logging::level_for_verbosity(args.verbose);

    let store = match ConfigStore::for_host(Platform::current(), &HostEnv::from_host()) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match args.command {
        Some(command) => {
            logging::init_stderr(level);
            run_command(command, &store)
        }
        None => {
            if let Err(e) = logging::init_file(level, store.dir()) {
                eprintln!("Warning: could not open log file: {}", e);
            }
            match run_form(store) {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    ExitCode::FAILURE
                }
            }
        }
    }
}

/// Loads preferences, falling back to defaults when the file is unreadable
fn load_preferences(dir: &Path) -> UserPreferences {
    UserPreferences::load(dir).unwrap_or_else(|e| {
        warn!(error = %e, "using default preferences");
        UserPreferences::default()
    })
}

fn classifier_for(prefs: &UserPreferences) -> Classifier {
    match &prefs.image_extensions {
        Some(list) => Classifier::new(ImageExtensions::from_list(list)),
        None => Classifier::default(),
    }
}

fn run_command(command: Command, store: &ConfigStore) -> ExitCode {
    let result = match command {
        Command::Config { action } => run_config(action, store),
        Command::File(file) => run_file(&file, store),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_config(action: ConfigAction, store: &ConfigStore) -> claimfiler::Result<ExitCode> {
    match action {
        ConfigAction::Show => match store.load() {
            Ok(root) => {
                println!("{}", root.root_path.display());
                if let Err(e) = root.validate() {
                    eprintln!("Warning: {}", e);
                }
            }
            Err(ClaimFilerError::NotConfigured) => println!("not configured"),
            Err(e) => return Err(e),
        },
        ConfigAction::Path => println!("{}", store.path().display()),
        ConfigAction::Set { directory } => {
            let root = match directory {
                Some(dir) => store.set_root(&dir)?,
                None => store.reassign(&mut PromptPicker::stdio())?,
            };
            println!("{}", root.root_path.display());
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn run_file(args: &FileArgs, store: &ConfigStore) -> claimfiler::Result<ExitCode> {
    let classifier = classifier_for(&load_preferences(store.dir()));
    let mut prompts = PromptPicker::stdio();

    let Some(report) = file_claim(args, store, &classifier, &mut prompts)? else {
        eprintln!("Nothing filed.");
        return Ok(ExitCode::SUCCESS);
    };

    if args.json {
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| ClaimFilerError::Config(format!("Failed to encode report: {}", e)))?;
        println!("{}", json);
    } else {
        for line in report.status_lines() {
            println!("{}", line);
        }
    }

    Ok(if report.moved.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Runs the full-screen intake form
fn run_form(store: ConfigStore) -> io::Result<()> {
    let mut prefs = load_preferences(store.dir());
    let classifier = classifier_for(&prefs);

    // Ask for a root on the plain terminal before the form takes over
    let root: Option<RootConfig> = match store.bootstrap(&mut PromptPicker::stdio()) {
        Ok(root) => Some(root),
        Err(ClaimFilerError::NotConfigured) => None,
        Err(e) => {
            eprintln!("Warning: {}", e);
            None
        }
    };

    let config_dir = store.dir().to_path_buf();
    let mut app = FormApp::new(store, root, classifier, !prefs.welcome_shown);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let result = run_loop(&mut terminal, &mut app, &mut prefs, &config_dir);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    if !app.status.is_empty() {
        println!("{}", app.status);
    }

    result
}

/// Main application loop
fn run_loop<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut FormApp,
    prefs: &mut UserPreferences,
    config_dir: &Path,
) -> io::Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }

        let signal = match event::read()? {
            // Windows reports releases too
            Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
            Event::Paste(text) => {
                app.handle_paste(&text);
                AppSignal::None
            }
            _ => AppSignal::None,
        };

        match signal {
            AppSignal::Quit => break,
            AppSignal::WelcomeDismissed => {
                prefs.welcome_shown = true;
                if let Err(e) = prefs.save(config_dir) {
                    warn!(error = %e, "failed to save preferences");
                }
            }
            AppSignal::None => {}
        }
    }

    Ok(())
}
