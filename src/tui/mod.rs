// TUI module for rendering the intake form
pub mod app;
pub mod colors;
pub mod input;

// Re-exports
pub use app::{AppSignal, Field, FormApp, FormState, ViewState};
pub use colors::*;
pub use input::{handle_confirm_input, handle_key_event, handle_prompt_input, KeyAction};

use crate::domain::FormField;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use std::path::PathBuf;

/// Renders the form and whichever overlay the view state asks for
pub fn render(frame: &mut Frame, app: &FormApp) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Form and queues
            Constraint::Length(3), // Status
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    render_header(frame, chunks[0], app);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[1]);
    render_fields(frame, body[0], app);
    render_queues(frame, body[1], app);

    render_status(frame, chunks[2], app);
    render_footer(frame, chunks[3]);

    match &app.view {
        ViewState::Form => {}
        ViewState::Help => render_help_overlay(frame),
        ViewState::Welcome => render_welcome_overlay(frame),
        ViewState::ConfirmNoFiles => render_confirm_no_files_overlay(frame),
        ViewState::MissingFields(fields) => render_missing_fields_overlay(frame, fields),
        ViewState::RootPrompt(text) => render_root_prompt_overlay(frame, text),
    }
}

fn panel(title: &str) -> Block<'_> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_COLOR))
}

fn render_header(frame: &mut Frame, area: Rect, app: &FormApp) {
    let root = match app.root() {
        Some(root) => Span::styled(
            root.root_path.display().to_string(),
            Style::default().fg(TEXT_PRIMARY),
        ),
        None => Span::styled("not configured", Style::default().fg(ACCENT_PRIMARY)),
    };

    let line = Line::from(vec![
        Span::styled(
            " Claim Intake ",
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled("Root: ", Style::default().fg(TEXT_SECONDARY)),
        root,
    ]);

    frame.render_widget(Paragraph::new(line).block(panel("")), area);
}

fn render_fields(frame: &mut Frame, area: Rect, app: &FormApp) {
    let mut lines = vec![Line::from("")];

    for field in Field::ALL {
        let focused = app.form.focus == field;
        let marker = if field.is_required() { "*" } else { " " };
        let label_style = if focused {
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(TEXT_SECONDARY)
        };

        let mut value = app.form.value(field);
        if field == Field::DamageType && value.is_empty() {
            value = "(space to choose)".to_string();
        }
        if focused {
            value.push('_');
        }

        lines.push(Line::from(vec![
            Span::styled(format!(" {}{:<17}", marker, field.label()), label_style),
            Span::styled(value, Style::default().fg(TEXT_PRIMARY)),
        ]));
        lines.push(Line::from(""));
    }

    let claim_line = match app.session.claim_dir() {
        Some(dir) => format!(" Claim folder: {}", dir.display()),
        None => " Claim folder: (not created yet)".to_string(),
    };
    lines.push(Line::from(Span::styled(
        claim_line,
        Style::default().fg(TEXT_SECONDARY),
    )));

    let paragraph = Paragraph::new(lines)
        .block(panel(" Claim "))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn queue_lines<'a>(title: &'a str, paths: &[PathBuf]) -> Vec<Line<'a>> {
    let mut lines = vec![Line::from(Span::styled(
        format!("{} ({})", title, paths.len()),
        Style::default()
            .fg(ACCENT_HIGHLIGHT)
            .add_modifier(Modifier::BOLD),
    ))];
    for path in paths {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        lines.push(Line::from(Span::styled(
            format!("  {}", name),
            Style::default().fg(TEXT_PRIMARY),
        )));
    }
    lines
}

fn render_queues(frame: &mut Frame, area: Rect, app: &FormApp) {
    let mut lines = queue_lines("Documents", app.session.documents());
    lines.push(Line::from(""));
    lines.extend(queue_lines("Pictures", app.session.pictures()));

    if !app.session.has_queued_files() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Drop files here or type paths",
            Style::default()
                .fg(TEXT_SECONDARY)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    let paragraph = Paragraph::new(lines).block(panel(" Queued files "));
    frame.render_widget(paragraph, area);
}

fn render_status(frame: &mut Frame, area: Rect, app: &FormApp) {
    let status = Paragraph::new(app.status.as_str())
        .block(panel(" Status "))
        .style(Style::default().fg(TEXT_PRIMARY));
    frame.render_widget(status, area);
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(ACCENT_HIGHLIGHT));
    let label = |l: &'static str| Span::styled(l, Style::default().fg(TEXT_SECONDARY));

    let controls = Line::from(vec![
        key("Tab "),
        label("Next"),
        Span::raw("  │  "),
        key("^S "),
        label("Create"),
        Span::raw("  │  "),
        key("^L "),
        label("Clear"),
        Span::raw("  │  "),
        key("^R "),
        label("Root"),
        Span::raw("  │  "),
        key("F1 "),
        label("Help"),
        Span::raw("  │  "),
        key("Esc "),
        label("Quit"),
    ]);

    let footer = Paragraph::new(controls)
        .block(panel(""))
        .alignment(Alignment::Center);
    frame.render_widget(footer, area);
}

/// Frame for a dialog centered over the form; returns the inner area
fn dialog(frame: &mut Frame, title: &str, percent_x: u16, percent_y: u16) -> Rect {
    let area = centered_rect(percent_x, percent_y, frame.area());

    // Clear background
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(title)
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(ACCENT_HIGHLIGHT))
        .style(Style::default().bg(BG_DARK));

    let inner = block.inner(area);
    frame.render_widget(block, area);
    inner
}

/// Renders the help overlay
pub fn render_help_overlay(frame: &mut Frame) {
    let inner = dialog(frame, " Help ", 60, 70);

    let row = |k: &'static str, what: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<12}", k), Style::default().fg(ACCENT_SECONDARY)),
            Span::raw(what),
        ])
    };

    let help_lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        row("Tab / ↓", "Next field"),
        row("Shift+Tab / ↑", "Previous field"),
        row("Enter", "Queue typed paths"),
        row("Space", "Choose damage type"),
        row("Ctrl+S", "Create claim folder"),
        row("Ctrl+L", "Clear form"),
        row("Ctrl+R", "Set claim root"),
        row("Esc", "Quit"),
        Line::from(""),
        Line::from(Span::styled(
            "Drag files onto the terminal to queue them.",
            Style::default().fg(TEXT_SECONDARY),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to close",
            Style::default().fg(TEXT_SECONDARY),
        )),
    ];

    let paragraph = Paragraph::new(help_lines).style(Style::default().fg(TEXT_PRIMARY));
    frame.render_widget(paragraph, inner);
}

/// Renders the welcome dialog overlay
pub fn render_welcome_overlay(frame: &mut Frame) {
    let inner = dialog(frame, " Welcome ", 70, 60);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Welcome to claimfiler",
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("1. Fill in the claim. Fields marked * are required."),
        Line::from("2. Drop files onto the terminal or type their paths."),
        Line::from("3. Press Ctrl+S to create the claim folder."),
        Line::from(""),
        Line::from("Pictures go into a Pictures folder, everything else"),
        Line::from("next to it. Your original files are left in place."),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to start",
            Style::default().fg(TEXT_SECONDARY),
        )),
    ];

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .style(Style::default().fg(TEXT_PRIMARY))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, inner);
}

fn yes_no_line() -> Line<'static> {
    Line::from(vec![
        Span::styled("[Y]", Style::default().fg(ACCENT_SECONDARY)),
        Span::raw("es  "),
        Span::styled("[Enter]", Style::default().fg(ACCENT_SECONDARY)),
        Span::raw("     "),
        Span::styled("[N]", Style::default().fg(ACCENT_PRIMARY)),
        Span::raw("o  "),
        Span::styled("[Esc]", Style::default().fg(ACCENT_PRIMARY)),
    ])
}

/// Renders the "no files attached" confirmation
pub fn render_confirm_no_files_overlay(frame: &mut Frame) {
    let inner = dialog(frame, " No Files ", 60, 50);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "No files or pictures have been added.",
            Style::default()
                .fg(TEXT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Create the claim folder anyway?"),
        Line::from(Span::styled(
            "You will have to add files manually later.",
            Style::default().fg(TEXT_SECONDARY),
        )),
        Line::from(""),
        yes_no_line(),
    ];

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .style(Style::default().fg(TEXT_PRIMARY))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, inner);
}

/// Renders the list of required fields that still need a value
pub fn render_missing_fields_overlay(frame: &mut Frame, fields: &[FormField]) {
    let inner = dialog(frame, " Required Fields ", 60, 50);

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Fill in each field marked with '*' before proceeding.",
            Style::default()
                .fg(TEXT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    for field in fields {
        lines.push(Line::from(Span::styled(
            format!("• {}", field.label()),
            Style::default().fg(ACCENT_PRIMARY),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press any key to continue",
        Style::default().fg(TEXT_SECONDARY),
    )));

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, inner);
}

/// Renders the prompt for a new claim root directory
pub fn render_root_prompt_overlay(frame: &mut Frame, text: &str) {
    let inner = dialog(frame, " Claim Root ", 70, 40);

    let lines = vec![
        Line::from(""),
        Line::from("Directory to create claim folders in:"),
        Line::from(""),
        Line::from(Span::styled(
            format!("{}_", text),
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Enter to save, Esc to cancel",
            Style::default().fg(TEXT_SECONDARY),
        )),
    ];

    let paragraph = Paragraph::new(lines)
        .style(Style::default().fg(TEXT_PRIMARY))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, inner);
}

/// Helper to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
