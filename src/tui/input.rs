use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Represents the result of handling a key event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Quit the application
    Quit,
    /// Focus the next form field
    NextField,
    /// Focus the previous form field
    PreviousField,
    /// Type a character into the focused field
    Insert(char),
    /// Delete the character before the cursor
    Backspace,
    /// Enter on the focused field
    Enter,
    /// Create the claim directory and move the queued files
    Submit,
    /// Clear the form and the file queues
    ClearForm,
    /// Choose a new claim root directory
    SetRoot,
    /// Toggle help overlay
    Help,
    /// Confirm the open dialog
    Confirm,
    /// Dismiss the open dialog
    Cancel,
    /// No action
    None,
}

/// Maps keyboard events to actions while the form has focus
pub fn handle_key_event(key: KeyEvent) -> KeyAction {
    match (key.code, key.modifiers) {
        // Quit: Esc or Ctrl+C
        (KeyCode::Esc, KeyModifiers::NONE) => KeyAction::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => KeyAction::Quit,

        // Field navigation
        (KeyCode::Tab, KeyModifiers::NONE) => KeyAction::NextField,
        (KeyCode::Down, KeyModifiers::NONE) => KeyAction::NextField,
        (KeyCode::BackTab, _) => KeyAction::PreviousField,
        (KeyCode::Up, KeyModifiers::NONE) => KeyAction::PreviousField,

        // Commands
        (KeyCode::Char('s'), KeyModifiers::CONTROL) => KeyAction::Submit,
        (KeyCode::Char('l'), KeyModifiers::CONTROL) => KeyAction::ClearForm,
        (KeyCode::Char('r'), KeyModifiers::CONTROL) => KeyAction::SetRoot,
        (KeyCode::F(1), _) => KeyAction::Help,

        // Editing
        (KeyCode::Enter, KeyModifiers::NONE) => KeyAction::Enter,
        (KeyCode::Backspace, _) => KeyAction::Backspace,
        (KeyCode::Char(c), KeyModifiers::NONE) => KeyAction::Insert(c),
        (KeyCode::Char(c), KeyModifiers::SHIFT) => KeyAction::Insert(c),

        _ => KeyAction::None,
    }
}

/// Maps keyboard events to confirmation actions
/// Used while a yes/no dialog is open
pub fn handle_confirm_input(key: KeyEvent) -> KeyAction {
    match (key.code, key.modifiers) {
        // Confirm: y or Enter
        (KeyCode::Char('y'), KeyModifiers::NONE) => KeyAction::Confirm,
        (KeyCode::Char('Y'), KeyModifiers::NONE) => KeyAction::Confirm,
        (KeyCode::Char('Y'), KeyModifiers::SHIFT) => KeyAction::Confirm,
        (KeyCode::Enter, KeyModifiers::NONE) => KeyAction::Confirm,

        // Cancel: n or Esc
        (KeyCode::Char('n'), KeyModifiers::NONE) => KeyAction::Cancel,
        (KeyCode::Char('N'), KeyModifiers::NONE) => KeyAction::Cancel,
        (KeyCode::Char('N'), KeyModifiers::SHIFT) => KeyAction::Cancel,
        (KeyCode::Esc, KeyModifiers::NONE) => KeyAction::Cancel,

        _ => KeyAction::None,
    }
}

/// Maps keyboard events while a single line prompt is open
pub fn handle_prompt_input(key: KeyEvent) -> KeyAction {
    match (key.code, key.modifiers) {
        (KeyCode::Enter, KeyModifiers::NONE) => KeyAction::Confirm,
        (KeyCode::Esc, KeyModifiers::NONE) => KeyAction::Cancel,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => KeyAction::Cancel,
        (KeyCode::Backspace, _) => KeyAction::Backspace,
        (KeyCode::Char(c), KeyModifiers::NONE) => KeyAction::Insert(c),
        (KeyCode::Char(c), KeyModifiers::SHIFT) => KeyAction::Insert(c),
        _ => KeyAction::None,
    }
}
