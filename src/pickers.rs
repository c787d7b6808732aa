//! Capabilities for asking the user for directories and files.
//!
//! The core never opens dialogs itself; callers inject an implementation.
//! `PromptPicker` is the line-oriented one used by the CLI, tests supply
//! their own fakes.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

pub trait DirectoryPicker {
    /// Returns `None` when the user cancels
    fn pick_directory(&mut self, prompt: &str) -> Option<PathBuf>;
}

pub trait FilePicker {
    /// Returns `None` when the user cancels
    fn pick_files(&mut self, prompt: &str) -> Option<Vec<PathBuf>>;
}

/// Yes/no questions such as "no files attached, proceed anyway?"
pub trait Confirmer {
    fn confirm(&mut self, question: &str) -> bool;
}

/// Asks on a text stream. An empty answer or end of input means cancel.
pub struct PromptPicker<R, W> {
    input: R,
    output: W,
    home: Option<PathBuf>,
}

impl PromptPicker<io::StdinLock<'static>, io::Stderr> {
    /// Prompts on stderr so stdout stays clean for command output
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr(), dirs::home_dir())
    }
}

impl<R: BufRead, W: Write> PromptPicker<R, W> {
    pub fn new(input: R, output: W, home: Option<PathBuf>) -> Self {
        Self {
            input,
            output,
            home,
        }
    }

    fn ask(&mut self, prompt: &str) -> Option<String> {
        // A broken prompt stream is treated like a cancel
        write!(self.output, "{}: ", prompt).ok()?;
        self.output.flush().ok()?;

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => {
                let answer = line.trim();
                if answer.is_empty() {
                    None
                } else {
                    Some(answer.to_string())
                }
            }
        }
    }
}

impl<R: BufRead, W: Write> DirectoryPicker for PromptPicker<R, W> {
    fn pick_directory(&mut self, prompt: &str) -> Option<PathBuf> {
        let answer = self.ask(prompt)?;
        parse_single_path(&answer, self.home.as_deref())
    }
}

impl<R: BufRead, W: Write> FilePicker for PromptPicker<R, W> {
    fn pick_files(&mut self, prompt: &str) -> Option<Vec<PathBuf>> {
        let answer = self.ask(prompt)?;
        let paths = parse_path_list(&answer, self.home.as_deref());
        if paths.is_empty() {
            None
        } else {
            Some(paths)
        }
    }
}

impl<R: BufRead, W: Write> Confirmer for PromptPicker<R, W> {
    /// Only an explicit yes confirms; cancel and anything else decline
    fn confirm(&mut self, question: &str) -> bool {
        let prompt = format!("{} [y/N]", question);
        matches!(
            self.ask(&prompt).map(|a| a.to_lowercase()).as_deref(),
            Some("y" | "yes")
        )
    }
}

/// Splits typed, pasted or dropped text into paths.
///
/// Whitespace separates paths. Single or double quotes group a path that
/// contains spaces. A backslash escapes a following space or quote (what
/// terminals emit when a file is dragged onto them); any other backslash is
/// kept literally so Windows paths survive. A leading `~` is replaced by `home` when given.
pub fn parse_path_list(text: &str, home: Option<&Path>) -> Vec<PathBuf> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut in_token = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, '\'' | '"') => {
                quote = Some(c);
                in_token = true;
            }
            (None, '\\') if matches!(chars.peek(), Some(' ' | '\'' | '"')) => {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
                in_token = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_token = true;
            }
        }
    }
    if in_token {
        tokens.push(current);
    }

    tokens
        .into_iter()
        .filter(|token| !token.is_empty())
        .map(|token| expand_home(&token, home))
        .collect()
}

/// Reads one path from a line of text.
///
/// Quoting and escapes work as in `parse_path_list`; a line that splits into
/// several words is taken literally as one path containing spaces.
pub fn parse_single_path(text: &str, home: Option<&Path>) -> Option<PathBuf> {
    let mut paths = parse_path_list(text, home);
    match paths.len() {
        0 => None,
        1 => paths.pop(),
        _ => Some(expand_home(text.trim(), home)),
    }
}

fn expand_home(token: &str, home: Option<&Path>) -> PathBuf {
    match (home, token.strip_prefix('~')) {
        (Some(home), Some("")) => home.to_path_buf(),
        (Some(home), Some(rest)) if rest.starts_with('/') || rest.starts_with('\\') => {
            home.join(&rest[1..])
        }
        _ => PathBuf::from(token),
    }
}
