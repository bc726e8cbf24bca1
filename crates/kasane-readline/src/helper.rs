use std::borrow::Cow::{self, Borrowed, Owned};

use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

use kasane_core::schema::command_specs;

use crate::verb::VERBS;

/// Rustyline helper providing completion, highlighting and hints for console
/// verbs and, after `select`, for command names.
#[derive(Clone)]
pub struct CliHelper {
    verbs: Vec<String>,
    command_names: Vec<String>,
}

impl CliHelper {
    pub fn new() -> Self {
        Self {
            verbs: VERBS.iter().map(|v| v.to_string()).collect(),
            command_names: command_specs().iter().map(|s| s.name.to_string()).collect(),
        }
    }

    /// Candidates for the word ending at the cursor, with its start offset.
    fn candidates<'a>(&'a self, line: &'a str) -> (usize, Vec<&'a String>) {
        if let Some(prefix) = line.strip_prefix("select ") {
            let start = line.len() - prefix.len();
            let matches = self
                .command_names
                .iter()
                .filter(|name| name.starts_with(prefix))
                .collect();
            return (start, matches);
        }

        if line.contains(' ') {
            return (0, Vec::new());
        }
        let matches = self.verbs.iter().filter(|verb| verb.starts_with(line)).collect();
        (0, matches)
    }
}

impl Default for CliHelper {
    fn default() -> Self {
        Self::new()
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, matches) = self.candidates(&line[..pos]);
        let pairs = matches
            .into_iter()
            .map(|candidate| Pair {
                display: candidate.clone(),
                replacement: candidate.clone(),
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        match line.split_once(' ') {
            Some((head, rest)) if self.verbs.iter().any(|v| v == head) => {
                Owned(format!("{} {}", head.bright_cyan(), rest))
            }
            None if self.verbs.iter().any(|v| v == line) => Owned(line.bright_cyan().to_string()),
            _ => Borrowed(line),
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        if pos < line.len() || line.is_empty() {
            return None;
        }
        let (start, matches) = self.candidates(line);
        let typed = &line[start..];
        matches
            .into_iter()
            .find(|candidate| candidate.len() > typed.len())
            .map(|candidate| candidate[typed.len()..].dimmed().to_string())
    }
}

impl Validator for CliHelper {}

/// Helper for the password prompt: echoes every character as `*`.
#[derive(Clone, Default)]
pub struct MaskingHelper;

impl Helper for MaskingHelper {}

impl Completer for MaskingHelper {
    type Candidate = Pair;
}

impl Highlighter for MaskingHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Owned("*".repeat(line.chars().count()))
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for MaskingHelper {
    type Hint = String;
}

impl Validator for MaskingHelper {}
