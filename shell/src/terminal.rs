//! Line input for the shell loop.

use crate::error::ShellError;
use crate::pipeline::STAGE_SEPARATOR;
use crate::registry::CommandRegistry;
use rustyline::completion::{Completer, FilenameCompleter, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use std::sync::Arc;

/// Source of input lines for the shell loop.
pub trait LineReader {
    /// Show `prompt` and block until a full line is read.
    ///
    /// Returns `Ok(None)` when the input ends and the loop should stop.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, ShellError>;
}

/// Completes command names at the start of a stage and file names elsewhere.
pub struct CommandCompleter {
    registry: Arc<CommandRegistry>,
    files: FilenameCompleter,
}

impl CommandCompleter {
    pub fn new(registry: Arc<CommandRegistry>) -> Self {
        Self {
            registry,
            files: FilenameCompleter::new(),
        }
    }

    /// Candidates for the word ending at `pos`, if that word is a command name.
    fn complete_command(&self, line: &str, pos: usize) -> Option<(usize, Vec<Pair>)> {
        let before = &line[..pos];
        let word_start = before
            .rfind(|c: char| c.is_whitespace() || c == STAGE_SEPARATOR)
            .map_or(0, |i| i + 1);
        let stage_start = before.rfind(STAGE_SEPARATOR).map_or(0, |i| i + 1);
        if !before[stage_start..word_start].trim().is_empty() {
            return None;
        }

        let prefix = &before[word_start..];
        let candidates = self
            .registry
            .names()
            .into_iter()
            .filter(|name| name.starts_with(prefix))
            .map(|name| Pair {
                display: name.clone(),
                replacement: name,
            })
            .collect();
        Some((word_start, candidates))
    }
}

impl Completer for CommandCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        match self.complete_command(line, pos) {
            Some(found) => Ok(found),
            None => self.files.complete(line, pos, ctx),
        }
    }
}

impl Hinter for CommandCompleter {
    type Hint = String;
}

impl Highlighter for CommandCompleter {}

impl Validator for CommandCompleter {}

impl Helper for CommandCompleter {}

/// Interactive reader backed by rustyline, with history and completion.
pub struct EditorReader {
    editor: Editor<CommandCompleter, DefaultHistory>,
}

impl EditorReader {
    pub fn new(registry: Arc<CommandRegistry>) -> Result<Self, ShellError> {
        let mut editor = Editor::new()?;
        editor.set_helper(Some(CommandCompleter::new(registry)));
        Ok(Self { editor })
    }
}

impl LineReader for EditorReader {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, ShellError> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    self.editor.add_history_entry(line.as_str())?;
                }
                Ok(Some(line))
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}
