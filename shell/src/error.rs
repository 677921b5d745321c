use rustyline::error::ReadlineError;
use thiserror::Error;

/// Errors surfaced by the shell library itself.
///
/// Failures raised inside command bodies are plain [`anyhow::Error`]s and never
/// reach this type: the pipeline executor reports them and moves on.
#[derive(Debug, Error)]
pub enum ShellError {
    /// An argument was requested past the end of an [`ArgumentsList`](crate::ArgumentsList).
    #[error("argument index {index} is out of range ({size} arguments)")]
    IndexOutOfRange { index: usize, size: usize },

    /// A command with the same name is already registered.
    #[error("a command named '{0}' is already registered")]
    DuplicateName(String),

    /// Reading the next input line failed. Fatal for the shell loop.
    #[error("failed to read input line")]
    Readline(#[from] ReadlineError),

    /// Writing to the terminal failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
