use crate::error::ShellError;
use std::fmt;

/// Arguments handed to one command invocation, command name excluded.
///
/// The list is built once per pipeline stage and never changes afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentsList {
    args: Vec<String>,
}

impl ArgumentsList {
    pub fn new(args: Vec<String>) -> Self {
        Self { args }
    }

    /// Number of arguments.
    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Get the argument at `index`.
    ///
    /// Fails with [`ShellError::IndexOutOfRange`] when `index >= len()`.
    pub fn argument_at(&self, index: usize) -> Result<&str, ShellError> {
        self.args
            .get(index)
            .map(String::as_str)
            .ok_or(ShellError::IndexOutOfRange {
                index,
                size: self.args.len(),
            })
    }

    /// Whether `arg` appears verbatim among the arguments.
    pub fn contains(&self, arg: &str) -> bool {
        self.args.iter().any(|a| a == arg)
    }

    /// Value of a flag: with arguments `-pid 2547`, `value_following("-pid")`
    /// returns `Some("2547")`.
    ///
    /// Only the first occurrence of `flag` is considered. Returns `None` when the
    /// flag is missing or is the last argument.
    pub fn value_following(&self, flag: &str) -> Option<&str> {
        let pos = self.args.iter().position(|a| a == flag)?;
        self.args.get(pos + 1).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.args.iter().map(String::as_str)
    }
}

impl From<Vec<String>> for ArgumentsList {
    fn from(args: Vec<String>) -> Self {
        Self::new(args)
    }
}

impl<'a> FromIterator<&'a str> for ArgumentsList {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(str::to_owned).collect())
    }
}

impl fmt::Display for ArgumentsList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.args.join(", "))
    }
}
