//! Commands shipped with the crate.
//!
//! None of them are registered automatically; hosts pick what they need or call
//! [`register_builtins`] to get the whole set.

use crate::arguments::ArgumentsList;
use crate::buffer::ShellBuffer;
use crate::command::Command;
use crate::error::ShellError;
use crate::io_adapters::Output;
use crate::registry::CommandRegistry;
use anyhow::{Context, Result, bail};
use argh::{EarlyExit, FromArgs};
use regex::{Regex, RegexBuilder};
use std::fs;
use std::io::{BufRead, BufReader};
use std::sync::{Arc, Weak};

/// Register every builtin command into `registry`.
pub fn register_builtins(registry: &Arc<CommandRegistry>) -> Result<(), ShellError> {
    registry.register(Arc::new(Cat))?;
    registry.register(Arc::new(Echo))?;
    registry.register(Arc::new(Grep))?;
    registry.register(Arc::new(Wc))?;
    registry.register(Arc::new(Help::new(registry)))?;
    registry.register(Arc::new(Exit))?;
    Ok(())
}

fn read_lines(path: &str) -> Result<Vec<String>> {
    let file = fs::File::open(path).with_context(|| format!("{}: cannot open", path))?;
    BufReader::new(file)
        .lines()
        .collect::<std::io::Result<Vec<_>>>()
        .with_context(|| format!("{}: read error", path))
}

/// Print files line by line, or pass the piped input through.
pub struct Cat;

impl Command for Cat {
    fn name(&self) -> &str {
        "cat"
    }

    fn help_text(&self) -> String {
        "cat [FILE]... - prints the content of files, or the piped input when no file is given"
            .to_string()
    }

    fn run(
        &self,
        args: &ArgumentsList,
        input: Option<&ShellBuffer>,
        output: &mut dyn Output,
    ) -> Result<()> {
        if args.is_empty() {
            match input {
                Some(buf) => {
                    for line in buf {
                        output.println(line)?;
                    }
                }
                None => output.println("No file to print")?,
            }
            return Ok(());
        }

        for path in args.iter() {
            for line in read_lines(path)? {
                output.println(&line)?;
            }
        }
        Ok(())
    }
}

/// Parse `args` into `T` the way argh parses a command line.
///
/// Returns `Ok(None)` when argh asked for its usage text (`--help`); the text has
/// already been printed to `output` then.
fn parse_args<T: FromArgs>(
    name: &str,
    args: &ArgumentsList,
    output: &mut dyn Output,
) -> Result<Option<T>> {
    let argv: Vec<&str> = args.iter().collect();
    match T::from_args(&[name], &argv) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(EarlyExit { output: text, status }) => {
            if status.is_err() {
                bail!("{}", text.trim_end());
            }
            output.println(text.trim_end())?;
            Ok(None)
        }
    }
}

/// Write the arguments separated by spaces.
pub struct Echo;

#[derive(FromArgs)]
/// write the arguments separated by spaces.
struct EchoArgs {
    #[argh(switch, short = 'n')]
    /// do not output the trailing newline.
    no_newline: bool,

    #[argh(positional, greedy)]
    /// values to print as-is, separated by spaces.
    words: Vec<String>,
}

impl Command for Echo {
    fn name(&self) -> &str {
        "echo"
    }

    fn help_text(&self) -> String {
        "echo [-n] [WORD]... - prints the words separated by spaces; -n omits the line end"
            .to_string()
    }

    fn run(
        &self,
        args: &ArgumentsList,
        _input: Option<&ShellBuffer>,
        output: &mut dyn Output,
    ) -> Result<()> {
        let Some(echo) = parse_args::<EchoArgs>(self.name(), args, output)? else {
            return Ok(());
        };
        let s = echo.words.join(" ");
        if echo.no_newline {
            output.print(&s)?;
        } else {
            output.println(&s)?;
        }
        Ok(())
    }
}

/// Print lines matching a regular expression.
pub struct Grep;

#[derive(FromArgs)]
/// print lines matching a pattern
struct GrepOptions {
    #[argh(switch, short = 'w')]
    /// match only whole words (using non-word characters as boundaries)
    word_regexp: bool,

    #[argh(switch, short = 'i')]
    /// ignore case distinctions
    ignore_case: bool,

    #[argh(option, short = 'A', default = "0")]
    /// print NUM lines of trailing context after matching lines
    after_context: usize,

    #[argh(positional)]
    /// the pattern to search for (a regular expression)
    pattern: String,

    #[argh(positional)]
    /// files to search; the piped input is used when none are given
    files: Vec<String>,
}

impl GrepOptions {
    fn regex(&self) -> Result<Regex> {
        let pattern = if self.word_regexp {
            format!(r"\b({})\b", self.pattern)
        } else {
            self.pattern.to_string()
        };

        RegexBuilder::new(&pattern)
            .case_insensitive(self.ignore_case)
            .build()
            .with_context(|| format!("invalid regex pattern: {}", pattern))
    }

    fn write_matches(
        &self,
        lines: &[String],
        prefix: &str,
        re: &Regex,
        output: &mut dyn Output,
    ) -> std::io::Result<()> {
        let mut to_print = vec![false; lines.len()];
        for (i, line) in lines.iter().enumerate() {
            if re.is_match(line) {
                let end = i
                    .saturating_add(self.after_context)
                    .saturating_add(1)
                    .min(lines.len());
                to_print[i..end].fill(true);
            }
        }

        let mut last_printed: Option<usize> = None;
        for (i, line) in lines.iter().enumerate() {
            if !to_print[i] {
                continue;
            }
            if self.after_context > 0 && last_printed.is_some_and(|last| i > last + 1) {
                output.println("--")?;
            }
            output.println(&format!("{}{}", prefix, line))?;
            last_printed = Some(i);
        }
        Ok(())
    }
}

impl Command for Grep {
    fn name(&self) -> &str {
        "grep"
    }

    fn help_text(&self) -> String {
        "grep [-i] [-w] [-A NUM] PATTERN [FILE]... - prints lines matching PATTERN \
         from the files or the piped input"
            .to_string()
    }

    fn run(
        &self,
        args: &ArgumentsList,
        input: Option<&ShellBuffer>,
        output: &mut dyn Output,
    ) -> Result<()> {
        let Some(options) = parse_args::<GrepOptions>(self.name(), args, output)? else {
            return Ok(());
        };
        let re = options.regex()?;

        if options.files.is_empty() {
            if let Some(buf) = input {
                options.write_matches(buf.lines(), "", &re, output)?;
            }
            return Ok(());
        }

        for file_name in &options.files {
            match read_lines(file_name) {
                Ok(lines) => {
                    options.write_matches(&lines, &format!("{}:", file_name), &re, output)?
                }
                Err(e) => output.println(&format!("grep: {:#}", e))?,
            }
        }
        Ok(())
    }
}

/// Count lines, words and bytes.
pub struct Wc;

fn count<'a>(lines: impl IntoIterator<Item = &'a str>) -> (usize, usize, usize) {
    lines.into_iter().fold((0, 0, 0), |(l, w, b), line| {
        (l + 1, w + line.split_whitespace().count(), b + line.len() + 1)
    })
}

impl Command for Wc {
    fn name(&self) -> &str {
        "wc"
    }

    fn help_text(&self) -> String {
        "wc [FILE]... - prints line, word and byte counts of the files or the piped input"
            .to_string()
    }

    fn run(
        &self,
        args: &ArgumentsList,
        input: Option<&ShellBuffer>,
        output: &mut dyn Output,
    ) -> Result<()> {
        if args.is_empty() {
            let (lines, words, bytes) = input.map_or((0, 0, 0), |buf| count(buf.iter()));
            output.println(&format!("{} {} {}", lines, words, bytes))?;
            return Ok(());
        }

        for file_name in args.iter() {
            let content = fs::read_to_string(file_name)
                .with_context(|| format!("{}: cannot read", file_name))?;
            let lines = content.lines().count();
            let words = content.split_whitespace().count();
            output.println(&format!(
                "{} {} {} {}",
                lines,
                words,
                content.len(),
                file_name
            ))?;
        }
        Ok(())
    }
}

/// List the registered commands with their help text.
///
/// Holds the registry weakly: the registry owns this command.
pub struct Help {
    registry: Weak<CommandRegistry>,
}

impl Help {
    pub fn new(registry: &Arc<CommandRegistry>) -> Self {
        Self {
            registry: Arc::downgrade(registry),
        }
    }
}

impl Command for Help {
    fn name(&self) -> &str {
        "help"
    }

    fn help_text(&self) -> String {
        "help [COMMAND]... - describes the given commands, or all registered commands".to_string()
    }

    fn run(
        &self,
        args: &ArgumentsList,
        _input: Option<&ShellBuffer>,
        output: &mut dyn Output,
    ) -> Result<()> {
        let registry = self
            .registry
            .upgrade()
            .context("command registry is no longer available")?;

        let names: Vec<String> = if args.is_empty() {
            registry.names()
        } else {
            args.iter().map(str::to_owned).collect()
        };

        for name in names {
            let command = registry
                .find_by_name(&name)
                .with_context(|| format!("no command named '{}'", name))?;
            output.println(&format!("{:<8} {}", name, command.help_text()))?;
        }
        Ok(())
    }
}

/// Terminate the process, optionally with an exit status.
pub struct Exit;

#[derive(FromArgs)]
/// exit the shell process
struct ExitArgs {
    #[argh(positional)]
    /// process exit status, 0 when omitted
    status: Option<i32>,
}

impl Command for Exit {
    fn name(&self) -> &str {
        "exit"
    }

    fn help_text(&self) -> String {
        "exit [STATUS] - leaves the shell".to_string()
    }

    fn run(
        &self,
        args: &ArgumentsList,
        _input: Option<&ShellBuffer>,
        output: &mut dyn Output,
    ) -> Result<()> {
        let Some(exit) = parse_args::<ExitArgs>(self.name(), args, output)? else {
            return Ok(());
        };
        let status = exit.status.unwrap_or(0);
        std::process::exit(status)
    }
}
