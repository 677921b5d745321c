use crate::command::Command;
use crate::error::ShellError;
use crate::io_adapters::{Output, TerminalOutput};
use crate::pipeline::{PipelineExecutor, PipelineOutcome};
use crate::registry::CommandRegistry;
use crate::terminal::{EditorReader, LineReader};
use std::sync::Arc;
use tracing::{error, info};

/// Prompt used when none is configured.
pub const DEFAULT_PROMPT: &str = "> ";

/// Settings read once when the shell starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    /// Text printed once, followed by a blank line, before the first prompt.
    pub header: Option<String>,
    /// Text shown before every input line.
    pub prompt: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            header: None,
            prompt: DEFAULT_PROMPT.to_string(),
        }
    }
}

/// An interactive shell with its own command registry.
///
/// Shells don't share state: each one owns a [`CommandRegistry`], which can be
/// handed to other threads through [`Shell::registry`] to add or remove commands
/// while the loop runs.
///
/// Example
/// ```
/// use pipe_shell::{BufferOutput, Command, Echo, Shell};
///
/// let shell = Shell::new();
/// shell.register(Echo).unwrap();
///
/// let mut out = BufferOutput::new();
/// shell.execute_line("echo hello | echo -help", &mut out).unwrap();
/// assert_eq!(out.lines()[0], shell.registry().find_by_name("echo").unwrap().help_text());
/// ```
pub struct Shell {
    registry: Arc<CommandRegistry>,
    config: ShellConfig,
}

impl Shell {
    pub fn new() -> Self {
        Self::with_config(ShellConfig::default())
    }

    pub fn with_config(config: ShellConfig) -> Self {
        Self {
            registry: Arc::new(CommandRegistry::new()),
            config,
        }
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    /// Set the text displayed once when the shell starts.
    pub fn set_header(&mut self, header: impl Into<String>) {
        self.config.header = Some(header.into());
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.config.prompt = prompt.into();
    }

    /// Shared handle to the command registry.
    pub fn registry(&self) -> Arc<CommandRegistry> {
        Arc::clone(&self.registry)
    }

    /// Register a command. Fails if the name is already taken.
    pub fn register<C: Command + 'static>(&self, command: C) -> Result<(), ShellError> {
        self.registry.register(Arc::new(command))
    }

    /// Unregister the command named `name`; does nothing if there is none.
    pub fn unregister(&self, name: &str) -> Option<Arc<dyn Command>> {
        self.registry.unregister(name)
    }

    pub fn registered_commands(&self) -> Vec<Arc<dyn Command>> {
        self.registry.list()
    }

    /// Run one input line as a pipeline, writing the final output to `terminal`.
    pub fn execute_line(
        &self,
        line: &str,
        terminal: &mut dyn Output,
    ) -> std::io::Result<PipelineOutcome> {
        PipelineExecutor::new(&self.registry).execute(line, terminal)
    }

    /// Run the interactive loop on the process terminal.
    ///
    /// Returns when input ends (Ctrl-D) or is interrupted (Ctrl-C), or with an
    /// error when reading fails. Commands run on the calling thread: one that
    /// blocks keeps the whole shell waiting.
    pub fn start(&self) -> Result<(), ShellError> {
        let mut reader = EditorReader::new(self.registry())?;
        let mut terminal = TerminalOutput::stdout();
        self.run(&mut reader, &mut terminal)
    }

    /// Run the loop with the given input source and terminal.
    pub fn run(
        &self,
        reader: &mut dyn LineReader,
        terminal: &mut dyn Output,
    ) -> Result<(), ShellError> {
        if let Some(header) = &self.config.header {
            terminal.println(header)?;
            terminal.newline()?;
        }
        info!(commands = self.registry.len(), "shell started");

        loop {
            let line = match reader.read_line(&self.config.prompt) {
                Ok(Some(line)) => line,
                Ok(None) => {
                    info!("end of input, leaving shell");
                    return Ok(());
                }
                Err(err) => {
                    error!(error = %err, "cannot read input");
                    return Err(err);
                }
            };
            self.execute_line(line.trim(), terminal)?;
        }
    }
}

impl Default for Shell {
    fn default() -> Self {
        Self::new()
    }
}
