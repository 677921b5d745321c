//! An embeddable interactive command shell.
//!
//! A line such as `cat notes.txt | grep todo` is split into pipeline stages on
//! `|`, every stage is tokenized (double-quoted spans stay whole), the first token
//! is looked up in a [`CommandRegistry`] and the stages run one after another. The
//! lines printed by one stage are collected into a [`ShellBuffer`] that becomes
//! the input of the next; the last stage prints to the terminal.
//!
//! Hosts implement [`Command`] for their own commands, register them on a
//! [`Shell`] and call [`Shell::start`]. Every command understands `-help`, which
//! prints its help text instead of running it.

mod arguments;
mod buffer;
mod builtin;
pub mod command;
mod error;
mod io_adapters;
pub mod pipeline;
mod registry;
mod shell;
pub mod terminal;
pub mod tokenizer;

pub use arguments::ArgumentsList;
pub use buffer::ShellBuffer;
pub use builtin::{Cat, Echo, Exit, Grep, Help, Wc, register_builtins};
pub use command::{Command, ExecutableCommand, HELP_FLAG};
pub use error::ShellError;
pub use io_adapters::{BufferOutput, Output, TerminalOutput};
pub use pipeline::{PipelineExecutor, PipelineOutcome};
pub use registry::CommandRegistry;
pub use shell::{DEFAULT_PROMPT, Shell, ShellConfig};
