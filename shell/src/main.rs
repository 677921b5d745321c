use argh::FromArgs;
use pipe_shell::{DEFAULT_PROMPT, Shell, ShellConfig, register_builtins};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(FromArgs)]
/// Interactive shell running builtin commands chained with `|`.
struct Args {
    #[argh(option)]
    /// text printed once before the first prompt
    header: Option<String>,

    #[argh(option, default = "DEFAULT_PROMPT.to_string()")]
    /// prompt shown before each input line
    prompt: String,

    #[argh(option, default = "String::from(\"warn\")")]
    /// log filter used when RUST_LOG is not set (e.g. "debug", "pipe_shell=trace")
    log_level: String,
}

fn main() -> ExitCode {
    let args: Args = argh::from_env();

    // Logs go to stderr so they never mix with command output.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .init();

    let shell = Shell::with_config(ShellConfig {
        header: args.header,
        prompt: args.prompt,
    });
    if let Err(e) = register_builtins(&shell.registry()) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    match shell.start() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", anyhow::Error::new(e));
            ExitCode::FAILURE
        }
    }
}
