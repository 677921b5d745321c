use crate::arguments::ArgumentsList;
use crate::buffer::ShellBuffer;
use crate::io_adapters::Output;
use anyhow::Result;

/// Flag recognized by every command: print the help text instead of running.
pub const HELP_FLAG: &str = "-help";

/// A unit of work the shell can dispatch to by name.
///
/// Implementors provide the command-specific body in [`Command::run`]; the shell
/// always goes through [`ExecutableCommand::execute`], which adds the `-help`
/// handling on top.
pub trait Command: Send + Sync {
    /// Name the command is registered and invoked under.
    ///
    /// Must not change over the lifetime of the command.
    fn name(&self) -> &str;

    /// Text printed when the command is invoked with `-help`.
    fn help_text(&self) -> String;

    /// Command-specific body.
    ///
    /// `input` holds the previous stage's output when the command is not the
    /// first stage of a pipeline. Errors are reported by the pipeline executor.
    fn run(
        &self,
        args: &ArgumentsList,
        input: Option<&ShellBuffer>,
        output: &mut dyn Output,
    ) -> Result<()>;
}

/// Entry point used by the shell to invoke any [`Command`].
///
/// Implemented for every command through a blanket impl, so the help
/// convention is the same everywhere and can't be replaced per command.
pub trait ExecutableCommand {
    fn execute(
        &self,
        args: &ArgumentsList,
        input: Option<&ShellBuffer>,
        output: &mut dyn Output,
    ) -> Result<()>;
}

impl<T: Command + ?Sized> ExecutableCommand for T {
    fn execute(
        &self,
        args: &ArgumentsList,
        input: Option<&ShellBuffer>,
        output: &mut dyn Output,
    ) -> Result<()> {
        if args.contains(HELP_FLAG) {
            output.println(&self.help_text())?;
            return Ok(());
        }
        self.run(args, input, output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io_adapters::BufferOutput;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counting {
        runs: AtomicUsize,
    }

    impl Command for Counting {
        fn name(&self) -> &str {
            "count"
        }

        fn help_text(&self) -> String {
            "counts its invocations".to_string()
        }

        fn run(
            &self,
            args: &ArgumentsList,
            input: Option<&ShellBuffer>,
            output: &mut dyn Output,
        ) -> Result<()> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            output.println(&format!(
                "args={} input={}",
                args.len(),
                input.map_or(0, ShellBuffer::len)
            ))?;
            Ok(())
        }
    }

    #[test]
    fn test_help_flag_skips_body() {
        let cmd = Counting::default();
        let mut out = BufferOutput::new();
        let args: ArgumentsList = ["x", "-help"].into_iter().collect();

        cmd.execute(&args, None, &mut out).unwrap();

        assert_eq!(cmd.runs.load(Ordering::SeqCst), 0);
        assert_eq!(out.lines(), &["counts its invocations"]);
    }

    #[test]
    fn test_body_runs_without_help_flag() {
        let cmd = Counting::default();
        let mut out = BufferOutput::new();
        let args: ArgumentsList = ["-h", "--help"].into_iter().collect();
        let input: ShellBuffer = ["a", "b", "c"].into_iter().collect();

        cmd.execute(&args, Some(&input), &mut out).unwrap();

        assert_eq!(cmd.runs.load(Ordering::SeqCst), 1);
        assert_eq!(out.lines(), &["args=2 input=3"]);
    }

    #[test]
    fn test_execute_through_trait_object() {
        let cmd: Box<dyn Command> = Box::new(Counting::default());
        let mut out = BufferOutput::new();
        let args: ArgumentsList = ["-help"].into_iter().collect();

        cmd.execute(&args, None, &mut out).unwrap();

        assert_eq!(out.lines(), &["counts its invocations"]);
    }
}
