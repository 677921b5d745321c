use crate::arguments::ArgumentsList;
use crate::buffer::ShellBuffer;
use crate::command::ExecutableCommand;
use crate::io_adapters::{BufferOutput, Output};
use crate::registry::CommandRegistry;
use crate::tokenizer::split_command_line;
use std::io::Result as IoResult;
use tracing::{debug, error, warn};

/// Character separating pipeline stages.
pub const STAGE_SEPARATOR: char = '|';

/// What happened to one input line.
///
/// Stage indices count every `|`-separated segment from zero, including skipped
/// empty ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// Every stage ran; `stages` is how many commands were executed.
    Completed { stages: usize },
    /// An empty stage followed a stage that had already run.
    EmptyStage { stage: usize },
    /// No command is registered under `name`.
    UnknownCommand { stage: usize, name: String },
    /// The command returned an error.
    Failed {
        stage: usize,
        name: String,
        message: String,
    },
}

/// Split a line into trimmed stage strings on `|`.
///
/// Trailing empty stages are dropped, so `cat file |` is a single stage.
pub fn split_stages(line: &str) -> Vec<&str> {
    let mut stages: Vec<&str> = line.split(STAGE_SEPARATOR).map(str::trim).collect();
    while stages.last().is_some_and(|s| s.is_empty()) {
        stages.pop();
    }
    stages
}

/// Runs input lines as sequential pipelines against a [`CommandRegistry`].
///
/// Each stage runs to completion before the next one starts. The output of a
/// stage is collected into a [`ShellBuffer`] and becomes the next stage's input;
/// the last stage writes straight to the terminal.
pub struct PipelineExecutor<'a> {
    registry: &'a CommandRegistry,
}

impl<'a> PipelineExecutor<'a> {
    pub fn new(registry: &'a CommandRegistry) -> Self {
        Self { registry }
    }

    /// Execute `line` and finish with a blank separator line on `terminal`.
    ///
    /// Unknown commands, empty stages after a command and command errors are
    /// reported on `terminal` and stop the rest of the line. Only a failure to
    /// write to `terminal` is returned as an error.
    pub fn execute(&self, line: &str, terminal: &mut dyn Output) -> IoResult<PipelineOutcome> {
        let outcome = self.run_stages(line, terminal)?;
        terminal.newline()?;
        Ok(outcome)
    }

    fn run_stages(&self, line: &str, terminal: &mut dyn Output) -> IoResult<PipelineOutcome> {
        let stages = split_stages(line);
        let last = stages.len().saturating_sub(1);

        let mut previous_output: Option<ShellBuffer> = None;
        let mut executed = 0;

        for (index, stage) in stages.iter().enumerate() {
            let mut tokens = split_command_line(stage).into_iter();
            let Some(name) = tokens.next() else {
                if executed == 0 {
                    continue;
                }
                warn!(stage = index, "empty command in pipeline");
                terminal.println("Empty command in pipeline")?;
                return Ok(PipelineOutcome::EmptyStage { stage: index });
            };

            let Some(command) = self.registry.find_by_name(&name) else {
                warn!(stage = index, command = %name, "no such command");
                terminal.println(&format!("No command found with name '{}'", name))?;
                return Ok(PipelineOutcome::UnknownCommand { stage: index, name });
            };

            let args = ArgumentsList::new(tokens.collect());
            let input = previous_output.take();
            debug!(stage = index, command = %name, %args, "running stage");

            let result = if index == last {
                command.execute(&args, input.as_ref(), terminal)
            } else {
                let mut output = BufferOutput::new();
                let result = command.execute(&args, input.as_ref(), &mut output);
                previous_output = Some(output.into_buffer());
                result
            };

            if let Err(err) = result {
                let message = format!("{:#}", err);
                error!(stage = index, command = %name, error = %message, "command failed");
                terminal.println(&format!("{}: {}", name, message))?;
                return Ok(PipelineOutcome::Failed {
                    stage: index,
                    name,
                    message,
                });
            }
            executed += 1;
        }

        Ok(PipelineOutcome::Completed { stages: executed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;
    use std::sync::{Arc, Mutex};

    type Log = Arc<Mutex<Vec<String>>>;

    /// Prints its arguments one per line and logs `name<-input lines`.
    struct Emit {
        name: &'static str,
        log: Log,
    }

    impl Command for Emit {
        fn name(&self) -> &str {
            self.name
        }

        fn help_text(&self) -> String {
            format!("{} prints its arguments", self.name)
        }

        fn run(
            &self,
            args: &ArgumentsList,
            input: Option<&ShellBuffer>,
            output: &mut dyn Output,
        ) -> anyhow::Result<()> {
            let seen = match input {
                Some(buf) => buf.iter().collect::<Vec<_>>().join(","),
                None => "none".to_string(),
            };
            self.log.lock().unwrap().push(format!("{}<-{}", self.name, seen));
            for arg in args.iter() {
                output.println(arg)?;
            }
            Ok(())
        }
    }

    struct Fail;

    impl Command for Fail {
        fn name(&self) -> &str {
            "fail"
        }

        fn help_text(&self) -> String {
            "always fails".to_string()
        }

        fn run(
            &self,
            args: &ArgumentsList,
            _input: Option<&ShellBuffer>,
            _output: &mut dyn Output,
        ) -> anyhow::Result<()> {
            let what = args.argument_at(0)?;
            anyhow::bail!("refusing {}", what)
        }
    }

    fn setup() -> (CommandRegistry, Log) {
        let log: Log = Arc::default();
        let registry = CommandRegistry::new();
        for name in ["a", "b", "c"] {
            registry
                .register(Arc::new(Emit {
                    name,
                    log: log.clone(),
                }))
                .unwrap();
        }
        registry.register(Arc::new(Fail)).unwrap();
        (registry, log)
    }

    fn logged(log: &Log) -> Vec<String> {
        log.lock().unwrap().clone()
    }

    #[test]
    fn test_split_stages() {
        assert_eq!(split_stages("cat f | grep x"), vec!["cat f", "grep x"]);
        assert_eq!(split_stages("cat f |"), vec!["cat f"]);
        assert_eq!(split_stages(" | cat f"), vec!["", "cat f"]);
        assert!(split_stages("").is_empty());
        assert!(split_stages(" | | ").is_empty());
    }

    #[test]
    fn test_single_stage_writes_to_terminal() {
        let (registry, log) = setup();
        let mut terminal = BufferOutput::new();

        let outcome = PipelineExecutor::new(&registry)
            .execute("a hello \"big world\"", &mut terminal)
            .unwrap();

        assert_eq!(outcome, PipelineOutcome::Completed { stages: 1 });
        assert_eq!(terminal.lines(), &["hello", "big world", ""]);
        assert_eq!(logged(&log), vec!["a<-none"]);
    }

    #[test]
    fn test_stages_chain_buffers_in_order() {
        let (registry, log) = setup();
        let mut terminal = BufferOutput::new();

        let outcome = PipelineExecutor::new(&registry)
            .execute("a 1 2 | b 3 | c 4 5", &mut terminal)
            .unwrap();

        assert_eq!(outcome, PipelineOutcome::Completed { stages: 3 });
        assert_eq!(logged(&log), vec!["a<-none", "b<-1,2", "c<-3"]);
        // only the last stage reaches the terminal
        assert_eq!(terminal.lines(), &["4", "5", ""]);
    }

    #[test]
    fn test_unknown_command_aborts_rest_of_line() {
        let (registry, log) = setup();
        let mut terminal = BufferOutput::new();

        let outcome = PipelineExecutor::new(&registry)
            .execute("a x | nope y | c z", &mut terminal)
            .unwrap();

        assert_eq!(
            outcome,
            PipelineOutcome::UnknownCommand {
                stage: 1,
                name: "nope".to_string()
            }
        );
        assert_eq!(logged(&log), vec!["a<-none"]);
        assert_eq!(terminal.lines(), &["No command found with name 'nope'", ""]);
    }

    #[test]
    fn test_failing_stage_aborts_and_reports() {
        let (registry, log) = setup();
        let mut terminal = BufferOutput::new();

        let outcome = PipelineExecutor::new(&registry)
            .execute("a x | fail now | c z", &mut terminal)
            .unwrap();

        match outcome {
            PipelineOutcome::Failed { stage, name, message } => {
                assert_eq!(stage, 1);
                assert_eq!(name, "fail");
                assert_eq!(message, "refusing now");
            }
            other => panic!("expected Failed, got {:?}", other),
        }
        assert_eq!(logged(&log), vec!["a<-none"]);
        assert_eq!(terminal.lines(), &["fail: refusing now", ""]);
    }

    #[test]
    fn test_out_of_range_argument_fails_stage() {
        let (registry, _log) = setup();
        let mut terminal = BufferOutput::new();

        let outcome = PipelineExecutor::new(&registry)
            .execute("fail", &mut terminal)
            .unwrap();

        assert!(matches!(outcome, PipelineOutcome::Failed { stage: 0, .. }));
        assert!(terminal.lines()[0].contains("out of range"));
    }

    #[test]
    fn test_help_flag_in_pipeline_skips_body() {
        let (registry, log) = setup();
        let mut terminal = BufferOutput::new();

        let outcome = PipelineExecutor::new(&registry)
            .execute("a 1 | b -help", &mut terminal)
            .unwrap();

        assert_eq!(outcome, PipelineOutcome::Completed { stages: 2 });
        assert_eq!(logged(&log), vec!["a<-none"]);
        assert_eq!(terminal.lines(), &["b prints its arguments", ""]);
    }

    #[test]
    fn test_empty_stages() {
        let (registry, log) = setup();
        let executor = PipelineExecutor::new(&registry);

        let mut terminal = BufferOutput::new();
        let outcome = executor.execute("| a 1 | b", &mut terminal).unwrap();
        assert_eq!(outcome, PipelineOutcome::Completed { stages: 2 });
        assert_eq!(logged(&log), vec!["a<-none", "b<-1"]);

        let mut terminal = BufferOutput::new();
        let outcome = executor.execute("a 1 | | b", &mut terminal).unwrap();
        assert_eq!(outcome, PipelineOutcome::EmptyStage { stage: 1 });
        assert_eq!(terminal.lines(), &["Empty command in pipeline", ""]);

        let mut terminal = BufferOutput::new();
        let outcome = executor.execute("   ", &mut terminal).unwrap();
        assert_eq!(outcome, PipelineOutcome::Completed { stages: 0 });
        assert_eq!(terminal.lines(), &[""]);
    }

    #[test]
    fn test_trailing_pipe_runs_single_stage_to_terminal() {
        let (registry, _log) = setup();
        let mut terminal = BufferOutput::new();

        PipelineExecutor::new(&registry)
            .execute("a out |", &mut terminal)
            .unwrap();

        assert_eq!(terminal.lines(), &["out", ""]);
    }
}
