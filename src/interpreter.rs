use crate::command::{CommandFactory, ExecutableCommand, ExitCode};
use crate::env::Environment;
use crate::error::FatalError;
use crate::lexer;
use anyhow::Result;
use rustyline::DefaultEditor;
use std::io::Write;

/// Factory allows creating instances of ExecutableCommand.
///
/// Only support commands defined in this crate: BuiltinCommand and ExternalCommand.
pub(crate) struct Factory<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for Factory<T> {
    fn default() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

/// A minimal interactive shell that executes built-in and external commands
/// and remembers what it ran.
///
/// The interpreter maintains an [`Environment`] (variables, working
/// directory, exit flag, and the bounded command history) and a list of
/// [`CommandFactory`] objects that are queried in order to create commands by
/// name. See [`Default`] for the factories included out of the box.
///
/// Example
/// ```
/// use minish::Interpreter;
/// let mut sh = Interpreter::default();
/// let code = sh.run("pwd", &[]).unwrap();
/// assert_eq!(code, 0);
/// ```
pub struct Interpreter {
    env: Environment,
    commands: Vec<Box<dyn CommandFactory>>,
}

impl Interpreter {
    /// Create a new interpreter with a custom set of command factories.
    pub fn new(commands: Vec<Box<dyn CommandFactory>>) -> Self {
        Self {
            env: Environment::new(),
            commands,
        }
    }

    /// Read-only view of the session environment.
    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Append extra directories to the session `PATH` before the loop starts.
    pub fn append_path(&mut self, dirs: impl IntoIterator<Item = String>) {
        self.env.append_path(dirs);
    }

    /// Run a single command invocation by name with arguments.
    ///
    /// This is the embeddable entry point: it performs no history recording.
    /// Returns the command's exit code, or an error if the command cannot be
    /// created or fails to execute.
    pub fn run(&mut self, name: &str, args: &[&str]) -> Result<ExitCode> {
        match self.create_command(name, args) {
            Some(cmd) => cmd.execute(&mut std::io::stdout(), &mut self.env),
            None => Err(anyhow::anyhow!("command not found: {}", name)),
        }
    }

    /// The interactive Read-Eval-Print Loop.
    ///
    /// Prompts with a literal `$ `, reads one line per iteration, and
    /// dispatches it. Any failure to read another line, end-of-input
    /// included, is fatal and surfaces as an error; the `exit` builtin ends
    /// the loop cleanly instead.
    pub fn repl(&mut self) -> Result<()> {
        let mut rl = DefaultEditor::new().map_err(FatalError::Readline)?;
        while !self.env.should_exit {
            let line = match rl.readline("$ ") {
                Ok(line) => line,
                Err(err) => return Err(FatalError::Readline(err).into()),
            };
            let line = lexer::clip_line(&line);
            if !line.trim().is_empty() {
                let _ = rl.add_history_entry(line);
            }
            self.dispatch(line)?;
        }
        Ok(())
    }

    /// Tokenize one input line, record it, and execute it.
    ///
    /// Blank input does nothing. Recoverable failures are reported on
    /// standard error and swallowed; only a [`FatalError`] propagates.
    pub fn dispatch(&mut self, line: &str) -> Result<()> {
        self.dispatch_with_output(line, &mut std::io::stdout())
    }

    /// Like [`dispatch`](Self::dispatch), but command output goes to `out`.
    pub fn dispatch_with_output(&mut self, line: &str, out: &mut dyn Write) -> Result<()> {
        let tokens = lexer::split_into_tokens(line);
        let Some((&name, args)) = tokens.split_first() else {
            // Blank input re-prompts without touching history.
            return Ok(());
        };
        self.record(name, line);
        match self.create_command(name, args) {
            Some(cmd) => match cmd.execute(out, &mut self.env) {
                // The child's exit status is observed and dropped.
                Ok(_code) => {}
                Err(err) => match err.downcast::<FatalError>() {
                    Ok(fatal) => return Err(fatal.into()),
                    Err(err) => eprintln!("minish: {err:#}"),
                },
            },
            None => eprintln!("minish: {name}: command not found"),
        }
        out.flush().ok();
        Ok(())
    }

    /// History recording policy, keyed on the first token.
    ///
    /// `exit` is never recorded; `pwd` is recorded by name only, not the full
    /// line; everything else records the raw line as typed.
    fn record(&mut self, name: &str, line: &str) {
        match name {
            "exit" => {}
            "pwd" => self.env.history.push(name),
            _ => self.env.history.push(line),
        }
    }

    fn create_command(&self, name: &str, args: &[&str]) -> Option<Box<dyn ExecutableCommand>> {
        self.commands
            .iter()
            .find_map(|factory| factory.try_create(&self.env, name, args))
    }
}

impl Default for Interpreter {
    /// Create an interpreter with the default set of commands:
    /// - built-ins: `pwd`, `cd`, `history`, `exit`
    /// - the external command launcher, tried last
    fn default() -> Self {
        use crate::builtin::*;
        use crate::external::ExternalCommand;
        Self::new(vec![
            Box::new(Factory::<Pwd>::default()),
            Box::new(Factory::<Cd>::default()),
            Box::new(Factory::<History>::default()),
            Box::new(Factory::<Exit>::default()),
            Box::new(Factory::<ExternalCommand>::default()),
        ])
    }
}
