use rustyline::error::ReadlineError;
use std::io;
use thiserror::Error;

/// Failures that must take the whole shell down.
///
/// Everything outside this enum is recoverable: it is reported on standard
/// error and the prompt comes back. A `FatalError` propagates out of the
/// dispatch loop instead, and the process exits non-zero.
#[derive(Debug, Error)]
pub enum FatalError {
    /// The input stream could not deliver another line. Covers end-of-input:
    /// the shell does not wind down gracefully when stdin runs dry.
    #[error("failed to read input")]
    Readline(#[source] ReadlineError),

    /// The current working directory could not be determined.
    #[error("cannot determine the current working directory")]
    CurrentDir(#[source] io::Error),

    /// A child process could not be created at all. Distinct from a program
    /// image that merely fails to load, which only kills the child.
    #[error("failed to start `{program}`")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
}
