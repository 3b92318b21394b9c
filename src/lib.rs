//! A tiny interactive shell with a bounded command history.
//!
//! This crate provides a minimal set of building blocks for a line-oriented
//! shell: built-in commands executed in-process (`exit`, `history`, `cd`,
//! `pwd`), a launcher for external programs discovered through `PATH`, and a
//! fixed-capacity circular [`HistoryBuffer`] that remembers the most recent
//! commands, silently forgetting the oldest ones.
//!
//! The main entry point is [`Interpreter`], which drives the prompt loop and
//! can also execute single commands by name with arguments through a set of
//! pluggable factories. The public modules [`command`], [`env`] and
//! [`history`] expose the traits and types for implementing your own commands
//! and for inspecting session state.

mod builtin;
pub mod command;
pub mod env;
pub mod error;
mod external;
pub mod history;
mod interpreter;
mod lexer;

pub use history::HistoryBuffer;
/// Just a convenient re-export of the interactive command runner.
///
/// See [`Interpreter`] for the high-level API and examples.
pub use interpreter::Interpreter;
