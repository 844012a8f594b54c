//! Crank - command resolution and lifecycle dispatch for command-line applications.
//!
//! An [`App`] owns a command table, an alias table and a single-slot hook
//! table. [`App::run`] parses global options, resolves the command name and
//! runs the command inside a fixed sequence of lifecycle [`Event`]s.

pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod hooks;
pub mod logging;

pub use app::{to_args, App, RunContext, ERR, OK};
pub use cli::{GlobalOpts, Verbosity};
pub use commands::{Command, CommandInfo, Output};
pub use config::Config;
pub use error::{CrankError, Result};
pub use hooks::{Event, HookCtx};
