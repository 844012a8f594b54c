//! Command name resolution.
//!
//! Turns the argument vector left after global options into a [`Resolution`]:
//!
//! 1. `help ...` as first token short-circuits to the help path.
//! 2. No input falls back to the default command, if it is registered.
//! 3. A first token that is not a valid command id resolves to nothing.
//! 4. Otherwise the token goes through the alias table; a registered result
//!    consumes the token, an unregistered one is reported as unknown.

use tracing::{debug, warn};

use super::names::{is_good_cmd_id, HELP_COMMAND};
use super::registry::CommandTable;

/// Outcome of resolving the first argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Nothing to run: no input and no usable default command, or an invalid token.
    Empty,
    /// The help keyword was typed; carries the arguments after it.
    Help(Vec<String>),
    /// A registered command.
    Command {
        /// Canonical name.
        name: String,
        /// Token the user typed, `None` when the default command was used.
        input: Option<String>,
        /// Arguments left after the command token.
        rest: Vec<String>,
    },
    /// A valid name that resolves to nothing registered.
    Unknown(String),
}

/// Resolves `args` against `table`.
pub fn resolve(table: &CommandTable, default_command: Option<&str>, args: &[String]) -> Resolution {
    let Some(first) = args.first() else {
        return resolve_default(table, default_command);
    };

    if first == HELP_COMMAND {
        return Resolution::Help(args[1..].to_vec());
    }

    if !is_good_cmd_id(first) {
        debug!(token = %first, "first argument is not a command name");
        return Resolution::Empty;
    }

    let name = table.resolve_alias(first);
    if table.contains(name) {
        debug!(input = %first, command = %name, "resolved input command");
        Resolution::Command {
            name: name.to_string(),
            input: Some(first.clone()),
            rest: args[1..].to_vec(),
        }
    } else {
        Resolution::Unknown(name.to_string())
    }
}

fn resolve_default(table: &CommandTable, default_command: Option<&str>) -> Resolution {
    match default_command {
        None | Some("") => Resolution::Empty,
        Some(name) if table.contains(name) => Resolution::Command {
            name: name.to_string(),
            input: None,
            rest: Vec::new(),
        },
        Some(name) => {
            warn!(command = %name, "the default command is not registered");
            Resolution::Empty
        }
    }
}
