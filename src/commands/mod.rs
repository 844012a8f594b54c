//! Command registration, name resolution and help rendering.
//!
//! This module keeps resolution free of execution: the router only looks at
//! the registration table, so it can be unit tested without building an
//! application or firing hooks.

pub mod aliases;
pub mod definitions;
pub mod help;
pub mod names;
pub mod output;
pub mod registry;
pub mod router;
pub mod similar;

pub use aliases::Aliases;
pub use definitions::{Command, CommandFn, CommandInfo};
pub use help::HelpReplacer;
pub use names::{is_good_cmd_id, is_good_cmd_name, is_good_name, HELP_COMMAND};
pub use output::Output;
pub use registry::CommandTable;
pub use router::{resolve, Resolution};
pub use similar::{find_similar, MAX_SUGGESTIONS};
