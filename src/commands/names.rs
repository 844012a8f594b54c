//! Name syntax checks for commands, aliases, options and help variables.

use regex::Regex;
use std::sync::LazyLock;

/// Reserved first-token keyword, intercepted before name resolution.
pub const HELP_COMMAND: &str = "help";

// ASCII classes on purpose: `\w` is Unicode-aware in the regex crate.
static GOOD_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9_-]*$").expect("static regex"));

static GOOD_CMD_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9_-]*$").expect("static regex"));

// Namespaced ids such as "self:init".
static GOOD_CMD_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9_:-]*$").expect("static regex"));

/// Returns true if `name` is a valid option, argument or help variable name.
pub fn is_good_name(name: &str) -> bool {
    GOOD_NAME.is_match(name)
}

/// Returns true if `name` is a valid command name or alias.
pub fn is_good_cmd_name(name: &str) -> bool {
    GOOD_CMD_NAME.is_match(name)
}

/// Returns true if `name` is a valid command identifier (colons allowed).
pub fn is_good_cmd_id(name: &str) -> bool {
    GOOD_CMD_ID.is_match(name)
}
