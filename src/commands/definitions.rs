//! Command definitions.
//!
//! A [`Command`] is the opaque handle stored in the registration table: metadata
//! used for help listings, an optional execution entry point, and an optional
//! nested table of sub-commands.

use std::fmt;

use serde::Serialize;

use super::registry::CommandTable;
use crate::app::App;

/// Execution entry point of a command or of the application fallback.
///
/// Receives the application (for nested [`App::exec`] calls) and the
/// remaining arguments after the command token.
pub type CommandFn = Box<dyn Fn(&App, &[String]) -> anyhow::Result<()>>;

/// A registered command.
pub struct Command {
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) aliases: Vec<String>,
    pub(crate) module: String,
    pub(crate) help: String,
    pub(crate) hidden: bool,
    /// Space separated path from the application root, set on registration.
    pub(crate) path: String,
    pub(crate) func: Option<CommandFn>,
    /// Sub-commands added through the builder, moved into `subs` on registration.
    pub(crate) pending_subs: Vec<Command>,
    pub(crate) subs: CommandTable,
}

/// Value snapshot of a command's descriptive metadata.
///
/// This is what hook observers see; it never carries the execution closure, so
/// changes made while a command runs are not visible through an earlier snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandInfo {
    /// Canonical name.
    pub name: String,
    /// Full path from the application root (e.g. `deploy staging`).
    pub path: String,
    /// Short description shown in help.
    pub description: String,
    /// Alternative names.
    pub aliases: Vec<String>,
    /// Module label used to group the help listing.
    pub module: String,
}

impl Command {
    /// Creates a command with a name and a short description.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            path: name.clone(),
            name,
            description: description.into(),
            aliases: Vec::new(),
            module: String::new(),
            help: String::new(),
            hidden: false,
            func: None,
            pending_subs: Vec::new(),
            subs: CommandTable::default(),
        }
    }

    /// Adds alternative names for the command.
    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    /// Sets the module label used for grouping in the help listing.
    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = module.into();
        self
    }

    /// Sets the long help text. `{$name}` placeholders are substituted on render.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }

    /// Hides the command from the help listing. It still resolves normally.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Sets the execution entry point.
    pub fn with_func<F>(mut self, func: F) -> Self
    where
        F: Fn(&App, &[String]) -> anyhow::Result<()> + 'static,
    {
        self.func = Some(Box::new(func));
        self
    }

    /// Adds a sub-command. Its name and aliases are validated when the parent is registered.
    pub fn with_sub(mut self, sub: Command) -> Self {
        self.pending_subs.push(sub);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Returns true if the command has an execution entry point.
    pub fn is_runnable(&self) -> bool {
        self.func.is_some()
    }

    /// Registered sub-commands.
    pub fn subs(&self) -> &CommandTable {
        &self.subs
    }

    /// Returns true if the command owns at least one sub-command.
    pub fn has_subs(&self) -> bool {
        !self.subs.is_empty()
    }

    /// Takes a metadata snapshot for hook observers.
    pub fn info(&self) -> CommandInfo {
        CommandInfo {
            name: self.name.clone(),
            path: self.path.clone(),
            description: self.description.clone(),
            aliases: self.aliases.clone(),
            module: self.module.clone(),
        }
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("aliases", &self.aliases)
            .field("module", &self.module)
            .field("hidden", &self.hidden)
            .field("runnable", &self.func.is_some())
            .field("subs", &self.subs)
            .finish()
    }
}
