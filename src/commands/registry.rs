//! Command registration table.
//!
//! Owns the canonical commands and their aliases and enforces the naming
//! invariants at registration time:
//! - names and aliases match the command name syntax
//! - names are unique, and `help` is reserved
//! - an alias targets a registered name and never shadows a canonical name
//! - an alias resolves to exactly one canonical name

use std::collections::BTreeMap;

use super::aliases::Aliases;
use super::definitions::Command;
use super::names::{is_good_cmd_name, HELP_COMMAND};
use super::similar::find_similar;
use crate::error::{CrankError, Result};

/// Canonical name to command mapping plus the alias table.
#[derive(Debug, Default)]
pub struct CommandTable {
    commands: BTreeMap<String, Command>,
    aliases: Aliases,
}

impl CommandTable {
    /// Registers a command (and, recursively, its sub-commands).
    ///
    /// `parent_path` is the path of the owning command, empty at the root.
    pub fn try_insert(&mut self, mut cmd: Command, parent_path: &str) -> Result<&Command> {
        let name = cmd.name.clone();
        if !is_good_cmd_name(&name) {
            return Err(CrankError::config(format!(
                "command name '{name}' is invalid, it must match ^[a-zA-Z][\\w-]*$"
            )));
        }
        if name == HELP_COMMAND {
            return Err(CrankError::config("command name 'help' is reserved"));
        }
        if self.commands.contains_key(&name) {
            return Err(CrankError::config(format!(
                "command '{name}' is already registered"
            )));
        }
        if let Some(target) = self.aliases.get(&name) {
            return Err(CrankError::config(format!(
                "command name '{name}' is already used as an alias of '{target}'"
            )));
        }

        let mut seen = Vec::with_capacity(cmd.aliases.len());
        for alias in &cmd.aliases {
            if alias == &name || seen.contains(&alias) {
                return Err(CrankError::config(format!(
                    "alias '{alias}' is repeated for command '{name}'"
                )));
            }
            self.check_alias(alias, &name)?;
            seen.push(alias);
        }

        cmd.path = if parent_path.is_empty() {
            name.clone()
        } else {
            format!("{parent_path} {name}")
        };
        for sub in std::mem::take(&mut cmd.pending_subs) {
            let path = cmd.path.clone();
            cmd.subs.try_insert(sub, &path)?;
        }

        for alias in &cmd.aliases {
            self.aliases.insert(alias.clone(), name.clone());
        }
        Ok(self.commands.entry(name).or_insert(cmd))
    }

    /// Registers extra aliases for an already registered command.
    pub fn try_add_aliases<I, S>(&mut self, name: &str, aliases: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if !self.commands.contains_key(name) {
            return Err(CrankError::config(format!(
                "cannot add aliases to unregistered command '{name}'"
            )));
        }

        for alias in aliases {
            let alias = alias.into();
            if self.aliases.get(&alias) == Some(name) {
                continue;
            }
            self.check_alias(&alias, name)?;
            self.aliases.insert(alias.clone(), name);
            if let Some(cmd) = self.commands.get_mut(name) {
                cmd.aliases.push(alias);
            }
        }
        Ok(())
    }

    fn check_alias(&self, alias: &str, name: &str) -> Result<()> {
        if !is_good_cmd_name(alias) {
            return Err(CrankError::config(format!(
                "alias '{alias}' for command '{name}' is invalid"
            )));
        }
        if alias == HELP_COMMAND {
            return Err(CrankError::config("alias 'help' is reserved"));
        }
        if self.commands.contains_key(alias) {
            return Err(CrankError::config(format!(
                "alias '{alias}' collides with the command of the same name"
            )));
        }
        if let Some(target) = self.aliases.get(alias) {
            return Err(CrankError::config(format!(
                "alias '{alias}' is already registered for command '{target}'"
            )));
        }
        Ok(())
    }

    /// Resolves an alias to its canonical name, or returns the token unchanged.
    pub fn resolve_alias<'a>(&'a self, token: &'a str) -> &'a str {
        self.aliases.resolve(token)
    }

    /// Returns true if `name` is a registered canonical name.
    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Command> {
        self.commands.get(name)
    }

    /// Canonical names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    /// Commands in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.values()
    }

    pub fn aliases(&self) -> &Aliases {
        &self.aliases
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Up to five names or aliases related to `input` by substring containment.
    ///
    /// Canonical names are scanned first (plus the `help` keyword when
    /// `with_help` is set), then aliases.
    pub fn find_similar(&self, input: &str, with_help: bool) -> Vec<String> {
        let mut names: Vec<&str> = self.names().collect();
        if with_help {
            names.push(HELP_COMMAND);
            names.sort_unstable();
        }
        find_similar(input, names, self.aliases.iter().map(|(alias, _)| alias))
    }

    /// Visible commands grouped by module label, ungrouped first.
    pub fn by_module(&self) -> BTreeMap<&str, Vec<&Command>> {
        let mut groups: BTreeMap<&str, Vec<&Command>> = BTreeMap::new();
        for cmd in self.iter().filter(|c| !c.hidden) {
            groups.entry(cmd.module.as_str()).or_default().push(cmd);
        }
        groups
    }

    /// Width of the longest visible name, at least as wide as `help`.
    pub fn name_width(&self) -> usize {
        self.iter()
            .filter(|c| !c.hidden)
            .map(|c| c.name.len())
            .chain(std::iter::once(HELP_COMMAND.len()))
            .max()
            .unwrap_or_default()
    }
}
