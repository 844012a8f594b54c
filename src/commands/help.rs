//! Help text rendering for applications and commands.
//!
//! Text surfaces support `{$name}` placeholders; see [`HelpReplacer`].

use std::collections::BTreeMap;
use std::fmt::Write;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::definitions::Command;
use super::names::HELP_COMMAND;
use crate::app::App;
use crate::cli::GlobalOpts;

static HELP_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\$([a-zA-Z][a-zA-Z0-9_-]*)\}").expect("static regex"));

/// Placeholder substitution for help text.
///
/// Known by default: `binName`, `workDir`, and `cmd` / `fullCmd` while a
/// command's help is rendered.
#[derive(Debug, Clone, Default)]
pub struct HelpReplacer {
    vars: BTreeMap<String, String>,
}

impl HelpReplacer {
    /// Adds or replaces a variable.
    pub fn add_replace(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }

    /// Adds several variables.
    pub fn add_replaces<I, K, V>(&mut self, vars: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in vars {
            self.add_replace(name, value);
        }
    }

    /// Substitutes every known `{$name}` in one pass; unknown ones stay as written.
    pub fn replace_pairs(&self, input: &str) -> String {
        if !input.contains("{$") {
            return input.to_string();
        }

        HELP_VAR
            .replace_all(input, |caps: &Captures<'_>| match self.vars.get(&caps[1]) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }
}

/// Uppercases the first character.
pub fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn alias_suffix(aliases: &[String]) -> String {
    if aliases.is_empty() {
        String::new()
    } else {
        format!(" (alias: {})", aliases.join(","))
    }
}

/// Full application help: usage, global options, and the grouped command list.
pub fn render_app_help(app: &App) -> String {
    let table = app.commands();
    let width = table.name_width();
    let mut text = String::new();

    let _ = writeln!(
        text,
        "{} (Version: {})",
        upper_first(app.description()),
        app.version()
    );
    text.push_str("Usage:\n");
    text.push_str("  {$binName} [Global Options...] {command} [--option ...] [argument ...]\n\n");
    text.push_str("Global Options:\n");
    text.push_str(&GlobalOpts::help_text());
    text.push_str("\nAvailable Commands:");

    for (module, cmds) in table.by_module() {
        if !module.is_empty() {
            let _ = write!(text, "\n {module}");
        }
        for cmd in cmds {
            let _ = write!(
                text,
                "\n  {:<width$} {}{}",
                cmd.name(),
                upper_first(cmd.description()),
                alias_suffix(cmd.aliases())
            );
        }
    }

    let _ = write!(
        text,
        "\n\n  {:<width$} Display help information\n\n",
        HELP_COMMAND
    );
    text.push_str("Use \"{$binName} {COMMAND} -h\" for more information about a command\n");

    app.replace_vars(&text)
}

/// Focused help for one command.
pub fn render_command_help(app: &App, cmd: &Command) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "{}\n", upper_first(cmd.description()));
    text.push_str("Usage:\n");
    if cmd.has_subs() {
        text.push_str("  {$binName} {$fullCmd} [--option ...] SUBCOMMAND [argument ...]\n");
    } else {
        text.push_str("  {$binName} {$fullCmd} [--option ...] [argument ...]\n");
    }

    if !cmd.aliases().is_empty() {
        let _ = writeln!(text, "\nAliases: {}", cmd.aliases().join(", "));
    }

    if cmd.has_subs() {
        let width = cmd.subs().name_width();
        text.push_str("\nSub Commands:");
        for sub in cmd.subs().iter().filter(|s| !s.is_hidden()) {
            let _ = write!(
                text,
                "\n  {:<width$} {}{}",
                sub.name(),
                upper_first(sub.description()),
                alias_suffix(sub.aliases())
            );
        }
        text.push('\n');
    }

    if !cmd.help().is_empty() {
        let _ = writeln!(text, "\n{}", cmd.help().trim_end());
    }

    let mut vars = app.help_vars().clone();
    vars.add_replace("cmd", cmd.name());
    vars.add_replace("fullCmd", cmd.path());
    vars.replace_pairs(&text)
}

/// Version banner.
pub fn render_version(app: &App) -> String {
    format!(
        "{}\n\nVersion: {}\n",
        upper_first(app.description()),
        app.version()
    )
}

/// Usage of the help command itself.
pub fn render_help_usage(bin_name: &str) -> String {
    format!(
        "Display help message for application or command.\n\n\
         Usage:\n  {bin_name} {{COMMAND}} --help OR {bin_name} help {{COMMAND}}\n"
    )
}

/// Unknown command report with optional suggestions.
pub fn render_command_tips(name: &str, suggestions: &[String], bin_name: &str) -> String {
    let mut text = format!("ERROR: unknown input command \"{name}\"\n");
    if !suggestions.is_empty() {
        let _ = writeln!(text, "\nMaybe you mean:\n  {}", suggestions.join(", "));
    }
    let _ = writeln!(text, "\nUse {bin_name} --help to see available commands");
    text
}
