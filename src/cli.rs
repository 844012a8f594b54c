//! Global option parsing.
//!
//! Global options belong to the application, not to any command, and are only
//! recognised before the first positional token. Everything from that token on
//! is handed back untouched for command resolution.

use clap::{ArgAction, CommandFactory, Parser};
use serde::{Deserialize, Serialize};

use crate::error::{CrankError, Result};

/// Logging verbosity, from silent to everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    Quiet,
    #[default]
    Error,
    Warn,
    Info,
    Debug,
    Crazy,
}

impl Verbosity {
    const LEVELS: [Verbosity; 6] = [
        Self::Quiet,
        Self::Error,
        Self::Warn,
        Self::Info,
        Self::Debug,
        Self::Crazy,
    ];

    /// Tracing filter directive for this level.
    pub fn as_filter(&self) -> &'static str {
        match self {
            Self::Quiet => "off",
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Crazy => "trace",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Quiet => "quiet",
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Crazy => "crazy",
        }
    }

    /// Raises the level by `steps`, saturating at [`Verbosity::Crazy`].
    pub fn raised(self, steps: u8) -> Self {
        let index = (self as usize + steps as usize).min(Self::LEVELS.len() - 1);
        Self::LEVELS[index]
    }
}

impl std::str::FromStr for Verbosity {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "quiet" | "0" => Ok(Self::Quiet),
            "error" | "1" => Ok(Self::Error),
            "warn" | "2" => Ok(Self::Warn),
            "info" | "3" => Ok(Self::Info),
            "debug" | "4" => Ok(Self::Debug),
            "crazy" | "trace" | "5" => Ok(Self::Crazy),
            _ => Err(format!(
                "Invalid verbosity: {s}. Expected: quiet, error, warn, info, debug, or crazy"
            )),
        }
    }
}

/// Options understood by every application.
#[derive(Parser, Debug, Clone, Default, PartialEq, Eq)]
#[command(no_binary_name = true, disable_help_flag = true, disable_version_flag = true)]
pub struct GlobalOpts {
    /// Display the help information
    #[arg(short = 'h', long)]
    pub help: bool,

    /// Display the application version
    #[arg(short = 'V', long)]
    pub version: bool,

    /// Raise logging verbosity (repeatable)
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only report errors, silence all logging
    #[arg(short = 'q', long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Command name followed by its arguments
    #[arg(trailing_var_arg = true, hide = true, value_name = "COMMAND")]
    pub rest: Vec<String>,
}

impl GlobalOpts {
    /// Parses global options from the front of `args`.
    ///
    /// Returns the options with `rest` holding the unconsumed arguments.
    pub fn parse_args<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<std::ffi::OsString> + Clone,
    {
        Self::try_parse_from(args).map_err(|e| {
            let msg = e.to_string();
            CrankError::global_options(msg.trim_start_matches("error: ").trim_end())
        })
    }

    /// Effective verbosity starting from `base`.
    pub fn verbosity(&self, base: Verbosity) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            base.raised(self.verbose)
        }
    }

    /// Help listing of the visible global options.
    pub fn help_text() -> String {
        let cmd = Self::command();
        let rows: Vec<(String, String)> = cmd
            .get_arguments()
            .filter(|arg| !arg.is_hide_set() && !arg.is_positional())
            .map(|arg| {
                let short = arg
                    .get_short()
                    .map(|c| format!("-{c}, "))
                    .unwrap_or_else(|| "    ".to_string());
                let long = arg
                    .get_long()
                    .map(|l| format!("--{l}"))
                    .unwrap_or_default();
                let help = arg.get_help().map(|h| h.to_string()).unwrap_or_default();
                (format!("{short}{long}"), help)
            })
            .collect();

        let width = rows.iter().map(|(flag, _)| flag.len()).max().unwrap_or(0);
        rows.iter()
            .map(|(flag, help)| format!("  {flag:<width$}  {help}\n"))
            .collect()
    }
}
