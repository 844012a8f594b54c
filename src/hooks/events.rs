//! Lifecycle event vocabulary.
//!
//! Relative firing order across one successful run:
//!
//! ```text
//! app.init.after (setup) -> gopts.parsed -> app.prepared
//!   -> app.run.before -> cmd.run.before -> cmd.exec.before
//!   -> (command body)
//!   -> cmd.exec.after|cmd.exec.error -> cmd.run.after|cmd.run.error
//!   -> app.run.after|app.run.error
//! ```
//!
//! `cmd.init.after` fires per command at registration. The not-found events
//! fire in place of the run sequence when resolution fails.

use std::fmt;
use std::str::FromStr;

/// A named point in the dispatch pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Event {
    AppInitAfter,
    GlobalOptsParsed,
    AppPrepared,
    AppRunBefore,
    AppRunAfter,
    AppRunError,
    CmdInitAfter,
    /// Any command (top-level or sub) could not be resolved.
    CmdNotFound,
    /// A top-level command could not be resolved.
    AppCmdNotFound,
    /// A sub-command could not be resolved.
    CmdSubNotFound,
    CmdRunBefore,
    CmdRunAfter,
    CmdRunError,
    CmdExecBefore,
    CmdExecAfter,
    CmdExecError,
}

impl Event {
    /// Every event, in declaration order.
    pub const ALL: [Event; 16] = [
        Event::AppInitAfter,
        Event::GlobalOptsParsed,
        Event::AppPrepared,
        Event::AppRunBefore,
        Event::AppRunAfter,
        Event::AppRunError,
        Event::CmdInitAfter,
        Event::CmdNotFound,
        Event::AppCmdNotFound,
        Event::CmdSubNotFound,
        Event::CmdRunBefore,
        Event::CmdRunAfter,
        Event::CmdRunError,
        Event::CmdExecBefore,
        Event::CmdExecAfter,
        Event::CmdExecError,
    ];

    /// Stable string key of the event.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AppInitAfter => "app.init.after",
            Self::GlobalOptsParsed => "gopts.parsed",
            Self::AppPrepared => "app.prepared",
            Self::AppRunBefore => "app.run.before",
            Self::AppRunAfter => "app.run.after",
            Self::AppRunError => "app.run.error",
            Self::CmdInitAfter => "cmd.init.after",
            Self::CmdNotFound => "cmd.not.found",
            Self::AppCmdNotFound => "app.cmd.not.found",
            Self::CmdSubNotFound => "cmd.sub.not.found",
            Self::CmdRunBefore => "cmd.run.before",
            Self::CmdRunAfter => "cmd.run.after",
            Self::CmdRunError => "cmd.run.error",
            Self::CmdExecBefore => "cmd.exec.before",
            Self::CmdExecAfter => "cmd.exec.after",
            Self::CmdExecError => "cmd.exec.error",
        }
    }

    /// Returns true if a handler's stop signal aborts the rest of the pipeline.
    ///
    /// `app.prepared` is observe-only even though it fires mid-run.
    pub fn can_abort(&self) -> bool {
        matches!(
            self,
            Self::AppRunBefore | Self::CmdRunBefore | Self::CmdExecBefore
        )
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Event {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| format!("Unknown event: {s}"))
    }
}
