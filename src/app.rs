//! Application dispatch engine.
//!
//! [`App::run`] drives one invocation:
//!
//! 1. parse global options from the front of the arguments
//! 2. resolve the command name (help, fallback function, unknown-command tips)
//! 3. fire `app.prepared`, then run the command inside the lifecycle events
//! 4. compute the exit code and optionally terminate the process
//!
//! Setup (commands, aliases, hooks) happens before the first run and is
//! read-only afterwards; everything runs on the caller's thread.

use std::ffi::OsString;
use std::ops::ControlFlow;
use std::path::Path;

use tracing::debug;

use crate::cli::{GlobalOpts, Verbosity};
use crate::commands::help::{
    render_app_help, render_command_help, render_command_tips, render_help_usage,
    render_version,
};
use crate::commands::router::{self, Resolution};
use crate::commands::{
    is_good_cmd_name, is_good_name, Command, CommandFn, CommandInfo, CommandTable, HelpReplacer,
    Output, HELP_COMMAND,
};
use crate::config::Config;
use crate::error::{CrankError, Result};
use crate::hooks::{Event, HookCtx, Hooks};

/// Exit code for success.
pub const OK: i32 = 0;
/// Exit code for any failure.
pub const ERR: i32 = 2;

/// State of the current (or last) run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunContext {
    /// Arguments as given to `run`.
    pub raw_args: Vec<String>,
    /// Command token the user typed, empty when none was typed.
    pub input_name: String,
    /// Resolved canonical command name.
    pub command_name: String,
    /// Arguments not consumed by global options or the command token.
    pub args: Vec<String>,
}

/// A command-line application.
pub struct App {
    name: String,
    description: String,
    version: String,
    bin_name: String,
    default_command: Option<String>,
    exit_on_end: bool,
    verbosity: Verbosity,
    func: Option<CommandFn>,
    commands: CommandTable,
    hooks: Hooks,
    vars: HelpReplacer,
    output: Output,
    gopts: GlobalOpts,
    run: RunContext,
    initialized: bool,
}

impl App {
    /// Creates an application.
    ///
    /// The binary name (`{$binName}`) defaults to the file name the program
    /// was invoked as, or to `name` when that is unavailable.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        let name = name.into();
        let bin_name = invocation_name().unwrap_or_else(|| name.clone());
        let work_dir = std::env::current_dir()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        let mut vars = HelpReplacer::default();
        vars.add_replaces([("binName", bin_name.clone()), ("workDir", work_dir)]);

        Self {
            bin_name,
            name,
            description: description.into(),
            version: "1.0.0".to_string(),
            default_command: None,
            exit_on_end: false,
            verbosity: Verbosity::default(),
            func: None,
            commands: CommandTable::default(),
            hooks: Hooks::default(),
            vars,
            output: Output::default(),
            gopts: GlobalOpts::default(),
            run: RunContext::default(),
            initialized: false,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Sets the program name used in help text (`{$binName}`).
    pub fn with_bin_name(mut self, bin_name: impl Into<String>) -> Self {
        self.set_bin_name(bin_name);
        self
    }

    /// Command to run when no command token is given.
    pub fn with_default_command(mut self, name: impl Into<String>) -> Self {
        self.default_command = Some(name.into());
        self
    }

    /// Terminate the process with the exit code once `run` finishes.
    pub fn with_exit_on_end(mut self, exit: bool) -> Self {
        self.exit_on_end = exit;
        self
    }

    /// Base verbosity, raised by `-v` at run time.
    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn with_output(mut self, output: Output) -> Self {
        self.output = output;
        self
    }

    /// Fallback function run when no command name resolves.
    pub fn with_func<F>(mut self, func: F) -> Self
    where
        F: Fn(&App, &[String]) -> anyhow::Result<()> + 'static,
    {
        self.func = Some(Box::new(func));
        self
    }

    fn set_bin_name(&mut self, bin_name: impl Into<String>) {
        self.bin_name = bin_name.into();
        self.vars.add_replace("binName", self.bin_name.clone());
    }

    /// Applies settings, aliases and help variables from a config file.
    ///
    /// Call after the commands are registered: aliases must target them.
    pub fn apply_config(&mut self, config: &Config) -> Result<()> {
        let app = &config.app;
        if let Some(name) = &app.name {
            self.set_bin_name(name.clone());
        }
        if let Some(description) = &app.description {
            self.description = description.clone();
        }
        if let Some(version) = &app.version {
            self.version = version.clone();
        }
        if let Some(default_command) = &app.default_command {
            self.default_command = Some(default_command.clone());
        }
        if app.exit_on_end {
            self.exit_on_end = true;
        }
        if let Some(verbosity) = app.verbosity {
            self.verbosity = verbosity;
        }

        for (alias, name) in &config.aliases {
            self.commands.try_add_aliases(name, [alias.as_str()])?;
        }
        for (name, value) in &config.help_vars {
            self.add_help_var(name, value)?;
        }
        Ok(())
    }

    // Registration

    /// Registers a command.
    ///
    /// # Panics
    ///
    /// Panics on a configuration error (invalid or duplicate name, bad alias).
    /// Use [`App::try_add`] to handle the error instead.
    #[track_caller]
    pub fn add(&mut self, cmd: Command) -> &mut Self {
        if let Err(e) = self.try_add(cmd) {
            panic!("{e}");
        }
        self
    }

    /// Registers several commands, panicking on the first configuration error.
    #[track_caller]
    pub fn add_commands<I: IntoIterator<Item = Command>>(&mut self, cmds: I) -> &mut Self {
        for cmd in cmds {
            self.add(cmd);
        }
        self
    }

    /// Registers a command and fires `cmd.init.after` for it and each sub-command.
    pub fn try_add(&mut self, cmd: Command) -> Result<()> {
        let mut infos = Vec::new();
        collect_infos(self.commands.try_insert(cmd, "")?, &mut infos);

        for info in infos {
            debug!(command = %info.path, aliases = ?info.aliases, "command registered");
            let mut ctx = self.hook_ctx(Event::CmdInitAfter);
            ctx.with_cmd(info);
            self.hooks.fire(Event::CmdInitAfter, &mut ctx);
        }
        Ok(())
    }

    /// Adds aliases to a registered command.
    ///
    /// # Panics
    ///
    /// Panics on a configuration error; see [`App::try_add_aliases`].
    #[track_caller]
    pub fn add_aliases<I, S>(&mut self, name: &str, aliases: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Err(e) = self.try_add_aliases(name, aliases) {
            panic!("{e}");
        }
        self
    }

    pub fn try_add_aliases<I, S>(&mut self, name: &str, aliases: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.commands.try_add_aliases(name, aliases)
    }

    /// Adds a `{$name}` help placeholder.
    pub fn add_help_var(&mut self, name: &str, value: impl Into<String>) -> Result<()> {
        if !is_good_name(name) {
            return Err(CrankError::config(format!("help var name '{name}' is invalid")));
        }
        self.vars.add_replace(name, value);
        Ok(())
    }

    // Hooks

    /// Registers a hook, replacing any existing one for `event`.
    pub fn on<F>(&mut self, event: Event, handler: F) -> &mut Self
    where
        F: for<'a> Fn(&mut HookCtx<'a>) -> bool + 'static,
    {
        self.hooks.on(event, handler);
        self
    }

    /// Registers a hook only if `event` has none yet.
    pub fn add_hook<F>(&mut self, event: Event, handler: F) -> &mut Self
    where
        F: for<'a> Fn(&mut HookCtx<'a>) -> bool + 'static,
    {
        self.hooks.add_hook(event, handler);
        self
    }

    pub fn has_hook(&self, event: Event) -> bool {
        self.hooks.has_hook(event)
    }

    pub fn reset_hooks(&mut self) {
        self.hooks.reset_hooks();
    }

    /// Fires `event` with `ctx`; returns the handler's stop signal.
    pub fn fire(&self, event: Event, ctx: &mut HookCtx<'_>) -> bool {
        self.hooks.fire(event, ctx)
    }

    fn hook_ctx(&self, event: Event) -> HookCtx<'_> {
        let mut ctx = HookCtx::new(event);
        ctx.with_app(self);
        ctx
    }

    /// Fires a command-scoped event; true only if it stopped an abortable event.
    fn fire_for(&self, event: Event, cmd: &Command, args: &[String]) -> bool {
        let mut ctx = self.hook_ctx(event);
        ctx.with_cmd(cmd.info()).set("args", args.to_vec());
        self.hooks.fire(event, &mut ctx) && event.can_abort()
    }

    fn fire_error(&self, event: Event, cmd: Option<&Command>, err: &CrankError) {
        let mut ctx = self.hook_ctx(event);
        if let Some(cmd) = cmd {
            ctx.with_cmd(cmd.info());
        }
        ctx.with_err(err.clone());
        self.hooks.fire(event, &mut ctx);
    }

    /// Fires `cmd.not.found` then the specific not-found event; true if either stopped.
    fn fire_not_found(
        &self,
        specific: Event,
        parent: Option<&Command>,
        name: &str,
        suggestions: &[String],
    ) -> bool {
        [Event::CmdNotFound, specific].into_iter().any(|event| {
            let mut ctx = self.hook_ctx(event);
            if let Some(parent) = parent {
                ctx.with_cmd(parent.info());
            }
            ctx.set("name", name).set("suggestions", suggestions.to_vec());
            self.hooks.fire(event, &mut ctx)
        })
    }

    /// Fires `app.init.after` once. Called by [`App::run`] if not done already.
    pub fn initialize(&mut self) {
        if self.initialized {
            return;
        }
        self.initialized = true;

        debug!(app = %self.name, commands = self.commands.len(), "application initialized");
        let mut ctx = self.hook_ctx(Event::AppInitAfter);
        self.hooks.fire(Event::AppInitAfter, &mut ctx);
    }

    // Accessors

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn bin_name(&self) -> &str {
        &self.bin_name
    }

    pub fn default_command(&self) -> Option<&str> {
        self.default_command.as_deref()
    }

    pub fn exit_on_end(&self) -> bool {
        self.exit_on_end
    }

    /// Effective verbosity: the base level adjusted by the parsed global options.
    pub fn verbosity(&self) -> Verbosity {
        self.gopts.verbosity(self.verbosity)
    }

    pub fn output(&self) -> &Output {
        &self.output
    }

    pub fn commands(&self) -> &CommandTable {
        &self.commands
    }

    pub fn command(&self, name: &str) -> Option<&Command> {
        self.commands.get(name)
    }

    pub fn is_command(&self, name: &str) -> bool {
        self.commands.contains(name)
    }

    pub fn resolve_alias<'a>(&'a self, token: &'a str) -> &'a str {
        self.commands.resolve_alias(token)
    }

    /// Up to five registered names or aliases related to `input`, plus `help`.
    pub fn find_similar(&self, input: &str) -> Vec<String> {
        self.commands.find_similar(input, true)
    }

    pub fn help_vars(&self) -> &HelpReplacer {
        &self.vars
    }

    /// Substitutes `{$name}` placeholders in `input`.
    pub fn replace_vars(&self, input: &str) -> String {
        self.vars.replace_pairs(input)
    }

    pub fn global_opts(&self) -> &GlobalOpts {
        &self.gopts
    }

    pub fn run_context(&self) -> &RunContext {
        &self.run
    }

    /// Canonical name of the command being (or last) run.
    pub fn command_name(&self) -> &str {
        &self.run.command_name
    }

    /// Command token as typed by the user.
    pub fn input_name(&self) -> &str {
        &self.run.input_name
    }

    /// Remaining arguments for the command.
    pub fn args(&self) -> &[String] {
        &self.run.args
    }

    pub fn raw_args(&self) -> &[String] {
        &self.run.raw_args
    }

    // Running

    /// Runs the application and returns the exit code.
    ///
    /// `None` uses the process arguments without the program name. If
    /// exit-on-end is set, the process terminates with the code instead.
    pub fn run(&mut self, args: Option<Vec<String>>) -> i32 {
        self.initialize();

        let args = args.unwrap_or_else(|| lossy_args(std::env::args_os().skip(1)));
        debug!(?args, "begin run cli application");
        self.run = RunContext {
            raw_args: args.clone(),
            ..RunContext::default()
        };

        let code = self.run_stages(args);
        self.exit_on_end_with(code)
    }

    fn run_stages(&mut self, args: Vec<String>) -> i32 {
        let rest = match self.parse_global_opts(&args) {
            ControlFlow::Continue(rest) => rest,
            ControlFlow::Break(code) => return code,
        };

        let name = match self.prepare_run(rest) {
            ControlFlow::Continue(name) => name,
            ControlFlow::Break(code) => return code,
        };

        // Observe-only: the stop signal of this event is not checked.
        let mut ctx = self.hook_ctx(Event::AppPrepared);
        ctx.set("name", name.as_str());
        self.hooks.fire(Event::AppPrepared, &mut ctx);

        let code = self.do_run_cmd(&name);
        debug!(command = %name, code, "command run complete");
        code
    }

    fn parse_global_opts(&mut self, args: &[String]) -> ControlFlow<i32, Vec<String>> {
        debug!("will begin parse global options");
        let opts = match GlobalOpts::parse_args(args) {
            Ok(opts) => opts,
            Err(e) => {
                self.output.eprint(&format!("{e}\n"));
                return ControlFlow::Break(ERR);
            }
        };
        let rest = opts.rest.clone();
        self.gopts = opts;
        self.run.args = rest.clone();

        let mut ctx = self.hook_ctx(Event::GlobalOptsParsed);
        ctx.set("verbose", self.verbosity().as_str())
            .set("quiet", self.gopts.quiet)
            .set("args", rest.clone());
        self.hooks.fire(Event::GlobalOptsParsed, &mut ctx);
        debug!(verbosity = self.verbosity().as_str(), "global options parsed");

        if self.gopts.help {
            self.show_app_help();
            return ControlFlow::Break(OK);
        }
        if self.gopts.version {
            self.show_version();
            return ControlFlow::Break(OK);
        }
        ControlFlow::Continue(rest)
    }

    /// Resolves the command; `Continue` carries the canonical name to run.
    fn prepare_run(&mut self, args: Vec<String>) -> ControlFlow<i32, String> {
        match router::resolve(&self.commands, self.default_command.as_deref(), &args) {
            Resolution::Help(list) => {
                self.run.args = list;
                ControlFlow::Break(self.show_help_for(&self.run.args))
            }
            Resolution::Empty => {
                self.run.args = args;
                if self.func.is_some() {
                    ControlFlow::Break(self.run_func())
                } else {
                    self.show_app_help();
                    ControlFlow::Break(OK)
                }
            }
            Resolution::Unknown(name) => {
                debug!(command = %name, "input command is not registered");
                self.run.args = args;
                ControlFlow::Break(self.show_command_tips(&name))
            }
            Resolution::Command { name, input, rest } => {
                self.run.input_name = input.unwrap_or_default();
                self.run.command_name = name.clone();
                self.run.args = rest;
                ControlFlow::Continue(name)
            }
        }
    }

    fn run_func(&self) -> i32 {
        let Some(func) = &self.func else {
            return OK;
        };

        debug!(args = ?self.run.args, "run application function");
        match func(self, &self.run.args) {
            Ok(()) => {
                let mut ctx = self.hook_ctx(Event::AppRunAfter);
                self.hooks.fire(Event::AppRunAfter, &mut ctx);
                OK
            }
            Err(e) => {
                let err = CrankError::execution(self.name.as_str(), e);
                self.report_error(&err);
                self.fire_error(Event::AppRunError, None, &err);
                ERR
            }
        }
    }

    fn do_run_cmd(&self, name: &str) -> i32 {
        let Some(cmd) = self.commands.get(name) else {
            return ERR;
        };
        let args = &self.run.args;

        // Observers get a snapshot; the body cannot change what they saw.
        if self.fire_for(Event::AppRunBefore, cmd, args) {
            debug!(command = %name, "run stopped by app.run.before hook");
            return OK;
        }

        debug!(command = %name, ?args, "will run command");
        match self.dispatch_command(cmd, args) {
            Ok(()) => {
                self.fire_for(Event::AppRunAfter, cmd, args);
                OK
            }
            Err(err) => {
                if !matches!(err, CrankError::UnknownSubcommand { .. }) {
                    self.report_error(&err);
                }
                self.fire_error(Event::AppRunError, Some(cmd), &err);
                ERR
            }
        }
    }

    /// Runs a command inside the `cmd.run.*` events, descending into sub-commands.
    fn dispatch_command(&self, cmd: &Command, args: &[String]) -> Result<()> {
        if self.fire_for(Event::CmdRunBefore, cmd, args) {
            debug!(command = %cmd.path(), "run stopped by cmd.run.before hook");
            return Ok(());
        }

        let result = self.dispatch_inner(cmd, args);
        match &result {
            Ok(()) => {
                self.fire_for(Event::CmdRunAfter, cmd, args);
            }
            Err(err) => self.fire_error(Event::CmdRunError, Some(cmd), err),
        }
        result
    }

    fn dispatch_inner(&self, cmd: &Command, args: &[String]) -> Result<()> {
        if matches!(args.first().map(String::as_str), Some("-h" | "--help")) {
            self.show_command_help(cmd);
            return Ok(());
        }

        if cmd.has_subs() {
            if let Some(first) = args.first().filter(|a| is_good_cmd_name(a)) {
                let sub_name = cmd.subs().resolve_alias(first);
                return match cmd.subs().get(sub_name) {
                    Some(sub) => {
                        debug!(command = %cmd.path(), sub = %sub.name(), "dispatch sub-command");
                        self.dispatch_command(sub, &args[1..])
                    }
                    None => Err(self.sub_not_found(cmd, first)),
                };
            }
            if !cmd.is_runnable() {
                self.show_command_help(cmd);
                return Ok(());
            }
        }

        self.execute_command(cmd, args)
    }

    fn sub_not_found(&self, cmd: &Command, name: &str) -> CrankError {
        let suggestions = cmd.subs().find_similar(name, false);
        if !self.fire_not_found(Event::CmdSubNotFound, Some(cmd), name, &suggestions) {
            let tips = render_command_tips(name, &suggestions, &format!("{} {}", self.bin_name, cmd.path()));
            self.output.eprint(&tips);
        }
        CrankError::UnknownSubcommand {
            parent: cmd.path().to_string(),
            name: name.to_string(),
            suggestions,
        }
    }

    /// Runs a command body inside the `cmd.exec.*` events.
    fn execute_command(&self, cmd: &Command, args: &[String]) -> Result<()> {
        if self.fire_for(Event::CmdExecBefore, cmd, args) {
            debug!(command = %cmd.path(), "execution stopped by cmd.exec.before hook");
            return Ok(());
        }

        let Some(func) = &cmd.func else {
            self.show_command_help(cmd);
            return Ok(());
        };

        debug!(command = %cmd.path(), ?args, "execute command");
        match func(self, args) {
            Ok(()) => {
                self.fire_for(Event::CmdExecAfter, cmd, args);
                Ok(())
            }
            Err(e) => {
                let err = CrankError::execution(cmd.path(), e);
                self.fire_error(Event::CmdExecError, Some(cmd), &err);
                Err(err)
            }
        }
    }

    /// Runs another command from inside a running one.
    ///
    /// Looks `name` up directly (no alias resolution, no suggestions) and
    /// fires only the `cmd.exec.*` events. Errors are returned, not turned
    /// into an exit code.
    pub fn exec(&self, name: &str, args: &[String]) -> Result<()> {
        let Some(cmd) = self.commands.get(name) else {
            return Err(CrankError::unknown_command(name, Vec::new()));
        };
        debug!(command = %name, ?args, "exec command");
        self.execute_command(cmd, args)
    }

    fn exit_on_end_with(&self, code: i32) -> i32 {
        debug!(code, "application exit");
        if self.exit_on_end {
            std::process::exit(code);
        }
        code
    }

    // Display

    fn report_error(&self, err: &CrankError) {
        self.output.eprint(&format!("ERROR: {err}\n"));
    }

    /// Prints the full application help.
    pub fn show_app_help(&self) {
        debug!("render application commands list");
        self.output.print(&render_app_help(self));
    }

    /// Prints the version banner.
    pub fn show_version(&self) {
        self.output.print(&render_version(self));
    }

    /// Prints focused help for a command.
    pub fn show_command_help(&self, cmd: &Command) {
        self.output.print(&render_command_help(self, cmd));
    }

    /// Handles `help [COMMAND]`.
    fn show_help_for(&self, list: &[String]) -> i32 {
        match list {
            [] => {
                self.show_app_help();
                OK
            }
            [name] => self.show_command_help_by_name(name),
            _ => {
                let err = CrankError::usage(format!(
                    "Too many arguments given.\n\nUsage: {} help {{COMMAND}}",
                    self.bin_name
                ));
                self.report_error(&err);
                ERR
            }
        }
    }

    fn show_command_help_by_name(&self, name: &str) -> i32 {
        let real = self.commands.resolve_alias(name);
        if real == HELP_COMMAND || real == "-h" {
            self.output.print(&render_help_usage(&self.bin_name));
            return OK;
        }

        match self.commands.get(real) {
            Some(cmd) => {
                self.show_command_help(cmd);
                OK
            }
            None => {
                self.output.eprint(&format!(
                    "ERROR: Unknown command name '{real}'. Run '{} -h' to see all commands\n",
                    self.bin_name
                ));
                ERR
            }
        }
    }

    /// Reports an unknown top-level command with suggestions.
    fn show_command_tips(&self, name: &str) -> i32 {
        let suggestions = self.find_similar(name);
        if !self.fire_not_found(Event::AppCmdNotFound, None, name, &suggestions) {
            self.output
                .eprint(&render_command_tips(name, &suggestions, &self.bin_name));
        }
        ERR
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("name", &self.name)
            .field("version", &self.version)
            .field("bin_name", &self.bin_name)
            .field("default_command", &self.default_command)
            .field("commands", &self.commands)
            .field("hooks", &self.hooks)
            .field("run", &self.run)
            .finish()
    }
}

/// Snapshots of `cmd` and its sub-commands, parents first.
fn collect_infos(cmd: &Command, out: &mut Vec<CommandInfo>) {
    out.push(cmd.info());
    for sub in cmd.subs().iter() {
        collect_infos(sub, out);
    }
}

/// File name of the running program.
fn invocation_name() -> Option<String> {
    let arg0 = std::env::args_os().next()?;
    Path::new(&arg0)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
}

/// Converts OS arguments, replacing invalid UTF-8 instead of failing.
fn lossy_args<I: IntoIterator<Item = OsString>>(args: I) -> Vec<String> {
    args.into_iter()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect()
}

/// Converts a string slice list into owned arguments.
pub fn to_args<I, S>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    args.into_iter().map(Into::into).collect()
}
