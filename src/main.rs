//! Crank demo - a small build tool wired on top of the dispatch engine.

use std::path::PathBuf;

use anyhow::bail;
use crank::{logging, to_args, App, Command, Config, Event, Result};
use tracing::{error, info};

/// Environment variable that points at an alternative config file.
const CONFIG_ENV: &str = "CRANK_CONFIG";

fn main() {
    let code = match setup() {
        Ok(mut app) => app.run(None),
        Err(e) => {
            eprintln!("{}: {}", e.category(), e);
            1
        }
    };
    std::process::exit(code);
}

fn setup() -> Result<App> {
    let config_path = std::env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(Config::default_path);
    let config = Config::load_from_file(&config_path)?;

    let mut app = App::new("crank", "a tiny build and release tool")
        .with_version(env!("CARGO_PKG_VERSION"));

    for cmd in [build_command(), deploy_command(), release_command(), inspect_command()] {
        app.try_add(cmd)?;
    }

    install_hooks(&mut app, config.log_file.clone());
    app.apply_config(&config)?;
    Ok(app)
}

fn install_hooks(app: &mut App, log_file: Option<PathBuf>) {
    // Logging can only be set up once the verbosity flags are known.
    app.on(Event::GlobalOptsParsed, move |ctx| {
        let verbosity = ctx.app().map(App::verbosity).unwrap_or_default();
        match &log_file {
            Some(path) => logging::init_file_logging(path, verbosity),
            None => logging::init_stderr_logging(verbosity),
        };
        false
    });

    app.on(Event::CmdExecBefore, |ctx| {
        if let Some(cmd) = ctx.cmd() {
            info!(command = %cmd.path, "executing command");
        }
        false
    });

    app.on(Event::AppRunError, |ctx| {
        if let Some(err) = ctx.err() {
            error!(category = err.category(), suggestions = ?err.suggestions(), "{err}");
        }
        false
    });
}

fn build_command() -> Command {
    Command::new("build", "compile the project")
        .with_aliases(["b"])
        .with_help("Options:\n  --release  Build with optimizations\n\nExample:\n  {$binName} {$cmd} --release")
        .with_func(|app, args| {
            let mut profile = "debug";
            for arg in args {
                match arg.as_str() {
                    "--release" => profile = "release",
                    other => bail!("unknown option '{other}'"),
                }
            }
            app.output().print(&format!("Building {profile} profile\n"));
            Ok(())
        })
}

fn deploy_command() -> Command {
    Command::new("deploy", "deploy the last build")
        .with_module("ops")
        .with_sub(
            Command::new("staging", "deploy to the staging environment")
                .with_aliases(["stg"])
                .with_func(|app, _| {
                    app.output().print("Deploying to staging\n");
                    Ok(())
                }),
        )
        .with_sub(
            Command::new("prod", "deploy to production").with_func(|app, args| {
                if !args.iter().any(|a| a == "--confirm") {
                    bail!("refusing to deploy to production without --confirm");
                }
                app.output().print("Deploying to production\n");
                Ok(())
            }),
        )
}

fn release_command() -> Command {
    Command::new("release", "build in release mode")
        .with_module("ops")
        .with_func(|app, _| {
            app.exec("build", &to_args(["--release"]))?;
            app.output().print("Release ready\n");
            Ok(())
        })
}

fn inspect_command() -> Command {
    Command::new("inspect", "print the resolved run context")
        .hidden()
        .with_func(|app, _| {
            let out = app.output();
            out.print(&format!("input: {}\n", app.input_name()));
            out.print(&format!("command: {}\n", app.command_name()));
            out.print(&format!("args: {}\n", app.args().join(" ")));
            out.print(&format!("verbosity: {}\n", app.verbosity().as_str()));
            Ok(())
        })
}
