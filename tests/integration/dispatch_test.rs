//! Dispatch of commands, sub-commands and command help.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::bail;
use crank::{to_args, App, Command, Event, Output, ERR, OK};
use serde_json::json;

use super::test_app;

fn ops_app() -> App {
    let mut app = test_app();
    app.add(
        Command::new("cloud", "manage cloud resources")
            .with_module("ops")
            .with_help("Run {$binName} {$fullCmd} SUBCOMMAND")
            .with_sub(
                Command::new("start", "start an instance")
                    .with_aliases(["up"])
                    .with_func(|app, args| {
                        app.output().print(&format!("start:{}\n", args.join(",")));
                        Ok(())
                    }),
            )
            .with_sub(Command::new("stop", "stop an instance").with_func(|app, _| {
                app.output().print("stop\n");
                Ok(())
            })),
    );
    app.add(
        Command::new("secret", "internal helper")
            .hidden()
            .with_func(|app, _| {
                app.output().print("secret\n");
                Ok(())
            }),
    );
    app
}

#[test]
fn test_sub_command_by_alias() {
    let mut app = ops_app();
    assert_eq!(app.run(Some(to_args(["cloud", "up", "web-1"]))), OK);
    assert_eq!(app.output().contents(), "start:web-1\n");
    assert_eq!(app.command_name(), "cloud");
    assert_eq!(app.args(), ["up", "web-1"]);
}

#[test]
fn test_sub_command_events_use_full_path() {
    let mut app = ops_app();
    let paths: Rc<RefCell<Vec<String>>> = Rc::default();
    let slot = Rc::clone(&paths);
    app.on(Event::CmdRunBefore, move |ctx| {
        if let Some(cmd) = ctx.cmd() {
            slot.borrow_mut().push(cmd.path.clone());
        }
        false
    });

    assert_eq!(app.run(Some(to_args(["cloud", "stop"]))), OK);
    assert_eq!(*paths.borrow(), ["cloud", "cloud stop"]);
}

#[test]
fn test_parent_without_body_renders_help() {
    let mut app = ops_app();
    assert_eq!(app.run(Some(to_args(["cloud"]))), OK);

    let out = app.output().contents();
    assert!(out.starts_with("Manage cloud resources\n"));
    assert!(out.contains("tool cloud [--option ...] SUBCOMMAND"));
    assert!(out.contains("Sub Commands:"));
    assert!(out.contains("Start an instance (alias: up)"));
    assert!(out.contains("Run tool cloud SUBCOMMAND"));
}

#[test]
fn test_unknown_sub_command() {
    let mut app = ops_app();
    let seen: Rc<RefCell<Vec<serde_json::Value>>> = Rc::default();
    let slot = Rc::clone(&seen);
    app.on(Event::CmdSubNotFound, move |ctx| {
        slot.borrow_mut().push(ctx.get("name").cloned().unwrap_or_default());
        slot.borrow_mut()
            .push(ctx.get("suggestions").cloned().unwrap_or_default());
        false
    });

    assert_eq!(app.run(Some(to_args(["cloud", "sto"]))), ERR);
    assert_eq!(*seen.borrow(), [json!("sto"), json!(["stop"])]);

    let out = app.output().contents();
    assert!(out.contains("ERROR: unknown input command \"sto\""));
    assert!(out.contains("Maybe you mean:\n  stop"));
    assert!(out.contains("Use tool cloud --help"));
}

#[test]
fn test_command_help_flag_skips_body() {
    let mut app = test_app();
    assert_eq!(app.run(Some(to_args(["build", "--help"]))), OK);

    let out = app.output().contents();
    assert!(out.starts_with("Compile the project\n"));
    assert!(!out.contains("build:"));
}

#[test]
fn test_help_flag_after_other_args_reaches_body() {
    let mut app = test_app();
    assert_eq!(app.run(Some(to_args(["build", "x", "-h"]))), OK);
    assert_eq!(app.output().contents(), "build:x,-h\n");
}

#[test]
fn test_execution_error_maps_to_err() {
    let mut app = App::new("tool", "").with_output(Output::buffer());
    app.add(Command::new("lint", "").with_func(|_, args| {
        if args.is_empty() {
            bail!("no files given");
        }
        Ok(())
    }));

    assert_eq!(app.run(Some(to_args(["lint"]))), ERR);
    assert_eq!(
        app.output().contents(),
        "ERROR: command 'lint' failed: no files given\n"
    );

    app.output().clear();
    assert_eq!(app.run(Some(to_args(["lint", "src"]))), OK);
    assert_eq!(app.output().contents(), "");
}

#[test]
fn test_listing_groups_modules_and_hides_hidden() {
    let mut app = ops_app();
    assert_eq!(app.run(Some(vec![])), OK);

    let out = app.output().contents();
    let build = out.find("  build").unwrap();
    let ops = out.find("\n ops").unwrap();
    let cloud = out.find("  cloud").unwrap();
    assert!(build < ops && ops < cloud);
    assert!(!out.contains("secret"));
}

#[test]
fn test_hidden_command_still_runs() {
    let mut app = ops_app();
    assert_eq!(app.run(Some(to_args(["secret"]))), OK);
    assert_eq!(app.output().contents(), "secret\n");
}

#[test]
fn test_hidden_command_is_still_suggested() {
    let app = ops_app();
    assert!(app.is_command("secret"));
    assert_eq!(app.find_similar("secre"), ["secret"]);
}

#[test]
fn test_runs_are_independent() {
    let mut app = test_app();
    assert_eq!(app.run(Some(to_args(["b", "1"]))), OK);
    assert_eq!(app.run(Some(to_args(["deploy"]))), OK);

    assert_eq!(app.input_name(), "deploy");
    assert_eq!(app.args(), Vec::<String>::new());
    assert_eq!(app.output().contents(), "build:1\ndeploy:\n");
}
