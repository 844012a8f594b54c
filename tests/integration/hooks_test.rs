//! Lifecycle events fired by the dispatch engine.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::bail;
use crank::{to_args, App, Command, CommandInfo, CrankError, Event, Output, ERR, OK};
use pretty_assertions::assert_eq;
use serde_json::json;

use super::test_app;

type Log = Rc<RefCell<Vec<String>>>;

/// Records every event name into the returned log.
fn record_all(app: &mut App) -> Log {
    let log: Log = Rc::default();
    for event in Event::ALL {
        let log = Rc::clone(&log);
        app.on(event, move |ctx| {
            log.borrow_mut().push(ctx.name().to_string());
            false
        });
    }
    log
}

fn names(log: &Log) -> Vec<String> {
    log.borrow().clone()
}

#[test]
fn test_successful_run_event_order() {
    let mut app = App::new("tool", "").with_output(Output::buffer());
    let log = record_all(&mut app);
    app.add(Command::new("build", "").with_func(|_, _| Ok(())));

    assert_eq!(app.run(Some(to_args(["build"]))), OK);
    assert_eq!(
        names(&log),
        [
            "cmd.init.after",
            "app.init.after",
            "gopts.parsed",
            "app.prepared",
            "app.run.before",
            "cmd.run.before",
            "cmd.exec.before",
            "cmd.exec.after",
            "cmd.run.after",
            "app.run.after",
        ]
    );
}

#[test]
fn test_init_after_fires_for_sub_commands() {
    let mut app = App::new("tool", "").with_output(Output::buffer());
    let paths: Rc<RefCell<Vec<String>>> = Rc::default();
    let slot = Rc::clone(&paths);
    app.on(Event::CmdInitAfter, move |ctx| {
        if let Some(cmd) = ctx.cmd() {
            slot.borrow_mut().push(cmd.path.clone());
        }
        false
    });

    app.add(
        Command::new("deploy", "")
            .with_sub(Command::new("prod", "").with_sub(Command::new("eu", "")))
            .with_sub(Command::new("staging", "")),
    );
    assert_eq!(
        *paths.borrow(),
        ["deploy", "deploy prod", "deploy prod eu", "deploy staging"]
    );
}

#[test]
fn test_failing_command_event_order() {
    let mut app = App::new("tool", "").with_output(Output::buffer());
    app.add(Command::new("build", "").with_func(|_, _| bail!("compiler exploded")));
    app.initialize();
    let log = record_all(&mut app);

    assert_eq!(app.run(Some(to_args(["build"]))), ERR);
    assert_eq!(
        names(&log),
        [
            "gopts.parsed",
            "app.prepared",
            "app.run.before",
            "cmd.run.before",
            "cmd.exec.before",
            "cmd.exec.error",
            "cmd.run.error",
            "app.run.error",
        ]
    );
    assert!(app
        .output()
        .contents()
        .contains("ERROR: command 'build' failed: compiler exploded"));
}

#[test]
fn test_error_events_carry_the_error() {
    let mut app = App::new("tool", "").with_output(Output::buffer());
    app.add(Command::new("build", "").with_func(|_, _| bail!("nope")));

    let seen: Rc<RefCell<Vec<String>>> = Rc::default();
    for event in [Event::CmdExecError, Event::CmdRunError, Event::AppRunError] {
        let seen = Rc::clone(&seen);
        app.on(event, move |ctx| {
            if let Some(CrankError::Execution { command, .. }) = ctx.err() {
                seen.borrow_mut().push(format!("{}:{command}", ctx.name()));
            }
            false
        });
    }

    assert_eq!(app.run(Some(to_args(["build"]))), ERR);
    assert_eq!(
        *seen.borrow(),
        ["cmd.exec.error:build", "cmd.run.error:build", "app.run.error:build"]
    );
}

#[test]
fn test_app_run_before_stop_aborts_with_ok() {
    let mut app = test_app();
    app.initialize();
    let log = record_all(&mut app);
    app.on(Event::AppRunBefore, |ctx| ctx.set_stop(true));

    assert_eq!(app.run(Some(to_args(["build"]))), OK);
    assert_eq!(app.output().contents(), "");
    assert_eq!(names(&log), ["gopts.parsed", "app.prepared"]);
}

#[test]
fn test_cmd_exec_before_stop_skips_body() {
    let mut app = test_app();
    app.initialize();
    let log = record_all(&mut app);
    app.on(Event::CmdExecBefore, |_| true);

    assert_eq!(app.run(Some(to_args(["build"]))), OK);
    assert_eq!(app.output().contents(), "");
    assert_eq!(
        names(&log),
        [
            "gopts.parsed",
            "app.prepared",
            "app.run.before",
            "cmd.run.before",
            "cmd.run.after",
            "app.run.after",
        ]
    );
}

#[test]
fn test_app_prepared_stop_is_ignored() {
    let mut app = test_app();
    app.on(Event::AppPrepared, |ctx| ctx.set_stop(true));

    assert_eq!(app.run(Some(to_args(["build", "x"]))), OK);
    assert_eq!(app.output().contents(), "build:x\n");
}

#[test]
fn test_before_event_sees_command_snapshot() {
    let mut app = test_app();
    let seen: Rc<RefCell<Option<CommandInfo>>> = Rc::default();
    let slot = Rc::clone(&seen);
    app.on(Event::AppRunBefore, move |ctx| {
        *slot.borrow_mut() = ctx.cmd().cloned();
        assert_eq!(ctx.get("args"), Some(&json!(["-x"])));
        false
    });

    app.run(Some(to_args(["b", "-x"])));
    let info = seen.borrow().clone().unwrap();
    assert_eq!(info.name, "build");
    assert_eq!(info.aliases, ["b"]);
    assert_eq!(info.description, "compile the project");
}

#[test]
fn test_global_opts_parsed_data() {
    let mut app = test_app();
    let seen: Rc<RefCell<Vec<serde_json::Value>>> = Rc::default();
    let slot = Rc::clone(&seen);
    app.on(Event::GlobalOptsParsed, move |ctx| {
        let mut slot = slot.borrow_mut();
        for key in ["verbose", "quiet", "args"] {
            slot.push(ctx.get(key).cloned().unwrap_or_default());
        }
        false
    });

    app.run(Some(to_args(["-vv", "deploy", "now"])));
    assert_eq!(*seen.borrow(), [json!("info"), json!(false), json!(["deploy", "now"])]);
}

#[test]
fn test_exec_fires_only_command_events() {
    let mut app = App::new("tool", "").with_output(Output::buffer());
    app.add(Command::new("build", "").with_func(|app, _| {
        app.output().print("built\n");
        Ok(())
    }));
    app.add(Command::new("release", "").with_func(|app, _| {
        app.exec("build", &[])?;
        app.output().print("released\n");
        Ok(())
    }));
    app.initialize();
    let log = record_all(&mut app);

    assert_eq!(app.run(Some(to_args(["release"]))), OK);
    assert_eq!(app.output().contents(), "built\nreleased\n");
    assert_eq!(
        names(&log),
        [
            "gopts.parsed",
            "app.prepared",
            "app.run.before",
            "cmd.run.before",
            "cmd.exec.before",
            "cmd.exec.before",
            "cmd.exec.after",
            "cmd.exec.after",
            "cmd.run.after",
            "app.run.after",
        ]
    );
}

#[test]
fn test_nested_exec_error_is_returned_to_caller() {
    let mut app = App::new("tool", "").with_output(Output::buffer());
    app.add(Command::new("build", "").with_func(|_, _| bail!("broken")));
    app.add(Command::new("release", "").with_func(|app, _| {
        let err = app.exec("build", &[]).unwrap_err();
        app.output().print(&format!("caught: {err}\n"));
        Ok(())
    }));

    assert_eq!(app.run(Some(to_args(["release"]))), OK);
    assert_eq!(
        app.output().contents(),
        "caught: command 'build' failed: broken\n"
    );
}

#[test]
fn test_not_found_events() {
    let mut app = test_app();
    app.initialize();
    let log = record_all(&mut app);
    let name: Rc<RefCell<Option<serde_json::Value>>> = Rc::default();
    let slot = Rc::clone(&name);
    app.on(Event::AppCmdNotFound, move |ctx| {
        *slot.borrow_mut() = ctx.get("name").cloned();
        false
    });

    assert_eq!(app.run(Some(to_args(["bild"]))), ERR);
    assert_eq!(names(&log), ["gopts.parsed", "cmd.not.found"]);
    assert_eq!(*name.borrow(), Some(json!("bild")));
    assert!(app.output().contents().contains("unknown input command"));
}

#[test]
fn test_not_found_stop_suppresses_message() {
    let mut app = test_app();
    app.on(Event::CmdNotFound, |_| true);

    assert_eq!(app.run(Some(to_args(["bild"]))), ERR);
    assert_eq!(app.output().contents(), "");
}

#[test]
fn test_hook_ctx_exposes_app() {
    let mut app = test_app().with_bin_name("./tool");
    let seen: Rc<RefCell<String>> = Rc::default();
    let slot = Rc::clone(&seen);
    app.on(Event::AppPrepared, move |ctx| {
        if let Some(app) = ctx.app() {
            *slot.borrow_mut() = format!("{} {}", app.bin_name(), app.command_name());
        }
        false
    });

    app.run(Some(to_args(["deploy"])));
    assert_eq!(*seen.borrow(), "./tool deploy");
}

#[test]
fn test_reset_hooks() {
    let mut app = test_app();
    app.on(Event::AppRunBefore, |_| true);
    assert!(app.has_hook(Event::AppRunBefore));
    app.reset_hooks();
    assert!(!app.has_hook(Event::AppRunBefore));

    assert_eq!(app.run(Some(to_args(["build"]))), OK);
    assert_eq!(app.output().contents(), "build:\n");
}
