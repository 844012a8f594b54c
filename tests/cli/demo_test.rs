//! Runs the `crank` demo binary end to end.

use std::io::Write;
use std::path::Path;
use std::process::Command;

/// Runs the binary with `args` and an optional config file.
fn run_crank(args: &[&str], config: Option<&Path>) -> (i32, String, String) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let missing = dir.path().join("config.toml");

    let output = Command::new(env!("CARGO_BIN_EXE_crank"))
        .args(args)
        .env("CRANK_CONFIG", config.unwrap_or(missing.as_path()))
        .env("CRANK_LOG", "off")
        .output()
        .expect("Failed to execute command");

    let exit_code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    (exit_code, stdout, stderr)
}

fn config_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("Failed to create config");
    file.write_all(content.as_bytes()).expect("Failed to write config");
    file
}

#[test]
fn test_no_args_prints_help() {
    let (code, stdout, _) = run_crank(&[], None);

    assert_eq!(code, 0);
    assert!(stdout.contains("A tiny build and release tool"));
    assert!(stdout.contains("Compile the project (alias: b)"));
    assert!(stdout.contains("\n ops"));
    assert!(!stdout.contains("inspect"));
}

#[test]
fn test_alias_runs_build() {
    let (code, stdout, _) = run_crank(&["b", "--release"], None);
    assert_eq!(code, 0);
    assert_eq!(stdout, "Building release profile\n");
}

#[test]
fn test_build_rejects_unknown_option() {
    let (code, stdout, stderr) = run_crank(&["b", "-x"], None);
    assert_eq!(code, 2);
    assert_eq!(stdout, "");
    assert!(stderr.contains("ERROR: command 'build' failed: unknown option '-x'"));
}

#[test]
fn test_unknown_command_tips() {
    let (code, _, stderr) = run_crank(&["deplo"], None);
    assert_eq!(code, 2);
    assert!(stderr.contains("unknown input command \"deplo\""));
    assert!(stderr.contains("Maybe you mean:\n  deploy"));
}

#[test]
fn test_deploy_sub_commands() {
    let (code, stdout, _) = run_crank(&["deploy", "stg"], None);
    assert_eq!(code, 0);
    assert_eq!(stdout, "Deploying to staging\n");

    let (code, _, stderr) = run_crank(&["deploy", "prod"], None);
    assert_eq!(code, 2);
    assert!(stderr.contains("without --confirm"));
}

#[test]
fn test_release_execs_build() {
    let (code, stdout, _) = run_crank(&["release"], None);
    assert_eq!(code, 0);
    assert_eq!(stdout, "Building release profile\nRelease ready\n");
}

#[test]
fn test_version_flag() {
    let (code, stdout, _) = run_crank(&["--version"], None);
    assert_eq!(code, 0);
    assert!(stdout.contains(&format!("Version: {}", env!("CARGO_PKG_VERSION"))));
}

#[test]
fn test_bad_global_option() {
    let (code, _, stderr) = run_crank(&["--nope", "build"], None);
    assert_eq!(code, 2);
    assert!(stderr.contains("--nope"));
}

#[test]
fn test_config_applies_aliases_and_default() {
    let config = config_file(
        "[app]\nname = \"mk\"\ndefault_command = \"inspect\"\nverbosity = \"warn\"\n\n[aliases]\nship = \"release\"\n",
    );

    let (code, stdout, _) = run_crank(&["ship"], Some(config.path()));
    assert_eq!(code, 0);
    assert!(stdout.ends_with("Release ready\n"));

    let (code, stdout, _) = run_crank(&["-v"], Some(config.path()));
    assert_eq!(code, 0);
    assert_eq!(stdout, "input: \ncommand: inspect\nargs: \nverbosity: info\n");
}

#[test]
fn test_config_help_vars_in_command_help() {
    let config = config_file("[app]\nname = \"mk\"\n");
    let (code, stdout, _) = run_crank(&["help", "build"], Some(config.path()));
    assert_eq!(code, 0);
    assert!(stdout.contains("mk build --release"));
}

#[test]
fn test_invalid_config_alias_fails_setup() {
    let config = config_file("[aliases]\nx = \"missing\"\n");
    let (code, _, stderr) = run_crank(&[], Some(config.path()));
    assert_eq!(code, 1);
    assert!(stderr.contains("Configuration error"));
}
