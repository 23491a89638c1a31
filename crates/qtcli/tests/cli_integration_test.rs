//! Integration tests for the `qtcli` binary.
//!
//! Each test runs the compiled binary from a temp working directory with
//! `HOME` pointed at a second temp directory, so no real config is picked up.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

fn qtcli_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_qtcli"))
}

fn run_qtcli(work_dir: &Path, home: &Path, args: &[&str]) -> Output {
    Command::new(qtcli_bin())
        .args(args)
        .current_dir(work_dir)
        .env("HOME", home)
        .env_remove("RUST_LOG")
        .env_remove("QTCLI_OUTPUT_DIR")
        .env_remove("QTCLI_LICENSE_FILE")
        .env_remove("QTCLI_TEMPLATE_DIR")
        .output()
        .expect("Failed to execute qtcli")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

// =========================================================================
// Writing to an output directory
// =========================================================================

#[test]
fn test_new_cpp_class_writes_files() {
    let work = TempDir::new().unwrap();
    let home = TempDir::new().unwrap();

    let output = run_qtcli(
        work.path(),
        home.path(),
        &[
            "new", "class", "App::MainWindow", "--type", "cpp", "--base", "QMainWindow",
            "--qobject", "--output-dir", "src",
        ],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    assert!(out.contains("Created: src/mainwindow.h"));
    assert!(out.contains("Created: src/mainwindow.cpp"));

    let header = fs::read_to_string(work.path().join("src/mainwindow.h")).unwrap();
    assert!(header.contains("namespace App {"));
    assert!(header.contains("Q_OBJECT"));
}

#[test]
fn test_config_file_supplies_output_dir() {
    let work = TempDir::new().unwrap();
    let home = TempDir::new().unwrap();
    fs::write(
        work.path().join(".qtcli.toml"),
        "output-dir = \"generated\"\npython-module = \"PyQt6\"\n",
    )
    .unwrap();

    let output = run_qtcli(
        work.path(),
        home.path(),
        &["new", "class", "Model", "-t", "python", "--qobject"],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let module = fs::read_to_string(work.path().join("generated/model.py")).unwrap();
    assert!(module.contains("from PyQt6.QtCore import QObject"));
}

#[test]
fn test_global_config_is_used_when_no_local_config() {
    let work = TempDir::new().unwrap();
    let home = TempDir::new().unwrap();
    fs::create_dir_all(home.path().join(".config")).unwrap();
    fs::write(home.path().join(".config/qtcli.toml"), "output-dir = \"global-out\"\n").unwrap();

    let output = run_qtcli(work.path(), home.path(), &["new", "class", "Thing"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(work.path().join("global-out/thing.h").is_file());
}

#[test]
fn test_malformed_config_is_ignored() {
    let work = TempDir::new().unwrap();
    let home = TempDir::new().unwrap();
    fs::write(work.path().join(".qtcli.toml"), "output-dir = [").unwrap();

    let output = run_qtcli(work.path(), home.path(), &["new", "class", "Thing"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains(">>>>>>> thing.h"));
    assert!(stderr(&output).contains("Failed to parse CLI config"));
}

#[test]
fn test_empty_config_paths_fall_back_to_console_and_bundled() {
    let work = TempDir::new().unwrap();
    let home = TempDir::new().unwrap();
    fs::write(
        work.path().join(".qtcli.toml"),
        "output-dir = \"\"\ntemplate-dir = \"\"\n",
    )
    .unwrap();

    let output = run_qtcli(work.path(), home.path(), &["new", "class", "Widget"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    assert!(out.contains(">>>>>>> widget.h"));
    assert!(!out.contains("Created:"));
    assert!(!work.path().join("widget.h").exists());
}

// =========================================================================
// Console mode
// =========================================================================

#[test]
fn test_without_output_dir_echoes_to_stdout() {
    let work = TempDir::new().unwrap();
    let home = TempDir::new().unwrap();

    let output = run_qtcli(work.path(), home.path(), &["new", "class", "Thing", "--pragma"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    assert!(out.contains(">>>>>>> thing.h\n#pragma once\n"));
    assert!(out.contains("<<<<<<< thing.cpp"));
    assert!(fs::read_dir(work.path()).unwrap().next().is_none());
}

// =========================================================================
// Failures
// =========================================================================

#[test]
fn test_unknown_type_exits_with_error() {
    let work = TempDir::new().unwrap();
    let home = TempDir::new().unwrap();

    let output = run_qtcli(work.path(), home.path(), &["new", "class", "Main", "--type", "qml"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("invalid new type, given = 'class', 'qml'"));
}

#[test]
fn test_project_category_has_no_types() {
    let work = TempDir::new().unwrap();
    let home = TempDir::new().unwrap();

    let output = run_qtcli(work.path(), home.path(), &["new", "project", "Demo"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("invalid new type"));
}

#[test]
fn test_custom_template_dir() {
    let work = TempDir::new().unwrap();
    let home = TempDir::new().unwrap();
    let family = work.path().join("tpl/templates/classes/cpp");
    fs::create_dir_all(&family).unwrap();
    fs::write(
        family.join("config.yml"),
        "files:\n  - in: note.tera\n    out: '{{ qArgName | snake_case }}.txt'\n",
    )
    .unwrap();
    fs::write(family.join("note.tera"), "hello {{ qArgName }}\n").unwrap();

    let output = run_qtcli(
        work.path(),
        home.path(),
        &["new", "class", "BigThing", "--template-dir", "tpl", "-o", "out"],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        fs::read_to_string(work.path().join("out/big_thing.txt")).unwrap(),
        "hello BigThing\n"
    );
}

#[test]
fn test_every_entry_skipped_warns() {
    let work = TempDir::new().unwrap();
    let home = TempDir::new().unwrap();
    let family = work.path().join("tpl/templates/classes/cpp");
    fs::create_dir_all(&family).unwrap();
    fs::write(
        family.join("config.yml"),
        "files:\n  - in: note.tera\n    out: note.txt\n    when: 'false'\n",
    )
    .unwrap();

    let args = ["new", "class", "X", "--template-dir", "tpl"];
    let output = run_qtcli(work.path(), home.path(), &args);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("No files generated."));
}
