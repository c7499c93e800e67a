//! CLI end-to-end tests.
//!
//! These tests spawn the actual `ktwalk` binary inside a scratch directory
//! and validate stdout, stderr and exit codes.
//!
//! Exit code expectations:
//! - 0: Success
//! - 2: Invalid arguments
//! - 3: File not found
//! - 4: Diagnostics found under `check --strict`
//! - 10: Internal error (I/O, configuration)

use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Run ktwalk in `dir` and return (stdout, stderr, exit_code).
fn run_ktwalk(dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_ktwalk"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to execute ktwalk");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}

/// Path of a parser fixture shared with the ktwalk-cst crate.
fn cst_fixture(name: &str) -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .expect("crates directory")
        .join("ktwalk-cst")
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn scratch_with(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    for (name, content) in files {
        fs::write(dir.path().join(name), content).expect("write file");
    }
    dir
}

const ADD: &str = "fun add(a: Int, b: Int): Int { return a + b }\n";

// ============================================================================
// walk
// ============================================================================

#[test]
fn walk_declarations_of_parser_sample() {
    let dir = scratch_with(&[]);
    let fixture = cst_fixture("kotlin_parser.kt");
    let fixture = fixture.to_str().expect("utf-8 path");
    let (stdout, stderr, code) = run_ktwalk(
        dir.path(),
        &["walk", "--children-only", "--declarations-only", fixture],
    );
    assert_eq!(code, 0, "stderr: {stderr}");
    assert_eq!(
        stdout,
        "\
Method: main
Method: visitKtElement
Method: visitKtFile
Method: visitKtElement
Method: visitKtFile
Method: visitElement
Method: visitClass
Method: visitNamedFunction
"
    );
}

#[test]
fn walk_prints_method_line() {
    let dir = scratch_with(&[("Add.kt", ADD)]);
    let (stdout, _stderr, code) = run_ktwalk(dir.path(), &["walk", "--declarations-only", "Add.kt"]);
    assert_eq!(code, 0);
    assert_eq!(stdout, "Method: add\n");
}

#[test]
fn walk_kinds_lines() {
    let dir = scratch_with(&[("Add.kt", ADD)]);
    let (stdout, _stderr, code) = run_ktwalk(dir.path(), &["walk", "--no-text", "Add.kt"]);
    assert_eq!(code, 0);
    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(lines[0], "Element: File");
    assert_eq!(lines[1], "Method: add");
    assert_eq!(lines[2], "Element: FunctionDeclaration");
    assert!(lines.contains(&"Element: ReturnExpression"));
}

#[test]
fn walk_text_style_json() {
    let dir = scratch_with(&[("X.kt", "val x = 1")]);
    let (stdout, _stderr, code) =
        run_ktwalk(dir.path(), &["--format", "json", "walk", "--style", "text", "X.kt"]);
    assert_eq!(code, 0);
    let json: Value = serde_json::from_str(&stdout).expect("stdout should be valid JSON");
    assert_eq!(json["status"], "ok");
    assert_eq!(json["schema_version"], "1");
    assert_eq!(json["output"], "File: val x = 1\nElement: val x = 1\nElement: 1\n");
}

// ============================================================================
// tokens / tree / outline
// ============================================================================

#[test]
fn tokens_without_trivia() {
    let dir = scratch_with(&[("X.kt", "val x = 1")]);
    let (stdout, _stderr, code) = run_ktwalk(dir.path(), &["tokens", "--no-trivia", "X.kt"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.lines().next(), Some("[0, 3) Keyword \"val\""));
    assert_eq!(stdout.lines().count(), 5);
}

#[test]
fn tree_from_config_format() {
    let dir = scratch_with(&[
        ("ktwalk.toml", "[output]\nformat = \"json\"\n"),
        ("X.kt", "class Foo { fun bar() {} }"),
    ]);
    let (stdout, _stderr, code) = run_ktwalk(dir.path(), &["tree", "X.kt"]);
    assert_eq!(code, 0);
    let json: Value = serde_json::from_str(&stdout).expect("stdout should be valid JSON");
    let nodes = json["nodes"].as_array().expect("nodes");
    assert_eq!(nodes[0]["kind"], "File");
    assert_eq!(nodes[1]["name"], "Foo");
    assert_eq!(json["diagnostics"], 0);
}

#[test]
fn format_flag_overrides_config() {
    let dir = scratch_with(&[
        ("ktwalk.toml", "[output]\nformat = \"json\"\n"),
        ("X.kt", "fun f() = 1"),
    ]);
    let (stdout, _stderr, code) = run_ktwalk(dir.path(), &["--format", "text", "tree", "X.kt"]);
    assert_eq!(code, 0);
    assert!(stdout.starts_with("File [0, 11)"), "{stdout}");
}

#[test]
fn outline_lists_declarations() {
    let dir = scratch_with(&[("S.kt", "class Foo {\n    fun bar() {}\n}\nfun top() {}\n")]);
    let (stdout, _stderr, code) = run_ktwalk(dir.path(), &["outline", "S.kt"]);
    assert_eq!(code, 0);
    assert_eq!(stdout, "class Foo (1:1)\n  fun bar (2:5)\nfun top (4:1)\n");
}

// ============================================================================
// check
// ============================================================================

#[test]
fn check_reports_and_strict_fails() {
    let dir = scratch_with(&[("Bad.kt", "fun main() {\n    println(\"hi\"\n}\n"), ("Add.kt", ADD)]);

    let (stdout, _stderr, code) = run_ktwalk(dir.path(), &["check", "Add.kt", "Bad.kt"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Add.kt: ok"), "{stdout}");
    assert!(stdout.contains("expected `)`"), "{stdout}");
    assert!(stdout.contains("--> Bad.kt"), "{stdout}");

    let (_stdout, _stderr, code) = run_ktwalk(dir.path(), &["check", "--strict", "Add.kt", "Bad.kt"]);
    assert_eq!(code, 4);

    let (_stdout, _stderr, code) = run_ktwalk(dir.path(), &["check", "--strict", "Add.kt"]);
    assert_eq!(code, 0);
}

#[test]
fn check_strict_json_is_single_document() {
    let dir = scratch_with(&[("Bad.kt", "val s = \"open\n")]);
    let (stdout, _stderr, code) =
        run_ktwalk(dir.path(), &["--format", "json", "check", "--strict", "Bad.kt"]);
    assert_eq!(code, 4);
    let json: Value = serde_json::from_str(&stdout).expect("stdout should be one JSON document");
    assert_eq!(json["status"], "diagnostics");
    assert_eq!(json["files"][0]["file"], "Bad.kt");
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn missing_file_exits_3() {
    let dir = scratch_with(&[]);
    let (stdout, stderr, code) = run_ktwalk(dir.path(), &["tree", "Nope.kt"]);
    assert_eq!(code, 3);
    assert!(stdout.is_empty());
    assert!(stderr.contains("file not found: Nope.kt"), "{stderr}");

    let (stdout, _stderr, code) = run_ktwalk(dir.path(), &["--format", "json", "tree", "Nope.kt"]);
    assert_eq!(code, 3);
    let json: Value = serde_json::from_str(&stdout).expect("stdout should be valid JSON");
    assert_eq!(json["status"], "error");
    assert_eq!(json["error"]["code"], 3);
    assert_eq!(json["error"]["kind"], "file_not_found");
}

#[test]
fn zero_max_depth_exits_2() {
    let dir = scratch_with(&[("X.kt", "val x = 1")]);
    let (_stdout, stderr, code) = run_ktwalk(dir.path(), &["--max-depth", "0", "tree", "X.kt"]);
    assert_eq!(code, 2);
    assert!(stderr.contains("--max-depth"), "{stderr}");
}

#[test]
fn malformed_config_exits_10() {
    let dir = scratch_with(&[("ktwalk.toml", "[parse\nmax_depth = 3\n"), ("X.kt", "val x = 1")]);
    let (_stdout, stderr, code) = run_ktwalk(dir.path(), &["tree", "X.kt"]);
    assert_eq!(code, 10);
    assert!(stderr.contains("configuration error"), "{stderr}");
}

#[test]
fn explicit_config_path() {
    let dir = scratch_with(&[
        ("custom.toml", "[parse]\nmax_depth = 2\n"),
        ("Deep.kt", "val x = f(g(h(1)))\n"),
    ]);
    let (stdout, _stderr, code) =
        run_ktwalk(dir.path(), &["--config", "custom.toml", "check", "Deep.kt"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("levels of nesting"), "{stdout}");
}

#[test]
fn logs_go_to_stderr() {
    let dir = scratch_with(&[("X.kt", "val x = 1")]);
    let (stdout, stderr, code) =
        run_ktwalk(dir.path(), &["--log-level", "debug", "walk", "--declarations-only", "X.kt"]);
    assert_eq!(code, 0);
    assert!(stdout.is_empty(), "{stdout}");
    assert!(stderr.contains("read source"), "{stderr}");
}
