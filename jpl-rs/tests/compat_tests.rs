//! End-to-end tests: run JPL programs through the built `jpl` binary and
//! verify stdout, stderr and the exit status.
//!
//! Each program is written to a temporary `.jpl` file; the secondary line
//! source (function bodies and `INPUT` values) is piped in on stdin.  `-f`
//! is always passed so a developer's own `.jplrc` cannot change the results.

use std::ffi::OsStr;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Path to the `jpl` binary built by this Cargo workspace.
fn jpl_binary() -> std::path::PathBuf {
    std::path::PathBuf::from(env!("CARGO_BIN_EXE_jpl"))
}

/// Write `program` to `<dir>/<name>` and return its path.
fn write_program(dir: &TempDir, name: &str, program: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, program).expect("write program");
    path
}

/// Run the binary with `args` and `stdin`.
fn run_jpl(args: &[&OsStr], stdin: &str) -> Output {
    let mut child = Command::new(jpl_binary())
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn jpl binary");
    {
        let mut pipe = child.stdin.take().expect("stdin not open");
        pipe.write_all(stdin.as_bytes()).expect("write to stdin");
    }
    child.wait_with_output().expect("wait failed")
}

/// Run `program` (as `prog.jpl`) with prompts suppressed.
fn run_program(program: &str, stdin: &str) -> Output {
    let dir = TempDir::new().expect("tempdir");
    let path = write_program(&dir, "prog.jpl", program);
    run_jpl(&[OsStr::new("-f"), OsStr::new("-q"), path.as_os_str()], stdin)
}

fn stdout_lines(out: &Output) -> Vec<String> {
    String::from_utf8_lossy(&out.stdout)
        .lines()
        .map(str::to_owned)
        .collect()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

/// Run a program that must succeed, and compare its output.
fn check(program: &str, stdin: &str, expected: &[&str]) {
    let out = run_program(program, stdin);
    assert!(
        out.status.success(),
        "program failed\nProgram:\n{program}\nStderr:\n{}",
        stderr(&out)
    );
    assert_eq!(stdout_lines(&out), expected, "\nProgram:\n{program}");
}

/// Run a program that must fail, and return its stderr.
fn check_fails(program: &str, stdin: &str) -> String {
    let out = run_program(program, stdin);
    assert_eq!(out.status.code(), Some(1), "\nProgram:\n{program}");
    stderr(&out)
}

// ── Test cases ────────────────────────────────────────────────────────────────

#[test]
fn hello_world() {
    check(
        "START *Demo {\nDEFINE NAME World\nDISPLAY Hello NAME\n} END *Demo\n",
        "",
        &["Hello World"],
    );
}

#[test]
fn substitution_hits_substrings() {
    check(
        "START *Fruit {\nDEFINE A 1\nDISPLAY BANANA\n} END *Fruit\n",
        "",
        &["B1N1N1"],
    );
}

#[test]
fn input_is_echoed() {
    check(
        "START *Echo {\nINPUT Enter value:\nDISPLAY input\n} END *Echo\n",
        "forty two\n",
        &["forty two"],
    );
}

#[test]
fn prompt_is_shown_without_quiet_flag() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_program(
        &dir,
        "ask.jpl",
        "START *Ask {\nINPUT Name?\nDISPLAY Hi input\n} END *Ask\n",
    );
    let out = run_jpl(&[OsStr::new("-f"), path.as_os_str()], "Ada\n");
    assert!(out.status.success(), "{}", stderr(&out));
    assert_eq!(String::from_utf8_lossy(&out.stdout), "Name?Hi Ada\n");
}

#[test]
fn function_body_read_from_stdin() {
    check(
        "START *Fn {\nDEFINE FUNCTION greet(first, last)\nCALL greet(Ada, Lovelace)\nDISPLAY first\n} END *Fn\n",
        "DISPLAY Hello first last\n}\n",
        &["Hello Ada Lovelace", "first"],
    );
}

#[test]
fn comments_and_blank_lines() {
    check(
        "# leading comment\n\nSTART *C {\n   # indented\n\nDISPLAY ok\n} END *C\n",
        "",
        &["ok"],
    );
}

#[test]
fn output_before_failure_is_kept() {
    let out = run_program("START *P {\nDISPLAY before\nBOGUS\n} END *P\n", "");
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(stdout_lines(&out), ["before"]);
    assert!(stderr(&out).contains("line 3: unknown command: BOGUS"), "{}", stderr(&out));
}

#[test]
fn missing_end_fails() {
    let err = check_fails("START *P {\nDISPLAY x\n", "");
    assert!(err.contains("ended without END"), "{err}");
}

#[test]
fn mismatched_end_fails() {
    let err = check_fails("START *P {\n} END *Q\n", "");
    assert!(err.contains("'Q' does not match start name 'P'"), "{err}");
}

#[test]
fn command_outside_frame_fails() {
    let err = check_fails("DISPLAY x\n", "");
    assert!(err.contains("line 1: program must start with a START command"), "{err}");
}

#[test]
fn undefined_function_fails() {
    let err = check_fails("START *P {\nCALL nowhere(1, 2)\n} END *P\n", "");
    assert!(err.contains("function nowhere not defined"), "{err}");
}

#[test]
fn arity_mismatch_fails() {
    let err = check_fails(
        "START *P {\nDEFINE FUNCTION f(a, b, c)\nCALL f(1,2)\n} END *P\n",
        "}\n",
    );
    assert!(err.contains("expects 3 arguments, got 2"), "{err}");
}

#[test]
fn redefinition_fails() {
    let err = check_fails(
        "START *P {\nDEFINE FUNCTION f()\nDEFINE FUNCTION f()\n} END *P\n",
        "}\n}\n",
    );
    assert!(err.contains("line 3: function f is already defined"), "{err}");
}

#[test]
fn exhausted_stdin_fails() {
    let err = check_fails("START *P {\nINPUT more?\n} END *P\n", "");
    assert!(err.contains("input exhausted"), "{err}");
}

// ── Entry-point checks ────────────────────────────────────────────────────────

#[test]
fn jake_extension_accepted() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_program(&dir, "prog.jake", "START *J {\nDISPLAY jake\n} END *J\n");
    let out = run_jpl(&[OsStr::new("-f"), path.as_os_str()], "");
    assert!(out.status.success(), "{}", stderr(&out));
    assert_eq!(stdout_lines(&out), ["jake"]);
}

#[test]
fn other_extension_rejected() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_program(&dir, "prog.txt", "START *J {\n} END *J\n");
    let out = run_jpl(&[OsStr::new("-f"), path.as_os_str()], "");
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("Only .jpl and .jake files are supported"));
}

#[test]
fn no_arguments_prints_usage() {
    let out = run_jpl(&[], "");
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("Usage: jpl"));
}

#[test]
fn missing_file_fails() {
    let out = run_jpl(&[OsStr::new("-f"), Path::new("/nonexistent/none.jpl").as_os_str()], "");
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("none.jpl"));
}

#[test]
fn config_file_changes_extensions() {
    let dir = TempDir::new().expect("tempdir");
    let rc = dir.path().join("test.jplrc");
    std::fs::write(&rc, "set extensions=txt\n").expect("write rc");
    let path = write_program(&dir, "prog.txt", "START *T {\nDISPLAY txt ok\n} END *T\n");
    let flag = format!("-f{}", rc.display());
    let out = run_jpl(&[OsStr::new(&flag), path.as_os_str()], "");
    assert!(out.status.success(), "{}", stderr(&out));
    assert_eq!(stdout_lines(&out), ["txt ok"]);
}
