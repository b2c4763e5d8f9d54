//! Integration tests for cmdkit-core
//!
//! These exercise the full path: template construction, placeholder
//! resolution, and real subprocess execution with redirected streams.

use std::fs;
use std::fs::File;

use cmdkit_core::{Captured, CmdError, Command, Redirect, RunOptions};

#[test]
fn cp_template_resolves_and_copies() {
    let scratch = tempfile::tempdir().expect("tempdir failed");
    let src = scratch.path().join("a");
    let dst = scratch.path().join("b");
    fs::write(&src, b"payload").expect("write failed");

    let cmd = Command::new("cp {src} {dst}")
        .expect("parse failed")
        .with_var("src", src.to_string_lossy().to_string())
        .expect("set_var failed")
        .with_var("dst", dst.to_string_lossy().to_string())
        .expect("set_var failed");

    let argv = cmd.resolve_args().expect("resolve failed");
    assert_eq!(argv[0], "cp");
    assert_eq!(argv.len(), 3);

    cmd.run(RunOptions::new()).expect("run failed");
    assert_eq!(fs::read(&dst).expect("read failed"), b"payload");
}

#[test]
fn echo_captures_piped_stdout() {
    let cmd = Command::new("echo hi").expect("parse failed");
    let captured = cmd.run(RunOptions::new()).expect("run failed");
    assert_eq!(captured.stdout.as_deref(), Some(b"hi\n".as_slice()));
    assert_eq!(captured.stderr, None);
}

#[test]
fn false_raises_exit_code_one() {
    let cmd = Command::new("false").expect("parse failed");
    let err = cmd.run(RunOptions::new()).expect_err("expected exit error");
    match err {
        CmdError::NonZeroExit { command, code } => {
            assert_eq!(command, "false");
            assert_eq!(code, 1);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn output_file_redirect_writes_file_and_captures_nothing() {
    let scratch = tempfile::tempdir().expect("tempdir failed");
    let out = scratch.path().join("out.txt");

    let cmd = Command::new("echo hi").expect("parse failed");
    let captured = cmd
        .run(RunOptions::new().output(Redirect::File(out.clone())))
        .expect("run failed");

    assert_eq!(captured, Captured::default());
    assert_eq!(fs::read(&out).expect("read failed"), b"hi\n");
}

#[test]
fn input_file_redirect_feeds_stdin() {
    let scratch = tempfile::tempdir().expect("tempdir failed");
    let input = scratch.path().join("in.txt");
    fs::write(&input, b"line one\nline two\n").expect("write failed");

    let cmd = Command::new("cat").expect("parse failed");
    let captured = cmd
        .run(RunOptions::new().input(Redirect::File(input)))
        .expect("run failed");

    assert_eq!(
        captured.stdout.as_deref(),
        Some(b"line one\nline two\n".as_slice())
    );
}

#[test]
fn input_pipe_is_closed_before_waiting() {
    // Nothing is written to a piped stdin, so the child sees EOF at once.
    let cmd = Command::new("cat").expect("parse failed");
    let captured = cmd
        .run(RunOptions::new().input(Redirect::Pipe))
        .expect("run failed");
    assert_eq!(captured.stdout.as_deref(), Some(b"".as_slice()));
}

#[test]
fn handle_redirect_uses_open_file_as_is() {
    let scratch = tempfile::tempdir().expect("tempdir failed");
    let out = scratch.path().join("handle.txt");
    let file = File::create(&out).expect("create failed");

    let cmd = Command::new("echo via-handle").expect("parse failed");
    let captured = cmd
        .run(RunOptions::new().output(Redirect::Handle(file.into())))
        .expect("run failed");

    assert_eq!(captured.stdout, None);
    assert_eq!(fs::read(&out).expect("read failed"), b"via-handle\n");
}

#[test]
fn dry_run_returns_no_capture_for_any_redirects() {
    let scratch = tempfile::tempdir().expect("tempdir failed");
    let input = scratch.path().join("in.txt");
    fs::write(&input, b"ignored").expect("write failed");

    let cmd = Command::new("cat").expect("parse failed");
    let captured = cmd
        .run(
            RunOptions::new()
                .input(Redirect::File(input))
                .output(Redirect::File(scratch.path().join("out.txt")))
                .dry_run(true),
        )
        .expect("dry run failed");
    assert_eq!(captured, Captured::default());
}

#[test]
fn combined_command_runs_with_merged_bags() {
    let base = Command::new("echo").expect("parse failed");
    let tail = Command::new("{word}")
        .expect("parse failed")
        .with_var("word", "merged")
        .expect("set_var failed");

    let cmd = base + tail;
    let captured = cmd.run(RunOptions::new()).expect("run failed");
    assert_eq!(captured.stdout.as_deref(), Some(b"merged\n".as_slice()));
}

#[test]
fn run_is_reentrant_on_the_same_command() {
    let cmd = Command::new("echo again").expect("parse failed");
    let first = cmd.run(RunOptions::new()).expect("first run failed");
    let second = cmd.run(RunOptions::new()).expect("second run failed");
    assert_eq!(first, second);
    assert_eq!(cmd.args(), ["echo", "again"]);
}
