//! Subprocess execution with redirected stdin/stdout
//!
//! [`Command::run`] resolves the argument vector, wires the configured
//! [`Redirect`]s to the child's stdin/stdout, spawns, and blocks until the
//! child exits. Handles opened here live for the duration of one call and
//! are closed on every exit path, including spawn failure.

use std::fs::File;
use std::path::PathBuf;
use std::process::{self, Stdio};

use tracing::debug;

use crate::command::Command;
use crate::error::{CmdError, CmdResult};

/// Redirection mode for one stream of one [`Command::run`] call.
#[derive(Debug)]
pub enum Redirect {
    /// Inherit the parent's stream.
    Inherit,
    /// Create an OS pipe; the captured bytes are returned from `run`.
    Pipe,
    /// Open the path as a file: read mode for input, create/truncate for
    /// output. Opened and closed within the `run` call.
    File(PathBuf),
    /// An already-acquired handle, wired through as-is.
    Handle(Stdio),
}

impl Redirect {
    const fn is_pipe(&self) -> bool {
        matches!(self, Redirect::Pipe)
    }

    fn into_read_stdio(self) -> CmdResult<Stdio> {
        match self {
            Redirect::Inherit => Ok(Stdio::inherit()),
            Redirect::Pipe => Ok(Stdio::piped()),
            Redirect::File(path) => {
                let file = File::open(&path).map_err(|source| CmdError::Redirect { path, source })?;
                Ok(file.into())
            }
            Redirect::Handle(stdio) => Ok(stdio),
        }
    }

    fn into_write_stdio(self) -> CmdResult<Stdio> {
        match self {
            Redirect::Inherit => Ok(Stdio::inherit()),
            Redirect::Pipe => Ok(Stdio::piped()),
            Redirect::File(path) => {
                let file =
                    File::create(&path).map_err(|source| CmdError::Redirect { path, source })?;
                Ok(file.into())
            }
            Redirect::Handle(stdio) => Ok(stdio),
        }
    }
}

/// Per-call execution options.
#[derive(Debug)]
pub struct RunOptions {
    /// Source wired to the child's stdin. Default: inherit.
    pub input: Redirect,
    /// Destination wired to the child's stdout. Default: pipe.
    pub output: Redirect,
    /// Print the resolved argv before executing.
    pub echo: bool,
    /// Resolve and acquire handles, but skip the spawn.
    pub dry_run: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            input: Redirect::Inherit,
            output: Redirect::Pipe,
            echo: false,
            dry_run: false,
        }
    }
}

impl RunOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn input(mut self, redirect: Redirect) -> Self {
        self.input = redirect;
        self
    }

    #[must_use]
    pub fn output(mut self, redirect: Redirect) -> Self {
        self.output = redirect;
        self
    }

    #[must_use]
    pub fn echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    #[must_use]
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Captured subprocess output, populated only for piped streams.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captured {
    pub stdout: Option<Vec<u8>>,
    pub stderr: Option<Vec<u8>>,
}

impl Command {
    /// Resolve every argument, then spawn the resolved argv as a
    /// subprocess and block until it exits.
    ///
    /// Returns the captured stdout when `options.output` was
    /// [`Redirect::Pipe`]; stderr is never wired by these options and its
    /// slot stays `None`. A non-zero exit status is
    /// [`CmdError::NonZeroExit`] carrying the resolved command line and
    /// the exact code.
    ///
    /// `run` never mutates the command; it may be called repeatedly.
    pub fn run(&self, options: RunOptions) -> CmdResult<Captured> {
        let argv = self.resolve_args()?;
        if argv.is_empty() {
            return Err(CmdError::EmptyCommand);
        }
        let rendered = argv.join(" ");

        if options.echo {
            println!("{rendered}");
        }

        let capture_stdout = options.output.is_pipe();
        // Handles are acquired before the dry-run check: a dry run still
        // validates that redirect paths open.
        let stdin = options.input.into_read_stdio()?;
        let stdout = options.output.into_write_stdio()?;

        if options.dry_run {
            return Ok(Captured::default());
        }

        debug!(command = %rendered, "spawning");
        let child = process::Command::new(&argv[0])
            .args(&argv[1..])
            .stdin(stdin)
            .stdout(stdout)
            .spawn()
            .map_err(|source| CmdError::Spawn {
                command: rendered.clone(),
                source,
            })?;

        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(CmdError::NonZeroExit {
                command: rendered,
                code: output.status.code().unwrap_or(-1),
            });
        }
        debug!(command = %rendered, "exited cleanly");

        Ok(Captured {
            stdout: capture_stdout.then_some(output.stdout),
            stderr: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dry_run_never_spawns_and_returns_no_capture() {
        // The binary does not exist; only a skipped spawn lets this pass.
        let cmd = Command::from_args(["cmdkit-test-no-such-binary"]);
        let captured = cmd
            .run(RunOptions::new().dry_run(true))
            .expect("dry run failed");
        assert_eq!(captured, Captured::default());
    }

    #[test]
    fn empty_resolved_argv_is_error() {
        let cmd = Command::from_args(Vec::<String>::new());
        let err = cmd.run(RunOptions::new()).expect_err("expected error");
        assert!(matches!(err, CmdError::EmptyCommand));
    }

    #[test]
    fn nonzero_exit_carries_exact_code_and_command() {
        let cmd = Command::from_args(["sh", "-c", "exit 3"]);
        let err = cmd.run(RunOptions::new()).expect_err("expected exit error");
        match err {
            CmdError::NonZeroExit { command, code } => {
                assert_eq!(command, "sh -c exit 3");
                assert_eq!(code, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_binary_is_spawn_error() {
        let cmd = Command::from_args(["cmdkit-test-no-such-binary"]);
        let err = cmd.run(RunOptions::new()).expect_err("expected spawn error");
        assert!(matches!(err, CmdError::Spawn { .. }));
    }

    #[test]
    fn missing_input_file_is_redirect_error() {
        let cmd = Command::from_args(["cat"]);
        let err = cmd
            .run(RunOptions::new().input(Redirect::File("/no/such/input/file".into())))
            .expect_err("expected redirect error");
        assert!(matches!(err, CmdError::Redirect { .. }));
    }
}
