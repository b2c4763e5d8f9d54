//! Error types for cmdkit

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for cmdkit operations
pub type CmdResult<T> = Result<T, CmdError>;

/// Error types for command composition and execution
#[derive(Error, Debug)]
pub enum CmdError {
    /// Command line could not be tokenized (unbalanced quoting)
    #[error("Parse error: unbalanced quoting in '{0}'")]
    Parse(String),

    /// Variable lookup named a variable with no stored value
    #[error("Unknown variable: {0}")]
    UnknownVariable(String),

    /// Attempt to store a variable under a structural name
    #[error("Reserved name: '{0}' addresses command structure, not the variable bag")]
    ReservedName(String),

    /// Variable resolution re-entered a name already being resolved
    #[error("Circular variable reference involving '{0}'")]
    CircularReference(String),

    /// The resolved argument vector has no entries to spawn
    #[error("Command resolved to an empty argument vector")]
    EmptyCommand,

    /// A redirect path could not be opened
    #[error("Failed to open {path}: {source}")]
    Redirect {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The subprocess could not be spawned
    #[error("Failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    /// The subprocess terminated with a non-zero status
    #[error("Command '{command}' exited with code {code}")]
    NonZeroExit { command: String, code: i32 },

    /// IO error while waiting on the subprocess
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
