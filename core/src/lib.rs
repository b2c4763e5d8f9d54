//! cmdkit-core - templated command composition and execution
//!
//! This crate provides:
//! - A variable bag ([`Vars`]) that resolves `{name}` placeholders inside
//!   strings, recursively, through literals, deferred closures, and nested
//!   commands
//! - A [`Command`] owning an argument vector plus its bag, with structural
//!   composition (`append`/`prepend`/`+`)
//! - A blocking [`Command::run`] that spawns the resolved argv with
//!   configurable stdin/stdout redirection ([`Redirect`])

pub mod command;
pub mod error;
pub mod run;
pub mod value;
pub mod vars;

pub use command::{Command, IntoArgs, RESERVED_NAMES};
pub use error::{CmdError, CmdResult};
pub use run::{Captured, Redirect, RunOptions};
pub use value::Value;
pub use vars::{Resolved, Vars};
