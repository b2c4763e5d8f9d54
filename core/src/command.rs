//! Command composition and state
//!
//! A [`Command`] owns an ordered argument vector and the variable bag used
//! to resolve `{name}` placeholders inside it. Structural state (the argv)
//! is mutated through typed methods; everything else goes through the bag
//! via [`set_var`](Command::set_var) / [`var`](Command::var).

use std::fmt;
use std::ops::Add;

use crate::error::{CmdError, CmdResult};
use crate::value::Value;
use crate::vars::{Resolved, Vars};

/// Names that address command structure rather than the variable bag.
///
/// These are never stored as variables, so tokens like `{command}` are
/// always left untouched by resolution.
pub const RESERVED_NAMES: [&str; 4] = ["command", "variables", "attributes", "pipe"];

/// An argument vector plus the variable bag that resolves it.
#[derive(Debug, Clone, Default)]
pub struct Command {
    args: Vec<String>,
    vars: Vars,
}

impl Command {
    /// Build a command from a shell-syntax line.
    ///
    /// The line is split by POSIX quoting rules; unbalanced quoting is a
    /// [`CmdError::Parse`].
    pub fn new(line: &str) -> CmdResult<Self> {
        let args = shlex::split(line).ok_or_else(|| CmdError::Parse(line.to_string()))?;
        Ok(Self {
            args,
            vars: Vars::new(),
        })
    }

    /// Build a command from an already-tokenized argument sequence.
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            vars: Vars::new(),
        }
    }

    /// Builder-style [`set_var`](Command::set_var).
    pub fn with_var(mut self, name: &str, value: impl Into<Value>) -> CmdResult<Self> {
        self.set_var(name, value)?;
        Ok(self)
    }

    /// Store a variable in the bag.
    ///
    /// Writes to [`RESERVED_NAMES`] are rejected: structural fields are
    /// mutated through their typed accessors, not through the bag.
    pub fn set_var(&mut self, name: &str, value: impl Into<Value>) -> CmdResult<()> {
        if RESERVED_NAMES.contains(&name) {
            return Err(CmdError::ReservedName(name.to_string()));
        }
        self.vars.set(name, value);
        Ok(())
    }

    /// Look up a variable and resolve it.
    ///
    /// A string value comes back with every placeholder substituted, so
    /// `cmd.var("some_path")` is fully resolved even when the stored value
    /// references other variables. A nested command comes back as a
    /// command.
    pub fn var(&self, name: &str) -> CmdResult<Resolved> {
        self.vars.get(name, self)
    }

    /// Substitute `{name}` placeholders in `text` against this command's
    /// bag. Unknown names are left untouched.
    pub fn resolve(&self, text: &str) -> CmdResult<String> {
        self.vars.resolve(text, self)
    }

    /// Resolve every argument, producing the final argv.
    pub fn resolve_args(&self) -> CmdResult<Vec<String>> {
        self.args
            .iter()
            .map(|arg| self.vars.resolve(arg, self))
            .collect()
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Structural write access to the argument vector.
    pub fn args_mut(&mut self) -> &mut Vec<String> {
        &mut self.args
    }

    pub fn vars(&self) -> &Vars {
        &self.vars
    }

    /// Extend the argument vector at the end.
    ///
    /// The operand contributes arguments only; its variable bag (if any) is
    /// not merged and the operand itself is never mutated.
    pub fn append(&mut self, other: impl IntoArgs) -> CmdResult<()> {
        let mut args = other.into_args()?;
        self.args.append(&mut args);
        Ok(())
    }

    /// Extend the argument vector at the front, preserving operand order.
    ///
    /// Same bag semantics as [`append`](Command::append).
    pub fn prepend(&mut self, other: impl IntoArgs) -> CmdResult<()> {
        let mut args = other.into_args()?;
        args.append(&mut self.args);
        self.args = args;
        Ok(())
    }
}

/// Space-joined raw argument vector (unresolved).
impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.args.join(" "))
    }
}

/// Combine two commands into a new one.
///
/// The argument vector is self-then-other; the bags are merged with the
/// right operand's entries winning on name collision.
impl Add for Command {
    type Output = Command;

    fn add(self, other: Command) -> Command {
        let mut args = self.args;
        args.extend(other.args);
        let mut vars = self.vars;
        vars.merge(other.vars);
        Command { args, vars }
    }
}

impl Add<Vec<String>> for Command {
    type Output = Command;

    fn add(self, other: Vec<String>) -> Command {
        self + Command::from_args(other)
    }
}

impl Add<&[&str]> for Command {
    type Output = Command;

    fn add(self, other: &[&str]) -> Command {
        self + Command::from_args(other.iter().copied())
    }
}

/// Anything that can contribute an argument vector to composition.
///
/// Raw strings are split by POSIX quoting rules (an anonymous command), so
/// the conversion is fallible.
pub trait IntoArgs {
    fn into_args(self) -> CmdResult<Vec<String>>;
}

impl IntoArgs for Command {
    fn into_args(self) -> CmdResult<Vec<String>> {
        Ok(self.args)
    }
}

impl IntoArgs for &Command {
    fn into_args(self) -> CmdResult<Vec<String>> {
        Ok(self.args.clone())
    }
}

impl IntoArgs for &str {
    fn into_args(self) -> CmdResult<Vec<String>> {
        shlex::split(self).ok_or_else(|| CmdError::Parse(self.to_string()))
    }
}

impl IntoArgs for String {
    fn into_args(self) -> CmdResult<Vec<String>> {
        self.as_str().into_args()
    }
}

impl IntoArgs for Vec<String> {
    fn into_args(self) -> CmdResult<Vec<String>> {
        Ok(self)
    }
}

impl IntoArgs for &[&str] {
    fn into_args(self) -> CmdResult<Vec<String>> {
        Ok(self.iter().map(|s| (*s).to_string()).collect())
    }
}
