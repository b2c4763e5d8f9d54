//! Variable values

use std::fmt;
use std::sync::Arc;

use crate::command::Command;

/// Closure type for deferred variable values.
///
/// Invoked with the owning [`Command`] at lookup time, so a thunk can read
/// other variables or inspect the argument vector before producing a value.
pub type ThunkFn = dyn Fn(&Command) -> Value + Send + Sync;

/// A value stored in a command's variable bag.
///
/// Literal strings are resolved recursively on lookup (placeholders inside
/// them are substituted). Thunks are invoked with the owning command and
/// their result takes the value's place. A nested command interpolates as
/// its own resolved argument vector.
#[derive(Clone)]
pub enum Value {
    /// Literal text, possibly containing `{name}` placeholders.
    Literal(String),
    /// Deferred value computed from the owning command at lookup time.
    Thunk(Arc<ThunkFn>),
    /// Nested command, used for sub-command interpolation.
    Command(Command),
}

impl Value {
    /// Wrap a closure as a deferred value.
    pub fn thunk<F>(f: F) -> Self
    where
        F: Fn(&Command) -> Value + Send + Sync + 'static,
    {
        Value::Thunk(Arc::new(f))
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Literal(s) => f.debug_tuple("Literal").field(s).finish(),
            Value::Thunk(_) => f.write_str("Thunk(..)"),
            Value::Command(c) => f.debug_tuple("Command").field(c).finish(),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Literal(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Literal(s)
    }
}

impl From<Command> for Value {
    fn from(c: Command) -> Self {
        Value::Command(c)
    }
}
