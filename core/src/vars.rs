//! Variable bag and placeholder resolution
//!
//! A [`Vars`] bag maps names to [`Value`]s and substitutes `{name}` tokens
//! inside strings. Resolution is recursive: a variable's own value may
//! contain placeholders, be computed by a thunk, or be a nested command.

use std::collections::HashMap;

use regex::Regex;

use crate::command::Command;
use crate::error::{CmdError, CmdResult};
use crate::value::Value;

/// Longest chain of thunks followed for one variable before resolution
/// gives up and reports a circular reference.
const MAX_THUNK_HOPS: usize = 64;

fn placeholder_pattern() -> Regex {
    Regex::new(r"\{.+?\}").unwrap()
}

/// Outcome of a variable lookup.
#[derive(Debug, Clone)]
pub enum Resolved {
    /// Fully substituted text.
    Text(String),
    /// A nested command; interpolates as its resolved argument vector.
    Command(Command),
}

/// The variable bag attached to a command.
///
/// Names are unique; a later [`set`](Vars::set) overwrites an earlier one.
#[derive(Debug, Clone, Default)]
pub struct Vars {
    entries: HashMap<String, Value>,
}

impl Vars {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `name`, replacing any previous entry.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(name.into(), value.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Union with `other`; `other`'s entries win on name collision.
    pub fn merge(&mut self, other: Vars) {
        self.entries.extend(other.entries);
    }

    /// Look up `name` and resolve its value.
    ///
    /// Thunks are invoked with `owner`; string results have their own
    /// placeholders substituted before they are returned. Fails with
    /// [`CmdError::UnknownVariable`] when `name` has no entry.
    pub fn get(&self, name: &str, owner: &Command) -> CmdResult<Resolved> {
        let mut in_flight = Vec::new();
        self.get_inner(name, owner, &mut in_flight)
    }

    /// Substitute every resolvable `{name}` token in `text`.
    ///
    /// Distinct tokens are collected up front and looked up into a
    /// replacement table before any substitution happens, so replaced text
    /// is never re-scanned. Tokens naming an unknown variable are left
    /// untouched; any other resolution failure propagates.
    pub fn resolve(&self, text: &str, owner: &Command) -> CmdResult<String> {
        let mut in_flight = Vec::new();
        self.resolve_inner(text, owner, &mut in_flight)
    }

    fn get_inner(
        &self,
        name: &str,
        owner: &Command,
        in_flight: &mut Vec<String>,
    ) -> CmdResult<Resolved> {
        if in_flight.iter().any(|n| n == name) {
            return Err(CmdError::CircularReference(name.to_string()));
        }

        let mut value = self
            .entries
            .get(name)
            .cloned()
            .ok_or_else(|| CmdError::UnknownVariable(name.to_string()))?;

        in_flight.push(name.to_string());

        let mut hops = 0;
        let resolved = loop {
            match value {
                Value::Thunk(f) => {
                    hops += 1;
                    if hops > MAX_THUNK_HOPS {
                        return Err(CmdError::CircularReference(name.to_string()));
                    }
                    value = f(owner);
                }
                Value::Literal(text) => {
                    break Resolved::Text(self.resolve_inner(&text, owner, in_flight)?);
                }
                Value::Command(command) => break Resolved::Command(command),
            }
        };

        in_flight.pop();
        Ok(resolved)
    }

    fn resolve_inner(
        &self,
        text: &str,
        owner: &Command,
        in_flight: &mut Vec<String>,
    ) -> CmdResult<String> {
        let pattern = placeholder_pattern();

        // Distinct tokens, in first-occurrence order.
        let mut tokens: Vec<&str> = Vec::new();
        for m in pattern.find_iter(text) {
            if !tokens.contains(&m.as_str()) {
                tokens.push(m.as_str());
            }
        }

        // Replacement table built before any substitution.
        let mut table: Vec<(&str, String)> = Vec::with_capacity(tokens.len());
        for token in tokens {
            let name = &token[1..token.len() - 1];
            match self.get_inner(name, owner, in_flight) {
                Ok(resolved) => table.push((token, stringify(resolved)?)),
                // Not an error: the token stays as literal text.
                Err(CmdError::UnknownVariable(_)) => {}
                Err(e) => return Err(e),
            }
        }

        let mut out = text.to_string();
        for (token, replacement) in table {
            out = out.replace(token, &replacement);
        }
        Ok(out)
    }
}

fn stringify(resolved: Resolved) -> CmdResult<String> {
    match resolved {
        Resolved::Text(s) => Ok(s),
        Resolved::Command(c) => Ok(c.resolve_args()?.join(" ")),
    }
}
