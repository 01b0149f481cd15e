// This file is part of slash, a POSIX command language interpreter.
// Copyright (C) 2026 The slash developers
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Items for shell variables
//!
//! A [`Variable`] is a named value with export and read-only attributes,
//! stored in a [`VariableSet`]. The set preserves insertion order so that
//! the environment passed to child processes is deterministic; assigning
//! to an existing name keeps its position (last-write-wins for the value).
//! Lookup is a linear scan, which is appropriate for the small sets a
//! shell holds.

use std::ffi::CString;
use thiserror::Error;

/// Value and attributes of a shell variable
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Variable {
    /// Value, or `None` if the variable is declared but unset
    ///
    /// `export FOO` declares an exported variable without giving it a
    /// value; such a variable still expands as unset.
    pub value: Option<String>,
    /// Whether the variable is passed to child process environments
    pub exported: bool,
    /// Whether assignment and unset are forbidden
    pub read_only: bool,
}

impl Variable {
    /// Creates a variable with a value and no attributes.
    #[must_use]
    pub fn new<V: Into<String>>(value: V) -> Variable {
        Variable {
            value: Some(value.into()),
            ..Default::default()
        }
    }

    /// Creates an exported variable with a value.
    #[must_use]
    pub fn exported<V: Into<String>>(value: V) -> Variable {
        Variable {
            value: Some(value.into()),
            exported: true,
            ..Default::default()
        }
    }
}

/// Error assigning to a read-only variable
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("cannot assign to read-only variable `{name}`")]
pub struct AssignError {
    pub name: String,
}

/// Error unsetting a read-only variable
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("cannot unset read-only variable `{name}`")]
pub struct UnsetError {
    pub name: String,
}

/// Insertion-ordered collection of variables
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct VariableSet {
    entries: Vec<(String, Variable)>,
}

impl VariableSet {
    /// Creates an empty variable set.
    #[must_use]
    pub fn new() -> VariableSet {
        Default::default()
    }

    /// Imports variables from the process environment.
    ///
    /// Imported variables are marked exported.
    #[must_use]
    pub fn from_environment() -> VariableSet {
        let mut set = VariableSet::new();
        for (name, value) in std::env::vars() {
            set.entries.push((name, Variable::exported(value)));
        }
        set
    }

    /// Returns the variable with the given name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Returns the value of the variable, if set.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&str> {
        self.get(name)?.value.as_deref()
    }

    /// Assigns a value to a variable, creating it if necessary.
    ///
    /// An existing variable keeps its position and attributes; a read-only
    /// variable refuses the assignment.
    pub fn assign<V: Into<String>>(&mut self, name: &str, value: V) -> Result<(), AssignError> {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some((_, variable)) => {
                if variable.read_only {
                    return Err(AssignError {
                        name: name.to_string(),
                    });
                }
                variable.value = Some(value.into());
                Ok(())
            }
            None => {
                self.entries
                    .push((name.to_string(), Variable::new(value)));
                Ok(())
            }
        }
    }

    /// Marks a variable as exported, declaring it if necessary.
    pub fn export(&mut self, name: &str) {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some((_, variable)) => variable.exported = true,
            None => self.entries.push((
                name.to_string(),
                Variable {
                    exported: true,
                    ..Default::default()
                },
            )),
        }
    }

    /// Marks a variable as read-only, declaring it if necessary.
    pub fn make_read_only(&mut self, name: &str) {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some((_, variable)) => variable.read_only = true,
            None => self.entries.push((
                name.to_string(),
                Variable {
                    read_only: true,
                    ..Default::default()
                },
            )),
        }
    }

    /// Removes a variable.
    ///
    /// Returns the removed variable, or `None` if there was none. A
    /// read-only variable refuses to be unset.
    pub fn unset(&mut self, name: &str) -> Result<Option<Variable>, UnsetError> {
        match self.entries.iter().position(|(n, _)| n == name) {
            Some(index) => {
                if self.entries[index].1.read_only {
                    return Err(UnsetError {
                        name: name.to_string(),
                    });
                }
                Ok(Some(self.entries.remove(index).1))
            }
            None => Ok(None),
        }
    }

    /// Puts back a previously captured variable state, or removes the
    /// variable if `None`.
    ///
    /// This bypasses the read-only check; it is meant for undoing the
    /// temporary environment of a simple command.
    pub fn replace(&mut self, name: &str, variable: Option<Variable>) {
        let position = self.entries.iter().position(|(n, _)| n == name);
        match (position, variable) {
            (Some(index), Some(variable)) => self.entries[index].1 = variable,
            (Some(index), None) => {
                self.entries.remove(index);
            }
            (None, Some(variable)) => self.entries.push((name.to_string(), variable)),
            (None, None) => {}
        }
    }

    /// Iterates over all variables in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Variable)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Assembles the environment for a child process.
    ///
    /// The result contains one `name=value` entry for each exported
    /// variable that has a value, in insertion order. Names or values with
    /// interior NUL bytes are silently omitted since they cannot cross the
    /// exec boundary.
    #[must_use]
    pub fn environ(&self) -> Vec<CString> {
        self.entries
            .iter()
            .filter(|(_, v)| v.exported)
            .filter_map(|(n, v)| {
                let value = v.value.as_ref()?;
                CString::new(format!("{n}={value}")).ok()
            })
            .collect()
    }
}
