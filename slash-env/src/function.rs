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

//! Type definitions for shell functions
//!
//! A [`Function`] binds a name to the compound command that forms its
//! body. Functions live in a [`FunctionSet`] keyed by name; entries are
//! reference-counted so a running function survives its own redefinition
//! or removal.

use slash_syntax::syntax::FullCompoundCommand;
use std::borrow::Borrow;
use std::collections::HashSet;
use std::hash::Hash;
use std::hash::Hasher;
use std::rc::Rc;
use thiserror::Error;

/// Definition of a function
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Function {
    /// Name the function is invoked by
    pub name: String,
    /// Command executed when the function is called
    ///
    /// The body is shared with the syntax tree the function was defined
    /// in; defining a function only clones the pointer.
    pub body: Rc<FullCompoundCommand>,
    /// Whether redefinition and unset are forbidden
    pub read_only: bool,
}

impl Function {
    /// Creates a function definition.
    #[must_use]
    pub fn new<N: Into<String>>(name: N, body: Rc<FullCompoundCommand>) -> Function {
        Function {
            name: name.into(),
            body,
            read_only: false,
        }
    }
}

/// Error redefining a read-only function
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("cannot redefine read-only function `{name}`")]
pub struct DefineError {
    pub name: String,
}

/// Error unsetting a read-only function
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("cannot unset read-only function `{name}`")]
pub struct UnsetError {
    pub name: String,
}

/// Wrapper of [`Function`] for inserting into a hash set
///
/// The `Hash` and `PartialEq` implementations compare only names.
#[derive(Clone, Debug, Eq)]
struct HashEntry(Rc<Function>);

impl PartialEq for HashEntry {
    fn eq(&self, other: &HashEntry) -> bool {
        self.0.name == other.0.name
    }
}

impl Hash for HashEntry {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.name.hash(state)
    }
}

impl Borrow<str> for HashEntry {
    fn borrow(&self) -> &str {
        &self.0.name
    }
}

/// Collection of functions
#[derive(Clone, Debug, Default)]
pub struct FunctionSet {
    entries: HashSet<HashEntry>,
}

impl FunctionSet {
    /// Creates an empty function set.
    #[must_use]
    pub fn new() -> FunctionSet {
        Default::default()
    }

    /// Returns the function with the given name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Rc<Function>> {
        self.entries.get(name).map(|entry| &entry.0)
    }

    /// Inserts a function, replacing any previous definition.
    ///
    /// Replacing a read-only function is an error; the previous definition
    /// is retained.
    pub fn define<F: Into<Rc<Function>>>(
        &mut self,
        function: F,
    ) -> Result<Option<Rc<Function>>, DefineError> {
        let function = function.into();
        match self.entries.get(function.name.as_str()) {
            Some(existing) if existing.0.read_only => Err(DefineError {
                name: function.name.clone(),
            }),
            _ => Ok(self.entries.replace(HashEntry(function)).map(|e| e.0)),
        }
    }

    /// Removes a function.
    ///
    /// Removing a read-only function is an error.
    pub fn unset(&mut self, name: &str) -> Result<Option<Rc<Function>>, UnsetError> {
        match self.entries.get(name) {
            Some(entry) if entry.0.read_only => Err(UnsetError {
                name: name.to_string(),
            }),
            _ => Ok(self.entries.take(name).map(|e| e.0)),
        }
    }

    /// Iterates over the functions in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Rc<Function>> {
        self.entries.iter().map(|entry| &entry.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slash_syntax::syntax::{CompoundCommand, List};

    fn body() -> Rc<FullCompoundCommand> {
        Rc::new(FullCompoundCommand {
            command: CompoundCommand::Grouping(List(Vec::new())),
            redirs: Vec::new(),
        })
    }

    #[test]
    fn defining_and_getting() {
        let mut set = FunctionSet::new();
        let function = Rc::new(Function::new("foo", body()));
        assert_eq!(set.define(function.clone()), Ok(None));
        assert_eq!(set.get("foo"), Some(&function));
        assert_eq!(set.get("bar"), None);
    }

    #[test]
    fn redefining_replaces() {
        let mut set = FunctionSet::new();
        let first = Rc::new(Function::new("foo", body()));
        let second = Rc::new(Function::new("foo", body()));
        set.define(first.clone()).unwrap();
        let replaced = set.define(second.clone()).unwrap();
        assert_eq!(replaced, Some(first));
        assert_eq!(set.get("foo"), Some(&second));
    }

    #[test]
    fn read_only_refuses_redefinition_and_unset() {
        let mut set = FunctionSet::new();
        let mut function = Function::new("foo", body());
        function.read_only = true;
        set.define(Rc::new(function)).unwrap();

        let error = set.define(Rc::new(Function::new("foo", body()))).unwrap_err();
        assert_eq!(error.name, "foo");
        let error = set.unset("foo").unwrap_err();
        assert_eq!(error.name, "foo");
        assert!(set.get("foo").is_some());
    }

    #[test]
    fn unsetting() {
        let mut set = FunctionSet::new();
        let function = Rc::new(Function::new("foo", body()));
        set.define(function.clone()).unwrap();
        assert_eq!(set.unset("foo"), Ok(Some(function)));
        assert_eq!(set.unset("foo"), Ok(None));
    }
}
