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

//! Type definitions for built-in utilities
//!
//! The executor dispatches to built-ins through the registry stored in
//! [`Env::builtins`](crate::Env); the `slash-builtin` crate fills the
//! registry at shell startup. Keeping only the registry here lets the
//! executor stay independent of the built-in implementations.

use crate::semantics::{ExitStatus, Field, Result};
use crate::Env;

/// Classification of built-in utilities
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum BuiltinKind {
    /// Special built-in
    ///
    /// Special built-ins are found before functions in command search and
    /// a redirection error on one aborts the shell in non-interactive
    /// mode.
    Special,
    /// Intrinsic (regular) built-in
    Intrinsic,
}

/// Type of the function that implements a built-in
///
/// The function receives the expanded arguments (not including the
/// command name) and returns the exit status, or breaks with a
/// [`Divert`](crate::semantics::Divert) for the control-flow built-ins.
pub type Main = fn(&mut Env, Vec<Field>) -> Result<ExitStatus>;

/// Definition of a built-in utility
#[derive(Clone, Copy)]
pub struct Builtin {
    /// Classification
    pub kind: BuiltinKind,
    /// Implementation
    pub execute: Main,
}

impl std::fmt::Debug for Builtin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Builtin").field("kind", &self.kind).finish()
    }
}
