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

//! Type definitions for command execution

use slash_syntax::source::Span;
use std::ffi::c_int;
use std::ops::ControlFlow;
use std::process::{ExitCode, Termination};

/// Resultant string of word expansion
///
/// A field is a string accompanied by the position of the word it resulted
/// from.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Field {
    /// String value of the field
    pub value: String,
    /// Position of the originating word
    pub origin: Span,
}

impl Field {
    /// Creates a field with a dummy origin, for tests and synthesized
    /// arguments.
    #[must_use]
    pub fn dummy<S: Into<String>>(value: S) -> Field {
        Field {
            value: value.into(),
            origin: Span::dummy(),
        }
    }

    /// Creates an array of fields with dummy origins.
    pub fn dummies<I, S>(values: I) -> Vec<Field>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        values.into_iter().map(Self::dummy).collect()
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.value.fmt(f)
    }
}

/// Number that summarizes the result of command execution
///
/// The special parameter `$?` expands to the exit status of the last
/// executed command, and compound commands branch on it.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ExitStatus(pub c_int);

impl ExitStatus {
    /// Exit status of 0: success
    pub const SUCCESS: ExitStatus = ExitStatus(0);
    /// Exit status of 1: failure
    pub const FAILURE: ExitStatus = ExitStatus(1);
    /// Exit status of 2: error severer than failure
    pub const ERROR: ExitStatus = ExitStatus(2);
    /// Exit status of 126: command found but not executable
    pub const NOEXEC: ExitStatus = ExitStatus(126);
    /// Exit status of 127: command not found
    pub const NOT_FOUND: ExitStatus = ExitStatus(127);

    /// Returns true if and only if `self` is zero.
    #[must_use]
    pub const fn is_successful(&self) -> bool {
        self.0 == 0
    }

    /// Converts a signal number to the exit status of a command killed by
    /// that signal (128 + N).
    #[must_use]
    pub const fn from_signal(signal_number: c_int) -> ExitStatus {
        ExitStatus(128 + signal_number)
    }
}

impl std::fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl From<c_int> for ExitStatus {
    fn from(value: c_int) -> ExitStatus {
        ExitStatus(value)
    }
}

impl From<ExitStatus> for c_int {
    fn from(exit_status: ExitStatus) -> c_int {
        exit_status.0
    }
}

/// Converts the exit status to an `ExitCode`.
///
/// Only the lowest 8 bits are used.
impl Termination for ExitStatus {
    fn report(self) -> ExitCode {
        (self.0 as u8).into()
    }
}

/// Control-flow sentinel that interrupts sequential execution
///
/// A divert is not an error: it is consumed by the enclosing construct it
/// names (a loop for `Break`/`Continue`, a function or dot script for
/// `Return`, the whole shell for `Exit`).
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Divert {
    /// Break out of `count` enclosing loops (`count` ≥ 1)
    Break { count: usize },
    /// Continue the `count`-th enclosing loop (`count` ≥ 1)
    Continue { count: usize },
    /// Return from the current function or dot script
    ///
    /// The exit status defaults to the current `$?` if `None`.
    Return(Option<ExitStatus>),
    /// Exit the shell
    ///
    /// The exit status defaults to the current `$?` if `None`.
    Exit(Option<ExitStatus>),
}

/// Result of command execution
///
/// `Continue(())` means execution proceeds sequentially; `Break(divert)`
/// unwinds to the construct that consumes the divert.
pub type Result<T = ()> = ControlFlow<Divert, T>;
