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

//! Shell execution environment
//!
//! The [`Env`] struct owns every piece of state the executor mutates:
//! variables, positional parameters, aliases, functions, options, traps,
//! background jobs, the descriptor table and the last exit status. It is
//! created once at shell start and passed down through the executor
//! explicitly.
//!
//! A subshell is a forked process, so it naturally owns an independent
//! copy of the whole environment; entry points that need subshell
//! semantics call [`Env::enter_subshell`] in the child to reset the state
//! a subshell must not inherit (traps other than ignored ones, pending
//! signals, the job list).

pub mod builtin;
pub mod io;
pub mod job;
pub mod option;
pub mod semantics;
pub mod system;
pub mod trap;
pub mod variable;

mod function;
pub use function::{DefineError, Function, FunctionSet};

#[doc(no_inline)]
pub use slash_syntax::alias::AliasSet;

use crate::io::FdTable;
use crate::job::JobSet;
use crate::option::OptionSet;
use crate::semantics::ExitStatus;
use crate::system::Pid;
use crate::trap::TrapSet;
use crate::variable::VariableSet;
use std::collections::HashMap;
use std::ops::{Deref, DerefMut};

/// Execution context on the shell's control stack
///
/// Frames let distant parts of the executor see what they are nested in:
/// `break`/`continue` count [`Loop`](Frame::Loop) frames, `return` looks
/// for a [`Function`](Frame::Function) or [`DotScript`](Frame::DotScript)
/// frame, and `set -e` is suppressed inside a
/// [`Condition`](Frame::Condition) frame.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Frame {
    /// Condition of an `if`, `while` or `until`, or a `!` or `&&`/`||`
    /// operand that tolerates failure
    Condition,
    /// Body of a `for`, `while` or `until` loop
    Loop,
    /// Function body
    Function,
    /// Script read by the `.` built-in
    DotScript,
    /// Trap action
    Trap,
}

/// Whole state of the shell execution environment
#[derive(Debug)]
pub struct Env {
    /// Aliases the parser substitutes
    pub aliases: AliasSet,
    /// Built-in utilities, keyed by name
    pub builtins: HashMap<&'static str, builtin::Builtin>,
    /// Exit status of the last executed command (`$?`)
    pub exit_status: ExitStatus,
    /// Descriptor bookkeeping
    pub fd_table: FdTable,
    /// Defined functions
    pub functions: FunctionSet,
    /// Internal scan position of the `getopts` built-in
    ///
    /// The pair is the `OPTIND` value the state belongs to and the
    /// character offset within the argument being scanned; the state is
    /// discarded when `OPTIND` no longer matches.
    pub getopts_state: Option<(usize, usize)>,
    /// Resolved command locations for the `hash` built-in
    pub hashed_commands: HashMap<String, std::path::PathBuf>,
    /// Background jobs
    pub jobs: JobSet,
    /// Exit status of the last command substitution in the current
    /// command, if any
    ///
    /// A simple command with no command name completes with this status.
    pub last_command_subst_status: Option<ExitStatus>,
    /// Shell option state
    pub options: OptionSet,
    /// Positional parameters (`$1` is `positional_params[0]`)
    pub positional_params: Vec<String>,
    /// Name the shell or script was invoked as (`$0`)
    pub shell_name: String,
    /// Process ID of the shell (`$$`); stable across subshells
    pub shell_pid: Pid,
    /// Execution context stack
    pub stack: Vec<Frame>,
    /// Trap settings
    pub traps: TrapSet,
    /// Shell variables
    pub variables: VariableSet,
}

impl Env {
    /// Creates an environment with empty state.
    ///
    /// The caller seeds `variables` (typically from the process
    /// environment), options and positional parameters.
    #[must_use]
    pub fn new<N: Into<String>>(shell_name: N) -> Env {
        Env {
            aliases: AliasSet::new(),
            builtins: HashMap::new(),
            exit_status: ExitStatus::SUCCESS,
            fd_table: FdTable::new(),
            functions: FunctionSet::new(),
            getopts_state: None,
            hashed_commands: HashMap::new(),
            jobs: JobSet::new(),
            last_command_subst_status: None,
            options: OptionSet::new(),
            positional_params: Vec::new(),
            shell_name: shell_name.into(),
            shell_pid: system::getpid(),
            stack: Vec::new(),
            traps: TrapSet::new(),
            variables: VariableSet::new(),
        }
    }

    /// Pushes an execution frame, returning a guard that pops it.
    pub fn push_frame(&mut self, frame: Frame) -> FrameGuard<'_> {
        self.stack.push(frame);
        FrameGuard { env: self }
    }

    /// Number of loops the current point is nested in.
    #[must_use]
    pub fn loop_depth(&self) -> usize {
        self.stack.iter().filter(|&&f| f == Frame::Loop).count()
    }

    /// Whether execution is inside a condition context.
    ///
    /// `set -e` does not apply in a condition context.
    #[must_use]
    pub fn in_condition(&self) -> bool {
        self.stack.contains(&Frame::Condition)
    }

    /// Whether `return` is valid here (function body or dot script).
    #[must_use]
    pub fn can_return(&self) -> bool {
        self.stack
            .iter()
            .any(|&f| f == Frame::Function || f == Frame::DotScript)
    }

    /// Adjusts state in a forked child that is to act as a subshell.
    ///
    /// Traps other than ignored ones are reset, pending signals are
    /// discarded, and the parent's job list is not inherited. The process
    /// ID reported by `$$` intentionally stays the parent's.
    pub fn enter_subshell(&mut self) {
        self.traps.enter_subshell();
        self.jobs = JobSet::new();
    }

    /// Prints an error message prefixed with the shell name to standard
    /// error.
    pub fn print_error(&self, message: &str) {
        let text = format!("{}: {}\n", self.shell_name, message);
        let _ = system::write_all(2, text.as_bytes());
    }
}

/// Guard that pops an execution frame when dropped
///
/// The guard dereferences to [`Env`] so the protected scope can keep
/// using the environment.
#[derive(Debug)]
pub struct FrameGuard<'a> {
    env: &'a mut Env,
}

impl Deref for FrameGuard<'_> {
    type Target = Env;
    fn deref(&self) -> &Env {
        self.env
    }
}

impl DerefMut for FrameGuard<'_> {
    fn deref_mut(&mut self) -> &mut Env {
        self.env
    }
}

impl Drop for FrameGuard<'_> {
    fn drop(&mut self) {
        self.env.stack.pop();
    }
}
