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

//! Dot built-in (`.`)
//!
//! Reads and executes commands from a file in the current environment. A
//! name without a slash is searched for in the directories of `$PATH`
//! (the file only needs to be readable, not executable). A `return` in
//! the sourced file resumes after the `.` command.

use crate::common::{failure, usage_error};
use slash_env::semantics::{Divert, ExitStatus, Field, Result};
use slash_env::{Env, Frame};
use std::ops::ControlFlow::{Break, Continue};
use std::path::PathBuf;

/// Locates the file to source.
fn find_file(env: &Env, name: &str) -> Option<PathBuf> {
    if name.contains('/') {
        return Some(PathBuf::from(name));
    }
    let path = env.variables.value("PATH").unwrap_or_default().to_string();
    for directory in path.split(':') {
        let directory = if directory.is_empty() { "." } else { directory };
        let candidate = PathBuf::from(directory).join(name);
        if candidate.is_file() {
            return Some(candidate);
        }
    }
    None
}

pub fn main(env: &mut Env, args: Vec<Field>) -> Result<ExitStatus> {
    let Some(operand) = args.first() else {
        return Continue(usage_error(env, ".", "missing file operand"));
    };
    let name = operand.value.clone();

    let Some(path) = find_file(env, &name) else {
        return Continue(failure(env, ".", &format!("{name}: not found")));
    };
    let source = match std::fs::read_to_string(&path) {
        Ok(source) => source,
        Err(error) => {
            return Continue(failure(env, ".", &format!("{name}: {error}")));
        }
    };

    let result = {
        let mut env = env.push_frame(Frame::DotScript);
        slash_semantics::runner::eval_fragment(&mut env, &source)
    };
    match result {
        Continue(()) => Continue(env.exit_status),
        Break(Divert::Return(status)) => Continue(status.unwrap_or(env.exit_status)),
        Break(divert) => Break(divert),
    }
}
