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

//! Type built-in
//!
//! Writes how each operand would be interpreted as a command name.

use crate::command::{interpret, Interpretation};
use crate::common::{failure, output, usage_error};
use slash_env::semantics::{ExitStatus, Field, Result};
use slash_env::Env;
use std::ops::ControlFlow::Continue;

pub fn main(env: &mut Env, args: Vec<Field>) -> Result<ExitStatus> {
    if args.is_empty() {
        return Continue(usage_error(env, "type", "missing command name"));
    }

    let mut status = ExitStatus::SUCCESS;
    for arg in &args {
        let name = &arg.value;
        let line = match interpret(env, name) {
            Interpretation::ReservedWord => format!("{name} is a shell keyword\n"),
            Interpretation::Alias(replacement) => {
                format!("{name} is an alias for `{replacement}'\n")
            }
            Interpretation::Function => format!("{name} is a function\n"),
            Interpretation::Builtin => format!("{name} is a shell builtin\n"),
            Interpretation::External(path) => format!("{name} is {}\n", path.display()),
            Interpretation::NotFound => {
                status = failure(env, "type", &format!("{name}: not found"));
                continue;
            }
        };
        let print_status = output(env, &line);
        if status == ExitStatus::SUCCESS {
            status = print_status;
        }
    }
    Continue(status)
}
