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

//! Unset built-in
//!
//! Removes variables (`-v`, the default) or functions (`-f`). Unsetting
//! a name that is not set is not an error; unsetting a read-only entity
//! is.

use slash_env::semantics::{ExitStatus, Field, Result};
use slash_env::Env;
use std::ops::ControlFlow::Continue;

pub fn main(env: &mut Env, args: Vec<Field>) -> Result<ExitStatus> {
    let mut functions = false;
    let mut names = Vec::new();
    for arg in &args {
        match arg.value.as_str() {
            "-f" => functions = true,
            "-v" => functions = false,
            name => names.push(name.to_string()),
        }
    }

    let mut status = ExitStatus::SUCCESS;
    for name in names {
        let result = if functions {
            env.functions.unset(&name).map(|_| ()).map_err(|e| e.to_string())
        } else {
            env.variables.unset(&name).map(|_| ()).map_err(|e| e.to_string())
        };
        if let Err(message) = result {
            env.print_error(&message);
            status = ExitStatus::FAILURE;
        }
    }
    Continue(status)
}
