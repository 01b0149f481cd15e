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

//! Pwd built-in
//!
//! Prints the working directory. With the default `-L`, the value of
//! `$PWD` is printed if it is an absolute path naming the current
//! directory; otherwise (and with `-P`) the physical path is queried from
//! the system.

use crate::common::{failure, output, usage_error};
use slash_env::semantics::{ExitStatus, Field, Result};
use slash_env::system;
use slash_env::Env;
use std::ops::ControlFlow::Continue;

pub fn main(env: &mut Env, args: Vec<Field>) -> Result<ExitStatus> {
    let mut logical = true;
    for arg in &args {
        match arg.value.as_str() {
            "-L" => logical = true,
            "-P" => logical = false,
            other => {
                return Continue(usage_error(env, "pwd", &format!("unknown operand `{other}`")))
            }
        }
    }

    if logical {
        if let Some(pwd) = env.variables.value("PWD") {
            if pwd.starts_with('/') && !pwd.split('/').any(|c| c == "." || c == "..") {
                let names_current_directory = std::fs::canonicalize(pwd)
                    .ok()
                    .zip(system::getcwd().ok())
                    .is_some_and(|(a, b)| a == b);
                if names_current_directory {
                    let pwd = pwd.to_string();
                    return Continue(output(env, &format!("{pwd}\n")));
                }
            }
        }
    }

    match system::getcwd() {
        Ok(path) => Continue(output(env, &format!("{}\n", path.display()))),
        Err(errno) => Continue(failure(env, "pwd", &errno.to_string())),
    }
}
