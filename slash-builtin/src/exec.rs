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

//! Exec built-in
//!
//! Without operands, the built-in does nothing itself; its redirections
//! are left in effect by the executor. With operands, the named utility
//! replaces the shell process without forking. An exec failure terminates
//! a non-interactive shell.

use slash_env::option::ShellOption;
use slash_env::semantics::{Divert, ExitStatus, Field, Result};
use slash_env::system::{self, Errno};
use slash_env::Env;
use std::ffi::CString;
use std::ops::ControlFlow::{Break, Continue};

pub fn main(env: &mut Env, args: Vec<Field>) -> Result<ExitStatus> {
    let Some(name) = args.first() else {
        return Continue(ExitStatus::SUCCESS);
    };
    let name = name.value.clone();

    let Some(path) = slash_semantics::command_search::search(env, &name) else {
        env.print_error(&format!("exec: {name}: command not found"));
        return exec_failure(env, ExitStatus::NOT_FOUND);
    };
    let Ok(c_path) = CString::new(path.as_os_str().as_encoded_bytes()) else {
        return exec_failure(env, ExitStatus::NOT_FOUND);
    };
    let c_args: Vec<CString> = args
        .iter()
        .filter_map(|f| CString::new(f.value.as_str()).ok())
        .collect();
    let environ = env.variables.environ();

    let errno = system::execve(&c_path, &c_args, &environ);
    env.print_error(&format!("exec: {name}: {errno}"));
    let status = if errno == Errno::ENOENT {
        ExitStatus::NOT_FOUND
    } else {
        ExitStatus::NOEXEC
    };
    exec_failure(env, status)
}

/// An exec failure exits a non-interactive shell.
fn exec_failure(env: &Env, status: ExitStatus) -> Result<ExitStatus> {
    if env.options.is_on(ShellOption::Interactive) {
        Continue(status)
    } else {
        Break(Divert::Exit(Some(status)))
    }
}
