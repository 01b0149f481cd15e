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

//! Command built-in
//!
//! `command name args...` executes `name` while bypassing functions.
//! `command -v name` writes how the shell would interpret `name`;
//! `command -V name` does the same verbosely.

use crate::common::{output, usage_error};
use slash_env::semantics::{ExitStatus, Field, Result};
use slash_env::Env;
use slash_syntax::lexer::Keyword;
use std::ops::ControlFlow::{Break, Continue};

/// How the shell would interpret a command name
pub(crate) enum Interpretation {
    ReservedWord,
    Alias(String),
    Function,
    Builtin,
    External(std::path::PathBuf),
    NotFound,
}

pub(crate) fn interpret(env: &mut Env, name: &str) -> Interpretation {
    if name.parse::<Keyword>().is_ok() {
        return Interpretation::ReservedWord;
    }
    if let Some(entry) = env.aliases.get(name) {
        return Interpretation::Alias(entry.0.replacement.clone());
    }
    if env.functions.get(name).is_some() {
        return Interpretation::Function;
    }
    if env.builtins.contains_key(name) {
        return Interpretation::Builtin;
    }
    match slash_semantics::command_search::search(env, name) {
        Some(path) => Interpretation::External(path),
        None => Interpretation::NotFound,
    }
}

pub fn main(env: &mut Env, args: Vec<Field>) -> Result<ExitStatus> {
    let mut resolve = false;
    let mut verbose = false;
    let mut index = 0;
    while let Some(arg) = args.get(index) {
        match arg.value.as_str() {
            "-v" => resolve = true,
            "-V" => {
                resolve = true;
                verbose = true;
            }
            // `-p` asks for the standard PATH; the system default is used
            // as is.
            "-p" => {}
            "--" => {
                index += 1;
                break;
            }
            _ => break,
        }
        index += 1;
    }
    let operands = &args[index..];
    let Some(name_field) = operands.first() else {
        return Continue(usage_error(env, "command", "missing command name"));
    };
    let name = name_field.value.clone();

    if resolve {
        let text = match (interpret(env, &name), verbose) {
            (Interpretation::ReservedWord, false) => name.clone(),
            (Interpretation::ReservedWord, true) => format!("{name} is a shell keyword"),
            (Interpretation::Alias(replacement), false) => {
                format!("alias {name}='{replacement}'")
            }
            (Interpretation::Alias(replacement), true) => {
                format!("{name} is an alias for `{replacement}'")
            }
            (Interpretation::Function, false) => name.clone(),
            (Interpretation::Function, true) => format!("{name} is a function"),
            (Interpretation::Builtin, false) => name.clone(),
            (Interpretation::Builtin, true) => format!("{name} is a shell builtin"),
            (Interpretation::External(path), false) => path.display().to_string(),
            (Interpretation::External(path), true) => {
                format!("{name} is {}", path.display())
            }
            (Interpretation::NotFound, false) => return Continue(ExitStatus::FAILURE),
            (Interpretation::NotFound, true) => {
                env.print_error(&format!("command: {name}: not found"));
                return Continue(ExitStatus::FAILURE);
            }
        };
        return Continue(output(env, &format!("{text}\n")));
    }

    // Execute, bypassing functions.
    if let Some(builtin) = env.builtins.get(name.as_str()).copied() {
        let builtin_args = operands[1..].to_vec();
        return match (builtin.execute)(env, builtin_args) {
            Continue(status) => Continue(status),
            Break(divert) => Break(divert),
        };
    }
    match slash_semantics::command::run_external(env, operands.to_vec()) {
        Continue(()) => Continue(env.exit_status),
        Break(divert) => Break(divert),
    }
}
