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

//! Export built-in
//!
//! Marks variables for export, optionally assigning values. With `-p` or
//! no operands, prints the exported variables in a re-input format.

use crate::common::{output, quote};
use slash_env::semantics::{ExitStatus, Field, Result};
use slash_env::Env;
use std::fmt::Write;
use std::ops::ControlFlow::Continue;

pub fn main(env: &mut Env, args: Vec<Field>) -> Result<ExitStatus> {
    let operands: Vec<&Field> = args.iter().filter(|f| f.value != "-p").collect();
    if operands.is_empty() {
        let mut out = String::new();
        for (name, variable) in env.variables.iter() {
            if !variable.exported {
                continue;
            }
            match &variable.value {
                Some(value) => {
                    let _ = writeln!(out, "export {name}={}", quote(value));
                }
                None => {
                    let _ = writeln!(out, "export {name}");
                }
            }
        }
        return Continue(output(env, &out));
    }

    let mut status = ExitStatus::SUCCESS;
    for operand in operands {
        let (name, value) = match operand.value.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (operand.value.as_str(), None),
        };
        if let Some(value) = value {
            if let Err(error) = env.variables.assign(name, value) {
                env.print_error(&error.to_string());
                status = ExitStatus::FAILURE;
                continue;
            }
        }
        env.variables.export(name);
    }
    Continue(status)
}
