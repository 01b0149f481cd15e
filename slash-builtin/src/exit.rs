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

//! Exit built-in: terminates the shell
//!
//! Without an operand, the shell exits with the current `$?`.

use crate::common::usage_error;
use slash_env::semantics::{Divert, ExitStatus, Field, Result};
use slash_env::Env;
use std::ops::ControlFlow::{Break, Continue};

pub fn main(env: &mut Env, args: Vec<Field>) -> Result<ExitStatus> {
    let status = match args.first() {
        None => None,
        Some(operand) => match operand.value.parse::<i32>() {
            Ok(code) => Some(ExitStatus(code)),
            Err(_) => {
                return Continue(usage_error(
                    env,
                    "exit",
                    &format!("`{}` is not a valid exit status", operand.value),
                ))
            }
        },
    };
    Break(Divert::Exit(status))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_without_operand_uses_current_status() {
        let mut env = Env::new("slash");
        assert_eq!(
            main(&mut env, Vec::new()),
            Break(Divert::Exit(None))
        );
    }

    #[test]
    fn exit_with_operand() {
        let mut env = Env::new("slash");
        assert_eq!(
            main(&mut env, Field::dummies(["42"])),
            Break(Divert::Exit(Some(ExitStatus(42))))
        );
    }

    #[test]
    fn exit_with_bad_operand_is_a_usage_error() {
        let mut env = Env::new("slash");
        assert_eq!(
            main(&mut env, Field::dummies(["abc"])),
            Continue(ExitStatus::ERROR)
        );
    }
}
