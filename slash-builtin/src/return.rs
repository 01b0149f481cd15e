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

//! Return built-in: returns from a function or dot script

use crate::common::usage_error;
use slash_env::semantics::{Divert, ExitStatus, Field, Result};
use slash_env::Env;
use std::ops::ControlFlow::{Break, Continue};

pub fn main(env: &mut Env, args: Vec<Field>) -> Result<ExitStatus> {
    if !env.can_return() {
        return Continue(usage_error(
            env,
            "return",
            "can only be used in a function or sourced script",
        ));
    }
    let status = match args.first() {
        None => None,
        Some(operand) => match operand.value.parse::<i32>() {
            Ok(code) => Some(ExitStatus(code)),
            Err(_) => {
                return Continue(usage_error(
                    env,
                    "return",
                    &format!("`{}` is not a valid exit status", operand.value),
                ))
            }
        },
    };
    Break(Divert::Return(status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use slash_env::Frame;

    #[test]
    fn return_outside_function_is_an_error() {
        let mut env = Env::new("slash");
        assert_eq!(main(&mut env, Vec::new()), Continue(ExitStatus::ERROR));
    }

    #[test]
    fn return_inside_function() {
        let mut env = Env::new("slash");
        let mut env = env.push_frame(Frame::Function);
        assert_eq!(
            main(&mut env, Field::dummies(["3"])),
            Break(Divert::Return(Some(ExitStatus(3))))
        );
        assert_eq!(main(&mut env, Vec::new()), Break(Divert::Return(None)));
    }
}
