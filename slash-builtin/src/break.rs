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

//! Break built-in: exits enclosing loops
//!
//! `break n` exits n nested loops; a count larger than the nesting exits
//! them all. Outside any loop the built-in is a no-op diagnostic.

use crate::common::usage_error;
use slash_env::semantics::{Divert, ExitStatus, Field, Result};
use slash_env::Env;
use std::ops::ControlFlow::{Break, Continue};

/// Parses the loop count operand shared by `break` and `continue`.
pub(crate) fn parse_count(env: &mut Env, builtin: &str, args: &[Field]) -> Option<usize> {
    match args.first() {
        None => Some(1),
        Some(operand) => match operand.value.parse::<usize>() {
            Ok(count) if count >= 1 => Some(count),
            _ => {
                let _ = usage_error(
                    env,
                    builtin,
                    &format!("`{}` is not a valid loop count", operand.value),
                );
                None
            }
        },
    }
}

pub fn main(env: &mut Env, args: Vec<Field>) -> Result<ExitStatus> {
    let Some(count) = parse_count(env, "break", &args) else {
        return Continue(ExitStatus::ERROR);
    };
    let count = count.min(env.loop_depth());
    if count == 0 {
        env.print_error("break: only meaningful in a loop");
        return Continue(ExitStatus::SUCCESS);
    }
    Break(Divert::Break { count })
}

#[cfg(test)]
mod tests {
    use super::*;
    use slash_env::Frame;

    #[test]
    fn break_outside_a_loop_is_lenient() {
        let mut env = Env::new("slash");
        assert_eq!(main(&mut env, Vec::new()), Continue(ExitStatus::SUCCESS));
    }

    #[test]
    fn break_counts_are_clamped_to_the_nesting() {
        let mut env = Env::new("slash");
        let mut env = env.push_frame(Frame::Loop);
        let mut env = env.push_frame(Frame::Loop);
        assert_eq!(
            main(&mut env, Vec::new()),
            Break(Divert::Break { count: 1 })
        );
        assert_eq!(
            main(&mut env, Field::dummies(["2"])),
            Break(Divert::Break { count: 2 })
        );
        assert_eq!(
            main(&mut env, Field::dummies(["99"])),
            Break(Divert::Break { count: 2 })
        );
    }

    #[test]
    fn invalid_count_is_a_usage_error() {
        let mut env = Env::new("slash");
        let mut env = env.push_frame(Frame::Loop);
        assert_eq!(
            main(&mut env, Field::dummies(["0"])),
            Continue(ExitStatus::ERROR)
        );
        assert_eq!(
            main(&mut env, Field::dummies(["x"])),
            Continue(ExitStatus::ERROR)
        );
    }
}
