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

//! Shift built-in: discards leading positional parameters

use crate::common::{failure, usage_error};
use slash_env::semantics::{ExitStatus, Field, Result};
use slash_env::Env;
use std::ops::ControlFlow::Continue;

pub fn main(env: &mut Env, args: Vec<Field>) -> Result<ExitStatus> {
    let count = match args.first() {
        None => 1,
        Some(operand) => match operand.value.parse::<usize>() {
            Ok(count) => count,
            Err(_) => {
                return Continue(usage_error(
                    env,
                    "shift",
                    &format!("`{}` is not a valid count", operand.value),
                ))
            }
        },
    };

    if count > env.positional_params.len() {
        return Continue(failure(
            env,
            "shift",
            &format!(
                "cannot shift {count} parameters, only {} present",
                env.positional_params.len()
            ),
        ));
    }
    env.positional_params.drain(..count);
    Continue(ExitStatus::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_discards_leading_parameters() {
        let mut env = Env::new("slash");
        env.positional_params = vec!["a".into(), "b".into(), "c".into()];
        assert_eq!(main(&mut env, Vec::new()), Continue(ExitStatus::SUCCESS));
        assert_eq!(env.positional_params, ["b", "c"]);

        assert_eq!(
            main(&mut env, Field::dummies(["2"])),
            Continue(ExitStatus::SUCCESS)
        );
        assert!(env.positional_params.is_empty());
    }

    #[test]
    fn shift_beyond_the_parameter_count_fails() {
        let mut env = Env::new("slash");
        env.positional_params = vec!["a".into()];
        assert_eq!(
            main(&mut env, Field::dummies(["2"])),
            Continue(ExitStatus::FAILURE)
        );
        assert_eq!(env.positional_params, ["a"]);
    }
}
