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

//! Trap built-in
//!
//! Configures actions for signals and the EXIT condition. Without
//! operands the current traps are printed in a re-input format. The first
//! operand is the action — `-` resets to the default, an empty string
//! ignores the condition, anything else is a command string — unless all
//! operands are condition names or numbers, in which case they are reset.

use crate::common::{failure, output, usage_error};
use slash_env::semantics::{ExitStatus, Field, Result};
use slash_env::trap::{Action, Condition};
use slash_env::Env;
use std::fmt::Write;
use std::ops::ControlFlow::Continue;

pub fn main(env: &mut Env, args: Vec<Field>) -> Result<ExitStatus> {
    if args.is_empty() {
        let mut out = String::new();
        for (condition, action) in env.traps.iter() {
            match action {
                Action::Ignore => {
                    let _ = writeln!(out, "trap -- '' {condition}");
                }
                Action::Command(command) => {
                    let _ = writeln!(
                        out,
                        "trap -- '{}' {condition}",
                        command.replace('\'', r"'\''")
                    );
                }
                Action::Default => {}
            }
        }
        return Continue(output(env, &out));
    }

    // If every operand parses as a condition, they are all reset.
    let all_conditions = args
        .iter()
        .all(|arg| arg.value.parse::<Condition>().is_ok());
    let (action, conditions) = if all_conditions {
        (Action::Default, &args[..])
    } else {
        let (first, rest) = args.split_first().unwrap();
        let action = match first.value.as_str() {
            "-" => Action::Default,
            "" => Action::Ignore,
            command => Action::Command(command.into()),
        };
        (action, rest)
    };

    if conditions.is_empty() {
        return Continue(usage_error(env, "trap", "missing condition operand"));
    }

    let mut status = ExitStatus::SUCCESS;
    for operand in conditions {
        let condition = match operand.value.parse::<Condition>() {
            Ok(condition) => condition,
            Err(error) => {
                status = failure(env, "trap", &error.to_string());
                continue;
            }
        };
        if let Err(error) = env.traps.set_action(condition, action.clone()) {
            status = failure(env, "trap", &format!("{}: {error}", operand.value));
        }
    }
    Continue(status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sets_and_lists_an_exit_trap() {
        let mut env = Env::new("slash");
        let result = main(&mut env, Field::dummies(["echo bye", "EXIT"]));
        assert_eq!(result, Continue(ExitStatus::SUCCESS));
        assert_eq!(
            env.traps.get_action(Condition::Exit),
            &Action::Command("echo bye".into())
        );
    }

    #[test]
    fn empty_action_ignores() {
        let mut env = Env::new("slash");
        let _ = main(&mut env, Field::dummies(["", "USR1"]));
        assert_eq!(
            env.traps.get_action(Condition::Signal(libc::SIGUSR1)),
            &Action::Ignore
        );
    }

    #[test]
    fn dash_resets_to_default() {
        let mut env = Env::new("slash");
        let _ = main(&mut env, Field::dummies(["echo hi", "USR1"]));
        let _ = main(&mut env, Field::dummies(["-", "USR1"]));
        assert_eq!(
            env.traps.get_action(Condition::Signal(libc::SIGUSR1)),
            &Action::Default
        );
    }

    #[test]
    fn numeric_operands_alone_reset() {
        let mut env = Env::new("slash");
        let _ = main(&mut env, Field::dummies(["echo hi", "USR1"]));
        let signo = libc::SIGUSR1.to_string();
        let _ = main(&mut env, Field::dummies([signo.as_str()]));
        assert_eq!(
            env.traps.get_action(Condition::Signal(libc::SIGUSR1)),
            &Action::Default
        );
    }

    #[test]
    fn untrappable_signal_fails() {
        let mut env = Env::new("slash");
        let result = main(&mut env, Field::dummies(["echo hi", "KILL"]));
        assert_eq!(result, Continue(ExitStatus::FAILURE));
    }

    #[test]
    fn unknown_condition_fails() {
        let mut env = Env::new("slash");
        let result = main(&mut env, Field::dummies(["echo hi", "WOMBAT"]));
        assert_eq!(result, Continue(ExitStatus::FAILURE));
    }
}
