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

//! Running trap actions
//!
//! Signal delivery only marks a signal pending; the executor calls
//! [`run_pending_traps`] at its safe points (between list items, between
//! loop iterations, while waiting for children) to run the recorded
//! actions. The `$?` value visible inside a trap action is the one from
//! before the trap, and it is restored afterwards.

use slash_env::semantics::Result;
use slash_env::system::signal;
use slash_env::trap::{Action, Condition};
use slash_env::{Env, Frame};
use std::ops::ControlFlow::Continue;

/// Runs the actions of any pending trapped signals.
pub fn run_pending_traps(env: &mut Env) -> Result {
    if !signal::any_pending() {
        return Continue(());
    }
    for signo in signal::take_pending() {
        let action = env.traps.get_action(Condition::Signal(signo)).clone();
        if let Action::Command(command) = action {
            run_trap_command(env, &command)?;
        }
    }
    Continue(())
}

/// Runs the EXIT trap, if any.
///
/// The action is reset first so an `exit` inside the trap cannot run it
/// again.
pub fn run_exit_trap(env: &mut Env) {
    let action = env.traps.get_action(Condition::Exit).clone();
    if let Action::Command(command) = action {
        let _ = env.traps.set_action(Condition::Exit, Action::Default);
        let _ = run_trap_command(env, &command);
    }
}

/// Executes one trap action as a shell fragment.
fn run_trap_command(env: &mut Env, command: &str) -> Result {
    let saved_status = env.exit_status;
    let result = {
        let mut env = env.push_frame(Frame::Trap);
        crate::runner::eval_fragment(&mut env, command)
    };
    env.exit_status = saved_status;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::tests::test_env;
    use slash_env::semantics::ExitStatus;

    #[test]
    fn no_pending_signals_is_a_no_op() {
        let mut env = test_env();
        env.exit_status = ExitStatus(5);
        assert_eq!(run_pending_traps(&mut env), Continue(()));
        assert_eq!(env.exit_status, ExitStatus(5));
    }

    #[test]
    fn exit_trap_runs_its_command_once() {
        let mut env = test_env();
        env.traps
            .set_action(Condition::Exit, Action::Command("setvar bye=1".into()))
            .unwrap();
        run_exit_trap(&mut env);
        assert_eq!(env.variables.value("bye"), Some("1"));
        // The action was consumed.
        run_exit_trap(&mut env);
        assert_eq!(env.traps.get_action(Condition::Exit), &Action::Default);
    }

    #[test]
    fn trap_command_preserves_exit_status() {
        let mut env = test_env();
        env.exit_status = ExitStatus(7);
        env.traps
            .set_action(Condition::Exit, Action::Command("status 9".into()))
            .unwrap();
        run_exit_trap(&mut env);
        assert_eq!(env.exit_status, ExitStatus(7));
    }
}
