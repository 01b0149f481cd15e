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

//! Simple command semantics
//!
//! Executing a simple command proceeds in the POSIX order: word
//! expansion, then redirections, then the temporary environment of the
//! assignment words, then dispatch to a function, a built-in or an
//! external utility. Saved descriptors and the temporary environment are
//! restored afterwards regardless of the outcome.

use super::{child_exit, Command};
use crate::expansion::{expand_text, expand_words};
use crate::trap::run_pending_traps;
use slash_env::builtin::BuiltinKind;
use slash_env::option::ShellOption;
use slash_env::semantics::{Divert, ExitStatus, Field, Result};
use slash_env::system::{self, ChildStatus, Errno, ForkResult};
use slash_env::variable::Variable;
use slash_env::{Env, Frame, Function};
use slash_syntax::syntax::{Assign, SimpleCommand};
use std::ffi::CString;
use std::ops::ControlFlow::{Break, Continue};
use std::rc::Rc;

impl Command for SimpleCommand {
    fn execute(&self, env: &mut Env) -> Result {
        env.last_command_subst_status = None;

        let fields = match expand_words(env, &self.words) {
            Ok(fields) => fields,
            Err(error) => return expansion_failure(env, &error),
        };

        if fields.is_empty() {
            return execute_without_command_word(self, env);
        }

        if env.options.is_on(ShellOption::XTrace) {
            let rendered: Vec<&str> = fields.iter().map(|f| f.value.as_str()).collect();
            let line = format!("+ {}\n", rendered.join(" "));
            let _ = system::write_all(2, line.as_bytes());
        }

        let saved_fds = match crate::redir::apply(env, &self.redirs) {
            Ok(saved) => saved,
            Err(error) => {
                env.print_error(&error.to_string());
                env.exit_status = ExitStatus::FAILURE;
                return Continue(());
            }
        };

        let previous_variables = match apply_temporary_assignments(env, &self.assigns) {
            Ok(previous) => previous,
            Err(result) => {
                crate::redir::restore(env, saved_fds);
                return result;
            }
        };

        // The redirections of the exec special built-in stay in effect.
        let is_exec = fields[0].value == "exec";
        let result = dispatch(env, fields);

        restore_variables(env, previous_variables);
        if is_exec {
            crate::redir::discard(env, saved_fds);
        } else {
            crate::redir::restore(env, saved_fds);
        }
        result
    }
}

/// Executes a command that has only assignments and redirections.
///
/// Assignments are applied to the current environment. Redirections
/// are performed for their side effects and undone. The command
/// completes with the status of the last command substitution, or
/// zero.
fn execute_without_command_word(command: &SimpleCommand, env: &mut Env) -> Result {
    for assign in &command.assigns {
        match assign_variable(env, assign, false) {
            Ok(()) => {}
            Err(result) => return result,
        }
    }

    if !command.redirs.is_empty() {
        match crate::redir::apply(env, &command.redirs) {
            Ok(saved) => crate::redir::restore(env, saved),
            Err(error) => {
                env.print_error(&error.to_string());
                env.exit_status = ExitStatus::FAILURE;
                return Continue(());
            }
        }
    }

    env.exit_status = env
        .last_command_subst_status
        .take()
        .unwrap_or(ExitStatus::SUCCESS);
    Continue(())
}

/// Reports an expansion error and yields the failure status.
fn expansion_failure(env: &mut Env, error: &crate::expansion::Error) -> Result {
    env.print_error(&format!("{}: {}", error.span, error));
    env.exit_status = ExitStatus::FAILURE;
    if env.options.is_on(ShellOption::ErrExit) && !env.in_condition() {
        return Break(Divert::Exit(Some(env.exit_status)));
    }
    Continue(())
}

/// Expands and applies one assignment to the current environment.
fn assign_variable(env: &mut Env, assign: &Assign, export: bool) -> std::result::Result<(), Result> {
    let value = match expand_text(env, &assign.value) {
        Ok(value) => value,
        Err(error) => return Err(expansion_failure(env, &error)),
    };
    if let Err(error) = env.variables.assign(&assign.name, value) {
        env.print_error(&error.to_string());
        env.exit_status = ExitStatus::FAILURE;
        return Err(Continue(()));
    }
    if export || env.options.is_on(ShellOption::AllExport) {
        env.variables.export(&assign.name);
    }
    Ok(())
}

/// Applies the assignment words as a temporary environment.
///
/// The previous state of each affected variable is returned so it can be
/// restored after the command. Temporary assignments are exported so they
/// reach the utility's environment.
fn apply_temporary_assignments(
    env: &mut Env,
    assigns: &[Assign],
) -> std::result::Result<Vec<(String, Option<Variable>)>, Result> {
    let mut previous = Vec::with_capacity(assigns.len());
    for assign in assigns {
        previous.push((
            assign.name.clone(),
            env.variables.get(&assign.name).cloned(),
        ));
        if let Err(result) = assign_variable(env, assign, true) {
            restore_variables(env, previous);
            return Err(result);
        }
    }
    Ok(previous)
}

/// Restores variables saved by [`apply_temporary_assignments`].
fn restore_variables(env: &mut Env, previous: Vec<(String, Option<Variable>)>) {
    for (name, variable) in previous.into_iter().rev() {
        env.variables.replace(&name, variable);
    }
}

/// Dispatches an expanded command to its implementation.
///
/// The search order is: special built-ins, functions, other built-ins,
/// external utilities.
fn dispatch(env: &mut Env, fields: Vec<Field>) -> Result {
    let name = fields[0].value.clone();
    let builtin = env.builtins.get(name.as_str()).copied();

    if let Some(builtin) = builtin {
        if builtin.kind == BuiltinKind::Special {
            return run_builtin(env, builtin, fields);
        }
    }
    if let Some(function) = env.functions.get(&name).cloned() {
        return run_function(env, function, fields);
    }
    if let Some(builtin) = builtin {
        return run_builtin(env, builtin, fields);
    }
    run_external(env, fields)
}

fn run_builtin(env: &mut Env, builtin: slash_env::builtin::Builtin, fields: Vec<Field>) -> Result {
    let args = fields[1..].to_vec();
    match (builtin.execute)(env, args) {
        Continue(status) => {
            env.exit_status = status;
            Continue(())
        }
        Break(divert) => Break(divert),
    }
}

/// Calls a function with the remaining fields as positional parameters.
fn run_function(env: &mut Env, function: Rc<Function>, fields: Vec<Field>) -> Result {
    let arguments = fields[1..].iter().map(|f| f.value.clone()).collect();
    let saved_params = std::mem::replace(&mut env.positional_params, arguments);

    let result = {
        let mut env = env.push_frame(Frame::Function);
        function.body.execute(&mut env)
    };

    env.positional_params = saved_params;
    match result {
        Break(Divert::Return(status)) => {
            if let Some(status) = status {
                env.exit_status = status;
            }
            Continue(())
        }
        other => other,
    }
}

/// Spawns an external utility and waits for it.
///
/// This is also the entry point the `command` built-in uses to bypass
/// functions.
pub fn run_external(env: &mut Env, fields: Vec<Field>) -> Result {
    let name = &fields[0].value;
    let Some(path) = crate::command_search::search(env, name) else {
        env.print_error(&format!("{name}: command not found"));
        env.exit_status = ExitStatus::NOT_FOUND;
        return Continue(());
    };

    let Ok(c_path) = CString::new(path.as_os_str().as_encoded_bytes()) else {
        env.print_error(&format!("{name}: invalid command path"));
        env.exit_status = ExitStatus::NOT_FOUND;
        return Continue(());
    };
    let args: Vec<CString> = fields
        .iter()
        .filter_map(|f| CString::new(f.value.as_str()).ok())
        .collect();
    let environ = env.variables.environ();

    match system::fork() {
        Ok(ForkResult::Child) => {
            let errno = system::execve(&c_path, &args, &environ);
            // Only reached when exec failed.
            env.print_error(&format!("{name}: {errno}"));
            let status = if errno == Errno::ENOENT {
                ExitStatus::NOT_FOUND
            } else {
                ExitStatus::NOEXEC
            };
            child_exit(env, Break(Divert::Exit(Some(status))));
        }
        Ok(ForkResult::Parent { child }) => loop {
            match system::wait_for_child(child) {
                Ok(Some((_, status))) => {
                    if let ChildStatus::Stopped = status {
                        continue;
                    }
                    env.exit_status = status.exit_status();
                    return Continue(());
                }
                Ok(None) => continue,
                Err(Errno::EINTR) => {
                    run_pending_traps(env)?;
                }
                Err(errno) => {
                    env.print_error(&format!("cannot await {name}: {errno}"));
                    env.exit_status = ExitStatus::NOEXEC;
                    return Continue(());
                }
            }
        },
        Err(errno) => {
            env.print_error(&format!("cannot run {name}: {errno}"));
            env.exit_status = ExitStatus::NOEXEC;
            Continue(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{run, test_env};
    use super::*;

    #[test]
    fn assignment_only_command_sets_variables() {
        let mut env = test_env();
        let result = run(&mut env, "x=1 y=hello\n");
        assert_eq!(result, Continue(()));
        assert_eq!(env.variables.value("x"), Some("1"));
        assert_eq!(env.variables.value("y"), Some("hello"));
        assert_eq!(env.exit_status, ExitStatus::SUCCESS);
    }

    #[test]
    fn assignment_values_are_expanded() {
        let mut env = test_env();
        run(&mut env, "x=abc; y=${x}d\n");
        assert_eq!(env.variables.value("y"), Some("abcd"));
    }

    #[test]
    fn assignment_to_read_only_fails() {
        let mut env = test_env();
        env.variables.assign("x", "0").unwrap();
        env.variables.make_read_only("x");
        run(&mut env, "x=1\n");
        assert_eq!(env.exit_status, ExitStatus::FAILURE);
        assert_eq!(env.variables.value("x"), Some("0"));
    }

    #[test]
    fn temporary_assignment_is_undone() {
        let mut env = test_env();
        env.variables.assign("x", "old").unwrap();
        run(&mut env, "x=new true\n");
        assert_eq!(env.variables.value("x"), Some("old"));
        // The variable keeps its original attributes.
        assert!(!env.variables.get("x").unwrap().exported);
    }

    #[test]
    fn temporary_assignment_of_previously_unset_variable() {
        let mut env = test_env();
        run(&mut env, "tempvar=1 true\n");
        assert_eq!(env.variables.get("tempvar"), None);
    }

    #[test]
    fn builtin_status_becomes_exit_status() {
        let mut env = test_env();
        run(&mut env, "status 42\n");
        assert_eq!(env.exit_status, ExitStatus(42));
    }

    #[test]
    fn function_takes_precedence_over_external() {
        let mut env = test_env();
        run(&mut env, "probe() { status 9; }; probe\n");
        assert_eq!(env.exit_status, ExitStatus(9));
    }

    #[test]
    fn function_return_restores_status_semantics() {
        let mut env = test_env();
        env.builtins.insert("return", crate::tests::RETURN_BUILTIN);
        run(&mut env, "f() { return 3; }; f\n");
        assert_eq!(env.exit_status, ExitStatus(3));
    }

    #[test]
    fn command_not_found_is_127() {
        let mut env = test_env();
        run(&mut env, "surely-no-such-command-exists-here\n");
        assert_eq!(env.exit_status, ExitStatus::NOT_FOUND);
    }

    #[test]
    fn unset_expansion_under_nounset_aborts_command() {
        let mut env = test_env();
        env.options.set_to(ShellOption::NoUnset, true);
        run(&mut env, "status $undefined_variable\n");
        assert_eq!(env.exit_status, ExitStatus::FAILURE);
    }
}
