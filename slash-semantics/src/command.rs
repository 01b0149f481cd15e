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

//! Command execution
//!
//! The [`Command`] trait is implemented for every node kind of the syntax
//! tree; execution is a tree walk. Sequencing, asynchronous commands,
//! and-or lists and pipelines live here; simple commands and the
//! control-flow constructs are in the submodules.
//!
//! Between the commands of a list, after pipelines and between loop
//! iterations the executor reaches a safe point where pending traps run.

mod compound_command;
mod simple_command;

pub use simple_command::run_external;

use crate::trap::run_pending_traps;
use slash_env::option::ShellOption;
use slash_env::semantics::{Divert, ExitStatus, Result};
use slash_env::system::{self, ChildStatus, Errno, ForkResult};
use slash_env::{Env, Frame};
use slash_syntax::syntax;
use std::ops::ControlFlow::{Break, Continue};

/// Execution of a syntax tree node
pub trait Command {
    /// Executes this node, updating `env.exit_status`.
    fn execute(&self, env: &mut Env) -> Result;
}

impl Command for syntax::List {
    fn execute(&self, env: &mut Env) -> Result {
        for item in &self.0 {
            item.execute(env)?;
            run_pending_traps(env)?;
        }
        Continue(())
    }
}

impl Command for syntax::Item {
    fn execute(&self, env: &mut Env) -> Result {
        if self.is_async {
            start_async(env, &self.and_or)
        } else {
            self.and_or.execute(env)
        }
    }
}

/// Starts an and-or list as an asynchronous (background) command.
///
/// The child runs in a subshell with its standard input redirected from
/// `/dev/null`. The parent registers the job, makes its process ID
/// available as `$!` and continues immediately with a zero exit status.
fn start_async(env: &mut Env, and_or: &syntax::AndOrList) -> Result {
    match system::fork() {
        Ok(ForkResult::Child) => {
            env.enter_subshell();
            if let Ok(null) = system::open(c"/dev/null", libc::O_RDONLY, 0) {
                let _ = system::dup_over(null, 0);
                if null != 0 {
                    system::close(null);
                }
            }
            let result = and_or.execute(env);
            child_exit(env, result);
        }
        Ok(ForkResult::Parent { child }) => {
            env.jobs.add(child, and_or.to_string());
            env.exit_status = ExitStatus::SUCCESS;
            Continue(())
        }
        Err(errno) => {
            env.print_error(&format!("cannot start asynchronous command: {errno}"));
            env.exit_status = ExitStatus::NOEXEC;
            Continue(())
        }
    }
}

impl Command for syntax::AndOrList {
    fn execute(&self, env: &mut Env) -> Result {
        // Every pipeline except the last is a condition for what follows,
        // so `set -e` does not apply to it.
        if self.rest.is_empty() {
            return self.first.execute(env);
        }
        {
            let mut env = env.push_frame(Frame::Condition);
            self.first.execute(&mut env)?;
        }

        let last = self.rest.len() - 1;
        for (index, (op, pipeline)) in self.rest.iter().enumerate() {
            let run = match op {
                syntax::AndOr::AndThen => env.exit_status.is_successful(),
                syntax::AndOr::OrElse => !env.exit_status.is_successful(),
            };
            if !run {
                continue;
            }
            if index == last {
                pipeline.execute(env)?;
            } else {
                let mut env = env.push_frame(Frame::Condition);
                pipeline.execute(&mut env)?;
            }
        }
        Continue(())
    }
}

impl Command for syntax::Pipeline {
    fn execute(&self, env: &mut Env) -> Result {
        if self.negation {
            {
                let mut env = env.push_frame(Frame::Condition);
                execute_pipe_sequence(&mut env, &self.commands)?;
            }
            env.exit_status = if env.exit_status.is_successful() {
                ExitStatus::FAILURE
            } else {
                ExitStatus::SUCCESS
            };
            return Continue(());
        }

        execute_pipe_sequence(env, &self.commands)?;

        // set -e: exit on failure outside a condition context.
        if !env.exit_status.is_successful()
            && env.options.is_on(ShellOption::ErrExit)
            && !env.in_condition()
        {
            return Break(Divert::Exit(Some(env.exit_status)));
        }
        Continue(())
    }
}

fn execute_pipe_sequence(env: &mut Env, commands: &[syntax::Command]) -> Result {
    match commands.len() {
        0 => {
            env.exit_status = ExitStatus::SUCCESS;
            Continue(())
        }
        1 => commands[0].execute(env),
        _ => execute_multi_command_pipeline(env, commands),
    }
}

/// Runs a multi-command pipeline.
///
/// Every command runs in a subshell. The standard output of each command
/// is connected to the standard input of the next via an anonymous pipe.
/// All children are spawned before any is awaited; the exit status of the
/// pipeline is that of the last command.
fn execute_multi_command_pipeline(env: &mut Env, commands: &[syntax::Command]) -> Result {
    let mut pids = Vec::with_capacity(commands.len());
    let mut previous_read: Option<std::ffi::c_int> = None;

    for (index, command) in commands.iter().enumerate() {
        let has_next = index + 1 < commands.len();
        let next_pipe = if has_next {
            match system::pipe() {
                Ok(pipe) => Some(pipe),
                Err(errno) => {
                    if let Some(fd) = previous_read {
                        system::close(fd);
                    }
                    env.print_error(&format!("cannot connect pipeline: {errno}"));
                    env.exit_status = ExitStatus::NOEXEC;
                    return Continue(());
                }
            }
        } else {
            None
        };

        match system::fork() {
            Ok(ForkResult::Child) => {
                env.enter_subshell();
                if let Some(read) = previous_read {
                    let _ = system::dup_over(read, 0);
                    system::close(read);
                }
                if let Some((read, write)) = next_pipe {
                    system::close(read);
                    let _ = system::dup_over(write, 1);
                    if write != 1 {
                        system::close(write);
                    }
                }
                let result = command.execute(env);
                child_exit(env, result);
            }
            Ok(ForkResult::Parent { child }) => {
                if let Some(read) = previous_read {
                    system::close(read);
                }
                if let Some((read, write)) = next_pipe {
                    system::close(write);
                    previous_read = Some(read);
                } else {
                    previous_read = None;
                }
                pids.push(child);
            }
            Err(errno) => {
                if let Some(fd) = previous_read {
                    system::close(fd);
                }
                if let Some((read, write)) = next_pipe {
                    system::close(read);
                    system::close(write);
                }
                env.print_error(&format!("cannot start pipeline command: {errno}"));
                env.exit_status = ExitStatus::NOEXEC;
                return Continue(());
            }
        }
    }

    for pid in pids {
        wait_for_pipeline_stage(env, pid)?;
    }
    Continue(())
}

/// Waits for one pipeline stage, running traps at the interruption safe
/// point.
fn wait_for_pipeline_stage(env: &mut Env, pid: system::Pid) -> Result {
    loop {
        match system::wait_for_child(pid) {
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
                env.print_error(&format!("cannot await pipeline command: {errno}"));
                env.exit_status = ExitStatus::NOEXEC;
                return Continue(());
            }
        }
    }
}

impl Command for syntax::Command {
    fn execute(&self, env: &mut Env) -> Result {
        match self {
            syntax::Command::Simple(command) => command.execute(env),
            syntax::Command::Compound(command) => command.execute(env),
            syntax::Command::Function(definition) => definition.execute(env),
        }
    }
}

impl Command for syntax::FunctionDefinition {
    fn execute(&self, env: &mut Env) -> Result {
        let name = self
            .name
            .to_string_if_literal()
            .expect("the parser validates function names")
            .to_string();
        let function = slash_env::Function::new(name, self.body.clone());
        match env.functions.define(function) {
            Ok(_) => env.exit_status = ExitStatus::SUCCESS,
            Err(error) => {
                env.print_error(&error.to_string());
                env.exit_status = ExitStatus::FAILURE;
            }
        }
        Continue(())
    }
}

/// Terminates a forked child with the status its result implies.
pub(crate) fn child_exit(env: &mut Env, result: Result) -> ! {
    let status = match result {
        Continue(()) => env.exit_status,
        Break(Divert::Exit(status)) => status.unwrap_or(env.exit_status),
        Break(_) => env.exit_status,
    };
    system::exit_process(status)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use slash_env::builtin::{Builtin, BuiltinKind};
    use slash_env::semantics::Field;
    use slash_syntax::alias::AliasSet;
    use slash_syntax::lexer::Lexer;
    use slash_syntax::parser::Parser;

    /// Builds an environment with a few in-process utilities so control
    /// flow can be exercised without spawning processes.
    pub(crate) fn test_env() -> Env {
        fn status_main(env: &mut Env, args: Vec<Field>) -> Result<ExitStatus> {
            let _ = env;
            let status = args
                .first()
                .and_then(|f| f.value.parse().ok())
                .unwrap_or(0);
            Continue(ExitStatus(status))
        }
        fn set_main(env: &mut Env, args: Vec<Field>) -> Result<ExitStatus> {
            for arg in args {
                if let Some((name, value)) = arg.value.split_once('=') {
                    env.variables.assign(name, value).unwrap();
                }
            }
            Continue(ExitStatus::SUCCESS)
        }
        let mut env = Env::new("slash");
        env.builtins.insert(
            "status",
            Builtin {
                kind: BuiltinKind::Intrinsic,
                execute: status_main,
            },
        );
        env.builtins.insert(
            "setvar",
            Builtin {
                kind: BuiltinKind::Intrinsic,
                execute: set_main,
            },
        );
        env.builtins.insert("true", crate::tests::TRUE_BUILTIN);
        env.builtins.insert("false", crate::tests::FALSE_BUILTIN);
        env
    }

    /// Parses and executes a source string in the given environment.
    pub(crate) fn run(env: &mut Env, source: &str) -> Result {
        let mut lexer = Lexer::with_source(source);
        lexer.tokenize().unwrap_or_else(|e| panic!("tokenize {source:?}: {e}"));
        let aliases = env.aliases.clone();
        let program = {
            let mut parser = Parser::new(&mut lexer, &aliases);
            parser
                .program()
                .unwrap_or_else(|e| panic!("parse {source:?}: {e}"))
        };
        program.execute(env)
    }

    #[test]
    fn sequential_list_runs_left_to_right() {
        let mut env = test_env();
        let result = run(&mut env, "status 1; status 2\n");
        assert_eq!(result, Continue(()));
        assert_eq!(env.exit_status, ExitStatus(2));
    }

    #[test]
    fn and_then_runs_on_success_only() {
        let mut env = test_env();
        run(&mut env, "true && status 5\n");
        assert_eq!(env.exit_status, ExitStatus(5));

        run(&mut env, "false && status 7\n");
        // The right side did not run; the status is that of `false`.
        assert_eq!(env.exit_status, ExitStatus::FAILURE);
    }

    #[test]
    fn or_else_runs_on_failure_only() {
        let mut env = test_env();
        run(&mut env, "false || status 5\n");
        assert_eq!(env.exit_status, ExitStatus(5));

        run(&mut env, "true || status 7\n");
        assert_eq!(env.exit_status, ExitStatus::SUCCESS);
    }

    #[test]
    fn chained_and_or_is_left_associative() {
        let mut env = test_env();
        run(&mut env, "false && status 3 || status 4\n");
        assert_eq!(env.exit_status, ExitStatus(4));
    }

    #[test]
    fn negation_inverts_the_status() {
        let mut env = test_env();
        run(&mut env, "! false\n");
        assert_eq!(env.exit_status, ExitStatus::SUCCESS);
        run(&mut env, "! true\n");
        assert_eq!(env.exit_status, ExitStatus::FAILURE);
        run(&mut env, "! status 42\n");
        assert_eq!(env.exit_status, ExitStatus::FAILURE);
    }

    #[test]
    fn errexit_exits_on_failure() {
        let mut env = test_env();
        env.options.set_to(ShellOption::ErrExit, true);
        let result = run(&mut env, "status 3\n");
        assert_eq!(result, Break(Divert::Exit(Some(ExitStatus(3)))));
    }

    #[test]
    fn errexit_ignores_conditions() {
        let mut env = test_env();
        env.options.set_to(ShellOption::ErrExit, true);
        let result = run(&mut env, "false || status 0\n");
        assert_eq!(result, Continue(()));
        let result = run(&mut env, "! status 3\n");
        assert_eq!(result, Continue(()));
        let result = run(&mut env, "if false; then true; fi\n");
        assert_eq!(result, Continue(()));
    }

    #[test]
    fn function_definition_and_call() {
        let mut env = test_env();
        run(&mut env, "f() { status 11; }\n");
        assert_eq!(env.exit_status, ExitStatus::SUCCESS);
        assert!(env.functions.get("f").is_some());

        run(&mut env, "f\n");
        assert_eq!(env.exit_status, ExitStatus(11));
    }

    #[test]
    fn function_arguments_are_positional_parameters() {
        let mut env = test_env();
        env.positional_params = vec!["outer".to_string()];
        run(&mut env, "f() { setvar inner=$1; }; f argument\n");
        assert_eq!(env.variables.value("inner"), Some("argument"));
        // The outer parameters are restored.
        assert_eq!(env.positional_params, ["outer"]);
    }
}
